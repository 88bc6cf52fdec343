// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Controller input to action mapping table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::input::canonical_input_id;
use crate::music::{Chords, NoteTable};

use super::action::{resolve, ResolvedAction};
use super::custom::CustomActions;

/// A configured binding from a controller input to an action name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub input_id: String,
    pub action: String,
}

impl Binding {
    pub fn new(input_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            input_id: input_id.into(),
            action: action.into(),
        }
    }
}

/// A binding whose action name matched no note, chord or custom action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedBinding {
    pub input_id: String,
    pub action: String,
}

/// Resolved actions indexed by case-folded controller input id
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: HashMap<String, ResolvedAction>,
    warnings: Vec<UnresolvedBinding>,
}

impl MappingTable {
    /// Resolve every binding.
    ///
    /// When the same input appears twice the later binding replaces the
    /// earlier one, which is never resolved. Unknown action names do not
    /// fail the build; they are kept as inert entries and listed in
    /// `warnings()`.
    pub fn build<'a, I>(
        bindings: I,
        notes: &NoteTable,
        chords: &Chords,
        customs: &CustomActions,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Binding>,
    {
        let bindings: Vec<&Binding> = bindings.into_iter().collect();

        // Position of the binding that wins for each input
        let mut latest: HashMap<String, usize> = HashMap::new();
        for (i, binding) in bindings.iter().enumerate() {
            latest.insert(canonical_input_id(&binding.input_id), i);
        }

        let mut entries = HashMap::with_capacity(latest.len());
        let mut warnings: Vec<UnresolvedBinding> = Vec::new();

        for (i, binding) in bindings.iter().enumerate() {
            let key = canonical_input_id(&binding.input_id);
            if latest.get(&key) != Some(&i) {
                continue;
            }

            let resolved = resolve(&binding.action, notes, chords, customs)?;
            if !resolved.is_resolved() {
                warnings.push(UnresolvedBinding {
                    input_id: key.clone(),
                    action: binding.action.clone(),
                });
            }
            entries.insert(key, resolved);
        }

        for w in &warnings {
            warn!(input = %w.input_id, action = %w.action, "action matches no note, chord or custom action");
        }

        Ok(Self { entries, warnings })
    }

    /// Look up the resolved action for an input id (case-insensitive)
    pub fn get(&self, input_id: &str) -> Option<&ResolvedAction> {
        self.entries.get(&canonical_input_id(input_id))
    }

    /// Bindings that resolved to nothing
    pub fn warnings(&self) -> &[UnresolvedBinding] {
        &self.warnings
    }

    /// Number of mapped inputs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no input is mapped
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by input id, for display
    pub fn sorted(&self) -> Vec<(&str, &ResolvedAction)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
