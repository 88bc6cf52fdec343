// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Mapping engine: from controller inputs to MIDI.
//!
//! This module provides:
//! - Action resolution (note, chord or custom action)
//! - The mapping table from controller input ids to resolved actions
//! - The dispatch loop that runs resolved actions as events arrive

pub mod action;
pub mod custom;
pub mod dispatch;
pub mod mapping;

pub use action::{resolve, ActionKind, Effect, NoteOp, ResolvedAction};
pub use custom::{CustomAction, CustomActions, CustomEffect, CustomStep};
pub use dispatch::{Dispatched, Dispatcher, RunStats};
pub use mapping::{Binding, MappingTable, UnresolvedBinding};

use tracing::info;

use crate::config::PadConfig;
use crate::error::Result;
use crate::midi::Outputs;
use crate::music::{Chords, NoteData, NoteTable};

/// Velocity of every note on sent by note and chord actions
pub const DEFAULT_VELOCITY: u8 = 80;

/// Everything built at startup, before any device is opened
#[derive(Debug, Clone)]
pub struct Engine {
    pub notes: NoteTable,
    pub chords: Chords,
    pub customs: CustomActions,
    pub table: MappingTable,
}

impl Engine {
    /// Build the note table and the mapping table from loaded data
    pub fn load(config: &PadConfig, data: NoteData) -> Result<Self> {
        Self::with_customs(config, data, config.custom_actions())
    }

    /// Same as `load`, with a caller-supplied set of custom actions
    pub fn with_customs(config: &PadConfig, data: NoteData, customs: CustomActions) -> Result<Self> {
        let notes = data.table(config.notes.octave_suffix)?;
        let chords = data.chords;
        let table = MappingTable::build(&config.bindings, &notes, &chords, &customs)?;

        info!(
            bindings = table.len(),
            unresolved = table.warnings().len(),
            chords = chords.len(),
            "mapping table ready"
        );

        Ok(Self {
            notes,
            chords,
            customs,
            table,
        })
    }

    /// Hand the mapping table to a dispatcher writing to `outputs`
    pub fn into_dispatcher(self, outputs: Outputs) -> Dispatcher {
        Dispatcher::new(self.table, outputs)
    }
}
