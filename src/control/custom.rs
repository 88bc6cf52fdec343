// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Custom actions.
//!
//! A custom action is a pair of optional effects, one for press and one for
//! release. Effects are either a list of declarative steps (from the
//! configuration file) or a function supplied through the library API.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::midi::{messages, MidiOutput};
use crate::music::MidiNote;

use super::DEFAULT_VELOCITY;

/// Function form of a custom effect; receives every output destination
pub type EffectFn = Arc<dyn Fn(&mut [Box<dyn MidiOutput>]) -> Result<()>>;

/// One declarative step of a custom effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomStep {
    /// Send a control change to every output
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// Send a note on to every output
    NoteOn {
        note: MidiNote,
        #[serde(default = "default_velocity")]
        velocity: u8,
    },
    /// Send a note off to every output
    NoteOff { note: MidiNote },
    /// Emit a log line, send nothing
    Log(String),
}

fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

/// Highest value of a MIDI data byte
const DATA_MAX: u8 = 0x7F;
/// Highest MIDI channel (zero-based)
const CHANNEL_MAX: u8 = 0x0F;

fn check_range(field: &str, value: u8, max: u8) -> std::result::Result<(), String> {
    if value > max {
        return Err(format!("{} {} is out of range 0-{}", field, value, max));
    }
    Ok(())
}

impl CustomStep {
    /// Check that every field fits its MIDI byte
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            CustomStep::ControlChange {
                channel,
                controller,
                value,
            } => {
                check_range("channel", *channel, CHANNEL_MAX)?;
                check_range("controller", *controller, DATA_MAX)?;
                check_range("value", *value, DATA_MAX)
            }
            CustomStep::NoteOn { note, velocity } => {
                check_range("note", *note, DATA_MAX)?;
                check_range("velocity", *velocity, DATA_MAX)
            }
            CustomStep::NoteOff { note } => check_range("note", *note, DATA_MAX),
            CustomStep::Log(_) => Ok(()),
        }
    }

    fn run(&self, outputs: &mut [Box<dyn MidiOutput>]) -> Result<()> {
        match self {
            CustomStep::ControlChange {
                channel,
                controller,
                value,
            } => {
                for output in outputs.iter_mut() {
                    output.control_change(*channel, *controller, *value)?;
                }
            }
            CustomStep::NoteOn { note, velocity } => {
                for output in outputs.iter_mut() {
                    output.note_on(*note, *velocity)?;
                }
            }
            CustomStep::NoteOff { note } => {
                for output in outputs.iter_mut() {
                    output.note_off(*note)?;
                }
            }
            CustomStep::Log(message) => info!("{}", message),
        }
        Ok(())
    }
}

/// The effect run on one side (press or release) of a custom action
#[derive(Clone)]
pub enum CustomEffect {
    Steps(Vec<CustomStep>),
    Function(EffectFn),
}

impl CustomEffect {
    /// Wrap a closure as an effect
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut [Box<dyn MidiOutput>]) -> Result<()> + 'static,
    {
        CustomEffect::Function(Arc::new(f))
    }

    /// Run the effect against the outputs
    pub fn invoke(&self, outputs: &mut [Box<dyn MidiOutput>]) -> Result<()> {
        match self {
            CustomEffect::Steps(steps) => {
                for step in steps {
                    step.run(outputs)?;
                }
                Ok(())
            }
            CustomEffect::Function(f) => (**f)(outputs),
        }
    }
}

impl fmt::Debug for CustomEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomEffect::Steps(steps) => f.debug_tuple("Steps").field(steps).finish(),
            CustomEffect::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl PartialEq for CustomEffect {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CustomEffect::Steps(a), CustomEffect::Steps(b)) => a == b,
            (CustomEffect::Function(a), CustomEffect::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A user-defined action: optional press and release effects
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomAction {
    pub on_press: Option<CustomEffect>,
    pub on_release: Option<CustomEffect>,
}

impl CustomAction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the press effect
    pub fn on_press(mut self, effect: CustomEffect) -> Self {
        self.on_press = Some(effect);
        self
    }

    /// Set the release effect
    pub fn on_release(mut self, effect: CustomEffect) -> Self {
        self.on_release = Some(effect);
        self
    }

    /// Sustain pedal: CC 64 at 127 on press, 0 on release, channel 0
    pub fn sustain() -> Self {
        let cc = |value| CustomEffect::Steps(vec![CustomStep::ControlChange {
            channel: 0,
            controller: messages::CC_SUSTAIN,
            value,
        }]);
        Self::new().on_press(cc(127)).on_release(cc(0))
    }

    /// All notes off on press
    pub fn panic() -> Self {
        Self::new().on_press(CustomEffect::Steps(vec![CustomStep::ControlChange {
            channel: 0,
            controller: messages::CC_ALL_NOTES_OFF,
            value: 0,
        }]))
    }
}

/// Named custom actions
#[derive(Debug, Clone, Default)]
pub struct CustomActions {
    actions: HashMap<String, CustomAction>,
}

impl CustomActions {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `sustain` and `panic` actions
    pub fn with_defaults() -> Self {
        let mut actions = Self::new();
        actions.insert("sustain", CustomAction::sustain());
        actions.insert("panic", CustomAction::panic());
        actions
    }

    /// Add or replace an action
    pub fn insert(&mut self, name: impl Into<String>, action: CustomAction) {
        self.actions.insert(name.into(), action);
    }

    pub fn get(&self, name: &str) -> Option<&CustomAction> {
        self.actions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True when no action is registered
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
