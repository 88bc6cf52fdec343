// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Controller input.
//!
//! An [`EventSource`] produces ordered batches of [`ControllerEvent`]s. The
//! dispatcher pulls one batch at a time and handles each event before it
//! asks for the next batch.

pub mod gamepad;

use std::collections::VecDeque;

use crate::error::Result;

pub use gamepad::{list_gamepads, GamepadSource};

/// A single observed press or release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerEvent {
    /// Raw identifier of the control (e.g. "BTN_TR")
    pub input_id: String,
    /// True for a press, false for a release
    pub pressed: bool,
}

impl ControllerEvent {
    pub fn new(input_id: impl Into<String>, pressed: bool) -> Self {
        Self {
            input_id: input_id.into(),
            pressed,
        }
    }

    pub fn press(input_id: impl Into<String>) -> Self {
        Self::new(input_id, true)
    }

    pub fn release(input_id: impl Into<String>) -> Self {
        Self::new(input_id, false)
    }

    /// Build an event from a raw device state; any non-zero state is a press
    pub fn from_raw(input_id: impl Into<String>, state: i32) -> Self {
        Self::new(input_id, state != 0)
    }
}

/// Canonical form of a controller input id
pub fn canonical_input_id(input_id: &str) -> String {
    input_id.trim().to_lowercase()
}

/// Source of controller events
pub trait EventSource {
    /// Block until at least one event is available and return every pending
    /// event in arrival order. `Ok(None)` means the source has ended.
    fn read_batch(&mut self) -> Result<Option<Vec<ControllerEvent>>>;
}

/// Replays a fixed sequence of batches, then ends
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    batches: VecDeque<Vec<ControllerEvent>>,
}

impl ScriptedSource {
    pub fn new(batches: Vec<Vec<ControllerEvent>>) -> Self {
        Self {
            batches: batches.into(),
        }
    }

    /// One batch per event
    pub fn from_events(events: Vec<ControllerEvent>) -> Self {
        Self::new(events.into_iter().map(|e| vec![e]).collect())
    }

    /// Batches not read yet
    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl EventSource for ScriptedSource {
    fn read_batch(&mut self) -> Result<Option<Vec<ControllerEvent>>> {
        Ok(self.batches.pop_front())
    }
}
