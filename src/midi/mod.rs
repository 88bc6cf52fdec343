// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI output abstraction layer.
//!
//! This module provides a trait-based abstraction for MIDI output,
//! allowing hardware ports (midir), a logging sink for dry runs and an
//! in-memory capture to be used interchangeably.

pub mod midir_backend;

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::error::Result;
use crate::music::MidiNote;

pub use midir_backend::{list_destinations, print_destinations, MidirOutput};

/// The set of output destinations every action sends to
pub type Outputs = Vec<Box<dyn MidiOutput>>;

/// Trait for MIDI output implementations.
///
/// Implementors only provide `send`; the channel voice helpers build the
/// raw bytes. Note messages go out on channel 0.
pub trait MidiOutput {
    /// Send a MIDI message immediately.
    ///
    /// # Arguments
    /// * `message` - Raw MIDI bytes (e.g., `[0x90, 60, 80]` for Note On)
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(Error::Transport)` if the message could not be sent
    fn send(&mut self, message: &[u8]) -> Result<()>;

    /// Human readable name of the destination
    fn name(&self) -> &str {
        "output"
    }

    /// Send a Note On
    fn note_on(&mut self, note: MidiNote, velocity: u8) -> Result<()> {
        self.send(&[messages::NOTE_ON, note & 0x7F, velocity & 0x7F])
    }

    /// Send a Note Off
    fn note_off(&mut self, note: MidiNote) -> Result<()> {
        self.send(&[messages::NOTE_OFF, note & 0x7F, 0])
    }

    /// Send a Control Change
    fn control_change(&mut self, channel: u8, controller: u8, value: u8) -> Result<()> {
        self.send(&[
            messages::CONTROL_CHANGE | (channel & 0x0F),
            controller & 0x7F,
            value & 0x7F,
        ])
    }
}

/// MIDI message constants
pub mod messages {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const CONTROL_CHANGE: u8 = 0xB0;

    // Controller numbers
    pub const CC_SUSTAIN: u8 = 64;
    pub const CC_ALL_NOTES_OFF: u8 = 123;
}

/// Parsed MIDI message types
#[derive(Debug, Clone, PartialEq)]
pub enum MidiMessage {
    /// Note On: channel (0-15), note (0-127), velocity (0-127)
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Note Off: channel (0-15), note (0-127)
    NoteOff { channel: u8, note: u8 },
    /// Control Change: channel (0-15), controller (0-127), value (0-127)
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// Anything else
    Unknown(Vec<u8>),
}

impl MidiMessage {
    /// Parse raw MIDI bytes into a MidiMessage
    pub fn parse(data: &[u8]) -> Option<Self> {
        let status = *data.first()?;
        let msg_type = status & 0xF0;
        let channel = status & 0x0F;

        match msg_type {
            messages::NOTE_OFF if data.len() >= 3 => Some(MidiMessage::NoteOff {
                channel,
                note: data[1] & 0x7F,
            }),
            messages::NOTE_ON if data.len() >= 3 => Some(MidiMessage::NoteOn {
                channel,
                note: data[1] & 0x7F,
                velocity: data[2] & 0x7F,
            }),
            messages::CONTROL_CHANGE if data.len() >= 3 => Some(MidiMessage::ControlChange {
                channel,
                controller: data[1] & 0x7F,
                value: data[2] & 0x7F,
            }),
            _ => Some(MidiMessage::Unknown(data.to_vec())),
        }
    }
}

/// Output that only logs what it would send, for `--dry-run`
pub struct LogOutput {
    name: String,
}

impl LogOutput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl MidiOutput for LogOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        match MidiMessage::parse(message) {
            Some(msg) => info!(output = %self.name, "{:?}", msg),
            None => info!(output = %self.name, "empty message"),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Output that records every message in a shared buffer.
///
/// Clones share the same buffer, so a clone kept by the caller can inspect
/// what the dispatcher sent through the boxed copy.
#[derive(Clone, Default)]
pub struct MemoryOutput {
    messages: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw messages sent so far
    pub fn messages(&self) -> Vec<Vec<u8>> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Messages sent so far, parsed
    pub fn parsed(&self) -> Vec<MidiMessage> {
        self.messages()
            .iter()
            .filter_map(|m| MidiMessage::parse(m))
            .collect()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.clear();
        }
    }
}

impl MidiOutput for MemoryOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_vec());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
