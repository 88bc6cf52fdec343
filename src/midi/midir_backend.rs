// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! midir backend.
//!
//! This module provides a cross-platform implementation of the `MidiOutput`
//! trait on top of midir (ALSA, CoreMIDI, WinMM).

use midir::{MidiOutput as MidirClient, MidiOutputConnection};
use tracing::debug;

use super::MidiOutput;
use crate::error::{Error, Result};

const CLIENT_NAME: &str = "padmidi";

/// midir output connected to one port
pub struct MidirOutput {
    name: String,
    connection: MidiOutputConnection,
}

impl MidirOutput {
    /// Create a new output connected to the specified destination.
    ///
    /// # Arguments
    /// * `destination_index` - Index of the destination in the system's port list
    ///
    /// # Returns
    /// * `Ok(MidirOutput)` on success
    /// * `Err(Error::DeviceUnavailable)` if the client or connection could not be created
    pub fn new(destination_index: usize) -> Result<Self> {
        let client = MidirClient::new(CLIENT_NAME)
            .map_err(|e| Error::DeviceUnavailable(format!("failed to create MIDI client: {}", e)))?;

        let ports = client.ports();
        let port = ports.get(destination_index).ok_or_else(|| {
            Error::DeviceUnavailable(format!(
                "MIDI destination {} not found (only {} available)",
                destination_index,
                ports.len()
            ))
        })?;

        let name = client
            .port_name(port)
            .unwrap_or_else(|_| format!("Unknown {}", destination_index));

        let connection = client
            .connect(port, "padmidi-out")
            .map_err(|e| Error::DeviceUnavailable(format!("failed to connect to '{}': {}", name, e)))?;

        debug!(port = %name, "opened MIDI output");
        Ok(Self { name, connection })
    }

    /// Create a new output connected to a destination by name.
    ///
    /// # Arguments
    /// * `name` - Partial name to match against destination names (case-insensitive)
    ///
    /// # Returns
    /// * `Ok(MidirOutput)` on success
    /// * `Err(Error::DeviceUnavailable)` if no matching destination is found
    pub fn new_by_name(name: &str) -> Result<Self> {
        let wanted = name.to_lowercase();
        let index = list_destinations()
            .into_iter()
            .find(|(_, n)| n.to_lowercase().contains(&wanted))
            .map(|(i, _)| i)
            .ok_or_else(|| Error::DeviceUnavailable(format!("no MIDI destination matching '{}'", name)))?;

        Self::new(index)
    }
}

impl MidiOutput for MidirOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        self.connection
            .send(message)
            .map_err(|e| Error::Transport(format!("{}: {}", self.name, e)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// List all available MIDI destinations.
///
/// # Returns
/// A vector of (index, name) tuples; empty if no MIDI client can be created.
pub fn list_destinations() -> Vec<(usize, String)> {
    let client = match MidirClient::new(CLIENT_NAME) {
        Ok(client) => client,
        Err(_) => return Vec::new(),
    };

    client
        .ports()
        .iter()
        .enumerate()
        .map(|(i, port)| {
            let name = client
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown {}", i));
            (i, name)
        })
        .collect()
}

/// Print all available MIDI destinations to stdout.
pub fn print_destinations() {
    let destinations = list_destinations();
    if destinations.is_empty() {
        println!("No MIDI destinations found.");
    } else {
        println!("Available MIDI destinations:");
        for (i, name) in destinations {
            println!("  {}: {}", i, name);
        }
    }
}
