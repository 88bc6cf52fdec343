// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Dispatch loop.
//!
//! The dispatcher owns the mapping table and the output destinations. Each
//! event is handled to completion, in arrival order, before the next one.

use tracing::{debug, error, trace, warn};

use crate::error::Result;
use crate::input::{ControllerEvent, EventSource};
use crate::midi::{messages, Outputs};

use super::mapping::MappingTable;

/// What happened to a dispatched event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// No binding for this input
    Unmapped,
    /// Bound, but nothing defined for this transition
    NoAction,
    /// The effect was invoked once
    Invoked,
}

/// Counters for a finished `run`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub batches: u64,
    pub events: u64,
    pub invoked: u64,
    pub unmapped: u64,
}

/// Sends resolved actions to the outputs as controller events arrive
pub struct Dispatcher {
    table: MappingTable,
    outputs: Outputs,
}

impl Dispatcher {
    pub fn new(table: MappingTable, outputs: Outputs) -> Self {
        Self { table, outputs }
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Handle one event.
    ///
    /// Transport errors from an output are returned as-is; the caller
    /// decides whether to stop.
    pub fn dispatch(&mut self, event: &ControllerEvent) -> Result<Dispatched> {
        let action = match self.table.get(&event.input_id) {
            Some(action) => action,
            None => {
                trace!(input = %event.input_id, pressed = event.pressed, "unmapped input");
                return Ok(Dispatched::Unmapped);
            }
        };

        debug!(input = %event.input_id, pressed = event.pressed, action = %action.action, "input");

        match action.effect(event.pressed) {
            Some(effect) => {
                effect.invoke(&mut self.outputs)?;
                Ok(Dispatched::Invoked)
            }
            None => Ok(Dispatched::NoAction),
        }
    }

    /// Consume events until the source ends.
    ///
    /// On the first error the loop stops. Before returning the error an
    /// all-notes-off is sent so no note is left hanging.
    pub fn run<S>(&mut self, source: &mut S) -> Result<RunStats>
    where
        S: EventSource + ?Sized,
    {
        let mut stats = RunStats::default();

        loop {
            let batch = match source.read_batch() {
                Ok(Some(batch)) => batch,
                Ok(None) => break,
                Err(e) => {
                    error!("input source failed: {}", e);
                    self.all_notes_off();
                    return Err(e);
                }
            };
            stats.batches += 1;

            for event in &batch {
                stats.events += 1;
                match self.dispatch(event) {
                    Ok(Dispatched::Invoked) => stats.invoked += 1,
                    Ok(Dispatched::Unmapped) => stats.unmapped += 1,
                    Ok(Dispatched::NoAction) => {}
                    Err(e) => {
                        error!(input = %event.input_id, "dispatch failed: {}", e);
                        self.all_notes_off();
                        return Err(e);
                    }
                }
            }
        }

        debug!(?stats, "event source ended");
        Ok(stats)
    }

    /// Send All Notes Off on channel 0 to every output, ignoring failures
    pub fn all_notes_off(&mut self) {
        for output in self.outputs.iter_mut() {
            if let Err(e) = output.control_change(0, messages::CC_ALL_NOTES_OFF, 0) {
                warn!(output = %output.name(), "all notes off failed: {}", e);
            }
        }
    }
}
