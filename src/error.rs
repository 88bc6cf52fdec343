// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for padmidi.
//!
//! Everything except `Transport` is a startup error: it is raised while
//! loading data and building the mapping table, before any event is read.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the mapping engine and its adapters
#[derive(Debug, Error)]
pub enum Error {
    /// A note naming scheme did not have one name per semitone
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A chord refers to a note name missing from the note table
    #[error("chord '{chord}' refers to unknown note '{note}'")]
    UnknownChordNote { chord: String, note: String },

    /// The mapping configuration could not be read or parsed
    #[error("configuration error in {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    /// The note/chord data could not be read or parsed
    #[error("note data error in {path:?}: {message}")]
    NoteData { path: PathBuf, message: String },

    /// A requested input or output device is not available
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// An output rejected a message while dispatching
    #[error("MIDI transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Check if this error can only happen before the dispatch loop starts
    pub fn is_startup(&self) -> bool {
        !matches!(self, Error::Transport(_))
    }
}
