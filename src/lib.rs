// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! padmidi: play MIDI from a game controller.
//!
//! A TOML file binds controller inputs (`BTN_SOUTH`, `ABS_HAT0X`, ...) to
//! action names. An action name is a note ("Do4"), a chord from the note
//! data file ("Do_majeur") or a custom action ("sustain"). At startup every
//! binding is resolved once into a [`control::MappingTable`]; the
//! [`control::Dispatcher`] then turns each press and release into MIDI.

pub mod config;
pub mod control;
pub mod error;
pub mod input;
pub mod midi;
pub mod music;

pub use error::{Error, Result};
