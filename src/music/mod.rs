// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note naming for padmidi.
//!
//! This module provides the note-name/MIDI-number table and the
//! note/chord data file it is built from.

pub mod notes;

pub use notes::{Chords, MidiNote, NoteData, NoteTable, SOLFEGE_NAMES};
