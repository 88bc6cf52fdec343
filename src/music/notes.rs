// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note naming and the note/chord data file.
//!
//! A [`NoteTable`] maps symbolic note names ("Do4", "Sol#2", ...) to MIDI
//! note numbers and back. It is generated from twelve names, one per
//! semitone, and covers octaves 0 through 8.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Semitones in an octave
pub const NOTES_PER_OCTAVE: u8 = 12;

/// MIDI number of octave 0, position 0
pub const OCTAVE_ZERO_MIDI: MidiNote = 12;

/// Highest generated octave (inclusive)
pub const LAST_OCTAVE: u8 = 8;

/// French solfège names, root first
pub const SOLFEGE_NAMES: [&str; 12] = [
    "Do", "Do#", "Ré", "Ré#", "Mi", "Fa", "Fa#", "Sol", "Sol#", "La", "La#", "Si",
];

/// Named chords: chord name to ordered note names
pub type Chords = HashMap<String, Vec<String>>;

/// Two-way mapping between note names and MIDI numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTable {
    name_to_midi: HashMap<String, MidiNote>,
    midi_to_name: BTreeMap<MidiNote, String>,
    octave_suffix: bool,
}

impl NoteTable {
    /// Build the table from twelve note names.
    ///
    /// With `octave_suffix` every name carries its octave digit ("Do4" is 60).
    /// Without it, all octaves of a name fold onto the same pitch class in
    /// `0..12`; `name()` still reports every MIDI number.
    pub fn build<S: AsRef<str>>(note_names: &[S], octave_suffix: bool) -> Result<Self> {
        if note_names.len() != NOTES_PER_OCTAVE as usize {
            return Err(Error::InvalidInput(format!(
                "expected {} note names, got {}",
                NOTES_PER_OCTAVE,
                note_names.len()
            )));
        }

        let mut name_to_midi = HashMap::new();
        let mut midi_to_name = BTreeMap::new();

        for octave in 0..=LAST_OCTAVE {
            for (position, name) in note_names.iter().enumerate() {
                let midi = OCTAVE_ZERO_MIDI + octave * NOTES_PER_OCTAVE + position as u8;
                let full_name = if octave_suffix {
                    format!("{}{}", name.as_ref(), octave)
                } else {
                    name.as_ref().to_string()
                };

                midi_to_name.insert(midi, full_name.clone());
                // Later octaves overwrite earlier ones when the suffix is dropped
                let value = if octave_suffix { midi } else { midi % NOTES_PER_OCTAVE };
                name_to_midi.insert(full_name, value);
            }
        }

        Ok(Self {
            name_to_midi,
            midi_to_name,
            octave_suffix,
        })
    }

    /// Look up the MIDI number for a note name
    pub fn midi(&self, name: &str) -> Option<MidiNote> {
        self.name_to_midi.get(name).copied()
    }

    /// Look up the note name for a MIDI number
    pub fn name(&self, midi: MidiNote) -> Option<&str> {
        self.midi_to_name.get(&midi).map(String::as_str)
    }

    /// Check if a name is a note in this table
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_midi.contains_key(name)
    }

    /// Whether names carry their octave digit
    pub fn has_octave_suffix(&self) -> bool {
        self.octave_suffix
    }

    /// Number of distinct note names
    pub fn len(&self) -> usize {
        self.name_to_midi.len()
    }

    /// True when the table holds no names
    pub fn is_empty(&self) -> bool {
        self.name_to_midi.is_empty()
    }

    /// Iterate MIDI numbers and their names in ascending pitch order
    pub fn iter(&self) -> impl Iterator<Item = (MidiNote, &str)> {
        self.midi_to_name.iter().map(|(midi, name)| (*midi, name.as_str()))
    }
}

/// Note naming scheme and chord definitions, loaded once at startup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteData {
    /// Twelve note names, root first
    #[serde(alias = "solfeggio_names")]
    pub note_names: Vec<String>,
    /// Chord definitions
    #[serde(default)]
    pub chords: Chords,
}

impl NoteData {
    /// Load note data from a YAML or JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| Error::NoteData {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&contents).map_err(|e| match e {
            Error::NoteData { message, .. } => Error::NoteData {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse note data from a YAML (or JSON) string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::NoteData {
            path: Default::default(),
            message: e.to_string(),
        })
    }

    /// Build the note table for this naming scheme
    pub fn table(&self, octave_suffix: bool) -> Result<NoteTable> {
        NoteTable::build(&self.note_names, octave_suffix)
    }
}

impl Default for NoteData {
    fn default() -> Self {
        Self {
            note_names: SOLFEGE_NAMES.iter().map(|s| s.to_string()).collect(),
            chords: Chords::new(),
        }
    }
}
