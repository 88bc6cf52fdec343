// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Action resolution.
//!
//! Turns an action name from the configuration into a [`ResolvedAction`]:
//! plain data describing what to send on press and on release. Names are
//! tried as a note first, then as a chord, then as a custom action.

use crate::error::{Error, Result};
use crate::midi::MidiOutput;
use crate::music::{Chords, MidiNote, NoteTable};

use super::custom::{CustomAction, CustomActions, CustomEffect};
use super::DEFAULT_VELOCITY;

/// Direction of a note message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteOp {
    On,
    Off,
}

/// What an action name turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Note,
    Chord,
    Custom,
    /// Matched nothing; the binding does nothing
    Unresolved,
}

/// One side (press or release) of a resolved action
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// A single note on or off
    Note { op: NoteOp, pitch: MidiNote },
    /// Every note of a chord, in declared order
    Chord { op: NoteOp, pitches: Vec<MidiNote> },
    /// A custom action's effect
    Custom(CustomEffect),
}

impl Effect {
    /// Send this effect to every output.
    ///
    /// Notes are sent note by note; each note goes to every output before
    /// the next note starts.
    pub fn invoke(&self, outputs: &mut [Box<dyn MidiOutput>]) -> Result<()> {
        match self {
            Effect::Note { op, pitch } => send_note(*op, *pitch, outputs),
            Effect::Chord { op, pitches } => {
                for pitch in pitches {
                    send_note(*op, *pitch, outputs)?;
                }
                Ok(())
            }
            Effect::Custom(effect) => effect.invoke(outputs),
        }
    }
}

fn send_note(op: NoteOp, pitch: MidiNote, outputs: &mut [Box<dyn MidiOutput>]) -> Result<()> {
    for output in outputs.iter_mut() {
        match op {
            NoteOp::On => output.note_on(pitch, DEFAULT_VELOCITY)?,
            NoteOp::Off => output.note_off(pitch)?,
        }
    }
    Ok(())
}

/// Press and release effects for one binding
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAction {
    /// The configured action name
    pub action: String,
    pub kind: ActionKind,
    pub on_press: Option<Effect>,
    pub on_release: Option<Effect>,
}

impl ResolvedAction {
    /// An action that does nothing on either side
    pub fn inert(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            kind: ActionKind::Unresolved,
            on_press: None,
            on_release: None,
        }
    }

    /// The effect for a transition, if any
    pub fn effect(&self, pressed: bool) -> Option<&Effect> {
        if pressed {
            self.on_press.as_ref()
        } else {
            self.on_release.as_ref()
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.kind != ActionKind::Unresolved
    }

    fn note(action: &str, pitch: MidiNote) -> Self {
        Self {
            action: action.to_string(),
            kind: ActionKind::Note,
            on_press: Some(Effect::Note { op: NoteOp::On, pitch }),
            on_release: Some(Effect::Note { op: NoteOp::Off, pitch }),
        }
    }

    fn chord(action: &str, pitches: Vec<MidiNote>) -> Self {
        Self {
            action: action.to_string(),
            kind: ActionKind::Chord,
            on_press: Some(Effect::Chord {
                op: NoteOp::On,
                pitches: pitches.clone(),
            }),
            on_release: Some(Effect::Chord {
                op: NoteOp::Off,
                pitches,
            }),
        }
    }

    fn custom(action: &str, custom: &CustomAction) -> Self {
        Self {
            action: action.to_string(),
            kind: ActionKind::Custom,
            on_press: custom.on_press.clone().map(Effect::Custom),
            on_release: custom.on_release.clone().map(Effect::Custom),
        }
    }
}

/// Resolve an action name against notes, chords and custom actions.
///
/// Nothing is sent here. An unknown name yields an inert action; only a
/// chord naming a note missing from the table is an error.
pub fn resolve(
    action: &str,
    notes: &NoteTable,
    chords: &Chords,
    customs: &CustomActions,
) -> Result<ResolvedAction> {
    if let Some(pitch) = notes.midi(action) {
        return Ok(ResolvedAction::note(action, pitch));
    }

    if let Some(chord_notes) = chords.get(action) {
        let pitches = chord_notes
            .iter()
            .map(|note| {
                notes.midi(note).ok_or_else(|| Error::UnknownChordNote {
                    chord: action.to_string(),
                    note: note.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(ResolvedAction::chord(action, pitches));
    }

    if let Some(custom) = customs.get(action) {
        return Ok(ResolvedAction::custom(action, custom));
    }

    Ok(ResolvedAction::inert(action))
}
