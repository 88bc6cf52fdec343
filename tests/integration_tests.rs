// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for padmidi
//!
//! These tests load real files, build the mapping table and push scripted
//! controller events through the dispatcher into an in-memory output.

use std::fs;
use std::path::{Path, PathBuf};

use padmidi::config::PadConfig;
use padmidi::control::{ActionKind, Binding, CustomAction, CustomEffect, Dispatched, Engine};
use padmidi::input::{ControllerEvent, ScriptedSource};
use padmidi::midi::{MemoryOutput, MidiMessage, MidiOutput, Outputs};
use padmidi::music::{NoteData, NoteTable, SOLFEGE_NAMES};
use padmidi::Error;

fn assets() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

fn engine_from(config_toml: &str) -> Engine {
    let config = PadConfig::from_toml(config_toml).unwrap();
    let data = NoteData::load(assets().join("notes.json")).unwrap();
    Engine::load(&config, data).unwrap()
}

fn recorded() -> (MemoryOutput, Outputs) {
    let recorder = MemoryOutput::new();
    let outputs: Outputs = vec![Box::new(recorder.clone())];
    (recorder, outputs)
}

/// The shipped example configuration loads and resolves every binding
#[test]
fn test_bundled_assets_load() {
    let config_path = assets().join("input.toml");
    let config = PadConfig::load(&config_path).unwrap();
    let data = NoteData::load(config.notes_path(&config_path)).unwrap();
    let engine = Engine::load(&config, data).unwrap();

    assert_eq!(engine.table.len(), config.bindings.len());
    assert!(engine.table.warnings().is_empty());
    assert_eq!(engine.table.get("btn_start").unwrap().kind, ActionKind::Custom);
    assert_eq!(engine.table.get("abs_hat0x").unwrap().kind, ActionKind::Chord);
}

/// Solfège anchors: Do0 is 12, 60 is Do4
#[test]
fn test_solfege_scenario() {
    let table = NoteTable::build(&SOLFEGE_NAMES, true).unwrap();
    assert_eq!(table.midi("Do0"), Some(12));
    assert_eq!(table.name(60), Some("Do4"));
}

/// Pressing a chord sends 60, 64, 67; releasing sends the same offs in order
#[test]
fn test_chord_scenario() {
    let engine = engine_from("[gamepad]\nBTN_TL = \"Do_majeur\"\n");
    let (recorder, outputs) = recorded();
    let mut dispatcher = engine.into_dispatcher(outputs);

    dispatcher.dispatch(&ControllerEvent::press("BTN_TL")).unwrap();
    assert_eq!(
        recorder.parsed(),
        vec![
            MidiMessage::NoteOn { channel: 0, note: 60, velocity: 80 },
            MidiMessage::NoteOn { channel: 0, note: 64, velocity: 80 },
            MidiMessage::NoteOn { channel: 0, note: 67, velocity: 80 },
        ]
    );

    recorder.clear();
    dispatcher.dispatch(&ControllerEvent::release("BTN_TL")).unwrap();
    assert_eq!(
        recorder.parsed(),
        vec![
            MidiMessage::NoteOff { channel: 0, note: 60 },
            MidiMessage::NoteOff { channel: 0, note: 64 },
            MidiMessage::NoteOff { channel: 0, note: 67 },
        ]
    );
}

/// BTN_TR bound to sustain sends one CC 64 per transition
#[test]
fn test_sustain_scenario() {
    let engine = engine_from("[gamepad]\nBTN_TR = \"sustain\"\n");
    let (recorder, outputs) = recorded();
    let mut dispatcher = engine.into_dispatcher(outputs);

    dispatcher.dispatch(&ControllerEvent::from_raw("BTN_TR", 1)).unwrap();
    assert_eq!(
        recorder.parsed(),
        vec![MidiMessage::ControlChange { channel: 0, controller: 64, value: 127 }]
    );

    recorder.clear();
    dispatcher.dispatch(&ControllerEvent::from_raw("BTN_TR", 0)).unwrap();
    assert_eq!(
        recorder.parsed(),
        vec![MidiMessage::ControlChange { channel: 0, controller: 64, value: 0 }]
    );
}

/// A typo in an action name loads, stays inert and is reported
#[test]
fn test_unknown_action_scenario() {
    let engine = engine_from("[gamepad]\nBTN_SOUTH = \"Do_majuer\"\n");
    assert_eq!(engine.table.warnings().len(), 1);

    let inert = engine.table.get("BTN_SOUTH").unwrap();
    assert_eq!(inert.on_press, None);
    assert_eq!(inert.on_release, None);

    let (recorder, outputs) = recorded();
    let mut dispatcher = engine.into_dispatcher(outputs);
    assert_eq!(
        dispatcher.dispatch(&ControllerEvent::press("BTN_SOUTH")).unwrap(),
        Dispatched::NoAction
    );
    assert!(recorder.messages().is_empty());
}

/// A full session over several outputs keeps arrival order on each of them
#[test]
fn test_session_over_two_outputs() {
    let engine = engine_from(
        r#"
[gamepad]
BTN_SOUTH = "Do4"
BTN_TR = "sustain"
BTN_TL = "La_mineur"
"#,
    );
    let first = MemoryOutput::new();
    let second = MemoryOutput::new();
    let mut dispatcher =
        engine.into_dispatcher(vec![Box::new(first.clone()), Box::new(second.clone())]);

    let mut source = ScriptedSource::new(vec![
        vec![ControllerEvent::press("BTN_TR")],
        vec![ControllerEvent::press("BTN_TL"), ControllerEvent::press("BTN_SOUTH")],
        vec![ControllerEvent::press("ABS_RZ")],
        vec![ControllerEvent::release("BTN_SOUTH"), ControllerEvent::release("BTN_TL")],
        vec![ControllerEvent::release("BTN_TR")],
    ]);
    let stats = dispatcher.run(&mut source).unwrap();
    assert_eq!(stats.events, 7);
    assert_eq!(stats.invoked, 6);
    assert_eq!(stats.unmapped, 1);

    let expected = vec![
        MidiMessage::ControlChange { channel: 0, controller: 64, value: 127 },
        MidiMessage::NoteOn { channel: 0, note: 57, velocity: 80 },
        MidiMessage::NoteOn { channel: 0, note: 60, velocity: 80 },
        MidiMessage::NoteOn { channel: 0, note: 64, velocity: 80 },
        MidiMessage::NoteOn { channel: 0, note: 60, velocity: 80 },
        MidiMessage::NoteOff { channel: 0, note: 60 },
        MidiMessage::NoteOff { channel: 0, note: 57 },
        MidiMessage::NoteOff { channel: 0, note: 60 },
        MidiMessage::NoteOff { channel: 0, note: 64 },
        MidiMessage::ControlChange { channel: 0, controller: 64, value: 0 },
    ];
    assert_eq!(first.parsed(), expected);
    assert_eq!(second.parsed(), expected);
}

/// Library callers can register closures as custom actions
#[test]
fn test_function_custom_action() {
    let config = PadConfig::from_toml("[gamepad]\nBTN_MODE = \"octave_down\"\n").unwrap();
    let mut customs = config.custom_actions();
    customs.insert(
        "octave_down",
        CustomAction::new().on_press(CustomEffect::from_fn(|outputs| {
            for output in outputs.iter_mut() {
                output.control_change(2, 20, 1)?;
            }
            Ok(())
        })),
    );

    let engine = Engine::with_customs(&config, NoteData::default(), customs).unwrap();
    let (recorder, outputs) = recorded();
    let mut dispatcher = engine.into_dispatcher(outputs);

    dispatcher.dispatch(&ControllerEvent::press("btn_mode")).unwrap();
    dispatcher.dispatch(&ControllerEvent::release("btn_mode")).unwrap();
    assert_eq!(
        recorder.parsed(),
        vec![MidiMessage::ControlChange { channel: 2, controller: 20, value: 1 }]
    );
}

/// Broken note data files stop startup
#[test]
fn test_startup_errors_from_files() {
    let dir = tempfile::tempdir().unwrap();

    let notes = dir.path().join("notes.json");
    fs::write(&notes, r#"{"solfeggio_names": ["Do", "Ré", "Mi"]}"#).unwrap();
    let data = NoteData::load(&notes).unwrap();
    let err = Engine::load(&PadConfig::default(), data).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(err.is_startup());

    fs::write(&notes, "{ not json").unwrap();
    assert!(matches!(NoteData::load(&notes), Err(Error::NoteData { .. })));

    let chords = dir.path().join("chords.yaml");
    fs::write(
        &chords,
        "note_names: [C, C#, D, D#, E, F, F#, G, G#, A, A#, B]\nchords:\n  odd: [C4, H4]\n",
    )
    .unwrap();
    let config = PadConfig::from_toml("[gamepad]\nBTN_SOUTH = \"odd\"\n").unwrap();
    let err = Engine::load(&config, NoteData::load(&chords).unwrap()).unwrap_err();
    assert!(matches!(err, Error::UnknownChordNote { .. }));
}

/// Bindings built in code behave like bindings from a file
#[test]
fn test_bindings_from_code() {
    let config = PadConfig {
        bindings: vec![Binding::new("BTN_C", "Si3"), Binding::new("BTN_Z", "Si3")],
        ..PadConfig::default()
    };
    let engine = Engine::load(&config, NoteData::default()).unwrap();
    let (recorder, outputs) = recorded();
    let mut dispatcher = engine.into_dispatcher(outputs);

    dispatcher.dispatch(&ControllerEvent::press("BTN_C")).unwrap();
    dispatcher.dispatch(&ControllerEvent::press("BTN_Z")).unwrap();
    assert_eq!(recorder.messages(), vec![vec![0x90, 59, 80], vec![0x90, 59, 80]]);
}
