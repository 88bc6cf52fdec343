// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for padmidi.
//!
//! The mapping file is TOML. Bindings live in the `[gamepad]` table and
//! keep their file order:
//!
//! ```toml
//! [midi]
//! outputs = ["UM-ONE"]
//!
//! [notes]
//! file = "notes.json"
//!
//! [gamepad]
//! BTN_SOUTH = "Do4"
//! BTN_WEST = "Do_majeur"
//! BTN_TR = "sustain"
//!
//! [actions.wah]
//! press = { control_change = { channel = 0, controller = 1, value = 127 } }
//! release = { control_change = { channel = 0, controller = 1, value = 0 } }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::control::custom::{CustomAction, CustomActions, CustomEffect, CustomStep};
use crate::control::mapping::Binding;
use crate::error::{Error, Result};
use crate::input::gamepad::DEFAULT_AXIS_THRESHOLD;

/// Root of the mapping file
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct PadConfig {
    /// Output destinations
    #[serde(default)]
    pub midi: MidiConfig,
    /// Note/chord data location and naming options
    #[serde(default)]
    pub notes: NotesConfig,
    /// Input device options
    #[serde(default)]
    pub input: InputConfig,
    /// Controller input id to action name, in file order
    #[serde(default, rename = "gamepad", deserialize_with = "deserialize_bindings")]
    pub bindings: Vec<Binding>,
    /// Custom action definitions
    #[serde(default)]
    pub actions: HashMap<String, CustomActionConfig>,
}

impl PadConfig {
    /// Load a mapping configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&contents).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse a mapping configuration from a TOML string
    pub fn from_toml(toml: &str) -> Result<Self> {
        Self::parse(toml).map_err(|message| Error::Config {
            path: PathBuf::new(),
            message,
        })
    }

    fn parse(toml: &str) -> std::result::Result<Self, String> {
        let config: Self = toml::from_str(toml).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject custom action steps whose values do not fit a MIDI message
    fn validate(&self) -> std::result::Result<(), String> {
        let mut names: Vec<&String> = self.actions.keys().collect();
        names.sort();
        for name in names {
            let action = &self.actions[name];
            for (side, steps) in [("press", &action.press), ("release", &action.release)] {
                for step in steps.iter().flat_map(|list| list.steps()) {
                    step.validate()
                        .map_err(|e| format!("action '{}' {}: {}", name, side, e))?;
                }
            }
        }
        Ok(())
    }

    /// Note data path, relative paths taken from the config file's directory
    pub fn notes_path(&self, config_path: &Path) -> PathBuf {
        let file = Path::new(&self.notes.file);
        if file.is_absolute() {
            return file.to_path_buf();
        }
        config_path
            .parent()
            .map(|dir| dir.join(file))
            .unwrap_or_else(|| file.to_path_buf())
    }

    /// Built-in custom actions plus the ones defined in `[actions]`
    pub fn custom_actions(&self) -> CustomActions {
        let mut customs = CustomActions::with_defaults();
        for (name, action) in &self.actions {
            customs.insert(name.clone(), action.to_custom_action());
        }
        customs
    }
}

/// MIDI output configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct MidiConfig {
    /// Output port names (partial, case-insensitive match)
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// Note data configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NotesConfig {
    /// Note/chord data file (YAML or JSON)
    #[serde(default = "default_notes_file")]
    pub file: String,
    /// Append the octave number to note names
    #[serde(default = "default_octave_suffix")]
    pub octave_suffix: bool,
}

fn default_notes_file() -> String {
    "notes.json".to_string()
}
fn default_octave_suffix() -> bool {
    true
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            file: default_notes_file(),
            octave_suffix: default_octave_suffix(),
        }
    }
}

/// Input device configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InputConfig {
    /// Axis magnitude that counts as a press (0.0 - 1.0)
    #[serde(default = "default_axis_threshold")]
    pub axis_threshold: f32,
}

fn default_axis_threshold() -> f32 {
    DEFAULT_AXIS_THRESHOLD
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            axis_threshold: default_axis_threshold(),
        }
    }
}

/// One step or a list of steps
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StepList {
    One(CustomStep),
    Many(Vec<CustomStep>),
}

impl StepList {
    fn steps(&self) -> &[CustomStep] {
        match self {
            StepList::One(step) => std::slice::from_ref(step),
            StepList::Many(steps) => steps,
        }
    }

    fn into_steps(self) -> Vec<CustomStep> {
        match self {
            StepList::One(step) => vec![step],
            StepList::Many(steps) => steps,
        }
    }
}

/// A custom action defined in the configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct CustomActionConfig {
    #[serde(default)]
    pub press: Option<StepList>,
    #[serde(default)]
    pub release: Option<StepList>,
}

impl CustomActionConfig {
    pub fn to_custom_action(&self) -> CustomAction {
        let effect = |steps: &Option<StepList>| {
            steps
                .clone()
                .map(|s| CustomEffect::Steps(s.into_steps()))
        };
        CustomAction {
            on_press: effect(&self.press),
            on_release: effect(&self.release),
        }
    }
}

fn deserialize_bindings<'de, D>(deserializer: D) -> std::result::Result<Vec<Binding>, D::Error>
where
    D: Deserializer<'de>,
{
    let table = toml::Table::deserialize(deserializer)?;
    table
        .into_iter()
        .map(|(input_id, value)| match value {
            toml::Value::String(action) => Ok(Binding::new(input_id, action)),
            other => Err(D::Error::custom(format!(
                "binding '{}' must be an action name, found {}",
                input_id,
                other.type_str()
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[midi]
outputs = ["UM-ONE", "UnPortMIDI"]

[notes]
file = "data/notes.yaml"
octave_suffix = false

[input]
axis_threshold = 0.8

[gamepad]
BTN_SOUTH = "Do4"
BTN_WEST = "Do_majeur"
BTN_TR = "sustain"
ABS_HAT0X = "foo"

[actions.foo]
press = { log = "henlo" }
release = { log = "k bye" }
"#;

        let config = PadConfig::from_toml(toml).unwrap();
        assert_eq!(config.midi.outputs, vec!["UM-ONE", "UnPortMIDI"]);
        assert_eq!(config.notes.file, "data/notes.yaml");
        assert!(!config.notes.octave_suffix);
        assert_eq!(config.input.axis_threshold, 0.8);
        assert_eq!(
            config.bindings,
            vec![
                Binding::new("BTN_SOUTH", "Do4"),
                Binding::new("BTN_WEST", "Do_majeur"),
                Binding::new("BTN_TR", "sustain"),
                Binding::new("ABS_HAT0X", "foo"),
            ]
        );

        let foo = config.actions["foo"].to_custom_action();
        assert_eq!(
            foo.on_press,
            Some(CustomEffect::Steps(vec![CustomStep::Log("henlo".to_string())]))
        );
        assert!(foo.on_release.is_some());
    }

    #[test]
    fn test_default_values() {
        let config = PadConfig::from_toml("[gamepad]\nbtn_tr = \"sustain\"\n").unwrap();
        assert!(config.midi.outputs.is_empty());
        assert_eq!(config.notes.file, "notes.json");
        assert!(config.notes.octave_suffix);
        assert_eq!(config.input.axis_threshold, 0.5);
        assert_eq!(config.bindings.len(), 1);
        assert!(config.actions.is_empty());
    }

    #[test]
    fn test_binding_order_is_file_order() {
        let toml = "[gamepad]\nz = \"Do4\"\na = \"Mi4\"\nm = \"Sol4\"\n";
        let config = PadConfig::from_toml(toml).unwrap();
        let ids: Vec<&str> = config.bindings.iter().map(|b| b.input_id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_non_string_binding_is_rejected() {
        let err = PadConfig::from_toml("[gamepad]\nBTN_SOUTH = 60\n").unwrap_err();
        match err {
            Error::Config { message, .. } => assert!(message.contains("BTN_SOUTH")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            PadConfig::from_toml("[gamepad\nBTN_SOUTH = "),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_step_lists() {
        let toml = r#"
[actions.swell]
press = [
  { control_change = { channel = 0, controller = 11, value = 127 } },
  { note_on = { note = 36 } },
]
"#;
        let config = PadConfig::from_toml(toml).unwrap();
        let swell = config.actions["swell"].to_custom_action();
        assert_eq!(
            swell.on_press,
            Some(CustomEffect::Steps(vec![
                CustomStep::ControlChange { channel: 0, controller: 11, value: 127 },
                CustomStep::NoteOn { note: 36, velocity: 80 },
            ]))
        );
        assert!(swell.on_release.is_none());
    }

    #[test]
    fn test_out_of_range_step_values_are_rejected() {
        let toml = r#"
[gamepad]
BTN_SELECT = "bad"

[actions.bad]
press = [{ note_on = { note = 200, velocity = 200 } }]
"#;
        match PadConfig::from_toml(toml).unwrap_err() {
            Error::Config { message, .. } => {
                assert!(message.contains("action 'bad' press"));
                assert!(message.contains("note 200"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let toml = r#"
[actions.bad]
release = { control_change = { channel = 16, controller = 64, value = 127 } }
"#;
        match PadConfig::from_toml(toml).unwrap_err() {
            Error::Config { message, .. } => {
                assert!(message.contains("action 'bad' release"));
                assert!(message.contains("channel 16"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_out_of_range_step_in_file_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.toml");
        fs::write(
            &path,
            "[actions.swell]\npress = { control_change = { channel = 0, controller = 11, value = 255 } }\n",
        )
        .unwrap();

        match PadConfig::load(&path).unwrap_err() {
            Error::Config { path: reported, message } => {
                assert_eq!(reported, path);
                assert!(message.contains("value 255"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_config_actions_override_builtins() {
        let toml = r#"
[actions.sustain]
press = { control_change = { channel = 1, controller = 64, value = 100 } }
"#;
        let config = PadConfig::from_toml(toml).unwrap();
        let customs = config.custom_actions();
        let sustain = customs.get("sustain").unwrap();
        assert!(sustain.on_release.is_none());
        assert!(customs.contains("panic"));
    }

    #[test]
    fn test_notes_path_relative_to_config() {
        let config = PadConfig::default();
        assert_eq!(
            config.notes_path(Path::new("/home/me/pad/input.toml")),
            PathBuf::from("/home/me/pad/notes.json")
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.toml");
        fs::write(&path, "[gamepad]\nBTN_TR = \"sustain\"\n").unwrap();

        let config = PadConfig::load(&path).unwrap();
        assert_eq!(config.bindings, vec![Binding::new("BTN_TR", "sustain")]);

        let missing = PadConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(missing.is_startup());
    }
}
