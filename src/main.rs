// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use padmidi::config::PadConfig;
use padmidi::control::{Effect, Engine};
use padmidi::input::{list_gamepads, GamepadSource};
use padmidi::midi::{print_destinations, LogOutput, MidiOutput, MidirOutput, Outputs};
use padmidi::music::NoteData;

fn print_usage() {
    println!("padmidi - Game controller to MIDI mapper");
    println!();
    println!("Usage: padmidi [OPTIONS] [CONFIG]");
    println!();
    println!("Options:");
    println!("  --list-midi             List available MIDI destinations (outputs)");
    println!("  --list-gamepads         List connected game controllers");
    println!("  --check <CONFIG>        Load CONFIG, print the resolved mappings and exit");
    println!("  --dry-run               Log MIDI messages instead of sending them");
    println!("  --verbose               Log every dispatched event");
    println!("  --help                  Show this help message");
    println!();
    println!("CONFIG defaults to input.toml");
}

fn init_logging(verbose: bool) {
    let default = if verbose { "padmidi=debug" } else { "padmidi=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_engine(config_path: &Path) -> Result<(PadConfig, Engine)> {
    let config = PadConfig::load(config_path)
        .with_context(|| format!("Failed to load mappings: {:?}", config_path))?;

    let notes_path = config.notes_path(config_path);
    let data = NoteData::load(&notes_path)
        .with_context(|| format!("Failed to load note data: {:?}", notes_path))?;

    let engine = Engine::load(&config, data).context("Failed to build mapping table")?;
    Ok((config, engine))
}

fn describe(effect: Option<&Effect>) -> String {
    match effect {
        None => "-".to_string(),
        Some(Effect::Note { op, pitch }) => format!("{:?} {}", op, pitch),
        Some(Effect::Chord { op, pitches }) => format!("{:?} {:?}", op, pitches),
        Some(Effect::Custom(effect)) => format!("{:?}", effect),
    }
}

fn check(config_path: &Path) -> Result<()> {
    let (_, engine) = load_engine(config_path)?;

    let (lowest, highest) = match (engine.notes.iter().next(), engine.notes.iter().last()) {
        (Some((_, low)), Some((_, high))) => (low, high),
        _ => ("-", "-"),
    };
    println!(
        "{} note names ({} octave suffix), {} to {}; {} chords",
        engine.notes.len(),
        if engine.notes.has_octave_suffix() { "with" } else { "without" },
        lowest,
        highest,
        engine.chords.len()
    );
    println!();
    println!("{} bindings:", engine.table.len());
    for (input, action) in engine.table.sorted() {
        println!(
            "  {:<16} {:<16} {:?}  press: {}  release: {}",
            input,
            action.action,
            action.kind,
            describe(action.on_press.as_ref()),
            describe(action.on_release.as_ref())
        );
    }

    let warnings = engine.table.warnings();
    if !warnings.is_empty() {
        println!();
        println!("{} unresolved bindings:", warnings.len());
        for w in warnings {
            println!("  {} = {}", w.input_id, w.action);
        }
    }
    Ok(())
}

fn open_outputs(config: &PadConfig, dry_run: bool) -> Result<Outputs> {
    if dry_run {
        let names = if config.midi.outputs.is_empty() {
            vec!["dry-run".to_string()]
        } else {
            config.midi.outputs.clone()
        };
        return Ok(names
            .into_iter()
            .map(|name| Box::new(LogOutput::new(name)) as Box<dyn MidiOutput>)
            .collect());
    }

    if config.midi.outputs.is_empty() {
        bail!("No MIDI outputs configured; add [midi] outputs = [\"...\"] or use --dry-run");
    }

    let mut outputs: Outputs = Vec::new();
    for name in &config.midi.outputs {
        let output = MidirOutput::new_by_name(name)
            .with_context(|| format!("Failed to open MIDI output '{}'", name))?;
        info!(port = %output.name(), "MIDI output ready");
        outputs.push(Box::new(output));
    }
    Ok(outputs)
}

fn run(config_path: &Path, dry_run: bool) -> Result<()> {
    let (config, engine) = load_engine(config_path)?;
    for w in engine.table.warnings() {
        warn!("'{}' is bound to unknown action '{}'", w.input_id, w.action);
    }

    let outputs = open_outputs(&config, dry_run)?;
    let mut source = GamepadSource::new(config.input.axis_threshold)
        .context("Failed to open game controller")?;

    let mut dispatcher = engine.into_dispatcher(outputs);
    info!(
        outputs = dispatcher.output_count(),
        "listening for controller input (press Ctrl+C to stop)"
    );

    let stats = dispatcher.run(&mut source).context("Dispatch stopped")?;
    info!(events = stats.events, invoked = stats.invoked, "controller input ended");
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut dry_run = false;
    let mut verbose = false;
    let mut config_path: Option<PathBuf> = None;
    let mut check_only = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--list-midi" => {
                print_destinations();
                return Ok(());
            }
            "--list-gamepads" => {
                let gamepads = list_gamepads()?;
                if gamepads.is_empty() {
                    println!("No game controllers found.");
                } else {
                    println!("Connected game controllers:");
                    for (i, name) in gamepads {
                        println!("  {}: {}", i, name);
                    }
                }
                return Ok(());
            }
            "--check" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("--check requires a config file"))?;
                config_path = Some(PathBuf::from(path));
                check_only = true;
            }
            "--dry-run" => dry_run = true,
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                std::process::exit(1);
            }
            path => config_path = Some(PathBuf::from(path)),
        }
    }

    init_logging(verbose);
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("input.toml"));

    if check_only {
        check(&config_path)
    } else {
        run(&config_path, dry_run)
    }
}
