// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Gamepad input via gilrs.
//!
//! gilrs merges every connected pad into one ordered event queue. Buttons
//! are reported with evdev-style names (`BTN_SOUTH`, `BTN_TR`, ...); axes
//! become `ABS_*` inputs that press when their magnitude crosses a
//! threshold and release when it falls back.

use std::collections::HashMap;

use gilrs::{Axis, Button, EventType, Gilrs};
use tracing::{debug, info, warn};

use super::{ControllerEvent, EventSource};
use crate::error::{Error, Result};

/// Axis magnitude at which an axis counts as pressed
pub const DEFAULT_AXIS_THRESHOLD: f32 = 0.5;

/// evdev-style name for a gamepad button
pub fn button_id(button: Button) -> Option<&'static str> {
    let id = match button {
        Button::South => "BTN_SOUTH",
        Button::East => "BTN_EAST",
        Button::North => "BTN_NORTH",
        Button::West => "BTN_WEST",
        Button::C => "BTN_C",
        Button::Z => "BTN_Z",
        Button::LeftTrigger => "BTN_TL",
        Button::LeftTrigger2 => "BTN_TL2",
        Button::RightTrigger => "BTN_TR",
        Button::RightTrigger2 => "BTN_TR2",
        Button::Select => "BTN_SELECT",
        Button::Start => "BTN_START",
        Button::Mode => "BTN_MODE",
        Button::LeftThumb => "BTN_THUMBL",
        Button::RightThumb => "BTN_THUMBR",
        Button::DPadUp => "BTN_DPAD_UP",
        Button::DPadDown => "BTN_DPAD_DOWN",
        Button::DPadLeft => "BTN_DPAD_LEFT",
        Button::DPadRight => "BTN_DPAD_RIGHT",
        _ => return None,
    };
    Some(id)
}

/// evdev-style name for a gamepad axis
pub fn axis_id(axis: Axis) -> Option<&'static str> {
    let id = match axis {
        Axis::LeftStickX => "ABS_X",
        Axis::LeftStickY => "ABS_Y",
        Axis::LeftZ => "ABS_Z",
        Axis::RightStickX => "ABS_RX",
        Axis::RightStickY => "ABS_RY",
        Axis::RightZ => "ABS_RZ",
        Axis::DPadX => "ABS_HAT0X",
        Axis::DPadY => "ABS_HAT0Y",
        _ => return None,
    };
    Some(id)
}

/// Turns continuous axis values into press/release transitions
#[derive(Debug, Clone)]
pub struct AxisLatch {
    threshold: f32,
    held: HashMap<&'static str, bool>,
}

impl AxisLatch {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.abs(),
            held: HashMap::new(),
        }
    }

    /// Feed a new axis value; returns an event only when the state flips
    pub fn update(&mut self, input_id: &'static str, value: f32) -> Option<ControllerEvent> {
        let pressed = value.abs() >= self.threshold;
        let was_pressed = self.held.insert(input_id, pressed).unwrap_or(false);
        if pressed == was_pressed {
            return None;
        }
        Some(ControllerEvent::new(input_id, pressed))
    }
}

impl Default for AxisLatch {
    fn default() -> Self {
        Self::new(DEFAULT_AXIS_THRESHOLD)
    }
}

/// Translate one gilrs event into a controller event
pub fn translate(latch: &mut AxisLatch, event: EventType) -> Option<ControllerEvent> {
    match event {
        EventType::ButtonPressed(button, _) => button_id(button).map(ControllerEvent::press),
        EventType::ButtonReleased(button, _) => button_id(button).map(ControllerEvent::release),
        EventType::AxisChanged(axis, value, _) => {
            axis_id(axis).and_then(|id| latch.update(id, value))
        }
        _ => None,
    }
}

/// Event source reading every connected gamepad
pub struct GamepadSource {
    gilrs: Gilrs,
    latch: AxisLatch,
}

impl GamepadSource {
    /// Open the gamepad subsystem.
    ///
    /// Fails with `Error::DeviceUnavailable` when the platform backend cannot
    /// be initialised or no gamepad is connected.
    pub fn new(axis_threshold: f32) -> Result<Self> {
        let gilrs = Gilrs::new()
            .map_err(|e| Error::DeviceUnavailable(format!("gamepad backend: {}", e)))?;

        let mut connected = 0;
        for (id, gamepad) in gilrs.gamepads() {
            info!("gamepad {:?}: {}", id, gamepad.name());
            connected += 1;
        }
        if connected == 0 {
            return Err(Error::DeviceUnavailable("no gamepad connected".to_string()));
        }

        Ok(Self {
            gilrs,
            latch: AxisLatch::new(axis_threshold),
        })
    }

    fn accept(&mut self, event: gilrs::Event) -> Option<ControllerEvent> {
        match event.event {
            EventType::Disconnected => {
                warn!("gamepad {:?} disconnected", event.id);
                None
            }
            EventType::Connected => {
                debug!("gamepad {:?} connected", event.id);
                None
            }
            other => translate(&mut self.latch, other),
        }
    }
}

impl EventSource for GamepadSource {
    fn read_batch(&mut self) -> Result<Option<Vec<ControllerEvent>>> {
        let mut batch = Vec::new();

        while batch.is_empty() {
            let first = match self.gilrs.next_event_blocking(None) {
                Some(event) => event,
                None => return Ok(None),
            };
            batch.extend(self.accept(first));

            while let Some(event) = self.gilrs.next_event() {
                batch.extend(self.accept(event));
            }
        }

        Ok(Some(batch))
    }
}

/// List connected gamepads as (index, name) tuples
pub fn list_gamepads() -> Result<Vec<(usize, String)>> {
    let gilrs = Gilrs::new()
        .map_err(|e| Error::DeviceUnavailable(format!("gamepad backend: {}", e)))?;
    Ok(gilrs
        .gamepads()
        .map(|(id, gamepad)| (usize::from(id), gamepad.name().to_string()))
        .collect())
}
