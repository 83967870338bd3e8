//! Device layer: the uniform stick contract and its gilrs backing.
//!
//! Every logical stick the normalizer can query (either dedicated joystick,
//! either half of a gamepad) implements [`StickSource`]. Which physical
//! gamepad and which axis pair back a given view is wiring, decided here at
//! construction time and nowhere else.
//!
//! Reads never fail: a disconnected or missing device reports centered sticks
//! and released buttons, so the normalizer above never sees a fault.

use gilrs::{Axis, Button, Event, EventType, Gilrs};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::input::vector::SwerveVector;

/// Which of the two sticks on a gamepad is being addressed.
///
/// Irrelevant in dual-joystick mode, where device identity already encodes
/// the side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

// Device errors
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Failed to initialize device layer: {0}")]
    InitializationError(String),
}

/// Uniform contract of one logical stick.
///
/// `raw_x`/`raw_y` report the stick position in [-1, 1]. Magnitude and
/// direction are derived through [`SwerveVector`], so every implementation
/// shares the exact same math and angle normalization. Values outside the
/// nominal range are passed through unmodified; range enforcement is the
/// physical device's concern.
pub trait StickSource {
    /// Raw X axis value of this stick.
    fn raw_x(&self) -> f64;

    /// Raw Y axis value of this stick.
    fn raw_y(&self) -> f64;

    /// Whether the raw button with the given index is currently held.
    fn button_held(&self, index: u32) -> bool;

    /// Whether the gear-shift control bound to this stick is currently held.
    ///
    /// On a gamepad view this is the right bumper; on a dedicated joystick it
    /// is a configured raw button.
    fn shift_held(&self) -> bool;

    /// Magnitude of the stick's position vector, without any deadband.
    fn magnitude(&self) -> f64 {
        SwerveVector::new(self.raw_x(), self.raw_y()).mag()
    }

    /// Direction of the stick's position vector in degrees, [0, 360).
    fn direction_degrees(&self) -> f64 {
        SwerveVector::new(self.raw_x(), self.raw_y()).angle_degrees()
    }

    /// Direction of the stick's position vector in radians, [0, 2*PI).
    fn direction_radians(&self) -> f64 {
        SwerveVector::new(self.raw_x(), self.raw_y()).angle_radians()
    }
}

/// Shared gilrs context behind all gilrs-backed stick views.
///
/// gilrs only updates its cached gamepad state while events are being
/// drained, so the owning loop must call [`GilrsHub::pump`] once per cycle
/// before querying any stick.
#[derive(Clone)]
pub struct GilrsHub {
    gilrs: Arc<Mutex<Gilrs>>,
}

impl GilrsHub {
    pub fn new() -> Result<Self, DeviceError> {
        info!("Initializing gilrs device layer");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                return Err(DeviceError::InitializationError(e.to_string()));
            }
        };

        let hub = Self {
            gilrs: Arc::new(Mutex::new(gilrs)),
        };
        hub.log_connected_devices();
        Ok(hub)
    }

    fn log_connected_devices(&self) {
        let Ok(gilrs) = self.gilrs.lock() else {
            return;
        };
        let count = gilrs.gamepads().count();
        if count == 0 {
            warn!("No input device connected, sticks will read centered");
        } else {
            info!("Found {} input devices:", count);
            for (idx, (id, gamepad)) in gilrs.gamepads().enumerate() {
                info!(
                    "  [{}] ID: {}, Name: {}, UUID: {:?}",
                    idx,
                    id,
                    gamepad.name(),
                    gamepad.uuid()
                );
            }
        }
    }

    /// Drains pending gilrs events so that subsequent state reads are
    /// current. Called once per control cycle by the teleop loop.
    pub fn pump(&self) {
        let Ok(mut gilrs) = self.gilrs.lock() else {
            return;
        };
        while let Some(Event { id, event, .. }) = gilrs.next_event() {
            match event {
                EventType::Connected => {
                    info!("Input device {} connected", id);
                }
                EventType::Disconnected => {
                    warn!("Input device {} disconnected, reads fall back to zero", id);
                }
                _ => {
                    debug!("Device {} event: {:?}", id, event);
                }
            }
        }
    }

    /// Reads an axis of the nth connected device, 0.0 when absent.
    fn axis_value(&self, index: usize, axis: Axis) -> f64 {
        let Ok(gilrs) = self.gilrs.lock() else {
            return 0.0;
        };
        match gilrs.gamepads().nth(index) {
            Some((_, gamepad)) => gamepad.value(axis) as f64,
            None => 0.0,
        }
    }

    /// Reads a button of the nth connected device, false when absent.
    fn button_value(&self, index: usize, button: Button) -> bool {
        let Ok(gilrs) = self.gilrs.lock() else {
            return false;
        };
        match gilrs.gamepads().nth(index) {
            Some((_, gamepad)) => gamepad.is_pressed(button),
            None => false,
        }
    }
}

/// Gear-shift binding of one stick view.
#[derive(Debug, Clone, Copy)]
enum ShiftControl {
    /// Raw button on the same device (dedicated joystick wiring).
    RawButton(u32),
    /// Right bumper of the gamepad (gamepad wiring).
    RightBumper,
}

/// One gilrs-backed logical stick: an axis pair plus button access on a
/// device addressed by its connection index.
pub struct GilrsStick {
    hub: GilrsHub,
    index: usize,
    x_axis: Axis,
    y_axis: Axis,
    shift: ShiftControl,
}

impl GilrsStick {
    /// View of a dedicated single-stick joystick. Such devices report their
    /// stick on the left-stick axis pair.
    pub fn joystick(hub: &GilrsHub, index: usize, shift_button: u32) -> Self {
        Self {
            hub: hub.clone(),
            index,
            x_axis: Axis::LeftStickX,
            y_axis: Axis::LeftStickY,
            shift: ShiftControl::RawButton(shift_button),
        }
    }

    /// View of one half of a dual-stick gamepad.
    pub fn pad_stick(hub: &GilrsHub, index: usize, side: Side) -> Self {
        let (x_axis, y_axis) = match side {
            Side::Left => (Axis::LeftStickX, Axis::LeftStickY),
            Side::Right => (Axis::RightStickX, Axis::RightStickY),
        };
        Self {
            hub: hub.clone(),
            index,
            x_axis,
            y_axis,
            shift: ShiftControl::RightBumper,
        }
    }
}

impl StickSource for GilrsStick {
    fn raw_x(&self) -> f64 {
        self.hub.axis_value(self.index, self.x_axis)
    }

    fn raw_y(&self) -> f64 {
        self.hub.axis_value(self.index, self.y_axis)
    }

    fn button_held(&self, index: u32) -> bool {
        match button_from_index(index) {
            Some(button) => self.hub.button_value(self.index, button),
            None => {
                debug!("Unmapped raw button index {}", index);
                false
            }
        }
    }

    fn shift_held(&self) -> bool {
        match self.shift {
            ShiftControl::RawButton(index) => self.button_held(index),
            // gilrs calls the bumpers "triggers"; RightTrigger is the bumper,
            // RightTrigger2 the analog trigger below it.
            ShiftControl::RightBumper => self.hub.button_value(self.index, Button::RightTrigger),
        }
    }
}

// Raw joystick button numbering starts at 1 on the trigger, as on the
// physical sticks this was wired for.
fn button_from_index(index: u32) -> Option<Button> {
    match index {
        1 => Some(Button::South),
        2 => Some(Button::East),
        3 => Some(Button::West),
        4 => Some(Button::North),
        5 => Some(Button::LeftTrigger),
        6 => Some(Button::RightTrigger),
        _ => None,
    }
}
