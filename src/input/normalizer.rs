//! Stick input normalization and drive-scheme selection.
//!
//! Two control schemes are supported:
//!
//! ```text
//! Halo Drive                        Angle Drive
//! left stick: movement              left stick: movement
//! right stick: rotation rate        right stick: robot heading
//!
//!      ^                                 ^               ^
//!      |                                 |               |
//!  <---+--->      <---+--->          <---+--->       <---+--->
//!      |                                 |               |
//!      v                                 v               v
//!   Movement       Rotation           Movement        Heading
//! ```
//!
//! The [`SwerveController`] answers the same queries no matter whether a
//! dual-stick gamepad or two dedicated joysticks are plugged in; the active
//! [`InputSource`] picks which device backs each logical side.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::device::{Side, StickSource};
use crate::input::vector::SwerveVector;

/// Minimum stick magnitude, as a fraction of full travel, below which input
/// is treated as zero. Hard cutoff: readings at or above it pass through
/// unmodified, with no rescaling.
pub const DEADBAND: f64 = 0.18;

/// How the rotation stick's output is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlScheme {
    /// Right stick sets the rate of turn.
    HaloDrive,
    /// Right stick sets an absolute target heading.
    AngleDrive,
}

/// Which physical devices back the logical left/right inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSource {
    /// Two dedicated single-stick joysticks, one per logical side.
    DualJoystick,
    /// One dual-stick gamepad, addressed by side.
    Gamepad,
}

/// Device-agnostic view over the pilot's sticks.
///
/// Owns all four stick views for the lifetime of the process and resolves
/// the active one per query through a single dispatch point, so switching
/// [`InputSource`] between two calls takes effect on the very next query.
/// Construction never fails: a missing device simply reads centered in the
/// device layer.
pub struct SwerveController {
    source: InputSource,
    scheme: ControlScheme,

    // Dedicated joysticks: movement on the left, rotation/heading on the
    // right.
    left_joystick: Box<dyn StickSource + Send>,
    right_joystick: Box<dyn StickSource + Send>,

    // The two halves of the combined gamepad.
    pad_left: Box<dyn StickSource + Send>,
    pad_right: Box<dyn StickSource + Send>,
}

impl SwerveController {
    pub fn new(
        left_joystick: Box<dyn StickSource + Send>,
        right_joystick: Box<dyn StickSource + Send>,
        pad_left: Box<dyn StickSource + Send>,
        pad_right: Box<dyn StickSource + Send>,
        source: InputSource,
        scheme: ControlScheme,
    ) -> Self {
        debug!(
            "Creating SwerveController with source {:?} and scheme {:?}",
            source, scheme
        );
        Self {
            source,
            scheme,
            left_joystick,
            right_joystick,
            pad_left,
            pad_right,
        }
    }

    pub fn source(&self) -> InputSource {
        self.source
    }

    /// Changes the backing device set. Takes effect on the next query.
    pub fn set_source(&mut self, source: InputSource) {
        self.source = source;
    }

    pub fn scheme(&self) -> ControlScheme {
        self.scheme
    }

    /// Changes the drive scheme. Takes effect on the next query.
    pub fn set_scheme(&mut self, scheme: ControlScheme) {
        self.scheme = scheme;
    }

    // The one place where InputSource and Side resolve to a device view.
    fn stick(&self, side: Side) -> &dyn StickSource {
        match (self.source, side) {
            (InputSource::DualJoystick, Side::Left) => self.left_joystick.as_ref(),
            (InputSource::DualJoystick, Side::Right) => self.right_joystick.as_ref(),
            (InputSource::Gamepad, Side::Left) => self.pad_left.as_ref(),
            (InputSource::Gamepad, Side::Right) => self.pad_right.as_ref(),
        }
    }

    /// Magnitude of the selected stick's position vector, deadband applied:
    /// readings below [`DEADBAND`] report exactly 0.
    pub fn magnitude(&self, side: Side) -> f64 {
        let value = self.stick(side).magnitude();
        if value < DEADBAND {
            0.0
        } else {
            value
        }
    }

    /// Direction of the selected stick in degrees, [0, 360). No deadband;
    /// callers combine with [`SwerveController::magnitude`] to suppress the
    /// noisy direction of a near-centered stick.
    pub fn direction_degrees(&self, side: Side) -> f64 {
        self.stick(side).direction_degrees()
    }

    /// Direction of the selected stick in radians, [0, 2*PI). No deadband.
    pub fn direction_radians(&self, side: Side) -> f64 {
        self.stick(side).direction_radians()
    }

    /// Rotation rate for Halo Drive: the rotation stick's raw X value.
    ///
    /// The deadband compares the signed value against the positive
    /// threshold, so every negative reading is zeroed along with small
    /// positive ones.
    pub fn halo_rotation_rate(&self) -> f64 {
        let value = self.stick(Side::Right).raw_x();
        if value < DEADBAND {
            0.0
        } else {
            value
        }
    }

    /// Velocity vector of the movement stick for Halo Drive.
    ///
    /// A vector below the deadband keeps its raw device reading but has its
    /// magnitude forced to 0.
    pub fn halo_velocity_vector(&self) -> SwerveVector {
        self.velocity_vector()
    }

    /// Target heading for Angle Drive: the heading stick's direction in
    /// degrees. No deadband; a centered stick resolves to 0.
    pub fn angle_drive_heading(&self) -> f64 {
        self.stick(Side::Right).direction_degrees()
    }

    /// Velocity vector of the movement stick for Angle Drive. Identical
    /// construction and deadband rule as [`SwerveController::halo_velocity_vector`];
    /// the movement input is scheme-independent.
    pub fn angle_velocity_vector(&self) -> SwerveVector {
        self.velocity_vector()
    }

    fn velocity_vector(&self) -> SwerveVector {
        let stick = self.stick(Side::Left);
        let mut value = SwerveVector::new(stick.raw_x(), stick.raw_y());

        if value.mag() < DEADBAND {
            value.set_mag(0.0);
        }

        value
    }

    /// Whether high gear is selected. High gear is the default; holding the
    /// shift control (gamepad right bumper, or button 2 on the movement
    /// joystick) selects low gear.
    pub fn high_gear_enabled(&self) -> bool {
        !self.stick(Side::Left).shift_held()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const EPSILON: f64 = 1e-9;

    #[derive(Debug, Default)]
    struct StubState {
        x: f64,
        y: f64,
        shift: bool,
    }

    // Settable stick for driving the controller from tests. Shared handle so
    // state can change between queries on the same controller.
    #[derive(Clone, Default)]
    struct StubStick(Arc<Mutex<StubState>>);

    impl StubStick {
        fn set(&self, x: f64, y: f64) {
            let mut state = self.0.lock().unwrap();
            state.x = x;
            state.y = y;
        }

        fn set_shift(&self, held: bool) {
            self.0.lock().unwrap().shift = held;
        }
    }

    impl StickSource for StubStick {
        fn raw_x(&self) -> f64 {
            self.0.lock().unwrap().x
        }

        fn raw_y(&self) -> f64 {
            self.0.lock().unwrap().y
        }

        fn button_held(&self, _index: u32) -> bool {
            self.0.lock().unwrap().shift
        }

        fn shift_held(&self) -> bool {
            self.0.lock().unwrap().shift
        }
    }

    struct Rig {
        controller: SwerveController,
        left_joystick: StubStick,
        right_joystick: StubStick,
        pad_left: StubStick,
        pad_right: StubStick,
    }

    fn rig(source: InputSource) -> Rig {
        let left_joystick = StubStick::default();
        let right_joystick = StubStick::default();
        let pad_left = StubStick::default();
        let pad_right = StubStick::default();
        let controller = SwerveController::new(
            Box::new(left_joystick.clone()),
            Box::new(right_joystick.clone()),
            Box::new(pad_left.clone()),
            Box::new(pad_right.clone()),
            source,
            ControlScheme::HaloDrive,
        );
        Rig {
            controller,
            left_joystick,
            right_joystick,
            pad_left,
            pad_right,
        }
    }

    #[test]
    fn magnitude_below_deadband_reads_zero() {
        let rig = rig(InputSource::Gamepad);
        rig.pad_left.set(0.1, 0.05);
        // hypot(0.1, 0.05) ~ 0.1118 < 0.18
        assert_eq!(rig.controller.magnitude(Side::Left), 0.0);
    }

    #[test]
    fn magnitude_at_deadband_passes_unmodified() {
        let rig = rig(InputSource::Gamepad);
        rig.pad_left.set(DEADBAND, 0.0);
        assert_eq!(rig.controller.magnitude(Side::Left), DEADBAND);

        rig.pad_left.set(0.17, 0.0);
        assert_eq!(rig.controller.magnitude(Side::Left), 0.0);
    }

    #[test]
    fn magnitude_above_deadband_is_raw_value() {
        let rig = rig(InputSource::Gamepad);
        rig.pad_left.set(0.6, 0.8);
        assert!((rig.controller.magnitude(Side::Left) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn direction_has_no_deadband() {
        let rig = rig(InputSource::Gamepad);
        rig.pad_right.set(0.0, 0.01);
        assert!((rig.controller.direction_degrees(Side::Right) - 90.0).abs() < EPSILON);
        assert!(
            (rig.controller.direction_radians(Side::Right) - std::f64::consts::FRAC_PI_2).abs()
                < EPSILON
        );
    }

    #[test]
    fn halo_and_angle_velocity_are_identical() {
        let rig = rig(InputSource::Gamepad);
        rig.pad_left.set(0.6, 0.8);
        let halo = rig.controller.halo_velocity_vector();
        let angle = rig.controller.angle_velocity_vector();
        assert_eq!(halo, angle);
        assert!((halo.mag() - 1.0).abs() < EPSILON);
        assert!((halo.angle_degrees() - 53.13010235415598).abs() < 1e-6);
    }

    #[test]
    fn deadbanded_velocity_zeros_vector_but_not_raw_reads() {
        let rig = rig(InputSource::Gamepad);
        rig.pad_left.set(0.1, 0.05);
        assert_eq!(rig.controller.halo_velocity_vector().mag(), 0.0);
        // The underlying device reading is untouched.
        assert_eq!(rig.pad_left.raw_x(), 0.1);
        assert_eq!(rig.pad_left.raw_y(), 0.05);
    }

    #[test]
    fn rotation_rate_deadband_compares_signed_value() {
        let rig = rig(InputSource::Gamepad);

        // Well above the threshold in magnitude, but negative: zeroed.
        rig.pad_right.set(-0.5, 0.0);
        assert_eq!(rig.controller.halo_rotation_rate(), 0.0);

        rig.pad_right.set(0.17, 0.0);
        assert_eq!(rig.controller.halo_rotation_rate(), 0.0);

        rig.pad_right.set(0.5, 0.0);
        assert_eq!(rig.controller.halo_rotation_rate(), 0.5);

        rig.pad_right.set(DEADBAND, 0.0);
        assert_eq!(rig.controller.halo_rotation_rate(), DEADBAND);
    }

    #[test]
    fn rotation_uses_dedicated_joystick_in_dual_mode() {
        let rig = rig(InputSource::DualJoystick);
        rig.right_joystick.set(0.5, 0.0);
        rig.pad_right.set(-0.5, 0.0);
        assert_eq!(rig.controller.halo_rotation_rate(), 0.5);
    }

    #[test]
    fn heading_resolves_without_deadband() {
        let rig = rig(InputSource::Gamepad);
        rig.pad_right.set(0.0, 0.05);
        assert!((rig.controller.angle_drive_heading() - 90.0).abs() < EPSILON);

        // Centered stick resolves to the default bearing.
        rig.pad_right.set(0.0, 0.0);
        assert_eq!(rig.controller.angle_drive_heading(), 0.0);
    }

    #[test]
    fn high_gear_is_negation_of_shift_state() {
        let mut rig = rig(InputSource::Gamepad);
        assert!(rig.controller.high_gear_enabled());
        rig.pad_left.set_shift(true);
        assert!(!rig.controller.high_gear_enabled());

        rig.controller.set_source(InputSource::DualJoystick);
        assert!(rig.controller.high_gear_enabled());
        rig.left_joystick.set_shift(true);
        assert!(!rig.controller.high_gear_enabled());
    }

    #[test]
    fn switching_source_rebinds_sticks_immediately() {
        let mut rig = rig(InputSource::Gamepad);
        rig.pad_left.set(0.6, 0.8);
        rig.left_joystick.set(0.0, 0.5);

        assert!((rig.controller.magnitude(Side::Left) - 1.0).abs() < EPSILON);

        rig.controller.set_source(InputSource::DualJoystick);
        assert!((rig.controller.magnitude(Side::Left) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn scheme_setter_takes_effect_immediately() {
        let mut rig = rig(InputSource::Gamepad);
        assert_eq!(rig.controller.scheme(), ControlScheme::HaloDrive);
        rig.controller.set_scheme(ControlScheme::AngleDrive);
        assert_eq!(rig.controller.scheme(), ControlScheme::AngleDrive);
    }
}
