//! Input subsystem: stick reading and normalization.
//!
//! 1. [`device`] - Uniform stick contract and its gilrs backing
//! 2. [`vector`] - Stick vector math and angle normalization
//! 3. [`normalizer`] - Deadband filtering and drive-scheme queries
//!
//! # Architecture
//!
//! ```text
//! Gamepad/Joysticks ──► StickSource views ──► SwerveController
//!                       (raw axes)            (deadbanded queries)
//! ```
//!
//! The normalizer is a stateless view over live device state: every query
//! re-reads the sticks, nothing is cached between cycles.

pub mod device;
pub mod normalizer;
pub mod vector;

// Re-export types that need to be public
pub use device::{DeviceError, GilrsHub, GilrsStick, Side, StickSource};
pub use normalizer::{ControlScheme, InputSource, SwerveController, DEADBAND};
pub use vector::SwerveVector;
