//! Drive subsystem: the command contract consumed by the drivetrain.
//!
//! 1. [`teleop`] - Fixed-period polling loop publishing [`DriveCommand`]s
//!
//! # Architecture
//!
//! ```text
//! SwerveController ──► TeleopLoop ──► watch<DriveCommand> ──► drivetrain
//!                      (per cycle)
//! ```
//!
//! Kinematics (wheel speeds and module angles) live on the consuming side of
//! the watch channel; this subsystem only shapes the command.

pub mod teleop;

pub use teleop::{TeleopError, TeleopHandle, TeleopSettings};

use chrono::{DateTime, Local};

use crate::input::SwerveVector;

/// One cycle's worth of normalized pilot intent.
#[derive(Clone, Debug)]
pub enum DriveCommand {
    /// Halo Drive: translate along `velocity`, turn at `rotation_rate`.
    Halo {
        velocity: SwerveVector,
        rotation_rate: f64,
        high_gear: bool,
        timestamp: DateTime<Local>,
    },
    /// Angle Drive: translate along `velocity`, face `heading_degrees`.
    Angle {
        velocity: SwerveVector,
        heading_degrees: f64,
        high_gear: bool,
        timestamp: DateTime<Local>,
    },
}

impl Default for DriveCommand {
    fn default() -> Self {
        Self::Halo {
            velocity: SwerveVector::default(),
            rotation_rate: 0.0,
            high_gear: true,
            timestamp: Local::now(),
        }
    }
}

impl DriveCommand {
    pub fn velocity(&self) -> SwerveVector {
        match self {
            Self::Halo { velocity, .. } | Self::Angle { velocity, .. } => *velocity,
        }
    }

    pub fn high_gear(&self) -> bool {
        match self {
            Self::Halo { high_gear, .. } | Self::Angle { high_gear, .. } => *high_gear,
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        match self {
            Self::Halo { timestamp, .. } | Self::Angle { timestamp, .. } => *timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_command_is_neutral_high_gear() {
        let command = DriveCommand::default();
        assert_eq!(command.velocity().mag(), 0.0);
        assert!(command.high_gear());
        match command {
            DriveCommand::Halo { rotation_rate, .. } => assert_eq!(rotation_rate, 0.0),
            DriveCommand::Angle { .. } => panic!("default command should be Halo"),
        }
    }
}
