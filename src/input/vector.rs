//! 2-D stick vector with Cartesian and polar views.
//!
//! Angle convention: 0 degrees is forward and angles grow clockwise, matching
//! the sticks' native reporting. Every direction-returning operation in this
//! crate goes through [`SwerveVector::angle_degrees`] /
//! [`SwerveVector::angle_radians`], so the normalization into [0, 360) and
//! [0, 2*PI) lives in exactly one place.

/// Direction vector formed by a stick's current position relative to its
/// origin.
///
/// Components are stored Cartesian; magnitude and angle are derived on read,
/// so the two views can never disagree.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwerveVector {
    x: f64,
    y: f64,
}

impl SwerveVector {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Magnitude of the vector, `hypot(x, y)`.
    pub fn mag(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Direction in degrees, normalized into [0, 360).
    pub fn angle_degrees(&self) -> f64 {
        normalize_degrees(self.y.atan2(self.x).to_degrees())
    }

    /// Direction in radians, normalized into [0, 2*PI).
    pub fn angle_radians(&self) -> f64 {
        normalize_radians(self.y.atan2(self.x))
    }

    /// Rescales the vector to the given magnitude.
    ///
    /// Only used to re-zero a vector after deadband filtering: setting
    /// magnitude 0 zeroes both components, and the angle of a zeroed vector
    /// reads 0 from then on.
    pub fn set_mag(&mut self, mag: f64) {
        let current = self.mag();
        if mag == 0.0 || current == 0.0 {
            self.x = 0.0;
            self.y = 0.0;
        } else {
            let scale = mag / current;
            self.x *= scale;
            self.y *= scale;
        }
    }
}

/// Normalizes an angle in degrees into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Normalizes an angle in radians into [0, 2*PI).
pub fn normalize_radians(radians: f64) -> f64 {
    radians.rem_euclid(std::f64::consts::TAU)
}
