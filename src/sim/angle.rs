//! Angles and rotation about a pivot
//!
//! An angle caches its cosine and sine. The eight canonical gizmo orientations
//! carry exact values so rotated templates land on exact coordinates.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use crate::error::{SimError, SimResult};

/// A rotation amount in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angle {
    radians: f64,
    cos: f64,
    sin: f64,
}

impl Angle {
    pub const ZERO: Angle = Angle::exact(0.0, 1.0, 0.0);
    pub const DEG_45: Angle = Angle::exact(FRAC_PI_4, FRAC_1_SQRT_2, FRAC_1_SQRT_2);
    pub const DEG_90: Angle = Angle::exact(2.0 * FRAC_PI_4, 0.0, 1.0);
    pub const DEG_135: Angle = Angle::exact(3.0 * FRAC_PI_4, -FRAC_1_SQRT_2, FRAC_1_SQRT_2);
    pub const DEG_180: Angle = Angle::exact(4.0 * FRAC_PI_4, -1.0, 0.0);
    pub const DEG_225: Angle = Angle::exact(5.0 * FRAC_PI_4, -FRAC_1_SQRT_2, -FRAC_1_SQRT_2);
    pub const DEG_270: Angle = Angle::exact(6.0 * FRAC_PI_4, 0.0, -1.0);
    pub const DEG_315: Angle = Angle::exact(7.0 * FRAC_PI_4, FRAC_1_SQRT_2, -FRAC_1_SQRT_2);

    /// The eight canonical orientations, indexed by degree / 45
    pub const CANONICAL: [Angle; 8] = [
        Angle::ZERO,
        Angle::DEG_45,
        Angle::DEG_90,
        Angle::DEG_135,
        Angle::DEG_180,
        Angle::DEG_225,
        Angle::DEG_270,
        Angle::DEG_315,
    ];

    const fn exact(radians: f64, cos: f64, sin: f64) -> Self {
        Self { radians, cos, sin }
    }

    pub fn from_radians(radians: f64) -> Self {
        Self {
            radians,
            cos: radians.cos(),
            sin: radians.sin(),
        }
    }

    /// Arbitrary angle (flipper actuation)
    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    /// Canonical gizmo orientation for a pose degree.
    ///
    /// The degree is reduced modulo 360 first; anything that is not a
    /// multiple of 45 is rejected.
    pub fn canonical(degree: i32) -> SimResult<Self> {
        let reduced = degree.rem_euclid(360);
        if reduced % 45 != 0 {
            return Err(SimError::UnsupportedOrientation { degree });
        }
        Ok(Self::CANONICAL[(reduced / 45) as usize])
    }

    #[inline]
    pub fn radians(&self) -> f64 {
        self.radians
    }

    #[inline]
    pub fn degrees(&self) -> f64 {
        self.radians.to_degrees()
    }

    #[inline]
    pub fn cos(&self) -> f64 {
        self.cos
    }

    #[inline]
    pub fn sin(&self) -> f64 {
        self.sin
    }

    /// Same magnitude, opposite direction
    pub fn negate(&self) -> Self {
        Self::exact(-self.radians, self.cos, -self.sin)
    }

    /// Rotate a direction vector about the origin
    #[inline]
    pub fn rotate_vec(&self, v: DVec2) -> DVec2 {
        DVec2::new(v.x * self.cos - v.y * self.sin, v.x * self.sin + v.y * self.cos)
    }
}

/// Rotate `p` counter-clockwise by `angle` about `pivot`
#[inline]
pub fn rotate_around(p: DVec2, pivot: DVec2, angle: Angle) -> DVec2 {
    pivot + angle.rotate_vec(p - pivot)
}
