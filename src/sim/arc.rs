//! Corner arcs
//!
//! A corner arc is a circle at a boundary vertex:
//! - radius 0: a sharp corner, only used for end-cap collision math
//! - radius > 0: a real curved surface (flipper roller)

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::angle::{Angle, rotate_around};

/// A stationary circle on a gizmo boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerArc {
    pub center: DVec2,
    pub radius: f64,
}

impl CornerArc {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            center: DVec2::new(x, y),
            radius: radius.max(0.0),
        }
    }

    /// Zero-radius corner
    pub fn point(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        self.radius == 0.0
    }

    /// Signed distance from `p` to the circle surface (negative inside)
    #[inline]
    pub fn distance_to(&self, p: DVec2) -> f64 {
        (p - self.center).length() - self.radius
    }

    /// Surface normal facing `p` (zero if `p` is the center)
    pub fn normal_toward(&self, p: DVec2) -> DVec2 {
        (p - self.center).normalize_or_zero()
    }

    /// Rotating moves the center; the radius is unchanged
    pub fn rotate_around(&self, pivot: DVec2, angle: Angle) -> Self {
        Self {
            center: rotate_around(self.center, pivot, angle),
            radius: self.radius,
        }
    }
}
