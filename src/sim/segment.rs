//! Flat boundary edges

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::angle::{Angle, rotate_around};

/// A line segment between two endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub p1: DVec2,
    pub p2: DVec2,
}

impl LineSegment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::from_points(DVec2::new(x1, y1), DVec2::new(x2, y2))
    }

    pub fn from_points(p1: DVec2, p2: DVec2) -> Self {
        Self { p1, p2 }
    }

    /// Vector from p1 to p2
    #[inline]
    pub fn direction(&self) -> DVec2 {
        self.p2 - self.p1
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// Unit normal (left of p1 → p2). Zero for a degenerate segment.
    pub fn normal(&self) -> DVec2 {
        self.direction().perp().normalize_or_zero()
    }

    pub fn midpoint(&self) -> DVec2 {
        (self.p1 + self.p2) * 0.5
    }

    /// Closest point on the segment to `p`
    pub fn closest_point(&self, p: DVec2) -> DVec2 {
        let dir = self.direction();
        let len_sq = dir.length_squared();
        if len_sq < 1e-12 {
            return self.p1;
        }
        let t = ((p - self.p1).dot(dir) / len_sq).clamp(0.0, 1.0);
        self.p1 + dir * t
    }

    /// Euclidean distance from `p` to the segment
    pub fn distance_to(&self, p: DVec2) -> f64 {
        (p - self.closest_point(p)).length()
    }

    pub fn rotate_around(&self, pivot: DVec2, angle: Angle) -> Self {
        Self::from_points(
            rotate_around(self.p1, pivot, angle),
            rotate_around(self.p2, pivot, angle),
        )
    }
}
