//! Gizmoball - geometry and physics core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (boundaries, integration, collisions)
//! - `settings`: World configuration (arena size, tick period, physics constants)
//! - `error`: Error taxonomy for configuration failures

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{SimError, SimResult};
pub use settings::WorldConfig;

use glam::DVec2;

/// Default world constants
pub mod consts {
    /// Side length of one grid cell in world units
    pub const CELL_SIZE: f64 = 20.0;
    /// Arena size in cells
    pub const CELLS_WIDE: u32 = 20;
    pub const CELLS_HIGH: u32 = 20;

    /// Timer period (25 frames per second)
    pub const TICK_MS: u32 = 1000 / 25;
    /// Milliseconds per simulation time unit (velocities are units per time unit)
    pub const MS_PER_TIME_UNIT: f64 = 100.0;

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 6.0;
    pub const BALL_START: (f64, f64) = (10.0, 10.0);
    pub const BALL_LAUNCH_VELOCITY: (f64, f64) = (5.0, 0.0);
    /// Where an absorbed ball is parked (outside the arena)
    pub const BALL_REMOVED_POS: (f64, f64) = (-100.0, -100.0);

    /// Downward acceleration (units per time unit²)
    pub const GRAVITY: f64 = 5.0;
    /// Per-axis velocity multiplier applied every tick (1.0 = frictionless)
    pub const FRICTION: (f64, f64) = (1.0, 1.0);

    /// Time-to-impact at or below which a contact counts as "now"
    pub const LOOKAHEAD: f64 = 0.5;
    /// Distance a crash-movable gizmo is pushed on each axis when struck
    pub const KNOCKBACK_OFFSET: f64 = 20.0;

    /// Flipper actuation per tick while held (degrees)
    pub const FLIPPER_STEP_DEG: f64 = 5.0;
    pub const FLIPPER_MAX_DEG: f64 = 90.0;

    /// Rotation applied by one editor "rotate" action (degrees)
    pub const ROTATE_STEP_DEG: i32 = 90;
}

/// Axis-aligned rectangle used for repaint regions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Square box around a circle
    pub fn around_circle(center: DVec2, radius: f64) -> Self {
        let half = DVec2::splat(radius);
        Self::new(center - half, center + half)
    }

    pub fn grow(&self, amount: f64) -> Self {
        let d = DVec2::splat(amount);
        Self::new(self.min - d, self.max + d)
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Convert a (x, y) tuple constant to a vector
#[inline]
pub fn vec2(xy: (f64, f64)) -> DVec2 {
    DVec2::new(xy.0, xy.1)
}
