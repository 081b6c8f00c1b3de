//! World configuration
//!
//! Immutable parameters handed to the integrator and the shape builder.
//! Fixed at initialization; JSON load/save is provided for hosts that keep
//! their own settings files.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};
use crate::vec2;

/// Arena and physics parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    // === Arena ===
    /// Grid cell size in world units (gizmos snap to cell centers)
    pub cell_size: f64,
    /// Arena width in cells
    pub cells_wide: u32,
    /// Arena height in cells
    pub cells_high: u32,

    // === Timing ===
    /// External timer period
    pub tick_ms: u32,
    /// Milliseconds in one simulation time unit
    pub ms_per_time_unit: f64,

    // === Ball ===
    pub ball_radius: f64,
    pub ball_start: DVec2,
    /// Velocity given on reset and after absorption
    pub launch_velocity: DVec2,

    // === Physics ===
    pub gravity: f64,
    /// Per-axis velocity multipliers
    pub friction: DVec2,
    /// Collision lookahead (time units)
    pub lookahead: f64,
    /// Crash-movable knockback distance
    pub knockback_offset: f64,

    // === Flippers ===
    pub flipper_step_deg: f64,
    pub flipper_max_deg: f64,
    /// Editor rotate increment
    pub rotate_step_deg: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            cells_wide: CELLS_WIDE,
            cells_high: CELLS_HIGH,

            tick_ms: TICK_MS,
            ms_per_time_unit: MS_PER_TIME_UNIT,

            ball_radius: BALL_RADIUS,
            ball_start: vec2(BALL_START),
            launch_velocity: vec2(BALL_LAUNCH_VELOCITY),

            gravity: GRAVITY,
            friction: vec2(FRICTION),
            lookahead: LOOKAHEAD,
            knockback_offset: KNOCKBACK_OFFSET,

            flipper_step_deg: FLIPPER_STEP_DEG,
            flipper_max_deg: FLIPPER_MAX_DEG,
            rotate_step_deg: ROTATE_STEP_DEG,
        }
    }
}

impl WorldConfig {
    /// Frictionless, gravity-free world (handy for tests and demos)
    pub fn weightless() -> Self {
        Self {
            gravity: 0.0,
            friction: DVec2::ONE,
            ..Self::default()
        }
    }

    /// Arena width in world units
    #[inline]
    pub fn width(&self) -> f64 {
        self.cell_size * self.cells_wide as f64
    }

    /// Arena height in world units
    #[inline]
    pub fn height(&self) -> f64 {
        self.cell_size * self.cells_high as f64
    }

    /// Flipper roller radius (a tenth of a cell)
    #[inline]
    pub fn roller_radius(&self) -> f64 {
        self.cell_size / 10.0
    }

    /// Simulation time elapsed for a timer interval
    #[inline]
    pub fn dt_for(&self, elapsed_ms: u32) -> f64 {
        elapsed_ms as f64 / self.ms_per_time_unit
    }

    /// Check parameters the core divides by or clamps against
    pub fn validate(&self) -> SimResult<()> {
        if self.cell_size <= 0.0 {
            return Err(SimError::Config("cell_size must be positive".into()));
        }
        if self.cells_wide == 0 || self.cells_high == 0 {
            return Err(SimError::Config("arena must be at least one cell".into()));
        }
        if self.ms_per_time_unit <= 0.0 {
            return Err(SimError::Config("ms_per_time_unit must be positive".into()));
        }
        if self.ball_radius <= 0.0
            || 2.0 * self.ball_radius > self.width().min(self.height())
        {
            return Err(SimError::Config("ball does not fit in the arena".into()));
        }
        if !(0.0..=360.0).contains(&self.flipper_max_deg) {
            return Err(SimError::Config("flipper_max_deg out of range".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON config (missing fields take defaults)
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "Loaded world config: {}x{} cells of {}",
            config.cells_wide,
            config.cells_high,
            config.cell_size
        );
        Ok(config)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
