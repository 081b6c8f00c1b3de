//! Gizmo entities: pose, capabilities and a lazily rebuilt boundary

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::shape::{Boundary, Pose, ShapeKind, build_boundary};
use crate::error::SimResult;
use crate::settings::WorldConfig;
use crate::Rect;

/// Live flipper swing, advanced once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlipperActuation {
    /// Current swing in degrees, clamped to [0, max]
    pub angle_deg: f64,
    /// Set by the input layer while the flip key is down
    pub held: bool,
}

impl FlipperActuation {
    /// Move one step toward max (held) or rest (released).
    /// Returns true if the angle changed.
    pub fn step(&mut self, step_deg: f64, max_deg: f64) -> bool {
        let before = self.angle_deg;
        self.angle_deg = if self.held {
            (self.angle_deg + step_deg).min(max_deg)
        } else {
            (self.angle_deg - step_deg).max(0.0)
        };
        self.angle_deg != before
    }
}

/// A gizmo entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gizmo {
    pub id: u32,
    pub kind: ShapeKind,
    pose: Pose,
    /// Knocked back when struck
    crash_movable: bool,
    /// Zeroes the ball's vertical velocity instead of reflecting
    tracking: bool,
    /// Removes the ball from play
    absorbing: bool,
    /// Present only for flipper kinds
    flipper: Option<FlipperActuation>,
    #[serde(skip)]
    boundary: Option<Boundary>,
}

impl Gizmo {
    pub fn new(id: u32, kind: ShapeKind, pose: Pose) -> Self {
        Self {
            id,
            kind,
            pose,
            crash_movable: false,
            tracking: false,
            absorbing: false,
            flipper: kind.is_flipper().then(FlipperActuation::default),
            boundary: None,
        }
    }

    /// Builder-style capability setters used by the registry
    pub fn with_absorbing(mut self, absorbing: bool) -> Self {
        self.absorbing = absorbing;
        self
    }

    pub fn with_crash_movable(mut self, crash_movable: bool) -> Self {
        self.crash_movable = crash_movable;
        self
    }

    pub fn with_tracking(mut self, tracking: bool) -> Self {
        self.set_tracking(tracking);
        self
    }

    // --- Accessors ---

    #[inline]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        self.pose.center
    }

    #[inline]
    pub fn half_extent(&self) -> f64 {
        self.pose.half_extent
    }

    #[inline]
    pub fn is_crash_movable(&self) -> bool {
        self.crash_movable
    }

    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    #[inline]
    pub fn is_absorbing(&self) -> bool {
        self.absorbing
    }

    #[inline]
    pub fn flipper(&self) -> Option<&FlipperActuation> {
        self.flipper.as_ref()
    }

    /// Bounding square of the pose (repaint region)
    pub fn bounding_box(&self) -> Rect {
        Rect::around_circle(self.pose.center, self.pose.half_extent)
    }

    // --- Boundary ---

    /// Boundary in world coordinates, rebuilt if the pose changed
    pub fn boundary(&mut self, config: &WorldConfig) -> SimResult<&Boundary> {
        if self.boundary.is_none() {
            self.rebuild(config)?;
        }
        Ok(&*self.boundary.get_or_insert_with(Boundary::default))
    }

    /// Last built boundary; `None` while dirty
    #[inline]
    pub fn cached_boundary(&self) -> Option<&Boundary> {
        self.boundary.as_ref()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.boundary.is_none()
    }

    /// Rebuild the boundary if dirty
    pub fn refresh(&mut self, config: &WorldConfig) -> SimResult<()> {
        if self.boundary.is_none() {
            self.rebuild(config)?;
        }
        Ok(())
    }

    fn rebuild(&mut self, config: &WorldConfig) -> SimResult<()> {
        let swing = self.flipper.map_or(0.0, |f| f.angle_deg);
        self.boundary = Some(build_boundary(self.kind, &self.pose, swing, config)?);
        Ok(())
    }

    #[inline]
    fn invalidate(&mut self) {
        self.boundary = None;
    }

    // --- Pose mutators ---

    pub fn set_position(&mut self, center: DVec2) {
        self.pose.center = center;
        self.invalidate();
    }

    pub fn set_half_extent(&mut self, half_extent: f64) {
        self.pose.half_extent = half_extent;
        self.invalidate();
    }

    /// Add to the static rotation; validated when the boundary is rebuilt
    pub fn rotate(&mut self, degrees: i32) {
        self.pose.degree = (self.pose.degree + degrees).rem_euclid(360);
        self.invalidate();
    }

    /// One editor rotate action
    pub fn rotate_step(&mut self, config: &WorldConfig) {
        self.rotate(config.rotate_step_deg);
    }

    pub fn set_crash_movable(&mut self, crash_movable: bool) {
        self.crash_movable = crash_movable;
        self.invalidate();
    }

    /// Flippers never track
    pub fn set_tracking(&mut self, tracking: bool) {
        self.tracking = tracking && !self.kind.is_flipper();
        self.invalidate();
    }

    /// Center this gizmo would take for a requested target: the target's
    /// grid cell center, clamped so the bounding square stays in the arena
    pub fn snapped_center(&self, target: DVec2, config: &WorldConfig) -> DVec2 {
        let r = self.pose.half_extent;
        let snap = |v: f64, bound: f64| {
            let cell = config.cell_size;
            let mut snapped = (v / cell).floor() * cell + cell / 2.0;
            if v >= bound - r {
                snapped = bound - r;
            }
            if v <= r {
                snapped = r;
            }
            snapped
        };
        DVec2::new(snap(target.x, config.width()), snap(target.y, config.height()))
    }

    /// Move to the snapped and clamped center for `target`
    pub fn move_to(&mut self, target: DVec2, config: &WorldConfig) {
        let center = self.snapped_center(target, config);
        self.set_position(center);
    }

    /// Grow by one cell; reverted if the bounding square would leave the arena
    pub fn make_larger(&mut self, config: &WorldConfig) -> bool {
        let r = self.pose.half_extent + config.cell_size;
        let c = self.pose.center;
        if c.x > config.width() - r || c.x < r || c.y > config.height() - r || c.y < r {
            return false;
        }
        self.set_half_extent(r);
        true
    }

    /// Shrink by one cell; refused if nothing would be left
    pub fn make_smaller(&mut self, config: &WorldConfig) -> bool {
        let r = self.pose.half_extent - config.cell_size;
        if r <= 0.0 {
            return false;
        }
        self.set_half_extent(r);
        true
    }

    /// Set the flip key state; no-op for non-flippers
    pub fn set_held(&mut self, held: bool) {
        if let Some(flipper) = self.flipper.as_mut() {
            flipper.held = held;
        }
    }

    /// Advance flipper actuation by one tick
    pub fn step_flipper(&mut self, config: &WorldConfig) {
        let changed = match self.flipper.as_mut() {
            Some(flipper) => flipper.step(config.flipper_step_deg, config.flipper_max_deg),
            None => false,
        };
        if changed {
            self.invalidate();
        }
    }
}
