//! Shape builder
//!
//! Turns a gizmo pose into world-space boundary primitives. Every shape kind
//! has a fixed template laid out unrotated around the pose center; the
//! template is rebuilt from scratch and rotated on every call so repeated
//! rebuilds never accumulate error.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::angle::Angle;
use super::arc::CornerArc;
use super::segment::LineSegment;
use crate::error::SimResult;
use crate::settings::WorldConfig;

/// Gizmo shape kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Square,
    LShape,
    Trapezoid,
    LeftFlipper,
    RightFlipper,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Square,
        ShapeKind::LShape,
        ShapeKind::Trapezoid,
        ShapeKind::LeftFlipper,
        ShapeKind::RightFlipper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Square => "square",
            ShapeKind::LShape => "l-shape",
            ShapeKind::Trapezoid => "trapezoid",
            ShapeKind::LeftFlipper => "left-flipper",
            ShapeKind::RightFlipper => "right-flipper",
        }
    }

    #[inline]
    pub fn is_flipper(&self) -> bool {
        matches!(self, ShapeKind::LeftFlipper | ShapeKind::RightFlipper)
    }

    /// (edges, corners) in this kind's template
    pub fn primitive_counts(&self) -> (usize, usize) {
        match self {
            ShapeKind::Square | ShapeKind::Trapezoid => (4, 4),
            ShapeKind::LShape => (6, 6),
            ShapeKind::LeftFlipper | ShapeKind::RightFlipper => (2, 2),
        }
    }
}

/// Logical placement of a gizmo
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Center of the gizmo's bounding square
    pub center: DVec2,
    /// Distance from center to the bounding square's edge
    pub half_extent: f64,
    /// Static rotation in degrees (must reduce to a multiple of 45)
    pub degree: i32,
}

impl Pose {
    pub fn new(x: f64, y: f64, half_extent: f64, degree: i32) -> Self {
        Self {
            center: DVec2::new(x, y),
            half_extent,
            degree,
        }
    }
}

/// The collidable outline of one gizmo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub segments: Vec<LineSegment>,
    pub corners: Vec<CornerArc>,
}

impl Boundary {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.corners.is_empty()
    }

    /// Total number of primitives
    pub fn len(&self) -> usize {
        self.segments.len() + self.corners.len()
    }

    fn rotate_around(&mut self, pivot: DVec2, angle: Angle) {
        for seg in &mut self.segments {
            *seg = seg.rotate_around(pivot, angle);
        }
        for corner in &mut self.corners {
            *corner = corner.rotate_around(pivot, angle);
        }
    }
}

/// Build the world-space boundary of a gizmo.
///
/// `actuation_deg` is the live flipper swing (ignored by non-flippers). It is
/// applied about the roller pivot after the pose rotation.
pub fn build_boundary(
    kind: ShapeKind,
    pose: &Pose,
    actuation_deg: f64,
    config: &WorldConfig,
) -> SimResult<Boundary> {
    let angle = Angle::canonical(pose.degree)?;
    let (x, y) = (pose.center.x, pose.center.y);
    let r = pose.half_extent;

    let mut boundary = match kind {
        ShapeKind::Square => square_template(x, y, r),
        ShapeKind::LShape => l_shape_template(x, y, r),
        ShapeKind::Trapezoid => trapezoid_template(x, y, r),
        ShapeKind::RightFlipper => flipper_template(x, y, r, config.roller_radius(), 1.0),
        ShapeKind::LeftFlipper => flipper_template(x, y, r, config.roller_radius(), -1.0),
    };
    boundary.rotate_around(pose.center, angle);

    if kind.is_flipper() && actuation_deg != 0.0 {
        let pivot = super::angle::rotate_around(
            flipper_pivot(kind, pose, config.roller_radius()),
            pose.center,
            angle,
        );
        let swing = Angle::from_degrees(actuation_deg);
        let swing = if kind == ShapeKind::LeftFlipper {
            swing.negate()
        } else {
            swing
        };
        boundary.rotate_around(pivot, swing);
    }

    log::trace!(
        "Built {} boundary at ({}, {}) r={} deg={}: {} primitives",
        kind.as_str(),
        x,
        y,
        r,
        pose.degree,
        boundary.len()
    );
    Ok(boundary)
}

/// Unrotated roller pivot of a flipper (top roller center)
pub fn flipper_pivot(kind: ShapeKind, pose: &Pose, roller: f64) -> DVec2 {
    let side = if kind == ShapeKind::LeftFlipper { -1.0 } else { 1.0 };
    let r = pose.half_extent;
    DVec2::new(pose.center.x + side * (r - roller), pose.center.y - r + roller)
}

fn square_template(x: f64, y: f64, r: f64) -> Boundary {
    Boundary {
        segments: vec![
            LineSegment::new(x - r, y - r, x + r, y - r),
            LineSegment::new(x - r, y - r, x - r, y + r),
            LineSegment::new(x - r, y + r, x + r, y + r),
            LineSegment::new(x + r, y - r, x + r, y + r),
        ],
        corners: vec![
            CornerArc::point(x - r, y - r),
            CornerArc::point(x - r, y + r),
            CornerArc::point(x + r, y + r),
            CornerArc::point(x + r, y - r),
        ],
    }
}

// Bounding square with its top-right quadrant cut away
fn l_shape_template(x: f64, y: f64, r: f64) -> Boundary {
    Boundary {
        segments: vec![
            LineSegment::new(x - r, y - r, x, y - r),
            LineSegment::new(x, y - r, x, y),
            LineSegment::new(x, y, x + r, y),
            LineSegment::new(x + r, y, x + r, y + r),
            LineSegment::new(x - r, y + r, x + r, y + r),
            LineSegment::new(x - r, y - r, x - r, y + r),
        ],
        corners: vec![
            CornerArc::point(x - r, y - r),
            CornerArc::point(x, y - r),
            CornerArc::point(x, y),
            CornerArc::point(x + r, y),
            CornerArc::point(x + r, y + r),
            CornerArc::point(x - r, y + r),
        ],
    }
}

fn trapezoid_template(x: f64, y: f64, r: f64) -> Boundary {
    let h = r / 2.0;
    Boundary {
        segments: vec![
            LineSegment::new(x - h, y - r, x + h, y - r),
            LineSegment::new(x + h, y - r, x + r, y + r),
            LineSegment::new(x + r, y + r, x - r, y + r),
            LineSegment::new(x - r, y + r, x - h, y - r),
        ],
        corners: vec![
            CornerArc::point(x - h, y - r),
            CornerArc::point(x + h, y - r),
            CornerArc::point(x + r, y + r),
            CornerArc::point(x - r, y + r),
        ],
    }
}

// Arm of width 2ρ hugging the right (side = 1) or left (side = -1) edge of the
// bounding square, capped by two rollers.
fn flipper_template(x: f64, y: f64, r: f64, roller: f64, side: f64) -> Boundary {
    let inner = x + side * (r - 2.0 * roller);
    let outer = x + side * r;
    let axis = x + side * (r - roller);
    let top = y - r + roller;
    let bottom = y + r - roller;
    Boundary {
        segments: vec![
            LineSegment::new(inner, top, inner, bottom),
            LineSegment::new(outer, top, outer, bottom),
        ],
        corners: vec![
            CornerArc::new(axis, top, roller),
            CornerArc::new(axis, bottom, roller),
        ],
    }
}
