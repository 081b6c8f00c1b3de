//! Static gizmo registry
//!
//! Maps the tags used by editors and layout files to constructors.

use super::gizmo::Gizmo;
use super::shape::{Pose, ShapeKind};
use crate::error::{SimError, SimResult};

/// Builds a gizmo with the given id and pose
pub type Constructor = fn(u32, Pose) -> Gizmo;

const REGISTRY: &[(&str, Constructor)] = &[
    ("square", square),
    ("l-shape", l_shape),
    ("trapezoid", trapezoid),
    ("left-flipper", left_flipper),
    ("right-flipper", right_flipper),
    ("absorber", absorber),
];

fn square(id: u32, pose: Pose) -> Gizmo {
    Gizmo::new(id, ShapeKind::Square, pose)
}

fn l_shape(id: u32, pose: Pose) -> Gizmo {
    Gizmo::new(id, ShapeKind::LShape, pose)
}

fn trapezoid(id: u32, pose: Pose) -> Gizmo {
    Gizmo::new(id, ShapeKind::Trapezoid, pose)
}

fn left_flipper(id: u32, pose: Pose) -> Gizmo {
    Gizmo::new(id, ShapeKind::LeftFlipper, pose)
}

fn right_flipper(id: u32, pose: Pose) -> Gizmo {
    Gizmo::new(id, ShapeKind::RightFlipper, pose)
}

// Square outline that swallows the ball
fn absorber(id: u32, pose: Pose) -> Gizmo {
    Gizmo::new(id, ShapeKind::Square, pose).with_absorbing(true)
}

/// Find the constructor for a tag (case-insensitive)
pub fn lookup(tag: &str) -> SimResult<Constructor> {
    let key = tag.trim().to_lowercase();
    REGISTRY
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, constructor)| *constructor)
        .ok_or_else(|| SimError::UnknownGizmoKind(tag.to_string()))
}

/// Construct a gizmo from a tag
pub fn construct(tag: &str, id: u32, pose: Pose) -> SimResult<Gizmo> {
    lookup(tag).map(|constructor| constructor(id, pose))
}

/// All registered tags, in registry order
pub fn tags() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}
