//! Deterministic simulation module
//!
//! Geometry, collision and integration for the gizmo board:
//! - Fixed timer interval, scaled into simulation time units
//! - Stable iteration order (gizmo list order)
//! - Seeded RNG only (layouts)
//! - No rendering or platform dependencies

pub mod angle;
pub mod arc;
pub mod collision;
pub mod gizmo;
pub mod layout;
pub mod registry;
pub mod segment;
pub mod shape;
pub mod state;
pub mod tick;

pub use angle::{Angle, rotate_around};
pub use arc::CornerArc;
pub use collision::{
    CollisionInfo, Contact, detect_collision, reflect_off_circle, reflect_off_contact,
    reflect_off_segment, reflect_velocity, time_until_circle_collision,
    time_until_segment_collision,
};
pub use gizmo::{FlipperActuation, Gizmo};
pub use layout::scatter;
pub use segment::LineSegment;
pub use shape::{Boundary, Pose, ShapeKind, build_boundary};
pub use state::{Ball, BallState, Simulation};
pub use tick::{CollisionOutcome, CollisionReport, Knockback, integrate, resolve_collision, tick};
