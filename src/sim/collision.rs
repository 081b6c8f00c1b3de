//! Collision detection and reflection
//!
//! Swept-circle tests against boundary primitives. All times are in
//! simulation time units (velocity is units per time unit) and are
//! `f64::INFINITY` when the ball will never touch the primitive.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::arc::CornerArc;
use super::gizmo::Gizmo;
use super::segment::LineSegment;
use super::state::Ball;

const EPS: f64 = 1e-12;

/// The primitive that was struck
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Contact {
    Segment(LineSegment),
    Corner(CornerArc),
}

/// Result of a successful detection pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// Position of the struck gizmo in the arena's gizmo list
    pub gizmo_index: usize,
    pub gizmo_id: u32,
    pub contact: Contact,
    /// Time until the ball touches the primitive (0 if already touching)
    pub time_to_impact: f64,
}

/// Time until a moving circle touches a stationary circle.
///
/// Returns 0 when the circles already overlap and the ball is approaching,
/// infinity when the ball is stationary or moving apart.
pub fn time_until_circle_collision(
    circle: &CornerArc,
    ball_center: DVec2,
    ball_radius: f64,
    velocity: DVec2,
) -> f64 {
    let rel = ball_center - circle.center;
    let reach = ball_radius + circle.radius;

    let a = velocity.length_squared();
    if a < EPS {
        return f64::INFINITY;
    }
    // Half of the usual b coefficient
    let b = rel.dot(velocity);
    if b >= 0.0 {
        return f64::INFINITY;
    }
    let c = rel.length_squared() - reach * reach;
    if c <= 0.0 {
        return 0.0;
    }
    let disc = b * b - a * c;
    if disc < 0.0 {
        return f64::INFINITY;
    }
    (-b - disc.sqrt()) / a
}

/// Time until a moving circle touches the flat interior of a segment,
/// ignoring its endpoints.
pub fn time_until_segment_interior(
    segment: &LineSegment,
    ball_center: DVec2,
    ball_radius: f64,
    velocity: DVec2,
) -> f64 {
    let dir = segment.direction();
    let len_sq = dir.length_squared();
    if len_sq < EPS {
        return f64::INFINITY;
    }

    // Normal facing the ball
    let mut normal = segment.normal();
    let mut dist = (ball_center - segment.p1).dot(normal);
    if dist < 0.0 {
        normal = -normal;
        dist = -dist;
    }

    let approach = -velocity.dot(normal);
    if approach <= EPS {
        return f64::INFINITY;
    }

    let t = ((dist - ball_radius) / approach).max(0.0);
    let center_at_hit = ball_center + velocity * t;
    let along = (center_at_hit - segment.p1).dot(dir) / len_sq;
    if (0.0..=1.0).contains(&along) {
        t
    } else {
        f64::INFINITY
    }
}

/// Time until a moving circle touches a line segment, end caps included
pub fn time_until_segment_collision(
    segment: &LineSegment,
    ball_center: DVec2,
    ball_radius: f64,
    velocity: DVec2,
) -> f64 {
    segment_contact(segment, ball_center, ball_radius, velocity).0
}

/// Earliest contact with a segment. An endpoint hit is reported as a
/// zero-radius corner so it reflects like a vertex.
fn segment_contact(
    segment: &LineSegment,
    ball_center: DVec2,
    ball_radius: f64,
    velocity: DVec2,
) -> (f64, Contact) {
    let mut best = (
        time_until_segment_interior(segment, ball_center, ball_radius, velocity),
        Contact::Segment(*segment),
    );
    for end in [segment.p1, segment.p2] {
        let cap = CornerArc::point(end.x, end.y);
        let t = time_until_circle_collision(&cap, ball_center, ball_radius, velocity);
        if t < best.0 {
            best = (t, Contact::Corner(cap));
        }
    }
    best
}

/// Scan gizmo boundaries for the first contact within `lookahead`.
///
/// Order is the gizmo list order, and within a gizmo its edges before its
/// corners. The first primitive that clears the threshold wins even if a
/// later one would be hit sooner. Gizmos without a built boundary are skipped.
/// A hit on an edge's endpoint comes back as a corner contact.
pub fn detect_collision(ball: &Ball, gizmos: &[Gizmo], lookahead: f64) -> Option<CollisionInfo> {
    for (gizmo_index, gizmo) in gizmos.iter().enumerate() {
        let Some(boundary) = gizmo.cached_boundary() else {
            continue;
        };

        let edges = boundary
            .segments
            .iter()
            .map(|seg| segment_contact(seg, ball.pos, ball.radius, ball.vel));
        let corners = boundary.corners.iter().map(|arc| {
            let t = time_until_circle_collision(arc, ball.pos, ball.radius, ball.vel);
            (t, Contact::Corner(*arc))
        });
        for (time_to_impact, contact) in edges.chain(corners) {
            if time_to_impact <= lookahead {
                return Some(CollisionInfo {
                    gizmo_index,
                    gizmo_id: gizmo.id,
                    contact,
                    time_to_impact,
                });
            }
        }
    }
    None
}

/// Reflect velocity off a surface with unit normal `normal`
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2) -> DVec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect velocity off a flat edge
pub fn reflect_off_segment(segment: &LineSegment, velocity: DVec2) -> DVec2 {
    reflect_velocity(velocity, segment.normal())
}

/// Reflect velocity off a circle, about the line joining the circle's center
/// to the ball's center
pub fn reflect_off_circle(circle_center: DVec2, ball_center: DVec2, velocity: DVec2) -> DVec2 {
    let normal = (ball_center - circle_center).normalize_or_zero();
    reflect_velocity(velocity, normal)
}

/// New ball velocity for a contact
pub fn reflect_off_contact(contact: &Contact, ball_center: DVec2, velocity: DVec2) -> DVec2 {
    match contact {
        Contact::Segment(seg) => reflect_off_segment(seg, velocity),
        Contact::Corner(arc) => reflect_off_circle(arc.center, ball_center, velocity),
    }
}
