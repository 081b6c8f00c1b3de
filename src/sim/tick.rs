//! Fixed-period simulation tick
//!
//! One tick: step flippers, move the ball, rebuild dirty boundaries, detect
//! the first contact, resolve it.

use glam::DVec2;

use super::collision::{CollisionInfo, detect_collision, reflect_off_contact};
use super::gizmo::Gizmo;
use super::state::{Ball, BallState, Simulation};
use crate::error::SimResult;
use crate::settings::WorldConfig;

/// What happened to a crash-movable gizmo after being struck
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Knockback {
    Moved { from: DVec2, to: DVec2 },
    /// Another gizmo already sits at the snapped target; the gizmo stayed put
    Blocked { candidate: DVec2 },
    /// The arena clamp cancelled the push; the gizmo stayed put
    Pinned { at: DVec2 },
}

/// How a contact was resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionOutcome {
    /// Ball removed from play and the simulation halted
    Absorbed,
    /// Vertical velocity zeroed
    Tracked { knockback: Option<Knockback> },
    /// Velocity reflected off the contact primitive
    Reflected {
        before: DVec2,
        after: DVec2,
        knockback: Option<Knockback>,
    },
}

/// A contact and its resolution, returned to the caller for repainting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionReport {
    pub info: CollisionInfo,
    pub outcome: CollisionOutcome,
}

impl Simulation {
    /// Advance one timer interval.
    ///
    /// No-op on a halted simulation or while the ball is out of play.
    pub fn advance(&mut self, elapsed_ms: u32) -> SimResult<Option<CollisionReport>> {
        tick(self, elapsed_ms)
    }
}

/// Advance the simulation by one timer interval
pub fn tick(sim: &mut Simulation, elapsed_ms: u32) -> SimResult<Option<CollisionReport>> {
    if sim.is_halted() || !sim.ball.is_in_play() {
        return Ok(None);
    }
    sim.time_ticks += 1;
    let dt = sim.config.dt_for(elapsed_ms);

    for gizmo in &mut sim.gizmos {
        gizmo.set_held(sim.flippers_held);
        gizmo.step_flipper(&sim.config);
    }

    integrate(&mut sim.ball, dt, &sim.config);

    sim.refresh_boundaries()?;
    let Some(info) = detect_collision(&sim.ball, &sim.gizmos, sim.config.lookahead) else {
        return Ok(None);
    };
    let outcome = resolve_collision(sim, &info);
    Ok(Some(CollisionReport { info, outcome }))
}

/// Move the ball for `dt` time units, bounce it off the arena walls, then
/// apply gravity and friction.
pub fn integrate(ball: &mut Ball, dt: f64, config: &WorldConfig) {
    ball.pos += ball.vel * dt;

    let r = ball.radius;
    let mut vel = ball.vel;
    let (width, height) = (config.width(), config.height());

    if ball.pos.x <= r {
        ball.pos.x = r;
        vel.x = -vel.x;
    }
    if ball.pos.x >= width - r {
        ball.pos.x = width - r;
        vel.x = -vel.x;
    }
    if ball.pos.y <= r {
        ball.pos.y = r;
        vel.y = -vel.y;
    }
    if ball.pos.y >= height - r {
        ball.pos.y = height - r;
        vel.y = -vel.y;
    }

    vel.x *= config.friction.x;
    vel.y = (vel.y + config.gravity * dt) * config.friction.y;

    // A dead axis stalls the ball against surfaces; keep it moving
    if vel.x == 0.0 {
        vel.x += 1.0;
    }
    if vel.y == 0.0 {
        vel.y += 1.0;
    }
    ball.vel = vel;
}

/// Apply a detected contact to the ball and, for crash-movable gizmos, the
/// struck gizmo.
pub fn resolve_collision(sim: &mut Simulation, info: &CollisionInfo) -> CollisionOutcome {
    let gizmo = &sim.gizmos[info.gizmo_index];

    if gizmo.is_absorbing() {
        sim.ball.remove(&sim.config);
        sim.running = false;
        log::info!("Ball absorbed by gizmo {}; simulation halted", gizmo.id);
        return CollisionOutcome::Absorbed;
    }

    let tracking = gizmo.is_tracking();
    let crash_movable = gizmo.is_crash_movable();
    let before = sim.ball.vel;

    if tracking {
        sim.ball.lock_to_track();
    } else {
        sim.ball.vel = reflect_off_contact(&info.contact, sim.ball.pos, sim.ball.vel);
        sim.ball.state = BallState::Active;
    }

    let knockback = crash_movable
        .then(|| knock_back(&mut sim.gizmos, info.gizmo_index, sim.ball.pos, &sim.config));

    log::debug!(
        "Tick {}: gizmo {} hit ({:?}), velocity {:?} -> {:?}",
        sim.time_ticks,
        info.gizmo_id,
        info.contact,
        before,
        sim.ball.vel
    );

    if tracking {
        CollisionOutcome::Tracked { knockback }
    } else {
        CollisionOutcome::Reflected {
            before,
            after: sim.ball.vel,
            knockback,
        }
    }
}

/// Push the struck gizmo one offset away from the ball on each axis. The
/// push lands on the grid-snapped, arena-clamped center, and is skipped if
/// that center is exactly another gizmo's center.
pub fn knock_back(
    gizmos: &mut [Gizmo],
    index: usize,
    ball_pos: DVec2,
    config: &WorldConfig,
) -> Knockback {
    let from = gizmos[index].center();
    let offset = config.knockback_offset;
    let dx = if ball_pos.x < from.x { offset } else { -offset };
    let dy = if ball_pos.y < from.y { offset } else { -offset };
    let candidate = gizmos[index].snapped_center(from + DVec2::new(dx, dy), config);

    if candidate == from {
        return Knockback::Pinned { at: from };
    }

    let occupied = gizmos
        .iter()
        .enumerate()
        .any(|(i, other)| i != index && other.center() == candidate);
    if occupied {
        log::warn!(
            "Knockback of gizmo {} to {:?} blocked by another gizmo",
            gizmos[index].id,
            candidate
        );
        return Knockback::Blocked { candidate };
    }

    gizmos[index].set_position(candidate);
    Knockback::Moved {
        from,
        to: candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;
    use crate::sim::collision::Contact;
    use crate::sim::shape::{Pose, ShapeKind};
    use proptest::prelude::*;

    fn weightless_sim() -> Simulation {
        Simulation::new(WorldConfig::weightless()).unwrap()
    }

    #[test]
    fn test_wall_bounce_scenario() {
        let config = WorldConfig::weightless();
        let mut ball = Ball::new(DVec2::new(6.0, 50.0), DVec2::new(-5.0, 0.0), 6.0);
        integrate(&mut ball, 0.04, &config);
        assert_eq!(ball.pos.x, 6.0);
        assert_eq!(ball.vel.x, 5.0);
    }

    #[test]
    fn test_far_wall_bounce() {
        let config = WorldConfig::weightless();
        let mut ball = Ball::new(DVec2::new(392.0, 200.0), DVec2::new(5.0, 5.0), 6.0);
        integrate(&mut ball, 0.4, &config);
        assert_eq!(ball.pos.x, 394.0);
        assert_eq!(ball.vel.x, -5.0);
        assert_eq!(ball.pos.y, 202.0);
        assert_eq!(ball.vel.y, 5.0);
    }

    #[test]
    fn test_gravity_then_friction() {
        let config = WorldConfig {
            gravity: 5.0,
            friction: DVec2::new(0.5, 0.5),
            ..WorldConfig::default()
        };
        let mut ball = Ball::new(DVec2::new(100.0, 100.0), DVec2::new(4.0, 2.0), 6.0);
        integrate(&mut ball, 0.4, &config);
        assert!(ball.pos.distance(DVec2::new(101.6, 100.8)) < 1e-9);
        // vy' = (2 + 5 * 0.4) * 0.5
        assert!((ball.vel.x - 2.0).abs() < 1e-12);
        assert!((ball.vel.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_velocity_is_nudged() {
        let config = WorldConfig::weightless();
        let mut ball = Ball::new(DVec2::new(100.0, 100.0), DVec2::ZERO, 6.0);
        integrate(&mut ball, 0.4, &config);
        assert_eq!(ball.vel, DVec2::new(1.0, 1.0));
    }

    #[test]
    fn test_tracker_scenario() {
        let mut sim = weightless_sim();
        let id = sim.add_gizmo("square", Pose::new(100.0, 100.0, 10.0, 0)).unwrap();
        sim.gizmo_mut(id).unwrap().set_tracking(true);
        sim.refresh_boundaries().unwrap();
        sim.ball.pos = DVec2::new(80.0, 80.0);
        sim.ball.vel = DVec2::new(3.0, 4.0);

        let info = CollisionInfo {
            gizmo_index: 0,
            gizmo_id: id,
            contact: Contact::Segment(sim.gizmos[0].cached_boundary().unwrap().segments[0]),
            time_to_impact: 0.0,
        };
        let outcome = resolve_collision(&mut sim, &info);
        assert_eq!(outcome, CollisionOutcome::Tracked { knockback: None });
        assert_eq!(sim.ball.vel, DVec2::new(3.0, 0.0));
        assert_eq!(sim.ball.state, BallState::VerticalLocked);
    }

    #[test]
    fn test_absorber_scenario() {
        let mut sim = weightless_sim();
        sim.add_gizmo("absorber", Pose::new(130.0, 50.0, 10.0, 0)).unwrap();
        sim.ball.pos = DVec2::new(100.0, 50.0);
        sim.ball.vel = DVec2::new(5.0, 0.0);

        // Moves to x = 102, left edge at 120 minus radius: gap 12 > 2.5, no hit yet
        let mut report = None;
        for _ in 0..10 {
            report = sim.advance(40).unwrap();
            if report.is_some() {
                break;
            }
        }
        let report = report.expect("ball should reach the absorber");
        assert_eq!(report.outcome, CollisionOutcome::Absorbed);
        assert_eq!(sim.ball().pos, DVec2::new(-100.0, -100.0));
        assert_eq!(sim.ball().state, BallState::Removed);
        assert!(sim.is_halted());

        // Halted: further ticks do nothing
        let ticks = sim.time_ticks;
        assert!(sim.advance(40).unwrap().is_none());
        assert_eq!(sim.time_ticks, ticks);
    }

    #[test]
    fn test_reflection_through_advance() {
        let mut sim = weightless_sim();
        sim.add_gizmo("square", Pose::new(130.0, 50.0, 10.0, 0)).unwrap();
        sim.ball.pos = DVec2::new(110.0, 50.0);
        sim.ball.vel = DVec2::new(5.0, 0.0);

        // After moving to x = 112 the ball is 2 units from the edge: t = 0.4
        let report = sim.advance(40).unwrap().expect("contact");
        match report.outcome {
            CollisionOutcome::Reflected { before, after, knockback } => {
                assert_eq!(before.x, 5.0);
                assert_eq!(after.x, -5.0);
                assert!(knockback.is_none());
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(sim.ball().state, BallState::Active);
    }

    #[test]
    fn test_tracked_then_ordinary_unlocks() {
        let mut sim = weightless_sim();
        let track = sim.add_gizmo("square", Pose::new(100.0, 100.0, 10.0, 0)).unwrap();
        sim.gizmo_mut(track).unwrap().set_tracking(true);
        sim.add_gizmo("square", Pose::new(200.0, 100.0, 10.0, 0)).unwrap();
        sim.refresh_boundaries().unwrap();

        let seg = |sim: &Simulation, i: usize| {
            Contact::Segment(sim.gizmos[i].cached_boundary().unwrap().segments[1])
        };
        let tracked = CollisionInfo { gizmo_index: 0, gizmo_id: track, contact: seg(&sim, 0), time_to_impact: 0.0 };
        resolve_collision(&mut sim, &tracked);
        assert_eq!(sim.ball.state, BallState::VerticalLocked);

        let plain = CollisionInfo { gizmo_index: 1, gizmo_id: sim.gizmos[1].id, contact: seg(&sim, 1), time_to_impact: 0.0 };
        resolve_collision(&mut sim, &plain);
        assert_eq!(sim.ball.state, BallState::Active);
    }

    #[test]
    fn test_knockback_moves_away_from_ball() {
        let config = WorldConfig::default();
        let mut gizmos = vec![Gizmo::new(1, ShapeKind::Square, Pose::new(110.0, 110.0, 10.0, 0))];
        let result = knock_back(&mut gizmos, 0, DVec2::new(90.0, 130.0), &config);
        assert_eq!(
            result,
            Knockback::Moved {
                from: DVec2::new(110.0, 110.0),
                to: DVec2::new(130.0, 90.0)
            }
        );
        assert!(gizmos[0].is_dirty());
    }

    #[test]
    fn test_knockback_blocked_by_other_gizmo() {
        let config = WorldConfig::default();
        let mut gizmos = vec![
            Gizmo::new(1, ShapeKind::Square, Pose::new(110.0, 110.0, 10.0, 0)),
            Gizmo::new(2, ShapeKind::Square, Pose::new(130.0, 130.0, 10.0, 0)),
        ];
        let result = knock_back(&mut gizmos, 0, DVec2::new(90.0, 90.0), &config);
        assert_eq!(
            result,
            Knockback::Blocked {
                candidate: DVec2::new(130.0, 130.0)
            }
        );
        assert_eq!(gizmos[0].center(), DVec2::new(110.0, 110.0));
    }

    #[test]
    fn test_knockback_checks_clamped_target() {
        let config = WorldConfig::default();
        let mut gizmos = vec![
            Gizmo::new(1, ShapeKind::Square, Pose::new(390.0, 110.0, 10.0, 0)),
            Gizmo::new(2, ShapeKind::Square, Pose::new(390.0, 90.0, 10.0, 0)),
        ];
        // Raw target (410, 90) clamps back into the edge column onto gizmo 2
        let result = knock_back(&mut gizmos, 0, DVec2::new(370.0, 130.0), &config);
        assert_eq!(
            result,
            Knockback::Blocked {
                candidate: DVec2::new(390.0, 90.0)
            }
        );
        assert_eq!(gizmos[0].center(), DVec2::new(390.0, 110.0));
        assert_eq!(gizmos[1].center(), DVec2::new(390.0, 90.0));
    }

    #[test]
    fn test_knockback_into_corner_is_pinned() {
        let config = WorldConfig::default();
        let mut gizmos = vec![Gizmo::new(1, ShapeKind::Square, Pose::new(390.0, 390.0, 10.0, 0))];
        gizmos[0].refresh(&config).unwrap();
        let result = knock_back(&mut gizmos, 0, DVec2::new(370.0, 370.0), &config);
        assert_eq!(
            result,
            Knockback::Pinned {
                at: DVec2::new(390.0, 390.0)
            }
        );
        assert!(!gizmos[0].is_dirty());
    }

    #[test]
    fn test_crash_movable_reflection_reports_knockback() {
        let mut sim = weightless_sim();
        let id = sim.add_gizmo("square", Pose::new(130.0, 50.0, 10.0, 0)).unwrap();
        sim.gizmo_mut(id).unwrap().set_crash_movable(true);
        sim.ball.pos = DVec2::new(110.0, 50.0);
        sim.ball.vel = DVec2::new(5.0, 0.0);

        let report = sim.advance(40).unwrap().expect("contact");
        let CollisionOutcome::Reflected { knockback: Some(Knockback::Moved { to, .. }), .. } = report.outcome else {
            panic!("expected a knockback, got {:?}", report.outcome);
        };
        // Ball is left of and level with the center: pushed right and up
        assert_eq!(to, DVec2::new(150.0, 30.0));
        assert_eq!(sim.gizmo(id).unwrap().center(), to);
    }

    #[test]
    fn test_flippers_swing_while_held() {
        let mut sim = weightless_sim();
        let id = sim.add_gizmo("right-flipper", Pose::new(300.0, 300.0, 20.0, 0)).unwrap();
        sim.hold_flippers(true);
        for _ in 0..3 {
            sim.advance(40).unwrap();
        }
        assert_eq!(sim.gizmo(id).unwrap().flipper().unwrap().angle_deg, 15.0);
        assert!(!sim.gizmo(id).unwrap().is_dirty());

        sim.hold_flippers(false);
        sim.advance(40).unwrap();
        assert_eq!(sim.gizmo(id).unwrap().flipper().unwrap().angle_deg, 10.0);
    }

    #[test]
    fn test_bad_rotation_fails_tick() {
        let mut sim = weightless_sim();
        let id = sim.add_gizmo("square", Pose::new(300.0, 300.0, 10.0, 0)).unwrap();
        sim.gizmo_mut(id).unwrap().rotate(30);
        assert!(sim.advance(40).is_err());
    }

    #[test]
    fn test_reset_after_absorb_and_restart() {
        let mut sim = weightless_sim();
        sim.ball.remove(&sim.config);
        sim.stop();
        sim.reset_ball();
        sim.start();
        assert!(sim.advance(40).is_ok());
        assert_eq!(sim.ball().state, BallState::Active);
        let arena = Rect::new(DVec2::splat(6.0), DVec2::splat(394.0));
        assert!(arena.contains(sim.ball().pos));
    }

    proptest! {
        #[test]
        fn integration_keeps_ball_in_arena(
            x in -50.0f64..450.0, y in -50.0f64..450.0,
            vx in -200.0f64..200.0, vy in -200.0f64..200.0,
            dt in 0.0f64..2.0,
            gravity in 0.0f64..10.0,
        ) {
            let config = WorldConfig { gravity, ..WorldConfig::default() };
            let mut ball = Ball::new(DVec2::new(x, y), DVec2::new(vx, vy), config.ball_radius);
            integrate(&mut ball, dt, &config);
            let r = ball.radius;
            prop_assert!(ball.pos.x >= r && ball.pos.x <= config.width() - r);
            prop_assert!(ball.pos.y >= r && ball.pos.y <= config.height() - r);
        }

        #[test]
        fn advance_keeps_ball_in_arena(seed in 0u64..500, ticks in 1usize..60) {
            let mut sim = Simulation::new(WorldConfig::default()).unwrap();
            crate::sim::layout::scatter(
                &mut sim,
                seed,
                &["square", "l-shape", "trapezoid", "left-flipper", "right-flipper"],
            ).unwrap();
            let r = sim.ball().radius;
            for i in 0..ticks {
                sim.hold_flippers(i % 10 < 5);
                sim.advance(40).unwrap();
                let pos = sim.ball().pos;
                prop_assert!(pos.x >= r && pos.x <= 400.0 - r);
                prop_assert!(pos.y >= r && pos.y <= 400.0 - r);
            }
        }
    }
}
