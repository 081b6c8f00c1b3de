//! Simulation state: the ball, the gizmo list and run control
//!
//! A `Simulation` is owned by whoever drives the timer. Every mutation goes
//! through `&mut self`, so input arriving between ticks cannot interleave
//! with a tick in progress.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::gizmo::Gizmo;
use super::registry;
use super::shape::Pose;
use crate::consts::BALL_REMOVED_POS;
use crate::error::{SimError, SimResult};
use crate::settings::WorldConfig;
use crate::{Rect, vec2};

/// Ball play state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallState {
    /// Moving freely
    #[default]
    Active,
    /// Last contact was a tracking gizmo. vy was zeroed at contact; the
    /// integrator does not enforce the lock, so gravity restores vy next tick
    VerticalLocked,
    /// Absorbed and parked off-arena until reset
    Removed,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub state: BallState,
}

impl Ball {
    pub fn new(pos: DVec2, vel: DVec2, radius: f64) -> Self {
        Self {
            pos,
            vel,
            radius,
            state: BallState::Active,
        }
    }

    /// Ball at the configured start position with the launch velocity
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.ball_start, config.launch_velocity, config.ball_radius)
    }

    #[inline]
    pub fn is_in_play(&self) -> bool {
        self.state != BallState::Removed
    }

    /// Smallest rectangle covering the ball, padded by one unit
    pub fn bounding_box(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius).grow(1.0)
    }

    /// Take the ball out of play (absorber contact)
    pub fn remove(&mut self, config: &WorldConfig) {
        self.pos = vec2(BALL_REMOVED_POS);
        self.vel = config.launch_velocity;
        self.state = BallState::Removed;
    }

    /// Constrain to horizontal motion (tracker contact)
    pub fn lock_to_track(&mut self) {
        self.vel.y = 0.0;
        self.state = BallState::VerticalLocked;
    }

    /// Back to the origin with the launch velocity
    pub fn reset(&mut self, config: &WorldConfig) {
        self.pos = DVec2::ZERO;
        self.vel = config.launch_velocity;
        self.state = BallState::Active;
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) config: WorldConfig,
    pub(crate) ball: Ball,
    /// Gizmos in detection order
    pub(crate) gizmos: Vec<Gizmo>,
    /// False once halted; the scheduler should stop ticking
    pub(crate) running: bool,
    /// Flip key state, applied at the start of the next tick
    pub(crate) flippers_held: bool,
    /// Ticks advanced since creation
    pub time_ticks: u64,
    next_id: u32,
}

impl Simulation {
    /// Create a running simulation with no gizmos
    pub fn new(config: WorldConfig) -> SimResult<Self> {
        config.validate()?;
        let ball = Ball::from_config(&config);
        log::info!(
            "Simulation created: arena {}x{}, tick {} ms",
            config.width(),
            config.height(),
            config.tick_ms
        );
        Ok(Self {
            config,
            ball,
            gizmos: Vec::new(),
            running: true,
            flippers_held: false,
            time_ticks: 0,
            next_id: 1,
        })
    }

    // --- Accessors ---

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    #[inline]
    pub fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    #[inline]
    pub fn gizmos(&self) -> &[Gizmo] {
        &self.gizmos
    }

    pub fn gizmo(&self, id: u32) -> SimResult<&Gizmo> {
        self.gizmos
            .iter()
            .find(|g| g.id == id)
            .ok_or(SimError::UnknownGizmo(id))
    }

    /// Mutable access for the editing layer (pose mutators)
    pub fn gizmo_mut(&mut self, id: u32) -> SimResult<&mut Gizmo> {
        self.gizmos
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(SimError::UnknownGizmo(id))
    }

    // --- Gizmo list ---

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Construct a gizmo from a registry tag and append it.
    /// The boundary is built immediately so a bad pose fails here.
    pub fn add_gizmo(&mut self, tag: &str, pose: Pose) -> SimResult<u32> {
        let constructor = registry::lookup(tag)?;
        let id = self.next_entity_id();
        let mut gizmo = constructor(id, pose);
        gizmo.refresh(&self.config)?;
        log::debug!("Added {} gizmo {} at {:?}", tag, id, pose.center);
        self.gizmos.push(gizmo);
        Ok(id)
    }

    pub fn remove_gizmo(&mut self, id: u32) -> SimResult<Gizmo> {
        let index = self
            .gizmos
            .iter()
            .position(|g| g.id == id)
            .ok_or(SimError::UnknownGizmo(id))?;
        Ok(self.gizmos.remove(index))
    }

    pub fn clear(&mut self) {
        self.gizmos.clear();
    }

    /// Rebuild every boundary invalidated since the last tick
    pub fn refresh_boundaries(&mut self) -> SimResult<()> {
        for gizmo in &mut self.gizmos {
            gizmo.refresh(&self.config)?;
        }
        Ok(())
    }

    /// Union of every gizmo's bounding square (editor repaint region)
    pub fn gizmos_bounding_box(&self) -> Option<Rect> {
        self.gizmos
            .iter()
            .map(Gizmo::bounding_box)
            .reduce(|acc, r| acc.union(&r))
    }

    // --- Run control ---

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        !self.running
    }

    /// Record the flip key state for the next tick
    pub fn hold_flippers(&mut self, held: bool) {
        self.flippers_held = held;
    }

    pub fn reset_ball(&mut self) {
        self.ball.reset(&self.config);
        log::info!("Ball reset to origin");
    }
}
