//! Gizmoball headless runner
//!
//! Scatters a seeded board and drives the simulation at the configured timer
//! period, logging every contact. Usage: `gizmoball [config.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
use anyhow::{Context, Result};
#[cfg(not(target_arch = "wasm32"))]
use log::{debug, info, warn};

#[cfg(not(target_arch = "wasm32"))]
use gizmoball::WorldConfig;
#[cfg(not(target_arch = "wasm32"))]
use gizmoball::sim::{CollisionOutcome, Simulation, scatter};

/// Simulated run length in timer ticks
#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS: u64 = 25 * 60;

#[cfg(not(target_arch = "wasm32"))]
const BOARD: [&str; 10] = [
    "square",
    "square",
    "l-shape",
    "trapezoid",
    "trapezoid",
    "left-flipper",
    "right-flipper",
    "square",
    "l-shape",
    "absorber",
];

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    env_logger::init();
    info!("Gizmoball (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            WorldConfig::from_json(&json).with_context(|| format!("parsing config {}", path))?
        }
        None => WorldConfig::default(),
    };
    let seed = match args.next() {
        Some(s) => s.parse::<u64>().context("seed must be an unsigned integer")?,
        None => 0xB0A2D,
    };

    let mut sim = Simulation::new(config)?;
    let ids = scatter(&mut sim, seed, &BOARD)?;
    debug!("Board ids: {:?}", ids);

    let tick_ms = sim.config().tick_ms;
    let ticks_per_second = (1000 / tick_ms.max(1)).max(1) as u64;
    let mut contacts = 0usize;

    for n in 0..MAX_TICKS {
        // Alternate the flip key every second
        sim.hold_flippers((n / ticks_per_second) % 2 == 1);

        let Some(report) = sim.advance(tick_ms)? else {
            if sim.is_halted() {
                break;
            }
            continue;
        };
        contacts += 1;
        match report.outcome {
            CollisionOutcome::Absorbed => {
                info!("Tick {}: ball absorbed by gizmo {}", n, report.info.gizmo_id);
            }
            CollisionOutcome::Tracked { knockback } | CollisionOutcome::Reflected { knockback, .. } => {
                info!(
                    "Tick {}: gizmo {} hit, t = {:.3}, ball {:?}",
                    n,
                    report.info.gizmo_id,
                    report.info.time_to_impact,
                    sim.ball().vel
                );
                if let Some(k) = knockback {
                    debug!("Knockback: {:?}", k);
                }
            }
        }
    }

    if !sim.is_halted() {
        warn!("Run ended after {} ticks without absorption", MAX_TICKS);
    }
    info!(
        "Finished: {} ticks, {} contacts, ball at {:?}",
        sim.time_ticks,
        contacts,
        sim.ball().pos
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; nothing to drive
}
