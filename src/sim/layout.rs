//! Seeded board layouts
//!
//! Places one-cell gizmos on distinct free grid cells. The same seed and tag
//! list always produce the same board.

use glam::DVec2;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::shape::Pose;
use super::state::Simulation;
use crate::error::{SimError, SimResult};

/// Center of grid cell (col, row)
pub fn cell_center(col: u32, row: u32, cell_size: f64) -> DVec2 {
    DVec2::new(
        (col as f64 + 0.5) * cell_size,
        (row as f64 + 0.5) * cell_size,
    )
}

/// Add one gizmo per tag at shuffled free cells.
///
/// The ball's start cell and cells already holding a gizmo center are
/// skipped. Returns the new gizmo ids in tag order.
pub fn scatter(sim: &mut Simulation, seed: u64, tags: &[&str]) -> SimResult<Vec<u32>> {
    let config = sim.config();
    let cell = config.cell_size;
    let ball_cell = (
        (config.ball_start.x / cell).floor() as i64,
        (config.ball_start.y / cell).floor() as i64,
    );

    let mut free: Vec<DVec2> = (0..config.cells_high)
        .flat_map(|row| (0..config.cells_wide).map(move |col| (col, row)))
        .filter(|&(col, row)| (col as i64, row as i64) != ball_cell)
        .map(|(col, row)| cell_center(col, row, cell))
        .filter(|c| sim.gizmos().iter().all(|g| g.center() != *c))
        .collect();

    if free.len() < tags.len() {
        return Err(SimError::Config(format!(
            "layout needs {} free cells, only {} available",
            tags.len(),
            free.len()
        )));
    }

    let mut rng = Pcg32::seed_from_u64(seed);
    free.shuffle(&mut rng);

    let half = cell / 2.0;
    let mut ids = Vec::with_capacity(tags.len());
    for (tag, center) in tags.iter().zip(free) {
        ids.push(sim.add_gizmo(tag, Pose::new(center.x, center.y, half, 0))?);
    }
    log::info!("Scattered {} gizmos (seed {})", ids.len(), seed);
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::WorldConfig;

    const TAGS: [&str; 4] = ["square", "trapezoid", "right-flipper", "absorber"];

    fn centers(seed: u64) -> Vec<DVec2> {
        let mut sim = Simulation::new(WorldConfig::default()).unwrap();
        scatter(&mut sim, seed, &TAGS).unwrap();
        sim.gizmos().iter().map(|g| g.center()).collect()
    }

    #[test]
    fn test_same_seed_same_layout() {
        assert_eq!(centers(42), centers(42));
        assert_ne!(centers(42), centers(43));
    }

    #[test]
    fn test_cells_are_distinct_and_avoid_ball() {
        let placed = centers(7);
        for (i, a) in placed.iter().enumerate() {
            assert_ne!(*a, DVec2::new(10.0, 10.0));
            assert!(placed[i + 1..].iter().all(|b| a != b));
            // Cell centers sit on odd multiples of half a cell
            assert_eq!((a.x - 10.0) % 20.0, 0.0);
            assert_eq!((a.y - 10.0) % 20.0, 0.0);
        }
    }

    #[test]
    fn test_scatter_skips_occupied_cells() {
        let mut sim = Simulation::new(WorldConfig::default()).unwrap();
        let tags = vec!["square"; 398];
        scatter(&mut sim, 1, &tags).unwrap();
        let ids = scatter(&mut sim, 2, &["l-shape"]).unwrap();
        assert_eq!(ids.len(), 1);
        assert!(matches!(
            scatter(&mut sim, 3, &["square"]),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn test_ids_match_tags() {
        let mut sim = Simulation::new(WorldConfig::default()).unwrap();
        let ids = scatter(&mut sim, 9, &TAGS).unwrap();
        assert_eq!(ids.len(), TAGS.len());
        assert!(sim.gizmo(ids[3]).unwrap().is_absorbing());
        assert_eq!(sim.gizmo(ids[0]).unwrap().half_extent(), 10.0);
    }
}
