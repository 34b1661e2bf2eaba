//! Cheap proximity checks that keep Pac-Man's route away from ghosts.

use tracing::trace;

use crate::distance::{distance, point_distance, Point};
use crate::ghost::Ghost;
use crate::grid::{Grid, Pos};

/// Default clearance for a freshly chosen target.
pub const TARGET_CLEARANCE: f64 = 4.0;
/// Clearance every remaining waypoint must keep while a path is followed.
pub const WAYPOINT_CLEARANCE: f64 = 3.0;

const SAMPLES: u32 = 10;

/// Samples ten points on the straight segment `from..to` (t = 0.1 ..= 1.0)
/// and fails if an active ghost is closer than `threshold` to any of them.
/// This approximates, not intersects, the real route.
pub fn is_path_safe(grid: &Grid, from: Pos, to: Pos, ghosts: &[Ghost], threshold: f64) -> bool {
    for ghost in ghosts.iter().filter(|g| g.is_active()) {
        for step in 1..=SAMPLES {
            let t = f64::from(step) / f64::from(SAMPLES);
            let sample = Point::lerp(from, to, t);
            let dist = point_distance(grid, sample, ghost.pos.into());
            if dist < threshold {
                trace!(?to, ghost = ?ghost.pos, dist, "straight line to target is unsafe");
                return false;
            }
        }
    }
    true
}

/// True when every waypoint keeps at least `threshold` from each active ghost.
pub fn waypoints_clear<'a>(
    grid: &Grid,
    waypoints: impl IntoIterator<Item = &'a Pos>,
    ghosts: &[Ghost],
    threshold: f64,
) -> bool {
    waypoints.into_iter().all(|pos| {
        ghosts
            .iter()
            .filter(|g| g.is_active())
            .all(|g| distance(grid, *pos, g.pos) >= threshold)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghost::{GhostKind, GhostSpawn};
    use crate::grid::Tile;

    fn ghost(pos: Pos) -> Ghost {
        Ghost::new(&GhostSpawn {
            kind: GhostKind::Pinky,
            pos,
            start_delay: 0,
            step_ticks: 1.65,
        })
    }

    #[test]
    fn no_ghosts_is_safe() {
        let grid = Grid::filled(10, 10, Tile::Empty);
        assert!(is_path_safe(&grid, Pos::new(0, 0), Pos::new(9, 9), &[], TARGET_CLEARANCE));
    }

    #[test]
    fn ghost_near_the_line_is_unsafe() {
        let grid = Grid::filled(10, 20, Tile::Empty);
        let ghosts = [ghost(Pos::new(1, 10))];
        assert!(!is_path_safe(&grid, Pos::new(0, 0), Pos::new(0, 19), &ghosts, TARGET_CLEARANCE));
        assert!(is_path_safe(&grid, Pos::new(9, 0), Pos::new(9, 19), &ghosts, TARGET_CLEARANCE));
    }

    #[test]
    fn the_start_point_is_not_sampled() {
        // A ghost right next to the origin but far from every sample point.
        let grid = Grid::filled(1, 60, Tile::Empty);
        let ghosts = [ghost(Pos::new(0, 0))];
        assert!(is_path_safe(&grid, Pos::new(0, 1), Pos::new(0, 59), &ghosts, 4.0));
    }

    #[test]
    fn eaten_ghosts_are_ignored() {
        let grid = Grid::filled(5, 5, Tile::Empty);
        let mut g = ghost(Pos::new(0, 1));
        g.eat(10);
        assert!(is_path_safe(&grid, Pos::new(0, 0), Pos::new(0, 2), &[g.clone()], TARGET_CLEARANCE));
        assert!(waypoints_clear(&grid, &[Pos::new(0, 1)], &[g], WAYPOINT_CLEARANCE));
    }

    #[test]
    fn waypoint_clearance() {
        let grid = Grid::filled(10, 10, Tile::Empty);
        let ghosts = [ghost(Pos::new(5, 5))];
        let path = [Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)];
        assert!(waypoints_clear(&grid, &path, &ghosts, WAYPOINT_CLEARANCE));
        let close = [Pos::new(4, 4)];
        assert!(!waypoints_clear(&grid, &close, &ghosts, WAYPOINT_CLEARANCE));
    }
}
