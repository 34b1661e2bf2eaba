//! Weighted best-first search over the maze.
//!
//! Plain steps cost 1. Outside power mode a step that lands within
//! [`DANGER_RADIUS`] of an active ghost costs an extra [`DANGER_PENALTY`] per
//! ghost, so the cheapest route bends around danger instead of through it.
//! Cells near either end of the warp row get a synthetic edge to the
//! opposite end costing [`WARP_COST`].

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use crate::distance::distance;
use crate::ghost::Ghost;
use crate::grid::{Dir, Grid, Pos};

pub const DANGER_RADIUS: f64 = 4.0;
pub const DANGER_PENALTY: f64 = 100.0;
pub const WARP_COST: f64 = 0.1;
/// How far from a warp endpoint the tunnel edge is offered.
const WARP_REACH: f64 = 2.0;

#[derive(Clone, Copy, Debug)]
struct Node {
    f: f64,
    g: f64,
    seq: u64,
    pos: Pos,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; earlier pushes win ties.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Route from `start` to `goal`, excluding `start` and ending at `goal`.
/// Returns an empty route when already there and `None` when the goal
/// cannot be reached.
pub fn find_path(start: Pos, goal: Pos, grid: &Grid, ghosts: &[Ghost], power_mode: bool) -> Option<Vec<Pos>> {
    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Pos, Pos> = HashMap::new();
    let mut g_score: HashMap<Pos, f64> = HashMap::new();
    let mut seq = 0u64;

    g_score.insert(start, 0.0);
    open.push(Node {
        f: distance(grid, start, goal),
        g: 0.0,
        seq,
        pos: start,
    });

    let mut neighbors = Vec::with_capacity(6);
    while let Some(node) = open.pop() {
        let current = node.pos;
        if current == goal {
            return Some(rebuild(&came_from, start, goal));
        }
        if g_score.get(&current).is_some_and(|best| node.g > *best) {
            continue;
        }

        neighbors.clear();
        for dir in Dir::ALL {
            let Some(next) = grid.step(current, dir) else {
                continue;
            };
            if !grid.is_open(next) {
                continue;
            }
            neighbors.push((next, 1.0 + danger(grid, next, ghosts, power_mode)));
        }
        warp_edges(grid, current, &mut neighbors);

        for &(next, cost) in &neighbors {
            let tentative = node.g + cost;
            if g_score.get(&next).is_some_and(|best| tentative >= *best) {
                continue;
            }
            came_from.insert(next, current);
            g_score.insert(next, tentative);
            seq += 1;
            open.push(Node {
                f: tentative + distance(grid, next, goal),
                g: tentative,
                seq,
                pos: next,
            });
        }
    }

    debug!(?start, ?goal, "no path");
    None
}

fn danger(grid: &Grid, pos: Pos, ghosts: &[Ghost], power_mode: bool) -> f64 {
    if power_mode {
        return 0.0;
    }
    let near = ghosts
        .iter()
        .filter(|g| g.is_active() && distance(grid, pos, g.pos) < DANGER_RADIUS)
        .count();
    near as f64 * DANGER_PENALTY
}

fn warp_edges(grid: &Grid, current: Pos, out: &mut Vec<(Pos, f64)>) {
    let (Some(warp_row), Some((left, right))) = (grid.warp_row(), grid.warp_endpoints()) else {
        return;
    };
    if current.row.abs_diff(warp_row) > 2 {
        return;
    }
    if current.col == left.col || distance(grid, current, left) <= WARP_REACH {
        out.push((right, WARP_COST));
    }
    if current.col == right.col || distance(grid, current, right) <= WARP_REACH {
        out.push((left, WARP_COST));
    }
}

fn rebuild(came_from: &HashMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        path.push(current);
        match came_from.get(&current) {
            Some(prev) => current = *prev,
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghost::{GhostKind, GhostSpawn};
    use crate::grid::Tile;

    fn ghost(pos: Pos) -> Ghost {
        Ghost::new(&GhostSpawn {
            kind: GhostKind::Clyde,
            pos,
            start_delay: 0,
            step_ticks: 1.65,
        })
    }

    fn is_step(a: Pos, b: Pos) -> bool {
        a.row.abs_diff(b.row) + a.col.abs_diff(b.col) == 1
    }

    #[test]
    fn open_grid_path_is_manhattan() {
        let grid = Grid::filled(3, 3, Tile::Empty);
        let path = find_path(Pos::new(0, 0), Pos::new(2, 2), &grid, &[], false).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.last(), Some(&Pos::new(2, 2)));
        assert!(path[0] == Pos::new(0, 1) || path[0] == Pos::new(1, 0));
        assert!(path.windows(2).all(|w| is_step(w[0], w[1])));
    }

    #[test]
    fn already_at_goal() {
        let grid = Grid::filled(3, 3, Tile::Empty);
        assert_eq!(find_path(Pos::new(1, 1), Pos::new(1, 1), &grid, &[], false), Some(vec![]));
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let mut grid = Grid::filled(5, 5, Tile::Empty);
        for dir in Dir::ALL {
            let wall = grid.step(Pos::new(2, 2), dir).unwrap();
            grid.set(wall, Tile::Wall);
        }
        assert_eq!(find_path(Pos::new(0, 0), Pos::new(2, 2), &grid, &[], false), None);
    }

    #[test]
    fn routes_around_walls() {
        let mut grid = Grid::filled(3, 5, Tile::Empty);
        grid.set(Pos::new(0, 2), Tile::Wall);
        grid.set(Pos::new(1, 2), Tile::Wall);
        let path = find_path(Pos::new(0, 0), Pos::new(0, 4), &grid, &[], false).unwrap();
        assert_eq!(path.len(), 8);
        assert!(path.iter().all(|p| grid.is_open(*p)));
    }

    #[test]
    fn uses_the_warp_tunnel() {
        let grid = Grid::filled(9, 30, Tile::Empty).with_warp_row(7);
        let path = find_path(Pos::new(7, 1), Pos::new(7, 28), &grid, &[], false).unwrap();
        assert!(path.len() <= 3, "{path:?}");
        assert_eq!(path.last(), Some(&Pos::new(7, 28)));
        assert!(path.contains(&Pos::new(7, 29)));
    }

    #[test]
    fn steers_around_ghosts_outside_power_mode() {
        let grid = Grid::filled(11, 11, Tile::Empty);
        let ghosts = [ghost(Pos::new(5, 5))];
        let start = Pos::new(5, 0);
        let goal = Pos::new(5, 10);
        let safe = find_path(start, goal, &grid, &ghosts, false).unwrap();
        assert!(safe.len() > 10);
        assert!(safe.iter().all(|p| distance(&grid, *p, Pos::new(5, 5)) >= DANGER_RADIUS));

        let direct = find_path(start, goal, &grid, &ghosts, true).unwrap();
        assert_eq!(direct.len(), 10);
    }
}
