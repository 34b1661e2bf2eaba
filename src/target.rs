//! Where Pac-Man heads next.
//!
//! Rules are tried in order and the first that yields a cell wins:
//!
//! 1. In power mode, hunt the nearest active ghost.
//! 2. Under threat, go for a safe power pellet, otherwise flee to the warp
//!    tunnel end farther from the nearest ghost.
//! 3. Otherwise forage for the best-scoring safe pellet.

use tracing::debug;

use crate::config::Tuning;
use crate::distance::distance;
use crate::ghost::Ghost;
use crate::grid::{Grid, Pos, Tile};
use crate::safety::{is_path_safe, TARGET_CLEARANCE};

/// A single ghost closer than this is a threat.
const THREAT_RADIUS: f64 = 4.0;
/// Two or more ghosts closer than this are a threat.
const CROWD_RADIUS: f64 = 5.0;
/// Power pellets this close to a ghost are not worth the risk when escaping.
const ESCAPE_PELLET_CLEARANCE: f64 = 1.5;
/// Pellets this close to a ghost are skipped while foraging.
const FORAGE_CLEARANCE: f64 = 4.0;
/// With fewer power ticks than this left, stay farther from the ghost home.
const POWER_ENDING_TICKS: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reason {
    Hunt,
    Escape,
    Flee,
    Forage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    pub pos: Pos,
    pub reason: Reason,
}

struct Threat {
    nearest: Option<(Pos, f64)>,
    crowd: usize,
}

impl Threat {
    fn assess(grid: &Grid, pacman: Pos, ghosts: &[Ghost]) -> Self {
        let mut nearest: Option<(Pos, f64)> = None;
        let mut crowd = 0;
        for ghost in ghosts.iter().filter(|g| g.is_active()) {
            let dist = distance(grid, pacman, ghost.pos);
            if nearest.map_or(true, |(_, best)| dist < best) {
                nearest = Some((ghost.pos, dist));
            }
            if dist < CROWD_RADIUS {
                crowd += 1;
            }
        }
        Self { nearest, crowd }
    }

    fn is_threatening(&self) -> bool {
        self.nearest.is_some_and(|(_, dist)| dist < THREAT_RADIUS) || self.crowd >= 2
    }
}

/// Picks Pac-Man's destination. `None` means nothing worth going for; when
/// the grid has no pellets left the caller treats that as level clear.
pub fn select_target(
    pacman: Pos,
    grid: &Grid,
    ghosts: &[Ghost],
    power_mode: bool,
    power_timer: u32,
    tuning: &Tuning,
) -> Option<Target> {
    let threat = Threat::assess(grid, pacman, ghosts);

    if power_mode {
        if let Some((pos, _)) = threat.nearest {
            debug!(?pos, "hunting ghost");
            return Some(Target {
                pos,
                reason: Reason::Hunt,
            });
        }
    } else if threat.is_threatening() {
        if let Some(pos) = escape_pellet(pacman, grid, ghosts) {
            debug!(?pos, "escaping to power pellet");
            return Some(Target {
                pos,
                reason: Reason::Escape,
            });
        }
        if let (Some((ghost, _)), Some((left, right))) = (threat.nearest, grid.warp_endpoints()) {
            let pos = if distance(grid, left, ghost) > distance(grid, right, ghost) {
                left
            } else {
                right
            };
            debug!(?pos, ?ghost, "fleeing to warp tunnel");
            return Some(Target {
                pos,
                reason: Reason::Flee,
            });
        }
    }

    forage(pacman, grid, ghosts, power_mode, power_timer, tuning).map(|pos| Target {
        pos,
        reason: Reason::Forage,
    })
}

fn near_active_ghost(grid: &Grid, pos: Pos, ghosts: &[Ghost], radius: f64) -> bool {
    ghosts
        .iter()
        .filter(|g| g.is_active())
        .any(|g| distance(grid, pos, g.pos) < radius)
}

fn escape_pellet(pacman: Pos, grid: &Grid, ghosts: &[Ghost]) -> Option<Pos> {
    let mut best: Option<(Pos, f64)> = None;
    for (pos, tile) in grid.iter() {
        if tile != Tile::Power {
            continue;
        }
        if near_active_ghost(grid, pos, ghosts, ESCAPE_PELLET_CLEARANCE) {
            continue;
        }
        if !is_path_safe(grid, pacman, pos, ghosts, TARGET_CLEARANCE) {
            continue;
        }
        let score = distance(grid, pacman, pos) / 2.0;
        if best.map_or(true, |(_, s)| score < s) {
            best = Some((pos, score));
        }
    }
    best.map(|(pos, _)| pos)
}

fn forage(
    pacman: Pos,
    grid: &Grid,
    ghosts: &[Ghost],
    power_mode: bool,
    power_timer: u32,
    tuning: &Tuning,
) -> Option<Pos> {
    let home_radius = if power_mode && power_timer < POWER_ENDING_TICKS {
        2.0
    } else {
        1.0
    };
    let mut best: Option<(Pos, f64)> = None;
    for (pos, tile) in grid.iter() {
        if !tile.is_pellet() {
            continue;
        }
        if !power_mode && near_active_ghost(grid, pos, ghosts, FORAGE_CLEARANCE) {
            continue;
        }
        if distance(grid, pos, tuning.ghost_home) < home_radius {
            continue;
        }
        if !is_path_safe(grid, pacman, pos, ghosts, TARGET_CLEARANCE) {
            continue;
        }
        let dist = distance(grid, pacman, pos);
        let score = match tile {
            Tile::Power => dist / 2.0,
            _ if pos.col >= tuning.forage_bias_col => dist - 2.0,
            _ => dist,
        };
        if best.map_or(true, |(_, s)| score < s) {
            best = Some((pos, score));
        }
    }
    best.map(|(pos, _)| pos)
}
