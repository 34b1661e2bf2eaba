use rand::Rng;
use tracing::debug;

use crate::config::Tuning;
use crate::distance::distance;
use crate::grid::{Dir, Grid, Pos, Tile};

/// Chance that a chasing ghost ignores Pac-Man for one move.
const CHASE_JITTER: f64 = 0.25;
/// Frightened ghosts prefer to stay within this distance of Pac-Man...
const WANDER_RADIUS: f64 = 8.0;
/// ...unless this roll lets a farther cell through.
const WANDER_ALLOWANCE: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Clyde,
    Inky,
}

impl GhostKind {
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Clyde,
        GhostKind::Inky,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GhostKind::Blinky => "blinky",
            GhostKind::Pinky => "pinky",
            GhostKind::Clyde => "clyde",
            GhostKind::Inky => "inky",
        }
    }
}

/// Where and when a ghost enters a level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostSpawn {
    pub kind: GhostKind,
    pub pos: Pos,
    pub start_delay: u32,
    /// Normal cadence in ticks per step.
    pub step_ticks: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GhostState {
    /// Waiting out the staggered start.
    Dormant { ticks: u32 },
    Moving,
    /// Frozen after passing through the warp tunnel.
    Paused { ticks: f64 },
    /// Eaten; invisible and harmless until the countdown ends.
    Respawning { ticks: u32 },
}

/// Result of one call to [`Ghost::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Waiting,
    Moved,
    Warped,
    /// The chosen cell was a wall or off the grid; the ghost stays put.
    Blocked,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ghost {
    pub kind: GhostKind,
    pub pos: Pos,
    pub state: GhostState,
    pub frightened: bool,
    pub move_timer: u32,
    pub step_ticks: f64,
    /// Moves left at the slowed cadence.
    pub slowdown: u32,
    pub last_move: Option<Dir>,
    pub was_in_power_mode: bool,
    /// Start or warp delay interrupted by being eaten; resumed on respawn.
    pub resume: Option<GhostState>,
}

impl Ghost {
    pub fn new(spawn: &GhostSpawn) -> Self {
        let state = if spawn.start_delay > 0 {
            GhostState::Dormant {
                ticks: spawn.start_delay,
            }
        } else {
            GhostState::Moving
        };
        Self {
            kind: spawn.kind,
            pos: spawn.pos,
            state,
            frightened: false,
            move_timer: 0,
            step_ticks: spawn.step_ticks,
            slowdown: 0,
            last_move: None,
            was_in_power_mode: false,
            resume: None,
        }
    }

    /// Active ghosts are visible, dangerous outside power mode and edible
    /// inside it. Dormant and paused ghosts count as active.
    pub fn is_active(&self) -> bool {
        !self.is_eaten()
    }

    pub fn is_eaten(&self) -> bool {
        matches!(self.state, GhostState::Respawning { .. })
    }

    pub fn respawn_timer(&self) -> u32 {
        match self.state {
            GhostState::Respawning { ticks } => ticks,
            _ => 0,
        }
    }

    pub fn eat(&mut self, respawn_delay: u32) {
        if matches!(self.state, GhostState::Dormant { .. } | GhostState::Paused { .. }) {
            self.resume = Some(self.state);
        }
        self.state = GhostState::Respawning {
            ticks: respawn_delay,
        };
        self.frightened = false;
    }

    /// Counts down an eaten ghost. Returns true on the tick it reappears.
    pub fn tick_respawn(&mut self, home: Pos, power_mode: bool) -> bool {
        let GhostState::Respawning { ticks } = self.state else {
            return false;
        };
        let left = ticks.saturating_sub(1);
        if left > 0 {
            self.state = GhostState::Respawning { ticks: left };
            return false;
        }
        self.state = self.resume.take().unwrap_or(GhostState::Moving);
        self.pos = home;
        self.frightened = power_mode;
        true
    }

    /// Runs one tick of the movement state machine.
    pub fn advance(
        &mut self,
        grid: &Grid,
        pacman: Pos,
        power_mode: bool,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Advance {
        match self.state {
            GhostState::Respawning { .. } => return Advance::Waiting,
            GhostState::Dormant { ticks } => {
                self.state = if ticks > 1 {
                    GhostState::Dormant { ticks: ticks - 1 }
                } else {
                    GhostState::Moving
                };
                return Advance::Waiting;
            }
            GhostState::Paused { ticks } => {
                let left = ticks - 1.0;
                self.state = if left > 0.0 {
                    GhostState::Paused { ticks: left }
                } else {
                    GhostState::Moving
                };
                return Advance::Waiting;
            }
            GhostState::Moving => {}
        }

        self.move_timer += 1;
        let threshold = if self.slowdown > 0 {
            tuning.ghost_slowed_step_ticks
        } else {
            self.step_ticks
        };
        if f64::from(self.move_timer) < threshold {
            return Advance::Waiting;
        }
        self.move_timer = 0;
        self.slowdown = self.slowdown.saturating_sub(1);

        let dir = self.choose_dir(grid, pacman, power_mode, rng);
        let (dr, dc) = dir.delta();
        let row = self.pos.row as isize + dr;
        let mut col = self.pos.col as isize + dc;

        let mut warped = false;
        if row >= 0 && grid.warp_row() == Some(row as usize) {
            let cols = grid.cols() as isize;
            if col < 0 {
                col = cols - 1;
                warped = true;
            } else if col >= cols {
                col = 0;
                warped = true;
            }
            if warped {
                self.state = GhostState::Paused {
                    ticks: tuning.warp_pause_ticks,
                };
                self.slowdown = tuning.warp_slowdown_moves;
                debug!(ghost = self.kind.name(), row, col, "ghost warped");
            }
        }

        if !grid.contains(row, col) {
            return Advance::Blocked;
        }
        let next = Pos::new(row as usize, col as usize);
        if grid.tile(next) == Tile::Wall {
            return Advance::Blocked;
        }
        self.pos = next;
        self.last_move = Some(dir);
        if warped {
            Advance::Warped
        } else {
            Advance::Moved
        }
    }

    fn choose_dir(&mut self, grid: &Grid, pacman: Pos, power_mode: bool, rng: &mut impl Rng) -> Dir {
        if !power_mode {
            self.was_in_power_mode = false;
            if rng.gen::<f64>() < CHASE_JITTER {
                return random_dir(rng);
            }
            return chase_dir(self.pos, pacman);
        }

        if !self.was_in_power_mode {
            self.was_in_power_mode = true;
            return match self.last_move {
                Some(dir) => dir.opposite(),
                None => random_dir(rng),
            };
        }

        let mut options = Vec::with_capacity(4);
        for dir in Dir::ALL {
            let Some(next) = grid.step(self.pos, dir) else {
                continue;
            };
            if grid.tile(next) == Tile::Wall {
                continue;
            }
            if distance(grid, next, pacman) <= WANDER_RADIUS || rng.gen::<f64>() < WANDER_ALLOWANCE {
                options.push(dir);
            }
        }
        if options.is_empty() {
            random_dir(rng)
        } else {
            options[rng.gen_range(0..options.len())]
        }
    }
}

fn random_dir(rng: &mut impl Rng) -> Dir {
    Dir::ALL[rng.gen_range(0..Dir::ALL.len())]
}

/// Step along the axis with the larger offset to the target; ties go to the
/// column axis.
fn chase_dir(from: Pos, to: Pos) -> Dir {
    let row_diff = to.row as isize - from.row as isize;
    let col_diff = to.col as isize - from.col as isize;
    if row_diff.abs() > col_diff.abs() {
        if row_diff > 0 {
            Dir::Down
        } else {
            Dir::Up
        }
    } else if col_diff > 0 {
        Dir::Right
    } else {
        Dir::Left
    }
}
