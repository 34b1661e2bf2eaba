//! The game session: owns every piece of mutable state and advances it one
//! tick at a time. Renderers read a [`Snapshot`] and drain [`Event`]s; they
//! never mutate the session.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::collision::{consume_pellet, frighten, resolve_collision, Collision, Consumed};
use crate::config::Tuning;
use crate::distance::distance;
use crate::error::LevelError;
use crate::ghost::{Advance, Ghost, GhostKind, GhostSpawn};
use crate::grid::{Dir, Grid, Pos};
use crate::level::{builtin_levels, default_roster};
use crate::pathfinder::find_path;
use crate::player::PacMan;
use crate::safety::{waypoints_clear, WAYPOINT_CLEARANCE};
use crate::target::{select_target, Reason};

/// A ghost closer than this makes Pac-Man hold still and re-plan instead of
/// stepping.
const CLOSE_QUARTERS: f64 = 1.5;
/// Ticks per mouth open/closed phase.
const MOUTH_PHASE_TICKS: u64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
    Won,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    PathInvalidated,
    TargetChosen { target: Pos, reason: Reason },
    NoPath { from: Pos, to: Pos },
    PelletEaten { pos: Pos },
    PowerPelletEaten { pos: Pos },
    GhostEaten { kind: GhostKind, points: u32 },
    GhostRespawned { kind: GhostKind },
    GhostWarped { kind: GhostKind },
    PowerModeEnded,
    LevelCleared { next_level: usize },
    GameOver { score: u32 },
    Won { score: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostView {
    pub kind: GhostKind,
    pub pos: Pos,
    pub frightened: bool,
    pub visible: bool,
}

/// Read-only view handed to the renderer once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub pacman: Pos,
    pub facing: Dir,
    pub mouth_open: bool,
    pub ghosts: Vec<GhostView>,
    pub score: u32,
    pub level: usize,
    pub phase: Phase,
    pub power_mode: bool,
    pub power_timer: u32,
}

pub struct Session {
    levels: Vec<Grid>,
    roster: Vec<GhostSpawn>,
    tuning: Tuning,
    rng: ChaCha8Rng,
    level: usize,
    grid: Grid,
    pacman: PacMan,
    ghosts: Vec<Ghost>,
    score: u32,
    power_mode: bool,
    power_timer: u32,
    ghosts_eaten: u32,
    phase: Phase,
    ticks: u64,
    events: Vec<Event>,
}

impl Session {
    pub fn new(levels: Vec<Grid>, roster: Vec<GhostSpawn>, tuning: Tuning, seed: u64) -> Result<Self, LevelError> {
        let grid = levels.first().cloned().ok_or(LevelError::NoLevels)?;
        let ghosts = roster.iter().map(Ghost::new).collect();
        let pacman = PacMan::new(tuning.pacman_start);
        info!(levels = levels.len(), seed, "session started");
        Ok(Self {
            levels,
            roster,
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
            level: 0,
            grid,
            pacman,
            ghosts,
            score: 0,
            power_mode: false,
            power_timer: 0,
            ghosts_eaten: 0,
            phase: Phase::Playing,
            ticks: 0,
            events: Vec::new(),
        })
    }

    /// Session over the built-in mazes with the standard ghost roster.
    pub fn classic(seed: u64) -> Result<Self, LevelError> {
        Self::new(builtin_levels()?, default_roster(), Tuning::default(), seed)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn pacman(&self) -> &PacMan {
        &self.pacman
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn power_mode(&self) -> bool {
        self.power_mode
    }

    pub fn power_timer(&self) -> u32 {
        self.power_timer
    }

    pub fn ghosts_eaten(&self) -> u32 {
        self.ghosts_eaten
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            pacman: self.pacman.pos,
            facing: self.pacman.facing,
            mouth_open: (self.ticks / MOUTH_PHASE_TICKS) % 2 == 0,
            ghosts: self
                .ghosts
                .iter()
                .map(|g| GhostView {
                    kind: g.kind,
                    pos: g.pos,
                    frightened: g.frightened,
                    visible: g.is_active(),
                })
                .collect(),
            score: self.score,
            level: self.level,
            phase: self.phase,
            power_mode: self.power_mode,
            power_timer: self.power_timer,
        }
    }

    /// Advances the simulation by one frame. Terminal phases are frozen.
    pub fn tick(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.ticks += 1;

        if !self.power_mode
            && !self.pacman.path.is_empty()
            && !waypoints_clear(&self.grid, &self.pacman.path, &self.ghosts, WAYPOINT_CLEARANCE)
        {
            debug!("path became unsafe");
            self.pacman.discard_route();
            self.events.push(Event::PathInvalidated);
        }

        if self.pacman.needs_route() {
            self.plan_route();
        }

        if self.move_pacman() == Flow::Stop {
            return;
        }
        if self.move_ghosts() == Flow::Stop {
            return;
        }
        self.tick_respawns();
        self.tick_power();
        self.check_level_clear();
    }

    fn plan_route(&mut self) {
        let target = select_target(
            self.pacman.pos,
            &self.grid,
            &self.ghosts,
            self.power_mode,
            self.power_timer,
            &self.tuning,
        );
        if let Some(target) = target {
            self.events.push(Event::TargetChosen {
                target: target.pos,
                reason: target.reason,
            });
            match find_path(self.pacman.pos, target.pos, &self.grid, &self.ghosts, self.power_mode) {
                Some(path) => self.pacman.set_route(path),
                None => {
                    self.pacman.path.clear();
                    self.events.push(Event::NoPath {
                        from: self.pacman.pos,
                        to: target.pos,
                    });
                }
            }
        }
        self.pacman.recompute = false;
    }

    /// Steps Pac-Man when his cadence allows, then eats whatever lies under
    /// him, including the start cell on ticks he stands still.
    fn move_pacman(&mut self) -> Flow {
        let stepped = self.step_pacman();
        self.eat_pellet(self.pacman.pos);
        if stepped {
            self.collide()
        } else {
            Flow::Continue
        }
    }

    fn step_pacman(&mut self) -> bool {
        let cadence = if self.power_mode {
            self.tuning.pacman_power_step_ticks
        } else {
            self.tuning.pacman_step_ticks
        };
        if !self.pacman.tick_cadence(cadence) {
            return false;
        }

        if !self.power_mode && self.ghost_within(CLOSE_QUARTERS) {
            debug!(pos = ?self.pacman.pos, "ghost too close, re-planning");
            self.pacman.discard_route();
            return false;
        }
        self.pacman.step().is_some()
    }

    fn ghost_within(&self, radius: f64) -> bool {
        self.ghosts
            .iter()
            .any(|g| g.is_active() && distance(&self.grid, self.pacman.pos, g.pos) < radius)
    }

    fn eat_pellet(&mut self, pos: Pos) {
        let consumed = consume_pellet(&mut self.grid, pos);
        self.score += consumed.points();
        match consumed {
            Consumed::Nothing => {}
            Consumed::Pellet => self.events.push(Event::PelletEaten { pos }),
            Consumed::PowerPellet => {
                debug!(?pos, "power mode");
                self.power_mode = true;
                self.power_timer = self.tuning.power_duration;
                frighten(&mut self.ghosts);
                self.pacman.recompute = true;
                self.events.push(Event::PowerPelletEaten { pos });
            }
        }
    }

    fn collide(&mut self) -> Flow {
        let resolution = resolve_collision(
            self.pacman.pos,
            &mut self.ghosts,
            self.power_mode,
            self.score,
            self.ghosts_eaten,
            self.tuning.respawn_delay,
        );
        self.score = resolution.score;
        self.ghosts_eaten = resolution.ghosts_eaten;
        if resolution.recompute {
            self.pacman.recompute = true;
        }
        match resolution.outcome {
            Collision::None => Flow::Continue,
            Collision::AteGhost { kind, points } => {
                self.events.push(Event::GhostEaten { kind, points });
                Flow::Continue
            }
            Collision::GameOver { .. } => {
                info!(score = self.score, level = self.level, "game over");
                self.phase = Phase::GameOver;
                self.events.push(Event::GameOver { score: self.score });
                Flow::Stop
            }
        }
    }

    fn move_ghosts(&mut self) -> Flow {
        for idx in 0..self.ghosts.len() {
            if self.ghosts[idx].is_eaten() {
                continue;
            }
            let step = self.ghosts[idx].advance(
                &self.grid,
                self.pacman.pos,
                self.power_mode,
                &self.tuning,
                &mut self.rng,
            );
            if step == Advance::Warped {
                self.events.push(Event::GhostWarped {
                    kind: self.ghosts[idx].kind,
                });
            }
            if self.collide() == Flow::Stop {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    fn tick_respawns(&mut self) {
        for ghost in self.ghosts.iter_mut() {
            if ghost.tick_respawn(self.tuning.ghost_home, self.power_mode) {
                debug!(ghost = ghost.kind.name(), "ghost respawned");
                self.events.push(Event::GhostRespawned { kind: ghost.kind });
            }
        }
    }

    fn tick_power(&mut self) {
        if !self.power_mode {
            return;
        }
        self.power_timer = self.power_timer.saturating_sub(1);
        if self.power_timer > 0 {
            return;
        }
        self.power_mode = false;
        self.ghosts_eaten = 0;
        for ghost in self.ghosts.iter_mut() {
            if ghost.is_active() {
                ghost.frightened = false;
            }
            ghost.was_in_power_mode = false;
        }
        self.pacman.recompute = true;
        debug!("power mode ended");
        self.events.push(Event::PowerModeEnded);
    }

    fn check_level_clear(&mut self) {
        if self.grid.has_pellets() {
            return;
        }
        let next = self.level + 1;
        if next >= self.levels.len() {
            info!(score = self.score, "all levels cleared");
            self.phase = Phase::Won;
            self.events.push(Event::Won { score: self.score });
            return;
        }
        info!(level = next + 1, score = self.score, "level start");
        self.level = next;
        self.grid = self.levels[next].clone();
        self.pacman = PacMan::new(self.tuning.pacman_start);
        self.ghosts = self.roster.iter().map(Ghost::new).collect();
        self.power_mode = false;
        self.power_timer = 0;
        self.ghosts_eaten = 0;
        self.events.push(Event::LevelCleared { next_level: next });
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}
