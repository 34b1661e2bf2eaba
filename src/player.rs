use std::collections::VecDeque;

use crate::grid::{Dir, Pos};

/// The autonomous Pac-Man agent. `facing` only matters to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct PacMan {
    pub pos: Pos,
    pub facing: Dir,
    /// Waypoints still to visit, nearest first.
    pub path: VecDeque<Pos>,
    pub recompute: bool,
    pub move_timer: u32,
}

impl PacMan {
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            facing: Dir::Right,
            path: VecDeque::new(),
            recompute: true,
            move_timer: 0,
        }
    }

    pub fn destination(&self) -> Option<Pos> {
        self.path.back().copied()
    }

    pub fn needs_route(&self) -> bool {
        self.recompute || self.path.is_empty() || self.destination() == Some(self.pos)
    }

    pub fn set_route(&mut self, path: Vec<Pos>) {
        self.path = path.into();
    }

    pub fn discard_route(&mut self) {
        self.path.clear();
        self.recompute = true;
    }

    /// Advances the move counter; true once it has reached `cadence` ticks
    /// and there is somewhere to go.
    pub fn tick_cadence(&mut self, cadence: f64) -> bool {
        self.move_timer += 1;
        !self.path.is_empty() && f64::from(self.move_timer) >= cadence
    }

    /// Moves onto the next waypoint and returns it.
    pub fn step(&mut self) -> Option<Pos> {
        let next = self.path.pop_front()?;
        if let Some(dir) = Dir::facing(self.pos, next) {
            self.facing = dir;
        }
        self.pos = next;
        self.move_timer = 0;
        Some(next)
    }
}
