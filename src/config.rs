use std::time::{SystemTime, UNIX_EPOCH};

use crate::grid::Pos;

const DEFAULT_TICK_MS: u64 = 66;
const DEFAULT_RENDER_FPS: u64 = 60;

/// Gameplay constants supplied alongside the maze layouts. Tick counts are
/// simulation ticks; fractional cadences are compared against integer
/// counters without rounding.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    /// Ticks an eaten ghost stays away before reappearing at `ghost_home`.
    pub respawn_delay: u32,
    pub power_duration: u32,
    /// Pac-Man steps once its move counter reaches this many ticks.
    pub pacman_step_ticks: f64,
    pub pacman_power_step_ticks: f64,
    /// Ghost cadence while a post-warp slowdown is running.
    pub ghost_slowed_step_ticks: f64,
    pub warp_pause_ticks: f64,
    /// Number of ghost moves made at the slowed cadence after a warp.
    pub warp_slowdown_moves: u32,
    pub end_screen_ticks: u32,
    pub ghost_home: Pos,
    pub pacman_start: Pos,
    /// Plain pellets at or beyond this column score two steps closer.
    pub forage_bias_col: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            respawn_delay: 50,
            power_duration: 60,
            pacman_step_ticks: 0.9,
            pacman_power_step_ticks: 1.5,
            ghost_slowed_step_ticks: 3.6,
            warp_pause_ticks: 22.5,
            warp_slowdown_moves: 45,
            end_screen_ticks: 45,
            ghost_home: Pos::new(10, 15),
            pacman_start: Pos::new(1, 1),
            forage_bias_col: 14,
        }
    }
}

/// Viewer settings taken from `PACMAN_TICK_MS`, `PACMAN_FPS` and
/// `PACMAN_SEED`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSettings {
    pub tick_ms: u64,
    pub render_fps: u64,
    pub seed: u64,
}

impl RunSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let positive = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
        };
        let seed = lookup("PACMAN_SEED")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or_else(clock_seed);
        Self {
            tick_ms: positive("PACMAN_TICK_MS").unwrap_or(DEFAULT_TICK_MS),
            render_fps: positive("PACMAN_FPS").unwrap_or(DEFAULT_RENDER_FPS),
            seed,
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}
