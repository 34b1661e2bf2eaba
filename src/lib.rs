//! Autonomous Pac-Man: a path-finding agent, four pursuing ghosts and a
//! fixed-tick simulation on an integer grid.

pub mod collision;
pub mod config;
pub mod distance;
pub mod error;
pub mod ghost;
pub mod grid;
pub mod level;
pub mod pathfinder;
pub mod player;
pub mod safety;
pub mod session;
pub mod target;

pub use config::{RunSettings, Tuning};
pub use error::LevelError;
pub use grid::{Dir, Grid, Pos, Tile};
pub use session::{Event, Phase, Session, Snapshot};
