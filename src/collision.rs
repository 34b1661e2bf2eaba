use tracing::info;

use crate::ghost::{Ghost, GhostKind};
use crate::grid::{Grid, Pos, Tile};

pub const PELLET_POINTS: u32 = 10;
pub const POWER_PELLET_POINTS: u32 = 50;
/// First ghost of a power mode; the nth is worth n times this.
pub const GHOST_POINTS: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    None,
    AteGhost { kind: GhostKind, points: u32 },
    GameOver { kind: GhostKind },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Collision,
    pub score: u32,
    pub ghosts_eaten: u32,
    /// Pac-Man's route should be planned again.
    pub recompute: bool,
}

/// Resolves Pac-Man meeting the first active ghost on its cell. In power
/// mode the ghost is eaten for `200 * (ghosts_eaten + 1)`; otherwise the game
/// is over and the score stands.
pub fn resolve_collision(
    pacman: Pos,
    ghosts: &mut [Ghost],
    power_mode: bool,
    score: u32,
    ghosts_eaten: u32,
    respawn_delay: u32,
) -> Resolution {
    let unchanged = Resolution {
        outcome: Collision::None,
        score,
        ghosts_eaten,
        recompute: false,
    };
    let Some(ghost) = ghosts.iter_mut().find(|g| g.is_active() && g.pos == pacman) else {
        return unchanged;
    };

    if !power_mode {
        info!(ghost = ghost.kind.name(), ?pacman, score, "caught by ghost");
        return Resolution {
            outcome: Collision::GameOver { kind: ghost.kind },
            ..unchanged
        };
    }

    ghost.eat(respawn_delay);
    let points = GHOST_POINTS * (ghosts_eaten + 1);
    info!(ghost = ghost.kind.name(), ?pacman, points, "ate ghost");
    Resolution {
        outcome: Collision::AteGhost {
            kind: ghost.kind,
            points,
        },
        score: score + points,
        ghosts_eaten: ghosts_eaten + 1,
        recompute: true,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consumed {
    Nothing,
    Pellet,
    PowerPellet,
}

impl Consumed {
    pub fn points(self) -> u32 {
        match self {
            Consumed::Nothing => 0,
            Consumed::Pellet => PELLET_POINTS,
            Consumed::PowerPellet => POWER_PELLET_POINTS,
        }
    }
}

/// Clears any pellet under `pos`.
pub fn consume_pellet(grid: &mut Grid, pos: Pos) -> Consumed {
    let consumed = match grid.tile(pos) {
        Tile::Pellet => Consumed::Pellet,
        Tile::Power => Consumed::PowerPellet,
        _ => return Consumed::Nothing,
    };
    grid.set(pos, Tile::Empty);
    consumed
}

/// Turns every active ghost frightened.
pub fn frighten(ghosts: &mut [Ghost]) {
    for ghost in ghosts.iter_mut().filter(|g| g.is_active()) {
        ghost.frightened = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghost::GhostSpawn;

    fn ghosts_at(cells: &[Pos]) -> Vec<Ghost> {
        cells
            .iter()
            .zip(GhostKind::ALL)
            .map(|(pos, kind)| {
                Ghost::new(&GhostSpawn {
                    kind,
                    pos: *pos,
                    start_delay: 0,
                    step_ticks: 1.65,
                })
            })
            .collect()
    }

    #[test]
    fn no_contact() {
        let mut ghosts = ghosts_at(&[Pos::new(3, 3)]);
        let res = resolve_collision(Pos::new(1, 1), &mut ghosts, true, 120, 0, 50);
        assert_eq!(res.outcome, Collision::None);
        assert_eq!(res.score, 120);
        assert!(!res.recompute);
    }

    #[test]
    fn eating_escalates() {
        let mut ghosts = ghosts_at(&[Pos::new(1, 1), Pos::new(1, 1)]);
        let first = resolve_collision(Pos::new(1, 1), &mut ghosts, true, 0, 0, 50);
        assert_eq!(
            first.outcome,
            Collision::AteGhost {
                kind: GhostKind::Blinky,
                points: 200
            }
        );
        assert!(first.recompute);
        assert!(ghosts[0].is_eaten());
        assert_eq!(ghosts[0].respawn_timer(), 50);

        let second = resolve_collision(Pos::new(1, 1), &mut ghosts, true, first.score, first.ghosts_eaten, 50);
        assert_eq!(second.score, 600);
        assert_eq!(second.ghosts_eaten, 2);
        assert!(ghosts[1].is_eaten());
    }

    #[test]
    fn contact_outside_power_mode_ends_the_game() {
        let mut ghosts = ghosts_at(&[Pos::new(2, 2)]);
        let res = resolve_collision(Pos::new(2, 2), &mut ghosts, false, 340, 0, 50);
        assert_eq!(
            res.outcome,
            Collision::GameOver {
                kind: GhostKind::Blinky
            }
        );
        assert_eq!(res.score, 340);
        assert!(ghosts[0].is_active());
    }

    #[test]
    fn eaten_ghosts_do_not_collide() {
        let mut ghosts = ghosts_at(&[Pos::new(2, 2)]);
        ghosts[0].eat(10);
        let res = resolve_collision(Pos::new(2, 2), &mut ghosts, false, 0, 0, 50);
        assert_eq!(res.outcome, Collision::None);
    }

    #[test]
    fn pellets_are_cleared() {
        let mut grid = Grid::filled(1, 3, Tile::Empty);
        grid.set(Pos::new(0, 1), Tile::Pellet);
        grid.set(Pos::new(0, 2), Tile::Power);
        assert_eq!(consume_pellet(&mut grid, Pos::new(0, 0)), Consumed::Nothing);
        assert_eq!(consume_pellet(&mut grid, Pos::new(0, 1)).points(), 10);
        assert_eq!(consume_pellet(&mut grid, Pos::new(0, 2)).points(), 50);
        assert_eq!(grid.tile(Pos::new(0, 1)), Tile::Empty);
        assert_eq!(grid.tile(Pos::new(0, 2)), Tile::Empty);
    }

    #[test]
    fn frighten_skips_eaten_ghosts() {
        let mut ghosts = ghosts_at(&[Pos::new(0, 0), Pos::new(1, 1)]);
        ghosts[1].eat(5);
        frighten(&mut ghosts);
        assert!(ghosts[0].frightened);
        assert!(!ghosts[1].frightened);
    }
}
