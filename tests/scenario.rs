use pacbot::ghost::{GhostKind, GhostSpawn};
use pacbot::pathfinder::find_path;
use pacbot::target::select_target;
use pacbot::{Event, Grid, Phase, Pos, Session, Tile, Tuning};

fn tuning_from(start: Pos) -> Tuning {
    Tuning {
        pacman_start: start,
        ghost_home: Pos::new(40, 40),
        ..Tuning::default()
    }
}

fn single_pellet_grid() -> Grid {
    let mut grid = Grid::filled(3, 3, Tile::Empty);
    grid.set(Pos::new(2, 2), Tile::Pellet);
    grid
}

#[test]
fn clears_a_single_pellet_in_four_ticks() {
    let grid = single_pellet_grid();
    let tuning = tuning_from(Pos::new(0, 0));

    let target = select_target(Pos::new(0, 0), &grid, &[], false, 0, &tuning).unwrap();
    assert_eq!(target.pos, Pos::new(2, 2));
    let path = find_path(Pos::new(0, 0), target.pos, &grid, &[], false).unwrap();
    assert_eq!(path.len(), 4);
    assert!(path[0] == Pos::new(0, 1) || path[0] == Pos::new(1, 0));
    assert_eq!(path[3], Pos::new(2, 2));

    let mut session = Session::new(vec![grid], vec![], tuning, 11).unwrap();
    for _ in 0..3 {
        session.tick();
        assert_eq!(session.score(), 0);
    }
    assert_eq!(session.grid().tile(Pos::new(2, 2)), Tile::Pellet);

    session.tick();
    assert_eq!(session.pacman().pos, Pos::new(2, 2));
    assert_eq!(session.score(), 10);
    assert_eq!(session.grid().tile(Pos::new(2, 2)), Tile::Empty);
    assert_eq!(session.phase(), Phase::Won);
    assert!(session.drain_events().contains(&Event::Won { score: 10 }));
}

#[test]
fn advances_to_the_next_layout_then_wins() {
    let mut first = Grid::filled(1, 3, Tile::Empty);
    first.set(Pos::new(0, 1), Tile::Pellet);
    let mut second = Grid::filled(2, 3, Tile::Empty);
    second.set(Pos::new(1, 0), Tile::Power);
    second.set(Pos::new(0, 2), Tile::Wall);

    let mut session = Session::new(vec![first, second.clone()], vec![], tuning_from(Pos::new(0, 0)), 2).unwrap();
    session.tick();
    assert_eq!(session.level(), 1);
    assert_eq!(session.grid(), &second);
    assert_eq!(session.pacman().pos, Pos::new(0, 0));
    assert_eq!(session.score(), 10);
    assert_eq!(session.phase(), Phase::Playing);
    assert!(session
        .drain_events()
        .contains(&Event::LevelCleared { next_level: 1 }));

    session.tick();
    assert_eq!(session.pacman().pos, Pos::new(1, 0));
    assert_eq!(session.score(), 60);
    assert_eq!(session.phase(), Phase::Won);
}

#[test]
fn cornered_pacman_is_caught() {
    let mut grid = Grid::filled(1, 3, Tile::Empty);
    grid.set(Pos::new(0, 2), Tile::Pellet);
    let ghost = GhostSpawn {
        kind: GhostKind::Blinky,
        pos: Pos::new(0, 1),
        start_delay: 0,
        step_ticks: 1.65,
    };
    let mut session = Session::new(vec![grid], vec![ghost], tuning_from(Pos::new(0, 0)), 21).unwrap();

    for _ in 0..400 {
        session.tick();
        if session.phase() != Phase::Playing {
            break;
        }
    }
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(session.score(), 0);
    assert_eq!(session.pacman().pos, Pos::new(0, 0));

    let frozen = session.ticks();
    session.tick();
    assert_eq!(session.ticks(), frozen);
}

#[test]
fn unreachable_pellet_means_no_movement() {
    let mut grid = Grid::filled(3, 3, Tile::Empty);
    grid.set(Pos::new(0, 2), Tile::Pellet);
    grid.set(Pos::new(0, 1), Tile::Wall);
    grid.set(Pos::new(1, 2), Tile::Wall);
    grid.set(Pos::new(1, 1), Tile::Wall);

    let mut session = Session::new(vec![grid], vec![], tuning_from(Pos::new(0, 0)), 3).unwrap();
    for _ in 0..5 {
        session.tick();
    }
    assert_eq!(session.pacman().pos, Pos::new(0, 0));
    assert_eq!(session.phase(), Phase::Playing);
    assert!(session.drain_events().iter().any(|e| matches!(e, Event::NoPath { .. })));
}

#[test]
fn same_seed_same_game() {
    let mut a = Session::classic(99).unwrap();
    let mut b = Session::classic(99).unwrap();
    for _ in 0..400 {
        a.tick();
        b.tick();
        assert_eq!(a.snapshot(), b.snapshot());
    }
}

#[test]
fn classic_game_keeps_its_invariants() {
    for seed in [1, 2, 3] {
        let mut session = Session::classic(seed).unwrap();
        let mut last_score = 0;
        for _ in 0..1500 {
            session.tick();
            let snap = session.snapshot();
            assert!(snap.score >= last_score);
            last_score = snap.score;
            assert!(snap.grid.is_open(snap.pacman));
            for ghost in &snap.ghosts {
                assert!(snap.grid.is_open(ghost.pos), "{ghost:?}");
            }
            if snap.power_mode {
                assert!(snap.power_timer > 0);
            }
            if snap.phase != Phase::Playing {
                break;
            }
        }
    }
}
