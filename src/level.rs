//! Built-in maze layouts and the ghost roster that goes with them.
//!
//! Layout glyphs: `#` wall, `.` pellet, `o` power pellet, space empty.

use crate::error::LevelError;
use crate::ghost::{GhostKind, GhostSpawn};
use crate::grid::{Grid, Pos, Tile};

pub const WARP_ROW: usize = 7;
pub const GHOST_STEP_TICKS: f64 = 1.65;
/// Ticks between consecutive ghosts leaving the pen at level start.
pub const GHOST_RELEASE_INTERVAL: u32 = 15;

const CLASSIC: [&str; 21] = [
    "##############################",
    "# ............##.............#",
    "#.###.#######.##.#######.###.#",
    "#o###.#######.##.#######.###o#",
    "#............................#",
    "#.###.##.############.##.###.#",
    "#.....##......##......##.....#",
    ".....###.####....####.###.....",
    "####.###.##........##.###.####",
    "####.###.##.##  ##.##.###.####",
    "####.....##.#    #.##.....####",
    "####.###.##.#    #.##.###.####",
    "####.###.##.######.##.###.####",
    "#.............##.............#",
    "#.###.#######.##.#######.###.#",
    "#o..#.........##.........#..o#",
    "###.#.##.############.##.#.###",
    "#.....##......##......##.....#",
    "#.##########..##..##########.#",
    "#.............##.............#",
    "##############################",
];

const CROSSROADS: [&str; 21] = [
    "##############################",
    "# ............##............o#",
    "#.##.##.#####.##.#####.##.##.#",
    "#.##.##.#####.##.#####.##.##.#",
    "#............................#",
    "##.####.##############.####.##",
    "#......#......##......#......#",
    "...#.#.#.####....####.#.#.#...",
    "##.#.#...##........##...#.#.##",
    "##.#.###.##.##  ##.##.###.#.##",
    "#..#.....##.#    #.##.....#..#",
    "#.##.###.##.#    #.##.###.##.#",
    "#....###.##.######.##.###....#",
    "####.......#..##..#.......####",
    "#....#####.#..##..#.#####....#",
    "#o##.......#.####.#.......##o#",
    "#.##.#####...####...#####.##.#",
    "#..........#..##..#..........#",
    "#.#########.#.##.#.#########.#",
    "#.............##.............#",
    "##############################",
];
pub fn parse_layout(rows: &[&str], warp_row: Option<usize>) -> Result<Grid, LevelError> {
    let width = rows.first().map_or(0, |r| r.chars().count());
    if width == 0 {
        return Err(LevelError::Empty);
    }

    let mut cells = Vec::with_capacity(rows.len());
    for (row, line) in rows.iter().enumerate() {
        let mut tiles = Vec::with_capacity(width);
        for (col, glyph) in line.chars().enumerate() {
            let tile = match glyph {
                '#' => Tile::Wall,
                '.' => Tile::Pellet,
                'o' => Tile::Power,
                ' ' => Tile::Empty,
                _ => return Err(LevelError::UnknownGlyph { row, col, glyph }),
            };
            tiles.push(tile);
        }
        if tiles.len() != width {
            return Err(LevelError::Ragged {
                row,
                expected: width,
                found: tiles.len(),
            });
        }
        cells.push(tiles);
    }

    if let Some(row) = warp_row {
        let Some(line) = cells.get(row) else {
            return Err(LevelError::WarpRowOutOfRange {
                row,
                rows: cells.len(),
            });
        };
        if line[0] == Tile::Wall || line[width - 1] == Tile::Wall {
            return Err(LevelError::WarpEndpointBlocked { row });
        }
    }

    Ok(Grid::new(cells, warp_row))
}

/// The levels played in order.
pub fn builtin_levels() -> Result<Vec<Grid>, LevelError> {
    [&CLASSIC[..], &CROSSROADS[..]]
        .into_iter()
        .map(|rows| parse_layout(rows, Some(WARP_ROW)))
        .collect()
}

/// Four ghosts around the pen centre, released one every
/// [`GHOST_RELEASE_INTERVAL`] ticks.
pub fn default_roster() -> Vec<GhostSpawn> {
    let cells = [
        Pos::new(10, 15),
        Pos::new(10, 16),
        Pos::new(11, 15),
        Pos::new(11, 16),
    ];
    GhostKind::ALL
        .into_iter()
        .zip(cells)
        .enumerate()
        .map(|(i, (kind, pos))| GhostSpawn {
            kind,
            pos,
            start_delay: i as u32 * GHOST_RELEASE_INTERVAL,
            step_ticks: GHOST_STEP_TICKS,
        })
        .collect()
}
