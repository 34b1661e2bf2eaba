//! Grid distance used as the pathfinder heuristic and as the proximity
//! metric for every threat check.

use crate::grid::{Grid, Pos};

/// A possibly fractional grid location, produced when sampling along a
/// straight line between two cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub row: f64,
    pub col: f64,
}

impl Point {
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Point at parameter `t` on the segment `from..to`.
    pub fn lerp(from: Pos, to: Pos, t: f64) -> Self {
        let from = Point::from(from);
        let to = Point::from(to);
        Self {
            row: from.row + t * (to.row - from.row),
            col: from.col + t * (to.col - from.col),
        }
    }
}

impl From<Pos> for Point {
    fn from(pos: Pos) -> Self {
        Self {
            row: pos.row as f64,
            col: pos.col as f64,
        }
    }
}

/// Manhattan distance between two cells, shortened through the warp tunnel
/// when both lie on the wraparound row.
pub fn distance(grid: &Grid, a: Pos, b: Pos) -> f64 {
    point_distance(grid, a.into(), b.into())
}

pub fn point_distance(grid: &Grid, a: Point, b: Point) -> f64 {
    let direct = (a.row - b.row).abs() + (a.col - b.col).abs();
    let Some(warp_row) = grid.warp_row() else {
        return direct;
    };
    let warp_row = warp_row as f64;
    if a.row != warp_row || b.row != warp_row {
        return direct;
    }
    let last = grid.cols().saturating_sub(1) as f64;
    // Each detour pays one extra step for the edge itself.
    let via_left = a.col + (b.col - last).abs() + 1.0;
    let via_right = (a.col - last).abs() + b.col + 1.0;
    let along_row = (a.col - b.col).abs();
    direct.min(along_row.min(via_left).min(via_right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;

    fn tunnel_grid() -> Grid {
        Grid::filled(9, 30, Tile::Empty).with_warp_row(7)
    }

    #[test]
    fn plain_manhattan_off_the_warp_row() {
        let grid = tunnel_grid();
        assert_eq!(distance(&grid, Pos::new(1, 1), Pos::new(4, 5)), 7.0);
        assert_eq!(distance(&grid, Pos::new(7, 0), Pos::new(6, 29)), 30.0);
    }

    #[test]
    fn warp_row_uses_the_tunnel() {
        let grid = tunnel_grid();
        assert_eq!(distance(&grid, Pos::new(7, 0), Pos::new(7, 29)), 1.0);
        assert_eq!(distance(&grid, Pos::new(7, 2), Pos::new(7, 27)), 6.0);
        assert_eq!(distance(&grid, Pos::new(7, 10), Pos::new(7, 12)), 2.0);
    }

    #[test]
    fn no_tunnel_without_a_warp_row() {
        let grid = Grid::filled(9, 30, Tile::Empty);
        assert_eq!(distance(&grid, Pos::new(7, 0), Pos::new(7, 29)), 29.0);
    }

    #[test]
    fn fractional_points() {
        let grid = tunnel_grid();
        let mid = Point::lerp(Pos::new(0, 0), Pos::new(2, 2), 0.5);
        assert_eq!(mid, Point::new(1.0, 1.0));
        assert!((point_distance(&grid, Point::new(0.5, 0.5), Pos::new(1, 1).into()) - 1.0).abs() < 1e-9);
    }
}
