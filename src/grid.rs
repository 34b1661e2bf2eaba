#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Empty,
    Pellet,
    Power,
}

impl Tile {
    pub fn is_pellet(self) -> bool {
        matches!(self, Tile::Pellet | Tile::Power)
    }
}

/// Grid cell addressed by row then column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// (row, col) displacement.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    /// Facing after a step from `from` to `to`. Rows win over columns, so a
    /// warp jump reads as a horizontal move towards the landing column.
    pub fn facing(from: Pos, to: Pos) -> Option<Dir> {
        if to.row < from.row {
            Some(Dir::Up)
        } else if to.row > from.row {
            Some(Dir::Down)
        } else if to.col < from.col {
            Some(Dir::Left)
        } else if to.col > from.col {
            Some(Dir::Right)
        } else {
            None
        }
    }
}

/// One level's maze. Walls never change after load; pellets are cleared to
/// `Tile::Empty` as they are eaten.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Tile>>,
    warp_row: Option<usize>,
}

impl Grid {
    /// Builds a grid from rectangular rows. Callers guarantee the shape and
    /// that both warp endpoints are open; `level::parse_layout` checks this.
    pub fn new(cells: Vec<Vec<Tile>>, warp_row: Option<usize>) -> Self {
        let rows = cells.len();
        let cols = cells.first().map_or(0, Vec::len);
        Self {
            rows,
            cols,
            cells,
            warp_row,
        }
    }

    pub fn filled(rows: usize, cols: usize, tile: Tile) -> Self {
        Self::new(vec![vec![tile; cols]; rows], None)
    }

    pub fn with_warp_row(mut self, row: usize) -> Self {
        self.warp_row = Some(row);
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn warp_row(&self) -> Option<usize> {
        self.warp_row
    }

    /// Left and right ends of the wraparound row.
    pub fn warp_endpoints(&self) -> Option<(Pos, Pos)> {
        self.warp_row
            .map(|row| (Pos::new(row, 0), Pos::new(row, self.cols.saturating_sub(1))))
    }

    pub fn tile(&self, pos: Pos) -> Tile {
        self.cells[pos.row][pos.col]
    }

    pub fn set(&mut self, pos: Pos, tile: Tile) {
        self.cells[pos.row][pos.col] = tile;
    }

    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols && self.tile(pos) != Tile::Wall
    }

    /// Neighbour one step away, if it is inside the grid. Walls are not
    /// filtered here.
    pub fn step(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let row = pos.row as isize + dr;
        let col = pos.col as isize + dc;
        if self.contains(row, col) {
            Some(Pos::new(row as usize, col as usize))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, Tile)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(move |(col, tile)| (Pos::new(row, col), *tile))
        })
    }

    pub fn pellets_left(&self) -> usize {
        self.iter().filter(|(_, tile)| tile.is_pellet()).count()
    }

    pub fn has_pellets(&self) -> bool {
        self.iter().any(|(_, tile)| tile.is_pellet())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_in_bounds() {
        let grid = Grid::filled(3, 3, Tile::Empty);
        assert_eq!(grid.step(Pos::new(0, 0), Dir::Up), None);
        assert_eq!(grid.step(Pos::new(0, 0), Dir::Left), None);
        assert_eq!(grid.step(Pos::new(0, 0), Dir::Right), Some(Pos::new(0, 1)));
        assert_eq!(grid.step(Pos::new(2, 2), Dir::Down), None);
    }

    #[test]
    fn pellets_are_counted_and_cleared() {
        let mut grid = Grid::filled(2, 2, Tile::Empty);
        grid.set(Pos::new(0, 1), Tile::Pellet);
        grid.set(Pos::new(1, 0), Tile::Power);
        assert_eq!(grid.pellets_left(), 2);
        grid.set(Pos::new(0, 1), Tile::Empty);
        grid.set(Pos::new(1, 0), Tile::Empty);
        assert!(!grid.has_pellets());
    }

    #[test]
    fn facing_prefers_rows() {
        let from = Pos::new(7, 0);
        assert_eq!(Dir::facing(from, Pos::new(7, 29)), Some(Dir::Right));
        assert_eq!(Dir::facing(from, Pos::new(6, 0)), Some(Dir::Up));
        assert_eq!(Dir::facing(from, from), None);
    }

    #[test]
    fn warp_endpoints_span_the_row() {
        let grid = Grid::filled(3, 5, Tile::Empty).with_warp_row(1);
        assert_eq!(
            grid.warp_endpoints(),
            Some((Pos::new(1, 0), Pos::new(1, 4)))
        );
        assert_eq!(Grid::filled(3, 5, Tile::Empty).warp_endpoints(), None);
    }
}
