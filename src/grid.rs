use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Enumeration order used everywhere neighbors are visited, ties in path search included.
    pub fn all_dirs() -> &'static [Direction] {
        static ALL_DIRECTIONS: [Direction; 4] = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];

        &ALL_DIRECTIONS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    r: usize,
    c: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

impl Position {
    pub fn new(r: usize, c: usize) -> Self {
        Self { r, c }
    }

    pub fn r(&self) -> usize {
        self.r
    }

    pub fn c(&self) -> usize {
        self.c
    }
}

/// Largest grid whose per cell tables can still be allocated.
pub const MAX_CELL_N: usize = isize::MAX as usize / std::mem::size_of::<Option<usize>>();

/// Cell count of a `row_n` x `col_n` grid, None if it's beyond `MAX_CELL_N`.
pub fn checked_cell_n(row_n: usize, col_n: usize) -> Option<usize> {
    row_n.checked_mul(col_n).filter(|n| *n <= MAX_CELL_N)
}

/// Addressing over a `row_n` x `col_n` grid, cells numbered row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTopology {
    row_n: usize,
    col_n: usize,
}

impl GridTopology {
    pub fn new(row_n: usize, col_n: usize) -> Self {
        assert!(
            row_n > 0 && col_n > 0,
            "Grid needs at least one row and one column, given {}x{}.",
            row_n,
            col_n
        );
        assert!(
            checked_cell_n(row_n, col_n).is_some(),
            "Grid of {}x{} has too many cells.",
            row_n,
            col_n
        );
        Self { row_n, col_n }
    }

    pub fn row_n(&self) -> usize {
        self.row_n
    }

    pub fn col_n(&self) -> usize {
        self.col_n
    }

    pub fn cell_n(&self) -> usize {
        self.row_n * self.col_n
    }

    pub fn start(&self) -> usize {
        0
    }

    pub fn goal(&self) -> usize {
        self.cell_n() - 1
    }

    pub fn is_corner(&self, id: usize) -> bool {
        id == self.start() || id == self.goal()
    }

    pub fn position(&self, id: usize) -> Position {
        debug_assert!(id < self.cell_n(), "Cell id({}) out of grid.", id);
        Position::new(id / self.col_n, id % self.col_n)
    }

    pub fn neighbor(&self, id: usize, dir: Direction) -> Option<usize> {
        assert!(
            id < self.cell_n(),
            "Cell id({}) out of grid with {} cell(s).",
            id,
            self.cell_n()
        );
        match dir {
            Direction::Up if id >= self.col_n => Some(id - self.col_n),
            Direction::Down if id + self.col_n < self.cell_n() => Some(id + self.col_n),
            Direction::Left if id % self.col_n != 0 => Some(id - 1),
            Direction::Right if (id + 1) % self.col_n != 0 => Some(id + 1),
            _ => None,
        }
    }

    /// Neighbors of given cell in `Direction::all_dirs` order, edges skipped.
    pub fn neighbors(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        Direction::all_dirs()
            .iter()
            .flat_map(move |dir| self.neighbor(id, *dir))
    }

    pub fn are_neighbors(&self, id0: usize, id1: usize) -> bool {
        self.neighbors(id0).any(|id| id == id1)
    }
}
