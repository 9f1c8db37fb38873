//! Board dimensions, cell addressing and movement directions.
//!
//! Cells are addressed row-major: `idx = row * COLS + col`, with row 0 at the
//! top of the board.

/// Number of rows on the board.
pub const ROWS: usize = 5;

/// Number of columns on the board.
pub const COLS: usize = 4;

/// Total cells on the board.
pub const CELLS: usize = ROWS * COLS;

/// A `(row, col)` board position.
pub type Cell = (usize, usize);

/// Converts `(row, col)` to a linear cell index.
#[inline(always)]
pub const fn cell_to_idx(row: usize, col: usize) -> usize {
    row * COLS + col
}

/// Converts a linear cell index to `(row, col)`.
#[inline(always)]
pub const fn idx_to_cell(cell_index: usize) -> Cell {
    (cell_index / COLS, cell_index % COLS)
}

/// One of the four orthogonal single-cell slides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order the move generator tries them.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row and column delta of a one-cell slide.
    #[inline(always)]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Shifts `cell` one step, or `None` if it would leave the board.
    #[inline(always)]
    pub fn step(self, (row, col): Cell) -> Option<Cell> {
        let (d_row, d_col) = self.delta();
        let new_row = row.checked_add_signed(d_row)?;
        let new_col = col.checked_add_signed(d_col)?;
        (new_row < ROWS && new_col < COLS).then_some((new_row, new_col))
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}
