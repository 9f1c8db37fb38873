//! Goal test, distance heuristic and goal-set enumeration.

use crate::geometry::{cell_to_idx, idx_to_cell, Cell, CELLS, COLS, ROWS};
use crate::layout::{cell_shift, LayoutKey};
use crate::moves::pieces;
use crate::pieces::{Piece, PieceKind, EMPTY};

/// Top-left cell the big piece must reach: bottom rows, centre columns.
pub const GOAL_ANCHOR: Cell = (ROWS - 2, 1);

/// Bitmask with every cell occupied.
const ALL_CELLS_FILLED: u32 = (1 << CELLS) - 1;

/// True when the big piece covers the exit.
///
/// Only the diagonal cells (3, 1) and (4, 2) are inspected. Precondition:
/// the layout holds exactly one 2x2 piece and every 2x2 code belongs to a
/// complete footprint, which holds for anything accepted by
/// [`crate::moves::validate`] and everything the move generator derives from
/// it. Under that precondition both cells can only hold the big piece's code
/// when its footprint is exactly rows 3-4, columns 1-2.
#[inline]
pub fn is_goal(key: LayoutKey) -> bool {
    let big = PieceKind::Big.code();
    let (row, col) = GOAL_ANCHOR;
    key.code_at(row, col) == big && key.code_at(row + 1, col + 1) == big
}

/// Top-left cell of the first 2x2 code in row-major order.
#[inline]
pub fn big_piece_anchor(key: LayoutKey) -> Option<Cell> {
    (0..CELLS)
        .find(|&cell_index| key.group(cell_index) == PieceKind::Big.code())
        .map(idx_to_cell)
}

/// Manhattan distance from the big piece to the exit.
///
/// Every move shifts the big piece by at most one cell, so this never
/// overestimates and changes by at most one per move. Layouts without a big
/// piece score zero.
#[inline]
pub fn heuristic(key: LayoutKey) -> u32 {
    match big_piece_anchor(key) {
        Some((row, col)) => (row.abs_diff(GOAL_ANCHOR.0) + col.abs_diff(GOAL_ANCHOR.1)) as u32,
        None => 0,
    }
}

/// Every goal layout with the same pieces as `start`.
///
/// The big piece is fixed on the exit and the remaining pieces and empty
/// cells are placed by backtracking over the first free cell. Returns an
/// empty list when `start` does not hold exactly one big piece.
pub fn goal_layouts(start: LayoutKey) -> Vec<LayoutKey> {
    // remaining[code] = pieces of that kind still to place, remaining[0] = empty cells
    let mut remaining = [0usize; 5];
    let mut covered = 0;
    for piece in pieces(start) {
        remaining[piece.kind.code() as usize] += 1;
        covered += piece.kind.area();
    }
    if remaining[PieceKind::Big.code() as usize] != 1 {
        return Vec::new();
    }
    remaining[PieceKind::Big.code() as usize] = 0;
    remaining[EMPTY as usize] = CELLS - covered;

    let big = Piece::new(PieceKind::Big, GOAL_ANCHOR.0, GOAL_ANCHOR.1);
    let (bits, occupied) = place(0, 0, big);

    let mut layouts = Vec::new();
    fill(bits, occupied, &mut remaining, &mut layouts);
    layouts
}

/// Writes `piece` into the key bits and the occupied mask.
fn place(bits: u64, occupied: u32, piece: Piece) -> (u64, u32) {
    piece.cells().fold((bits, occupied), |(bits, occupied), (row, col)| {
        let cell_index = cell_to_idx(row, col);
        (
            bits | (piece.kind.code() as u64) << cell_shift(cell_index),
            occupied | 1 << cell_index,
        )
    })
}

fn fill(bits: u64, occupied: u32, remaining: &mut [usize; 5], layouts: &mut Vec<LayoutKey>) {
    if occupied == ALL_CELLS_FILLED {
        layouts.push(LayoutKey::from_bits(bits));
        return;
    }

    // the number of trailing 1s equals the index of the first free cell
    let (row, col) = idx_to_cell(occupied.trailing_ones() as usize);

    if remaining[EMPTY as usize] > 0 {
        remaining[EMPTY as usize] -= 1;
        fill(bits, occupied | 1 << cell_to_idx(row, col), remaining, layouts);
        remaining[EMPTY as usize] += 1;
    }

    for kind in [PieceKind::Soldier, PieceKind::Horizontal, PieceKind::Vertical] {
        let slot = kind.code() as usize;
        if remaining[slot] == 0 {
            continue;
        }
        let piece = Piece::new(kind, row, col);
        let fits = piece.cells().all(|(r, c)| {
            r < ROWS && c < COLS && occupied & (1 << cell_to_idx(r, c)) == 0
        });
        if !fits {
            continue;
        }

        remaining[slot] -= 1;
        let (next_bits, next_occupied) = place(bits, occupied, piece);
        fill(next_bits, next_occupied, remaining, layouts);
        remaining[slot] += 1;
    }
}
