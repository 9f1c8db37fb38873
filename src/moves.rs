//! Piece identification and successor generation over layout keys.
//!
//! Hot-path notes:
//! - Attributed cells are tracked in a `u32` bitmask, one bit per cell
//! - A slide is applied to the key with two masks (clear old, set new)
//! - `for_each_successor` hands keys to a closure so searches never allocate
//!   a successor list

use std::fmt;

use crate::error::InvalidBoard;
use crate::geometry::{cell_to_idx, idx_to_cell, Direction, CELLS, COLS, ROWS};
use crate::layout::{cell_shift, LayoutKey, CELL_MASK};
use crate::pieces::{Piece, PieceKind, EMPTY};

/// One piece slid one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    /// The piece as it stood before the move.
    pub piece: Piece,
    pub direction: Direction,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "move the {} at row {}, column {} {}",
            self.piece.kind, self.piece.row, self.piece.col, self.direction
        )
    }
}

/// Returns the piece's cell mask if every footprint cell is on the board,
/// not yet attributed, and holds the piece's code.
#[inline]
fn claim(key: LayoutKey, piece: Piece, attributed: u32) -> Option<u32> {
    let mut mask = 0u32;
    for &(d_row, d_col) in piece.kind.footprint() {
        let (row, col) = (piece.row + d_row, piece.col + d_col);
        if row >= ROWS || col >= COLS {
            return None;
        }
        let cell_index = cell_to_idx(row, col);
        if attributed & (1 << cell_index) != 0 || key.group(cell_index) != piece.kind.code() {
            return None;
        }
        mask |= 1 << cell_index;
    }
    Some(mask)
}

/// Scans cells row-major and reports each piece it can identify.
///
/// Runs of horizontal codes are split from the left and runs of vertical
/// codes from the top, which is the only tiling of a one-wide strip. Cells
/// that cannot complete their footprint are reported to `on_malformed` and
/// otherwise skipped.
fn scan_pieces(
    key: LayoutKey,
    mut on_piece: impl FnMut(Piece),
    mut on_malformed: impl FnMut(usize, usize),
) {
    let mut attributed = 0u32;

    for cell_index in 0..CELLS {
        if attributed & (1 << cell_index) != 0 {
            continue;
        }

        let (row, col) = idx_to_cell(cell_index);
        let code = key.group(cell_index);
        let Some(kind) = PieceKind::from_code(code) else {
            if code != EMPTY {
                on_malformed(row, col);
            }
            continue;
        };

        let piece = Piece::new(kind, row, col);
        match claim(key, piece, attributed) {
            Some(mask) => {
                attributed |= mask;
                on_piece(piece);
            }
            None => on_malformed(row, col),
        }
    }
}

/// Every piece on the board, in row-major order of their anchors.
pub fn pieces(key: LayoutKey) -> Vec<Piece> {
    let mut found = Vec::with_capacity(CELLS);
    scan_pieces(key, |piece| found.push(piece), |_, _| {});
    found
}

/// Checks that every occupied cell belongs to a complete piece and that
/// exactly one 2x2 piece is on the board.
pub fn validate(key: LayoutKey) -> Result<(), InvalidBoard> {
    let mut big_pieces = 0;
    let mut first_malformed = None;

    scan_pieces(
        key,
        |piece| {
            if piece.kind == PieceKind::Big {
                big_pieces += 1;
            }
        },
        |row, col| {
            first_malformed.get_or_insert((row, col));
        },
    );

    if let Some((row, col)) = first_malformed {
        return Err(InvalidBoard::MalformedPiece { row, col });
    }
    if big_pieces != 1 {
        return Err(InvalidBoard::BigPieceCount(big_pieces));
    }
    Ok(())
}

/// Slides `piece` one cell, or `None` if a destination cell is off the board
/// or held by another piece.
#[inline]
pub fn slide(key: LayoutKey, piece: Piece, direction: Direction) -> Option<LayoutKey> {
    let own_cells = piece.cell_mask();
    let code = piece.kind.code() as u64;

    let mut cleared = key.bits();
    let mut placed = 0u64;
    for cell in piece.cells() {
        let (row, col) = direction.step(cell)?;
        let dest = cell_to_idx(row, col);
        if own_cells & (1 << dest) == 0 && key.group(dest) != EMPTY {
            return None;
        }
        placed |= code << cell_shift(dest);
        cleared &= !(CELL_MASK << cell_shift(cell_to_idx(cell.0, cell.1)));
    }

    Some(LayoutKey::from_bits(cleared | placed))
}

/// Calls `emit` with every layout reachable by one single-cell slide.
///
/// Keys are not deduplicated.
#[inline]
pub fn for_each_successor(key: LayoutKey, mut emit: impl FnMut(LayoutKey)) {
    scan_pieces(
        key,
        |piece| {
            for direction in Direction::ALL {
                if let Some(next) = slide(key, piece, direction) {
                    emit(next);
                }
            }
        },
        |_, _| {},
    );
}

/// Every layout reachable by one single-cell slide.
pub fn successors(key: LayoutKey) -> Vec<LayoutKey> {
    let mut next = Vec::new();
    for_each_successor(key, |successor| next.push(successor));
    next
}

/// Every legal move paired with the layout it produces.
pub fn legal_moves(key: LayoutKey) -> Vec<(Move, LayoutKey)> {
    let mut moves = Vec::new();
    scan_pieces(
        key,
        |piece| {
            for direction in Direction::ALL {
                if let Some(next) = slide(key, piece, direction) {
                    moves.push((Move { piece, direction }, next));
                }
            }
        },
        |_, _| {},
    );
    moves
}

/// The move that turns `before` into `after`, if they are one slide apart.
pub fn find_move(before: LayoutKey, after: LayoutKey) -> Option<Move> {
    legal_moves(before)
        .into_iter()
        .find(|&(_, next)| next == after)
        .map(|(found, _)| found)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rustc_hash::FxHashSet;

    use super::*;
    use crate::pieces::HENG_DAO_LI_MA;

    fn start() -> LayoutKey {
        LayoutKey::encode(&HENG_DAO_LI_MA).unwrap()
    }

    fn kind_counts(key: LayoutKey) -> [usize; 5] {
        let mut counts = [0; 5];
        for piece in pieces(key) {
            counts[piece.kind.code() as usize] += 1;
        }
        counts
    }

    #[test]
    fn test_identifies_all_pieces() {
        let found = pieces(start());
        assert_eq!(found.len(), 10);
        assert_eq!(kind_counts(start()), [0, 4, 1, 4, 1]);
        assert!(found.contains(&Piece::new(PieceKind::Big, 0, 1)));
        // stacked verticals split from the top
        assert!(found.contains(&Piece::new(PieceKind::Vertical, 0, 0)));
        assert!(found.contains(&Piece::new(PieceKind::Vertical, 2, 0)));
    }

    #[test]
    fn test_opening_successors() {
        let next = successors(start());
        assert_eq!(next.len(), 4);

        let canonical: FxHashSet<_> = next.iter().map(|key| key.canonical()).collect();
        assert_eq!(canonical.len(), 2, "opening is mirror symmetric");
    }

    #[test]
    fn test_successor_generation_is_deterministic() {
        let mut first: Vec<_> = successors(start()).iter().map(|k| k.canonical()).collect();
        let mut second: Vec<_> = successors(start()).iter().map(|k| k.canonical()).collect();
        first.sort();
        second.sort();
        assert_eq!(first, second);
    }

    #[test]
    fn test_successors_preserve_structure() {
        let expected_counts = kind_counts(start());
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([start()]);
        seen.insert(start());

        while let Some(key) = queue.pop_front() {
            if seen.len() > 3000 {
                break;
            }
            for next in successors(key) {
                assert_eq!(validate(next), Ok(()), "invalid successor\n{next}");
                assert_eq!(kind_counts(next), expected_counts);
                assert!(
                    find_move(next, key).is_some(),
                    "every slide can be undone"
                );
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    #[test]
    fn test_find_move_describes_slide() {
        let soldier = Piece::new(PieceKind::Soldier, 4, 0);
        let after = slide(start(), soldier, Direction::Right).unwrap();
        assert_eq!(after.code_at(4, 0), EMPTY);
        assert_eq!(after.code_at(4, 1), PieceKind::Soldier.code());

        let found = find_move(start(), after).unwrap();
        assert_eq!(found.piece, soldier);
        assert_eq!(found.direction, Direction::Right);
        assert_eq!(found.to_string(), "move the soldier at row 4, column 0 right");

        assert_eq!(find_move(start(), start()), None);
    }

    #[test]
    fn test_blocked_slides_are_rejected() {
        let big = Piece::new(PieceKind::Big, 0, 1);
        for direction in Direction::ALL {
            assert_eq!(slide(start(), big, direction), None);
        }
    }

    #[test]
    fn test_validate_rejects_broken_footprints() {
        let mut lone_horizontal = HENG_DAO_LI_MA;
        lone_horizontal[3][1] = 2;
        let key = LayoutKey::encode(&lone_horizontal).unwrap();
        assert_eq!(
            validate(key),
            Err(InvalidBoard::MalformedPiece { row: 3, col: 1 })
        );
        // the generator skips the broken group instead of failing
        assert!(pieces(key).iter().all(|piece| (piece.row, piece.col) != (3, 1)));

        let mut no_big = HENG_DAO_LI_MA;
        for row in &mut no_big[..2] {
            row[1] = 1;
            row[2] = 1;
        }
        let key = LayoutKey::encode(&no_big).unwrap();
        assert_eq!(validate(key), Err(InvalidBoard::BigPieceCount(0)));

        assert_eq!(validate(start()), Ok(()));
    }
}
