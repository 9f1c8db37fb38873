//! Fixed-width layout keys: encoding, decoding and mirror canonicalization.
//!
//! A layout key packs one 3-bit piece-kind code per cell into a `u64`, cell
//! `idx` at bit offset `idx * 3` (row-major, 60 bits used). Keys are the
//! identity of a board state: two keys are equal iff every cell code matches.

use std::fmt;

use crate::error::InvalidBoard;
use crate::geometry::{cell_to_idx, CELLS, COLS, ROWS};
use crate::pieces::{PieceKind, EMPTY};

/// Bits used per cell code.
pub const BITS_PER_CELL: usize = 3;

/// Mask for a single cell code.
pub(crate) const CELL_MASK: u64 = (1 << BITS_PER_CELL) - 1;

/// Bits spanned by one board row.
const ROW_BITS: usize = COLS * BITS_PER_CELL;

const _: () = assert!(CELLS * BITS_PER_CELL <= u64::BITS as usize);
const _: () = assert!(COLS == 4, "mirror() swaps exactly four column groups");

/// Mask selecting column `col`'s code in every row.
const fn column_mask(col: usize) -> u64 {
    let mut mask = 0u64;
    let mut row = 0;
    while row < ROWS {
        mask |= CELL_MASK << (row * ROW_BITS + col * BITS_PER_CELL);
        row += 1;
    }
    mask
}

const COLUMN_0: u64 = column_mask(0);
const COLUMN_1: u64 = column_mask(1);

/// Bit offset of a cell's code.
#[inline(always)]
pub(crate) const fn cell_shift(cell_index: usize) -> usize {
    cell_index * BITS_PER_CELL
}

/// A packed board layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutKey(u64);

impl LayoutKey {
    /// Wraps raw key bits without any validation.
    #[inline(always)]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[inline(always)]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Packs a 5x4 matrix of piece-kind codes.
    ///
    /// Checks the bit budget, the dimensions and every code, but not piece
    /// shapes; see [`crate::moves::validate`] for that.
    pub fn encode<R: AsRef<[u8]>>(matrix: &[R]) -> Result<Self, InvalidBoard> {
        let rows = matrix.len();
        let widest = matrix.iter().map(|row| row.as_ref().len()).max().unwrap_or(0);

        let bits = rows * widest * BITS_PER_CELL;
        if bits > u64::BITS as usize {
            return Err(InvalidBoard::TooWide { bits });
        }

        let mut packed = 0u64;
        for (row_index, row) in matrix.iter().enumerate() {
            let row = row.as_ref();
            if rows != ROWS || row.len() != COLS {
                return Err(InvalidBoard::Dimensions {
                    rows,
                    cols: row.len(),
                });
            }
            for (col_index, &code) in row.iter().enumerate() {
                if code != EMPTY && PieceKind::from_code(code).is_none() {
                    return Err(InvalidBoard::UnknownPiece {
                        row: row_index,
                        col: col_index,
                        code,
                    });
                }
                packed |= (code as u64) << cell_shift(cell_to_idx(row_index, col_index));
            }
        }

        if rows != ROWS {
            return Err(InvalidBoard::Dimensions { rows, cols: widest });
        }

        Ok(Self(packed))
    }

    /// Encodes a matrix and checks that it is a well-formed puzzle position.
    pub fn from_matrix<R: AsRef<[u8]>>(matrix: &[R]) -> Result<Self, InvalidBoard> {
        let key = Self::encode(matrix)?;
        crate::moves::validate(key)?;
        Ok(key)
    }

    /// Unpacks the key into a row-major matrix of codes.
    pub fn decode(self) -> Vec<Vec<u8>> {
        (0..ROWS)
            .map(|row| (0..COLS).map(|col| self.code_at(row, col)).collect())
            .collect()
    }

    /// Code stored at linear cell `cell_index`.
    #[inline(always)]
    pub const fn group(self, cell_index: usize) -> u8 {
        ((self.0 >> cell_shift(cell_index)) & CELL_MASK) as u8
    }

    #[inline(always)]
    pub const fn code_at(self, row: usize, col: usize) -> u8 {
        self.group(cell_to_idx(row, col))
    }

    /// Left-right mirror image: reverses the column groups of every row.
    #[inline]
    pub const fn mirror(self) -> Self {
        let k = self.0;
        Self(
            ((k & COLUMN_0) << (3 * BITS_PER_CELL))
                | ((k & COLUMN_1) << BITS_PER_CELL)
                | ((k >> BITS_PER_CELL) & COLUMN_1)
                | ((k >> (3 * BITS_PER_CELL)) & COLUMN_0),
        )
    }

    /// The smaller of the key and its mirror image.
    ///
    /// Only ever used to decide whether a state was already seen; stored and
    /// returned keys are never replaced by their canonical form.
    #[inline]
    pub const fn canonical(self) -> Self {
        let mirrored = self.mirror();
        if mirrored.0 < self.0 {
            mirrored
        } else {
            self
        }
    }
}

impl fmt::Display for LayoutKey {
    /// Five lines of four characters, `.` for empty cells.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            for col in 0..COLS {
                match self.code_at(row, col) {
                    EMPTY => f.write_str(".")?,
                    code => write!(f, "{code}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses the text form written by `Display`.
///
/// Blank lines and whitespace between cells are ignored; `.` and `0` both
/// mean empty.
pub fn parse_board(text: &str) -> Result<LayoutKey, InvalidBoard> {
    let matrix: Vec<Vec<u8>> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.chars()
                .filter(|ch| !ch.is_whitespace())
                .map(|ch| match ch {
                    '.' => EMPTY,
                    digit @ '0'..='9' => digit as u8 - b'0',
                    other => u8::try_from(other).unwrap_or(u8::MAX),
                })
                .collect()
        })
        .collect();

    LayoutKey::from_matrix(&matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{HENG_DAO_LI_MA, LAYOUTS};

    #[test]
    fn test_encode_decode_roundtrip() {
        for layout in LAYOUTS {
            let key = LayoutKey::encode(&layout.cells).unwrap();
            let decoded = key.decode();
            for (row, expected) in decoded.iter().zip(layout.cells.iter()) {
                assert_eq!(row.as_slice(), expected.as_slice(), "{}", layout.name);
            }
        }
    }

    #[test]
    fn test_cell_codes_land_at_expected_offsets() {
        let key = LayoutKey::encode(&HENG_DAO_LI_MA).unwrap();
        // cell (0, 0) holds a vertical general in the lowest three bits
        assert_eq!(key.bits() & 0b111, 3);
        assert_eq!(key.code_at(0, 1), 4);
        assert_eq!(key.code_at(4, 1), EMPTY);
        assert_eq!(key.bits() >> (CELLS * BITS_PER_CELL), 0);
    }

    #[test]
    fn test_encode_rejects_wrong_dimensions() {
        let short = vec![vec![0u8; COLS]; ROWS - 1];
        assert_eq!(
            LayoutKey::encode(&short),
            Err(InvalidBoard::Dimensions { rows: 4, cols: 4 })
        );

        let mut ragged = HENG_DAO_LI_MA.map(|row| row.to_vec()).to_vec();
        ragged[2].pop();
        assert_eq!(
            LayoutKey::encode(&ragged),
            Err(InvalidBoard::Dimensions { rows: 5, cols: 3 })
        );
    }

    #[test]
    fn test_encode_rejects_oversized_matrix() {
        let tall = vec![vec![0u8; COLS]; 6];
        assert_eq!(
            LayoutKey::encode(&tall),
            Err(InvalidBoard::TooWide { bits: 72 })
        );
    }

    #[test]
    fn test_encode_rejects_unknown_code() {
        let mut matrix = HENG_DAO_LI_MA;
        matrix[4][0] = 7;
        assert_eq!(
            LayoutKey::encode(&matrix),
            Err(InvalidBoard::UnknownPiece {
                row: 4,
                col: 0,
                code: 7
            })
        );
    }

    #[test]
    fn test_mirror_reverses_columns() {
        let matrix = [
            [1, 2, 2, 0],
            [3, 4, 4, 0],
            [3, 4, 4, 1],
            [1, 3, 0, 1],
            [1, 3, 2, 2],
        ];
        let key = LayoutKey::encode(&matrix).unwrap();
        let mirrored = key.mirror().decode();
        for (row, original) in mirrored.iter().zip(matrix.iter()) {
            let mut reversed = original.to_vec();
            reversed.reverse();
            assert_eq!(row, &reversed);
        }
    }

    #[test]
    fn test_mirror_is_an_involution_and_canonical_is_symmetric() {
        for layout in LAYOUTS {
            let key = LayoutKey::encode(&layout.cells).unwrap();
            assert_eq!(key.mirror().mirror(), key);
            assert_eq!(key.canonical(), key.mirror().canonical());
            assert_eq!(key.canonical().canonical(), key.canonical());
            assert!(key.canonical() <= key);
        }
    }

    #[test]
    fn test_display_and_parse() {
        let key = LayoutKey::encode(&HENG_DAO_LI_MA).unwrap();
        let text = key.to_string();
        insta::assert_snapshot!(text.trim_end(), @r"
        3443
        3443
        3223
        3113
        1..1
        ");
        assert_eq!(parse_board(&text), Ok(key));
        assert_eq!(
            parse_board("3 4 4 3\n3 4 4 3\n3 2 2 3\n3 1 1 3\n1 0 0 1\n"),
            Ok(key)
        );
    }

    #[test]
    fn test_parse_rejects_letters() {
        let text = "3443\n3443\n3223\n3113\n1..x\n";
        assert_eq!(
            parse_board(text),
            Err(InvalidBoard::UnknownPiece {
                row: 4,
                col: 3,
                code: b'x'
            })
        );
    }
}
