//! Piece kinds, their footprints, and the built-in starting layouts.
//!
//! A board cell stores only the *kind* of piece covering it. Pieces of the
//! same kind are interchangeable, which keeps the layout key small and
//! collapses states that differ only by swapping identical pieces.

use crate::geometry::{cell_to_idx, Cell, COLS, ROWS};

/// Code for an empty cell.
pub const EMPTY: u8 = 0;

/// The four piece kinds and their 3-bit cell codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    /// 1x1 soldier.
    Soldier = 1,
    /// 1x2 general lying across a row.
    Horizontal = 2,
    /// 2x1 general standing in a column.
    Vertical = 3,
    /// The 2x2 piece that has to reach the exit.
    Big = 4,
}

impl PieceKind {
    /// Every kind, in code order.
    pub const ALL: [PieceKind; 4] = [
        PieceKind::Soldier,
        PieceKind::Horizontal,
        PieceKind::Vertical,
        PieceKind::Big,
    ];

    /// Maps a cell code to a kind; `None` for empty and unknown codes.
    #[inline(always)]
    pub const fn from_code(code: u8) -> Option<PieceKind> {
        match code {
            1 => Some(PieceKind::Soldier),
            2 => Some(PieceKind::Horizontal),
            3 => Some(PieceKind::Vertical),
            4 => Some(PieceKind::Big),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Cell offsets from the piece's top-left anchor.
    #[inline(always)]
    pub const fn footprint(self) -> &'static [Cell] {
        match self {
            PieceKind::Soldier => &[(0, 0)],
            PieceKind::Horizontal => &[(0, 0), (0, 1)],
            PieceKind::Vertical => &[(0, 0), (1, 0)],
            PieceKind::Big => &[(0, 0), (0, 1), (1, 0), (1, 1)],
        }
    }

    /// Number of cells the piece covers.
    pub const fn area(self) -> usize {
        self.footprint().len()
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Soldier => "soldier",
            PieceKind::Horizontal => "horizontal general",
            PieceKind::Vertical => "vertical general",
            PieceKind::Big => "big piece",
        };
        f.write_str(name)
    }
}

/// A piece instance located on the board by its top-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub row: usize,
    pub col: usize,
}

impl Piece {
    pub const fn new(kind: PieceKind, row: usize, col: usize) -> Self {
        Self { kind, row, col }
    }

    /// Absolute cells covered by this piece.
    #[inline]
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.kind
            .footprint()
            .iter()
            .map(move |&(d_row, d_col)| (self.row + d_row, self.col + d_col))
    }

    /// Bitmask over cell indices covered by this piece.
    #[inline]
    pub fn cell_mask(&self) -> u32 {
        self.cells()
            .fold(0u32, |mask, (row, col)| mask | 1 << cell_to_idx(row, col))
    }
}

/// A named starting position.
pub struct NamedLayout {
    /// Short ASCII name used on the command line.
    pub name: &'static str,
    /// Traditional title.
    pub title: &'static str,
    pub cells: [[u8; COLS]; ROWS],
}

/// 横刀立马: the classic opening.
pub const HENG_DAO_LI_MA: [[u8; COLS]; ROWS] = [
    [3, 4, 4, 3],
    [3, 4, 4, 3],
    [3, 2, 2, 3],
    [3, 1, 1, 3],
    [1, 0, 0, 1],
];

/// 指挥若定.
pub const ZHI_HUI_RUO_DING: [[u8; COLS]; ROWS] = [
    [3, 4, 4, 3],
    [3, 4, 4, 3],
    [1, 2, 2, 1],
    [3, 1, 1, 3],
    [3, 0, 0, 3],
];

/// 齐头并进.
pub const QI_TOU_BING_JIN: [[u8; COLS]; ROWS] = [
    [3, 4, 4, 3],
    [3, 4, 4, 3],
    [1, 1, 1, 1],
    [3, 2, 2, 3],
    [3, 0, 0, 3],
];

/// Built-in layouts selectable by name.
pub const LAYOUTS: &[NamedLayout] = &[
    NamedLayout {
        name: "heng-dao-li-ma",
        title: "横刀立马",
        cells: HENG_DAO_LI_MA,
    },
    NamedLayout {
        name: "zhi-hui-ruo-ding",
        title: "指挥若定",
        cells: ZHI_HUI_RUO_DING,
    },
    NamedLayout {
        name: "qi-tou-bing-jin",
        title: "齐头并进",
        cells: QI_TOU_BING_JIN,
    },
];

/// Looks up a built-in layout by its command-line name.
pub fn find_layout(name: &str) -> Option<&'static NamedLayout> {
    LAYOUTS.iter().find(|layout| layout.name == name)
}
