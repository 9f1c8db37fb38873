//! File I/O for boards and solutions.
//!
//! Board files hold the text form of a layout: five lines of four cells,
//! `.` or `0` for empty and `1`-`4` for soldier, horizontal general,
//! vertical general and the big piece. Solution files hold the rendering of
//! a [`Path`]: the move count, then every layout with the slide that led to
//! it.

use std::fs::{self, File};
use std::io::Write;

use crate::error::Result;
use crate::layout::{parse_board, LayoutKey};
use crate::path::Path;

/// Reads and validates a board file.
pub fn load_board(file: impl AsRef<std::path::Path>) -> Result<LayoutKey> {
    let text = fs::read_to_string(file)?;
    Ok(parse_board(&text)?)
}

/// Writes a board in the format `load_board` reads.
pub fn save_board(file: impl AsRef<std::path::Path>, key: LayoutKey) -> Result<()> {
    let mut file = File::create(file)?;
    write!(file, "{key}")?;
    Ok(())
}

/// Saves a solution in human-readable text format.
pub fn save_path(file: impl AsRef<std::path::Path>, path: &Path) -> Result<()> {
    let mut file = File::create(file)?;
    write!(file, "{path}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::{InvalidBoard, KlotskiError};
    use crate::hint::Solver;
    use crate::pieces::ZHI_HUI_RUO_DING;

    /// A file name in the temp dir unique to this test process.
    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("klotski-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_board_file_roundtrip() {
        let file = scratch_file("board.txt");
        let key = LayoutKey::encode(&ZHI_HUI_RUO_DING).unwrap();

        save_board(&file, key).unwrap();
        assert_eq!(load_board(&file).unwrap(), key);

        fs::remove_file(&file).unwrap();
    }

    #[test]
    fn test_load_rejects_malformed_board() {
        let file = scratch_file("broken.txt");
        fs::write(&file, "3443\n3443\n3223\n3113\n").unwrap();

        match load_board(&file) {
            Err(KlotskiError::InvalidBoard(InvalidBoard::Dimensions { rows: 4, .. })) => {}
            other => panic!("expected a dimension error, got {other:?}"),
        }

        fs::remove_file(&file).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let file = scratch_file("does-not-exist.txt");
        assert!(matches!(load_board(&file), Err(KlotskiError::Io(_))));
    }

    #[test]
    fn test_save_path_writes_rendering() {
        let file = scratch_file("solution.txt");
        let start = LayoutKey::encode(&ZHI_HUI_RUO_DING).unwrap();
        let path = Solver::default().solve(start).outcome.into_path().unwrap();

        save_path(&file, &path).unwrap();
        let written = fs::read_to_string(&file).unwrap();
        assert_eq!(written, path.to_string());
        assert!(written.starts_with(&format!("Moves: {}\n", path.moves())));

        fs::remove_file(&file).unwrap();
    }
}
