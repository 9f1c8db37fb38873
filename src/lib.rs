//! Klotski Solver Library
//!
//! Optimal-move search for the 5x4 sliding-block puzzle: layout encoding,
//! move generation, mirror canonicalization, and three interchangeable
//! shortest-path strategies driving full solutions and next-move hints.

pub mod error;
pub mod geometry;
pub mod goal;
pub mod hint;
pub mod index;
pub mod layout;
pub mod moves;
pub mod path;
pub mod persistence;
pub mod pieces;
pub mod search;

pub use error::{InvalidBoard, KlotskiError, Result};
pub use hint::{NextMove, Solver, SolverConfig};
pub use layout::LayoutKey;
pub use path::Path;
pub use search::{Algorithm, CancelToken, IndexKind, SearchOutcome, SearchReport};
