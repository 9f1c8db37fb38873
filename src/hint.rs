//! Full solutions and next-move hints for live play.

use tracing::info;

use crate::error::InvalidBoard;
use crate::layout::LayoutKey;
use crate::search::{strategy, Algorithm, CancelToken, IndexKind, SearchOutcome, SearchReport};

/// Which strategy and index a [`Solver`] runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub algorithm: Algorithm,
    pub index: IndexKind,
}

/// Answer to "what should I play next?".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextMove {
    /// The layout after the first slide of a shortest solution.
    Step(LayoutKey),
    /// The position is already solved.
    AtGoal,
    Unsolvable,
    Cancelled,
}

impl NextMove {
    pub fn layout(self) -> Option<LayoutKey> {
        match self {
            NextMove::Step(key) => Some(key),
            _ => None,
        }
    }
}

/// Stateless entry point for the game controller.
///
/// Every call runs a fresh search, so a `Solver` can be shared freely and
/// called from any mid-game position.
#[derive(Clone, Copy, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Finds a shortest solution from `start`.
    pub fn solve(&self, start: LayoutKey) -> SearchReport {
        self.solve_with(start, &CancelToken::new())
    }

    /// Like [`Solver::solve`], giving up once `cancel` fires.
    pub fn solve_with(&self, start: LayoutKey, cancel: &CancelToken) -> SearchReport {
        let report = strategy(self.config.algorithm, self.config.index).search(start, cancel);
        match &report.outcome {
            SearchOutcome::Solved(path) => info!(
                event = "solve_end",
                algorithm = %self.config.algorithm,
                moves = path.moves(),
                visited = report.stats.visited,
            ),
            other => info!(
                event = "solve_end",
                algorithm = %self.config.algorithm,
                outcome = ?other,
                visited = report.stats.visited,
            ),
        }
        report
    }

    /// Validates a board matrix and solves it.
    pub fn solve_matrix<R: AsRef<[u8]>>(&self, matrix: &[R]) -> Result<SearchReport, InvalidBoard> {
        let start = LayoutKey::from_matrix(matrix)?;
        Ok(self.solve(start))
    }

    /// The next layout on a shortest path from `current`.
    pub fn next_move(&self, current: LayoutKey) -> NextMove {
        self.next_move_with(current, &CancelToken::new())
    }

    /// Like [`Solver::next_move`], giving up once `cancel` fires.
    pub fn next_move_with(&self, current: LayoutKey, cancel: &CancelToken) -> NextMove {
        match self.solve_with(current, cancel).outcome {
            SearchOutcome::Solved(path) => match path.next_step() {
                Some(next) => NextMove::Step(next),
                None => NextMove::AtGoal,
            },
            SearchOutcome::Unsolvable => NextMove::Unsolvable,
            SearchOutcome::Cancelled => NextMove::Cancelled,
        }
    }
}
