//! Shortest-path search strategies over layout keys.
//!
//! Every strategy shares the same move generator, canonicalizer and goal
//! test; they differ only in frontier discipline. Each `search` call builds
//! its own node arena, visited index and frontier, so calls never share
//! state and can run on any thread.

pub mod astar;
pub mod bfs;
pub mod bidirectional;

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use clap::ValueEnum;
use tracing::debug;

use crate::index::{HashIndex, NodeId, TrieIndex};
use crate::layout::LayoutKey;
use crate::path::Path;

pub use astar::AStar;
pub use bfs::Bfs;
pub use bidirectional::Bidirectional;

/// A discovered state in a search's node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchNode {
    /// The layout as generated; never replaced by its canonical form.
    pub key: LayoutKey,
    pub parent: Option<NodeId>,
    /// Moves from the search root.
    pub g: u32,
    /// Heuristic estimate; zero for the uninformed strategies.
    pub h: u32,
}

impl SearchNode {
    pub const fn root(key: LayoutKey, h: u32) -> Self {
        Self {
            key,
            parent: None,
            g: 0,
            h,
        }
    }

    pub const fn child(key: LayoutKey, parent: NodeId, g: u32, h: u32) -> Self {
        Self {
            key,
            parent: Some(parent),
            g,
            h,
        }
    }
}

/// How a search ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A shortest path from the start to a goal layout.
    Solved(Path),
    /// The reachable state space holds no goal layout.
    Unsolvable,
    /// The caller's cancel token fired before the search finished.
    Cancelled,
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Solved(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            SearchOutcome::Solved(path) => Some(path),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SearchOutcome::Solved(_) => "solved",
            SearchOutcome::Unsolvable => "unsolvable",
            SearchOutcome::Cancelled => "cancelled",
        }
    }
}

/// Work counters for one search call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States whose successors were generated.
    pub expanded: usize,
    /// Successor keys produced, duplicates included.
    pub generated: usize,
    /// Distinct canonical states indexed.
    pub visited: usize,
}

/// Outcome of a search together with its counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

/// Cooperative cancellation flag shared between a caller and a search.
///
/// Searches poll it at every frontier pop and return
/// [`SearchOutcome::Cancelled`] once it is set. A token built with
/// [`CancelToken::with_poll_limit`] also sets itself once its poll budget is
/// spent, which bounds the number of expansions.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    polls_left: Option<Arc<AtomicUsize>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that answers `false` to the first `limit` polls and cancels
    /// itself on the next one.
    pub fn with_poll_limit(limit: usize) -> Self {
        Self {
            cancelled: Arc::default(),
            polls_left: Some(Arc::new(AtomicUsize::new(limit))),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        let Some(polls_left) = &self.polls_left else {
            return false;
        };
        let spent = polls_left
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |left| left.checked_sub(1))
            .is_err();
        if spent {
            self.cancel();
        }
        spent
    }
}

/// A shortest-path strategy.
pub trait SearchStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Finds a shortest path from `start` to any goal layout.
    fn search(&self, start: LayoutKey, cancel: &CancelToken) -> SearchReport;
}

/// Which search strategy to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Algorithm {
    /// Breadth-first search from the start.
    Bfs,
    /// A* on the big piece's Manhattan distance.
    #[value(name = "astar")]
    AStar,
    /// Breadth-first from both ends until the frontiers meet.
    #[default]
    Bidirectional,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Bfs => "bfs",
            Algorithm::AStar => "astar",
            Algorithm::Bidirectional => "bidirectional",
        };
        f.write_str(name)
    }
}

/// Which visited-index representation a strategy uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum IndexKind {
    /// `FxHashMap` keyed by canonical layout.
    #[default]
    Hash,
    /// Fixed-depth trie over the canonical layout's cell codes.
    Trie,
}

/// Builds the strategy for an algorithm and index pair.
///
/// The index type parameter is erased behind the vtable so callers pick
/// both at run time.
pub fn strategy(algorithm: Algorithm, index: IndexKind) -> Box<dyn SearchStrategy + Send + Sync> {
    match (algorithm, index) {
        (Algorithm::Bfs, IndexKind::Hash) => Box::new(Bfs::<HashIndex>::new()),
        (Algorithm::Bfs, IndexKind::Trie) => Box::new(Bfs::<TrieIndex>::new()),
        (Algorithm::AStar, IndexKind::Hash) => Box::new(AStar::<HashIndex>::new()),
        (Algorithm::AStar, IndexKind::Trie) => Box::new(AStar::<TrieIndex>::new()),
        (Algorithm::Bidirectional, IndexKind::Hash) => Box::new(Bidirectional::<HashIndex>::new()),
        (Algorithm::Bidirectional, IndexKind::Trie) => Box::new(Bidirectional::<TrieIndex>::new()),
    }
}

/// Logs the start of a search.
fn log_start(algorithm: &'static str, start: LayoutKey) {
    debug!(event = "search_start", algorithm, start = start.bits());
}

/// Packages and logs the end of a search.
fn finish(algorithm: &'static str, outcome: SearchOutcome, stats: SearchStats) -> SearchReport {
    debug!(
        event = "search_end",
        algorithm,
        outcome = outcome.label(),
        moves = ?outcome.path().map(Path::moves),
        expanded = stats.expanded,
        generated = stats.generated,
        visited = stats.visited,
    );
    SearchReport { outcome, stats }
}
