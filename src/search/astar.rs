//! A* search guided by the big piece's distance to the exit.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::marker::PhantomData;

use crate::goal::{heuristic, is_goal};
use crate::index::{was_stored, HashIndex, IndexEntry, NodeId, VisitedIndex};
use crate::layout::LayoutKey;
use crate::moves::for_each_successor;
use crate::path::reconstruct;

use super::{
    finish, log_start, CancelToken, SearchNode, SearchOutcome, SearchReport, SearchStats,
    SearchStrategy,
};

/// Open-list entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Queued {
    f: u32,
    h: u32,
    node: NodeId,
}

impl Ord for Queued {
    /// Reversed so `BinaryHeap` pops the lowest f first, then the lowest h.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best-first search on `f = g + h`.
///
/// The heuristic is consistent, so the first goal popped is optimal. Heap
/// entries are never updated in place: a cheaper route pushes a fresh node
/// and the stale entry is skipped when it surfaces.
pub struct AStar<I = HashIndex> {
    index: PhantomData<fn() -> I>,
}

impl<I: VisitedIndex> AStar<I> {
    pub fn new() -> Self {
        Self { index: PhantomData }
    }
}

impl<I: VisitedIndex> Default for AStar<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: VisitedIndex> SearchStrategy for AStar<I> {
    fn name(&self) -> &'static str {
        "astar"
    }

    fn search(&self, start: LayoutKey, cancel: &CancelToken) -> SearchReport {
        log_start(self.name(), start);

        let mut stats = SearchStats::default();
        let start_h = heuristic(start);
        let mut nodes = vec![SearchNode::root(start, start_h)];
        let mut index = I::default();
        index.insert_or_improve(start, IndexEntry { node: 0, g: 0 });

        let mut open = BinaryHeap::from([Queued {
            f: start_h,
            h: start_h,
            node: 0,
        }]);

        while let Some(Queued { node: id, .. }) = open.pop() {
            if cancel.is_cancelled() {
                stats.visited = index.len();
                return finish(self.name(), SearchOutcome::Cancelled, stats);
            }

            let current = nodes[id as usize];
            let outdated = index
                .lookup(current.key)
                .is_some_and(|best| best.g < current.g);
            if outdated {
                continue;
            }

            if is_goal(current.key) {
                stats.visited = index.len();
                return finish(self.name(), SearchOutcome::Solved(reconstruct(&nodes, id)), stats);
            }

            stats.expanded += 1;
            for_each_successor(current.key, |next| {
                stats.generated += 1;
                let candidate = IndexEntry {
                    node: nodes.len() as NodeId,
                    g: current.g + 1,
                };
                let previous = index.insert_or_improve(next, candidate);
                if !was_stored(previous, candidate) {
                    return;
                }

                let h = heuristic(next);
                nodes.push(SearchNode::child(next, id, candidate.g, h));
                open.push(Queued {
                    f: candidate.g + h,
                    h,
                    node: candidate.node,
                });
            });
        }

        stats.visited = index.len();
        finish(self.name(), SearchOutcome::Unsolvable, stats)
    }
}
