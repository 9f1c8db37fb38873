//! Meet-in-the-middle breadth-first search.
//!
//! Slides are reversible, so the same move generator drives both sides. The
//! backward side starts from every goal layout with the start's pieces
//! (or from explicit targets). Each round expands one full level of the
//! smaller frontier, and every newly indexed state is probed in the other
//! side's index. Because whole levels are expanded and both indexes hold
//! every state up to their current depth, the first meeting found closes a
//! shortest path.

use std::marker::PhantomData;

use tracing::trace;

use crate::goal::{goal_layouts, is_goal};
use crate::index::{HashIndex, IndexEntry, NodeId, VisitedIndex};
use crate::layout::LayoutKey;
use crate::moves::for_each_successor;
use crate::path::{reconstruct, Path};

use super::{
    finish, log_start, CancelToken, SearchNode, SearchOutcome, SearchReport, SearchStats,
    SearchStrategy,
};

/// One search direction: its node arena, index and current level.
struct Side<I> {
    nodes: Vec<SearchNode>,
    index: I,
    frontier: Vec<NodeId>,
    depth: u32,
}

enum Level {
    /// Node on the expanding side and its counterpart on the other side.
    Met(NodeId, NodeId),
    Cancelled,
    Exhausted,
}

impl<I: VisitedIndex> Side<I> {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: I::default(),
            frontier: Vec::new(),
            depth: 0,
        }
    }

    /// Adds a root unless its canonical form is already present.
    fn seed(&mut self, key: LayoutKey) {
        let candidate = IndexEntry {
            node: self.nodes.len() as NodeId,
            g: 0,
        };
        if self.index.insert_or_improve(key, candidate).is_none() {
            self.nodes.push(SearchNode::root(key, 0));
            self.frontier.push(candidate.node);
        }
    }

    /// Expands every state of the current level, stopping at the first
    /// state that the opposite side has already indexed.
    fn expand_level(
        &mut self,
        opposite: &Side<I>,
        cancel: &CancelToken,
        stats: &mut SearchStats,
    ) -> Option<Level> {
        let level = std::mem::take(&mut self.frontier);
        let mut next_level = Vec::with_capacity(level.len() * 2);

        for id in level {
            if cancel.is_cancelled() {
                return Some(Level::Cancelled);
            }

            let parent = self.nodes[id as usize];
            stats.expanded += 1;

            let mut meeting = None;
            for_each_successor(parent.key, |next| {
                stats.generated += 1;
                if meeting.is_some() {
                    return;
                }

                let candidate = IndexEntry {
                    node: self.nodes.len() as NodeId,
                    g: parent.g + 1,
                };
                if self.index.insert_or_improve(next, candidate).is_some() {
                    return;
                }

                self.nodes.push(SearchNode::child(next, id, candidate.g, 0));
                match opposite.index.lookup(next) {
                    Some(other) => meeting = Some(Level::Met(candidate.node, other.node)),
                    None => next_level.push(candidate.node),
                }
            });

            if meeting.is_some() {
                return meeting;
            }
        }

        self.depth += 1;
        self.frontier = next_level;
        if self.frontier.is_empty() {
            return Some(Level::Exhausted);
        }
        None
    }
}

/// Joins the forward chain ending at `forward_node` with the reversed
/// backward chain ending at `backward_node`.
///
/// The two meeting keys share a canonical form but may be mirror images of
/// each other; the backward half is then mirrored so the path stays
/// continuous. Mirroring maps goal layouts to goal layouts.
fn join<I>(forward: &Side<I>, forward_node: NodeId, backward: &Side<I>, backward_node: NodeId) -> Path {
    let mut keys = reconstruct(&forward.nodes, forward_node).into_keys();
    let meeting = keys[keys.len() - 1];

    let backward_half = reconstruct(&backward.nodes, backward_node).into_keys();
    let mirrored = backward_half[backward_half.len() - 1] != meeting;
    keys.extend(
        backward_half
            .into_iter()
            .rev()
            .skip(1)
            .map(|key| if mirrored { key.mirror() } else { key }),
    );
    Path::new(keys)
}

/// Bidirectional breadth-first search.
pub struct Bidirectional<I = HashIndex> {
    index: PhantomData<fn() -> I>,
}

impl<I: VisitedIndex> Bidirectional<I> {
    pub fn new() -> Self {
        Self { index: PhantomData }
    }

    /// Searches from `start` towards an explicit set of target layouts.
    ///
    /// The returned path ends on one of `targets` or on its mirror image,
    /// which is the same position as far as deduplication is concerned.
    pub fn search_to(
        &self,
        start: LayoutKey,
        targets: &[LayoutKey],
        cancel: &CancelToken,
    ) -> SearchReport {
        log_start(self.name(), start);

        let mut stats = SearchStats::default();
        let mut forward = Side::<I>::new();
        let mut backward = Side::<I>::new();
        forward.seed(start);
        for &target in targets {
            backward.seed(target);
        }

        let visited = |forward: &Side<I>, backward: &Side<I>| forward.index.len() + backward.index.len();

        if let Some(entry) = backward.index.lookup(start) {
            stats.visited = visited(&forward, &backward);
            let path = join(&forward, 0, &backward, entry.node);
            return finish(self.name(), SearchOutcome::Solved(path), stats);
        }

        while !forward.frontier.is_empty() && !backward.frontier.is_empty() {
            let expand_forward = forward.frontier.len() <= backward.frontier.len();
            trace!(
                event = "level",
                direction = if expand_forward { "forward" } else { "backward" },
                forward_depth = forward.depth,
                backward_depth = backward.depth,
                forward_frontier = forward.frontier.len(),
                backward_frontier = backward.frontier.len(),
            );

            let level = if expand_forward {
                forward.expand_level(&backward, cancel, &mut stats)
            } else {
                backward.expand_level(&forward, cancel, &mut stats)
            };

            match level {
                None => {}
                Some(Level::Exhausted) => break,
                Some(Level::Cancelled) => {
                    stats.visited = visited(&forward, &backward);
                    return finish(self.name(), SearchOutcome::Cancelled, stats);
                }
                Some(Level::Met(mine, theirs)) => {
                    stats.visited = visited(&forward, &backward);
                    let path = if expand_forward {
                        join(&forward, mine, &backward, theirs)
                    } else {
                        join(&forward, theirs, &backward, mine)
                    };
                    return finish(self.name(), SearchOutcome::Solved(path), stats);
                }
            }
        }

        stats.visited = visited(&forward, &backward);
        finish(self.name(), SearchOutcome::Unsolvable, stats)
    }
}

impl<I: VisitedIndex> Default for Bidirectional<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: VisitedIndex> SearchStrategy for Bidirectional<I> {
    fn name(&self) -> &'static str {
        "bidirectional"
    }

    /// Searches towards every goal layout holding the start's pieces.
    fn search(&self, start: LayoutKey, cancel: &CancelToken) -> SearchReport {
        if is_goal(start) {
            return self.search_to(start, &[start], cancel);
        }
        self.search_to(start, &goal_layouts(start), cancel)
    }
}
