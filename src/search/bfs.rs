//! Breadth-first search from the start layout.

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::goal::is_goal;
use crate::index::{HashIndex, IndexEntry, NodeId, VisitedIndex};
use crate::layout::LayoutKey;
use crate::moves::for_each_successor;
use crate::path::reconstruct;

use super::{
    finish, log_start, CancelToken, SearchNode, SearchOutcome, SearchReport, SearchStats,
    SearchStrategy,
};

/// Unweighted shortest path by FIFO expansion.
///
/// States are goal-tested when first indexed, so the first goal found is at
/// minimum depth.
pub struct Bfs<I = HashIndex> {
    index: PhantomData<fn() -> I>,
}

impl<I: VisitedIndex> Bfs<I> {
    pub fn new() -> Self {
        Self { index: PhantomData }
    }
}

impl<I: VisitedIndex> Default for Bfs<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: VisitedIndex> SearchStrategy for Bfs<I> {
    fn name(&self) -> &'static str {
        "bfs"
    }

    fn search(&self, start: LayoutKey, cancel: &CancelToken) -> SearchReport {
        log_start(self.name(), start);

        let mut stats = SearchStats::default();
        let mut nodes = vec![SearchNode::root(start, 0)];
        let mut index = I::default();
        index.insert_or_improve(start, IndexEntry { node: 0, g: 0 });

        if is_goal(start) {
            stats.visited = index.len();
            return finish(self.name(), SearchOutcome::Solved(reconstruct(&nodes, 0)), stats);
        }

        let mut frontier: VecDeque<NodeId> = VecDeque::from([0]);

        while let Some(id) = frontier.pop_front() {
            if cancel.is_cancelled() {
                stats.visited = index.len();
                return finish(self.name(), SearchOutcome::Cancelled, stats);
            }

            let parent = nodes[id as usize];
            stats.expanded += 1;

            let mut goal = None;
            for_each_successor(parent.key, |next| {
                stats.generated += 1;
                if goal.is_some() {
                    return;
                }

                let candidate = IndexEntry {
                    node: nodes.len() as NodeId,
                    g: parent.g + 1,
                };
                if index.insert_or_improve(next, candidate).is_some() {
                    return;
                }

                nodes.push(SearchNode::child(next, id, candidate.g, 0));
                if is_goal(next) {
                    goal = Some(candidate.node);
                } else {
                    frontier.push_back(candidate.node);
                }
            });

            if let Some(goal) = goal {
                stats.visited = index.len();
                return finish(self.name(), SearchOutcome::Solved(reconstruct(&nodes, goal)), stats);
            }
        }

        stats.visited = index.len();
        finish(self.name(), SearchOutcome::Unsolvable, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::TrieIndex;
    use crate::pieces::HENG_DAO_LI_MA;
    use crate::search::tests::assert_valid_path;

    fn solve<I: VisitedIndex>(start: LayoutKey) -> SearchReport {
        Bfs::<I>::new().search(start, &CancelToken::new())
    }

    #[test]
    fn test_solves_opening_in_published_move_count() {
        let start = LayoutKey::encode(&HENG_DAO_LI_MA).unwrap();
        let report = solve::<HashIndex>(start);
        let path = report.outcome.path().expect("opening is solvable");
        assert_eq!(path.moves(), 116);
        assert_valid_path(path, start);
        assert!(report.stats.visited > report.stats.expanded);
    }

    #[test]
    fn test_trie_index_gives_same_length() {
        let start = LayoutKey::encode(&HENG_DAO_LI_MA).unwrap();
        let path = solve::<TrieIndex>(start).outcome.into_path().unwrap();
        assert_eq!(path.moves(), 116);
        assert_valid_path(&path, start);
    }

    #[test]
    fn test_cancelled_before_first_pop() {
        let start = LayoutKey::encode(&HENG_DAO_LI_MA).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let report = Bfs::<HashIndex>::new().search(start, &cancel);
        assert_eq!(report.outcome, SearchOutcome::Cancelled);
        assert_eq!(report.stats.expanded, 0);
    }

    #[test]
    fn test_poll_limit_stops_midway() {
        let start = LayoutKey::encode(&HENG_DAO_LI_MA).unwrap();
        let cancel = CancelToken::with_poll_limit(25);
        let report = Bfs::<TrieIndex>::new().search(start, &cancel);
        assert_eq!(report.outcome, SearchOutcome::Cancelled);
        assert_eq!(report.stats.expanded, 25);
        assert!(report.stats.visited > 25);
        assert!(cancel.is_cancelled());
    }
}
