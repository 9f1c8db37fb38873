//! Solution paths and their reconstruction from a search's node arena.

use std::fmt;

use crate::index::NodeId;
use crate::layout::LayoutKey;
use crate::moves::{find_move, Move};
use crate::search::SearchNode;

/// Layouts from a start to a goal, each one slide from the next.
///
/// Never empty: a start that is already solved gives a one-element path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path(Vec<LayoutKey>);

impl Path {
    /// Wraps a key sequence; `keys` must hold at least the start.
    pub(crate) fn new(keys: Vec<LayoutKey>) -> Self {
        debug_assert!(!keys.is_empty(), "a path always holds its start");
        Self(keys)
    }

    pub fn keys(&self) -> &[LayoutKey] {
        &self.0
    }

    pub fn into_keys(self) -> Vec<LayoutKey> {
        self.0
    }

    /// Number of single-cell slides.
    pub fn moves(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn start(&self) -> LayoutKey {
        self.0[0]
    }

    pub fn goal(&self) -> LayoutKey {
        self.0[self.0.len() - 1]
    }

    /// The layout after the first slide, or `None` when already solved.
    pub fn next_step(&self) -> Option<LayoutKey> {
        self.0.get(1).copied()
    }

    /// The slide taken at each step.
    pub fn slides(&self) -> Vec<Move> {
        self.0
            .windows(2)
            .filter_map(|pair| find_move(pair[0], pair[1]))
            .collect()
    }
}

impl fmt::Display for Path {
    /// Move count, then every layout labelled with the slide that reached it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Moves: {}", self.moves())?;
        writeln!(f)?;
        writeln!(f, "Start:")?;
        write!(f, "{}", self.start())?;

        for (step, pair) in self.0.windows(2).enumerate() {
            writeln!(f)?;
            match find_move(pair[0], pair[1]) {
                Some(slide) => writeln!(f, "Step {}: {}", step + 1, slide)?,
                None => writeln!(f, "Step {}:", step + 1)?,
            }
            write!(f, "{}", pair[1])?;
        }
        Ok(())
    }
}

/// Walks parent links from `terminal` to the root and returns them root
/// first.
pub fn reconstruct(nodes: &[SearchNode], terminal: NodeId) -> Path {
    let mut keys = Vec::with_capacity(nodes[terminal as usize].g as usize + 1);
    let mut current = Some(terminal);
    while let Some(id) = current {
        let node = &nodes[id as usize];
        keys.push(node.key);
        current = node.parent;
    }
    keys.reverse();
    Path::new(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;
    use crate::layout::parse_board;
    use crate::moves::{slide, successors};
    use crate::pieces::{Piece, PieceKind, HENG_DAO_LI_MA};

    #[test]
    fn test_reconstruct_follows_parents() {
        let start = LayoutKey::encode(&HENG_DAO_LI_MA).unwrap();
        let first = successors(start)[0];
        let second = successors(first)
            .into_iter()
            .find(|&key| key != start)
            .unwrap();

        let nodes = vec![
            SearchNode::root(start, 3),
            SearchNode::child(first, 0, 1, 3),
            // unrelated sibling, never on the walk
            SearchNode::child(successors(start)[1], 0, 1, 3),
            SearchNode::child(second, 1, 2, 3),
        ];

        let path = reconstruct(&nodes, 3);
        assert_eq!(path.keys(), &[start, first, second]);
        assert_eq!(path.moves(), 2);
        assert_eq!(path.start(), start);
        assert_eq!(path.goal(), second);
        assert_eq!(path.next_step(), Some(first));
        assert_eq!(path.slides().len(), 2);

        let root_only = reconstruct(&nodes, 0);
        assert_eq!(root_only.keys(), &[start]);
        assert_eq!(root_only.moves(), 0);
        assert_eq!(root_only.next_step(), None);
    }

    #[test]
    fn test_display_lists_every_step() {
        let start = parse_board("3113\n3223\n3443\n3443\n1..1\n").unwrap();
        let big = Piece::new(PieceKind::Big, 2, 1);
        let solved = slide(start, big, Direction::Down).unwrap();
        let path = Path::new(vec![start, solved]);

        insta::assert_snapshot!(path.to_string().trim_end(), @r"
        Moves: 1

        Start:
        3113
        3223
        3443
        3443
        1..1

        Step 1: move the big piece at row 2, column 1 down
        3113
        3223
        3..3
        3443
        1441
        ");
    }
}
