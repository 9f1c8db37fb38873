//! Visited-state indexes keyed by canonical layout.
//!
//! Each search call owns a fresh index. Both implementations canonicalize
//! the key they are handed, so mirror images share one entry, and both keep
//! at most one entry per canonical key: the one with the lowest `g`.

use rustc_hash::FxHashMap;

use crate::geometry::CELLS;
use crate::layout::LayoutKey;

/// Position of a search node in its search's node arena.
pub type NodeId = u32;

/// Best known node for a canonical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub node: NodeId,
    /// Moves from the search root.
    pub g: u32,
}

/// A per-search map from canonical layout to its best known node.
pub trait VisitedIndex: Default {
    fn lookup(&self, key: LayoutKey) -> Option<IndexEntry>;

    /// Stores `candidate` if the key is new or `candidate.g` is strictly lower
    /// than the stored `g`. Returns the entry that was stored before the
    /// call, if any.
    fn insert_or_improve(&mut self, key: LayoutKey, candidate: IndexEntry) -> Option<IndexEntry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// True when `insert_or_improve` returning `previous` means the candidate
/// was stored.
#[inline]
pub fn was_stored(previous: Option<IndexEntry>, candidate: IndexEntry) -> bool {
    match previous {
        None => true,
        Some(existing) => candidate.g < existing.g,
    }
}

/// Index backed by an `FxHashMap`.
#[derive(Default)]
pub struct HashIndex {
    entries: FxHashMap<LayoutKey, IndexEntry>,
}

impl VisitedIndex for HashIndex {
    #[inline]
    fn lookup(&self, key: LayoutKey) -> Option<IndexEntry> {
        self.entries.get(&key.canonical()).copied()
    }

    #[inline]
    fn insert_or_improve(&mut self, key: LayoutKey, candidate: IndexEntry) -> Option<IndexEntry> {
        match self.entries.entry(key.canonical()) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(candidate);
                None
            }
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                let previous = *slot.get();
                if candidate.g < previous.g {
                    slot.insert(candidate);
                }
                Some(previous)
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Children of one trie node, indexed by a cell's 3-bit code.
///
/// Slot value 0 means absent (the root is never a child). On the last level
/// a slot holds `entry index + 1` instead of a node index.
type TrieNode = [u32; 8];

/// Fixed-depth trie over the canonical key's cell codes, cell 0 first.
///
/// Nodes live in one arena; walking twenty 8-way levels avoids hashing the
/// whole key on every probe.
pub struct TrieIndex {
    nodes: Vec<TrieNode>,
    entries: Vec<IndexEntry>,
}

impl Default for TrieIndex {
    fn default() -> Self {
        Self {
            nodes: vec![[0; 8]],
            entries: Vec::new(),
        }
    }
}

impl TrieIndex {
    /// Slot on the last level for `key`, if the path to it exists.
    #[inline]
    fn find_leaf_slot(&self, key: LayoutKey) -> Option<u32> {
        let mut node = 0usize;
        for cell_index in 0..CELLS - 1 {
            let child = self.nodes[node][key.group(cell_index) as usize];
            if child == 0 {
                return None;
            }
            node = child as usize;
        }
        Some(self.nodes[node][key.group(CELLS - 1) as usize])
    }
}

impl VisitedIndex for TrieIndex {
    #[inline]
    fn lookup(&self, key: LayoutKey) -> Option<IndexEntry> {
        match self.find_leaf_slot(key.canonical()) {
            Some(slot) if slot != 0 => Some(self.entries[slot as usize - 1]),
            _ => None,
        }
    }

    fn insert_or_improve(&mut self, key: LayoutKey, candidate: IndexEntry) -> Option<IndexEntry> {
        let key = key.canonical();

        let mut node = 0usize;
        for cell_index in 0..CELLS - 1 {
            let group = key.group(cell_index) as usize;
            let child = self.nodes[node][group];
            node = if child == 0 {
                let created = self.nodes.len();
                self.nodes.push([0; 8]);
                self.nodes[node][group] = created as u32;
                created
            } else {
                child as usize
            };
        }

        let group = key.group(CELLS - 1) as usize;
        match self.nodes[node][group] {
            0 => {
                self.entries.push(candidate);
                self.nodes[node][group] = self.entries.len() as u32;
                None
            }
            slot => {
                let stored = &mut self.entries[slot as usize - 1];
                let previous = *stored;
                if candidate.g < previous.g {
                    *stored = candidate;
                }
                Some(previous)
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
