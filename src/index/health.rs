//! Health index - augmented AVL tree keyed by a health scalar.
//!
//! Two modes, differing only in which card scalar keys the tree:
//!
//! - [`HealthKey::Current`]: the inner tree owned by each attack node of
//!   the deck index.
//! - [`HealthKey::Missing`]: the standalone discard pile, queried by the
//!   heal phase.
//!
//! Each node buckets every card with its exact key and caches the subtree
//! max/min key. BST ordering means one child suffices per bound: the max
//! can only live in the right subtree, the min only in the left.
//!
//! Nodes live in a flat arena and link by [`NodeId`]; recursive mutators
//! return the new subtree root so rotations and successor promotion never
//! leave a dangling link.

use std::mem;

use serde::{Deserialize, Serialize};

use super::bucket::CardBucket;
use super::NodeId;
use crate::core::Card;

/// Which scalar of a card keys the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthKey {
    /// Current health - inner trees of the deck.
    Current,
    /// Missing health - the discard pile.
    Missing,
}

impl HealthKey {
    /// Extract this key from a card.
    #[must_use]
    pub fn of(self, card: &Card) -> i64 {
        match self {
            HealthKey::Current => card.current_health,
            HealthKey::Missing => card.missing_health,
        }
    }
}

/// One keyed node: its bucket of same-keyed cards, AVL height, and the
/// cached subtree key bounds.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct HealthNode {
    key: i64,
    /// Max key over this subtree (`max(key, right.max_key)`).
    max_key: i64,
    /// Min key over this subtree (`min(key, left.min_key)`).
    min_key: i64,
    height: i32,
    left: NodeId,
    right: NodeId,
    bucket: CardBucket,
}

/// Augmented AVL tree of cards keyed by a health scalar.
///
/// `len` counts cards, not nodes. Queries return `None` when nothing
/// qualifies; that is a normal outcome, not an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthIndex {
    nodes: Vec<HealthNode>,
    /// Arena slots freed by node removal, reused by the next insert.
    free: Vec<NodeId>,
    root: NodeId,
    keyed_by: HealthKey,
    len: usize,
}

impl HealthIndex {
    /// Create an empty index keyed by the given scalar.
    #[must_use]
    pub fn new(keyed_by: HealthKey) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId::NONE,
            keyed_by,
            len: 0,
        }
    }

    /// Number of indexed cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest key in the index, or 0 when empty (the "no cards" sentinel).
    #[must_use]
    pub fn max_key(&self) -> i64 {
        if self.root.is_none() {
            0
        } else {
            self.node(self.root).max_key
        }
    }

    /// Insert a card under its key, creating the node if needed.
    pub fn insert(&mut self, card: Card) {
        let root = self.root;
        self.root = self.insert_at(root, card);
        self.len += 1;
    }

    /// Remove and return the earliest-inserted card with the given key.
    ///
    /// If the key's bucket empties, the node itself leaves the tree
    /// (in-order successor promotion for the two-child case).
    pub fn remove(&mut self, key: i64) -> Option<Card> {
        let root = self.root;
        let mut removed = None;
        self.root = self.remove_at(root, key, &mut removed);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// The card with the smallest key strictly greater than `threshold`:
    /// the cheapest card that would still be alive after `threshold` damage.
    #[must_use]
    pub fn min_surviving(&self, threshold: i64) -> Option<&Card> {
        let mut candidate = NodeId::NONE;
        let mut current = self.root;
        while current.is_some() {
            let node = self.node(current);
            if node.key > threshold {
                candidate = current;
                current = node.left;
            } else {
                current = node.right;
            }
        }
        if candidate.is_none() {
            None
        } else {
            self.node(candidate).bucket.front()
        }
    }

    /// The card with the smallest key.
    #[must_use]
    pub fn min_card(&self) -> Option<&Card> {
        if self.root.is_none() {
            return None;
        }
        self.node(self.min_node(self.root)).bucket.front()
    }

    /// The card with the largest key `<= limit`, pruning any subtree whose
    /// cached min already exceeds the limit.
    #[must_use]
    pub fn max_at_most(&self, limit: i64) -> Option<&Card> {
        self.max_at_most_in(self.root, limit)
    }

    /// All cards in ascending key order, draw order within a key.
    #[must_use]
    pub fn cards_in_order(&self) -> Vec<&Card> {
        let mut out = Vec::with_capacity(self.len);
        self.collect_in_order(self.root, &mut out);
        out
    }

    // === Arena plumbing ===

    fn node(&self, id: NodeId) -> &HealthNode {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut HealthNode {
        &mut self.nodes[id.index()]
    }

    fn alloc(&mut self, card: Card) -> NodeId {
        let key = self.keyed_by.of(&card);
        let node = HealthNode {
            key,
            max_key: key,
            min_key: key,
            height: 0,
            left: NodeId::NONE,
            right: NodeId::NONE,
            bucket: CardBucket::with_card(card),
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                let id = NodeId::new(self.nodes.len() as u32);
                self.nodes.push(node);
                id
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        debug_assert!(self.node(id).bucket.is_empty());
        self.free.push(id);
    }

    fn height_of(&self, id: NodeId) -> i32 {
        if id.is_none() {
            -1
        } else {
            self.node(id).height
        }
    }

    fn balance_of(&self, id: NodeId) -> i32 {
        if id.is_none() {
            0
        } else {
            self.height_of(self.node(id).left) - self.height_of(self.node(id).right)
        }
    }

    /// Recompute height and key bounds from the node's children.
    fn refresh(&mut self, id: NodeId) {
        let (left, right, key) = {
            let node = self.node(id);
            (node.left, node.right, node.key)
        };
        let height = self.height_of(left).max(self.height_of(right)) + 1;
        let max_key = if right.is_some() {
            key.max(self.node(right).max_key)
        } else {
            key
        };
        let min_key = if left.is_some() {
            key.min(self.node(left).min_key)
        } else {
            key
        };
        let node = self.node_mut(id);
        node.height = height;
        node.max_key = max_key;
        node.min_key = min_key;
    }

    // === AVL mechanics ===

    fn rotate_right(&mut self, y: NodeId) -> NodeId {
        let x = self.node(y).left;
        if x.is_none() {
            return y;
        }
        let pivot = self.node(x).right;
        self.node_mut(x).right = y;
        self.node_mut(y).left = pivot;
        self.refresh(y);
        self.refresh(x);
        x
    }

    fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let y = self.node(x).right;
        if y.is_none() {
            return x;
        }
        let pivot = self.node(y).left;
        self.node_mut(y).left = x;
        self.node_mut(x).right = pivot;
        self.refresh(x);
        self.refresh(y);
        y
    }

    /// Refresh this node's stats, then restore the AVL condition with a
    /// single or double rotation. Returns the new subtree root.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        self.refresh(id);
        let balance = self.balance_of(id);

        if balance > 1 {
            let left = self.node(id).left;
            if self.balance_of(left) < 0 {
                let new_left = self.rotate_left(left);
                self.node_mut(id).left = new_left;
            }
            return self.rotate_right(id);
        }

        if balance < -1 {
            let right = self.node(id).right;
            if self.balance_of(right) > 0 {
                let new_right = self.rotate_right(right);
                self.node_mut(id).right = new_right;
            }
            return self.rotate_left(id);
        }

        id
    }

    fn insert_at(&mut self, id: NodeId, card: Card) -> NodeId {
        if id.is_none() {
            return self.alloc(card);
        }

        let key = self.keyed_by.of(&card);
        let node_key = self.node(id).key;
        if key < node_key {
            let left = self.node(id).left;
            let new_left = self.insert_at(left, card);
            self.node_mut(id).left = new_left;
        } else if key > node_key {
            let right = self.node(id).right;
            let new_right = self.insert_at(right, card);
            self.node_mut(id).right = new_right;
        } else {
            self.node_mut(id).bucket.push_back(card);
            return id;
        }

        self.rebalance(id)
    }

    fn remove_at(&mut self, id: NodeId, key: i64, removed: &mut Option<Card>) -> NodeId {
        if id.is_none() {
            return NodeId::NONE;
        }

        let node_key = self.node(id).key;
        if key < node_key {
            let left = self.node(id).left;
            let new_left = self.remove_at(left, key, removed);
            self.node_mut(id).left = new_left;
        } else if key > node_key {
            let right = self.node(id).right;
            let new_right = self.remove_at(right, key, removed);
            self.node_mut(id).right = new_right;
        } else {
            *removed = self.node_mut(id).bucket.pop_front();

            if self.node(id).bucket.is_empty() {
                let (left, right) = {
                    let node = self.node(id);
                    (node.left, node.right)
                };
                if left.is_none() {
                    self.release(id);
                    return right;
                }
                if right.is_none() {
                    self.release(id);
                    return left;
                }
                // Two children: promote the in-order successor's key and
                // bucket into this node, then delete the successor node.
                let successor = self.min_node(right);
                let succ_key = self.node(successor).key;
                let succ_bucket = mem::take(&mut self.node_mut(successor).bucket);
                {
                    let node = self.node_mut(id);
                    node.key = succ_key;
                    node.bucket = succ_bucket;
                }
                let new_right = self.remove_node(right, succ_key);
                self.node_mut(id).right = new_right;
            }
        }

        self.rebalance(id)
    }

    /// Structurally delete the node with `key`, whatever its bucket holds.
    /// Only reached for successor nodes whose bucket was already moved up.
    fn remove_node(&mut self, id: NodeId, key: i64) -> NodeId {
        if id.is_none() {
            return NodeId::NONE;
        }

        let node_key = self.node(id).key;
        if key < node_key {
            let left = self.node(id).left;
            let new_left = self.remove_node(left, key);
            self.node_mut(id).left = new_left;
        } else if key > node_key {
            let right = self.node(id).right;
            let new_right = self.remove_node(right, key);
            self.node_mut(id).right = new_right;
        } else {
            let (left, right) = {
                let node = self.node(id);
                (node.left, node.right)
            };
            if left.is_none() {
                self.release(id);
                return right;
            }
            if right.is_none() {
                self.release(id);
                return left;
            }
            let successor = self.min_node(right);
            let succ_key = self.node(successor).key;
            let succ_bucket = mem::take(&mut self.node_mut(successor).bucket);
            {
                let node = self.node_mut(id);
                node.key = succ_key;
                node.bucket = succ_bucket;
            }
            let new_right = self.remove_node(right, succ_key);
            self.node_mut(id).right = new_right;
        }

        self.rebalance(id)
    }

    /// Leftmost node of the subtree rooted at `id` (must not be NONE).
    fn min_node(&self, id: NodeId) -> NodeId {
        let mut current = id;
        loop {
            let left = self.node(current).left;
            if left.is_none() {
                return current;
            }
            current = left;
        }
    }

    fn max_at_most_in(&self, id: NodeId, limit: i64) -> Option<&Card> {
        if id.is_none() || self.node(id).min_key > limit {
            return None;
        }

        // Right first: larger keys win.
        if let Some(card) = self.max_at_most_in(self.node(id).right, limit) {
            return Some(card);
        }

        let node = self.node(id);
        if node.key <= limit {
            if let Some(card) = node.bucket.front() {
                return Some(card);
            }
        }

        self.max_at_most_in(node.left, limit)
    }

    fn collect_in_order<'a>(&'a self, id: NodeId, out: &mut Vec<&'a Card>) {
        if id.is_none() {
            return;
        }
        let node = self.node(id);
        self.collect_in_order(node.left, out);
        out.extend(node.bucket.iter());
        self.collect_in_order(node.right, out);
    }
}

#[cfg(test)]
impl HealthIndex {
    /// Walk the whole tree asserting BST order, AVL balance, exact heights
    /// and exact cached bounds, and that `len` matches the card count.
    pub(crate) fn check_invariants(&self) {
        let mut count = 0;
        self.check_node(self.root, i64::MIN, i64::MAX, &mut count);
        assert_eq!(count, self.len, "card count out of sync");
    }

    /// Returns `(height, subtree_min, subtree_max)`.
    fn check_node(
        &self,
        id: NodeId,
        lo: i64,
        hi: i64,
        count: &mut usize,
    ) -> Option<(i32, i64, i64)> {
        if id.is_none() {
            return None;
        }
        let node = self.node(id);
        assert!(lo < node.key && node.key < hi, "BST order violated");
        assert!(!node.bucket.is_empty(), "empty bucket left in tree");
        for card in node.bucket.iter() {
            assert_eq!(self.keyed_by.of(card), node.key, "card under wrong key");
        }
        *count += node.bucket.len();

        let left = self.check_node(node.left, lo, node.key, count);
        let right = self.check_node(node.right, node.key, hi, count);
        let lh = left.map_or(-1, |(h, _, _)| h);
        let rh = right.map_or(-1, |(h, _, _)| h);
        assert_eq!(node.height, lh.max(rh) + 1, "stale height");
        assert!((lh - rh).abs() <= 1, "AVL balance violated");

        let min = left.map_or(node.key, |(_, min, _)| min);
        let max = right.map_or(node.key, |(_, _, max)| max);
        assert_eq!(node.min_key, min, "stale min bound");
        assert_eq!(node.max_key, max, "stale max bound");

        Some((node.height, min, max))
    }
}
