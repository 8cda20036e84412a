//! The composite two-level deck index.
//!
//! Cards are indexed simultaneously by attack and by health:
//!
//! - [`AttackIndex`] - outer AVL tree keyed by current attack; the deck.
//!   Each node owns one current-health [`HealthIndex`] holding every card
//!   at that attack value.
//! - [`HealthIndex`] - augmented AVL tree keyed by a health scalar; also
//!   used standalone as the discard pile (keyed by missing health).
//! - [`CardBucket`] - FIFO of cards sharing one exact key within a node.
//!
//! Every node caches subtree-wide max/min bounds so the priority searches
//! can prune whole subtrees without visiting them.
//!
//! Both trees store their nodes in a flat arena (`Vec` plus a free list)
//! and link them by [`NodeId`] indices; recursive mutators take a node id
//! and return the new subtree root id.

pub mod attack;
pub mod bucket;
pub mod health;

pub use attack::AttackIndex;
pub use bucket::CardBucket;
pub use health::{HealthIndex, HealthKey};

use serde::{Deserialize, Serialize};

/// Index into a tree's node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node (an absent child, or an empty
    /// tree's root).
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Check if this refers to a node.
    #[inline]
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }

    /// Get the arena index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}
