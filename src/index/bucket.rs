//! FIFO bucket of cards sharing one tree key.
//!
//! Every tree node owns one bucket; cards with identical keys queue up in
//! draw order, and ties between them are always broken by the front of the
//! queue. A node with an empty bucket is removed from its tree immediately,
//! so the trees never hold empty buckets.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::Card;

/// Ordered queue of cards with an identical key. The earliest-inserted card
/// is always served first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardBucket {
    cards: VecDeque<Card>,
}

impl CardBucket {
    /// Create an empty bucket.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bucket holding a single card.
    #[must_use]
    pub fn with_card(card: Card) -> Self {
        let mut bucket = Self::new();
        bucket.push_back(card);
        bucket
    }

    /// Append a card behind every card already queued.
    pub fn push_back(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    /// Remove and return the earliest-inserted card.
    pub fn pop_front(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    /// Peek at the earliest-inserted card.
    #[must_use]
    pub fn front(&self) -> Option<&Card> {
        self.cards.front()
    }

    /// Number of queued cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the bucket holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over the queued cards in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut bucket = CardBucket::new();
        bucket.push_back(Card::new("first", 3, 5));
        bucket.push_back(Card::new("second", 3, 5));
        bucket.push_back(Card::new("third", 3, 5));

        assert_eq!(bucket.len(), 3);
        assert_eq!(bucket.front().unwrap().name, "first");

        assert_eq!(bucket.pop_front().unwrap().name, "first");
        assert_eq!(bucket.pop_front().unwrap().name, "second");
        assert_eq!(bucket.pop_front().unwrap().name, "third");
        assert!(bucket.pop_front().is_none());
        assert!(bucket.is_empty());
    }

    #[test]
    fn test_with_card() {
        let bucket = CardBucket::with_card(Card::new("only", 1, 1));
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket.front().unwrap().name, "only");
    }

    #[test]
    fn test_iter_draw_order() {
        let mut bucket = CardBucket::new();
        for name in ["a", "b", "c"] {
            bucket.push_back(Card::new(name, 2, 2));
        }

        let names: Vec<_> = bucket.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
