//! # nightpass
//!
//! A survivor card-game simulator built around a composite two-level
//! augmented search structure.
//!
//! ## Architecture
//!
//! The deck is indexed simultaneously by attack and by health: an outer
//! AVL tree keyed by current attack, where every node owns an inner AVL
//! tree keyed by current health, with FIFO buckets for exact duplicates.
//! Each node caches subtree max/min bounds, so the battle searches prune
//! whole subtrees instead of scanning cards.
//!
//! Five fixed strategies pick the card to defend with:
//!
//! 1. Survive the hit and kill the attacker (minimal attack, then minimal
//!    surviving health).
//! 2. Survive without killing (maximal attack below the attacker's power).
//! 3. Kill without surviving (sacrifice the weakest qualifying card).
//! 4. Neither: the weakest card at the maximum attack, as a fallback.
//! 5. Steal: like 1 with strict limits, on behalf of the Stranger.
//!
//! The discard pile reuses the inner tree standalone, keyed by missing
//! health, so the heal phase can find the most expensive affordable
//! revive in logarithmic time.
//!
//! ## Modules
//!
//! - `core`: the `Card` value and its stat-mutation rules
//! - `index`: FIFO buckets, the health index, the attack index and its
//!   priority searches
//! - `game`: the simulation context, battle/heal phases, command layer

pub mod core;
pub mod game;
pub mod index;

// Re-export commonly used types
pub use crate::core::Card;
pub use crate::game::{BattleOutcome, CardFate, Command, CommandError, Game, Winner};
pub use crate::index::{AttackIndex, CardBucket, HealthIndex, HealthKey, NodeId};
