//! Cards - the mutable value identities moved through the indices.
//!
//! A `Card` is owned by exactly one structure at a time (the deck, the
//! discard pile, or a transient local during a battle step). The indices
//! transfer cards by value; nothing clones a live card.
//!
//! ## Stat rules
//!
//! The mutation rules below are the game's combat arithmetic. The indices
//! never call them; callers apply them between a removal and the following
//! reinsertion, so a card's key never changes while it is indexed.

use serde::{Deserialize, Serialize};

/// A card in the game.
///
/// Invariant: `0 <= current_health <= base_health`. A card with
/// `current_health == 0` is dead and carries `missing_health == base_health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Display name, also the card's identity in command output.
    pub name: String,

    /// Attack printed on the card.
    pub base_attack: i64,

    /// Attack after damage decay; the deck index keys on this.
    pub current_attack: i64,

    /// Health printed on the card.
    pub base_health: i64,

    /// Remaining health; inner deck indices key on this.
    pub current_health: i64,

    /// Health to restore before the card can fight again; the discard
    /// pile keys on this.
    pub missing_health: i64,
}

impl Card {
    /// Create a freshly drawn card at full stats.
    #[must_use]
    pub fn new(name: impl Into<String>, attack: i64, health: i64) -> Self {
        Self {
            name: name.into(),
            base_attack: attack,
            current_attack: attack,
            base_health: health,
            current_health: health,
            missing_health: 0,
        }
    }

    /// Check whether the card is dead (health exhausted).
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current_health == 0
    }

    /// Apply battle damage. Health clamps at zero; a killed card records
    /// its full base health as missing.
    pub fn take_damage(&mut self, damage: i64) {
        self.current_health -= damage;
        if self.current_health <= 0 {
            self.current_health = 0;
            self.missing_health = self.base_health;
        }
    }

    /// Derive the post-battle attack from the remaining health fraction,
    /// never dropping below 1.
    pub fn recompute_attack(&mut self) {
        self.current_attack = (self.base_attack * self.current_health / self.base_health).max(1);
    }

    /// Spend `heal` on a card that stays in the discard pile. The card's
    /// base attack decays to 95% each time it is partially revived.
    pub fn revive_partially(&mut self, heal: i64) {
        self.missing_health -= heal;
        self.base_attack = self.base_attack * 95 / 100;
        self.current_attack = self.base_attack;
    }

    /// Restore the card to full health, ready to fight. Base attack decays
    /// to 90%.
    pub fn revive_fully(&mut self) {
        self.missing_health = 0;
        self.base_attack = self.base_attack * 90 / 100;
        self.current_health = self.base_health;
        self.current_attack = self.base_attack;
    }
}
