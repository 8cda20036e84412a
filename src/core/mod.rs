//! Core value types: the card and its stat-mutation rules.

pub mod card;

pub use card::Card;
