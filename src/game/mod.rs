//! The simulation around the indices: game state, battle and heal phases,
//! and the line-oriented command layer.

pub mod command;
pub mod engine;

pub use command::{Command, CommandError};
pub use engine::{BattleOutcome, CardFate, Game, Winner};
