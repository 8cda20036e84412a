//! Line-oriented command parsing and output formatting.
//!
//! One command per line, whitespace-separated fields, blank lines skipped
//! by the caller. Output strings are the game's observable behavior and
//! are kept stable.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::engine::{CardFate, Game};

/// A parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `draw_card <name> <att> <hp>`
    DrawCard {
        name: String,
        attack: i64,
        health: i64,
    },
    /// `battle <att> <hp> <heal>`
    Battle { attack: i64, health: i64, heal: i64 },
    /// `find_winning`
    FindWinning,
    /// `deck_count`
    DeckCount,
    /// `discard_pile_count`
    DiscardPileCount,
    /// `steal_card <att_limit> <hp_limit>`
    StealCard {
        attack_limit: i64,
        health_limit: i64,
    },
}

/// A command line the parser rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid command: {0}")]
    UnknownCommand(String),
    #[error("Missing argument {position} for {command}")]
    MissingArgument {
        command: &'static str,
        position: usize,
    },
    #[error("Invalid number {value:?} for {command}")]
    InvalidNumber {
        command: &'static str,
        value: String,
    },
}

fn arg<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    position: usize,
) -> Result<&'a str, CommandError> {
    fields
        .next()
        .ok_or(CommandError::MissingArgument { command, position })
}

fn int_arg<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    position: usize,
) -> Result<i64, CommandError> {
    let value = arg(fields, command, position)?;
    value.parse().map_err(|_| CommandError::InvalidNumber {
        command,
        value: value.to_string(),
    })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_whitespace();
        let keyword = fields
            .next()
            .ok_or_else(|| CommandError::UnknownCommand(String::new()))?;

        match keyword {
            "draw_card" => Ok(Command::DrawCard {
                name: arg(&mut fields, "draw_card", 1)?.to_string(),
                attack: int_arg(&mut fields, "draw_card", 2)?,
                health: int_arg(&mut fields, "draw_card", 3)?,
            }),
            "battle" => Ok(Command::Battle {
                attack: int_arg(&mut fields, "battle", 1)?,
                health: int_arg(&mut fields, "battle", 2)?,
                heal: int_arg(&mut fields, "battle", 3)?,
            }),
            "find_winning" => Ok(Command::FindWinning),
            "deck_count" => Ok(Command::DeckCount),
            "discard_pile_count" => Ok(Command::DiscardPileCount),
            "steal_card" => Ok(Command::StealCard {
                attack_limit: int_arg(&mut fields, "steal_card", 1)?,
                health_limit: int_arg(&mut fields, "steal_card", 2)?,
            }),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for CardFate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardFate::ReturnedToDeck => write!(f, "returned to deck"),
            CardFate::Discarded => write!(f, "is discarded"),
        }
    }
}

impl Game {
    /// Run one command and produce its output line.
    pub fn execute(&mut self, command: Command) -> String {
        match command {
            Command::DrawCard {
                name,
                attack,
                health,
            } => {
                self.draw_card(name.clone(), attack, health);
                format!("Added {name} to the deck")
            }
            Command::Battle {
                attack,
                health,
                heal,
            } => {
                let outcome = self.battle(attack, health, heal);
                match outcome.played {
                    Some((name, fate)) => format!(
                        "Found with priority {}, Survivor plays {}, the played card {}, {} cards revived",
                        outcome.priority, name, fate, outcome.revived
                    ),
                    None => format!("No card to play, {} cards revived", outcome.revived),
                }
            }
            Command::FindWinning => {
                let (winner, score) = self.find_winning();
                format!("The {}, Score: {}", winner.name(), score)
            }
            Command::DeckCount => {
                format!("Number of cards in the deck: {}", self.deck_count())
            }
            Command::DiscardPileCount => {
                format!(
                    "Number of cards in the discard pile: {}",
                    self.discard_pile_count()
                )
            }
            Command::StealCard {
                attack_limit,
                health_limit,
            } => match self.steal_card(attack_limit, health_limit) {
                Some(card) => format!("The Stranger stole the card: {}", card.name),
                None => "No card to steal".to_string(),
            },
        }
    }
}
