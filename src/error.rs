use thiserror::Error;

use crate::actions::{Action, LegalActions};
use crate::cards::Card;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid board notation: {0}")]
    InvalidBoardNotation(String),

    #[error("Need {need} cards, got {got}")]
    NotEnoughCards { need: usize, got: usize },

    #[error("Card {0} appears more than once in the deal")]
    DuplicateCard(Card),

    #[error("Invalid action code: {0}")]
    InvalidActionCode(String),

    #[error("Illegal action {action}, legal actions are {legal}")]
    IllegalAction { action: Action, legal: LegalActions },

    #[error("Raise to {amount} is outside the legal range [{min}, {max}]")]
    RaiseOutOfBounds { amount: u32, min: u32, max: u32 },

    #[error("The round is already over")]
    RoundOver,

    #[error("Malformed state: {0}")]
    MalformedState(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Scripted actions ran out before the round ended")]
    ScriptExhausted,

    #[error("Input closed before the round ended")]
    InputClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
