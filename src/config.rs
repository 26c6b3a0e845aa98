//! Table constants shared by every state of a round.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

pub const DEFAULT_STARTING_STACK: u32 = 400;
pub const DEFAULT_SMALL_BLIND: u32 = 1;
pub const DEFAULT_BIG_BLIND: u32 = 2;

/// Chip constants for a round: each player's starting stack and the blinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            starting_stack: DEFAULT_STARTING_STACK,
            small_blind: DEFAULT_SMALL_BLIND,
            big_blind: DEFAULT_BIG_BLIND,
        }
    }
}

impl GameConfig {
    pub fn new(starting_stack: u32, small_blind: u32, big_blind: u32) -> EngineResult<GameConfig> {
        let config = GameConfig {
            starting_stack,
            small_blind,
            big_blind,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> EngineResult<GameConfig> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> EngineResult<GameConfig> {
        let text = fs::read_to_string(path.as_ref())?;
        log::debug!("loaded config from {}", path.as_ref().display());
        Self::from_json(&text)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.big_blind == 0 {
            return Err(EngineError::InvalidConfig("big blind must be positive".to_string()));
        }
        if self.small_blind > self.big_blind {
            return Err(EngineError::InvalidConfig(format!(
                "small blind {} exceeds big blind {}",
                self.small_blind, self.big_blind
            )));
        }
        if self.starting_stack > i32::MAX as u32 {
            return Err(EngineError::InvalidConfig(format!(
                "starting stack {} is above the limit {}",
                self.starting_stack,
                i32::MAX
            )));
        }
        if self.starting_stack < self.big_blind {
            return Err(EngineError::InvalidConfig(format!(
                "starting stack {} cannot cover the big blind {}",
                self.starting_stack, self.big_blind
            )));
        }
        Ok(())
    }
}
