//! Heads-up bounty hold'em betting rounds as an immutable state machine.
//!
//! A round starts from [`state::RoundState::start`] and every legal action
//! yields a new [`state::GameState`] linked back to the one it came from.

pub mod actions;
pub mod cards;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod explore;
pub mod hand_evaluator;
pub mod history;
pub mod players;
pub mod state;
