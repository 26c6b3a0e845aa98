//! Player actions and the compact action codes used in round histories.
//!
//! Codes are `F` (fold), `C` (call), `K` (check) and `R<amount>` (raise to a
//! total pip of `amount`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A move by the active player. `Raise` carries the total pip the player will
/// have put in this street, not the increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Fold,
    Call,
    Check,
    Raise(u32),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Fold => ActionKind::Fold,
            Action::Call => ActionKind::Call,
            Action::Check => ActionKind::Check,
            Action::Raise(_) => ActionKind::Raise,
        }
    }

    pub fn code(&self) -> String {
        match self {
            Action::Raise(amount) => format!("R{}", amount),
            other => other.kind().code().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Action {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Action> {
        let code = s.trim();
        let invalid = || EngineError::InvalidActionCode(code.to_string());
        let mut chars = code.chars();
        let head = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        let rest = chars.as_str();
        match head {
            'F' | 'C' | 'K' if !rest.is_empty() => Err(invalid()),
            'F' => Ok(Action::Fold),
            'C' => Ok(Action::Call),
            'K' => Ok(Action::Check),
            'R' => rest.trim().parse().map(Action::Raise).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

/// Parses a comma- or whitespace-separated action history such as
/// `"C, K, R10, F"`. An empty string is an empty history.
pub fn parse_actions(codes: &str) -> EngineResult<Vec<Action>> {
    codes
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|code| !code.is_empty())
        .map(str::parse)
        .collect()
}

pub fn format_actions(actions: &[Action]) -> String {
    actions.iter().map(Action::code).collect::<Vec<_>>().join(",")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionKind {
    Fold,
    Call,
    Check,
    Raise,
}

pub const ALL_KINDS: [ActionKind; 4] = [
    ActionKind::Fold,
    ActionKind::Call,
    ActionKind::Check,
    ActionKind::Raise,
];

impl ActionKind {
    pub fn code(self) -> char {
        match self {
            ActionKind::Fold => 'F',
            ActionKind::Call => 'C',
            ActionKind::Check => 'K',
            ActionKind::Raise => 'R',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Fold => "Fold",
            ActionKind::Call => "Call",
            ActionKind::Check => "Check",
            ActionKind::Raise => "Raise",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The set of action kinds open to the active player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LegalActions(u8);

impl LegalActions {
    pub fn empty() -> LegalActions {
        LegalActions(0)
    }

    pub fn with(self, kind: ActionKind) -> LegalActions {
        LegalActions(self.0 | kind.bit())
    }

    pub fn contains(&self, kind: ActionKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = ActionKind> + '_ {
        ALL_KINDS.into_iter().filter(|&kind| self.contains(kind))
    }
}

impl FromIterator<ActionKind> for LegalActions {
    fn from_iter<I: IntoIterator<Item = ActionKind>>(iter: I) -> Self {
        iter.into_iter().fold(LegalActions::empty(), LegalActions::with)
    }
}

impl fmt::Display for LegalActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(ActionKind::name).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
