//! Game tree for one heads-up bounty round.
//!
//! A round is a chain of immutable states. [`RoundState`] is a decision point
//! for the active player and [`TerminalState`] is the settled leaf. Every
//! transition builds a fresh state whose `previous` link points back at the
//! state it came from. The cards and chip constants of the round live in one
//! shared [`Deal`].

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::actions::{Action, ActionKind, LegalActions};
use crate::cards::{format_cards, Card, Rank};
use crate::config::GameConfig;
use crate::error::{EngineError, EngineResult};
use crate::hand_evaluator::{BestFiveEvaluator, HandEvaluator};

pub const NUM_PLAYERS: usize = 2;
pub const BOARD_SIZE: usize = 5;

/// Betting round. The discriminant is the number of board cards revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Street {
    Preflop = 0,
    Flop = 3,
    Turn = 4,
    River = 5,
}

impl Street {
    pub fn revealed(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    pub fn from_revealed(cards: usize) -> Option<Street> {
        match cards {
            0 => Some(Street::Preflop),
            3 => Some(Street::Flop),
            4 => Some(Street::Turn),
            5 => Some(Street::River),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Street::Preflop => "Preflop",
            Street::Flop => "Flop",
            Street::Turn => "Turn",
            Street::River => "River",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// Deal
// ---------------------------------------------------------------------------

/// Cards and bounties as they appear in a deal file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    pub hands: [[Card; 2]; NUM_PLAYERS],
    pub bounties: [Rank; NUM_PLAYERS],
    pub board: Vec<Card>,
}

/// Everything about a round that never changes once it starts: the table
/// constants, both hands, both bounties and the full board run-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    config: GameConfig,
    hands: [[Card; 2]; NUM_PLAYERS],
    bounties: [Rank; NUM_PLAYERS],
    board: [Card; BOARD_SIZE],
}

impl Deal {
    /// Rejects an invalid config or any card dealt twice.
    pub fn new(
        config: GameConfig,
        hands: [[Card; 2]; NUM_PLAYERS],
        bounties: [Rank; NUM_PLAYERS],
        board: [Card; BOARD_SIZE],
    ) -> EngineResult<Deal> {
        config.validate()?;
        let mut seen: Vec<Card> = Vec::with_capacity(2 * NUM_PLAYERS + BOARD_SIZE);
        for &card in hands.iter().flatten().chain(board.iter()) {
            if seen.contains(&card) {
                return Err(EngineError::DuplicateCard(card));
            }
            seen.push(card);
        }
        Ok(Deal {
            config,
            hands,
            bounties,
            board,
        })
    }

    pub fn from_record(config: GameConfig, record: DealRecord) -> EngineResult<Deal> {
        let got = record.board.len();
        let board: [Card; BOARD_SIZE] = record
            .board
            .try_into()
            .map_err(|_| EngineError::NotEnoughCards {
                need: BOARD_SIZE,
                got,
            })?;
        Deal::new(config, record.hands, record.bounties, board)
    }

    pub fn from_json(config: GameConfig, json: &str) -> EngineResult<Deal> {
        let record: DealRecord = serde_json::from_str(json)?;
        Deal::from_record(config, record)
    }

    pub fn from_path(config: GameConfig, path: impl AsRef<Path>) -> EngineResult<Deal> {
        let text = fs::read_to_string(path.as_ref())?;
        Deal::from_json(config, &text)
    }

    pub fn to_record(&self) -> DealRecord {
        DealRecord {
            hands: self.hands,
            bounties: self.bounties,
            board: self.board.to_vec(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn hands(&self) -> &[[Card; 2]; NUM_PLAYERS] {
        &self.hands
    }

    pub fn bounties(&self) -> &[Rank; NUM_PLAYERS] {
        &self.bounties
    }

    /// The full five-card run-out, revealed or not.
    pub fn board(&self) -> &[Card; BOARD_SIZE] {
        &self.board
    }
}

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum GameState {
    Round(RoundState),
    Terminal(TerminalState),
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::Terminal(_))
    }

    pub fn as_round(&self) -> Option<&RoundState> {
        match self {
            GameState::Round(round) => Some(round),
            GameState::Terminal(_) => None,
        }
    }

    pub fn as_terminal(&self) -> Option<&TerminalState> {
        match self {
            GameState::Round(_) => None,
            GameState::Terminal(terminal) => Some(terminal),
        }
    }

    pub fn previous(&self) -> Option<&GameState> {
        match self {
            GameState::Round(round) => round.previous(),
            GameState::Terminal(terminal) => Some(terminal.previous()),
        }
    }

    pub fn deal(&self) -> &Arc<Deal> {
        match self {
            GameState::Round(round) => round.deal(),
            GameState::Terminal(terminal) => terminal.deal(),
        }
    }

    /// Applies `action` with the default evaluator. Fails with `RoundOver`
    /// on a terminal state.
    pub fn proceed(&self, action: Action) -> EngineResult<GameState> {
        match self {
            GameState::Round(round) => round.proceed(action),
            GameState::Terminal(_) => Err(EngineError::RoundOver),
        }
    }
}

impl From<RoundState> for GameState {
    fn from(round: RoundState) -> Self {
        GameState::Round(round)
    }
}

impl From<TerminalState> for GameState {
    fn from(terminal: TerminalState) -> Self {
        GameState::Terminal(terminal)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::Round(round) => fmt::Display::fmt(round, f),
            GameState::Terminal(terminal) => fmt::Display::fmt(terminal, f),
        }
    }
}

/// A decision point: the active player is `button % 2`.
#[derive(Debug, Clone)]
pub struct RoundState {
    button: u32,
    street: Street,
    pips: [u32; NUM_PLAYERS],
    stacks: [u32; NUM_PLAYERS],
    deal: Arc<Deal>,
    previous: Option<Arc<GameState>>,
}

/// A settled round. `deltas` always sum to zero.
#[derive(Debug, Clone)]
pub struct TerminalState {
    deltas: [i32; NUM_PLAYERS],
    bounty_hits: [bool; NUM_PLAYERS],
    previous: Arc<GameState>,
}

impl RoundState {
    /// Opening state of a round: blinds posted, small blind (player 0) to act.
    pub fn start(deal: impl Into<Arc<Deal>>) -> RoundState {
        let deal = deal.into();
        let config = *deal.config();
        RoundState {
            button: 0,
            street: Street::Preflop,
            pips: [config.small_blind, config.big_blind],
            stacks: [
                config.starting_stack - config.small_blind,
                config.starting_stack - config.big_blind,
            ],
            deal,
            previous: None,
        }
    }

    /// Builds a state from raw parts, e.g. to resume from a recorded position.
    /// The state has no history.
    pub fn new(
        button: u32,
        street: Street,
        pips: [u32; NUM_PLAYERS],
        stacks: [u32; NUM_PLAYERS],
        deal: impl Into<Arc<Deal>>,
    ) -> EngineResult<RoundState> {
        let state = RoundState {
            button,
            street,
            pips,
            stacks,
            deal: deal.into(),
            previous: None,
        };
        state.check_invariants()?;
        Ok(state)
    }

    fn check_invariants(&self) -> EngineResult<()> {
        let starting_stack = self.config().starting_stack;
        for player in 0..NUM_PLAYERS {
            if self.pips[player] > starting_stack {
                return Err(EngineError::MalformedState(format!(
                    "player {} has {} in this street, more than the starting stack {}",
                    player, self.pips[player], starting_stack
                )));
            }
        }
        let limit = 2 * u64::from(starting_stack);
        if let Some(player) = (0..NUM_PLAYERS).find(|&p| u64::from(self.stacks[p]) > limit) {
            return Err(EngineError::MalformedState(format!(
                "player {} has {} behind, more than twice the starting stack {}",
                player, self.stacks[player], starting_stack
            )));
        }
        // the shorter total caps every pip either player can reach
        let totals = [0, 1].map(|p| u64::from(self.pips[p]) + u64::from(self.stacks[p]));
        if totals[0].min(totals[1]) > u64::from(starting_stack) {
            return Err(EngineError::MalformedState(format!(
                "both players hold more than the starting stack {} ({} and {})",
                starting_stack, totals[0], totals[1]
            )));
        }
        let active = self.active();
        if self.pips[active] > self.pips[1 - active] {
            return Err(EngineError::MalformedState(format!(
                "active player {} is ahead of the bet ({} > {})",
                active,
                self.pips[active],
                self.pips[1 - active]
            )));
        }
        if self.continue_cost() > self.stacks[active] {
            return Err(EngineError::MalformedState(format!(
                "active player {} cannot cover a call of {}",
                active,
                self.continue_cost()
            )));
        }
        Ok(())
    }

    pub fn button(&self) -> u32 {
        self.button
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn pips(&self) -> [u32; NUM_PLAYERS] {
        self.pips
    }

    pub fn stacks(&self) -> [u32; NUM_PLAYERS] {
        self.stacks
    }

    pub fn deal(&self) -> &Arc<Deal> {
        &self.deal
    }

    pub fn config(&self) -> &GameConfig {
        self.deal.config()
    }

    pub fn hands(&self) -> &[[Card; 2]; NUM_PLAYERS] {
        self.deal.hands()
    }

    pub fn bounties(&self) -> &[Rank; NUM_PLAYERS] {
        self.deal.bounties()
    }

    /// Community cards revealed so far.
    pub fn board(&self) -> &[Card] {
        &self.deal.board()[..self.street.revealed()]
    }

    pub fn previous(&self) -> Option<&GameState> {
        self.previous.as_deref()
    }

    pub fn active(&self) -> usize {
        (self.button % 2) as usize
    }

    /// Chips the active player must add to match the opponent.
    pub fn continue_cost(&self) -> u32 {
        let active = self.active();
        self.pips[1 - active].saturating_sub(self.pips[active])
    }

    /// Chips each player has put in over the whole round.
    pub fn contributions(&self) -> [u32; NUM_PLAYERS] {
        let starting_stack = self.config().starting_stack;
        self.stacks.map(|stack| starting_stack.saturating_sub(stack))
    }

    pub fn pot(&self) -> u32 {
        self.contributions().iter().sum()
    }

    // -----------------------------------------------------------------------
    // Legality and bounds
    // -----------------------------------------------------------------------

    pub fn legal_actions(&self) -> LegalActions {
        let active = self.active();
        let continue_cost = self.continue_cost();
        if continue_cost == 0 {
            // betting needs chips behind on both sides
            let bets_forbidden = self.stacks[0] == 0 || self.stacks[1] == 0;
            let legal = LegalActions::empty().with(ActionKind::Check);
            return if bets_forbidden {
                legal
            } else {
                legal.with(ActionKind::Raise)
            };
        }
        let raises_forbidden =
            continue_cost == self.stacks[active] || self.stacks[1 - active] == 0;
        let legal = LegalActions::empty()
            .with(ActionKind::Fold)
            .with(ActionKind::Call);
        if raises_forbidden {
            legal
        } else {
            legal.with(ActionKind::Raise)
        }
    }

    /// Smallest and largest legal raise, as total pips for the active player.
    pub fn raise_bounds(&self) -> (u32, u32) {
        let active = self.active();
        let continue_cost = self.continue_cost();
        let max_contribution = self.stacks[active]
            .min(self.stacks[1 - active].saturating_add(continue_cost));
        let min_contribution = max_contribution
            .min(continue_cost + continue_cost.max(self.config().big_blind));
        (
            self.pips[active] + min_contribution,
            self.pips[active] + max_contribution,
        )
    }

    /// Whether each player's bounty rank shows among their hole cards or the
    /// revealed board.
    pub fn bounty_hits(&self) -> [bool; NUM_PLAYERS] {
        let board = self.board();
        let hands = self.hands();
        let bounties = self.bounties();
        [0, 1].map(|player| {
            hands[player]
                .iter()
                .chain(board.iter())
                .any(|card| card.rank == bounties[player])
        })
    }

    /// Checks `action` against the legal set and the raise bounds.
    pub fn validate(&self, action: Action) -> EngineResult<()> {
        let legal = self.legal_actions();
        if !legal.contains(action.kind()) {
            return Err(EngineError::IllegalAction { action, legal });
        }
        if let Action::Raise(amount) = action {
            let (min, max) = self.raise_bounds();
            if amount < min || amount > max {
                return Err(EngineError::RaiseOutOfBounds { amount, min, max });
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Applies a legal action, settling any showdown with [`BestFiveEvaluator`].
    pub fn proceed(&self, action: Action) -> EngineResult<GameState> {
        self.proceed_with(action, &BestFiveEvaluator)
    }

    pub fn proceed_with<E: HandEvaluator + ?Sized>(
        &self,
        action: Action,
        evaluator: &E,
    ) -> EngineResult<GameState> {
        self.validate(action)?;
        log::trace!("player {} {} at {}", self.active(), action, self);

        let active = self.active();
        let next = match action {
            Action::Fold => {
                let starting_stack = self.config().starting_stack;
                let delta = if active == 0 {
                    chip_delta(self.stacks[0], starting_stack)
                } else {
                    chip_delta(starting_stack, self.stacks[1])
                };
                self.settle(delta).into()
            }
            Action::Call if self.button == 0 => {
                // small blind completes: both players are in for one big blind
                let config = *self.config();
                self.successor(
                    1,
                    self.street,
                    [config.big_blind; NUM_PLAYERS],
                    [config.starting_stack - config.big_blind; NUM_PLAYERS],
                )
                .into()
            }
            Action::Call => {
                let contribution = self.continue_cost();
                let mut pips = self.pips;
                let mut stacks = self.stacks;
                pips[active] += contribution;
                stacks[active] -= contribution;
                self.successor(self.button + 1, self.street, pips, stacks)
                    .proceed_street(evaluator)
            }
            Action::Check => {
                if (self.street == Street::Preflop && self.button > 0) || self.button > 1 {
                    self.proceed_street(evaluator)
                } else {
                    self.successor(self.button + 1, self.street, self.pips, self.stacks)
                        .into()
                }
            }
            Action::Raise(amount) => {
                let contribution = amount - self.pips[active];
                let mut pips = self.pips;
                let mut stacks = self.stacks;
                pips[active] = amount;
                stacks[active] -= contribution;
                self.successor(self.button + 1, self.street, pips, stacks)
                    .into()
            }
        };
        Ok(next)
    }

    /// Closes the current street: deals the next one, or goes to showdown
    /// after the river.
    pub fn proceed_street<E: HandEvaluator + ?Sized>(&self, evaluator: &E) -> GameState {
        match self.street.next() {
            None => self.showdown(evaluator).into(),
            Some(street) => {
                log::debug!("{} dealt, stacks {:?}", street, self.stacks);
                self.successor(1, street, [0, 0], self.stacks).into()
            }
        }
    }

    /// Settles the pot on the full board. Both players have put in the same
    /// amount by now, so a split pot moves no chips.
    pub fn showdown<E: HandEvaluator + ?Sized>(&self, evaluator: &E) -> TerminalState {
        let starting_stack = self.config().starting_stack;
        let delta = match evaluator.compare(self.hands(), self.deal.board()) {
            Ordering::Greater => chip_delta(starting_stack, self.stacks[1]),
            Ordering::Less => chip_delta(self.stacks[0], starting_stack),
            Ordering::Equal => 0,
        };
        self.settle(delta)
    }

    fn settle(&self, delta: i32) -> TerminalState {
        let terminal = TerminalState {
            deltas: [delta, -delta],
            bounty_hits: self.bounty_hits(),
            previous: Arc::new(self.clone().into()),
        };
        log::debug!("round over: {}", terminal);
        terminal
    }

    fn successor(
        &self,
        button: u32,
        street: Street,
        pips: [u32; NUM_PLAYERS],
        stacks: [u32; NUM_PLAYERS],
    ) -> RoundState {
        let starting_stack = self.config().starting_stack;
        debug_assert!(
            pips.iter().all(|&pip| pip <= starting_stack),
            "pip above the starting stack {}: {:?}",
            starting_stack,
            pips
        );
        RoundState {
            button,
            street,
            pips,
            stacks,
            deal: Arc::clone(&self.deal),
            previous: Some(Arc::new(self.clone().into())),
        }
    }
}

/// `a - b` in chips. Validated states keep every stack within twice a
/// starting stack of at most `i32::MAX`, so the difference fits.
fn chip_delta(a: u32, b: u32) -> i32 {
    let delta = i64::from(a) - i64::from(b);
    delta.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hands = self.hands();
        write!(
            f,
            "round(button={}, street={}, pips=[{}, {}], stacks=[{}, {}], hands=[{},{}], bounties=[{},{}], board=[{}])",
            self.button,
            self.street.revealed(),
            self.pips[0],
            self.pips[1],
            self.stacks[0],
            self.stacks[1],
            format_cards(&hands[0]).replace(' ', ""),
            format_cards(&hands[1]).replace(' ', ""),
            self.bounties()[0],
            self.bounties()[1],
            format_cards(self.board()),
        )
    }
}

impl TerminalState {
    pub fn deltas(&self) -> [i32; NUM_PLAYERS] {
        self.deltas
    }

    pub fn bounty_hits(&self) -> [bool; NUM_PLAYERS] {
        self.bounty_hits
    }

    pub fn previous(&self) -> &GameState {
        &self.previous
    }

    pub fn deal(&self) -> &Arc<Deal> {
        self.previous.deal()
    }

    /// The last decision point of the round.
    pub fn last_round(&self) -> Option<&RoundState> {
        self.previous.as_round()
    }

    /// True when the round ended by comparing hands rather than by a fold.
    /// A fold is only possible facing a bet.
    pub fn went_to_showdown(&self) -> bool {
        self.last_round()
            .is_some_and(|round| !round.legal_actions().contains(ActionKind::Fold))
    }

    /// Index of the player who won chips, or `None` for a split pot.
    pub fn winner(&self) -> Option<usize> {
        match self.deltas[0].cmp(&0) {
            Ordering::Greater => Some(0),
            Ordering::Less => Some(1),
            Ordering::Equal => None,
        }
    }
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "terminal(deltas=[{}, {}], bounty_hits=[{}, {}])",
            self.deltas[0], self.deltas[1], self.bounty_hits[0], self.bounty_hits[1]
        )
    }
}
