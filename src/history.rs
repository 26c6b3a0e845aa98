//! Reading a round back out of its history chain.
//!
//! States only link backwards and carry no record of the action that
//! produced them, so actions are recovered by comparing neighbouring states.
//! A non-opening call produces two links: the state where the call has been
//! paid, then the next street (or the showdown) built from it.

use std::iter;

use crate::actions::Action;
use crate::cards::{format_cards, Card};
use crate::state::{GameState, Street, NUM_PLAYERS};

/// Newest-first walk from `state` back to the start of the round.
pub fn states(state: &GameState) -> impl Iterator<Item = &GameState> {
    iter::successors(Some(state), |s| s.previous())
}

/// The whole chain, oldest first.
pub fn chain(state: &GameState) -> Vec<&GameState> {
    let mut chain: Vec<&GameState> = states(state).collect();
    chain.reverse();
    chain
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `opens_betting` is set when nobody had put chips in on this street yet.
    Action {
        player: usize,
        action: Action,
        opens_betting: bool,
    },
    Street {
        street: Street,
        board: Vec<Card>,
        contributions: [u32; NUM_PLAYERS],
    },
}

pub fn events(state: &GameState) -> Vec<Event> {
    let chain = chain(state);
    let mut events = Vec::new();
    let mut street = Street::Preflop;
    let mut i = 0;

    while let Some(GameState::Round(current)) = chain.get(i) {
        if current.street() != street {
            street = current.street();
            events.push(Event::Street {
                street,
                board: current.board().to_vec(),
                contributions: current.contributions(),
            });
        }
        let Some(next) = chain.get(i + 1) else {
            break;
        };

        let player = current.active();
        let (action, step) = match next {
            GameState::Terminal(_) if current.continue_cost() > 0 => (Action::Fold, 1),
            GameState::Terminal(_) => (Action::Check, 1),
            GameState::Round(n) if n.street() != current.street() => (Action::Check, 1),
            GameState::Round(n) if n.pips() == current.pips() => (Action::Check, 1),
            GameState::Round(n) if n.pips()[0] == n.pips()[1] => {
                // only the blind completion stays on the same street
                let step = if current.button() == 0 { 1 } else { 2 };
                (Action::Call, step)
            }
            GameState::Round(n) => (Action::Raise(n.pips()[player]), 1),
        };
        events.push(Event::Action {
            player,
            action,
            opens_betting: current.pips() == [0, 0],
        });
        i += step;
    }

    events
}

/// Every action of the round in order, with the player who took it.
pub fn actions(state: &GameState) -> Vec<(usize, Action)> {
    events(state)
        .into_iter()
        .filter_map(|event| match event {
            Event::Action { player, action, .. } => Some((player, action)),
            Event::Street { .. } => None,
        })
        .collect()
}

/// Human-readable hand history in the style of a dealer's game log.
pub fn transcript(state: &GameState, names: [&str; NUM_PLAYERS]) -> Vec<String> {
    let mut lines = Vec::new();
    let deal = state.deal();
    let hands = deal.hands();

    let opening = states(state).last().and_then(GameState::as_round);
    if let Some(first) = opening.filter(|s| s.button() == 0 && s.street() == Street::Preflop) {
        let pips = first.pips();
        lines.push(format!("{} posts the blind of {}", names[0], pips[0]));
        lines.push(format!("{} posts the blind of {}", names[1], pips[1]));
        for player in 0..NUM_PLAYERS {
            lines.push(format!("{} dealt [{}]", names[player], format_cards(&hands[player])));
        }
    }

    for event in events(state) {
        match event {
            Event::Action {
                player,
                action,
                opens_betting,
            } => {
                let phrasing = match action {
                    Action::Fold => "folds".to_string(),
                    Action::Call => "calls".to_string(),
                    Action::Check => "checks".to_string(),
                    Action::Raise(amount) if opens_betting => format!("bets {}", amount),
                    Action::Raise(amount) => format!("raises to {}", amount),
                };
                lines.push(format!("{} {}", names[player], phrasing));
            }
            Event::Street {
                street,
                board,
                contributions,
            } => {
                lines.push(format!(
                    "{} [{}], {} ({}), {} ({})",
                    street,
                    format_cards(&board),
                    names[0],
                    contributions[0],
                    names[1],
                    contributions[1]
                ));
            }
        }
    }

    if let GameState::Terminal(terminal) = state {
        if terminal.went_to_showdown() {
            for player in 0..NUM_PLAYERS {
                lines.push(format!("{} shows [{}]", names[player], format_cards(&hands[player])));
            }
        }
        let bounty_hits = terminal.bounty_hits();
        for player in 0..NUM_PLAYERS {
            if bounty_hits[player] {
                lines.push(format!(
                    "{} hits their bounty {}",
                    names[player],
                    deal.bounties()[player]
                ));
            }
        }
        let deltas = terminal.deltas();
        for player in 0..NUM_PLAYERS {
            lines.push(format!("{} awarded {}", names[player], deltas[player]));
        }
    }

    lines
}
