//! Monte Carlo exploration of the game tree below a state.
//!
//! Each playout drives its own copy of the starting state to a terminal with
//! [`RandomSource`] on both seats. States are immutable and share their deal
//! through `Arc`, so playouts run on the rayon pool with no coordination.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::EngineResult;
use crate::players::{ActionSource, RandomSource};
use crate::state::{GameState, RoundState, TerminalState, NUM_PLAYERS};

/// Result of a single random playout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playout {
    pub deltas: [i32; NUM_PLAYERS],
    pub bounty_hits: [bool; NUM_PLAYERS],
    pub showdown: bool,
    pub actions: usize,
}

impl Playout {
    fn from_terminal(terminal: &TerminalState, actions: usize) -> Self {
        Playout {
            deltas: terminal.deltas(),
            bounty_hits: terminal.bounty_hits(),
            showdown: terminal.went_to_showdown(),
            actions,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExploreSummary {
    pub playouts: usize,
    pub folds: usize,
    pub showdowns: usize,
    pub splits: usize,
    pub wins: [usize; NUM_PLAYERS],
    pub max_abs_delta: u32,
    pub mean_abs_delta: f64,
    pub mean_actions: f64,
    pub bounty_hit_rate: [f64; NUM_PLAYERS],
    /// Total chips won by player 0 over all playouts.
    pub net: i64,
}

impl ExploreSummary {
    pub fn from_playouts(playouts: &[Playout]) -> Self {
        let mut summary = ExploreSummary {
            playouts: playouts.len(),
            ..Default::default()
        };
        if playouts.is_empty() {
            return summary;
        }

        let mut abs_total: u64 = 0;
        let mut action_total: usize = 0;
        let mut hits = [0usize; NUM_PLAYERS];
        for playout in playouts {
            if playout.showdown {
                summary.showdowns += 1;
            } else {
                summary.folds += 1;
            }
            match playout.deltas[0] {
                d if d > 0 => summary.wins[0] += 1,
                d if d < 0 => summary.wins[1] += 1,
                _ => summary.splits += 1,
            }
            let abs = playout.deltas[0].unsigned_abs();
            summary.max_abs_delta = summary.max_abs_delta.max(abs);
            abs_total += abs as u64;
            action_total += playout.actions;
            summary.net += playout.deltas[0] as i64;
            for (player, hit) in playout.bounty_hits.iter().enumerate() {
                if *hit {
                    hits[player] += 1;
                }
            }
        }

        let n = playouts.len() as f64;
        summary.mean_abs_delta = abs_total as f64 / n;
        summary.mean_actions = action_total as f64 / n;
        summary.bounty_hit_rate = hits.map(|h| h as f64 / n);
        summary
    }
}

/// Plays `state` out to the end with `source` choosing for both seats.
pub fn playout(state: &RoundState, source: &mut dyn ActionSource) -> EngineResult<Playout> {
    let mut current = GameState::Round(state.clone());
    let mut actions = 0;
    loop {
        match current {
            GameState::Terminal(terminal) => return Ok(Playout::from_terminal(&terminal, actions)),
            GameState::Round(round) => {
                let action = source.act(&round)?;
                current = round.proceed(action)?;
                actions += 1;
            }
        }
    }
}

/// Runs `samples` random playouts from `state` in parallel. Playout `i` is
/// seeded with `seed + i`, so the summary is reproducible.
pub fn explore(state: &RoundState, samples: usize, seed: u64) -> EngineResult<ExploreSummary> {
    log::info!("exploring {} playouts from {}", samples, state);
    let playouts: Vec<Playout> = (0..samples)
        .into_par_iter()
        .map(|i| {
            let mut source = RandomSource::new(seed.wrapping_add(i as u64));
            playout(state, &mut source)
        })
        .collect::<EngineResult<Vec<Playout>>>()?;
    let summary = ExploreSummary::from_playouts(&playouts);
    log::debug!(
        "explored {} playouts: {} folds, {} showdowns",
        summary.playouts,
        summary.folds,
        summary.showdowns
    );
    Ok(summary)
}
