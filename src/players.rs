//! Where actions come from, and a driver that plays one round with them.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

use crate::actions::{Action, ActionKind};
use crate::error::{EngineError, EngineResult};
use crate::state::{GameState, RoundState, TerminalState, NUM_PLAYERS};

/// Supplies the active player's action for a decision point.
pub trait ActionSource {
    fn act(&mut self, state: &RoundState) -> EngineResult<Action>;
}

/// Replays a fixed list of actions in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    actions: VecDeque<Action>,
}

impl ScriptedSource {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        ScriptedSource {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl ActionSource for ScriptedSource {
    fn act(&mut self, _state: &RoundState) -> EngineResult<Action> {
        self.actions.pop_front().ok_or(EngineError::ScriptExhausted)
    }
}

/// Picks a legal action kind uniformly, then a raise size uniformly within
/// the bounds. Seeded, so a playout can be reproduced.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        RandomSource {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ActionSource for RandomSource {
    fn act(&mut self, state: &RoundState) -> EngineResult<Action> {
        let legal = state.legal_actions();
        let kind = legal.iter().choose(&mut self.rng).ok_or_else(|| {
            EngineError::MalformedState(format!("no legal actions at {}", state))
        })?;
        Ok(match kind {
            ActionKind::Fold => Action::Fold,
            ActionKind::Call => Action::Call,
            ActionKind::Check => Action::Check,
            ActionKind::Raise => {
                let (min, max) = state.raise_bounds();
                Action::Raise(self.rng.gen_range(min..=max))
            }
        })
    }
}

/// Reads action codes from a reader, prompting on a writer. Bad codes and
/// illegal actions are reported and asked for again. `q` gives up the round.
pub struct PromptSource<R, W> {
    reader: R,
    writer: W,
    names: [String; NUM_PLAYERS],
}

impl<R: BufRead, W: Write> PromptSource<R, W> {
    pub fn new(reader: R, writer: W, names: [String; NUM_PLAYERS]) -> Self {
        PromptSource {
            reader,
            writer,
            names,
        }
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn prompt(&mut self, state: &RoundState) -> EngineResult<Option<String>> {
        let legal = state.legal_actions();
        let raise = if legal.contains(ActionKind::Raise) {
            let (min, max) = state.raise_bounds();
            format!(" raise {}-{}", min, max)
        } else {
            String::new()
        };
        write!(
            self.writer,
            "{} to act {}{} (to call {}): ",
            self.names[state.active()],
            legal,
            raise,
            state.continue_cost()
        )?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> ActionSource for PromptSource<R, W> {
    fn act(&mut self, state: &RoundState) -> EngineResult<Action> {
        loop {
            let line = self.prompt(state)?.ok_or(EngineError::InputClosed)?;
            if line.eq_ignore_ascii_case("q") {
                return Err(EngineError::InputClosed);
            }
            match line.parse::<Action>().and_then(|action| {
                state.validate(action)?;
                Ok(action)
            }) {
                Ok(action) => return Ok(action),
                Err(e) => {
                    log::warn!("rejected input {:?}: {}", line, e);
                    writeln!(self.writer, "  {}", e)?;
                }
            }
        }
    }
}

/// Drives a round to its end, asking `sources[active]` for every decision.
pub fn run_round(
    start: RoundState,
    mut sources: [&mut dyn ActionSource; NUM_PLAYERS],
) -> EngineResult<TerminalState> {
    let mut state = GameState::Round(start);
    loop {
        match state {
            GameState::Terminal(terminal) => return Ok(terminal),
            GameState::Round(round) => {
                let action = sources[round.active()].act(&round)?;
                state = round.proceed(action)?;
            }
        }
    }
}
