use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::actions::{format_actions, parse_actions, Action};
use crate::cards::{parse_cards, Card, Rank};
use crate::config::GameConfig;
use crate::display::{legal_line, print_error, round_table, summary_table, terminal_table};
use crate::error::{EngineError, EngineResult};
use crate::explore::explore;
use crate::history::transcript;
use crate::players::{ActionSource, PromptSource, RandomSource};
use crate::state::{Deal, GameState, RoundState, BOARD_SIZE, NUM_PLAYERS};

const PLAYER_NAMES: [&str; NUM_PLAYERS] = ["P0", "P1"];

#[derive(Parser)]
#[command(
    name = "bounty",
    version,
    about = "Heads-up bounty hold'em: replay, inspect and explore betting rounds."
)]
struct Cli {
    #[command(flatten)]
    table: TableArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct TableArgs {
    /// JSON file with starting_stack, small_blind and big_blind
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Starting stack for each player (overrides the config file)
    #[arg(long, global = true)]
    stack: Option<u32>,

    #[arg(long, global = true)]
    small_blind: Option<u32>,

    #[arg(long, global = true)]
    big_blind: Option<u32>,
}

impl TableArgs {
    fn resolve(&self) -> EngineResult<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_path(path)?,
            None => GameConfig::default(),
        };
        if let Some(stack) = self.stack {
            config.starting_stack = stack;
        }
        if let Some(small_blind) = self.small_blind {
            config.small_blind = small_blind;
        }
        if let Some(big_blind) = self.big_blind {
            config.big_blind = big_blind;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Clone)]
struct RoundArgs {
    /// JSON deal file with hands, bounties and board
    #[arg(long, conflicts_with_all = ["hands", "bounties", "board"])]
    deal: Option<PathBuf>,

    /// Hole cards for both players (e.g., "AsKd,7c2h")
    #[arg(long, required_unless_present = "deal")]
    hands: Option<String>,

    /// Bounty ranks for both players (e.g., "A,7")
    #[arg(long, required_unless_present = "deal")]
    bounties: Option<String>,

    /// Full five-card board run-out (e.g., "2c3d4h5s6c")
    #[arg(long, required_unless_present = "deal")]
    board: Option<String>,

    /// Action codes applied from the start of the round (e.g., "C,K,R10,F")
    #[arg(short, long, default_value = "")]
    actions: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply an action history and show every state, then the hand history
    Replay(RoundArgs),

    /// Show the legal actions and raise bounds after an action history
    Legal(RoundArgs),

    /// Run random playouts in parallel from the state after an action history
    Explore {
        #[command(flatten)]
        round: RoundArgs,

        /// Number of playouts
        #[arg(short = 'n', long, default_value = "10000")]
        samples: usize,

        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Play the rest of a round at the terminal, typing action codes
    Play {
        #[command(flatten)]
        round: RoundArgs,

        /// Let a random player take this seat
        #[arg(long)]
        random_seat: Option<usize>,

        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

pub fn run() {
    let cli = Cli::parse();
    exit_on_error(dispatch(cli));
}

pub fn run_with_args(args: Vec<String>) {
    let cli = Cli::parse_from(args);
    exit_on_error(dispatch(cli));
}

fn exit_on_error(result: EngineResult<()>) {
    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e.to_string());
        process::exit(1);
    }
}

fn dispatch(cli: Cli) -> EngineResult<()> {
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    match cli.command {
        Commands::Replay(round) => cmd_replay(&cli.table, &round, &mut writer),
        Commands::Legal(round) => cmd_legal(&cli.table, &round, &mut writer),
        Commands::Explore {
            round,
            samples,
            seed,
        } => cmd_explore(&cli.table, &round, samples, seed, &mut writer),
        Commands::Play {
            round,
            random_seat,
            seed,
        } => {
            let stdin = io::stdin();
            cmd_play(&cli.table, &round, random_seat, seed, stdin.lock(), &mut writer)
        }
    }
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

fn parse_hands(text: &str) -> EngineResult<[[Card; 2]; NUM_PLAYERS]> {
    match parse_cards(text)?.as_slice() {
        &[a, b, c, d] => Ok([[a, b], [c, d]]),
        other => Err(EngineError::NotEnoughCards {
            need: 2 * NUM_PLAYERS,
            got: other.len(),
        }),
    }
}

fn parse_bounties(text: &str) -> EngineResult<[Rank; NUM_PLAYERS]> {
    let ranks: Vec<Rank> = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(Rank::from_char)
        .collect::<EngineResult<_>>()?;
    match ranks.as_slice() {
        &[a, b] => Ok([a, b]),
        _ => Err(EngineError::InvalidCardNotation(text.to_string())),
    }
}

fn parse_board_runout(text: &str) -> EngineResult<[Card; BOARD_SIZE]> {
    let cards = parse_cards(text)?;
    let got = cards.len();
    cards
        .try_into()
        .map_err(|_| EngineError::NotEnoughCards {
            need: BOARD_SIZE,
            got,
        })
}

fn build_deal(table: &TableArgs, round: &RoundArgs) -> EngineResult<Deal> {
    let config = table.resolve()?;
    if let Some(path) = &round.deal {
        return Deal::from_path(config, path);
    }
    let missing = |name: &str| EngineError::InvalidConfig(format!("--{} is required without --deal", name));
    let hands = parse_hands(round.hands.as_deref().ok_or_else(|| missing("hands"))?)?;
    let bounties = parse_bounties(round.bounties.as_deref().ok_or_else(|| missing("bounties"))?)?;
    let board = parse_board_runout(round.board.as_deref().ok_or_else(|| missing("board"))?)?;
    Deal::new(config, hands, bounties, board)
}

/// Starts a round from the arguments and applies the action history.
fn build_state(table: &TableArgs, round: &RoundArgs) -> EngineResult<(GameState, Vec<Action>)> {
    let deal = build_deal(table, round)?;
    let actions = parse_actions(&round.actions)?;
    let mut state = GameState::Round(RoundState::start(deal));
    for &action in &actions {
        state = state.proceed(action)?;
    }
    Ok((state, actions))
}

fn write_transcript(state: &GameState, writer: &mut dyn Write) -> EngineResult<()> {
    writeln!(writer, "\n{}", "Hand history".cyan().bold())?;
    for line in transcript(state, PLAYER_NAMES) {
        writeln!(writer, "  {}", line)?;
    }
    Ok(())
}

fn write_outcome(state: &GameState, writer: &mut dyn Write) -> EngineResult<()> {
    match state {
        GameState::Round(round) => {
            writeln!(writer, "{}", round_table(round, PLAYER_NAMES))?;
            writeln!(writer, "  {}", legal_line(round))?;
        }
        GameState::Terminal(terminal) => {
            writeln!(writer, "{}", terminal_table(terminal, PLAYER_NAMES))?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_replay(table: &TableArgs, round: &RoundArgs, writer: &mut dyn Write) -> EngineResult<()> {
    let deal = build_deal(table, round)?;
    let actions = parse_actions(&round.actions)?;
    writeln!(
        writer,
        "{} {}",
        "Replaying".cyan().bold(),
        if actions.is_empty() { "-".to_string() } else { format_actions(&actions) }
    )?;

    let mut state = GameState::Round(RoundState::start(deal));
    for action in actions {
        let next = match &state {
            GameState::Round(current) => {
                writeln!(writer, "{}", round_table(current, PLAYER_NAMES))?;
                writeln!(writer, "  {}", legal_line(current))?;
                writeln!(
                    writer,
                    "  {} {}\n",
                    PLAYER_NAMES[current.active()].bold(),
                    action.code().yellow().bold()
                )?;
                current.proceed(action)?
            }
            GameState::Terminal(_) => return Err(EngineError::RoundOver),
        };
        state = next;
    }

    write_outcome(&state, writer)?;
    write_transcript(&state, writer)
}

fn cmd_legal(table: &TableArgs, round: &RoundArgs, writer: &mut dyn Write) -> EngineResult<()> {
    let (state, _) = build_state(table, round)?;
    let current = state.as_round().ok_or(EngineError::RoundOver)?;
    writeln!(writer, "{}", round_table(current, PLAYER_NAMES))?;
    writeln!(writer, "  {}", legal_line(current))?;
    Ok(())
}

fn cmd_explore(
    table: &TableArgs,
    round: &RoundArgs,
    samples: usize,
    seed: u64,
    writer: &mut dyn Write,
) -> EngineResult<()> {
    let (state, _) = build_state(table, round)?;
    let current = state.as_round().ok_or(EngineError::RoundOver)?;
    writeln!(writer, "{}", round_table(current, PLAYER_NAMES))?;
    let summary = explore(current, samples, seed)?;
    writeln!(
        writer,
        "\n{} {} random playouts (seed {})",
        "Explored".cyan().bold(),
        summary.playouts,
        seed
    )?;
    writeln!(writer, "{}", summary_table(&summary, PLAYER_NAMES))?;
    Ok(())
}

fn cmd_play<R: BufRead>(
    table: &TableArgs,
    round: &RoundArgs,
    random_seat: Option<usize>,
    seed: u64,
    reader: R,
    writer: &mut dyn Write,
) -> EngineResult<()> {
    if let Some(seat) = random_seat.filter(|&seat| seat >= NUM_PLAYERS) {
        return Err(EngineError::InvalidConfig(format!("no seat {}", seat)));
    }
    let (mut state, _) = build_state(table, round)?;
    let names = PLAYER_NAMES.map(str::to_string);
    let mut human = PromptSource::new(reader, &mut *writer, names);
    let mut computer = RandomSource::new(seed);

    writeln!(
        human.writer_mut(),
        "{}  Type an action code (F, C, K, R<amount>) or 'q' to quit.",
        "Bounty hold'em".cyan().bold()
    )?;

    while let GameState::Round(current) = &state {
        writeln!(human.writer_mut(), "{}", round_table(current, PLAYER_NAMES))?;
        let action = if random_seat == Some(current.active()) {
            let action = computer.act(current)?;
            writeln!(
                human.writer_mut(),
                "  {} {}",
                PLAYER_NAMES[current.active()].bold(),
                action.code().yellow().bold()
            )?;
            action
        } else {
            human.act(current)?
        };
        let next = current.proceed(action)?;
        state = next;
    }

    let writer = human.into_writer();
    write_outcome(&state, writer)?;
    write_transcript(&state, writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    fn round_args(actions: &str) -> RoundArgs {
        RoundArgs {
            deal: None,
            hands: Some("AsKd,7c2h".to_string()),
            bounties: Some("A,7".to_string()),
            board: Some("Ah9c4d3s2d".to_string()),
            actions: actions.to_string(),
        }
    }

    fn output(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).expect("utf-8 output")
    }

    #[test]
    fn test_parse_hands_with_and_without_separator() {
        let a = parse_hands("AsKd,7c2h").unwrap();
        let b = parse_hands("AsKd7c2h").unwrap();
        assert_eq!(a, b);
        assert!(parse_hands("AsKd").is_err());
    }

    #[test]
    fn test_parse_bounties() {
        assert_eq!(parse_bounties("A,7").unwrap(), [Rank::Ace, Rank::Seven]);
        assert_eq!(parse_bounties("Tq").unwrap(), [Rank::Ten, Rank::Queen]);
        assert!(parse_bounties("A").is_err());
        assert!(parse_bounties("A,X").is_err());
    }

    #[test]
    fn test_parse_board_needs_five_cards() {
        assert!(parse_board_runout("Ah9c4d3s2d").is_ok());
        assert!(matches!(
            parse_board_runout("Ah9c4d"),
            Err(EngineError::NotEnoughCards { need: 5, got: 3 })
        ));
    }

    #[test]
    fn test_table_overrides() {
        let table = TableArgs {
            stack: Some(200),
            big_blind: Some(4),
            small_blind: Some(2),
            ..Default::default()
        };
        let config = table.resolve().unwrap();
        assert_eq!(config, GameConfig::new(200, 2, 4).unwrap());
        let bad = TableArgs {
            small_blind: Some(5),
            ..Default::default()
        };
        assert!(bad.resolve().is_err());
    }

    #[test]
    fn test_cli_requires_cards_without_deal_file() {
        assert!(Cli::try_parse_from(["bounty", "replay", "--hands", "AsKd7c2h"]).is_err());
        assert!(Cli::try_parse_from(["bounty", "legal", "--deal", "deal.json"]).is_ok());
    }

    #[test]
    fn test_cli_global_table_flags() {
        let cli = parse(&[
            "bounty", "legal", "--hands", "AsKd7c2h", "--bounties", "A7", "--board",
            "Ah9c4d3s2d", "--stack", "100",
        ]);
        assert_eq!(cli.table.stack, Some(100));
        assert!(matches!(cli.command, Commands::Legal(_)));
    }

    #[test]
    fn test_replay_writes_history() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        cmd_replay(&TableArgs::default(), &round_args("C,R10,F"), &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("P0 posts the blind of 1"));
        assert!(text.contains("P1 raises to 10"));
        assert!(text.contains("P0 folds"));
        assert!(text.contains("P0 awarded -2"));
        assert!(text.contains("P1 awarded 2"));
    }

    #[test]
    fn test_replay_rejects_illegal_action() {
        let mut out = Vec::new();
        let err = cmd_replay(&TableArgs::default(), &round_args("K"), &mut out).unwrap_err();
        assert!(matches!(err, EngineError::IllegalAction { action: Action::Check, .. }));
    }

    #[test]
    fn test_legal_after_limp() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        cmd_legal(&TableArgs::default(), &round_args("C"), &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("Check Raise"));
        assert!(text.contains("raise to 4..=400"));
    }

    #[test]
    fn test_legal_on_finished_round() {
        let mut out = Vec::new();
        let err = cmd_legal(&TableArgs::default(), &round_args("F"), &mut out).unwrap_err();
        assert!(matches!(err, EngineError::RoundOver));
    }

    #[test]
    fn test_explore_prints_summary() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        cmd_explore(&TableArgs::default(), &round_args(""), 50, 7, &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("Explored 50 random playouts"));
        assert!(text.contains("Showdowns"));
    }

    #[test]
    fn test_play_reads_actions_until_round_ends() {
        colored::control::set_override(false);
        let input = "X\nC\nR10\nF\n".as_bytes();
        let mut out = Vec::new();
        cmd_play(&TableArgs::default(), &round_args(""), None, 0, input, &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("Invalid action code: X"));
        assert!(text.contains("P0 folds"));
        assert!(text.contains("P1 awarded 2"));
    }

    #[test]
    fn test_play_quits_on_q() {
        let input = "q\n".as_bytes();
        let mut out = Vec::new();
        let err = cmd_play(&TableArgs::default(), &round_args(""), None, 0, input, &mut out).unwrap_err();
        assert!(matches!(err, EngineError::InputClosed));
    }

    #[test]
    fn test_play_against_random_seat_finishes() {
        colored::control::set_override(false);
        // P0 folds straight away whatever the random seat would do
        let input = "F\n".as_bytes();
        let mut out = Vec::new();
        cmd_play(&TableArgs::default(), &round_args(""), Some(1), 3, input, &mut out).unwrap();
        assert!(output(out).contains("P0 folds"));
    }
}
