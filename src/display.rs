use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::actions::{ActionKind, LegalActions};
use crate::cards::{Card, Suit};
use crate::explore::ExploreSummary;
use crate::state::{RoundState, TerminalState, NUM_PLAYERS};

pub fn board_display(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "-".dimmed().to_string();
    }
    cards
        .iter()
        .map(|card| {
            let text = card.pretty();
            match card.suit {
                Suit::Spades => text.white().to_string(),
                Suit::Hearts => text.red().to_string(),
                Suit::Diamonds => text.blue().to_string(),
                Suit::Clubs => text.green().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn styled_kind(kind: ActionKind) -> String {
    let name = kind.name();
    match kind {
        ActionKind::Raise => name.red().bold().to_string(),
        ActionKind::Call => name.green().bold().to_string(),
        ActionKind::Fold => name.dimmed().bold().to_string(),
        ActionKind::Check => name.yellow().bold().to_string(),
    }
}

pub fn legal_line(state: &RoundState) -> String {
    let legal: LegalActions = state.legal_actions();
    let kinds: Vec<String> = legal.iter().map(styled_kind).collect();
    let mut line = kinds.join(" ");
    if legal.contains(ActionKind::Raise) {
        let (min, max) = state.raise_bounds();
        line.push_str(&format!("  raise to {}..={}", min, max));
    }
    if state.continue_cost() > 0 {
        line.push_str(&format!("  to call {}", state.continue_cost()));
    }
    line
}

/// One row per player: hole cards, bounty, chips in this street and behind.
pub fn round_table(state: &RoundState, names: [&str; NUM_PLAYERS]) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new(""),
        Cell::new("Hand"),
        Cell::new("Bounty").set_alignment(CellAlignment::Center),
        Cell::new("Pip").set_alignment(CellAlignment::Right),
        Cell::new("Stack").set_alignment(CellAlignment::Right),
    ]);

    let active = state.active();
    let hits = state.bounty_hits();
    for player in 0..NUM_PLAYERS {
        let name = if player == active {
            format!("{} *", names[player]).bold().to_string()
        } else {
            names[player].to_string()
        };
        let bounty = state.bounties()[player].to_string();
        let bounty = if hits[player] {
            bounty.green().bold().to_string()
        } else {
            bounty
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(board_display(&state.hands()[player])),
            Cell::new(bounty).set_alignment(CellAlignment::Center),
            Cell::new(state.pips()[player]).set_alignment(CellAlignment::Right),
            Cell::new(state.stacks()[player]).set_alignment(CellAlignment::Right),
        ]);
    }

    format!(
        "  {} {}  pot {}\n{}",
        state.street().name().bold(),
        board_display(state.board()),
        state.pot(),
        table
    )
}

pub fn terminal_table(terminal: &TerminalState, names: [&str; NUM_PLAYERS]) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new(""),
        Cell::new("Delta").set_alignment(CellAlignment::Right),
        Cell::new("Bounty hit").set_alignment(CellAlignment::Center),
    ]);

    let deltas = terminal.deltas();
    let hits = terminal.bounty_hits();
    for player in 0..NUM_PLAYERS {
        let delta = match deltas[player] {
            d if d > 0 => format!("+{}", d).green().to_string(),
            d if d < 0 => d.to_string().red().to_string(),
            d => d.to_string(),
        };
        let hit = if hits[player] { "yes".green().to_string() } else { "no".dimmed().to_string() };
        table.add_row(vec![
            Cell::new(names[player].bold().to_string()),
            Cell::new(delta).set_alignment(CellAlignment::Right),
            Cell::new(hit).set_alignment(CellAlignment::Center),
        ]);
    }

    let ending = if terminal.went_to_showdown() { "showdown" } else { "fold" };
    format!("  {} ({})\n{}", "Round over".cyan().bold(), ending, table)
}

pub fn summary_table(summary: &ExploreSummary, names: [&str; NUM_PLAYERS]) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Metric").set_alignment(CellAlignment::Left),
        Cell::new("Value").set_alignment(CellAlignment::Right),
    ]);

    let mut row = |label: &str, value: String| {
        table.add_row(vec![
            Cell::new(label.bold().to_string()),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    };
    row("Playouts", summary.playouts.to_string());
    row("Folds", summary.folds.to_string());
    row("Showdowns", summary.showdowns.to_string());
    row("Split pots", summary.splits.to_string());
    for player in 0..NUM_PLAYERS {
        row(&format!("{} wins", names[player]), summary.wins[player].to_string());
        row(
            &format!("{} bounty hit", names[player]),
            format!("{:.1}%", summary.bounty_hit_rate[player] * 100.0),
        );
    }
    row("Mean |delta|", format!("{:.2}", summary.mean_abs_delta));
    row("Max |delta|", summary.max_abs_delta.to_string());
    row("Mean actions", format!("{:.2}", summary.mean_actions));
    row(&format!("{} net", names[0]), summary.net.to_string());

    table.to_string()
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}
