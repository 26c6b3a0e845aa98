use std::sync::Arc;

use bounty_holdem::actions::Action;
use bounty_holdem::cards::*;
use bounty_holdem::config::GameConfig;
use bounty_holdem::history::*;
use bounty_holdem::state::*;

const NAMES: [&str; 2] = ["A", "B"];

fn deal() -> Arc<Deal> {
    let board: [Card; 5] = parse_cards("Ah9c4d3s2d").unwrap().try_into().unwrap();
    let hands = [parse_hole("AsKd").unwrap(), parse_hole("7c2h").unwrap()];
    Arc::new(Deal::new(GameConfig::default(), hands, [Rank::Ace, Rank::Seven], board).unwrap())
}

fn play(actions: &[Action]) -> GameState {
    let mut state = GameState::Round(RoundState::start(deal()));
    for &action in actions {
        state = state.proceed(action).unwrap();
    }
    state
}

fn checked_down() -> Vec<Action> {
    let mut actions = vec![Action::Call];
    actions.extend([Action::Check; 7]);
    actions
}

#[test]
fn test_chain_oldest_first() {
    let state = play(&[Action::Call, Action::Raise(10)]);
    let chain = chain(&state);
    assert_eq!(chain.len(), 3);
    assert_eq!(chain[0].as_round().unwrap().pips(), [1, 2]);
    assert_eq!(chain[2].as_round().unwrap().pips(), [2, 10]);
    assert_eq!(states(&state).count(), 3);
}

#[test]
fn test_actions_recovered_from_states() {
    let history = [Action::Call, Action::Raise(10), Action::Raise(30), Action::Fold];
    let state = play(&history);
    let recovered = actions(&state);
    assert_eq!(
        recovered,
        vec![
            (0, Action::Call),
            (1, Action::Raise(10)),
            (0, Action::Raise(30)),
            (1, Action::Fold),
        ]
    );
}

#[test]
fn test_actions_across_streets() {
    let history = [
        Action::Raise(6),
        Action::Call,
        Action::Raise(20),
        Action::Call,
        Action::Check,
        Action::Check,
        Action::Check,
        Action::Raise(50),
        Action::Call,
    ];
    let state = play(&history);
    assert!(state.is_terminal());
    let recovered: Vec<Action> = actions(&state).into_iter().map(|(_, a)| a).collect();
    assert_eq!(recovered, history.to_vec());
}

#[test]
fn test_street_events() {
    let state = play(&checked_down());
    let streets: Vec<Street> = events(&state)
        .into_iter()
        .filter_map(|event| match event {
            Event::Street { street, .. } => Some(street),
            Event::Action { .. } => None,
        })
        .collect();
    assert_eq!(streets, vec![Street::Flop, Street::Turn, Street::River]);
    assert_eq!(actions(&state).len(), 8);
}

#[test]
fn test_transcript_after_fold() {
    let state = play(&[Action::Call, Action::Raise(10), Action::Fold]);
    let lines = transcript(&state, NAMES);
    assert_eq!(
        lines,
        vec![
            "A posts the blind of 1",
            "B posts the blind of 2",
            "A dealt [As Kd]",
            "B dealt [7c 2h]",
            "A calls",
            "B raises to 10",
            "A folds",
            "A hits their bounty A",
            "B hits their bounty 7",
            "A awarded -2",
            "B awarded 2",
        ]
    );
}

#[test]
fn test_transcript_showdown() {
    let state = play(&checked_down());
    let lines = transcript(&state, NAMES);
    assert!(lines.contains(&"Flop [Ah 9c 4d], A (2), B (2)".to_string()));
    assert!(lines.contains(&"River [Ah 9c 4d 3s 2d], A (2), B (2)".to_string()));
    assert!(lines.contains(&"A shows [As Kd]".to_string()));
    assert!(lines.contains(&"B shows [7c 2h]".to_string()));
    assert_eq!(lines.last().unwrap(), "B awarded -2");
}

#[test]
fn test_transcript_bet_versus_raise() {
    let mut history = vec![Action::Call];
    history.extend([Action::Check; 5]);
    history.extend([Action::Raise(10), Action::Raise(40)]);
    let state = play(&history);
    let lines = transcript(&state, NAMES);
    assert!(lines.contains(&"B bets 10".to_string()));
    assert!(lines.contains(&"A raises to 40".to_string()));
    assert!(!state.is_terminal());
}

#[test]
fn test_transcript_without_blinds_for_resumed_state() {
    let start = RoundState::new(1, Street::Turn, [0, 0], [300, 300], deal()).unwrap();
    let state = start.proceed(Action::Check).unwrap();
    let lines = transcript(&state, NAMES);
    assert_eq!(lines[0], "Turn [Ah 9c 4d 3s], A (100), B (100)");
    assert_eq!(lines[1], "B checks");
}
