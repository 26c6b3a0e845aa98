use std::cmp::Ordering;

use bounty_holdem::cards::*;
use bounty_holdem::hand_evaluator::*;

fn c(notation: &str) -> Card {
    parse_card(notation).unwrap()
}

fn board5(notation: &str) -> [Card; 5] {
    parse_cards(notation).unwrap().try_into().unwrap()
}

#[test]
fn test_royal_flush() {
    let hole = vec![c("As"), c("Ks")];
    let board = parse_cards("QsTsJs2h3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::RoyalFlush);
    assert_eq!(result.kickers, vec![14]);
}

#[test]
fn test_straight_flush() {
    let hole = vec![c("9h"), c("8h")];
    let board = parse_cards("7h6h5hAcKd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::StraightFlush);
    assert_eq!(result.kickers, vec![9]);
}

#[test]
fn test_four_of_a_kind() {
    let hole = vec![c("Ks"), c("Kh")];
    let board = parse_cards("KdKc5s2h3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::FourOfAKind);
    assert_eq!(result.kickers, vec![13, 5]);
}

#[test]
fn test_full_house() {
    let hole = vec![c("As"), c("Ah")];
    let board = parse_cards("AdKsKh2c3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::FullHouse);
    assert_eq!(result.kickers, vec![14, 13]);
}

#[test]
fn test_flush() {
    let hole = vec![c("As"), c("Ts")];
    let board = parse_cards("8s5s2sKdQh").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::Flush);
    assert_eq!(result.kickers, vec![14, 10, 8, 5, 2]);
}

#[test]
fn test_straight() {
    let hole = vec![c("9s"), c("8h")];
    let board = parse_cards("7d6c5sAhKd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::Straight);
    assert_eq!(result.kickers, vec![9]);
}

#[test]
fn test_wheel() {
    let hole = vec![c("As"), c("2h")];
    let board = parse_cards("3d4c5sKhQd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::Straight);
    assert_eq!(result.kickers, vec![5]);
}

#[test]
fn test_three_of_a_kind() {
    let hole = vec![c("Qs"), c("Qh")];
    let board = parse_cards("Qd7s3h2cKd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::ThreeOfAKind);
}

#[test]
fn test_two_pair() {
    let hole = vec![c("As"), c("Kh")];
    let board = parse_cards("AdKs5c2h3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::TwoPair);
    assert_eq!(result.kickers, vec![14, 13, 5]);
}

#[test]
fn test_one_pair() {
    let hole = vec![c("As"), c("Ah")];
    let board = parse_cards("Kd7s3c2h5d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::OnePair);
    assert_eq!(result.kickers, vec![14, 13, 7, 5]);
}

#[test]
fn test_high_card() {
    let hole = vec![c("As"), c("Kh")];
    let board = parse_cards("Qd9s3c2h5d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::HighCard);
    assert_eq!(result.to_string(), "High Card");
}

#[test]
fn test_not_enough_cards() {
    assert!(evaluate_hand(&[c("As"), c("Kh")], &[c("Qd")]).is_err());
}

#[test]
fn test_flush_beats_straight() {
    let board = parse_cards("7s6s5s4dAh").unwrap();
    assert_eq!(
        compare_hands(&[c("As"), c("2s")], &[c("8h"), c("9h")], &board).unwrap(),
        Ordering::Greater
    );
}

#[test]
fn test_higher_pair_wins() {
    let board = parse_cards("2s5d8cTh3d").unwrap();
    assert_eq!(
        compare_hands(&[c("Ks"), c("Kh")], &[c("As"), c("Ah")], &board).unwrap(),
        Ordering::Less
    );
}

#[test]
fn test_kicker_decides() {
    let board = parse_cards("As5d8cTh3d").unwrap();
    assert_eq!(
        compare_hands(&[c("Ad"), c("Kh")], &[c("Ah"), c("Qd")], &board).unwrap(),
        Ordering::Greater
    );
}

#[test]
fn test_board_plays() {
    let board = parse_cards("AsKdQhJsTs").unwrap();
    assert_eq!(
        compare_hands(&[c("2h"), c("3d")], &[c("4h"), c("5d")], &board).unwrap(),
        Ordering::Equal
    );
}

#[test]
fn test_two_pair_kicker() {
    let board = parse_cards("AsAd5s5d2c").unwrap();
    let r = compare_hands(&[c("Kh"), c("3c")], &[c("Qh"), c("3d")], &board).unwrap();
    assert_eq!(r, Ordering::Greater);
}

#[test]
fn test_best_five_evaluator_compare() {
    let evaluator = BestFiveEvaluator;
    let board = board5("Ah9c4d3s2d");
    // wheel against a pair of aces
    let hands = [[c("5c"), c("Kd")], [c("Ac"), c("Kh")]];
    assert_eq!(evaluator.compare(&hands, &board), Ordering::Greater);
    let swapped = [hands[1], hands[0]];
    assert_eq!(evaluator.compare(&swapped, &board), Ordering::Less);
}

#[test]
fn test_best_hand_ignores_suits_for_equality() {
    let evaluator = BestFiveEvaluator;
    let board = board5("2c7d9hJsQc");
    let a = evaluator.best_hand(&[c("As"), c("Kd")], &board);
    let b = evaluator.best_hand(&[c("Ah"), c("Kc")], &board);
    assert_eq!(a, b);
    assert_eq!(a.category, HandCategory::HighCard);
}

#[test]
fn test_category_ordering() {
    assert!(HandCategory::RoyalFlush > HandCategory::StraightFlush);
    assert!(HandCategory::FullHouse > HandCategory::Flush);
    assert!(HandCategory::OnePair > HandCategory::HighCard);
}
