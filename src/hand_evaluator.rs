//! Five-card poker hand ranking over hole cards plus board.
//!
//! Showdown only needs an ordering between two players, which is what the
//! [`HandEvaluator`] trait exposes. [`BestFiveEvaluator`] is the default and
//! picks the best five of the seven available cards.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

use crate::cards::Card;
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::HighCard => write!(f, "High Card"),
            HandCategory::OnePair => write!(f, "One Pair"),
            HandCategory::TwoPair => write!(f, "Two Pair"),
            HandCategory::ThreeOfAKind => write!(f, "Three of a Kind"),
            HandCategory::Straight => write!(f, "Straight"),
            HandCategory::Flush => write!(f, "Flush"),
            HandCategory::FullHouse => write!(f, "Full House"),
            HandCategory::FourOfAKind => write!(f, "Four of a Kind"),
            HandCategory::StraightFlush => write!(f, "Straight Flush"),
            HandCategory::RoyalFlush => write!(f, "Royal Flush"),
        }
    }
}

/// A ranked five-card hand. Equality and ordering only look at the category
/// and the tie-break values, never at suits.
#[derive(Debug, Clone)]
pub struct HandResult {
    pub category: HandCategory,
    pub kickers: Vec<u8>,
    pub cards: [Card; 5],
}

impl HandResult {
    fn new(category: HandCategory, kickers: Vec<u8>, cards: [Card; 5]) -> Self {
        HandResult {
            category,
            kickers,
            cards,
        }
    }
}

impl fmt::Display for HandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)
    }
}

impl PartialEq for HandResult {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category && self.kickers == other.kickers
    }
}

impl Eq for HandResult {}

impl PartialOrd for HandResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.kickers.cmp(&other.kickers))
    }
}

fn is_flush(cards: &[Card]) -> bool {
    cards.windows(2).all(|w| w[0].suit == w[1].suit)
}

/// High card of the straight, with the wheel (A-2-3-4-5) counting as 5.
fn straight_high(values: &[u8]) -> Option<u8> {
    let unique: Vec<u8> = values
        .iter()
        .copied()
        .collect::<BTreeSet<u8>>()
        .into_iter()
        .rev()
        .collect();

    if unique.len() != 5 {
        return None;
    }
    if unique[0] - unique[4] == 4 {
        return Some(unique[0]);
    }
    if unique == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

fn evaluate_five(cards: [Card; 5]) -> HandResult {
    let mut values: Vec<u8> = cards.iter().map(|c| c.value()).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    let flush = is_flush(&cards);
    let straight = straight_high(&values);

    if let (true, Some(high)) = (flush, straight) {
        let category = if high == 14 {
            HandCategory::RoyalFlush
        } else {
            HandCategory::StraightFlush
        };
        return HandResult::new(category, vec![high], cards);
    }

    let mut counts = [0u8; 15];
    for &v in &values {
        counts[v as usize] += 1;
    }

    // (count, value), most frequent first, then highest value
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&v| counts[v as usize] > 0)
        .map(|v| (counts[v as usize], v))
        .collect();
    groups.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
    let group_values: Vec<u8> = groups.iter().map(|&(_, v)| v).collect();

    let category = match (groups[0].0, groups.get(1).map_or(0, |g| g.0)) {
        (4, _) => HandCategory::FourOfAKind,
        (3, 2) => HandCategory::FullHouse,
        _ if flush => HandCategory::Flush,
        _ if straight.is_some() => HandCategory::Straight,
        (3, _) => HandCategory::ThreeOfAKind,
        (2, 2) => HandCategory::TwoPair,
        (2, _) => HandCategory::OnePair,
        _ => HandCategory::HighCard,
    };

    let kickers = match category {
        HandCategory::Straight => straight.into_iter().collect(),
        HandCategory::Flush | HandCategory::HighCard => values,
        _ => group_values,
    };

    HandResult::new(category, kickers, cards)
}

fn best_of(cards: &[Card]) -> Option<HandResult> {
    cards
        .iter()
        .copied()
        .combinations(5)
        .map(|combo| evaluate_five([combo[0], combo[1], combo[2], combo[3], combo[4]]))
        .max()
}

/// Best five-card hand from hole cards and board. Needs at least five cards
/// in total.
pub fn evaluate_hand(hole_cards: &[Card], board: &[Card]) -> EngineResult<HandResult> {
    let all_cards: Vec<Card> = hole_cards.iter().chain(board.iter()).copied().collect();
    best_of(&all_cards).ok_or(EngineError::NotEnoughCards {
        need: 5,
        got: all_cards.len(),
    })
}

/// `Greater` when `hand1` beats `hand2` on this board.
pub fn compare_hands(hand1: &[Card], hand2: &[Card], board: &[Card]) -> EngineResult<Ordering> {
    let r1 = evaluate_hand(hand1, board)?;
    let r2 = evaluate_hand(hand2, board)?;
    Ok(r1.cmp(&r2))
}

/// Decides showdowns. Returns `Greater` when player 0 holds the better hand,
/// `Less` when player 1 does, and `Equal` for a split pot.
pub trait HandEvaluator {
    fn compare(&self, hands: &[[Card; 2]; 2], board: &[Card; 5]) -> Ordering;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BestFiveEvaluator;

impl BestFiveEvaluator {
    pub fn best_hand(&self, hole: &[Card; 2], board: &[Card; 5]) -> HandResult {
        let seven = [
            hole[0], hole[1], board[0], board[1], board[2], board[3], board[4],
        ];
        // seven cards always hold at least one five-card combination
        best_of(&seven).unwrap_or_else(|| evaluate_five(*board))
    }
}

impl HandEvaluator for BestFiveEvaluator {
    fn compare(&self, hands: &[[Card; 2]; 2], board: &[Card; 5]) -> Ordering {
        self.best_hand(&hands[0], board)
            .cmp(&self.best_hand(&hands[1], board))
    }
}
