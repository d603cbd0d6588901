use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::errors::GameError;

/// Hand categories from weakest to strongest; the discriminant is the
/// leading element of every [`HandScore`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
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

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }
}

/// Comparable strength of a five-card hand.
///
/// Ordering is category first, then `kickers` left to right. Kickers hold the
/// grouped ranks (by count, then rank, both descending) padded with zeros, so
/// two scores compare equal exactly when the hands split a pot. The wheel
/// stores its ace as `1`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HandScore {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

impl HandScore {
    pub fn label(&self) -> &'static str {
        self.category.label()
    }
}

/// The strongest five cards found in a larger set, with the score they earn.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct BestHand {
    pub score: HandScore,
    /// Display order: grouped cards first, straights from the top down.
    pub cards: [Card; 5],
}

pub fn compare_hands(a: &HandScore, b: &HandScore) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a.kickers.cmp(&b.kickers),
        ord => ord,
    }
}

/// Scores exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> HandScore {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    for c in cards {
        rank_counts[c.rank.value() as usize] += 1;
    }
    let groups = grouped_ranks(&rank_counts);
    let shape: Vec<u8> = groups.iter().map(|&(count, _)| count).collect();

    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight = straight_values(&groups);

    let mut kickers = [0u8; 5];
    for (slot, &(_, rank)) in kickers.iter_mut().zip(groups.iter()) {
        *slot = rank;
    }

    let category = match (is_flush, straight) {
        (true, Some(vals)) => {
            kickers = vals;
            if vals[0] == Rank::Ace.value() {
                Category::RoyalFlush
            } else {
                Category::StraightFlush
            }
        }
        _ if shape == [4, 1] => Category::FourOfAKind,
        _ if shape == [3, 2] => Category::FullHouse,
        (true, None) => Category::Flush,
        (false, Some(vals)) => {
            kickers = vals;
            Category::Straight
        }
        _ if shape == [3, 1, 1] => Category::ThreeOfAKind,
        _ if shape == [2, 2, 1] => Category::TwoPair,
        _ if shape == [2, 1, 1, 1] => Category::OnePair,
        _ => Category::HighCard,
    };
    HandScore { category, kickers }
}

/// Finds the best five-card hand among 5 to 7 cards by scoring every
/// five-card subset. Ties between subsets keep the first one found.
pub fn best_hand(cards: &[Card]) -> Result<BestHand, GameError> {
    let n = cards.len();
    if !(5..=7).contains(&n) {
        return Err(GameError::InvalidCardCount { count: n });
    }
    let mut best: Option<([Card; 5], HandScore)> = None;
    for mask in 0u32..(1 << n) {
        if mask.count_ones() != 5 {
            continue;
        }
        let mut pick = [cards[0]; 5];
        for (slot, card) in pick
            .iter_mut()
            .zip((0..n).filter(|i| mask & (1 << i) != 0).map(|i| cards[i]))
        {
            *slot = card;
        }
        let score = evaluate_five(&pick);
        if best.as_ref().is_none_or(|(_, s)| score > *s) {
            best = Some((pick, score));
        }
    }
    let (pick, score) = best.ok_or(GameError::InvalidCardCount { count: n })?;
    Ok(BestHand {
        score,
        cards: display_order(pick, &score),
    })
}

/// Score of the best five-card hand among 5 to 7 cards.
pub fn evaluate_hand(cards: &[Card]) -> Result<HandScore, GameError> {
    best_hand(cards).map(|b| b.score)
}

/// (count, rank) pairs sorted by count then rank, both descending.
fn grouped_ranks(rank_counts: &[u8; 15]) -> Vec<(u8, u8)> {
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));
    groups
}

/// Straight tie-break values high to low, the wheel reading 5-4-3-2-1.
fn straight_values(groups: &[(u8, u8)]) -> Option<[u8; 5]> {
    if groups.len() != 5 {
        return None;
    }
    let mut vals = [0u8; 5];
    for (slot, &(_, rank)) in vals.iter_mut().zip(groups) {
        *slot = rank;
    }
    if vals[0] - vals[4] == 4 {
        Some(vals)
    } else if vals == [14, 5, 4, 3, 2] {
        Some([5, 4, 3, 2, 1])
    } else {
        None
    }
}

fn display_order(mut cards: [Card; 5], score: &HandScore) -> [Card; 5] {
    let mut rank_counts = [0u8; 15];
    for c in &cards {
        rank_counts[c.rank.value() as usize] += 1;
    }
    cards.sort_unstable_by(|a, b| {
        let ka = (rank_counts[a.rank.value() as usize], a.rank, a.suit);
        let kb = (rank_counts[b.rank.value() as usize], b.rank, b.suit);
        kb.cmp(&ka)
    });
    let straight_like = matches!(
        score.category,
        Category::Straight | Category::StraightFlush
    );
    // wheel: the ace plays low
    if straight_like && score.kickers[0] == 5 {
        cards.rotate_left(1);
    }
    cards
}
