use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hand::HandScore;
use crate::player::Player;

/// One layer of the pot and the seats that can win it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePot {
    pub amount: u32,
    /// Live seats that funded this layer, in seat order
    pub eligible: Vec<usize>,
}

/// A seat's stake in the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub seat: usize,
    /// Chips committed over the whole hand
    pub amount: u32,
    /// Folded seats still fund the pot but cannot win it
    pub in_hand: bool,
}

/// How one pot was paid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotAward {
    pub amount: u32,
    pub winners: Vec<usize>,
    /// (seat, chips) for every winner; sums to `amount` unless the pot is void
    pub shares: Vec<(usize, u32)>,
}

impl PotAward {
    /// No live player was eligible, so nobody is paid.
    pub fn is_void(&self) -> bool {
        self.winners.is_empty()
    }
}

/// Splits hand contributions into a main pot and side pots.
///
/// Layers are cut at every distinct contribution level: each layer holds
/// `(level - previous level) * contributors at or above it`, and only live
/// contributors at that level are eligible to win it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PotManager {
    pots: Vec<SidePot>,
}

impl PotManager {
    pub fn from_contributions(contributions: impl IntoIterator<Item = Contribution>) -> Self {
        let mut sorted: Vec<Contribution> = contributions
            .into_iter()
            .filter(|c| c.amount > 0)
            .collect();
        // stable, so equal stakes stay in seat order
        sorted.sort_by_key(|c| c.amount);

        let mut pots = Vec::new();
        let mut floor = 0u32;
        for (i, c) in sorted.iter().enumerate() {
            if c.amount <= floor {
                continue;
            }
            let contributors = &sorted[i..];
            let amount = (c.amount - floor) * contributors.len() as u32;
            let mut eligible: Vec<usize> = contributors
                .iter()
                .filter(|c| c.in_hand)
                .map(|c| c.seat)
                .collect();
            eligible.sort_unstable();
            pots.push(SidePot { amount, eligible });
            floor = c.amount;
        }
        Self { pots }
    }

    pub fn from_players(players: &[Player]) -> Self {
        Self::from_contributions(players.iter().map(|p| Contribution {
            seat: p.seat(),
            amount: p.contribution(),
            in_hand: p.in_hand(),
        }))
    }

    pub fn pots(&self) -> &[SidePot] {
        &self.pots
    }

    pub fn main_pot(&self) -> u32 {
        self.pots.first().map_or(0, |p| p.amount)
    }

    /// Every layer after the main pot.
    pub fn side_pots(&self) -> &[SidePot] {
        self.pots.get(1..).unwrap_or(&[])
    }

    pub fn total(&self) -> u32 {
        self.pots.iter().map(|p| p.amount).sum()
    }

    /// Awards each pot, in order, to its eligible seats holding the best score.
    ///
    /// Ties split evenly; the last winner in seat order takes the remainder so
    /// the shares always add up to the pot. A pot whose eligible seats have no
    /// score is returned void.
    pub fn distribute(&self, scores: &BTreeMap<usize, HandScore>) -> Vec<PotAward> {
        self.pots
            .iter()
            .map(|pot| {
                let best = pot
                    .eligible
                    .iter()
                    .filter_map(|seat| scores.get(seat))
                    .max();
                let winners: Vec<usize> = match best {
                    Some(best) => pot
                        .eligible
                        .iter()
                        .copied()
                        .filter(|seat| scores.get(seat) == Some(best))
                        .collect(),
                    None => Vec::new(),
                };
                let shares = split_evenly(pot.amount, &winners);
                PotAward {
                    amount: pot.amount,
                    winners,
                    shares,
                }
            })
            .collect()
    }
}

fn split_evenly(amount: u32, winners: &[usize]) -> Vec<(usize, u32)> {
    let Some(n) = u32::try_from(winners.len()).ok().filter(|&n| n > 0) else {
        return Vec::new();
    };
    let share = amount / n;
    let remainder = amount - share * n;
    winners
        .iter()
        .enumerate()
        .map(|(i, &seat)| {
            let extra = if i + 1 == winners.len() { remainder } else { 0 };
            (seat, share + extra)
        })
        .collect()
}
