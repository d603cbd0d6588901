//! Read-only views handed to whatever renders the table.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::engine::Stage;
use crate::hand::Category;
use crate::player::{Player, Position};
use crate::pot::{PotAward, SidePot};

/// Public fields of one seat. Hole cards are not included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub seat: usize,
    pub name: String,
    pub stack: u32,
    pub current_bet: u32,
    pub total_bet: u32,
    pub in_hand: bool,
    pub has_acted: bool,
    pub all_in: bool,
    pub position: Option<Position>,
}

impl From<&Player> for PlayerView {
    fn from(p: &Player) -> Self {
        Self {
            seat: p.seat(),
            name: p.name().to_string(),
            stack: p.stack(),
            current_bet: p.current_bet(),
            total_bet: p.total_bet(),
            in_hand: p.in_hand(),
            has_acted: p.has_acted(),
            all_in: p.is_all_in(),
            position: p.position(),
        }
    }
}

/// Everything a client needs to draw the table and prompt the next player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub hand_id: Option<String>,
    pub stage: Stage,
    pub button: usize,
    pub small_blind: u32,
    pub big_blind: u32,
    pub board: Vec<Card>,
    /// Chips in the middle not yet paid out
    pub pot: u32,
    /// Main pot first, then side pots
    pub side_pots: Vec<SidePot>,
    /// Bet to match on the current street
    pub current_bet: u32,
    pub to_act: Option<usize>,
    pub to_call: Option<u32>,
    /// Legal "raise to" range for the player to act
    pub raise_bounds: Option<(u32, u32)>,
    pub players: Vec<PlayerView>,
}

/// One live player's result at the end of a hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownEntry {
    pub seat: usize,
    pub name: String,
    pub hole_cards: Vec<Card>,
    /// Best five cards; empty when the hand was not contested
    pub best_hand: Vec<Card>,
    pub category: Option<Category>,
    pub label: String,
    /// Chips won from each pot, indexed like [`ShowdownReport::pots`]
    pub won_per_pot: Vec<u32>,
}

impl ShowdownEntry {
    pub fn total_won(&self) -> u32 {
        self.won_per_pot.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownReport {
    pub hand_id: String,
    pub board: Vec<Card>,
    /// False when everyone else folded and no hands were compared
    pub contested: bool,
    pub pots: Vec<PotAward>,
    pub entries: Vec<ShowdownEntry>,
}

impl ShowdownReport {
    pub fn entry(&self, seat: usize) -> Option<&ShowdownEntry> {
        self.entries.iter().find(|e| e.seat == seat)
    }

    /// Total chips paid to `seat` across all pots.
    pub fn winnings(&self, seat: usize) -> u32 {
        self.entry(seat).map_or(0, ShowdownEntry::total_won)
    }

    /// Seats that won anything, in seat order.
    pub fn winners(&self) -> Vec<usize> {
        self.entries
            .iter()
            .filter(|e| e.total_won() > 0)
            .map(|e| e.seat)
            .collect()
    }

    /// Distinct hand labels among the winners, alphabetical.
    pub fn winning_labels(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.total_won() > 0)
            .map(|e| e.label.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
