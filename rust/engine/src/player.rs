use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;

/// Number of seats at the table.
pub const SEATS: usize = 6;

/// Default starting stack size for each player in chips
pub const STARTING_STACK: u32 = 200;

/// Seat label relative to the dealer button for the current hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    UnderTheGun,
    Hijack,
    Cutoff,
    /// Dealer button (also posts the small blind heads-up)
    Button,
    SmallBlind,
    BigBlind,
}

impl Position {
    pub fn label(self) -> &'static str {
        match self {
            Position::UnderTheGun => "UTG",
            Position::Hijack => "HJ",
            Position::Cutoff => "CO",
            Position::Button => "BTN",
            Position::SmallBlind => "SB",
            Position::BigBlind => "BB",
        }
    }
}

/// A decision submitted for the player whose turn it is.
///
/// `Call` doubles as a check when nothing is owed. `Raise` carries the total
/// the player wants their bet this street to become ("raise to").
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Match the current bet, or check when nothing is owed
    Call,
    /// Raise the street bet to the given total
    Raise(u32),
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Fold => write!(f, "fold"),
            PlayerAction::Call => write!(f, "call"),
            PlayerAction::Raise(to) => write!(f, "raise {}", to),
        }
    }
}

impl FromStr for PlayerAction {
    type Err = GameError;

    /// Accepts `fold`, `call`, `check` and `raise <amount>` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb = words.next().map(str::to_ascii_lowercase);
        let arg = words.next();
        if words.next().is_some() {
            return Err(GameError::UnknownAction(s.to_string()));
        }
        match (verb.as_deref(), arg) {
            (Some("fold"), None) => Ok(PlayerAction::Fold),
            (Some("call") | Some("check"), None) => Ok(PlayerAction::Call),
            (Some("raise"), Some(n)) => n
                .parse::<u32>()
                .ok()
                .filter(|&v| v > 0)
                .map(PlayerAction::Raise)
                .ok_or_else(|| GameError::UnknownAction(s.to_string())),
            _ => Err(GameError::UnknownAction(s.to_string())),
        }
    }
}

/// A seated player. Stack carries over between hands; every other field is
/// reset when a new hand starts.
#[derive(Debug, Clone)]
pub struct Player {
    /// Seat index, 0-based
    seat: usize,
    name: String,
    /// Chips behind, not yet committed
    stack: u32,
    /// Table position for the current hand
    position: Option<Position>,
    /// Hole cards (up to 2 cards)
    hole: [Option<Card>; 2],
    /// Chips committed on the current street
    current_bet: u32,
    /// Chips committed on earlier streets of this hand
    total_bet: u32,
    in_hand: bool,
    has_acted: bool,
}

impl Player {
    pub fn new(seat: usize, name: impl Into<String>, stack: u32) -> Self {
        Self {
            seat,
            name: name.into(),
            stack,
            position: None,
            hole: [None, None],
            current_bet: 0,
            total_bet: 0,
            in_hand: false,
            has_acted: false,
        }
    }

    pub fn seat(&self) -> usize {
        self.seat
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn position(&self) -> Option<Position> {
        self.position
    }
    pub fn set_position(&mut self, pos: Option<Position>) {
        self.position = pos;
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn total_bet(&self) -> u32 {
        self.total_bet
    }
    /// Everything this player has put in the pot during the hand.
    pub fn contribution(&self) -> u32 {
        self.total_bet + self.current_bet
    }
    pub fn in_hand(&self) -> bool {
        self.in_hand
    }
    pub fn has_acted(&self) -> bool {
        self.has_acted
    }
    pub fn is_all_in(&self) -> bool {
        self.in_hand && self.stack == 0
    }
    /// Still holding cards and chips, so still able to make decisions.
    pub fn can_act(&self) -> bool {
        self.in_hand && self.stack > 0
    }

    pub fn hole_cards(&self) -> [Option<Card>; 2] {
        self.hole
    }

    pub fn give_card(&mut self, c: Card) -> Result<(), GameError> {
        if self.hole[0].is_none() {
            self.hole[0] = Some(c);
            Ok(())
        } else if self.hole[1].is_none() {
            self.hole[1] = Some(c);
            Ok(())
        } else {
            Err(GameError::HoleCardsFull { seat: self.seat })
        }
    }

    /// Clears per-hand state. Players without chips sit the hand out.
    pub fn reset_for_new_hand(&mut self) {
        self.hole = [None, None];
        self.current_bet = 0;
        self.total_bet = 0;
        self.has_acted = false;
        self.position = None;
        self.in_hand = self.stack > 0;
    }

    /// Moves `amount` from the stack into this street's bet.
    pub fn commit(&mut self, amount: u32) -> Result<(), GameError> {
        if amount > self.stack {
            return Err(GameError::InsufficientChips);
        }
        self.stack -= amount;
        self.current_bet += amount;
        Ok(())
    }

    pub fn fold(&mut self) {
        self.in_hand = false;
    }

    pub(crate) fn mark_acted(&mut self, acted: bool) {
        self.has_acted = acted;
    }

    /// Rolls this street's bet into the hand total.
    pub(crate) fn close_street(&mut self) {
        self.total_bet += self.current_bet;
        self.current_bet = 0;
        self.has_acted = false;
    }

    pub(crate) fn restore_stack(&mut self, stack: u32) {
        self.stack = stack;
        self.current_bet = 0;
        self.total_bet = 0;
    }

    pub fn add_chips(&mut self, amount: u32) {
        self.stack = self.stack.saturating_add(amount);
    }
}
