use tracing::debug;

use crate::errors::GameError;
use crate::game::GameState;
use crate::logger::Street;
use crate::player::{Player, PlayerAction};
use crate::rules::{validate_action, BetContext, ValidatedAction};

/// Result of one accepted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub seat: usize,
    pub action: ValidatedAction,
    /// Chips moved from the player's stack into the pot
    pub chips: u32,
}

/// State machine for a single betting street.
///
/// The round keeps the clockwise seat order for the street and a cursor just
/// past the last player to act. It never owns the players: every query takes
/// the seat slice so the table remains the only owner of player state.
#[derive(Debug, Clone)]
pub struct BettingRound {
    street: Street,
    /// All seats, starting with the first to act this street
    order: Vec<usize>,
    cursor: usize,
    /// The bet every live player must match
    table_bet: u32,
    big_blind: u32,
    /// Big blind seat holding the preflop option
    option_seat: Option<usize>,
    raised: bool,
}

impl BettingRound {
    /// Preflop action starts left of the big blind, facing one big blind.
    pub fn preflop(bb_seat: usize, big_blind: u32) -> Self {
        Self {
            street: Street::Preflop,
            order: GameState::seats_from(bb_seat + 1),
            cursor: 0,
            table_bet: big_blind,
            big_blind,
            option_seat: Some(bb_seat),
            raised: false,
        }
    }

    /// Later streets start left of the button with no bet to match.
    pub fn postflop(street: Street, button: usize, big_blind: u32) -> Self {
        Self {
            street,
            order: GameState::seats_from(button + 1),
            cursor: 0,
            table_bet: 0,
            big_blind,
            option_seat: None,
            raised: false,
        }
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn table_bet(&self) -> u32 {
        self.table_bet
    }

    /// Whether `seat` still owes a decision this street.
    fn needs_action(&self, players: &[Player], seat: usize) -> bool {
        let p = &players[seat];
        if !p.can_act() {
            return false;
        }
        if p.current_bet() < self.table_bet {
            return true;
        }
        if p.has_acted() {
            return false;
        }
        // a lone player facing no bet has nobody left to bet against
        players.iter().any(|o| o.seat() != seat && o.can_act())
    }

    /// Next seat to act, or `None` once the street is complete.
    pub fn current_actor(&self, players: &[Player]) -> Option<usize> {
        let n = self.order.len();
        (0..n)
            .map(|i| self.order[(self.cursor + i) % n])
            .find(|&s| self.needs_action(players, s))
    }

    /// Every live player is all-in or has acted and matched the table bet.
    pub fn is_complete(&self, players: &[Player]) -> bool {
        self.current_actor(players).is_none()
    }

    pub fn context(&self, players: &[Player], seat: usize) -> BetContext {
        let p = &players[seat];
        BetContext {
            stack: p.stack(),
            committed: p.current_bet(),
            table_bet: self.table_bet,
            big_blind: self.big_blind,
            holds_option: self.option_seat == Some(seat) && !self.raised,
        }
    }

    /// Legal "raise to" range for the player whose turn it is.
    pub fn raise_bounds(&self, players: &[Player]) -> Option<(u32, u32)> {
        let seat = self.current_actor(players)?;
        self.context(players, seat).raise_bounds()
    }

    /// Validates and applies `action` for `seat`. Rejections leave every
    /// player and the round untouched.
    pub fn apply(
        &mut self,
        players: &mut [Player],
        seat: usize,
        action: PlayerAction,
    ) -> Result<Applied, GameError> {
        let actor = self
            .current_actor(players)
            .ok_or(GameError::NoHandInProgress)?;
        if seat != actor {
            return Err(match players.get(seat) {
                Some(p) if !p.in_hand() => GameError::PlayerAlreadyFolded { seat },
                Some(p) if p.is_all_in() => GameError::PlayerAllIn { seat },
                _ => GameError::NotPlayersTurn {
                    expected: actor,
                    actual: seat,
                },
            });
        }
        let validated = validate_action(&self.context(players, seat), action)?;

        let player = &mut players[seat];
        let chips = match validated {
            ValidatedAction::Fold => {
                player.fold();
                0
            }
            ValidatedAction::Check => 0,
            ValidatedAction::Call(x) | ValidatedAction::AllIn(x) => {
                player.commit(x)?;
                x
            }
            ValidatedAction::Raise(to) => {
                let x = to - player.current_bet();
                player.commit(x)?;
                x
            }
        };
        player.mark_acted(true);

        let new_bet = players[seat].current_bet();
        if new_bet > self.table_bet {
            self.table_bet = new_bet;
            self.raised = true;
            for p in players.iter_mut() {
                if p.seat() != seat && p.in_hand() {
                    p.mark_acted(false);
                }
            }
        }
        if let Some(idx) = self.order.iter().position(|&s| s == seat) {
            self.cursor = (idx + 1) % self.order.len();
        }

        debug!(
            street = ?self.street,
            seat,
            action = ?validated,
            chips,
            table_bet = self.table_bet,
            "action applied"
        );
        Ok(Applied {
            seat,
            action: validated,
            chips,
        })
    }

    /// Folds every street bet into the hand totals and clears acted flags.
    pub fn close(self, players: &mut [Player]) {
        for p in players.iter_mut() {
            p.close_street();
        }
    }
}
