use crate::errors::GameError;
use crate::player::PlayerAction as A;

/// An action that passed validation, expressed in chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    /// Call with nothing owed
    Check,
    /// Pay this many chips to match the table bet
    Call(u32),
    /// Raise the street bet to this total
    Raise(u32),
    /// Push the whole remaining stack (this many chips); raises the table bet
    /// only if it exceeds it
    AllIn(u32),
}

/// What the acting player is facing, as seen by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetContext {
    /// Player's remaining chip stack
    pub stack: u32,
    /// Chips the player already put in this street
    pub committed: u32,
    /// The bet every player must match this street
    pub table_bet: u32,
    pub big_blind: u32,
    /// Preflop big blind that has not seen a raise yet
    pub holds_option: bool,
}

impl BetContext {
    pub fn to_call(&self) -> u32 {
        self.table_bet.saturating_sub(self.committed)
    }

    /// Largest street total this player can reach.
    pub fn max_raise_to(&self) -> u32 {
        self.committed.saturating_add(self.stack)
    }

    /// Legal "raise to" range, or `None` when the player cannot raise at all.
    /// The lower bound drops to the all-in total for a short stack.
    pub fn raise_bounds(&self) -> Option<(u32, u32)> {
        let max = self.max_raise_to();
        if max <= self.table_bet {
            return None;
        }
        let min = min_raise_to(self.table_bet, self.big_blind).min(max);
        Some((min, max))
    }
}

/// Smallest legal raise target: one big blind over the current bet, and never
/// less than double it.
pub fn min_raise_to(table_bet: u32, big_blind: u32) -> u32 {
    table_bet
        .saturating_add(big_blind)
        .max(table_bet.saturating_mul(2))
}

/// Validates a player action according to betting rules and stack size.
///
/// Converts a [`crate::player::PlayerAction`] into a [`ValidatedAction`],
/// enforcing the minimum raise and turning over-sized or short-stacked
/// requests into an all-in.
///
/// # Errors
///
/// - [`GameError::BigBlindOptionFold`] - the big blind tries to fold an unraised pot
/// - [`GameError::InsufficientChips`] - a raise that cannot exceed the current bet
/// - [`GameError::InvalidBetAmount`] - raise target below the minimum, or zero
///
/// # Examples
///
/// ```
/// use sixmax_engine::rules::{validate_action, BetContext, ValidatedAction};
/// use sixmax_engine::player::PlayerAction;
///
/// let ctx = BetContext { stack: 100, committed: 0, table_bet: 10, big_blind: 2, holds_option: false };
///
/// // Call pays the difference
/// assert_eq!(validate_action(&ctx, PlayerAction::Call), Ok(ValidatedAction::Call(10)));
///
/// // Raise targets below twice the bet are refused
/// assert!(validate_action(&ctx, PlayerAction::Raise(15)).is_err());
///
/// // Asking for more than the stack goes all-in
/// assert_eq!(validate_action(&ctx, PlayerAction::Raise(500)), Ok(ValidatedAction::AllIn(100)));
/// ```
pub fn validate_action(ctx: &BetContext, action: A) -> Result<ValidatedAction, GameError> {
    match action {
        A::Fold => {
            if ctx.holds_option && ctx.to_call() == 0 {
                Err(GameError::BigBlindOptionFold)
            } else {
                Ok(ValidatedAction::Fold)
            }
        }
        A::Call => {
            let to_call = ctx.to_call();
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else if ctx.stack <= to_call {
                Ok(ValidatedAction::AllIn(ctx.stack))
            } else {
                Ok(ValidatedAction::Call(to_call))
            }
        }
        A::Raise(amount) => {
            let minimum = min_raise_to(ctx.table_bet, ctx.big_blind);
            if amount == 0 {
                return Err(GameError::InvalidBetAmount { amount, minimum });
            }
            let max = ctx.max_raise_to();
            if max <= ctx.table_bet {
                Err(GameError::InsufficientChips)
            } else if amount >= max || max < minimum {
                Ok(ValidatedAction::AllIn(ctx.stack))
            } else if amount < minimum {
                Err(GameError::InvalidBetAmount { amount, minimum })
            } else {
                Ok(ValidatedAction::Raise(amount))
            }
        }
    }
}
