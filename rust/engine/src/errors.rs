use thiserror::Error;

/// Everything the engine can refuse or fail on.
///
/// Illegal actions are recoverable: they are rejected before any state is
/// touched. The remaining variants mean the table's bookkeeping is broken and
/// the hand in progress is aborted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid bet amount: {amount}, minimum: {minimum}")]
    InvalidBetAmount { amount: u32, minimum: u32 },
    #[error("Insufficient chips for action")]
    InsufficientChips,
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("A hand is already in progress")]
    HandInProgress,
    #[error("Hand already complete")]
    HandAlreadyComplete,
    #[error("Player {seat} already folded")]
    PlayerAlreadyFolded { seat: usize },
    #[error("Player {seat} is all-in and cannot act")]
    PlayerAllIn { seat: usize },
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotPlayersTurn { expected: usize, actual: usize },
    #[error("Big blind cannot fold while holding the option")]
    BigBlindOptionFold,
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Invalid card: {0}")]
    InvalidCard(String),
    #[error("No showdown report available")]
    NoShowdown,
    #[error("Need at least two players with chips, found {funded}")]
    NotEnoughPlayers { funded: usize },
    #[error("Deck exhausted while dealing")]
    DeckExhausted,
    #[error("Player {seat} already holds two cards")]
    HoleCardsFull { seat: usize },
    #[error("Cannot evaluate {count} cards (expected 5 to 7)")]
    InvalidCardCount { count: usize },
    #[error("Chip conservation violated: expected {expected}, found {actual}")]
    ChipsNotConserved { expected: u64, actual: u64 },
}

impl GameError {
    /// True for rejected actions the caller can simply retry differently.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            GameError::NotEnoughPlayers { .. }
                | GameError::DeckExhausted
                | GameError::HoleCardsFull { .. }
                | GameError::InvalidCardCount { .. }
                | GameError::ChipsNotConserved { .. }
        )
    }
}
