use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};

/// Anything that can supply one hand's worth of unique cards.
///
/// The engine calls [`CardSource::shuffle`] once at the start of every hand and
/// then draws cards one at a time until the hand is dealt. Implementations must
/// never return the same card twice between two shuffles.
pub trait CardSource {
    /// Restores all 52 cards and puts them in a fresh order.
    fn shuffle(&mut self);
    /// Draws the next card, or `None` once the source is exhausted.
    fn deal_card(&mut self) -> Option<Card>;
    /// Seed that reproduces this source's shuffles, if it has one.
    fn seed(&self) -> Option<u64> {
        None
    }
}

/// Seeded 52-card deck backed by ChaCha20, so a seed reproduces every hand.
///
/// # Examples
///
/// ```
/// use sixmax_engine::deck::{CardSource, Deck};
///
/// let mut a = Deck::new_with_seed(42);
/// let mut b = Deck::new_with_seed(42);
/// a.shuffle();
/// b.shuffle();
/// assert_eq!(a.deal_card(), b.deal_card());
/// ```
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    seed: u64,
    rng: ChaCha20Rng,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        // Keep initial order until shuffle is called explicitly
        Self {
            cards: full_deck(),
            position: 0,
            seed,
            rng,
        }
    }

    /// Uses `seed` when given, otherwise draws one from the thread RNG.
    pub fn new(seed: Option<u64>) -> Self {
        Self::new_with_seed(seed.unwrap_or_else(rand::random))
    }

    pub fn reset(&mut self) {
        self.cards = full_deck();
        self.position = 0;
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}

impl CardSource for Deck {
    fn shuffle(&mut self) {
        self.reset();
        self.cards.shuffle(&mut self.rng);
    }

    fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    fn seed(&self) -> Option<u64> {
        Some(self.seed)
    }
}
