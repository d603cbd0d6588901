#![allow(dead_code)]

use sixmax_engine::cards::{full_deck, parse_cards, Card};
use sixmax_engine::config::TableConfig;
use sixmax_engine::deck::CardSource;
use sixmax_engine::engine::Engine;
use sixmax_engine::player::SEATS;

/// Deals a fixed sequence of cards, the same one after every shuffle.
#[derive(Debug, Clone)]
pub struct StackedDeck {
    cards: Vec<Card>,
    position: usize,
}

impl StackedDeck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards, position: 0 }
    }

    /// Arranges the deck so each seat receives `holes[seat]` (two cards, or
    /// empty for a seat sitting out) and the board runs out as `board`.
    ///
    /// Cards go out one at a time clockwise from the seat after `button`,
    /// then flop, turn and river with no burns. Unused cards follow the
    /// board so the deck never runs dry.
    pub fn arranged(holes: [&str; SEATS], board: &str, button: usize) -> Self {
        let holes: Vec<Vec<Card>> = holes.iter().map(|h| cards(h)).collect();
        let mut order = Vec::with_capacity(52);
        for round in 0..2 {
            for i in 1..=SEATS {
                let seat = (button + i) % SEATS;
                if let Some(&c) = holes[seat].get(round) {
                    order.push(c);
                }
            }
        }
        order.extend(cards(board));
        let rest: Vec<Card> = full_deck()
            .into_iter()
            .filter(|c| !order.contains(c))
            .collect();
        order.extend(rest);
        Self::new(order)
    }
}

impl CardSource for StackedDeck {
    fn shuffle(&mut self) {
        self.position = 0;
    }

    fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }
}

pub fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).expect("valid card list")
}

pub fn config() -> TableConfig {
    TableConfig {
        seed: Some(1),
        ..TableConfig::default()
    }
}

/// Six 200-chip stacks with a stacked deck; the first hand puts the button on
/// seat 0, the small blind on 1 and the big blind on 2.
pub fn table(holes: [&str; SEATS], board: &str) -> Engine<StackedDeck> {
    Engine::with_source(config(), StackedDeck::arranged(holes, board, 0)).expect("valid config")
}

pub fn table_with_stacks(
    holes: [&str; SEATS],
    board: &str,
    stacks: [u32; SEATS],
) -> Engine<StackedDeck> {
    let button = stacks.iter().position(|&s| s > 0).unwrap_or(0);
    Engine::with_stacks(config(), StackedDeck::arranged(holes, board, button), stacks)
        .expect("valid config")
}

pub const HOLES: [&str; SEATS] = [
    "2c 7d", "3c 8d", "4c 9d", "5h Td", "6h Jd", "Ac Ad",
];
pub const BOARD: &str = "Ks Qs 2s 8h 3h";
