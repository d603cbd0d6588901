//! # sixmax-engine: Six-Seat Texas Hold'em Core
//!
//! A No-Limit Texas Hold'em engine for one table of six seats. It deals
//! hands, enforces betting legality, splits the pot into side pots when
//! players go all-in, and pays each pot to the best eligible hand. The
//! engine is step-driven: callers submit one action at a time and read back
//! a snapshot of the table.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and text parsing
//! - [`deck`] - The [`deck::CardSource`] seam and a seeded ChaCha20 deck
//! - [`hand`] - Best-of-seven hand evaluation and comparison
//! - [`rules`] - Pure action legality (minimum raise, all-in capping)
//! - [`betting`] - Single-street betting state machine
//! - [`pot`] - Main pot / side pot layering and payout
//! - [`engine`] - Hand orchestration from blinds to payout
//! - [`game`] - Seats, button and blind assignment
//! - [`report`] - Table snapshots and showdown reports
//! - [`logger`] - Hand history records as JSON Lines
//! - [`session`] - Registry of independent tables
//! - [`config`] - Table configuration from TOML and environment
//! - [`logging`] - tracing subscriber setup
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use sixmax_engine::config::TableConfig;
//! use sixmax_engine::engine::{Engine, Stage};
//! use sixmax_engine::player::PlayerAction;
//!
//! let config = TableConfig { seed: Some(42), ..TableConfig::default() };
//! let mut engine = Engine::new(config).unwrap();
//! let state = engine.start_hand().unwrap();
//! assert_eq!(state.pot, 3);
//!
//! // everyone calls or checks until the hand is settled
//! while engine.stage() != Stage::Showdown {
//!     engine.submit_action(PlayerAction::Call).unwrap();
//! }
//! let report = engine.showdown_report().unwrap();
//! assert_eq!(report.board.len(), 5);
//! assert_eq!(engine.total_chips(), 6 * 200);
//! ```
//!
//! ## Hand Evaluation
//!
//! ```rust
//! use sixmax_engine::cards::parse_cards;
//! use sixmax_engine::hand::{evaluate_hand, Category};
//!
//! let cards = parse_cards("Ah Kh Qh Jh Th 2c 3d").unwrap();
//! let score = evaluate_hand(&cards).unwrap();
//! assert_eq!(score.category, Category::RoyalFlush);
//! ```

pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod logging;
pub mod player;
pub mod pot;
pub mod report;
pub mod rules;
pub mod session;
