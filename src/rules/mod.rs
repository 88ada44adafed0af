//! Ruleset-specific game setup.
//!
//! Each ruleset implements `DeckConstruction` to turn the catalogue into
//! per-epoch draw decks. Game creation looks the algorithm up by ruleset and
//! never interprets ruleset names itself.

pub mod construction;

pub use construction::{construction_for, AdvancedDecks, DeckConstruction, SimpleDecks};
