//! # civ-ledger
//!
//! Game-state engine for a multi-player civilization card-trading game.
//!
//! ## Design Principles
//!
//! 1. **Conservation**: no operation creates or destroys a card copy. Every
//!    copy sits in exactly one deck, discard pile, hand, or staging area.
//!
//! 2. **Check, then move**: every operation validates all of its inputs
//!    before touching any container. A failed operation has no effect.
//!
//! 3. **Arena identities**: cards and technologies live once in the
//!    `Catalogue`; containers hold `CardId`/`TechId` indices.
//!
//! ## Architecture
//!
//! - **Staged exchanges**: trades and gives run stage, swap, merge, so a
//!   transfer either completes or never starts.
//!
//! - **Persistent containers**: hands and decks are backed by `im`
//!   collections, so snapshots of a game are cheap.
//!
//! - **Versioned saves**: each stored entity kind carries a schema version
//!   and is upgraded one step at a time on load.
//!
//! ## Modules
//!
//! - `core`: errors, configuration, RNG, powers, the `Game` aggregate
//! - `cards`: card and technology definitions, catalogue, list import
//! - `zones`: `Hand` and `Deck` containers
//! - `tech`: technology portfolios and the cost engine
//! - `rules`: ruleset-specific deck construction
//! - `trade`: staged exchanges and technology purchases
//! - `commands`: the command surface used by shells
//! - `persist`: saved-game documents, migrations, sessions

pub mod cards;
pub mod commands;
pub mod core;
pub mod persist;
pub mod rules;
pub mod tech;
pub mod trade;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    EngineError, EngineResult, ErrorCode, Game, GameConfig, GameRng, PersistError, Player, Power, PowerId,
    Ruleset, Seat, Variables,
};

pub use crate::cards::{Card, CardId, CardType, Catalogue, Group, TechCard, TechId};

pub use crate::commands::Outcome;
pub use crate::persist::Session;
pub use crate::tech::TechPortfolio;
pub use crate::zones::{Deck, Hand};
