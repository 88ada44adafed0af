//! Core engine types: errors, configuration, RNG, powers, and the game
//! aggregate.
//!
//! Everything here is ruleset-agnostic. Rulesets change how decks are built
//! (see `rules`) but never the shape of the game state.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;
pub mod variables;

pub use config::{GameConfig, Ruleset, EPOCH_CAPACITY, MIN_TRADE_CARDS};
pub use error::{EngineError, EngineResult, ErrorCode, PersistError};
pub use player::{Player, Power, PowerId, Seat};
pub use rng::GameRng;
pub use state::Game;
pub use variables::Variables;
