//! Card containers.
//!
//! Cards live in exactly one container at a time:
//! - `Hand`: unordered multiset (held hands, staging areas, discard piles)
//! - `Deck`: ordered draw pile, one per epoch
//!
//! Containers hold `CardId`s into the game's catalogue, never definitions.

pub mod deck;
pub mod hand;

pub use deck::Deck;
pub use hand::{Hand, Shortfall};
