//! Card movement between powers and into the discard piles.
//!
//! - `staging`: the stage/swap/merge exchange behind trades and gives
//! - `purchase`: technology purchases paid for with trade cards

pub mod purchase;
pub mod staging;

pub use purchase::{buy, quote, Purchase, Receipt};
pub use staging::{exchange, exchange_between, give, stage, swap_staging, trade, unstage};
