//! Card system: trade cards, technologies, and the catalogue.
//!
//! ## Key Types
//!
//! - `CardId` / `Card`: trade cards (commodities and calamities)
//! - `TechId` / `TechCard`: purchasable technologies with group credits
//! - `Catalogue`: append-only registry with case-insensitive lookup
//!
//! The `import` module reads the line-oriented card, technology, and power
//! lists a new game is created from.

pub mod definition;
pub mod import;
pub mod registry;
pub mod technology;

pub use definition::{Card, CardId, CardType};
pub use registry::Catalogue;
pub use technology::{
    group_from_string, CardCredit, Group, GroupCredits, GroupSet, TechCard, TechId, GROUP_COUNT,
};
