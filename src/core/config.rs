//! Game configuration.
//!
//! A game is configured once, at creation:
//! - `Ruleset`: which deck-construction algorithm seeds the decks
//! - `GameConfig`: ruleset plus table sizes and trade limits
//!
//! The ruleset name is also stored in the game's variables so a loaded game
//! knows how it was built.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};

/// Number of deck slots. Slot 0 is reserved, epochs are 1..EPOCH_CAPACITY.
pub const EPOCH_CAPACITY: usize = 10;

/// Default minimum number of cards each side of a trade must move.
pub const MIN_TRADE_CARDS: usize = 3;

/// Variable holding the ruleset name.
pub const VAR_RULESET: &str = "ruleset";
/// Variable holding the game's display name.
pub const VAR_NAME: &str = "name";
/// Variable holding the game's public URL.
pub const VAR_URL: &str = "url";
/// Variable holding the export directory.
pub const VAR_EXPORT: &str = "export";
/// Variable holding the minimum number of cards per side of a trade.
pub const VAR_TRADE_MINIMUM: &str = "trade_minimum";

/// Rule variant used to build the decks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ruleset {
    /// Shuffled commodities first, then tradable calamities, supplements,
    /// and non-tradable calamities.
    #[default]
    CivProject30,
    /// One pre-dealt commodity per power, then the shuffled rest.
    AdvCiv,
}

impl Ruleset {
    /// Canonical name as stored in the `ruleset` variable.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Ruleset::CivProject30 => "CivProject30",
            Ruleset::AdvCiv => "AdvCiv",
        }
    }

    /// Parse a ruleset name, ignoring case.
    pub fn parse(name: &str) -> EngineResult<Self> {
        [Ruleset::CivProject30, Ruleset::AdvCiv]
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| EngineError::GameCreationFailed(format!("unknown ruleset '{name}'")))
    }

    /// Whether card lists for this ruleset carry a supplement column.
    #[must_use]
    pub const fn has_supplement_column(self) -> bool {
        !matches!(self, Ruleset::AdvCiv)
    }
}

impl std::fmt::Display for Ruleset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete game configuration.
///
/// ```
/// use civ_ledger::core::{GameConfig, Ruleset};
///
/// let config = GameConfig::new(Ruleset::AdvCiv).with_min_trade_cards(2);
/// assert_eq!(config.epochs, 10);
/// assert_eq!(config.min_trade_cards, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Deck construction rules.
    pub ruleset: Ruleset,

    /// Number of deck and discard slots, including the reserved slot 0.
    pub epochs: usize,

    /// Minimum cards per side in a two-party trade.
    pub min_trade_cards: usize,
}

impl GameConfig {
    /// Create a configuration with default sizes.
    #[must_use]
    pub fn new(ruleset: Ruleset) -> Self {
        Self {
            ruleset,
            epochs: EPOCH_CAPACITY,
            min_trade_cards: MIN_TRADE_CARDS,
        }
    }

    /// Set the number of deck slots.
    #[must_use]
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        assert!(epochs >= 2, "Need at least one epoch besides slot 0");
        self.epochs = epochs;
        self
    }

    /// Set the trade minimum.
    #[must_use]
    pub fn with_min_trade_cards(mut self, min: usize) -> Self {
        self.min_trade_cards = min;
        self
    }

    /// Highest usable epoch number.
    #[must_use]
    pub fn last_epoch(&self) -> usize {
        self.epochs - 1
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Ruleset::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ruleset_parse() {
        assert_eq!(Ruleset::parse("AdvCiv").unwrap(), Ruleset::AdvCiv);
        assert_eq!(Ruleset::parse("advciv").unwrap(), Ruleset::AdvCiv);
        assert_eq!(Ruleset::parse("CIVPROJECT30").unwrap(), Ruleset::CivProject30);
        assert!(matches!(
            Ruleset::parse("Diplomacy"),
            Err(EngineError::GameCreationFailed(_))
        ));
    }

    #[test]
    fn test_supplement_column() {
        assert!(Ruleset::CivProject30.has_supplement_column());
        assert!(!Ruleset::AdvCiv.has_supplement_column());
    }

    #[test]
    fn test_config_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.ruleset, Ruleset::CivProject30);
        assert_eq!(config.epochs, EPOCH_CAPACITY);
        assert_eq!(config.last_epoch(), 9);
        assert_eq!(config.min_trade_cards, 3);
    }

    #[test]
    #[should_panic(expected = "Need at least one epoch")]
    fn test_config_too_few_epochs() {
        let _ = GameConfig::default().with_epochs(1);
    }
}
