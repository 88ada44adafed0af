//! Powers, players, and seats.
//!
//! ## PowerId
//!
//! Index of a power in the game's seat list. Powers keep the order they
//! were created in.
//!
//! ## Power and Player
//!
//! A power is the unit of play: it holds a hand, a staging area used during
//! exchanges, and a technology portfolio. A player is the person behind a
//! power. Powers without a player are normal during setup.

use serde::{Deserialize, Serialize};

use crate::tech::TechPortfolio;
use crate::zones::Hand;

/// Power identifier (0-based seat index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PowerId(pub u16);

impl PowerId {
    /// Create a new power ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all power IDs for a game with `count` powers.
    ///
    /// ```
    /// use civ_ledger::core::PowerId;
    ///
    /// let powers: Vec<_> = PowerId::all(3).collect();
    /// assert_eq!(powers, vec![PowerId::new(0), PowerId::new(1), PowerId::new(2)]);
    /// ```
    pub fn all(count: usize) -> impl Iterator<Item = PowerId> {
        (0..count as u16).map(PowerId)
    }
}

impl std::fmt::Display for PowerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Power {}", self.0)
    }
}

/// A faction in play.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Power {
    /// Display name, unique ignoring case.
    pub name: String,

    /// Cards held.
    pub hand: Hand,

    /// Outgoing cards during an exchange. Empty between operations.
    #[serde(default)]
    pub staging: Hand,

    /// Owned technologies and bonus credits.
    #[serde(default)]
    pub portfolio: TechPortfolio,
}

impl Power {
    /// Create a power with an empty hand and portfolio.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Case-insensitive name match.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

/// The person playing a power.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub password: String,
    pub email: String,
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>, password: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            email: email.into(),
        }
    }
}

/// A power and the player bound to it, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub power: Power,
    #[serde(default)]
    pub player: Option<Player>,
}

impl Seat {
    /// Seat an unbound power.
    #[must_use]
    pub fn new(power: Power) -> Self {
        Self { power, player: None }
    }

    /// Display name of the player, or an empty string when unbound.
    #[must_use]
    pub fn player_name(&self) -> &str {
        self.player.as_ref().map_or("", |p| p.name.as_str())
    }
}
