//! On-disk document in the current schema.
//!
//! A saved game is one JSON object:
//!
//! ```text
//! {
//!   "versions":     { "game": 2, "card": 2, "power": 2, "player": 0, "technology": 1 },
//!   "variables":    { "name": "...", "ruleset": "CivProject30", ... },
//!   "cards":        [ { "name", "deck", "max_copies", "card_type", "supplement", "image" } ],
//!   "technologies": [ { "name", "abbreviation", "image", "cost", "groups", ... } ],
//!   "seats":        [ { "power": { "name", "hand", "staging", "portfolio" }, "player": null } ],
//!   "decks":        [ [card index, ...], ... ],
//!   "discards":     [ [card index, ...], ... ]
//! }
//! ```
//!
//! Containers store catalogue indices. The abandoned flag and the random
//! source are never stored. The ruleset and the trade minimum live in the
//! variables; a missing trade minimum loads as the default.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, Catalogue, TechCard};
use crate::core::config::{GameConfig, Ruleset, EPOCH_CAPACITY, MIN_TRADE_CARDS, VAR_RULESET, VAR_TRADE_MINIMUM};
use crate::core::error::PersistError;
use crate::core::player::Seat;
use crate::core::state::Game;
use crate::core::variables::Variables;
use crate::zones::{Deck, Hand};

/// Schema version of each stored entity kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versions {
    #[serde(default)]
    pub game: u32,
    #[serde(default)]
    pub card: u32,
    #[serde(default)]
    pub power: u32,
    #[serde(default)]
    pub player: u32,
    #[serde(default)]
    pub technology: u32,
}

impl Versions {
    /// Versions this build writes.
    pub const CURRENT: Versions = Versions {
        game: 2,
        card: 2,
        power: 2,
        player: 0,
        technology: 1,
    };
}

/// A whole game in the current schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub versions: Versions,
    pub variables: Variables,
    pub cards: Vec<Card>,
    #[serde(default)]
    pub technologies: Vec<TechCard>,
    pub seats: Vec<Seat>,
    pub decks: Vec<Deck>,
    pub discards: Vec<Hand>,
}

impl Document {
    /// Capture a game.
    #[must_use]
    pub fn from_game(game: &Game) -> Self {
        Self {
            versions: Versions::CURRENT,
            variables: game.vars.clone(),
            cards: game.catalogue().card_slice().to_vec(),
            technologies: game.catalogue().technology_slice().to_vec(),
            seats: game.seats().to_vec(),
            decks: game.decks().to_vec(),
            discards: game.discards().to_vec(),
        }
    }

    /// Rebuild a game, checking that every stored index is in range.
    pub fn into_game(self) -> Result<Game, PersistError> {
        let catalogue = Catalogue::from_parts(self.cards, self.technologies)
            .map_err(|e| PersistError::Corrupt(e.to_string()))?;

        let ruleset = match self.variables.get(VAR_RULESET) {
            Some(name) => Ruleset::parse(name).map_err(|e| PersistError::Corrupt(e.to_string()))?,
            None => Ruleset::default(),
        };
        let min_trade_cards = match self.variables.get(VAR_TRADE_MINIMUM) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| PersistError::Corrupt(format!("trade minimum '{value}'")))?,
            None => MIN_TRADE_CARDS,
        };
        let epochs = EPOCH_CAPACITY.max(self.decks.len()).max(self.discards.len());
        let config = GameConfig::new(ruleset)
            .with_epochs(epochs)
            .with_min_trade_cards(min_trade_cards);

        check_catalogue(&catalogue, epochs)?;
        let hands = self
            .seats
            .iter()
            .flat_map(|s| [&s.power.hand, &s.power.staging])
            .chain(self.discards.iter());
        for hand in hands {
            check_cards(&catalogue, hand.iter().map(|(id, _)| id))?;
        }
        for deck in &self.decks {
            check_cards(&catalogue, deck.iter())?;
        }
        for seat in &self.seats {
            for tech in seat.power.portfolio.owned() {
                if catalogue.get_technology(tech).is_none() {
                    return Err(PersistError::Corrupt(format!("{} owns unknown {tech}", seat.power.name)));
                }
            }
        }

        Ok(Game::from_parts(
            config,
            catalogue,
            self.seats,
            self.decks,
            self.discards,
            self.variables,
        ))
    }
}

fn check_catalogue(catalogue: &Catalogue, epochs: usize) -> Result<(), PersistError> {
    for (_, card) in catalogue.cards() {
        if card.deck >= epochs {
            return Err(PersistError::Corrupt(format!("card '{}' in deck {}", card.name, card.deck)));
        }
    }
    for (_, tech) in catalogue.technologies() {
        for credit in &tech.card_credits {
            if catalogue.get_technology(credit.target).is_none() {
                return Err(PersistError::Corrupt(format!(
                    "'{}' credits unknown {}",
                    tech.name, credit.target
                )));
            }
        }
    }
    Ok(())
}

fn check_cards(catalogue: &Catalogue, ids: impl Iterator<Item = CardId>) -> Result<(), PersistError> {
    for id in ids {
        if catalogue.get_card(id).is_none() {
            return Err(PersistError::Corrupt(format!("unknown {id}")));
        }
    }
    Ok(())
}
