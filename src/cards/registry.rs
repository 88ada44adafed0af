//! Card catalogue for definition lookup.
//!
//! The `Catalogue` stores every trade card and technology of a game.
//! It is append-only: cards are added while a game is created (or by the
//! disaster-recovery `shuffle_in`) and never change or disappear afterwards,
//! so a `CardId` handed out once stays valid for the life of the game.

use rustc_hash::FxHashMap;

use super::definition::{Card, CardId};
use super::technology::{TechCard, TechId};
use crate::core::error::{EngineError, EngineResult};

/// Registry of trade cards and technologies.
///
/// ## Example
///
/// ```
/// use civ_ledger::cards::{Card, CardType, Catalogue};
///
/// let mut catalogue = Catalogue::new();
/// let salt = catalogue.add_card(Card::new("Salt", 3, 9, CardType::Normal)).unwrap();
///
/// assert_eq!(catalogue.find_card("SALT"), Some(salt));
/// assert_eq!(catalogue.card(salt).name, "Salt");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Catalogue {
    cards: Vec<Card>,
    technologies: Vec<TechCard>,
    card_index: FxHashMap<String, CardId>,
    tech_index: FxHashMap<String, TechId>,
}

fn fold(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

impl Catalogue {
    /// Create an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a catalogue from stored definitions, in id order.
    pub fn from_parts(cards: Vec<Card>, technologies: Vec<TechCard>) -> EngineResult<Self> {
        let mut catalogue = Self::new();
        for card in cards {
            catalogue.add_card(card)?;
        }
        for tech in technologies {
            catalogue.add_technology(tech)?;
        }
        Ok(catalogue)
    }

    /// Append a trade card.
    ///
    /// Fails if a card with the same name (ignoring case) exists.
    pub fn add_card(&mut self, card: Card) -> EngineResult<CardId> {
        let key = fold(&card.name);
        if self.card_index.contains_key(&key) {
            return Err(EngineError::DuplicateCard(card.name));
        }
        let id = CardId::new(self.cards.len() as u32);
        self.card_index.insert(key, id);
        self.cards.push(card);
        Ok(id)
    }

    /// Append a technology.
    ///
    /// Fails if a technology with the same name (ignoring case) exists.
    pub fn add_technology(&mut self, tech: TechCard) -> EngineResult<TechId> {
        let key = fold(&tech.name);
        if self.tech_index.contains_key(&key) {
            return Err(EngineError::DuplicateCard(tech.name));
        }
        let id = TechId::new(self.technologies.len() as u32);
        self.tech_index.insert(key, id);
        self.technologies.push(tech);
        Ok(id)
    }

    /// Look up a trade card by name, ignoring case.
    #[must_use]
    pub fn find_card(&self, name: &str) -> Option<CardId> {
        self.card_index.get(&fold(name)).copied()
    }

    /// Look up a technology by name, ignoring case.
    #[must_use]
    pub fn find_technology(&self, name: &str) -> Option<TechId> {
        self.tech_index.get(&fold(name)).copied()
    }

    /// Look up a trade card, failing with `CardNotFound`.
    pub fn require_card(&self, name: &str) -> EngineResult<CardId> {
        self.find_card(name)
            .ok_or_else(|| EngineError::CardNotFound(name.to_string()))
    }

    /// Look up a technology, failing with `TechnologyNotFound`.
    pub fn require_technology(&self, name: &str) -> EngineResult<TechId> {
        self.find_technology(name)
            .ok_or_else(|| EngineError::TechnologyNotFound(name.to_string()))
    }

    /// Get a card definition.
    ///
    /// Ids are only minted by this catalogue, so an unknown id is a bug.
    #[must_use]
    pub fn card(&self, id: CardId) -> &Card {
        &self.cards[id.index()]
    }

    /// Get a card definition if the id is in range.
    #[must_use]
    pub fn get_card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    /// Get a technology definition.
    #[must_use]
    pub fn technology(&self, id: TechId) -> &TechCard {
        &self.technologies[id.index()]
    }

    /// Get a technology definition if the id is in range.
    #[must_use]
    pub fn get_technology(&self, id: TechId) -> Option<&TechCard> {
        self.technologies.get(id.index())
    }

    /// Number of trade cards.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Number of technologies.
    #[must_use]
    pub fn technology_count(&self) -> usize {
        self.technologies.len()
    }

    /// Iterate trade cards in id order.
    pub fn cards(&self) -> impl Iterator<Item = (CardId, &Card)> {
        self.cards
            .iter()
            .enumerate()
            .map(|(i, c)| (CardId::new(i as u32), c))
    }

    /// Iterate technologies in id order.
    pub fn technologies(&self) -> impl Iterator<Item = (TechId, &TechCard)> {
        self.technologies
            .iter()
            .enumerate()
            .map(|(i, t)| (TechId::new(i as u32), t))
    }

    /// Trade cards of one epoch, in placement order.
    #[must_use]
    pub fn cards_in_epoch(&self, epoch: usize) -> Vec<CardId> {
        let mut ids: Vec<_> = self
            .cards()
            .filter(|(_, c)| c.deck == epoch)
            .map(|(id, _)| id)
            .collect();
        self.sort_cards(&mut ids);
        ids
    }

    /// Sort ids by card placement order.
    pub fn sort_cards(&self, ids: &mut [CardId]) {
        ids.sort_by(|a, b| self.card(*a).placement_cmp(self.card(*b)));
    }

    /// Sort technology ids by name.
    pub fn sort_technologies(&self, ids: &mut [TechId]) {
        ids.sort_by(|a, b| self.technology(*a).name.cmp(&self.technology(*b).name));
    }

    /// All card definitions in id order.
    #[must_use]
    pub fn card_slice(&self) -> &[Card] {
        &self.cards
    }

    /// All technology definitions in id order.
    #[must_use]
    pub fn technology_slice(&self) -> &[TechCard] {
        &self.technologies
    }
}
