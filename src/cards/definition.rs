//! Trade card definitions.
//!
//! A `Card` is the immutable description of one kind of trade card:
//! a commodity ("Salt", "Gold") or a calamity ("Flood"). Physical copies
//! are not objects of their own; hands and decks hold `CardId`s into the
//! catalogue, and multiple entries of the same id are multiple copies.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::error::EngineError;

/// Index of a card in the catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Catalogue slot.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Kind of trade card.
///
/// Raw codes match the card-list import format, where a negative first
/// column marks a calamity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum CardType {
    /// Commodity card.
    #[default]
    Normal,
    /// Calamity that may be passed on in trades.
    Tradable,
    /// Calamity that stays with whoever draws it.
    NonTradable,
    /// Minor calamity.
    Minor,
}

impl CardType {
    /// Raw code used by imports and saves.
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            CardType::Normal => 0,
            CardType::Tradable => -1,
            CardType::NonTradable => -2,
            CardType::Minor => -3,
        }
    }

    /// Decode a raw code.
    #[must_use]
    pub const fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(CardType::Normal),
            -1 => Some(CardType::Tradable),
            -2 => Some(CardType::NonTradable),
            -3 => Some(CardType::Minor),
            _ => None,
        }
    }

    /// Any non-commodity card.
    #[must_use]
    pub const fn is_calamity(self) -> bool {
        !matches!(self, CardType::Normal)
    }
}

impl From<CardType> for i8 {
    fn from(t: CardType) -> Self {
        t.code()
    }
}

impl TryFrom<i8> for CardType {
    type Error = EngineError;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        CardType::from_code(code)
            .ok_or_else(|| EngineError::UnableToParse(format!("card type code {code}")))
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Static trade card description.
///
/// ## Example
///
/// ```
/// use civ_ledger::cards::{Card, CardType};
///
/// let flood = Card::new("Flood", 3, 1, CardType::NonTradable);
/// assert_eq!(flood.image, "3NT.png");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique (ignoring case) card name.
    pub name: String,

    /// Epoch / deck number this card is dealt from.
    pub deck: usize,

    /// Copies of a commodity put into play.
    pub max_copies: u32,

    /// Card kind.
    pub card_type: CardType,

    /// Supplement card, dealt after the base cards.
    #[serde(default)]
    pub supplement: bool,

    /// Image asset name.
    pub image: String,
}

impl Card {
    /// Create a card, deriving its image name.
    #[must_use]
    pub fn new(name: impl Into<String>, deck: usize, max_copies: u32, card_type: CardType) -> Self {
        let name = name.into();
        let image = Self::image_for(&name, deck, card_type);
        Self {
            name,
            deck,
            max_copies,
            card_type,
            supplement: false,
            image,
        }
    }

    /// Mark as a supplement card (builder pattern).
    #[must_use]
    pub fn with_supplement(mut self, supplement: bool) -> Self {
        self.supplement = supplement;
        self
    }

    /// Image asset name for a card.
    #[must_use]
    pub fn image_for(name: &str, deck: usize, card_type: CardType) -> String {
        match card_type {
            CardType::Normal => format!("{name}.png"),
            CardType::Tradable => format!("{deck}T.png"),
            CardType::NonTradable => format!("{deck}NT.png"),
            CardType::Minor => format!("{deck}M.png"),
        }
    }

    /// Case-insensitive name match.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Placement order within containers: minor calamities first, then by
    /// deck, type, copy count, and name.
    #[must_use]
    pub fn placement_cmp(&self, other: &Card) -> Ordering {
        let minor_last = |c: &Card| c.card_type != CardType::Minor;
        minor_last(self)
            .cmp(&minor_last(other))
            .then(self.deck.cmp(&other.deck))
            .then(self.card_type.cmp(&other.card_type))
            .then(self.max_copies.cmp(&other.max_copies))
            .then_with(|| self.name.cmp(&other.name))
    }
}
