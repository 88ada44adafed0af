//! Draw decks: ordered sequences of trade cards.
//!
//! Each epoch has one shared deck. The front of the deck is the next card
//! drawn; construction and reshuffles append to the back.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::hand::Hand;
use crate::cards::{CardId, CardType, Catalogue};
use crate::core::rng::GameRng;

/// Double-ended draw pile.
///
/// ```
/// use civ_ledger::cards::CardId;
/// use civ_ledger::zones::Deck;
///
/// let mut deck = Deck::from_ids([CardId::new(3), CardId::new(1)]);
/// assert_eq!(deck.pick(), Some(CardId::new(3)));
/// assert_eq!(deck.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vector<CardId>,
}

impl Deck {
    /// Create an empty deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a deck front to back.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            cards: ids.into_iter().collect(),
        }
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True if the deck is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Next card to be drawn.
    #[must_use]
    pub fn front(&self) -> Option<CardId> {
        self.cards.front().copied()
    }

    /// Card at a position (0 = front).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<CardId> {
        self.cards.get(index).copied()
    }

    /// Remove and return the front card.
    pub fn pick(&mut self) -> Option<CardId> {
        self.cards.pop_front()
    }

    /// Append to the back.
    pub fn push_back(&mut self, card: CardId) {
        self.cards.push_back(card);
    }

    /// Append many to the back, in order.
    pub fn extend(&mut self, cards: impl IntoIterator<Item = CardId>) {
        self.cards.extend(cards);
    }

    /// Insert at a position, clamped to the back.
    pub fn insert_at(&mut self, index: usize, card: CardId) {
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
    }

    /// Empty the deck.
    pub fn clear(&mut self) {
        self.cards = Vector::new();
    }

    /// Iterate front to back.
    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }

    /// Replace the contents, front to back.
    pub fn replace(&mut self, cards: impl IntoIterator<Item = CardId>) {
        self.cards = cards.into_iter().collect();
    }

    /// Shuffle a discard pile into the back of the deck.
    ///
    /// Everything except non-tradable calamities goes in first, shuffled;
    /// the non-tradable calamities follow, shuffled among themselves, so
    /// they always sit at the bottom.
    pub fn shuffle_in(&mut self, discard: &Hand, catalogue: &Catalogue, rng: &mut GameRng) {
        let (mut bottom, mut top): (Vec<CardId>, Vec<CardId>) = discard
            .ids()
            .partition(|&id| catalogue.card(id).card_type == CardType::NonTradable);

        rng.shuffle(&mut top);
        rng.shuffle(&mut bottom);

        self.extend(top);
        self.extend(bottom);
    }
}

impl FromIterator<CardId> for Deck {
    fn from_iter<I: IntoIterator<Item = CardId>>(iter: I) -> Self {
        Deck::from_ids(iter)
    }
}
