//! Hands: unordered multisets of trade cards.
//!
//! A hand maps each card to the number of copies held. Held hands, staging
//! areas, discard piles, and the argument lists of trades and discards are
//! all hands.
//!
//! ## Containment
//!
//! Hand `a` is contained in hand `b` when, for every card, `a` holds no more
//! copies than `b`. Every removal checks containment first and removes
//! nothing on failure.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, Catalogue};
use crate::core::error::EngineError;

/// The first card a removal could not satisfy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shortfall {
    /// Card that is short.
    pub card: CardId,
    /// Copies requested.
    pub wanted: u32,
    /// Copies held.
    pub held: u32,
}

impl Shortfall {
    /// Name the shortfall using the catalogue.
    ///
    /// A card not held at all is `CardNotFound`, a card held in too few
    /// copies is `InsufficientCopies`.
    #[must_use]
    pub fn into_error(self, catalogue: &Catalogue) -> EngineError {
        let name = catalogue
            .get_card(self.card)
            .map_or_else(|| self.card.to_string(), |c| c.name.clone());
        if self.held == 0 {
            EngineError::CardNotFound(name)
        } else {
            EngineError::InsufficientCopies {
                card: name,
                wanted: self.wanted,
                held: self.held,
            }
        }
    }
}

/// Multiset of cards.
///
/// ```
/// use civ_ledger::cards::CardId;
/// use civ_ledger::zones::Hand;
///
/// let salt = CardId::new(0);
/// let mut hand = Hand::from_ids([salt, salt]);
/// let one = Hand::from_ids([salt]);
///
/// assert!(hand.has(&one));
/// hand.remove(&one).unwrap();
/// assert_eq!(hand.count(salt), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CardId>", into = "Vec<CardId>")]
pub struct Hand {
    counts: OrdMap<CardId, u32>,
}

impl Hand {
    /// Create an empty hand.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hand from card ids, one copy per occurrence.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = CardId>) -> Self {
        let mut hand = Self::new();
        for id in ids {
            hand.insert(id);
        }
        hand
    }

    /// Add one copy of a card.
    pub fn insert(&mut self, card: CardId) {
        self.insert_n(card, 1);
    }

    /// Add `n` copies of a card.
    pub fn insert_n(&mut self, card: CardId, n: u32) {
        if n == 0 {
            return;
        }
        *self.counts.entry(card).or_insert(0) += n;
    }

    /// Copies of a card held.
    #[must_use]
    pub fn count(&self, card: CardId) -> u32 {
        self.counts.get(&card).copied().unwrap_or(0)
    }

    /// Total copies held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.values().map(|&n| n as usize).sum()
    }

    /// Number of distinct cards held.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// True if no cards are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate `(card, copies)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (CardId, u32)> + '_ {
        self.counts.iter().map(|(&id, &n)| (id, n))
    }

    /// Iterate every copy, in id order.
    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.iter()
            .flat_map(|(id, n)| std::iter::repeat(id).take(n as usize))
    }

    /// First card `subset` wants more copies of than this hand holds.
    #[must_use]
    pub fn shortfall(&self, subset: &Hand) -> Option<Shortfall> {
        subset.iter().find_map(|(card, wanted)| {
            let held = self.count(card);
            (wanted > held).then_some(Shortfall { card, wanted, held })
        })
    }

    /// Containment check: every card of `subset` is held in at least as
    /// many copies.
    #[must_use]
    pub fn has(&self, subset: &Hand) -> bool {
        self.shortfall(subset).is_none()
    }

    /// Remove exactly `subset`'s copies.
    ///
    /// Nothing is removed unless the whole subset is held.
    pub fn remove(&mut self, subset: &Hand) -> Result<(), Shortfall> {
        if let Some(short) = self.shortfall(subset) {
            return Err(short);
        }
        for (card, n) in subset.iter() {
            let held = self.count(card);
            if held == n {
                self.counts.remove(&card);
            } else {
                self.counts.insert(card, held - n);
            }
        }
        Ok(())
    }

    /// Remove every copy of one card, returning how many were held.
    pub fn remove_all(&mut self, card: CardId) -> u32 {
        self.counts.remove(&card).unwrap_or(0)
    }

    /// Add every copy of `other`.
    pub fn merge(&mut self, other: &Hand) {
        for (card, n) in other.iter() {
            self.insert_n(card, n);
        }
    }

    /// Empty the hand.
    pub fn clear(&mut self) {
        self.counts = OrdMap::new();
    }

    /// Empty the hand, returning its old contents.
    pub fn take(&mut self) -> Hand {
        std::mem::take(self)
    }

    /// Cards with a predicate on the definition, all copies.
    #[must_use]
    pub fn filter(&self, catalogue: &Catalogue, mut keep: impl FnMut(&Card) -> bool) -> Hand {
        let mut out = Hand::new();
        for (card, n) in self.iter() {
            if keep(catalogue.card(card)) {
                out.insert_n(card, n);
            }
        }
        out
    }

    /// Calamities held, all copies.
    #[must_use]
    pub fn calamities(&self, catalogue: &Catalogue) -> Hand {
        self.filter(catalogue, |c| c.card_type.is_calamity())
    }

    /// Trade value: for each commodity, copies squared times its deck.
    /// Calamities are worth nothing.
    #[must_use]
    pub fn value(&self, catalogue: &Catalogue) -> i64 {
        self.iter()
            .map(|(card, n)| {
                let def = catalogue.card(card);
                if def.card_type.is_calamity() {
                    0
                } else {
                    i64::from(n) * i64::from(n) * def.deck as i64
                }
            })
            .sum()
    }

    /// `(card, copies)` in card placement order.
    #[must_use]
    pub fn sorted(&self, catalogue: &Catalogue) -> Vec<(CardId, u32)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| catalogue.card(a.0).placement_cmp(catalogue.card(b.0)));
        entries
    }
}

impl From<Vec<CardId>> for Hand {
    fn from(ids: Vec<CardId>) -> Self {
        Hand::from_ids(ids)
    }
}

impl From<Hand> for Vec<CardId> {
    fn from(hand: Hand) -> Self {
        hand.ids().collect()
    }
}

impl FromIterator<CardId> for Hand {
    fn from_iter<I: IntoIterator<Item = CardId>>(iter: I) -> Self {
        Hand::from_ids(iter)
    }
}
