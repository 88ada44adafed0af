//! Deck construction for a new game.
//!
//! Each ruleset has its own way of turning the catalogue into per-epoch draw
//! decks. Both consume every card of every epoch: commodities and minor
//! calamities in `max_copies` copies, the other calamities once each (or in
//! `max_copies` copies for supplement cards under `CivProject30`).
//!
//! Construction fails with `GameCreationFailed` if an epoch it builds ends up
//! with no cards. `CivProject30` builds the epochs from 1 to the highest one
//! in the catalogue. `AdvCiv` builds every epoch of the table, and also
//! fails if nothing is left in an epoch once each power has been dealt its
//! card.

use tracing::debug;

use crate::cards::{Card, CardId, CardType, Catalogue};
use crate::core::config::Ruleset;
use crate::core::error::{EngineError, EngineResult};
use crate::core::rng::GameRng;
use crate::zones::Deck;

/// Deck construction algorithm.
///
/// ## Implementation Notes
///
/// - `build` returns exactly `epochs` decks, slot 0 empty
/// - Shuffles go through `rng`; nothing else is random
/// - Must not panic on an unusable catalogue; return an error instead
pub trait DeckConstruction {
    /// Build one deck for one epoch.
    fn build_epoch(
        &self,
        epoch: usize,
        cards: &[(CardId, &Card)],
        powers: usize,
        rng: &mut GameRng,
    ) -> EngineResult<Deck>;

    /// Last epoch to build, given the highest epoch in the catalogue and the
    /// number of deck slots.
    fn last_epoch(&self, highest: usize, _epochs: usize) -> usize {
        highest
    }

    /// Build every deck.
    fn build(
        &self,
        catalogue: &Catalogue,
        powers: usize,
        epochs: usize,
        rng: &mut GameRng,
    ) -> EngineResult<Vec<Deck>> {
        let highest = catalogue.cards().map(|(_, c)| c.deck).max().unwrap_or(0);
        if highest == 0 {
            return Err(EngineError::GameCreationFailed("catalogue has no cards".into()));
        }
        if highest >= epochs {
            return Err(EngineError::GameCreationFailed(format!(
                "deck {highest} exceeds the {} available",
                epochs - 1
            )));
        }

        let mut decks = vec![Deck::new(); epochs];
        let last = self.last_epoch(highest, epochs).min(epochs - 1);
        for (epoch, deck) in decks.iter_mut().enumerate().take(last + 1).skip(1) {
            let cards: Vec<_> = catalogue.cards().filter(|(_, c)| c.deck == epoch).collect();
            *deck = self.build_epoch(epoch, &cards, powers, rng)?;
            if deck.is_empty() {
                return Err(EngineError::GameCreationFailed(format!("deck {epoch} is empty")));
            }
            debug!(epoch, cards = deck.len(), "Built deck");
        }
        Ok(decks)
    }
}

/// Algorithm for a ruleset.
#[must_use]
pub fn construction_for(ruleset: Ruleset) -> Box<dyn DeckConstruction> {
    match ruleset {
        Ruleset::CivProject30 => Box::new(SimpleDecks),
        Ruleset::AdvCiv => Box::new(AdvancedDecks),
    }
}

fn copies(id: CardId, n: u32) -> impl Iterator<Item = CardId> {
    std::iter::repeat(id).take(n as usize)
}

/// `CivProject30` construction.
///
/// Deck order, front to back: shuffled commodities and minor calamities,
/// tradable calamities in catalogue order, supplement cards, non-tradable
/// calamities.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleDecks;

impl DeckConstruction for SimpleDecks {
    fn build_epoch(
        &self,
        _epoch: usize,
        cards: &[(CardId, &Card)],
        _powers: usize,
        rng: &mut GameRng,
    ) -> EngineResult<Deck> {
        let mut holding = Vec::new();
        let mut tradable = Vec::new();
        let mut supplement = Vec::new();
        let mut non_tradable = Vec::new();

        for &(id, card) in cards {
            if card.supplement {
                supplement.extend(copies(id, card.max_copies));
                continue;
            }
            match card.card_type {
                CardType::Normal | CardType::Minor => holding.extend(copies(id, card.max_copies)),
                CardType::Tradable => tradable.push(id),
                CardType::NonTradable => non_tradable.push(id),
            }
        }

        rng.shuffle(&mut holding);

        let mut deck = Deck::from_ids(holding);
        deck.extend(tradable);
        deck.extend(supplement);
        deck.extend(non_tradable);
        Ok(deck)
    }
}

/// `AdvCiv` construction.
///
/// One commodity per power is dealt off the shuffled pile first, so each
/// power's first draw is a commodity. The rest of the commodities are
/// shuffled together with the tradable calamities; non-tradable calamities
/// go last in catalogue order. Supplement flags are ignored.
///
/// Every epoch of the table is built, and each must still hold at least one
/// card after the deal.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdvancedDecks;

impl DeckConstruction for AdvancedDecks {
    fn last_epoch(&self, _highest: usize, epochs: usize) -> usize {
        epochs - 1
    }

    fn build_epoch(
        &self,
        epoch: usize,
        cards: &[(CardId, &Card)],
        powers: usize,
        rng: &mut GameRng,
    ) -> EngineResult<Deck> {
        let mut holding = Vec::new();
        let mut tradable = Vec::new();
        let mut non_tradable = Vec::new();

        for &(id, card) in cards {
            match card.card_type {
                CardType::Normal | CardType::Minor => holding.extend(copies(id, card.max_copies)),
                CardType::Tradable => tradable.push(id),
                CardType::NonTradable => non_tradable.push(id),
            }
        }

        rng.shuffle(&mut holding);

        let mut deck = Deck::new();
        for _ in 0..powers {
            match holding.pop() {
                Some(card) => deck.push_back(card),
                None => break,
            }
        }

        holding.extend(tradable);
        rng.shuffle(&mut holding);
        holding.extend(non_tradable);
        if holding.is_empty() {
            return Err(EngineError::GameCreationFailed(format!(
                "deck {epoch} has no cards left after dealing {powers}"
            )));
        }

        deck.extend(holding);
        Ok(deck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::Hand;

    fn catalogue() -> Catalogue {
        Catalogue::from_parts(
            vec![
                Card::new("Ochre", 1, 3, CardType::Normal),
                Card::new("Hides", 1, 2, CardType::Normal),
                Card::new("Volcano", 1, 1, CardType::NonTradable),
                Card::new("Piracy", 1, 1, CardType::Tradable),
                Card::new("Unrest", 1, 2, CardType::Minor),
                Card::new("Bone Beads", 1, 2, CardType::Normal).with_supplement(true),
                Card::new("Salt", 2, 4, CardType::Normal),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    fn id(c: &Catalogue, name: &str) -> CardId {
        c.find_card(name).unwrap()
    }

    #[test]
    fn test_simple_order_and_counts() {
        let c = catalogue();
        let mut rng = GameRng::new(3);

        let decks = SimpleDecks.build(&c, 2, 10, &mut rng).unwrap();
        assert_eq!(decks.len(), 10);
        assert!(decks[0].is_empty());

        let deck = &decks[1];
        // 3 + 2 + 2 shuffled, then Piracy, Bone Beads x2, Volcano.
        assert_eq!(deck.len(), 11);
        let head: Hand = (0..7).filter_map(|i| deck.get(i)).collect();
        let ochre = id(&c, "Ochre");
        let hides = id(&c, "Hides");
        let unrest = id(&c, "Unrest");
        assert_eq!(head, Hand::from_ids([ochre, ochre, ochre, hides, hides, unrest, unrest]));
        assert_eq!(deck.get(7), Some(id(&c, "Piracy")));
        assert_eq!(deck.get(8), Some(id(&c, "Bone Beads")));
        assert_eq!(deck.get(9), Some(id(&c, "Bone Beads")));
        assert_eq!(deck.get(10), Some(id(&c, "Volcano")));

        assert_eq!(decks[2].len(), 4);
        assert!(decks[3].is_empty());
    }

    #[test]
    fn test_advanced_deals_commodities_first() {
        let c = catalogue();
        let mut rng = GameRng::new(5);

        let decks = AdvancedDecks.build(&c, 3, 3, &mut rng).unwrap();
        let deck = &decks[1];

        // Supplement flag ignored: Bone Beads counts as a commodity.
        assert_eq!(deck.len(), 3 + 2 + 2 + 2 + 1 + 1);
        for i in 0..3 {
            let card = c.card(deck.get(i).unwrap());
            assert!(matches!(card.card_type, CardType::Normal | CardType::Minor));
        }
        assert_eq!(deck.get(deck.len() - 1), Some(id(&c, "Volcano")));
        assert_eq!(decks[2].len(), 4);
    }

    #[test]
    fn test_advanced_with_more_powers_than_commodities() {
        let c = Catalogue::from_parts(
            vec![
                Card::new("Ochre", 1, 1, CardType::Normal),
                Card::new("Flood", 1, 1, CardType::NonTradable),
            ],
            Vec::new(),
        )
        .unwrap();
        let mut rng = GameRng::new(5);

        let decks = AdvancedDecks.build(&c, 6, 2, &mut rng).unwrap();
        assert_eq!(decks[1].len(), 2);
    }

    #[test]
    fn test_advanced_fails_when_deal_empties_epoch() {
        let c = Catalogue::from_parts(vec![Card::new("Ochre", 1, 2, CardType::Normal)], Vec::new()).unwrap();
        let mut rng = GameRng::new(2);

        let err = AdvancedDecks.build(&c, 2, 2, &mut rng).unwrap_err();
        assert_eq!(
            err,
            EngineError::GameCreationFailed("deck 1 has no cards left after dealing 2".into())
        );
        assert!(AdvancedDecks.build(&c, 1, 2, &mut rng).is_ok());
    }

    #[test]
    fn test_advanced_builds_every_epoch() {
        let c = Catalogue::from_parts(vec![Card::new("Ochre", 1, 4, CardType::Normal)], Vec::new()).unwrap();
        let mut rng = GameRng::new(2);

        let err = AdvancedDecks.build(&c, 2, 10, &mut rng).unwrap_err();
        assert_eq!(
            err,
            EngineError::GameCreationFailed("deck 2 has no cards left after dealing 2".into())
        );
        assert!(SimpleDecks.build(&c, 2, 10, &mut rng).is_ok());
    }

    #[test]
    fn test_empty_epoch_fails() {
        let c = Catalogue::from_parts(
            vec![
                Card::new("Ochre", 1, 2, CardType::Normal),
                Card::new("Salt", 3, 2, CardType::Normal),
            ],
            Vec::new(),
        )
        .unwrap();
        let mut rng = GameRng::new(1);

        let err = SimpleDecks.build(&c, 2, 10, &mut rng).unwrap_err();
        assert_eq!(err, EngineError::GameCreationFailed("deck 2 is empty".into()));
    }

    #[test]
    fn test_zero_copy_epoch_fails() {
        let c = Catalogue::from_parts(vec![Card::new("Ochre", 1, 0, CardType::Normal)], Vec::new()).unwrap();
        let mut rng = GameRng::new(1);

        assert!(AdvancedDecks.build(&c, 2, 10, &mut rng).is_err());
        assert!(SimpleDecks.build(&Catalogue::new(), 2, 10, &mut rng).is_err());
    }

    #[test]
    fn test_construction_for_ruleset() {
        let c = catalogue();
        let mut rng = GameRng::new(9);

        let simple = construction_for(Ruleset::CivProject30).build(&c, 3, 3, &mut rng).unwrap();
        let advanced = construction_for(Ruleset::AdvCiv).build(&c, 3, 3, &mut rng).unwrap();

        let count = |decks: &[Deck]| decks.iter().map(Deck::len).sum::<usize>();
        assert_eq!(count(&simple), count(&advanced));
    }
}
