//! The game aggregate.
//!
//! `Game` owns everything a session edits: the catalogue, the seats, one
//! draw deck and one discard pile per epoch, the variable map, and the
//! random source.
//!
//! ## Conservation
//!
//! Card copies live in exactly one container at a time: a deck, a discard
//! pile, a held hand, or a staging area. Operations move copies between
//! containers and never create or destroy them, apart from game creation
//! and the disaster-recovery `shuffle_in`. [`Game::census`] counts every
//! copy across all containers.
//!
//! ## Abandoning
//!
//! A game marked abandoned is never written back to disk. The flag lives
//! only in memory.

use tracing::info;

use super::config::{GameConfig, VAR_EXPORT, VAR_NAME, VAR_RULESET, VAR_TRADE_MINIMUM, VAR_URL};
use super::error::{EngineError, EngineResult};
use super::player::{Player, Power, PowerId, Seat};
use super::rng::GameRng;
use super::variables::Variables;
use crate::cards::{Card, CardId, Catalogue, TechId};
use crate::rules::construction_for;
use crate::zones::{Deck, Hand};

/// Complete game state.
#[derive(Clone, Debug)]
pub struct Game {
    catalogue: Catalogue,
    seats: Vec<Seat>,
    decks: Vec<Deck>,
    discards: Vec<Hand>,

    /// Case-insensitive string variables (name, url, ruleset, export).
    pub vars: Variables,

    /// Random source for shuffles and random picks.
    pub rng: GameRng,

    config: GameConfig,
    abandoned: bool,
}

impl Game {
    /// Create an empty game: no cards, no powers, empty decks.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, GameRng::from_entropy())
    }

    /// Create an empty game with a given random source.
    #[must_use]
    pub fn with_rng(config: GameConfig, rng: GameRng) -> Self {
        let mut vars = Variables::new();
        vars.set(VAR_NAME, "");
        vars.set(VAR_URL, "");
        vars.set(VAR_RULESET, config.ruleset.name());
        vars.set(VAR_EXPORT, "");
        vars.set(VAR_TRADE_MINIMUM, config.min_trade_cards.to_string());

        Self {
            catalogue: Catalogue::new(),
            seats: Vec::new(),
            decks: vec![Deck::new(); config.epochs],
            discards: vec![Hand::new(); config.epochs],
            vars,
            rng,
            config,
            abandoned: false,
        }
    }

    /// Create a fresh game from a card list and power names, building the
    /// decks with the configured ruleset.
    ///
    /// Fails with `GameCreationFailed` if there are no cards or powers, a
    /// card names a deck outside `1..epochs`, or an epoch ends up empty. A
    /// failed game is never returned, so it can never be saved.
    pub fn create(config: GameConfig, cards: Vec<Card>, powers: Vec<String>) -> EngineResult<Self> {
        Self::create_with_rng(config, cards, powers, GameRng::from_entropy())
    }

    /// [`Game::create`] with a given random source.
    pub fn create_with_rng(
        config: GameConfig,
        cards: Vec<Card>,
        powers: Vec<String>,
        rng: GameRng,
    ) -> EngineResult<Self> {
        if cards.is_empty() {
            return Err(EngineError::GameCreationFailed("no cards".into()));
        }
        if powers.is_empty() {
            return Err(EngineError::GameCreationFailed("no powers".into()));
        }

        let mut game = Self::with_rng(config, rng);

        for card in cards {
            if card.deck == 0 || card.deck > game.config.last_epoch() {
                return Err(EngineError::GameCreationFailed(format!(
                    "card '{}' is in deck {}, outside 1..={}",
                    card.name,
                    card.deck,
                    game.config.last_epoch()
                )));
            }
            game.catalogue.add_card(card)?;
        }
        for name in powers {
            game.add_power(name)?;
        }

        let builder = construction_for(game.config.ruleset);
        game.decks = builder.build(
            &game.catalogue,
            game.seats.len(),
            game.config.epochs,
            &mut game.rng,
        )?;

        info!(
            ruleset = %game.config.ruleset,
            cards = game.catalogue.card_count(),
            powers = game.seats.len(),
            "Created game"
        );
        Ok(game)
    }

    /// Reassemble a game from stored parts.
    ///
    /// `decks` and `discards` are padded or truncated to the configured
    /// number of epochs.
    #[must_use]
    pub fn from_parts(
        config: GameConfig,
        catalogue: Catalogue,
        seats: Vec<Seat>,
        mut decks: Vec<Deck>,
        mut discards: Vec<Hand>,
        vars: Variables,
    ) -> Self {
        decks.resize(config.epochs, Deck::new());
        discards.resize(config.epochs, Hand::new());
        Self {
            catalogue,
            seats,
            decks,
            discards,
            vars,
            rng: GameRng::from_entropy(),
            config,
            abandoned: false,
        }
    }

    // === Configuration ===

    /// Game configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Number of deck slots, including the reserved slot 0.
    #[must_use]
    pub fn epochs(&self) -> usize {
        self.config.epochs
    }

    /// Validate a deck number: `1..epochs`.
    pub fn check_epoch(&self, epoch: usize) -> EngineResult<usize> {
        if epoch == 0 || epoch >= self.config.epochs {
            return Err(EngineError::UnableToParse(format!(
                "deck {epoch} is outside 1..={}",
                self.config.last_epoch()
            )));
        }
        Ok(epoch)
    }

    // === Catalogue ===

    /// Card and technology definitions.
    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Mutable catalogue. The catalogue only supports appending.
    pub fn catalogue_mut(&mut self) -> &mut Catalogue {
        &mut self.catalogue
    }

    /// Look up a trade card by name, ignoring case.
    #[must_use]
    pub fn find_card(&self, name: &str) -> Option<CardId> {
        self.catalogue.find_card(name)
    }

    /// Look up a technology by name, ignoring case.
    #[must_use]
    pub fn find_technology(&self, name: &str) -> Option<TechId> {
        self.catalogue.find_technology(name)
    }

    // === Powers ===

    /// Add an unbound power. Names must be unique ignoring case.
    pub fn add_power(&mut self, name: impl Into<String>) -> EngineResult<PowerId> {
        let name = name.into().trim().to_string();
        if name.is_empty() || self.find_power(&name).is_some() {
            return Err(EngineError::GameCreationFailed(format!("bad or duplicate power '{name}'")));
        }
        let id = PowerId::new(self.seats.len() as u16);
        self.seats.push(Seat::new(Power::new(name)));
        Ok(id)
    }

    /// Number of powers.
    #[must_use]
    pub fn power_count(&self) -> usize {
        self.seats.len()
    }

    /// Look up a power by name, ignoring case.
    #[must_use]
    pub fn find_power(&self, name: &str) -> Option<PowerId> {
        self.seats
            .iter()
            .position(|s| s.power.is_named(name))
            .map(|i| PowerId::new(i as u16))
    }

    /// Look up a power, failing with `PowerNotFound`.
    pub fn require_power(&self, name: &str) -> EngineResult<PowerId> {
        self.find_power(name)
            .ok_or_else(|| EngineError::PowerNotFound(name.to_string()))
    }

    /// Get a power.
    #[must_use]
    pub fn power(&self, id: PowerId) -> &Power {
        &self.seats[id.index()].power
    }

    /// Get a mutable power.
    pub fn power_mut(&mut self, id: PowerId) -> &mut Power {
        &mut self.seats[id.index()].power
    }

    /// Borrow two distinct powers mutably.
    ///
    /// Returns `None` if the ids are equal or out of range.
    pub fn power_pair_mut(&mut self, a: PowerId, b: PowerId) -> Option<(&mut Power, &mut Power)> {
        let (lo, hi) = (a.index().min(b.index()), a.index().max(b.index()));
        if lo == hi || hi >= self.seats.len() {
            return None;
        }
        let (left, right) = self.seats.split_at_mut(hi);
        let (low, high) = (&mut left[lo].power, &mut right[0].power);
        Some(if a.index() < b.index() { (low, high) } else { (high, low) })
    }

    /// All seats in creation order.
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Iterate `(id, power)` in creation order.
    pub fn powers(&self) -> impl Iterator<Item = (PowerId, &Power)> {
        self.seats
            .iter()
            .enumerate()
            .map(|(i, s)| (PowerId::new(i as u16), &s.power))
    }

    /// Player bound to a power.
    #[must_use]
    pub fn player(&self, id: PowerId) -> Option<&Player> {
        self.seats[id.index()].player.as_ref()
    }

    /// Bind a player to a power, replacing any previous binding.
    pub fn set_player(&mut self, id: PowerId, player: Player) -> Option<Player> {
        self.seats[id.index()].player.replace(player)
    }

    // === Decks and discards ===

    /// Draw deck of an epoch.
    #[must_use]
    pub fn deck(&self, epoch: usize) -> &Deck {
        &self.decks[epoch]
    }

    /// Mutable draw deck of an epoch.
    pub fn deck_mut(&mut self, epoch: usize) -> &mut Deck {
        &mut self.decks[epoch]
    }

    /// Discard pile of an epoch.
    #[must_use]
    pub fn discard(&self, epoch: usize) -> &Hand {
        &self.discards[epoch]
    }

    /// Mutable discard pile of an epoch.
    pub fn discard_mut(&mut self, epoch: usize) -> &mut Hand {
        &mut self.discards[epoch]
    }

    /// All decks, slot 0 included.
    #[must_use]
    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    /// All discard piles, slot 0 included.
    #[must_use]
    pub fn discards(&self) -> &[Hand] {
        &self.discards
    }

    /// Move the front card of an epoch's deck into a power's hand.
    ///
    /// Does nothing if the deck is empty.
    pub fn pick(&mut self, epoch: usize, power: PowerId) -> Option<CardId> {
        let card = self.decks[epoch].pick()?;
        self.seats[power.index()].power.hand.insert(card);
        Some(card)
    }

    /// Put cards on the discard piles of their epochs.
    pub fn discard_cards(&mut self, cards: &Hand) {
        for (card, n) in cards.iter() {
            let epoch = self.catalogue.card(card).deck;
            self.discards[epoch].insert_n(card, n);
        }
    }

    /// Shuffle an epoch's discard pile into the back of its deck.
    pub fn reshuffle_epoch(&mut self, epoch: usize) {
        let discard = self.discards[epoch].take();
        self.decks[epoch].shuffle_in(&discard, &self.catalogue, &mut self.rng);
    }

    /// Every card copy in every container.
    #[must_use]
    pub fn census(&self) -> Hand {
        let mut all = Hand::new();
        for deck in &self.decks {
            all.merge(&Hand::from_ids(deck.iter()));
        }
        for discard in &self.discards {
            all.merge(discard);
        }
        for seat in &self.seats {
            all.merge(&seat.power.hand);
            all.merge(&seat.power.staging);
        }
        all
    }

    // === Lifecycle ===

    /// Mark the game so it is never saved.
    pub fn abandon(&mut self) {
        self.abandoned = true;
    }

    /// True if the game must not be saved.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }
}
