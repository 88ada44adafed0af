//! Command surface for shells and scripts.
//!
//! Each command takes the game plus already-tokenized arguments and returns
//! an [`Outcome`]: a code from the [`ErrorCode`] taxonomy and the lines to
//! show the user. Commands never read input or print; a failing command
//! leaves the game exactly as it found it.
//!
//! ## Example
//!
//! ```
//! use civ_ledger::commands;
//! use civ_ledger::core::{ErrorCode, GameConfig};
//!
//! let mut game = commands::create(
//!     GameConfig::default(),
//!     "1 2 0 Ochre\n1 2 0 Hides\n",
//!     "Egypt\nCrete\n",
//!     None,
//! )
//! .unwrap();
//!
//! let outcome = commands::draw(&mut game, "Egypt", 1, &[]);
//! assert_eq!(outcome.code, ErrorCode::None);
//! assert_eq!(commands::held(&game, "Assyria").code, ErrorCode::PowerNotFound);
//! ```

use tracing::{debug, info, warn};

use crate::cards::import::{add_technologies, parse_card_list, parse_power_list, parse_technology_list};
use crate::cards::{group_from_string, Card, CardId, CardType, Catalogue};
use crate::core::config::GameConfig;
use crate::core::error::{EngineError, EngineResult, ErrorCode};
use crate::core::player::Player;
use crate::core::state::Game;
use crate::trade::{self, Purchase};
use crate::zones::{Deck, Hand};

/// Card name that makes `give` pick a random held card.
pub const RANDOM_CARD: &str = "Random";

/// Result of a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub code: ErrorCode,
    pub lines: Vec<String>,
}

impl Outcome {
    /// Successful outcome with output.
    #[must_use]
    pub fn ok(lines: Vec<String>) -> Self {
        Self {
            code: ErrorCode::None,
            lines,
        }
    }

    /// Control signal with no output.
    #[must_use]
    pub fn signal(code: ErrorCode) -> Self {
        Self { code, lines: Vec::new() }
    }

    /// True if the command succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }

    /// Output joined with newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl From<EngineError> for Outcome {
    fn from(err: EngineError) -> Self {
        Self {
            code: err.code(),
            lines: vec![err.to_string()],
        }
    }
}

fn run(command: &str, body: impl FnOnce() -> EngineResult<Vec<String>>) -> Outcome {
    match body() {
        Ok(lines) => {
            debug!(command, "Command succeeded");
            Outcome::ok(lines)
        }
        Err(err) => {
            warn!(command, code = %err.code(), error = %err, "Command failed");
            Outcome::from(err)
        }
    }
}

// === Rendering ===

/// Render a hand: one `Nx Name (deck)` line per card in placement order,
/// then its value when positive. An empty hand renders as `None`.
#[must_use]
pub fn render_hand(catalogue: &Catalogue, hand: &Hand) -> Vec<String> {
    if hand.is_empty() {
        return vec!["None".to_string()];
    }
    let mut lines: Vec<String> = hand
        .sorted(catalogue)
        .into_iter()
        .map(|(id, n)| {
            let card = catalogue.card(id);
            format!("{n}x {} ({})", card.name, card.deck)
        })
        .collect();
    let value = hand.value(catalogue);
    if value > 0 {
        lines.push(format!("Value: {value}"));
    }
    lines
}

/// Render a deck front to back: `position<TAB>name`.
#[must_use]
pub fn render_deck(catalogue: &Catalogue, deck: &Deck) -> Vec<String> {
    if deck.is_empty() {
        return vec!["None".to_string()];
    }
    deck.iter()
        .enumerate()
        .map(|(i, id)| format!("{i}\t{}", catalogue.card(id).name))
        .collect()
}

fn card_names(catalogue: &Catalogue, cards: impl Iterator<Item = CardId>) -> String {
    cards
        .map(|id| catalogue.card(id).name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn hand_from_names(game: &Game, names: &[&str]) -> EngineResult<Hand> {
    names
        .iter()
        .map(|name| game.catalogue().require_card(name))
        .collect::<EngineResult<Vec<_>>>()
        .map(Hand::from_ids)
}

// === Creation ===

/// Create a game from card, power, and optional technology lists.
///
/// A failed creation returns the outcome to report instead of a game, so a
/// half-built game can never be saved.
pub fn create(
    config: GameConfig,
    card_list: &str,
    power_list: &str,
    technology_list: Option<&str>,
) -> Result<Game, Outcome> {
    let build = || -> EngineResult<Game> {
        let cards = parse_card_list(card_list, config.ruleset.has_supplement_column())?;
        let powers = parse_power_list(power_list)?;
        let mut game = Game::create(config.clone(), cards, powers)?;
        if let Some(text) = technology_list {
            let records = parse_technology_list(text)?;
            add_technologies(game.catalogue_mut(), records)?;
        }
        Ok(game)
    };

    build().map_err(|err| {
        warn!(error = %err, "Game creation failed");
        Outcome::from(err)
    })
}

// === Card movement ===

/// Give one card from one power to another. `Random` gives a random card.
pub fn give(game: &mut Game, from: &str, to: &str, card: &str) -> Outcome {
    run("give", || {
        let giver = game.require_power(from)?;
        let taker = game.require_power(to)?;

        let id = if card.trim().eq_ignore_ascii_case(RANDOM_CARD) {
            let held: Vec<CardId> = game.power(giver).hand.ids().collect();
            *game
                .rng
                .choose(&held)
                .ok_or_else(|| EngineError::CardNotFound(RANDOM_CARD.to_string()))?
        } else {
            game.catalogue().require_card(card)?
        };

        trade::give(game, giver, taker, &Hand::from_ids([id]))?;
        Ok(vec![format!(
            "{} gives {} to {}",
            game.power(giver).name,
            game.catalogue().card(id).name,
            game.power(taker).name
        )])
    })
}

/// Two-party trade of named cards.
pub fn trade(game: &mut Game, first: &str, first_cards: &[&str], second: &str, second_cards: &[&str]) -> Outcome {
    run("trade", || {
        let a = game.require_power(first)?;
        let b = game.require_power(second)?;
        let from_a = hand_from_names(game, first_cards)?;
        let from_b = hand_from_names(game, second_cards)?;

        trade::trade(game, a, b, &from_a, &from_b)?;

        let catalogue = game.catalogue();
        Ok(vec![
            format!("{} Gives:", game.power(a).name),
            card_names(catalogue, from_a.ids()),
            String::new(),
            format!("{} Gives:", game.power(b).name),
            card_names(catalogue, from_b.ids()),
        ])
    })
}

/// Discard named cards plus every calamity the power holds.
///
/// Each calamity goes in all held copies, whether or not it was named.
pub fn discard(game: &mut Game, power: &str, cards: &[&str]) -> Outcome {
    run("discard", || {
        let id = game.require_power(power)?;
        let mut toss = hand_from_names(game, cards)?;

        let held = &game.power(id).hand;
        for (card, n) in held.calamities(game.catalogue()).iter() {
            let named = toss.count(card);
            if n > named {
                toss.insert_n(card, n - named);
            }
        }

        if let Some(short) = held.shortfall(&toss) {
            return Err(short.into_error(game.catalogue()));
        }

        let mut lines = render_hand(game.catalogue(), &toss);
        lines.push(String::new());

        game.power_mut(id)
            .hand
            .remove(&toss)
            .map_err(|_| EngineError::CardDeletionFailed(power.to_string()))?;
        game.discard_cards(&toss);

        lines.extend(render_hand(game.catalogue(), &game.power(id).hand));
        info!(power = %game.power(id).name, cards = toss.len(), "Discarded");
        Ok(lines)
    })
}

/// Draw one card from each deck `1..=count`, then one from each deck in
/// `picks`. Empty decks are skipped.
pub fn draw(game: &mut Game, power: &str, count: usize, picks: &[usize]) -> Outcome {
    run("draw", || {
        let id = game.require_power(power)?;
        for &pick in picks {
            game.check_epoch(pick)?;
        }

        let mut lines = vec!["Held:".to_string()];
        lines.extend(render_hand(game.catalogue(), &game.power(id).hand));

        let mut drawn = Hand::new();
        for epoch in 1..=count.min(game.config().last_epoch()) {
            if let Some(card) = game.pick(epoch, id) {
                drawn.insert(card);
            }
        }
        let mut bought = Hand::new();
        for &epoch in picks {
            if let Some(card) = game.pick(epoch, id) {
                bought.insert(card);
            }
        }

        lines.push(String::new());
        lines.push("Drawn:".to_string());
        lines.extend(render_hand(game.catalogue(), &drawn));
        lines.push(String::new());
        lines.push("Bought:".to_string());
        lines.extend(render_hand(game.catalogue(), &bought));

        info!(power = %game.power(id).name, drawn = drawn.len(), bought = bought.len(), "Drew cards");
        Ok(lines)
    })
}

/// Shuffle every discard pile into the back of its deck.
pub fn reshuffle(game: &mut Game) -> Outcome {
    run("reshuffle", || {
        let moved: usize = game.discards().iter().map(Hand::len).sum();
        for epoch in 0..game.epochs() {
            game.reshuffle_epoch(epoch);
        }
        info!(cards = moved, "Reshuffled discards");
        Ok(vec![format!("Reshuffled {moved} cards")])
    })
}

/// Add a new card to the catalogue and insert `max_copies` copies at random
/// positions of its deck.
pub fn shuffle_in(game: &mut Game, deck: usize, type_code: i8, max_copies: u32, name: &str) -> Outcome {
    run("shuffle_in", || {
        let epoch = game.check_epoch(deck)?;
        let card_type = CardType::try_from(type_code)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::UnableToParse("missing card name".into()));
        }

        let id = game
            .catalogue_mut()
            .add_card(Card::new(name, epoch, max_copies, card_type))?;

        let mut lines = Vec::with_capacity(max_copies as usize);
        for _ in 0..max_copies {
            let len = game.deck(epoch).len();
            let at = game.rng.index(len);
            game.deck_mut(epoch).insert_at(at, id);
            lines.push(format!(
                "Inserting ({epoch})({})({max_copies})({name}) at {at}",
                card_type.code()
            ));
        }
        info!(card = name, deck = epoch, copies = max_copies, "Shuffled in new card");
        Ok(lines)
    })
}

/// Keep only the listed deck positions, in the listed order. Cards at other
/// positions go to the epoch's discard pile.
pub fn rearrange(game: &mut Game, deck: usize, keep: &[usize]) -> Outcome {
    run("rearrange", || {
        let epoch = game.check_epoch(deck)?;
        let current = game.deck(epoch).clone();

        let mut seen = vec![false; current.len()];
        for &pos in keep {
            match seen.get_mut(pos) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => return Err(EngineError::UnableToParse(format!("position {pos} repeated"))),
                None => {
                    return Err(EngineError::UnableToParse(format!(
                        "position {pos} outside deck of {}",
                        current.len()
                    )))
                }
            }
        }

        let mut lines = Vec::new();
        let mut tossed = Hand::new();
        for (pos, card) in current.iter().enumerate() {
            if !seen[pos] {
                lines.push(format!("Discarding {pos} {}", game.catalogue().card(card).name));
                tossed.insert(card);
            }
        }

        let kept: Vec<CardId> = keep.iter().filter_map(|&pos| current.get(pos)).collect();
        game.deck_mut(epoch).replace(kept);
        game.discard_mut(epoch).merge(&tossed);

        info!(deck = epoch, kept = keep.len(), discarded = tossed.len(), "Rearranged deck");
        Ok(lines)
    })
}

// === Powers and technologies ===

/// Bind a player to a power.
pub fn set_player(game: &mut Game, power: &str, name: &str, password: &str, email: &str) -> Outcome {
    run("set_player", || {
        let id = game.require_power(power)?;
        game.set_player(id, Player::new(name, password, email));
        Ok(Vec::new())
    })
}

/// Grant bonus credit toward a technology group.
pub fn grant_credit(game: &mut Game, power: &str, group: &str, amount: i64) -> Outcome {
    run("grant_credit", || {
        let id = game.require_power(power)?;
        let group = group_from_string(group).ok_or_else(|| EngineError::GroupNotFound(group.to_string()))?;

        let total = game.power_mut(id).portfolio.grant(group, amount)?;

        Ok(vec![format!("{} {group} credit: {total}", game.power(id).name)])
    })
}

/// Buy technologies with named payment cards plus a surplus.
pub fn buy(game: &mut Game, power: &str, technologies: &[&str], payment: &[&str], surplus: i64) -> Outcome {
    run("buy", || {
        let id = game.require_power(power)?;
        let technologies = technologies
            .iter()
            .map(|name| game.catalogue().require_technology(name))
            .collect::<EngineResult<Vec<_>>>()?;
        let payment = hand_from_names(game, payment)?;

        let receipt = trade::buy(
            game,
            id,
            &Purchase {
                technologies,
                payment,
                surplus,
            },
        )?;

        Ok(vec![
            format!("Cost: {}", receipt.cost),
            format!("Paid: {}", receipt.offered),
            format!("Change: {}", receipt.change()),
        ])
    })
}

// === Reports ===

fn render_discards(game: &Game) -> Vec<String> {
    let mut lines = Vec::new();
    for (epoch, pile) in game.discards().iter().enumerate().skip(1) {
        let mut rendered = render_hand(game.catalogue(), pile).into_iter();
        let first = rendered.next().unwrap_or_default();
        lines.push(format!("{epoch}: {first}"));
        lines.extend(rendered);
    }
    lines
}

/// Show a power's hand, a deck by number, or every discard pile.
pub fn held(game: &Game, target: &str) -> Outcome {
    run("held", || {
        let target = target.trim();
        if let Ok(epoch) = target.parse::<usize>() {
            if epoch > 0 && epoch < game.epochs() {
                return Ok(render_deck(game.catalogue(), game.deck(epoch)));
            }
        }
        if target.to_ascii_lowercase().contains("discard") {
            return Ok(render_discards(game));
        }
        let id = game.require_power(target)?;
        Ok(render_hand(game.catalogue(), &game.power(id).hand))
    })
}

/// List powers, players, decks, discards, calamities, or technologies.
pub fn list(game: &Game, object: &str) -> Outcome {
    run("list", || {
        let object = object.trim().to_ascii_lowercase();
        let catalogue = game.catalogue();
        let lines = match object.as_str() {
            "powers" => game
                .powers()
                .map(|(_, p)| format!("{}\t{}", p.name, card_names(catalogue, p.hand.ids())))
                .collect(),
            "players" => game
                .seats()
                .iter()
                .map(|s| match &s.player {
                    Some(p) => format!("{}\t{}\t'{}'\t'{}'", s.power.name, p.name, p.password, p.email),
                    None => s.power.name.clone(),
                })
                .collect(),
            "decks" => (1..game.epochs())
                .map(|e| format!("{e}\t{}", card_names(catalogue, game.deck(e).iter())))
                .collect(),
            "calamities" => {
                let mut held: Vec<(CardId, &str)> = game
                    .powers()
                    .flat_map(|(_, p)| {
                        p.hand
                            .calamities(catalogue)
                            .ids()
                            .map(move |c| (c, p.name.as_str()))
                            .collect::<Vec<_>>()
                    })
                    .collect();
                held.sort_by(|a, b| catalogue.card(a.0).placement_cmp(catalogue.card(b.0)));
                held.into_iter()
                    .map(|(c, power)| format!("{}: {power}", catalogue.card(c).name))
                    .collect()
            }
            "technologies" => game
                .powers()
                .map(|(_, p)| {
                    let mut owned: Vec<_> = p.portfolio.owned().collect();
                    catalogue.sort_technologies(&mut owned);
                    let names: Vec<_> = owned.iter().map(|&t| catalogue.technology(t).name.as_str()).collect();
                    format!("{}\t{}", p.name, names.join(","))
                })
                .collect(),
            other if other.contains("discard") => render_discards(game),
            other => return Err(EngineError::UnableToParse(format!("cannot list '{other}'"))),
        };
        Ok(lines)
    })
}

/// Count cards per power, deck, discard pile or calamity holder, or count
/// bound players.
pub fn count(game: &Game, object: &str) -> Outcome {
    run("count", || {
        let object = object.trim().to_ascii_lowercase();
        let catalogue = game.catalogue();
        let rows: Vec<(String, usize)> = match object.as_str() {
            "calamities" => game
                .powers()
                .map(|(_, p)| (p.name.clone(), p.hand.calamities(catalogue).len()))
                .collect(),
            "powers" => game.powers().map(|(_, p)| (p.name.clone(), p.hand.len())).collect(),
            "players" => {
                let bound = game.seats().iter().filter(|s| s.player.is_some()).count();
                return Ok(vec![format!("Assigned Player: {bound}")]);
            }
            "decks" => (1..game.epochs()).map(|e| (e.to_string(), game.deck(e).len())).collect(),
            "discards" | "discard" => (1..game.epochs())
                .map(|e| (e.to_string(), game.discard(e).len()))
                .collect(),
            other => return Err(EngineError::UnableToParse(format!("cannot count '{other}'"))),
        };

        let total: usize = rows.iter().map(|(_, n)| n).sum();
        let mut lines: Vec<String> = rows.into_iter().map(|(name, n)| format!("{name}\t{n}")).collect();
        lines.push(format!("Total:\t{total}"));
        Ok(lines)
    })
}

/// Hand value of every power.
pub fn value(game: &Game) -> Outcome {
    run("value", || {
        Ok(game
            .powers()
            .map(|(_, p)| format!("{}\t{}", p.name, p.hand.value(game.catalogue())))
            .collect())
    })
}

// === Session control ===

/// Ask the shell to save.
#[must_use]
pub fn save() -> Outcome {
    Outcome::signal(ErrorCode::SaveRequested)
}

/// Ask the shell to save and exit.
#[must_use]
pub fn quit() -> Outcome {
    Outcome::signal(ErrorCode::QuitRequested)
}

/// Abandon the game and ask the shell to exit without saving.
pub fn abort(game: &mut Game) -> Outcome {
    game.abandon();
    Outcome::signal(ErrorCode::AbortRequested)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARDS: &str = "1 3 0 Ochre\n1 3 0 Hides\n-2 1 0 Volcano\n-1 1 0 Piracy\n2 4 0 Salt\n";
    const TECHS: &str = "10\tBronze\t1\t0\t0\t0\t0\t3\t0\t0\t0\t0\tBr\tN\n\
                         8\tWheel\t1\t0\t0\t0\t0\t0\t0\t0\t0\t0\tWh\tN\n";

    fn game() -> Game {
        create(GameConfig::default(), CARDS, "Egypt\nCrete\n", Some(TECHS)).unwrap()
    }

    fn set_hand(game: &mut Game, power: &str, cards: &[&str]) {
        let id = game.find_power(power).unwrap();
        let hand = hand_from_names(game, cards).unwrap();
        game.power_mut(id).hand = hand;
    }

    #[test]
    fn test_create_reports_failure() {
        let outcome = create(GameConfig::default(), "-1 1 0 Piracy\n", "Egypt\n", None).unwrap_err();
        assert_eq!(outcome.code, ErrorCode::UnableToParse);

        let outcome = create(GameConfig::default(), CARDS, "", None).unwrap_err();
        assert_eq!(outcome.code, ErrorCode::GameCreationFailed);
        assert!(outcome.code.is_abortable());
    }

    #[test]
    fn test_render_hand() {
        let game = game();
        let c = game.catalogue();
        let hides = c.find_card("Hides").unwrap();
        let salt = c.find_card("Salt").unwrap();

        let lines = render_hand(c, &Hand::from_ids([salt, hides, salt]));
        assert_eq!(lines, vec!["1x Hides (1)", "2x Salt (2)", "Value: 9"]);
        assert_eq!(render_hand(c, &Hand::new()), vec!["None"]);
    }

    #[test]
    fn test_give_named_and_random() {
        let mut game = game();
        set_hand(&mut game, "Egypt", &["Salt", "Ochre"]);

        let outcome = give(&mut game, "egypt", "crete", "salt");
        assert!(outcome.is_ok());
        assert_eq!(outcome.lines, vec!["Egypt gives Salt to Crete"]);

        assert!(give(&mut game, "Egypt", "Crete", "Random").is_ok());
        assert!(game.power(game.find_power("Egypt").unwrap()).hand.is_empty());
        assert_eq!(give(&mut game, "Egypt", "Crete", "Random").code, ErrorCode::CardNotFound);
        assert_eq!(give(&mut game, "Egypt", "Nowhere", "Salt").code, ErrorCode::PowerNotFound);
    }

    #[test]
    fn test_trade_command() {
        let mut game = game();
        set_hand(&mut game, "Egypt", &["Salt", "Salt", "Salt"]);
        set_hand(&mut game, "Crete", &["Ochre", "Ochre", "Hides"]);

        let outcome = trade(&mut game, "Egypt", &["Salt", "Salt", "Salt"], "Crete", &["Ochre", "Ochre", "Hides"]);
        assert!(outcome.is_ok(), "{}", outcome.text());
        assert_eq!(outcome.lines[0], "Egypt Gives:");
        assert_eq!(outcome.lines[1], "Salt,Salt,Salt");

        let outcome = trade(&mut game, "Egypt", &["Salt", "Salt", "Salt"], "Crete", &["Ochre", "Ochre", "Hides"]);
        assert_eq!(outcome.code, ErrorCode::CardNotFound);
    }

    #[test]
    fn test_discard_takes_all_calamities() {
        let mut game = game();
        set_hand(&mut game, "Egypt", &["Salt", "Salt", "Volcano", "Piracy"]);

        let outcome = discard(&mut game, "Egypt", &["Salt", "Volcano"]);
        assert!(outcome.is_ok(), "{}", outcome.text());

        let egypt = game.find_power("Egypt").unwrap();
        let salt = game.find_card("Salt").unwrap();
        assert_eq!(game.power(egypt).hand, Hand::from_ids([salt]));
        assert_eq!(game.discard(1).len(), 2);
        assert_eq!(game.discard(2).len(), 1);
    }

    #[test]
    fn test_discard_failure_changes_nothing() {
        let mut game = game();
        set_hand(&mut game, "Egypt", &["Salt", "Piracy"]);

        let outcome = discard(&mut game, "Egypt", &["Salt", "Salt"]);
        assert_eq!(outcome.code, ErrorCode::CardNotFound);
        assert_eq!(game.power(game.find_power("Egypt").unwrap()).hand.len(), 2);
        assert!(game.discard(1).is_empty());
    }

    #[test]
    fn test_draw() {
        let mut game = game();
        let outcome = draw(&mut game, "Egypt", 9, &[2, 2]);
        assert!(outcome.is_ok());

        let egypt = game.find_power("Egypt").unwrap();
        assert_eq!(game.power(egypt).hand.len(), 4);
        assert_eq!(game.deck(2).len(), 1);

        assert_eq!(draw(&mut game, "Egypt", 1, &[0]).code, ErrorCode::UnableToParse);
        assert_eq!(game.power(egypt).hand.len(), 4);
    }

    #[test]
    fn test_reshuffle() {
        let mut game = game();
        draw(&mut game, "Egypt", 2, &[]);
        let egypt = game.find_power("Egypt").unwrap();
        let hand = game.power_mut(egypt).hand.take();
        game.discard_cards(&hand);

        let outcome = reshuffle(&mut game);
        assert_eq!(outcome.lines, vec!["Reshuffled 2 cards"]);
        assert!(game.discards().iter().all(Hand::is_empty));
        assert_eq!(game.deck(1).len(), 8);
        assert_eq!(game.deck(2).len(), 4);
    }

    #[test]
    fn test_shuffle_in() {
        let mut game = game();
        let outcome = shuffle_in(&mut game, 2, 0, 3, "Gold");
        assert!(outcome.is_ok());
        assert_eq!(outcome.lines.len(), 3);
        assert_eq!(game.deck(2).len(), 7);
        assert_eq!(game.catalogue().card(game.find_card("gold").unwrap()).image, "Gold.png");

        assert_eq!(shuffle_in(&mut game, 2, 0, 1, "GOLD").code, ErrorCode::UnableToParse);
        assert_eq!(shuffle_in(&mut game, 12, 0, 1, "Iron").code, ErrorCode::UnableToParse);
        assert_eq!(shuffle_in(&mut game, 2, -7, 1, "Iron").code, ErrorCode::UnableToParse);
    }

    #[test]
    fn test_rearrange() {
        let mut game = game();
        let before: Vec<_> = game.deck(2).iter().collect();

        let outcome = rearrange(&mut game, 2, &[3, 0]);
        assert!(outcome.is_ok());
        assert_eq!(outcome.lines.len(), 2);

        let after: Vec<_> = game.deck(2).iter().collect();
        assert_eq!(after, vec![before[3], before[0]]);
        assert_eq!(game.discard(2).len(), 2);
    }

    #[test]
    fn test_rearrange_rejects_bad_positions() {
        let mut game = game();
        let before = game.deck(2).clone();

        assert_eq!(rearrange(&mut game, 2, &[0, 0]).code, ErrorCode::UnableToParse);
        assert_eq!(rearrange(&mut game, 2, &[4]).code, ErrorCode::UnableToParse);
        assert_eq!(game.deck(2), &before);
        assert!(game.discard(2).is_empty());
    }

    #[test]
    fn test_grant_credit_and_buy() {
        let mut game = game();
        set_hand(&mut game, "Egypt", &["Salt", "Salt"]);

        assert_eq!(grant_credit(&mut game, "Egypt", "sci", 5).lines, vec!["Egypt Science credit: 5"]);
        assert_eq!(grant_credit(&mut game, "Egypt", "Magic", 5).code, ErrorCode::GroupNotFound);
        assert_eq!(grant_credit(&mut game, "Egypt", "Science", i64::MAX).code, ErrorCode::UnableToParse);
        assert_eq!(grant_credit(&mut game, "Egypt", "Science", -5).lines, vec!["Egypt Science credit: 0"]);
        assert_eq!(grant_credit(&mut game, "Egypt", "sci", 5).lines, vec!["Egypt Science credit: 5"]);

        let outcome = buy(&mut game, "Egypt", &["Bronze"], &["Salt", "Salt"], 2);
        assert!(outcome.is_ok(), "{}", outcome.text());
        assert_eq!(outcome.lines, vec!["Cost: 10", "Paid: 10", "Change: 0"]);

        let outcome = buy(&mut game, "Egypt", &["bronze"], &[], 100);
        assert_eq!(outcome.code, ErrorCode::DuplicateTechnology);

        let outcome = buy(&mut game, "Egypt", &["Wheel"], &[], 4);
        assert_eq!(outcome.code, ErrorCode::InsufficientFunds);

        assert_eq!(buy(&mut game, "Egypt", &["Writing"], &[], 4).code, ErrorCode::CardNotFound);
    }

    #[test]
    fn test_reports() {
        let mut game = game();
        set_hand(&mut game, "Egypt", &["Salt", "Volcano"]);
        set_player(&mut game, "Crete", "bob", "secret", "bob@example.org");

        assert_eq!(held(&game, "Egypt").lines, vec!["1x Volcano (1)", "1x Salt (2)", "Value: 2"]);
        assert_eq!(held(&game, "2").lines.len(), 4);
        assert_eq!(held(&game, "discards").lines.len(), 9);

        assert_eq!(list(&game, "calamities").lines, vec!["Volcano: Egypt"]);
        assert_eq!(list(&game, "players").lines, vec!["Egypt", "Crete\tbob\t'secret'\t'bob@example.org'"]);
        assert_eq!(list(&game, "things").code, ErrorCode::UnableToParse);

        assert_eq!(count(&game, "players").lines, vec!["Assigned Player: 1"]);
        let powers = count(&game, "powers").lines;
        assert_eq!(powers.last().map(String::as_str), Some("Total:\t2"));
        assert_eq!(value(&game).lines, vec!["Egypt\t2", "Crete\t0"]);
    }

    #[test]
    fn test_control_codes() {
        let mut game = game();
        assert_eq!(save().code, ErrorCode::SaveRequested);
        assert_eq!(quit().code, ErrorCode::QuitRequested);
        assert!(quit().code.is_continuable());

        let outcome = abort(&mut game);
        assert_eq!(outcome.code, ErrorCode::AbortRequested);
        assert!(game.is_abandoned());
    }
}
