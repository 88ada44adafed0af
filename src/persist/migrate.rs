//! Schema migration for saved games.
//!
//! Every stored entity kind (game, card, power, player, technology) has its
//! own version number. Each kind has a chain of steps; step `k` upgrades an
//! entity from version `k` to `k + 1`. Loading runs every step from the
//! stored version up to the current one, left to right, on the raw JSON
//! tree, and only then decodes the typed document.
//!
//! Old data bugs are corrected by their step and never re-encoded: card
//! version 0 stored the tradable and non-tradable calamity codes swapped,
//! and the card 0 to 1 step swaps them back. Cards saved at version 1 or
//! later pass through untouched.

use serde_json::{json, Map, Value};
use tracing::debug;

use super::document::Versions;
use crate::core::config::{Ruleset, VAR_EXPORT, VAR_NAME, VAR_RULESET, VAR_URL};
use crate::core::error::PersistError;

type Step = fn(&mut Map<String, Value>) -> Result<(), PersistError>;

/// Upgrade path for one entity kind.
struct Chain {
    entity: &'static str,
    steps: &'static [Step],
}

impl Chain {
    fn current(&self) -> u32 {
        self.steps.len() as u32
    }

    fn run(&self, from: u32, object: &mut Map<String, Value>) -> Result<(), PersistError> {
        for (version, step) in self.steps.iter().enumerate().skip(from as usize) {
            debug!(entity = self.entity, from = version, "Migrating");
            step(object)?;
        }
        Ok(())
    }

    fn check(&self, found: u32) -> Result<(), PersistError> {
        if found > self.current() {
            return Err(PersistError::UnsupportedVersion {
                entity: self.entity,
                found,
                supported: self.current(),
            });
        }
        Ok(())
    }
}

const GAME: Chain = Chain {
    entity: "game",
    steps: &[game_variables, game_technologies],
};

const CARD: Chain = Chain {
    entity: "card",
    steps: &[card_unswap_calamities, card_supplement],
};

const POWER: Chain = Chain {
    entity: "power",
    steps: &[power_staging, power_portfolio],
};

const PLAYER: Chain = Chain {
    entity: "player",
    steps: &[],
};

const TECHNOLOGY: Chain = Chain {
    entity: "technology",
    steps: &[technology_evil],
};

// === Game ===

/// v0 -> v1: fixed `name`/`url` fields move into `variables`; `ruleset`
/// and `export` are backfilled.
fn game_variables(game: &mut Map<String, Value>) -> Result<(), PersistError> {
    let name = game.remove(VAR_NAME).unwrap_or_else(|| json!(""));
    let url = game.remove(VAR_URL).unwrap_or_else(|| json!(""));

    let vars = game
        .entry("variables")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| PersistError::Corrupt("variables is not an object".into()))?;
    vars.insert(VAR_NAME.into(), name);
    vars.insert(VAR_URL.into(), url);
    vars.entry(VAR_RULESET)
        .or_insert_with(|| json!(Ruleset::CivProject30.name()));
    vars.entry(VAR_EXPORT).or_insert_with(|| json!(""));
    Ok(())
}

/// v1 -> v2: technology catalogue added.
fn game_technologies(game: &mut Map<String, Value>) -> Result<(), PersistError> {
    game.entry("technologies").or_insert_with(|| json!([]));
    Ok(())
}

// === Card ===

/// v0 -> v1: tradable (-1) and non-tradable (-2) codes were stored swapped.
fn card_unswap_calamities(card: &mut Map<String, Value>) -> Result<(), PersistError> {
    let fixed = match card.get("card_type").and_then(Value::as_i64) {
        Some(-1) => -2,
        Some(-2) => -1,
        Some(_) => return Ok(()),
        None => return Err(PersistError::Corrupt("card without card_type".into())),
    };
    card.insert("card_type".into(), json!(fixed));
    Ok(())
}

/// v1 -> v2: supplement flag added.
fn card_supplement(card: &mut Map<String, Value>) -> Result<(), PersistError> {
    card.entry("supplement").or_insert(json!(false));
    Ok(())
}

// === Power ===

/// v0 -> v1: staging area added.
fn power_staging(power: &mut Map<String, Value>) -> Result<(), PersistError> {
    power.entry("staging").or_insert_with(|| json!([]));
    Ok(())
}

/// v1 -> v2: technology portfolio added.
fn power_portfolio(power: &mut Map<String, Value>) -> Result<(), PersistError> {
    power
        .entry("portfolio")
        .or_insert_with(|| json!({ "owned": [], "bonus": [0, 0, 0, 0, 0] }));
    Ok(())
}

// === Technology ===

/// v0 -> v1: evil flag added.
fn technology_evil(tech: &mut Map<String, Value>) -> Result<(), PersistError> {
    tech.entry("evil").or_insert(json!(false));
    Ok(())
}

// === Driver ===

fn object_mut<'a>(value: &'a mut Value, what: &str) -> Result<&'a mut Map<String, Value>, PersistError> {
    value
        .as_object_mut()
        .ok_or_else(|| PersistError::Corrupt(format!("{what} is not an object")))
}

fn array_mut<'a>(
    root: &'a mut Map<String, Value>,
    key: &str,
) -> Result<impl Iterator<Item = &'a mut Value>, PersistError> {
    match root.get_mut(key) {
        Some(Value::Array(items)) => Ok(items.iter_mut()),
        Some(_) => Err(PersistError::Corrupt(format!("{key} is not an array"))),
        None => Err(PersistError::Corrupt(format!("missing {key}"))),
    }
}

/// Stored versions of a raw document. Missing entries are version 0.
pub fn stored_versions(root: &Value) -> Result<Versions, PersistError> {
    match root.get("versions") {
        Some(v) => Ok(serde_json::from_value(v.clone())?),
        None => Ok(Versions::default()),
    }
}

/// Upgrade a raw document to the current schema in place.
pub fn upgrade(root: &mut Value) -> Result<Versions, PersistError> {
    let found = stored_versions(root)?;
    GAME.check(found.game)?;
    CARD.check(found.card)?;
    POWER.check(found.power)?;
    PLAYER.check(found.player)?;
    TECHNOLOGY.check(found.technology)?;

    let root_map = object_mut(root, "document")?;

    GAME.run(found.game, root_map)?;

    for card in array_mut(root_map, "cards")? {
        CARD.run(found.card, object_mut(card, "card")?)?;
    }
    for tech in array_mut(root_map, "technologies")? {
        TECHNOLOGY.run(found.technology, object_mut(tech, "technology")?)?;
    }
    for seat in array_mut(root_map, "seats")? {
        let seat = object_mut(seat, "seat")?;
        if let Some(power) = seat.get_mut("power") {
            POWER.run(found.power, object_mut(power, "power")?)?;
        }
        if let Some(player) = seat.get_mut("player").filter(|p| !p.is_null()) {
            PLAYER.run(found.player, object_mut(player, "player")?)?;
        }
    }

    let current = Versions::CURRENT;
    root_map.insert("versions".into(), serde_json::to_value(current)?);
    Ok(found)
}

/// Versions the chains can produce. Kept in step with [`Versions::CURRENT`].
#[must_use]
pub fn supported() -> Versions {
    Versions {
        game: GAME.current(),
        card: CARD.current(),
        power: POWER.current(),
        player: PLAYER.current(),
        technology: TECHNOLOGY.current(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v0_document() -> Value {
        json!({
            "name": "Celtic",
            "url": "http://example.org/celtic",
            "cards": [
                { "name": "Ochre", "deck": 1, "max_copies": 2, "card_type": 0, "image": "Ochre.png" },
                { "name": "Flood", "deck": 1, "max_copies": 1, "card_type": -1, "image": "1NT.png" },
                { "name": "Piracy", "deck": 1, "max_copies": 1, "card_type": -2, "image": "1T.png" }
            ],
            "seats": [
                { "power": { "name": "Egypt", "hand": [0] },
                  "player": { "name": "alice", "password": "pw", "email": "a@example.org" } },
                { "power": { "name": "Crete", "hand": [] }, "player": null }
            ],
            "decks": [[], [0, 2, 1]],
            "discards": [[], []]
        })
    }

    #[test]
    fn test_chains_match_current_versions() {
        assert_eq!(supported(), Versions::CURRENT);
    }

    #[test]
    fn test_upgrade_v0() {
        let mut doc = v0_document();
        let found = upgrade(&mut doc).unwrap();

        assert_eq!(found, Versions::default());
        assert_eq!(doc["versions"]["game"], 2);
        assert_eq!(doc["variables"]["name"], "Celtic");
        assert_eq!(doc["variables"]["url"], "http://example.org/celtic");
        assert_eq!(doc["variables"]["ruleset"], "CivProject30");
        assert_eq!(doc["variables"]["export"], "");
        assert!(doc.get("name").is_none());
        assert_eq!(doc["technologies"], json!([]));

        assert_eq!(doc["cards"][0]["card_type"], 0);
        assert_eq!(doc["cards"][1]["card_type"], -2);
        assert_eq!(doc["cards"][2]["card_type"], -1);
        assert_eq!(doc["cards"][1]["supplement"], false);

        assert_eq!(doc["seats"][0]["power"]["staging"], json!([]));
        assert_eq!(doc["seats"][1]["power"]["portfolio"]["owned"], json!([]));
    }

    #[test]
    fn test_upgrade_v1_cards_not_remapped() {
        let mut doc = v0_document();
        doc["versions"] = json!({ "game": 1, "card": 1 });
        doc["variables"] = json!({ "name": "Celtic", "ruleset": "AdvCiv" });

        upgrade(&mut doc).unwrap();

        assert_eq!(doc["cards"][1]["card_type"], -1);
        assert_eq!(doc["cards"][2]["card_type"], -2);
        assert_eq!(doc["variables"]["ruleset"], "AdvCiv");
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut doc = v0_document();
        doc["versions"] = json!({ "card": 9 });

        let err = upgrade(&mut doc).unwrap_err();
        assert!(matches!(
            err,
            PersistError::UnsupportedVersion { entity: "card", found: 9, supported: 2 }
        ));
    }

    #[test]
    fn test_missing_section_is_corrupt() {
        let mut doc = json!({ "versions": {} });
        assert!(matches!(upgrade(&mut doc), Err(PersistError::Corrupt(_))));
    }
}
