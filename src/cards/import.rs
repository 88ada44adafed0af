//! Catalogue import from line-oriented text lists.
//!
//! ## Card lists
//!
//! One card per line: `deck max_copies [supplement] name`. The supplement
//! column (0/1) is present unless the ruleset is `AdvCiv`. A negative first
//! column is a calamity type code; the calamity belongs to the deck of the
//! last commodity line above it.
//!
//! ```text
//! 1 7 0 Ochre
//! 1 6 0 Hides
//! -2 1 0 Volcano
//! ```
//!
//! ## Technology lists
//!
//! Tab-separated: cost, name, five group flags, five group credits, an
//! optional credit target and amount, abbreviation, and an evil flag (Y/N).
//!
//! ## Power lists
//!
//! One power name per line.

use rustc_hash::FxHashMap;

use super::definition::{Card, CardType};
use super::registry::Catalogue;
use super::technology::{Group, GroupCredits, GroupSet, TechCard, TechId, GROUP_COUNT};
use crate::core::error::{EngineError, EngineResult};

fn parse_error(line: usize, what: impl std::fmt::Display) -> EngineError {
    EngineError::UnableToParse(format!("line {line}: {what}"))
}

/// Split off the first whitespace-delimited token.
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

fn parse_int<T: std::str::FromStr>(line: usize, field: &str, what: &str) -> EngineResult<T> {
    field
        .trim()
        .parse()
        .map_err(|_| parse_error(line, format!("bad {what} '{field}'")))
}

fn parse_flag(line: usize, field: &str) -> EngineResult<bool> {
    match field.trim().to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "x" | "true" => Ok(true),
        "0" | "n" | "no" | "" | "false" => Ok(false),
        other => Err(parse_error(line, format!("bad flag '{other}'"))),
    }
}

/// Parse a card list.
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
pub fn parse_card_list(text: &str, supplement_column: bool) -> EngineResult<Vec<Card>> {
    let mut cards = Vec::new();
    let mut last_deck: Option<usize> = None;

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let (deck_field, rest) = next_token(raw).ok_or_else(|| parse_error(line, "empty"))?;
        let (max_field, rest) =
            next_token(rest).ok_or_else(|| parse_error(line, "missing copy count"))?;
        let (supplement, rest) = if supplement_column {
            let (flag, rest) =
                next_token(rest).ok_or_else(|| parse_error(line, "missing supplement flag"))?;
            (parse_flag(line, flag)?, rest)
        } else {
            (false, rest)
        };

        let name = rest.trim();
        if name.is_empty() {
            return Err(parse_error(line, "missing card name"));
        }

        let code: i64 = parse_int(line, deck_field, "deck")?;
        let max_copies: u32 = parse_int(line, max_field, "copy count")?;

        let (deck, card_type) = if code < 0 {
            let card_type = i8::try_from(code)
                .ok()
                .and_then(CardType::from_code)
                .ok_or_else(|| parse_error(line, format!("unknown card type {code}")))?;
            let deck = last_deck
                .ok_or_else(|| parse_error(line, "calamity before any commodity"))?;
            (deck, card_type)
        } else {
            let deck = usize::try_from(code).map_err(|_| parse_error(line, "bad deck"))?;
            last_deck = Some(deck);
            (deck, CardType::Normal)
        };

        cards.push(Card::new(name, deck, max_copies, card_type).with_supplement(supplement));
    }

    Ok(cards)
}

/// Parse a power list: one trimmed name per non-blank line.
pub fn parse_power_list(text: &str) -> EngineResult<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }
        if names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            return Err(parse_error(i + 1, format!("duplicate power '{name}'")));
        }
        names.push(name.to_string());
    }
    Ok(names)
}

/// One technology line before credit targets are resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TechRecord {
    /// Definition without per-card credits.
    pub card: TechCard,
    /// Optional `(target name, amount)` credit.
    pub credit: Option<(String, i64)>,
}

/// Parse a tab-separated technology list.
pub fn parse_technology_list(text: &str) -> EngineResult<Vec<TechRecord>> {
    const BASE: usize = 2 + 2 * GROUP_COUNT;

    let mut records = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = raw.split('\t').map(str::trim).collect();
        let has_credit = match fields.len() {
            n if n == BASE + 2 => false,
            n if n == BASE + 4 => true,
            n => return Err(parse_error(line, format!("expected 14 or 16 fields, found {n}"))),
        };

        let cost: i64 = parse_int(line, fields[0], "cost")?;
        let name = fields[1];
        if name.is_empty() {
            return Err(parse_error(line, "missing technology name"));
        }

        let mut groups = GroupSet::empty();
        for (g, field) in Group::ALL.into_iter().zip(&fields[2..2 + GROUP_COUNT]) {
            if parse_flag(line, field)? {
                groups.insert(g);
            }
        }

        let mut credits = [0i64; GROUP_COUNT];
        for (slot, field) in credits.iter_mut().zip(&fields[2 + GROUP_COUNT..BASE]) {
            *slot = parse_int(line, field, "group credit")?;
        }

        let credit = if has_credit {
            let amount: i64 = parse_int(line, fields[BASE + 1], "credit amount")?;
            Some((fields[BASE].to_string(), amount))
        } else {
            None
        };

        let tail = if has_credit { BASE + 2 } else { BASE };
        let abbreviation = fields[tail];
        let evil = parse_flag(line, fields[tail + 1])?;

        records.push(TechRecord {
            card: TechCard::new(name, abbreviation, cost)
                .with_groups(groups)
                .with_group_credits(GroupCredits::from_array(credits))
                .with_evil(evil),
            credit,
        });
    }
    Ok(records)
}

/// Add parsed technologies to a catalogue, resolving credit targets.
///
/// Targets may name technologies already in the catalogue or anywhere in
/// the batch. The catalogue is unchanged if any record fails.
pub fn add_technologies(catalogue: &mut Catalogue, records: Vec<TechRecord>) -> EngineResult<Vec<TechId>> {
    let base = catalogue.technology_count();
    let mut batch: FxHashMap<String, TechId> = FxHashMap::default();

    for (offset, record) in records.iter().enumerate() {
        let key = record.card.name.to_ascii_lowercase();
        if catalogue.find_technology(&key).is_some() || batch.contains_key(&key) {
            return Err(EngineError::DuplicateCard(record.card.name.clone()));
        }
        batch.insert(key, TechId::new((base + offset) as u32));
    }

    let mut resolved = Vec::with_capacity(records.len());
    for record in records {
        let mut card = record.card;
        if let Some((target, amount)) = record.credit {
            let id = catalogue
                .find_technology(&target)
                .or_else(|| batch.get(&target.to_ascii_lowercase()).copied())
                .ok_or_else(|| EngineError::TechnologyNotFound(target.clone()))?;
            card = card.with_card_credit(id, amount);
        }
        resolved.push(card);
    }

    resolved
        .into_iter()
        .map(|card| catalogue.add_technology(card))
        .collect()
}
