//! Technology ("civilization advance") cards.
//!
//! Technologies are bought, never traded. Each belongs to one or more of
//! five groups and may grant purchase credits:
//! - per-group credits, applying to later purchases in that group
//! - per-card credits, applying to one specific other technology

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Index of a technology in the catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechId(pub u32);

impl TechId {
    /// Create a new technology ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Catalogue slot.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TechId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tech({})", self.0)
    }
}

/// Number of technology groups.
pub const GROUP_COUNT: usize = 5;

/// Technology group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Group {
    Craft,
    Science,
    Art,
    Civic,
    Religion,
}

impl Group {
    /// All groups in index order.
    pub const ALL: [Group; GROUP_COUNT] = [
        Group::Craft,
        Group::Science,
        Group::Art,
        Group::Civic,
        Group::Religion,
    ];

    /// Position in credit vectors.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Group::Craft => "Craft",
            Group::Science => "Science",
            Group::Art => "Art",
            Group::Civic => "Civic",
            Group::Religion => "Religion",
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a group from user text.
///
/// Matches the first group whose name contains `text`, ignoring case, so
/// `"sci"` and `"RELIG"` both resolve. Empty text matches nothing.
#[must_use]
pub fn group_from_string(text: &str) -> Option<Group> {
    let needle = text.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return None;
    }
    Group::ALL
        .into_iter()
        .find(|g| g.name().to_ascii_lowercase().contains(&needle))
}

/// Fixed-size set of groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupSet(u8);

impl GroupSet {
    /// Empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from a list of groups.
    #[must_use]
    pub fn of(groups: &[Group]) -> Self {
        groups.iter().fold(Self::empty(), |set, &g| set.with(g))
    }

    /// Add a group (builder pattern).
    #[must_use]
    pub const fn with(self, group: Group) -> Self {
        Self(self.0 | (1 << group as u8))
    }

    /// Add a group in place.
    pub fn insert(&mut self, group: Group) {
        self.0 |= 1 << group as u8;
    }

    /// Membership test.
    #[must_use]
    pub const fn contains(self, group: Group) -> bool {
        self.0 & (1 << group as u8) != 0
    }

    /// True if no group is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate members in index order.
    pub fn iter(self) -> impl Iterator<Item = Group> {
        Group::ALL.into_iter().filter(move |&g| self.contains(g))
    }
}

/// Credit amount per group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupCredits([i64; GROUP_COUNT]);

impl GroupCredits {
    /// All-zero credits.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0; GROUP_COUNT])
    }

    /// Build from raw per-group amounts in index order.
    #[must_use]
    pub const fn from_array(values: [i64; GROUP_COUNT]) -> Self {
        Self(values)
    }

    /// Set one group's credit (builder pattern).
    #[must_use]
    pub fn with(mut self, group: Group, amount: i64) -> Self {
        self.0[group.index()] = amount;
        self
    }

    /// Credit for a group.
    #[must_use]
    pub fn get(&self, group: Group) -> i64 {
        self.0[group.index()]
    }

    /// Add to a group's credit and return the new total. Returns `None`
    /// and leaves the credit unchanged if the total would overflow.
    pub fn add(&mut self, group: Group, amount: i64) -> Option<i64> {
        let total = self.0[group.index()].checked_add(amount)?;
        self.0[group.index()] = total;
        Some(total)
    }

    /// Raw amounts in index order.
    #[must_use]
    pub fn as_array(&self) -> &[i64; GROUP_COUNT] {
        &self.0
    }
}

/// Credit one technology grants toward buying another specific one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCredit {
    /// Technology discounted.
    pub target: TechId,
    /// Discount amount.
    pub amount: i64,
}

/// Static technology card description.
///
/// ```
/// use civ_ledger::cards::{Group, GroupCredits, GroupSet, TechCard};
///
/// let bronze = TechCard::new("Bronze Working", "BW", 10)
///     .with_groups(GroupSet::of(&[Group::Craft]))
///     .with_group_credits(GroupCredits::zero().with(Group::Craft, 3));
/// assert!(bronze.groups.contains(Group::Craft));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechCard {
    /// Unique (ignoring case) technology name.
    pub name: String,

    /// Short name.
    pub abbreviation: String,

    /// Image asset name.
    pub image: String,

    /// Base purchase cost.
    pub cost: i64,

    /// Groups this technology belongs to.
    pub groups: GroupSet,

    /// Discounts toward specific other technologies.
    pub card_credits: SmallVec<[CardCredit; 1]>,

    /// Discounts toward whole groups.
    pub group_credits: GroupCredits,

    /// Marked as an "evil" advance by the ruleset.
    #[serde(default)]
    pub evil: bool,
}

impl TechCard {
    /// Create a technology with no groups or credits.
    #[must_use]
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>, cost: i64) -> Self {
        let name = name.into();
        let image = format!("{name}.png");
        Self {
            name,
            abbreviation: abbreviation.into(),
            image,
            cost,
            groups: GroupSet::empty(),
            card_credits: SmallVec::new(),
            group_credits: GroupCredits::zero(),
            evil: false,
        }
    }

    /// Set group membership (builder pattern).
    #[must_use]
    pub fn with_groups(mut self, groups: GroupSet) -> Self {
        self.groups = groups;
        self
    }

    /// Set group credits (builder pattern).
    #[must_use]
    pub fn with_group_credits(mut self, credits: GroupCredits) -> Self {
        self.group_credits = credits;
        self
    }

    /// Add a per-card credit (builder pattern).
    #[must_use]
    pub fn with_card_credit(mut self, target: TechId, amount: i64) -> Self {
        self.card_credits.push(CardCredit { target, amount });
        self
    }

    /// Set the evil flag (builder pattern).
    #[must_use]
    pub fn with_evil(mut self, evil: bool) -> Self {
        self.evil = evil;
        self
    }

    /// Credit this technology grants toward `target`.
    #[must_use]
    pub fn credit_toward(&self, target: TechId) -> i64 {
        self.card_credits
            .iter()
            .filter(|c| c.target == target)
            .map(|c| c.amount)
            .sum()
    }

    /// Case-insensitive name match.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}
