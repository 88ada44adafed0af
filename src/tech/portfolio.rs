//! Technology portfolio and purchase cost engine.
//!
//! A power's portfolio is the set of technologies it owns plus a vector of
//! manually granted per-group bonus credits.
//!
//! ## Cost rule
//!
//! The price of a candidate technology is its base cost, minus every
//! per-card credit an owned technology grants toward it, minus the single
//! largest group credit among the candidate's groups. A group's credit is the
//! sum of that group's credits over all owned technologies plus the bonus
//! credit for the group. Only the largest group applies; group credits are
//! never added across groups.
//!
//! The result is not clamped: a negative cost is returned as is.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use crate::cards::{Catalogue, Group, GroupCredits, TechId};
use crate::core::error::{EngineError, EngineResult};

/// Technologies owned by one power.
///
/// ```
/// use civ_ledger::cards::{Catalogue, Group, GroupCredits, GroupSet, TechCard};
/// use civ_ledger::tech::TechPortfolio;
///
/// let mut catalogue = Catalogue::new();
/// let bronze = catalogue.add_technology(
///     TechCard::new("Bronze", "Br", 10)
///         .with_group_credits(GroupCredits::zero().with(Group::Craft, 3)),
/// ).unwrap();
/// let wheel = catalogue.add_technology(
///     TechCard::new("Wheel", "Wh", 8).with_groups(GroupSet::of(&[Group::Craft])),
/// ).unwrap();
///
/// let mut portfolio = TechPortfolio::new();
/// portfolio.acquire(bronze);
/// assert_eq!(portfolio.cost(&catalogue, wheel), 5);
/// assert_eq!(portfolio.cost(&catalogue, bronze), 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechPortfolio {
    /// Owned technologies.
    owned: OrdSet<TechId>,

    /// Manually granted credit per group.
    #[serde(default)]
    bonus: GroupCredits,
}

impl TechPortfolio {
    /// Create an empty portfolio.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check ownership.
    #[must_use]
    pub fn owns(&self, tech: TechId) -> bool {
        self.owned.contains(&tech)
    }

    /// Add a technology. Returns false if it was already owned.
    pub fn acquire(&mut self, tech: TechId) -> bool {
        self.owned.insert(tech).is_none()
    }

    /// Number of technologies owned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owned.len()
    }

    /// True if nothing is owned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }

    /// Owned technologies in id order.
    pub fn owned(&self) -> impl Iterator<Item = TechId> + '_ {
        self.owned.iter().copied()
    }

    /// Manually granted credits.
    #[must_use]
    pub fn bonus(&self) -> &GroupCredits {
        &self.bonus
    }

    /// Grant (or, with a negative amount, revoke) bonus credit for a group.
    /// Returns the group's new bonus total.
    ///
    /// # Errors
    ///
    /// `UnableToParse` if the total would not fit in an `i64`. The bonus is
    /// left unchanged.
    pub fn grant(&mut self, group: Group, amount: i64) -> EngineResult<i64> {
        self.bonus
            .add(group, amount)
            .ok_or_else(|| EngineError::UnableToParse(format!("{group} credit out of range: {amount}")))
    }

    /// Total credit toward a group: owned technologies' group credits plus
    /// the bonus.
    #[must_use]
    pub fn group_credit(&self, catalogue: &Catalogue, group: Group) -> i64 {
        self.owned
            .iter()
            .map(|&t| catalogue.technology(t).group_credits.get(group))
            .fold(self.bonus.get(group), i64::saturating_add)
    }

    /// Purchase cost of `candidate` for this portfolio.
    #[must_use]
    pub fn cost(&self, catalogue: &Catalogue, candidate: TechId) -> i64 {
        if self.owns(candidate) {
            return 0;
        }

        let card = catalogue.technology(candidate);

        let card_credit = self
            .owned
            .iter()
            .map(|&t| catalogue.technology(t).credit_toward(candidate))
            .fold(0, i64::saturating_add);

        let group_credit = card
            .groups
            .iter()
            .map(|g| self.group_credit(catalogue, g))
            .max()
            .unwrap_or(0);

        card.cost.saturating_sub(card_credit).saturating_sub(group_credit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{GroupSet, TechCard};

    fn catalogue() -> (Catalogue, [TechId; 4]) {
        let mut c = Catalogue::new();
        let pottery = c
            .add_technology(
                TechCard::new("Pottery", "Pot", 45)
                    .with_groups(GroupSet::of(&[Group::Craft]))
                    .with_group_credits(GroupCredits::zero().with(Group::Craft, 10).with(Group::Art, 5)),
            )
            .unwrap();
        let mysticism = c
            .add_technology(
                TechCard::new("Mysticism", "Mys", 50)
                    .with_groups(GroupSet::of(&[Group::Art, Group::Religion]))
                    .with_group_credits(GroupCredits::zero().with(Group::Art, 10).with(Group::Religion, 5)),
            )
            .unwrap();
        let philosophy = c
            .add_technology(
                TechCard::new("Philosophy", "Phi", 220)
                    .with_groups(GroupSet::of(&[Group::Art, Group::Religion, Group::Science])),
            )
            .unwrap();
        let literacy = c
            .add_technology(
                TechCard::new("Literacy", "Lit", 110)
                    .with_groups(GroupSet::of(&[Group::Art]))
                    .with_card_credit(philosophy, 20),
            )
            .unwrap();
        (c, [pottery, mysticism, philosophy, literacy])
    }

    #[test]
    fn test_base_cost_for_empty_portfolio() {
        let (c, [pottery, _, philosophy, _]) = catalogue();
        let portfolio = TechPortfolio::new();

        assert_eq!(portfolio.cost(&c, pottery), 45);
        assert_eq!(portfolio.cost(&c, philosophy), 220);
    }

    #[test]
    fn test_owned_costs_nothing() {
        let (c, [pottery, ..]) = catalogue();
        let mut portfolio = TechPortfolio::new();
        portfolio.acquire(pottery);

        assert_eq!(portfolio.cost(&c, pottery), 0);
    }

    #[test]
    fn test_largest_group_applies_once() {
        let (c, [pottery, mysticism, philosophy, _]) = catalogue();
        let mut portfolio = TechPortfolio::new();
        portfolio.acquire(pottery);
        portfolio.acquire(mysticism);

        // Art: 5 + 10 = 15, Religion: 5, Science: 0. Only Art's 15 applies.
        assert_eq!(portfolio.group_credit(&c, Group::Art), 15);
        assert_eq!(portfolio.cost(&c, philosophy), 220 - 15);
    }

    #[test]
    fn test_card_credit_stacks_with_group_credit() {
        let (c, [pottery, _, philosophy, literacy]) = catalogue();
        let mut portfolio = TechPortfolio::new();
        portfolio.acquire(pottery);
        portfolio.acquire(literacy);

        // Literacy grants 20 toward Philosophy; Art credit is Pottery's 5.
        assert_eq!(portfolio.cost(&c, philosophy), 220 - 20 - 5);
    }

    #[test]
    fn test_bonus_credit_joins_group_total() {
        let (c, [_, _, philosophy, _]) = catalogue();
        let mut portfolio = TechPortfolio::new();
        portfolio.grant(Group::Science, 30).unwrap();
        portfolio.grant(Group::Art, 10).unwrap();

        assert_eq!(portfolio.cost(&c, philosophy), 220 - 30);
    }

    #[test]
    fn test_cost_may_go_negative() {
        let mut c = Catalogue::new();
        let cheap = c
            .add_technology(TechCard::new("Cheap", "Ch", 5).with_groups(GroupSet::of(&[Group::Civic])))
            .unwrap();
        let mut portfolio = TechPortfolio::new();
        portfolio.grant(Group::Civic, 12).unwrap();

        assert_eq!(portfolio.cost(&c, cheap), -7);
    }

    #[test]
    fn test_grant_overflow_rejected() {
        let mut portfolio = TechPortfolio::new();
        assert_eq!(portfolio.grant(Group::Craft, i64::MAX).unwrap(), i64::MAX);

        let err = portfolio.grant(Group::Craft, 1).unwrap_err();
        assert!(matches!(err, EngineError::UnableToParse(_)));
        assert_eq!(portfolio.bonus().get(Group::Craft), i64::MAX);
        assert_eq!(portfolio.grant(Group::Craft, -1).unwrap(), i64::MAX - 1);
    }

    #[test]
    fn test_extreme_credits_saturate_cost() {
        let (c, [pottery, _, philosophy, _]) = catalogue();
        let mut portfolio = TechPortfolio::new();
        portfolio.acquire(pottery);
        portfolio.grant(Group::Art, i64::MAX).unwrap();

        assert_eq!(portfolio.group_credit(&c, Group::Art), i64::MAX);
        assert_eq!(portfolio.cost(&c, philosophy), 220 - i64::MAX);

        let mut debtor = TechPortfolio::new();
        for group in [Group::Art, Group::Religion, Group::Science] {
            debtor.grant(group, i64::MIN).unwrap();
        }
        assert_eq!(debtor.cost(&c, philosophy), i64::MAX);
    }

    #[test]
    fn test_acquire_twice() {
        let mut portfolio = TechPortfolio::new();
        assert!(portfolio.acquire(TechId::new(0)));
        assert!(!portfolio.acquire(TechId::new(0)));
        assert_eq!(portfolio.len(), 1);
    }
}
