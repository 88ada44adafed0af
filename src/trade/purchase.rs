//! Technology purchases.
//!
//! A purchase pays with trade cards from the buyer's hand plus an optional
//! surplus (treasury tokens or left-over credit). The payment cards go to the
//! discard piles of their epochs and the technologies join the buyer's
//! portfolio.
//!
//! Every check runs before anything moves:
//! - no requested technology may already be owned or be requested twice
//! - the buyer must hold every payment card
//! - payment value plus surplus must cover the total cost
//!
//! The total is priced against the portfolio as it was before the purchase;
//! buying two technologies at once does not let the first discount the
//! second. Each technology's price is floored at zero.

use tracing::info;

use crate::cards::TechId;
use crate::core::error::{EngineError, EngineResult};
use crate::core::player::PowerId;
use crate::core::state::Game;
use crate::zones::Hand;

/// What a power wants to buy and how it pays.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Purchase {
    pub technologies: Vec<TechId>,
    pub payment: Hand,
    pub surplus: i64,
}

/// Result of a completed purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Total price charged.
    pub cost: i64,
    /// Payment value plus surplus.
    pub offered: i64,
}

impl Receipt {
    /// Value offered beyond the price.
    #[must_use]
    pub fn change(&self) -> i64 {
        self.offered - self.cost
    }
}

/// Total price of a set of technologies for a power, each floored at zero.
#[must_use]
pub fn quote(game: &Game, power: PowerId, technologies: &[TechId]) -> i64 {
    let portfolio = &game.power(power).portfolio;
    technologies
        .iter()
        .map(|&t| portfolio.cost(game.catalogue(), t).max(0))
        .fold(0, i64::saturating_add)
}

/// Buy technologies for a power.
pub fn buy(game: &mut Game, power: PowerId, purchase: &Purchase) -> EngineResult<Receipt> {
    let catalogue = game.catalogue();
    let buyer = game.power(power);

    for (i, &tech) in purchase.technologies.iter().enumerate() {
        if buyer.portfolio.owns(tech) || purchase.technologies[..i].contains(&tech) {
            return Err(EngineError::DuplicateTechnology(catalogue.technology(tech).name.clone()));
        }
    }

    if let Some(short) = buyer.hand.shortfall(&purchase.payment) {
        return Err(short.into_error(catalogue));
    }

    let cost = quote(game, power, &purchase.technologies);
    let offered = purchase.payment.value(catalogue).saturating_add(purchase.surplus);
    if offered < cost {
        return Err(EngineError::InsufficientFunds { cost, offered });
    }

    let buyer = game.power_mut(power);
    buyer
        .hand
        .remove(&purchase.payment)
        .map_err(|short| EngineError::CardNotFound(short.card.to_string()))?;
    for &tech in &purchase.technologies {
        buyer.portfolio.acquire(tech);
    }
    game.discard_cards(&purchase.payment);

    info!(
        power = %game.power(power).name,
        technologies = purchase.technologies.len(),
        cost,
        offered,
        "Purchase completed"
    );
    Ok(Receipt { cost, offered })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId, CardType, Group, GroupCredits, GroupSet, TechCard};
    use crate::core::config::GameConfig;
    use crate::core::rng::GameRng;

    struct Fixture {
        game: Game,
        egypt: PowerId,
        salt: CardId,
        ochre: CardId,
        bronze: TechId,
        wheel: TechId,
    }

    fn fixture() -> Fixture {
        let cards = vec![
            Card::new("Salt", 3, 9, CardType::Normal),
            Card::new("Ochre", 1, 7, CardType::Normal),
            Card::new("Hides", 2, 7, CardType::Normal),
        ];
        let mut game = Game::create_with_rng(
            GameConfig::default(),
            cards,
            vec!["Egypt".into()],
            GameRng::new(4),
        )
        .unwrap();
        let bronze = game
            .catalogue_mut()
            .add_technology(
                TechCard::new("Bronze", "Br", 10)
                    .with_groups(GroupSet::of(&[Group::Craft]))
                    .with_group_credits(GroupCredits::zero().with(Group::Craft, 3)),
            )
            .unwrap();
        let wheel = game
            .catalogue_mut()
            .add_technology(TechCard::new("Wheel", "Wh", 8).with_groups(GroupSet::of(&[Group::Craft])))
            .unwrap();

        let egypt = PowerId::new(0);
        let salt = game.find_card("Salt").unwrap();
        let ochre = game.find_card("Ochre").unwrap();
        // Salt x2 is worth 12, Ochre x1 is worth 1.
        game.power_mut(egypt).hand = Hand::from_ids([salt, salt, ochre]);

        Fixture { game, egypt, salt, ochre, bronze, wheel }
    }

    #[test]
    fn test_buy_moves_payment_to_discards() {
        let Fixture { mut game, egypt, salt, ochre, bronze, .. } = fixture();

        let receipt = buy(
            &mut game,
            egypt,
            &Purchase {
                technologies: vec![bronze],
                payment: Hand::from_ids([salt, salt]),
                surplus: 0,
            },
        )
        .unwrap();

        assert_eq!(receipt, Receipt { cost: 10, offered: 12 });
        assert_eq!(receipt.change(), 2);
        assert!(game.power(egypt).portfolio.owns(bronze));
        assert_eq!(game.power(egypt).hand, Hand::from_ids([ochre]));
        assert_eq!(game.discard(3), &Hand::from_ids([salt, salt]));
    }

    #[test]
    fn test_duplicate_rejected_before_anything_moves() {
        let Fixture { mut game, egypt, salt, bronze, .. } = fixture();
        game.power_mut(egypt).portfolio.acquire(bronze);
        let hand_before = game.power(egypt).hand.clone();

        let err = buy(
            &mut game,
            egypt,
            &Purchase {
                technologies: vec![bronze],
                payment: Hand::from_ids([salt, salt]),
                surplus: 0,
            },
        )
        .unwrap_err();

        assert_eq!(err, EngineError::DuplicateTechnology("Bronze".into()));
        assert_eq!(game.power(egypt).hand, hand_before);
        assert_eq!(game.power(egypt).portfolio.len(), 1);
        assert!(game.discard(3).is_empty());
    }

    #[test]
    fn test_repeated_request_rejected() {
        let Fixture { mut game, egypt, wheel, .. } = fixture();

        let err = buy(
            &mut game,
            egypt,
            &Purchase {
                technologies: vec![wheel, wheel],
                payment: Hand::new(),
                surplus: 100,
            },
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::DuplicateTechnology(_)));
        assert!(game.power(egypt).portfolio.is_empty());
    }

    #[test]
    fn test_insufficient_funds() {
        let Fixture { mut game, egypt, ochre, wheel, .. } = fixture();

        let err = buy(
            &mut game,
            egypt,
            &Purchase {
                technologies: vec![wheel],
                payment: Hand::from_ids([ochre]),
                surplus: 2,
            },
        )
        .unwrap_err();

        assert_eq!(err, EngineError::InsufficientFunds { cost: 8, offered: 3 });
        assert_eq!(game.power(egypt).hand.len(), 3);
    }

    #[test]
    fn test_payment_not_held() {
        let Fixture { mut game, egypt, ochre, wheel, .. } = fixture();

        let err = buy(
            &mut game,
            egypt,
            &Purchase {
                technologies: vec![wheel],
                payment: Hand::from_ids([ochre, ochre]),
                surplus: 20,
            },
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::InsufficientCopies { .. }));
        assert!(game.power(egypt).portfolio.is_empty());
    }

    #[test]
    fn test_quote_uses_pre_purchase_portfolio() {
        let Fixture { mut game, egypt, bronze, wheel, .. } = fixture();

        assert_eq!(quote(&game, egypt, &[bronze, wheel]), 18);

        game.power_mut(egypt).portfolio.acquire(bronze);
        assert_eq!(quote(&game, egypt, &[wheel]), 5);
    }

    #[test]
    fn test_negative_cost_floored() {
        let Fixture { mut game, egypt, wheel, .. } = fixture();
        game.power_mut(egypt).portfolio.grant(Group::Craft, 50).unwrap();

        assert_eq!(quote(&game, egypt, &[wheel]), 0);
        let receipt = buy(&mut game, egypt, &Purchase { technologies: vec![wheel], ..Purchase::default() }).unwrap();
        assert_eq!(receipt.cost, 0);
    }

    #[test]
    fn test_huge_surplus_saturates() {
        let Fixture { mut game, egypt, wheel, .. } = fixture();

        let purchase = Purchase { technologies: vec![wheel], surplus: i64::MAX, ..Purchase::default() };
        let receipt = buy(&mut game, egypt, &purchase).unwrap();
        assert_eq!(receipt, Receipt { cost: 8, offered: i64::MAX });
        assert_eq!(receipt.change(), i64::MAX - 8);
    }
}
