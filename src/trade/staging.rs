//! Staged card transfers between powers.
//!
//! Every transfer between two powers follows the same three steps:
//!
//! 1. **Stage**: each side's outgoing cards leave its held hand and go into
//!    its own staging area. Both sides are checked for containment before
//!    either hand is touched.
//! 2. **Swap**: the two staging areas trade places. This cannot fail.
//! 3. **Merge**: each staging area is folded into its owner's held hand and
//!    emptied.
//!
//! Cards left in a staging area from earlier (a loaded game may carry some)
//! still belong to their power. An exchange first folds them back into the
//! held hand, so only the outgoing cards cross over.
//!
//! Once both sides are known to hold their outgoing cards the exchange
//! always completes. If either side falls short, neither hand changes.

use tracing::{debug, info};

use crate::core::error::{EngineError, EngineResult};
use crate::core::player::{Power, PowerId};
use crate::core::state::Game;
use crate::zones::{Hand, Shortfall};

/// Move `subset` out of `source` into `staging`.
///
/// Fails without touching either hand unless `source` holds all of
/// `subset`. Staged cards are added to whatever `staging` already holds, so
/// no copy is ever dropped. Callers that need `staging` to end up equal to
/// `subset` must start from an empty staging area, as [`exchange_between`]
/// does.
///
/// ```
/// use civ_ledger::cards::CardId;
/// use civ_ledger::trade::stage;
/// use civ_ledger::zones::Hand;
///
/// let sword = CardId::new(0);
/// let mut hand = Hand::from_ids([sword, sword]);
/// let mut staging = Hand::new();
///
/// stage(&mut hand, &mut staging, &Hand::from_ids([sword])).unwrap();
/// assert!(stage(&mut hand, &mut staging, &Hand::from_ids([sword, sword])).is_err());
/// assert_eq!(hand.count(sword), 1);
/// assert_eq!(staging.count(sword), 1);
/// ```
pub fn stage(source: &mut Hand, staging: &mut Hand, subset: &Hand) -> Result<(), Shortfall> {
    source.remove(subset)?;
    staging.merge(subset);
    debug!(cards = subset.len(), "Staged");
    Ok(())
}

/// Fold a staging area back into its held hand.
pub fn unstage(hand: &mut Hand, staging: &mut Hand) {
    hand.merge(&staging.take());
}

/// Exchange staging areas between two powers.
pub fn swap_staging(a: &mut Power, b: &mut Power) {
    std::mem::swap(&mut a.staging, &mut b.staging);
}

/// Everything a power holds, staged or not.
fn holdings(power: &Power) -> Hand {
    let mut all = power.hand.clone();
    all.merge(&power.staging);
    all
}

/// Run the stage/swap/merge exchange on two powers.
///
/// Both containment checks happen before any card moves. Leftover staged
/// cards count as held and stay with their owner.
pub fn exchange_between(a: &mut Power, b: &mut Power, from_a: &Hand, from_b: &Hand) -> Result<(), Shortfall> {
    if let Some(short) = holdings(a).shortfall(from_a) {
        return Err(short);
    }
    if let Some(short) = holdings(b).shortfall(from_b) {
        return Err(short);
    }

    unstage(&mut a.hand, &mut a.staging);
    unstage(&mut b.hand, &mut b.staging);

    stage(&mut a.hand, &mut a.staging, from_a)?;
    stage(&mut b.hand, &mut b.staging, from_b)?;

    swap_staging(a, b);

    unstage(&mut a.hand, &mut a.staging);
    unstage(&mut b.hand, &mut b.staging);
    Ok(())
}

/// Exchange cards between two powers of a game.
pub fn exchange(game: &mut Game, a: PowerId, b: PowerId, from_a: &Hand, from_b: &Hand) -> EngineResult<()> {
    let (pa, pb) = game
        .power_pair_mut(a, b)
        .ok_or_else(|| EngineError::UnableToParse(format!("cannot exchange between {a} and {b}")))?;

    match exchange_between(pa, pb, from_a, from_b) {
        Ok(()) => Ok(()),
        Err(short) => Err(short.into_error(game.catalogue())),
    }
}

/// Two-party trade: each side must give at least the configured minimum.
pub fn trade(game: &mut Game, a: PowerId, b: PowerId, from_a: &Hand, from_b: &Hand) -> EngineResult<()> {
    let min = game.config().min_trade_cards;
    if from_a.len() < min || from_b.len() < min {
        return Err(EngineError::UnableToParse(format!(
            "a trade needs at least {min} cards from each side"
        )));
    }

    exchange(game, a, b, from_a, from_b)?;

    info!(
        from = %game.power(a).name,
        to = %game.power(b).name,
        gave = from_a.len(),
        got = from_b.len(),
        "Trade completed"
    );
    Ok(())
}

/// One-way transfer: `cards` go from `from` to `to`, nothing comes back.
pub fn give(game: &mut Game, from: PowerId, to: PowerId, cards: &Hand) -> EngineResult<()> {
    exchange(game, from, to, cards, &Hand::new())?;
    info!(
        from = %game.power(from).name,
        to = %game.power(to).name,
        cards = cards.len(),
        "Gave cards"
    );
    Ok(())
}
