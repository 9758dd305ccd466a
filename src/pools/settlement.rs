//! All-or-nothing settlement of a priced operation.
//!
//! Order of effects:
//!
//! 1. Debit every inbound asset from the actor.
//! 2. Commit the [`Delta`] to [`PoolState`], keeping a [`Checkpoint`].
//! 3. Credit every outbound asset to the actor.
//!
//! A failure at any step restores the checkpoint (if the commit already
//! happened) and reverses every ledger movement made so far, newest
//! first.

use tracing::{error, warn};

use super::state::{Delta, PoolState};
use crate::domain::{AccountId, Amount, Token};
use crate::error::AmmError;
use crate::traits::TokenLedger;
use crate::N_ASSETS;

#[derive(Debug, Clone, Copy)]
enum Movement {
    Debit { asset: usize, amount: Amount },
    Credit { asset: usize, amount: Amount },
}

/// Ledger movements made so far by one settlement.
#[derive(Debug, Default)]
struct Journal {
    movements: Vec<Movement>,
}

impl Journal {
    fn record(&mut self, movement: Movement) {
        self.movements.push(movement);
    }

    /// Replays the opposite of every recorded movement, newest first.
    ///
    /// A compensating movement that itself fails is logged and skipped;
    /// the remaining ones are still attempted.
    fn compensate<L: TokenLedger>(
        self,
        ledger: &mut L,
        tokens: &[Token; N_ASSETS],
        actor: &AccountId,
    ) {
        for movement in self.movements.into_iter().rev() {
            let result = match movement {
                Movement::Debit { asset, amount } => ledger.credit(&tokens[asset], actor, amount),
                Movement::Credit { asset, amount } => ledger.debit(&tokens[asset], actor, amount),
            };
            if let Err(err) = result {
                error!(%actor, ?movement, %err, "compensating ledger movement failed");
            }
        }
    }
}

/// Moves tokens and commits `delta`, or leaves both state and ledger as
/// they were.
///
/// # Errors
///
/// - [`AmmError::Ledger`] if any debit or credit fails.
/// - Any error from [`PoolState::apply`].
pub(crate) fn settle<L: TokenLedger>(
    state: &mut PoolState,
    tokens: &[Token; N_ASSETS],
    delta: &Delta,
    ledger: &mut L,
) -> Result<(), AmmError> {
    let actor = delta.actor;
    let mut journal = Journal::default();

    for (asset, amount) in delta.inbound.iter().copied().enumerate() {
        if amount.is_zero() {
            continue;
        }
        if let Err(err) = ledger.debit(&tokens[asset], &actor, amount) {
            warn!(%actor, asset, %amount, %err, "inbound debit failed, rolling back");
            journal.compensate(ledger, tokens, &actor);
            return Err(err.into());
        }
        journal.record(Movement::Debit { asset, amount });
    }

    let checkpoint = state.checkpoint(&actor);
    if let Err(err) = state.apply(delta) {
        journal.compensate(ledger, tokens, &actor);
        return Err(err);
    }

    for (asset, amount) in delta.outbound.iter().copied().enumerate() {
        if amount.is_zero() {
            continue;
        }
        if let Err(err) = ledger.credit(&tokens[asset], &actor, amount) {
            warn!(%actor, asset, %amount, %err, "outbound credit failed, rolling back");
            state.restore(checkpoint);
            journal.compensate(ledger, tokens, &actor);
            return Err(err.into());
        }
        journal.record(Movement::Credit { asset, amount });
    }

    Ok(())
}
