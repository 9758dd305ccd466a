//! Notifications emitted by committed pool operations.

use serde::{Deserialize, Serialize};

use super::{AccountId, Amount, Shares};
use crate::N_ASSETS;

/// A notification describing one successfully committed mutation.
///
/// Events are only produced after every ledger movement of the
/// operation has succeeded, so a consumer never observes an event for
/// an operation that was rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolEvent {
    /// `actor` sold `amount_in` of asset `from` for `amount_out` of asset `to`.
    SwapExecuted {
        actor: AccountId,
        from: usize,
        to: usize,
        amount_in: Amount,
        amount_out: Amount,
    },
    /// `actor` deposited `amounts` and received `shares_minted`.
    LiquidityAdded {
        actor: AccountId,
        amounts: [Amount; N_ASSETS],
        shares_minted: Shares,
    },
    /// `actor` burned `shares_burned` for a pro-rata basket.
    LiquidityRemoved {
        actor: AccountId,
        amounts_out: [Amount; N_ASSETS],
        shares_burned: Shares,
    },
    /// `actor` burned `shares_burned` for a single asset.
    LiquidityRemovedOneToken {
        actor: AccountId,
        asset_index: usize,
        amount_out: Amount,
        shares_burned: Shares,
    },
    /// `actor` withdrew exact `amounts_out`, burning `shares_burned`.
    LiquidityRemovedImbalance {
        actor: AccountId,
        amounts_out: [Amount; N_ASSETS],
        shares_burned: Shares,
    },
}

impl PoolEvent {
    /// The account that triggered the event.
    #[must_use]
    pub const fn actor(&self) -> AccountId {
        match self {
            Self::SwapExecuted { actor, .. }
            | Self::LiquidityAdded { actor, .. }
            | Self::LiquidityRemoved { actor, .. }
            | Self::LiquidityRemovedOneToken { actor, .. }
            | Self::LiquidityRemovedImbalance { actor, .. } => *actor,
        }
    }
}
