//! Owned pool state and its commit/restore mechanics.
//!
//! Every mutating operation describes its effect as one [`Delta`] and
//! commits it with [`PoolState::apply`], which validates all checked
//! arithmetic before writing anything. A [`Checkpoint`] taken just
//! before the commit captures exactly the entries a delta can touch,
//! so a later ledger failure can put them back.

use std::collections::HashMap;

use crate::domain::{AccountId, Amount, Shares};
use crate::error::AmmError;
use crate::N_ASSETS;

/// Balances, share supply, and per-owner bookkeeping of one pool.
///
/// `Σ shares_of == total_shares` holds after every [`apply`](Self::apply)
/// and [`restore`](Self::restore).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolState {
    balances: [Amount; N_ASSETS],
    total_shares: Shares,
    shares_of: HashMap<AccountId, Shares>,
    deposited_of: HashMap<AccountId, [Amount; N_ASSETS]>,
}

/// The full effect of one operation on [`PoolState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    /// Owner of the shares and deposits being changed.
    pub actor: AccountId,
    /// Raw units entering the pool, per asset.
    pub inbound: [Amount; N_ASSETS],
    /// Raw units leaving the pool, per asset.
    pub outbound: [Amount; N_ASSETS],
    /// Shares minted to `actor`.
    pub minted: Shares,
    /// Shares burned from `actor`.
    pub burned: Shares,
    /// Whether `inbound`/`outbound` count as deposits/withdrawals of
    /// `actor` (false for swaps).
    pub track_deposits: bool,
}

impl Delta {
    /// A delta that moves nothing.
    #[must_use]
    pub const fn empty(actor: AccountId) -> Self {
        Self {
            actor,
            inbound: [Amount::ZERO; N_ASSETS],
            outbound: [Amount::ZERO; N_ASSETS],
            minted: Shares::ZERO,
            burned: Shares::ZERO,
            track_deposits: false,
        }
    }
}

/// Pre-commit copy of everything a [`Delta`] for one actor can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    actor: AccountId,
    balances: [Amount; N_ASSETS],
    total_shares: Shares,
    shares: Option<Shares>,
    deposited: Option<[Amount; N_ASSETS]>,
}

impl PoolState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw balances per asset.
    #[must_use]
    pub const fn balances(&self) -> [Amount; N_ASSETS] {
        self.balances
    }

    /// Total shares outstanding.
    #[must_use]
    pub const fn total_shares(&self) -> Shares {
        self.total_shares
    }

    /// Shares held by `owner`.
    #[must_use]
    pub fn shares_of(&self, owner: &AccountId) -> Shares {
        self.shares_of.get(owner).copied().unwrap_or_default()
    }

    /// Net deposits of `owner`, floored at zero.
    #[must_use]
    pub fn deposited_of(&self, owner: &AccountId) -> [Amount; N_ASSETS] {
        self.deposited_of.get(owner).copied().unwrap_or_default()
    }

    /// Number of owners holding a non-zero share balance.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        self.shares_of.len()
    }

    /// Captures the entries `actor`'s next delta can touch.
    #[must_use]
    pub fn checkpoint(&self, actor: &AccountId) -> Checkpoint {
        Checkpoint {
            actor: *actor,
            balances: self.balances,
            total_shares: self.total_shares,
            shares: self.shares_of.get(actor).copied(),
            deposited: self.deposited_of.get(actor).copied(),
        }
    }

    /// Puts back every entry captured by `checkpoint`.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.balances = checkpoint.balances;
        self.total_shares = checkpoint.total_shares;
        match checkpoint.shares {
            Some(s) => self.shares_of.insert(checkpoint.actor, s),
            None => self.shares_of.remove(&checkpoint.actor),
        };
        match checkpoint.deposited {
            Some(d) => self.deposited_of.insert(checkpoint.actor, d),
            None => self.deposited_of.remove(&checkpoint.actor),
        };
    }

    /// Commits `delta`.
    ///
    /// All new values are computed first; nothing is written unless every
    /// step succeeds.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientBalance`] if an outbound amount exceeds
    ///   the pool balance.
    /// - [`AmmError::InvalidSharesAmount`] if `burned` exceeds the
    ///   actor's shares.
    /// - [`AmmError::Overflow`] on balance or share overflow.
    pub fn apply(&mut self, delta: &Delta) -> Result<(), AmmError> {
        let mut balances = self.balances;
        for (k, balance) in balances.iter_mut().enumerate() {
            *balance = balance
                .checked_add(&delta.inbound[k])
                .ok_or(AmmError::Overflow("pool balance overflow"))?
                .checked_sub(&delta.outbound[k])
                .ok_or(AmmError::InsufficientBalance)?;
        }

        let total_shares = self
            .total_shares
            .checked_add(&delta.minted)
            .ok_or(AmmError::Overflow("share supply overflow"))?
            .checked_sub(&delta.burned)
            .ok_or(AmmError::InvalidSharesAmount("burn exceeds share supply"))?;
        let owner_shares = self
            .shares_of(&delta.actor)
            .checked_add(&delta.minted)
            .ok_or(AmmError::Overflow("owner shares overflow"))?
            .checked_sub(&delta.burned)
            .ok_or(AmmError::InvalidSharesAmount("shares exceed owner balance"))?;

        let deposited = if delta.track_deposits {
            let mut d = self.deposited_of(&delta.actor);
            for (k, slot) in d.iter_mut().enumerate() {
                *slot = slot
                    .checked_add(&delta.inbound[k])
                    .ok_or(AmmError::Overflow("deposit tracking overflow"))?
                    .saturating_sub(&delta.outbound[k]);
            }
            Some(d)
        } else {
            None
        };

        self.balances = balances;
        self.total_shares = total_shares;
        if owner_shares.is_zero() {
            self.shares_of.remove(&delta.actor);
        } else {
            self.shares_of.insert(delta.actor, owner_shares);
        }
        if let Some(d) = deposited {
            if d.iter().all(Amount::is_zero) {
                self.deposited_of.remove(&delta.actor);
            } else {
                self.deposited_of.insert(delta.actor, d);
            }
        }
        Ok(())
    }

    /// Sum of every owner's shares; equals [`total_shares`](Self::total_shares).
    #[must_use]
    pub fn sum_of_shares(&self) -> u128 {
        self.shares_of.values().map(Shares::get).sum()
    }
}
