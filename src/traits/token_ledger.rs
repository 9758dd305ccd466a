//! The external token-movement collaborator.
//!
//! The pool never holds tokens itself. Every inbound and outbound unit
//! moves through a [`TokenLedger`], invoked only at the commit points of
//! an operation:
//!
//! 1. **Debit** — pull each inbound asset from the actor, before any
//!    pool state changes.
//! 2. **Credit** — push each outbound asset to the actor, after pool
//!    state has been committed.
//!
//! A ledger failure at either point aborts the operation. The pool then
//! restores its pre-operation state and issues compensating movements
//! (a credit for every debit already made, a debit for every credit)
//! in reverse order.

use crate::domain::{AccountId, Amount, Token};
use crate::error::LedgerError;

/// Moves token units between owners and the pool.
///
/// Implementations must be all-or-nothing per call: a failed `debit`
/// or `credit` has moved nothing.
///
/// # Reentrancy
///
/// A ledger may hold no reference to the pool it serves. Pool methods
/// take `&mut self` while calling into the ledger, so reentering the
/// same pool from a ledger callback does not compile.
pub trait TokenLedger {
    /// Moves `amount` of `asset` from `owner` into the pool.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientBalance`] if `owner` holds less
    ///   than `amount`.
    /// - [`LedgerError::Rejected`] for any other refusal.
    fn debit(&mut self, asset: &Token, owner: &AccountId, amount: Amount)
        -> Result<(), LedgerError>;

    /// Moves `amount` of `asset` from the pool to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Rejected`] if the movement is refused.
    fn credit(
        &mut self,
        asset: &Token,
        recipient: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}

impl<L: TokenLedger + ?Sized> TokenLedger for &mut L {
    fn debit(
        &mut self,
        asset: &Token,
        owner: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        (**self).debit(asset, owner, amount)
    }

    fn credit(
        &mut self,
        asset: &Token,
        recipient: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        (**self).credit(asset, recipient, amount)
    }
}
