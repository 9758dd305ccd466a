//! In-memory [`TokenLedger`] for tests and simulations.

use std::collections::HashMap;

use crate::domain::{AccountId, Amount, Token, TokenAddress};
use crate::error::LedgerError;
use crate::traits::TokenLedger;

/// Per-asset, per-owner balances plus the pool's custody account.
///
/// `debit` moves units from an owner into custody, `credit` moves them
/// from custody to a recipient. A single injected failure can be armed
/// with [`fail_on_call`](Self::fail_on_call) to exercise rollback paths.
///
/// # Examples
///
/// ```
/// use tripool_amm::domain::{AccountId, Amount, Decimals, Token, TokenAddress};
/// use tripool_amm::pools::InMemoryLedger;
/// use tripool_amm::traits::TokenLedger;
///
/// let usdc = Token::new(TokenAddress::from_bytes([2u8; 32]), Decimals::new(6).expect("valid"));
/// let alice = AccountId::from_bytes([1u8; 32]);
///
/// let mut ledger = InMemoryLedger::new();
/// ledger.mint(&usdc, &alice, Amount::new(50));
/// ledger.debit(&usdc, &alice, Amount::new(20)).expect("funded");
/// assert_eq!(ledger.balance_of(&usdc, &alice), Amount::new(30));
/// assert_eq!(ledger.custody_of(&usdc), Amount::new(20));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    accounts: HashMap<(TokenAddress, AccountId), Amount>,
    custody: HashMap<TokenAddress, Amount>,
    calls: u64,
    fail_at: Option<u64>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `amount` units of `asset` out of thin air for `owner`.
    pub fn mint(&mut self, asset: &Token, owner: &AccountId, amount: Amount) {
        let slot = self
            .accounts
            .entry((asset.address(), *owner))
            .or_default();
        *slot = Amount::new(slot.get().saturating_add(amount.get()));
    }

    /// Balance of `owner` in `asset`.
    #[must_use]
    pub fn balance_of(&self, asset: &Token, owner: &AccountId) -> Amount {
        self.accounts
            .get(&(asset.address(), *owner))
            .copied()
            .unwrap_or_default()
    }

    /// Units of `asset` held on behalf of the pool.
    #[must_use]
    pub fn custody_of(&self, asset: &Token) -> Amount {
        self.custody.get(&asset.address()).copied().unwrap_or_default()
    }

    /// Number of `debit`/`credit` calls received so far, failed ones
    /// included.
    #[must_use]
    pub const fn calls(&self) -> u64 {
        self.calls
    }

    /// Makes the `n`-th call from now (0-based) fail with
    /// [`LedgerError::Rejected`]. Only that one call fails.
    pub fn fail_on_call(&mut self, n: u64) {
        self.fail_at = Some(self.calls + n);
    }

    fn tick(&mut self) -> Result<(), LedgerError> {
        let call = self.calls;
        self.calls += 1;
        if self.fail_at == Some(call) {
            self.fail_at = None;
            return Err(LedgerError::Rejected("injected failure"));
        }
        Ok(())
    }
}

impl TokenLedger for InMemoryLedger {
    fn debit(
        &mut self,
        asset: &Token,
        owner: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.tick()?;
        let key = (asset.address(), *owner);
        let held = self.accounts.get(&key).copied().unwrap_or_default();
        let remaining = held
            .checked_sub(&amount)
            .ok_or(LedgerError::InsufficientBalance)?;
        let pooled = self
            .custody_of(asset)
            .checked_add(&amount)
            .ok_or(LedgerError::Rejected("custody overflow"))?;
        self.accounts.insert(key, remaining);
        self.custody.insert(asset.address(), pooled);
        Ok(())
    }

    fn credit(
        &mut self,
        asset: &Token,
        recipient: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.tick()?;
        let pooled = self
            .custody_of(asset)
            .checked_sub(&amount)
            .ok_or(LedgerError::Rejected("custody below credit"))?;
        let received = self
            .balance_of(asset, recipient)
            .checked_add(&amount)
            .ok_or(LedgerError::Rejected("recipient balance overflow"))?;
        self.custody.insert(asset.address(), pooled);
        self.accounts.insert((asset.address(), *recipient), received);
        Ok(())
    }
}
