//! Swap and imbalance fees derived from one base rate.
//!
//! | Fee | Rate | Charged on |
//! |-----|------|------------|
//! | swap | `swap_fee` | swap output only |
//! | liquidity | `swap_fee · n / (4·(n − 1))` | the imbalance component of a liquidity operation |
//!
//! For `n = 3` the liquidity fee is `3/8` of the swap fee. A perfectly
//! proportional deposit or withdrawal has no imbalance component and so
//! pays nothing.

use primitive_types::U256;

use crate::domain::{Amount, FeeRate, Rounding};
use crate::error::AmmError;
use crate::math::{abs_diff, CheckedArithmetic, Xp};
use crate::N_ASSETS;

/// Fee schedule of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeModel {
    swap_fee: FeeRate,
    liquidity_fee: FeeRate,
}

impl FeeModel {
    /// Derives the liquidity fee from `swap_fee`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] only if the derived rate is out of
    /// range, which cannot happen for a valid `swap_fee`.
    pub fn new(swap_fee: FeeRate) -> Result<Self, AmmError> {
        let n = N_ASSETS as u64;
        let liquidity = swap_fee
            .get()
            .checked_mul(n)
            .ok_or(AmmError::Overflow("liquidity fee overflow"))?
            / (4 * (n - 1));
        Ok(Self {
            swap_fee,
            liquidity_fee: FeeRate::new(liquidity)?,
        })
    }

    /// Base rate charged on swap output.
    #[must_use]
    pub const fn swap_fee(&self) -> FeeRate {
        self.swap_fee
    }

    /// Rate charged on the imbalance component of liquidity operations.
    #[must_use]
    pub const fn liquidity_fee(&self) -> FeeRate {
        self.liquidity_fee
    }

    /// Splits a gross swap output into `(net, fee)`.
    ///
    /// The fee rounds down; the pool's advantage comes from the `− 1`
    /// applied before denormalizing the gross output.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] on arithmetic overflow.
    pub fn charge_swap(&self, gross: Amount) -> Result<(Amount, Amount), AmmError> {
        let fee = self.swap_fee.apply(gross, Rounding::Down)?;
        Ok((gross.safe_sub(&fee)?, fee))
    }

    /// Per-asset imbalance fees for a move from `before` (invariant
    /// `d0`) to `after` (invariant `d1`), in normalized units.
    ///
    /// The ideal post-operation balance of asset `k` is
    /// `before[k] · d1 / d0`; the fee is `liquidity_fee · |after[k] − ideal|`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DivisionByZero`] if `d0` is zero.
    /// - [`AmmError::Overflow`] on arithmetic overflow.
    pub fn imbalance_fees(&self, before: &Xp, after: &Xp, d0: U256, d1: U256) -> Result<Xp, AmmError> {
        if d0.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        let mut fees = [U256::zero(); N_ASSETS];
        for (k, fee) in fees.iter_mut().enumerate() {
            let ideal = before[k]
                .checked_mul(d1)
                .ok_or(AmmError::Overflow("ideal balance overflow"))?
                / d0;
            *fee = self
                .liquidity_fee
                .apply_u256(abs_diff(after[k], ideal), Rounding::Down)?;
        }
        Ok(fees)
    }
}

/// Subtracts `fees` element-wise from `balances`.
///
/// # Errors
///
/// Returns [`AmmError::Underflow`] if any fee exceeds its balance.
pub fn deduct(balances: &Xp, fees: &Xp) -> Result<Xp, AmmError> {
    let mut out = *balances;
    for (slot, fee) in out.iter_mut().zip(fees.iter()) {
        *slot = slot
            .checked_sub(*fee)
            .ok_or(AmmError::Underflow("imbalance fee exceeds balance"))?;
    }
    Ok(out)
}
