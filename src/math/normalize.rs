//! Raw balances ⇄ normalized balances (`xp`).
//!
//! Each asset carries a multiplier `10^(18 − decimals) × rate`, fixed
//! at pool construction. Multiplying raw units by it lands every asset
//! on the same 18-decimal, same-unit-value scale the invariant is
//! defined over.

use primitive_types::U256;

use crate::domain::{Amount, Rounding};
use crate::error::AmmError;
use crate::N_ASSETS;

/// Normalized balances, one per asset.
pub type Xp = [U256; N_ASSETS];

/// Lifts raw balances into the normalized scale.
///
/// Infallible: a `u128` balance times a `u128` multiplier always fits
/// in 256 bits.
///
/// # Examples
///
/// ```
/// use primitive_types::U256;
/// use tripool_amm::domain::Amount;
/// use tripool_amm::math::normalize;
///
/// let xp = normalize(
///     &[Amount::new(5), Amount::new(5_000_000), Amount::new(5)],
///     &[1, 1_000_000_000_000, 1],
/// );
/// assert_eq!(xp, [U256::from(5u64), U256::from(5u64) * U256::exp10(18), U256::from(5u64)]);
/// ```
#[must_use]
pub fn normalize(balances: &[Amount; N_ASSETS], multipliers: &[u128; N_ASSETS]) -> Xp {
    core::array::from_fn(|i| balances[i].to_u256() * U256::from(multipliers[i]))
}

/// Lifts a single raw amount of one asset into the normalized scale.
#[must_use]
pub fn normalize_one(amount: Amount, multiplier: u128) -> U256 {
    amount.to_u256() * U256::from(multiplier)
}

/// Converts a normalized quantity back to raw units of one asset.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `multiplier` is zero.
/// - [`AmmError::Overflow`] if the raw result exceeds `u128`.
pub fn denormalize(value: U256, multiplier: u128, rounding: Rounding) -> Result<Amount, AmmError> {
    let raw = super::div_round_u256(value, U256::from(multiplier), rounding)?;
    Amount::try_from_u256(raw)
}
