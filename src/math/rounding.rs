//! Rounding helpers for integer division.
//!
//! # Convention
//!
//! **Always round against the user** (pool-favorable):
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Swap / withdrawal output | [`Rounding::Down`] |
//! | Shares minted | [`Rounding::Down`] |
//! | Shares burned for exact amounts | [`Rounding::Up`] |
//!
//! # Examples
//!
//! ```
//! use tripool_amm::domain::Rounding;
//! use tripool_amm::math::{div_round_u256, U256};
//!
//! let (n, d) = (U256::from(10u64), U256::from(3u64));
//! assert_eq!(div_round_u256(n, d, Rounding::Down), Ok(U256::from(3u64)));
//! assert_eq!(div_round_u256(n, d, Rounding::Up), Ok(U256::from(4u64)));
//! ```

use primitive_types::U256;

use crate::domain::Rounding;
use crate::error::AmmError;

/// Integer division of 256-bit values with explicit rounding direction.
///
/// # Errors
///
/// Returns [`AmmError::DivisionByZero`] if `denominator` is zero.
pub fn div_round_u256(numerator: U256, denominator: U256, rounding: Rounding) -> Result<U256, AmmError> {
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let (q, r) = numerator.div_mod(denominator);
    match rounding {
        Rounding::Down => Ok(q),
        Rounding::Up if r.is_zero() => Ok(q),
        Rounding::Up => Ok(q + U256::one()),
    }
}
