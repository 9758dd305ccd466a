//! Fee rates over a fixed denominator.

use core::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::AmmError;

/// Denominator of every [`FeeRate`]: `10^10` represents 100%.
pub const FEE_DENOMINATOR: u64 = 10_000_000_000;

/// Largest accepted swap fee (50%).
pub const MAX_SWAP_FEE: u64 = FEE_DENOMINATOR / 2;

/// A fractional rate expressed over [`FEE_DENOMINATOR`].
///
/// `4_000_000` is 0.04%. One basis point is `1_000_000`.
///
/// # Examples
///
/// ```
/// use tripool_amm::domain::{Amount, FeeRate, Rounding};
///
/// let fee = FeeRate::from_bps(4).expect("valid");
/// assert_eq!(fee.get(), 4_000_000);
/// let cut = fee.apply(Amount::new(1_000_000), Rounding::Down).expect("no overflow");
/// assert_eq!(cut, Amount::new(400));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u64", into = "u64")]
pub struct FeeRate(u64);

impl FeeRate {
    /// Zero fee.
    pub const ZERO: Self = Self(0);

    /// Creates a rate, rejecting values above 100%.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if `value > FEE_DENOMINATOR`.
    pub const fn new(value: u64) -> Result<Self, AmmError> {
        if value > FEE_DENOMINATOR {
            return Err(AmmError::InvalidFee("fee rate exceeds 100%"));
        }
        Ok(Self(value))
    }

    /// Creates a rate from basis points (1 bp = 0.01%).
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if `bps > 10_000`.
    pub const fn from_bps(bps: u32) -> Result<Self, AmmError> {
        Self::new(bps as u64 * (FEE_DENOMINATOR / 10_000))
    }

    /// Returns the numerator over [`FEE_DENOMINATOR`].
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns `true` for a zero rate.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Computes `value · rate / FEE_DENOMINATOR` in the 256-bit domain.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the product overflows.
    pub fn apply_u256(&self, value: U256, rounding: Rounding) -> Result<U256, AmmError> {
        let product = value
            .checked_mul(U256::from(self.0))
            .ok_or(AmmError::Overflow("fee product overflow"))?;
        crate::math::div_round_u256(product, U256::from(FEE_DENOMINATOR), rounding)
    }

    /// Computes the fee cut of a raw amount.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the product overflows.
    pub fn apply(&self, amount: Amount, rounding: Rounding) -> Result<Amount, AmmError> {
        Amount::try_from_u256(self.apply_u256(amount.to_u256(), rounding)?)
    }
}

impl TryFrom<u64> for FeeRate {
    type Error = AmmError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FeeRate> for u64 {
    fn from(value: FeeRate) -> Self {
        value.0
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scaled = self.0 / (FEE_DENOMINATOR / 1_000_000);
        write!(f, "{}.{:04}%", scaled / 10_000, scaled % 10_000)
    }
}
