//! Liquidity share units.

use core::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// Fungible pool ownership units, 18-decimal fixed point.
///
/// Distinct from [`Amount`](super::Amount) because shares measure a
/// proportional claim on the whole pool rather than units of one asset.
/// The first depositor receives shares equal to the invariant `D`, so
/// one share starts out worth one normalized unit.
///
/// # Examples
///
/// ```
/// use tripool_amm::domain::Shares;
///
/// let a = Shares::new(1_000);
/// let b = Shares::new(2_000);
/// assert_eq!(a.checked_add(&b), Some(Shares::new(3_000)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Shares(u128);

impl Shares {
    /// No shares.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Shares` value from a raw `u128`.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Widens into the 256-bit solver domain.
    #[must_use]
    pub fn to_u256(self) -> U256 {
        U256::from(self.0)
    }

    /// Narrows a 256-bit share count.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if `value` does not fit in `u128`.
    pub fn try_from_u256(value: U256) -> Result<Self, AmmError> {
        u128::try_from(value)
            .map(Self)
            .map_err(|_| AmmError::Overflow("shares exceed u128"))
    }
}

impl fmt::Display for Shares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
