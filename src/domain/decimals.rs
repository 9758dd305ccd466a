//! Token decimal places.

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// Precision of the pool's common normalized scale.
pub const NORMALIZED_DECIMALS: u8 = 18;

/// Number of decimal places of a token's raw unit.
///
/// Valid range is `0..=18`: the normalizer scales every asset up to 18
/// decimals, so an asset with more precision than the common scale
/// cannot be represented.
///
/// # Examples
///
/// ```
/// use tripool_amm::domain::Decimals;
///
/// let d = Decimals::new(6).expect("6 is valid");
/// assert_eq!(d.get(), 6);
/// assert_eq!(d.normalization_factor(), 1_000_000_000_000);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Decimals(u8);

impl Decimals {
    /// Zero decimal places.
    pub const ZERO: Self = Self(0);

    /// The normalized scale (18).
    pub const MAX: Self = Self(NORMALIZED_DECIMALS);

    /// Creates a new `Decimals` value after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPrecision`] if `value` exceeds 18.
    pub const fn new(value: u8) -> Result<Self, AmmError> {
        if value > NORMALIZED_DECIMALS {
            return Err(AmmError::InvalidPrecision("decimals must be 0..=18"));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Returns `10^decimals`, the size of one whole token in raw units.
    #[must_use]
    pub const fn unit(&self) -> u128 {
        10u128.pow(self.0 as u32)
    }

    /// Returns `10^(18 − decimals)`, the factor lifting one raw unit
    /// into the 18-decimal normalized scale.
    #[must_use]
    pub const fn normalization_factor(&self) -> u128 {
        10u128.pow((NORMALIZED_DECIMALS - self.0) as u32)
    }
}

impl TryFrom<u8> for Decimals {
    type Error = AmmError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Decimals> for u8 {
    fn from(value: Decimals) -> Self {
        value.0
    }
}
