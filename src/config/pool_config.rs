//! Configuration for a three-asset StableSwap pool.

use serde::{Deserialize, Serialize};

use crate::domain::{FeeRate, Token, MAX_SWAP_FEE};
use crate::error::AmmError;
use crate::N_ASSETS;

/// Largest accepted amplification coefficient.
pub const MAX_AMPLIFICATION: u128 = 1_000_000;

/// One asset slot of the pool.
///
/// `rate` is the fixed exchange-rate constant of the asset relative to
/// the pool's reference unit (1 for the reference asset itself). The
/// normalization multiplier is `10^(18 − decimals) × rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    token: Token,
    rate: u128,
}

impl AssetConfig {
    /// Creates an asset slot with an explicit rate constant.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `rate` is zero or the
    /// resulting multiplier does not fit in `u128`.
    pub fn new(token: Token, rate: u128) -> Result<Self, AmmError> {
        let asset = Self { token, rate };
        asset.multiplier()?;
        Ok(asset)
    }

    /// Creates a reference-unit asset slot (rate 1).
    #[must_use]
    pub const fn reference(token: Token) -> Self {
        Self { token, rate: 1 }
    }

    /// Returns the token.
    #[must_use]
    pub const fn token(&self) -> Token {
        self.token
    }

    /// Returns the rate constant.
    #[must_use]
    pub const fn rate(&self) -> u128 {
        self.rate
    }

    /// Returns `10^(18 − decimals) × rate`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `rate` is zero or the
    /// product overflows.
    pub fn multiplier(&self) -> Result<u128, AmmError> {
        if self.rate == 0 {
            return Err(AmmError::InvalidConfiguration(
                "asset rate must be greater than zero",
            ));
        }
        self.token
            .decimals()
            .normalization_factor()
            .checked_mul(self.rate)
            .ok_or(AmmError::InvalidConfiguration("asset multiplier overflows u128"))
    }
}

/// Immutable parameters of a three-asset StableSwap pool.
///
/// # Amplification
///
/// `A` controls the curve shape: small values behave like constant
/// product, large values like constant sum. Typical stable pools use
/// 100–2 000.
///
/// # Validation
///
/// - `1 <= amplification <= 1_000_000`.
/// - `swap_fee <= 50%`.
/// - Asset addresses pairwise distinct.
/// - Every asset multiplier representable.
///
/// Deserialization runs the same validation.
///
/// # Examples
///
/// ```
/// use tripool_amm::config::{AssetConfig, PoolConfig};
/// use tripool_amm::domain::{Decimals, FeeRate, Token, TokenAddress};
///
/// let tok = |b: u8, d: u8| Token::new(TokenAddress::from_bytes([b; 32]), Decimals::new(d).expect("valid"));
/// let config = PoolConfig::new(
///     [
///         AssetConfig::reference(tok(1, 18)),
///         AssetConfig::reference(tok(2, 6)),
///         AssetConfig::reference(tok(3, 6)),
///     ],
///     200,
///     FeeRate::from_bps(4).expect("valid"),
/// )
/// .expect("valid config");
/// assert_eq!(config.multipliers(), [1, 1_000_000_000_000, 1_000_000_000_000]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPoolConfig", into = "RawPoolConfig")]
pub struct PoolConfig {
    assets: [AssetConfig; N_ASSETS],
    amplification: u128,
    swap_fee: FeeRate,
    multipliers: [u128; N_ASSETS],
}

impl PoolConfig {
    /// Creates a validated `PoolConfig`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] for an out-of-range
    ///   amplification, duplicate assets, or a bad rate.
    /// - [`AmmError::InvalidFee`] if `swap_fee` exceeds 50%.
    pub fn new(
        assets: [AssetConfig; N_ASSETS],
        amplification: u128,
        swap_fee: FeeRate,
    ) -> Result<Self, AmmError> {
        if amplification == 0 {
            return Err(AmmError::InvalidConfiguration(
                "amplification must be greater than zero",
            ));
        }
        if amplification > MAX_AMPLIFICATION {
            return Err(AmmError::InvalidConfiguration(
                "amplification exceeds 1_000_000",
            ));
        }
        if swap_fee.get() > MAX_SWAP_FEE {
            return Err(AmmError::InvalidFee("swap fee exceeds 50%"));
        }
        for i in 0..N_ASSETS {
            for j in (i + 1)..N_ASSETS {
                if assets[i].token.address() == assets[j].token.address() {
                    return Err(AmmError::InvalidConfiguration(
                        "pool assets must have distinct addresses",
                    ));
                }
            }
        }

        let mut multipliers = [0u128; N_ASSETS];
        for (slot, asset) in multipliers.iter_mut().zip(assets.iter()) {
            *slot = asset.multiplier()?;
        }

        Ok(Self {
            assets,
            amplification,
            swap_fee,
            multipliers,
        })
    }

    /// Returns the asset slots in index order.
    #[must_use]
    pub const fn assets(&self) -> &[AssetConfig; N_ASSETS] {
        &self.assets
    }

    /// Returns the token at `index`, if any.
    #[must_use]
    pub fn token(&self, index: usize) -> Option<Token> {
        self.assets.get(index).map(AssetConfig::token)
    }

    /// Returns the amplification coefficient `A`.
    #[must_use]
    pub const fn amplification(&self) -> u128 {
        self.amplification
    }

    /// Returns the base swap fee.
    #[must_use]
    pub const fn swap_fee(&self) -> FeeRate {
        self.swap_fee
    }

    /// Returns the precomputed normalization multipliers.
    #[must_use]
    pub const fn multipliers(&self) -> [u128; N_ASSETS] {
        self.multipliers
    }
}

/// Wire form of [`PoolConfig`]; multipliers are derived, not stored.
#[derive(Serialize, Deserialize)]
struct RawPoolConfig {
    assets: [AssetConfig; N_ASSETS],
    amplification: u128,
    swap_fee: FeeRate,
}

impl TryFrom<RawPoolConfig> for PoolConfig {
    type Error = AmmError;

    fn try_from(raw: RawPoolConfig) -> Result<Self, Self::Error> {
        Self::new(raw.assets, raw.amplification, raw.swap_fee)
    }
}

impl From<PoolConfig> for RawPoolConfig {
    fn from(config: PoolConfig) -> Self {
        Self {
            assets: config.assets,
            amplification: config.amplification,
            swap_fee: config.swap_fee,
        }
    }
}
