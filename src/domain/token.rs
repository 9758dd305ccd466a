//! Token identity type.

use serde::{Deserialize, Serialize};

use super::{Amount, Decimals, TokenAddress};

/// An asset the pool can hold: its address plus raw-unit precision.
///
/// Two tokens are equal only if both address and decimals match.
///
/// # Examples
///
/// ```
/// use tripool_amm::domain::{Decimals, Token, TokenAddress};
///
/// let usdc = Token::new(TokenAddress::from_bytes([2u8; 32]), Decimals::new(6).expect("valid"));
/// assert_eq!(usdc.whole(5).get(), 5_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    address: TokenAddress,
    decimals: Decimals,
}

impl Token {
    /// Creates a new `Token`.
    #[must_use]
    pub const fn new(address: TokenAddress, decimals: Decimals) -> Self {
        Self { address, decimals }
    }

    /// Returns the token address.
    #[must_use]
    pub const fn address(&self) -> TokenAddress {
        self.address
    }

    /// Returns the token decimals.
    #[must_use]
    pub const fn decimals(&self) -> Decimals {
        self.decimals
    }

    /// Raw amount for `whole` tokens, e.g. `5` USDC becomes `5_000_000`.
    ///
    /// Cannot overflow: `u64::MAX · 10^18 < u128::MAX`.
    pub const fn whole(&self, whole: u64) -> Amount {
        Amount::new((whole as u128) * self.decimals.unit())
    }
}
