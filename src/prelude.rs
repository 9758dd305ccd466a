//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use tripool_amm::prelude::*;
//! ```

// Domain types
pub use crate::domain::{
    AccountId, Amount, Decimals, FeeRate, PoolEvent, Rounding, Shares, Token, TokenAddress,
};

// Core traits
pub use crate::math::CheckedArithmetic;
pub use crate::traits::TokenLedger;

// Configuration
pub use crate::config::{AssetConfig, PoolConfig};

// Pools
pub use crate::pools::{InMemoryLedger, SharedPool, StableSwapPool};

// Errors
pub use crate::error::{AmmError, LedgerError, Result};

pub use crate::N_ASSETS;
