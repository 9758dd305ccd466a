//! Pool construction parameters.
//!
//! [`PoolConfig`] is the immutable blueprint of a pool: three asset
//! slots with their normalization multipliers, the amplification
//! coefficient, and the base swap fee.

mod pool_config;

pub use pool_config::{AssetConfig, PoolConfig, MAX_AMPLIFICATION};
