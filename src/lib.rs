//! # Tripool AMM
//!
//! Three-asset StableSwap engine: the invariant and pricing core of a
//! Curve 3pool-style market maker for pegged assets that differ in
//! decimals or carry a fixed exchange-rate constant.
//!
//! The crate computes the pool invariant `D`, solves for counter-party
//! balances during swaps and withdrawals, applies swap and imbalance
//! fees, and commits every operation all-or-nothing against an external
//! [`TokenLedger`](traits::TokenLedger).
//!
//! # Quick Start
//!
//! ```rust
//! use tripool_amm::config::{AssetConfig, PoolConfig};
//! use tripool_amm::domain::{AccountId, Amount, Decimals, FeeRate, Shares, Token, TokenAddress};
//! use tripool_amm::pools::{InMemoryLedger, StableSwapPool};
//!
//! // 1. Three pegged tokens with different precisions
//! let dai  = Token::new(TokenAddress::from_bytes([1u8; 32]), Decimals::new(18).expect("valid"));
//! let usdc = Token::new(TokenAddress::from_bytes([2u8; 32]), Decimals::new(6).expect("valid"));
//! let usdt = Token::new(TokenAddress::from_bytes([3u8; 32]), Decimals::new(6).expect("valid"));
//!
//! // 2. A = 200, 4 bp swap fee
//! let config = PoolConfig::new(
//!     [AssetConfig::reference(dai), AssetConfig::reference(usdc), AssetConfig::reference(usdt)],
//!     200,
//!     FeeRate::from_bps(4).expect("valid fee"),
//! )
//! .expect("valid config");
//! let mut pool = StableSwapPool::new(config).expect("pool created");
//!
//! // 3. Fund an account and seed the pool
//! let alice = AccountId::from_bytes([9u8; 32]);
//! let mut ledger = InMemoryLedger::new();
//! for t in [dai, usdc, usdt] {
//!     ledger.mint(&t, &alice, t.whole(10_000));
//! }
//! pool.add_liquidity(&mut ledger, alice, [dai.whole(1_000), usdc.whole(1_000), usdt.whole(1_000)], Shares::ZERO)
//!     .expect("deposit");
//!
//! // 4. Swap 10 DAI for USDC
//! let out = pool.swap(&mut ledger, alice, 0, 1, dai.whole(10), Amount::ZERO).expect("swap");
//! assert!(out.get() > 9_990_000 && out.get() < 10_000_000);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Consumer    │  PoolConfig + TokenLedger
//! └──────┬───────┘
//!        │ swap / add_liquidity / remove_liquidity*
//!        ▼
//! ┌──────────────┐
//! │ StableSwapPool│  price → validate → settle (debit, commit, credit)
//! └──────┬───────┘
//!        │ FeeModel, PoolState
//!        ▼
//! ┌──────────────┐
//! │     Math      │  normalize, compute_d, solve_y_given_x, solve_balance_for_d
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │    Domain     │  Amount, Shares, Token, FeeRate, PoolEvent, …
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`Shares`](domain::Shares), [`Token`](domain::Token), [`PoolEvent`](domain::PoolEvent), etc. |
//! | [`math`]   | Normalizer, invariant and balance solvers over 256-bit integers |
//! | [`config`] | [`PoolConfig`](config::PoolConfig): the immutable construction contract |
//! | [`traits`] | [`TokenLedger`](traits::TokenLedger): the external token-movement seam |
//! | [`pools`]  | [`StableSwapPool`](pools::StableSwapPool), [`SharedPool`](pools::SharedPool), [`InMemoryLedger`](pools::InMemoryLedger) |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |
//!
//! # Logging
//!
//! Operations emit [`tracing`] events: `debug` for solver convergence,
//! `info` for committed operations, `warn` for slippage rejections and
//! ledger failures, `error` for non-convergence and failed compensating
//! movements. The crate never installs a subscriber.

/// Number of assets in every pool.
pub const N_ASSETS: usize = 3;

pub mod config;
pub mod domain;
pub mod error;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;
