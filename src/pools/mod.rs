//! The StableSwap pool and its supporting pieces.
//!
//! | Item | Role |
//! |------|------|
//! | [`StableSwapPool`] | Pool state plus every swap and liquidity operation |
//! | [`FeeModel`] | Swap fee and derived imbalance fee |
//! | [`PoolState`] | Balances, share supply, per-owner bookkeeping |
//! | [`SharedPool`] | Lock-guarded handle for multi-threaded callers |
//! | [`InMemoryLedger`] | [`TokenLedger`](crate::traits::TokenLedger) for tests and simulations |

mod fee_model;
mod ledger;
mod settlement;
mod shared;
mod stable_swap;
mod state;

#[cfg(test)]
mod proptest_properties;

pub use fee_model::{deduct, FeeModel};
pub use ledger::InMemoryLedger;
pub use shared::SharedPool;
pub use stable_swap::StableSwapPool;
pub use state::{Checkpoint, Delta, PoolState};
