//! Unified error types for the three-asset StableSwap engine.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type, ensuring a consistent error handling experience for consumers.
//! Every variant is fail-fast: an operation that returns an error has
//! performed no state mutation and left no token movement behind.

use thiserror::Error;

/// Failure reported by an external [`TokenLedger`](crate::traits::TokenLedger).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The debited account does not hold enough units of the asset.
    #[error("insufficient ledger balance")]
    InsufficientBalance,

    /// The ledger refused the movement for a ledger-specific reason.
    #[error("ledger rejected transfer: {0}")]
    Rejected(&'static str),
}

/// Crate-wide error enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    /// An asset index is not in `0..3`.
    #[error("asset index {0} out of range")]
    IndexOutOfRange(usize),

    /// A swap names the same asset on both sides.
    #[error("cannot swap an asset for itself")]
    SameTokenSwap,

    /// The realised output is worse than the caller's bound.
    #[error("slippage exceeded: {0}")]
    SlippageExceeded(&'static str),

    /// A deposit did not raise the pool invariant.
    #[error("deposit did not increase the invariant")]
    LiquidityNotIncreased,

    /// A deposit minted fewer shares than the caller's minimum.
    #[error("minted shares below requested minimum")]
    InsufficientSharesMinted,

    /// The pool has no outstanding shares.
    #[error("pool has no liquidity")]
    NoLiquidity,

    /// The share amount is zero or exceeds what the owner holds.
    #[error("invalid shares amount: {0}")]
    InvalidSharesAmount(&'static str),

    /// A Newton-Raphson solve exhausted its iteration budget.
    #[error("numeric non-convergence: {0}")]
    NumericNonConvergence(&'static str),

    /// Arithmetic overflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The pool cannot pay out the requested amount.
    #[error("insufficient pool balance")]
    InsufficientBalance,

    /// A quantity argument is zero or otherwise unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// Pool construction parameters are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// Decimal precision outside the supported range.
    #[error("invalid precision: {0}")]
    InvalidPrecision(&'static str),

    /// Fee rate outside the supported range.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// The external token ledger refused a movement.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;
