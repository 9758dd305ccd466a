//! Arithmetic for the StableSwap core.
//!
//! | Item | Role |
//! |------|------|
//! | [`normalize`] / [`denormalize`] | Normalizer: raw ⇄ 18-decimal common scale |
//! | [`compute_d`] | InvariantSolver |
//! | [`solve_y_given_x`] / [`solve_balance_for_d`] | BalanceSolver |
//! | [`CheckedArithmetic`], [`div_round_u256`] | Overflow-safe helpers for domain types |
//!
//! Solver inputs and intermediates are 256-bit unsigned integers; no
//! floating point is used anywhere.

mod balance;
mod checked;
mod invariant;
mod normalize;
mod rounding;

pub use balance::{check_index, solve_balance_for_d, solve_y_given_x};
pub use checked::CheckedArithmetic;
pub use invariant::{compute_d, MAX_ITERATIONS};
pub use normalize::{denormalize, normalize, normalize_one, Xp};
pub use primitive_types::U256;
pub use rounding::div_round_u256;

pub(crate) use invariant::abs_diff;
