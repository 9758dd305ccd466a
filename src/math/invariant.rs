//! StableSwap invariant `D` via Newton-Raphson.
//!
//! # Invariant (n = 3 assets)
//!
//! ```text
//! A·n^n·S + D^(n+1) / (n^n·Π xp) = A·n^n·D + D
//! ```
//!
//! where `S = Σ xp`. Iterated as
//!
//! ```text
//! D_next = (A·n·S + n·D_P)·D / ((A·n − 1)·D + (n+1)·D_P)
//! D_P    = D^(n+1) / (n^n·Π xp)
//! ```
//!
//! starting from `D₀ = S`. `D_P` is accumulated one factor at a time
//! (`D_P = D_P·D / (n·xp_j)`) so the intermediate never holds
//! `D^(n+1)` outright.

use primitive_types::U256;
use tracing::{debug, error};

use super::normalize::Xp;
use crate::error::AmmError;
use crate::N_ASSETS;

/// Number of assets as a solver constant.
pub(crate) const N: u64 = N_ASSETS as u64;

/// Iteration budget shared by every Newton-Raphson solve.
pub const MAX_ITERATIONS: usize = 255;

/// Absolute difference between consecutive iterates at which a solve
/// is considered converged, in normalized units.
pub(crate) const CONVERGENCE_THRESHOLD: u64 = 1;

/// `|a − b|` for 256-bit values.
pub(crate) fn abs_diff(a: U256, b: U256) -> U256 {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Computes the StableSwap invariant `D` for three normalized balances.
///
/// Returns zero for an empty pool.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if some but not all balances are zero.
/// - [`AmmError::Overflow`] if an intermediate exceeds 256 bits.
/// - [`AmmError::NumericNonConvergence`] if the iteration does not
///   settle within [`MAX_ITERATIONS`] steps. Never expected for valid
///   inputs; callers abort the whole operation.
///
/// # Examples
///
/// ```
/// use primitive_types::U256;
/// use tripool_amm::math::compute_d;
///
/// let v = U256::from(1_000u64) * U256::exp10(18);
/// let d = compute_d(&[v, v, v], 200).expect("converges");
/// assert_eq!(d, v * U256::from(3u64));
/// ```
pub fn compute_d(xp: &Xp, amp: u128) -> Result<U256, AmmError> {
    let s = xp.iter().try_fold(U256::zero(), |acc, x| {
        acc.checked_add(*x).ok_or(AmmError::Overflow("D: S overflow"))
    })?;
    if s.is_zero() {
        return Ok(U256::zero());
    }

    let n = U256::from(N);
    let ann = U256::from(amp)
        .checked_mul(n)
        .ok_or(AmmError::Overflow("D: A·n overflow"))?;
    let ann_s = ann
        .checked_mul(s)
        .ok_or(AmmError::Overflow("D: A·n·S overflow"))?;
    let ann_minus_1 = ann
        .checked_sub(U256::one())
        .ok_or(AmmError::Underflow("D: amplification must be positive"))?;
    let n_plus_1 = n + U256::one();

    let mut d = s;
    for iteration in 0..MAX_ITERATIONS {
        let mut d_p = d;
        for x in xp {
            let nx = x
                .checked_mul(n)
                .ok_or(AmmError::Overflow("D: n·x overflow"))?;
            if nx.is_zero() {
                return Err(AmmError::DivisionByZero);
            }
            d_p = d_p
                .checked_mul(d)
                .ok_or(AmmError::Overflow("D: D_P·D overflow"))?
                / nx;
        }

        let d_prev = d;

        let numerator = d_p
            .checked_mul(n)
            .and_then(|n_dp| ann_s.checked_add(n_dp))
            .and_then(|inner| inner.checked_mul(d))
            .ok_or(AmmError::Overflow("D: numerator overflow"))?;
        let denominator = ann_minus_1
            .checked_mul(d)
            .and_then(|left| n_plus_1.checked_mul(d_p).and_then(|right| left.checked_add(right)))
            .ok_or(AmmError::Overflow("D: denominator overflow"))?;
        if denominator.is_zero() {
            return Err(AmmError::DivisionByZero);
        }

        d = numerator / denominator;

        if abs_diff(d, d_prev) <= U256::from(CONVERGENCE_THRESHOLD) {
            debug!(iterations = iteration + 1, %d, "invariant converged");
            return Ok(d);
        }
    }

    error!(%s, amp = %amp, "invariant did not converge");
    Err(AmmError::NumericNonConvergence(
        "D computation did not converge within 255 iterations",
    ))
}
