//! Solving for one normalized balance given the others.
//!
//! Both entry points reduce the invariant to the quadratic
//!
//! ```text
//! y² + (b − D)·y − c = 0
//! b = S' + D/(A·n)
//! c = D^(n+1) / (n^n · A·n · Π x')
//! ```
//!
//! where `S'` and `Π x'` range over the balances held fixed, and iterate
//! `y_next = (y² + c) / (2·y + b − D)` from `y₀ = D`.
//!
//! The denominator `2·y + b − D` is checked: if it would be zero or
//! negative the solve fails with [`AmmError::Underflow`] rather than
//! clamping.

use primitive_types::U256;
use tracing::{debug, error};

use super::invariant::{abs_diff, compute_d, CONVERGENCE_THRESHOLD, MAX_ITERATIONS, N};
use super::normalize::Xp;
use crate::error::AmmError;
use crate::N_ASSETS;

/// Validates an asset index.
///
/// # Errors
///
/// Returns [`AmmError::IndexOutOfRange`] if `index >= 3`.
pub fn check_index(index: usize) -> Result<usize, AmmError> {
    if index >= N_ASSETS {
        return Err(AmmError::IndexOutOfRange(index));
    }
    Ok(index)
}

/// Solves for asset `j`'s normalized balance after asset `i`'s balance
/// becomes `new_x`, keeping `D` equal to `compute_d(xp)`.
///
/// The third balance is held fixed. This is the swap primitive: the
/// pool pays out `xp[j] − y`.
///
/// # Errors
///
/// - [`AmmError::IndexOutOfRange`] if `i` or `j` is not in `0..3`.
/// - [`AmmError::SameTokenSwap`] if `i == j`.
/// - Any error from [`compute_d`] or the quadratic iteration.
pub fn solve_y_given_x(
    i: usize,
    j: usize,
    new_x: U256,
    xp: &Xp,
    amp: u128,
) -> Result<U256, AmmError> {
    check_index(i)?;
    check_index(j)?;
    if i == j {
        return Err(AmmError::SameTokenSwap);
    }

    let d = compute_d(xp, amp)?;
    let fixed = (0..N_ASSETS)
        .filter(|&k| k != j)
        .map(|k| if k == i { new_x } else { xp[k] });
    solve_quadratic(fixed, d, amp)
}

/// Solves for asset `i`'s normalized balance such that the invariant
/// of the resulting balances equals `target_d`, every other balance
/// held fixed.
///
/// Used for withdrawal pricing with `target_d` below the current `D`.
///
/// # Errors
///
/// - [`AmmError::IndexOutOfRange`] if `i` is not in `0..3`.
/// - Any error from the quadratic iteration.
pub fn solve_balance_for_d(i: usize, xp: &Xp, target_d: U256, amp: u128) -> Result<U256, AmmError> {
    check_index(i)?;
    let fixed = (0..N_ASSETS).filter(|&k| k != i).map(|k| xp[k]);
    solve_quadratic(fixed, target_d, amp)
}

fn solve_quadratic(
    fixed: impl Iterator<Item = U256>,
    d: U256,
    amp: u128,
) -> Result<U256, AmmError> {
    let n = U256::from(N);
    let ann = U256::from(amp)
        .checked_mul(n)
        .ok_or(AmmError::Overflow("y: A·n overflow"))?;
    if ann.is_zero() {
        return Err(AmmError::DivisionByZero);
    }

    // c = D^(n+1) / (n^n · A·n · Π x'), one factor at a time.
    let mut c = d;
    let mut s = U256::zero();
    for x in fixed {
        s = s
            .checked_add(x)
            .ok_or(AmmError::Overflow("y: S overflow"))?;
        let nx = x
            .checked_mul(n)
            .ok_or(AmmError::Overflow("y: n·x overflow"))?;
        if nx.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        c = c
            .checked_mul(d)
            .ok_or(AmmError::Overflow("y: c·D overflow"))?
            / nx;
    }
    c = c
        .checked_mul(d)
        .ok_or(AmmError::Overflow("y: c·D overflow"))?
        / (ann * n);

    let b = s
        .checked_add(d / ann)
        .ok_or(AmmError::Overflow("y: b overflow"))?;

    let mut y = d;
    for iteration in 0..MAX_ITERATIONS {
        let y_prev = y;

        let numerator = y
            .checked_mul(y)
            .and_then(|y_sq| y_sq.checked_add(c))
            .ok_or(AmmError::Overflow("y: numerator overflow"))?;
        let denominator = y
            .checked_mul(U256::from(2u64))
            .and_then(|two_y| two_y.checked_add(b))
            .ok_or(AmmError::Overflow("y: denominator overflow"))?
            .checked_sub(d)
            .filter(|den| !den.is_zero())
            .ok_or(AmmError::Underflow("y: 2y + b − D is not positive"))?;

        y = numerator / denominator;

        if abs_diff(y, y_prev) <= U256::from(CONVERGENCE_THRESHOLD) {
            debug!(iterations = iteration + 1, %y, "balance converged");
            return Ok(y);
        }
    }

    error!(%d, amp = %amp, "balance did not converge");
    Err(AmmError::NumericNonConvergence(
        "y computation did not converge within 255 iterations",
    ))
}
