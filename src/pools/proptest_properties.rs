//! Property-based tests using `proptest` for pool invariants.
//!
//! 1. **Balanced invariant** — `D` of three equal balances is their sum.
//! 2. **Invariant conservation** — the swap solve keeps `D` within 2 units.
//! 3. **Genesis deposit** — the first deposit mints exactly `D`.
//! 4. **Swap reversibility** — round trip `i → j → i` returns ≤ original.
//! 5. **Monotonic virtual price** — swaps never lower it.
//! 6. **Quote fidelity** — `get_dy` equals what `swap` pays.
//! 7. **Liquidity round trip** — a proportional deposit then withdrawal
//!    never gains.

use primitive_types::U256;
use proptest::prelude::*;

use crate::config::{AssetConfig, PoolConfig};
use crate::domain::{AccountId, Amount, Decimals, FeeRate, Shares, Token, TokenAddress};
use crate::math::{abs_diff, compute_d, normalize, solve_y_given_x};
use crate::pools::{InMemoryLedger, StableSwapPool};
use crate::N_ASSETS;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const DECIMALS: [u8; N_ASSETS] = [18, 6, 6];

fn tok(k: usize) -> Token {
    let Ok(d) = Decimals::new(DECIMALS[k]) else {
        panic!("valid decimals");
    };
    Token::new(TokenAddress::from_bytes([k as u8 + 1; 32]), d)
}

fn make_pool(amp: u128) -> StableSwapPool {
    let Ok(fee) = FeeRate::from_bps(4) else {
        panic!("valid fee");
    };
    let Ok(cfg) = PoolConfig::new(
        [
            AssetConfig::reference(tok(0)),
            AssetConfig::reference(tok(1)),
            AssetConfig::reference(tok(2)),
        ],
        amp,
        fee,
    ) else {
        panic!("valid config");
    };
    let Ok(pool) = StableSwapPool::new(cfg) else {
        panic!("valid pool");
    };
    pool
}

fn lp() -> AccountId {
    AccountId::from_bytes([0xaa; 32])
}

fn trader() -> AccountId {
    AccountId::from_bytes([0xbb; 32])
}

fn raw(whole: [u64; N_ASSETS]) -> [Amount; N_ASSETS] {
    core::array::from_fn(|k| tok(k).whole(whole[k]))
}

/// A pool seeded by `lp()` with `whole` units of each asset, and a ledger
/// where both `lp()` and `trader()` hold plenty of everything.
fn seeded(amp: u128, whole: [u64; N_ASSETS]) -> (StableSwapPool, InMemoryLedger) {
    let mut pool = make_pool(amp);
    let mut ledger = InMemoryLedger::new();
    for who in [lp(), trader()] {
        for k in 0..N_ASSETS {
            ledger.mint(&tok(k), &who, tok(k).whole(1_000_000_000));
        }
    }
    let Ok(_) = pool.add_liquidity(&mut ledger, lp(), raw(whole), Shares::ZERO) else {
        panic!("genesis deposit");
    };
    (pool, ledger)
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Amplification values in [10, 2 000].
fn amplification_strategy() -> impl Strategy<Value = u128> {
    10u128..=2_000u128
}

/// Whole-unit balances in [1 000, 10 000 000], at most 5× apart.
fn balances_strategy() -> impl Strategy<Value = [u64; N_ASSETS]> {
    (1_000u64..=2_000_000u64, 100u64..=500u64, 100u64..=500u64, 100u64..=500u64).prop_map(
        |(base, a, b, c)| [base * a / 100, base * b / 100, base * c / 100],
    )
}

/// Swap legs `(i, j)` with `i != j`.
fn leg_strategy() -> impl Strategy<Value = (usize, usize)> {
    (0usize..N_ASSETS, 1usize..N_ASSETS).prop_map(|(i, step)| (i, (i + step) % N_ASSETS))
}

/// Fraction of the input asset's balance, in basis points (0.01%–10%).
fn fraction_strategy() -> impl Strategy<Value = u64> {
    1u64..=1_000u64
}

// ---------------------------------------------------------------------------
// Properties 1–3: solver and genesis
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_balanced_invariant_is_sum(
        v in 1u64..=u64::MAX,
        amp in amplification_strategy(),
    ) {
        let x = U256::from(v) * U256::exp10(12);
        let Ok(d) = compute_d(&[x, x, x], amp) else {
            return Err(TestCaseError::fail("balanced D must converge"));
        };
        prop_assert_eq!(d, x * U256::from(3u64));
    }

    #[test]
    fn prop_swap_solve_conserves_invariant(
        whole in balances_strategy(),
        amp in amplification_strategy(),
        (i, j) in leg_strategy(),
        frac in fraction_strategy(),
    ) {
        let multipliers = [1, 1_000_000_000_000, 1_000_000_000_000];
        let xp = normalize(&raw(whole), &multipliers);
        let Ok(d0) = compute_d(&xp, amp) else {
            return Err(TestCaseError::fail("D must converge"));
        };
        let new_x = xp[i] + xp[i] * U256::from(frac) / U256::from(10_000u64);
        let Ok(y) = solve_y_given_x(i, j, new_x, &xp, amp) else {
            return Err(TestCaseError::fail("y must converge"));
        };
        let mut after = xp;
        after[i] = new_x;
        after[j] = y;
        let Ok(d1) = compute_d(&after, amp) else {
            return Err(TestCaseError::fail("D after must converge"));
        };
        prop_assert!(
            abs_diff(d0, d1) <= U256::from(2u64),
            "D drifted: before={} after={}", d0, d1
        );
    }

    #[test]
    fn prop_genesis_mints_invariant(
        whole in balances_strategy(),
        amp in amplification_strategy(),
    ) {
        let (pool, _) = seeded(amp, whole);
        let Ok(d) = pool.invariant() else {
            return Err(TestCaseError::fail("D must converge"));
        };
        prop_assert_eq!(pool.total_shares().to_u256(), d);
        prop_assert_eq!(pool.shares_of(&lp()), pool.total_shares());
    }
}

// ---------------------------------------------------------------------------
// Properties 4–6: swaps
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_reversibility(
        whole in balances_strategy(),
        amp in amplification_strategy(),
        (i, j) in leg_strategy(),
        frac in fraction_strategy(),
    ) {
        let (mut pool, mut ledger) = seeded(amp, whole);
        let dx = Amount::new(pool.balances()[i].get() * u128::from(frac) / 10_000);

        let Ok(received) = pool.swap(&mut ledger, trader(), i, j, dx, Amount::ZERO) else {
            return Ok(());
        };
        if received.is_zero() { return Ok(()); }
        let Ok(back) = pool.swap(&mut ledger, trader(), j, i, received, Amount::ZERO) else {
            return Ok(());
        };

        prop_assert!(
            back <= dx,
            "round-trip should lose value: final={} > original={}",
            back, dx
        );
    }

    #[test]
    fn prop_virtual_price_monotonic(
        whole in balances_strategy(),
        amp in amplification_strategy(),
        legs in prop::collection::vec((leg_strategy(), fraction_strategy()), 1..8),
    ) {
        let (mut pool, mut ledger) = seeded(amp, whole);
        let Ok(mut last) = pool.virtual_price() else {
            return Err(TestCaseError::fail("virtual price"));
        };
        for ((i, j), frac) in legs {
            let dx = Amount::new(pool.balances()[i].get() * u128::from(frac) / 10_000);
            if pool.swap(&mut ledger, trader(), i, j, dx, Amount::ZERO).is_err() {
                continue;
            }
            let Ok(vp) = pool.virtual_price() else {
                return Err(TestCaseError::fail("virtual price"));
            };
            prop_assert!(vp >= last, "virtual price fell: {} -> {}", last, vp);
            last = vp;
        }
    }

    #[test]
    fn prop_get_dy_matches_swap(
        whole in balances_strategy(),
        amp in amplification_strategy(),
        (i, j) in leg_strategy(),
        frac in fraction_strategy(),
    ) {
        let (mut pool, mut ledger) = seeded(amp, whole);
        let dx = Amount::new(pool.balances()[i].get() * u128::from(frac) / 10_000);
        let quoted = pool.get_dy(i, j, dx);
        let executed = pool.swap(&mut ledger, trader(), i, j, dx, Amount::ZERO);
        prop_assert_eq!(quoted, executed);
    }
}

// ---------------------------------------------------------------------------
// Property 7: liquidity round trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_liquidity_round_trip_never_gains(
        whole in balances_strategy(),
        amp in amplification_strategy(),
        frac in 1u64..=10_000u64,
    ) {
        let (mut pool, mut ledger) = seeded(amp, whole);
        let amounts = pool
            .balances()
            .map(|b| Amount::new(b.get() * u128::from(frac) / 10_000));
        let Ok(minted) = pool.add_liquidity(&mut ledger, trader(), amounts, Shares::ZERO) else {
            return Ok(());
        };
        let Ok(out) = pool.remove_liquidity(&mut ledger, trader(), minted, [Amount::ZERO; N_ASSETS]) else {
            return Err(TestCaseError::fail("withdrawing minted shares must succeed"));
        };
        for k in 0..N_ASSETS {
            prop_assert!(
                out[k] <= amounts[k],
                "asset {} gained: deposited={} withdrew={}", k, amounts[k], out[k]
            );
        }
        prop_assert_eq!(pool.state().sum_of_shares(), pool.total_shares().get());
    }
}
