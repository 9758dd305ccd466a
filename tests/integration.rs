//! Integration tests exercising the full system from config to pool operation.
//!
//! These tests verify end-to-end flows through the public API: config
//! loading, the invariant and balance solvers, every pool operation,
//! all-or-nothing settlement against a failing ledger, and concurrent
//! use through a shared handle.

#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use primitive_types::U256;
use tripool_amm::config::{AssetConfig, PoolConfig};
use tripool_amm::domain::{
    AccountId, Amount, Decimals, FeeRate, PoolEvent, Shares, Token, TokenAddress,
};
use tripool_amm::error::{AmmError, LedgerError};
use tripool_amm::math::{compute_d, normalize, solve_y_given_x};
use tripool_amm::pools::{InMemoryLedger, SharedPool, StableSwapPool};
use tripool_amm::N_ASSETS;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const E18: u128 = 1_000_000_000_000_000_000;

fn tok(addr: u8, dec: u8) -> Token {
    let Ok(d) = Decimals::new(dec) else {
        panic!("valid decimals");
    };
    Token::new(TokenAddress::from_bytes([addr; 32]), d)
}

fn dai() -> Token {
    tok(1, 18)
}

fn usdc() -> Token {
    tok(2, 6)
}

fn usdt() -> Token {
    tok(3, 6)
}

fn fee_4bp() -> FeeRate {
    let Ok(f) = FeeRate::from_bps(4) else {
        panic!("valid fee");
    };
    f
}

fn three_pool_config(amp: u128) -> PoolConfig {
    let Ok(cfg) = PoolConfig::new(
        [
            AssetConfig::reference(dai()),
            AssetConfig::reference(usdc()),
            AssetConfig::reference(usdt()),
        ],
        amp,
        fee_4bp(),
    ) else {
        panic!("valid config");
    };
    cfg
}

fn three_pool(amp: u128) -> StableSwapPool {
    let Ok(pool) = StableSwapPool::new(three_pool_config(amp)) else {
        panic!("valid pool");
    };
    pool
}

fn alice() -> AccountId {
    AccountId::from_bytes([0xa1; 32])
}

fn bob() -> AccountId {
    AccountId::from_bytes([0xb0; 32])
}

fn funded_ledger(tokens: &[Token; N_ASSETS], owners: &[AccountId]) -> InMemoryLedger {
    let mut ledger = InMemoryLedger::new();
    for who in owners {
        for t in tokens {
            ledger.mint(t, who, t.whole(100_000_000));
        }
    }
    ledger
}

fn basket(whole: u64) -> [Amount; N_ASSETS] {
    [dai().whole(whole), usdc().whole(whole), usdt().whole(whole)]
}

/// Balanced 3pool seeded by alice; bob is funded but holds no shares.
fn seeded(amp: u128, whole: u64) -> (StableSwapPool, InMemoryLedger) {
    let mut pool = three_pool(amp);
    let mut ledger = funded_ledger(pool.tokens(), &[alice(), bob()]);
    let Ok(_) = pool.add_liquidity(&mut ledger, alice(), basket(whole), Shares::ZERO) else {
        panic!("genesis deposit");
    };
    pool.take_events();
    (pool, ledger)
}

fn assert_custody_matches(pool: &StableSwapPool, ledger: &InMemoryLedger) {
    for (k, t) in pool.tokens().iter().enumerate() {
        assert_eq!(ledger.custody_of(t), pool.balances()[k], "asset {k}");
    }
    assert_eq!(pool.state().sum_of_shares(), pool.total_shares().get());
}

// ---------------------------------------------------------------------------
// Solver properties
// ---------------------------------------------------------------------------

#[test]
fn balanced_invariant_is_exact() {
    for v in [1u128, 3_000, 1_000_000 * E18] {
        let x = U256::from(v);
        assert_eq!(compute_d(&[x, x, x], 100), Ok(x * U256::from(3u64)));
    }
}

#[test]
fn swap_solve_conserves_invariant_concrete() {
    let xp = [U256::from(3_000u64); N_ASSETS];
    for amp in [1u128, 10, 100, 1_000] {
        let Ok(d) = compute_d(&xp, amp) else {
            panic!("D converges");
        };
        assert_eq!(d, U256::from(9_000u64));
        let Ok(y1) = solve_y_given_x(0, 1, U256::from(3_100u64), &xp, amp) else {
            panic!("y converges");
        };
        let Ok(d_after) = compute_d(&[U256::from(3_100u64), y1, U256::from(3_000u64)], amp) else {
            panic!("D converges");
        };
        let drift = if d_after > d { d_after - d } else { d - d_after };
        assert!(drift <= U256::one(), "amp {amp}: D {d} -> {d_after}");
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn pool_from_json_config() {
    let Ok(json) = serde_json::to_string(&three_pool_config(300)) else {
        panic!("serialize");
    };
    let Ok(cfg) = serde_json::from_str::<PoolConfig>(&json) else {
        panic!("deserialize");
    };
    assert_eq!(cfg.amplification(), 300);
    assert_eq!(cfg.multipliers(), [1, 1_000_000_000_000, 1_000_000_000_000]);
    assert!(StableSwapPool::new(cfg).is_ok());
}

#[test]
fn json_with_duplicate_assets_is_rejected() {
    let Ok(json) = serde_json::to_string(&three_pool_config(300)) else {
        panic!("serialize");
    };
    let address = |b: u8| format!("[{}]", vec![b.to_string(); 32].join(","));
    let dup = json.replace(&address(3), &address(2));
    assert_ne!(dup, json);
    assert!(serde_json::from_str::<PoolConfig>(&dup).is_err());
}

// ---------------------------------------------------------------------------
// Liquidity lifecycle
// ---------------------------------------------------------------------------

#[test]
fn genesis_deposit_mints_invariant_of_amounts() {
    let mut pool = three_pool(200);
    let mut ledger = funded_ledger(pool.tokens(), &[alice()]);
    let amounts = [dai().whole(1_200), usdc().whole(900), usdt().whole(1_050)];
    let xp = normalize(&amounts, &pool.config().multipliers());
    let Ok(d) = compute_d(&xp, 200) else {
        panic!("D converges");
    };
    let Ok(minted) = pool.add_liquidity(&mut ledger, alice(), amounts, Shares::ZERO) else {
        panic!("genesis deposit");
    };
    assert_eq!(minted.to_u256(), d);
    assert_eq!(pool.user_deposits(&alice()), amounts);
    assert_custody_matches(&pool, &ledger);
}

#[test]
fn proportional_round_trip_never_gains() {
    let (mut pool, mut ledger) = seeded(200, 1_000_000);
    let amounts = basket(2_500);
    let Ok(minted) = pool.add_liquidity(&mut ledger, bob(), amounts, Shares::ZERO) else {
        panic!("deposit");
    };
    let Ok(out) = pool.remove_liquidity(&mut ledger, bob(), minted, [Amount::ZERO; N_ASSETS]) else {
        panic!("withdraw");
    };
    for k in 0..N_ASSETS {
        assert!(out[k] <= amounts[k], "asset {k}: {} > {}", out[k], amounts[k]);
    }
    assert_eq!(pool.shares_of(&bob()), Shares::ZERO);
    assert_custody_matches(&pool, &ledger);
}

#[test]
fn full_withdrawal_empties_the_pool() {
    let (mut pool, mut ledger) = seeded(200, 1_000);
    let all = pool.shares_of(&alice());
    let Ok(out) = pool.remove_liquidity(&mut ledger, alice(), all, [Amount::ZERO; N_ASSETS]) else {
        panic!("withdraw");
    };
    assert_eq!(out, basket(1_000));
    assert_eq!(pool.total_shares(), Shares::ZERO);
    assert_eq!(pool.balances(), [Amount::ZERO; N_ASSETS]);
    assert_eq!(pool.virtual_price(), Ok(U256::zero()));
    assert_eq!(pool.user_deposits(&alice()), [Amount::ZERO; N_ASSETS]);
    assert_eq!(
        pool.calc_withdraw_one_token(Shares::new(1), 0),
        Err(AmmError::NoLiquidity)
    );
    assert_custody_matches(&pool, &ledger);
}

#[test]
fn one_token_withdrawal_charges_imbalance_fee() {
    let (mut pool, mut ledger) = seeded(200, 10_000);
    let shares = Shares::new(300 * E18);
    let Ok((quoted, fee)) = pool.calc_withdraw_one_token(shares, 2) else {
        panic!("quote");
    };
    assert!(fee.get() > 0);
    let Ok(vp_before) = pool.virtual_price() else {
        panic!("virtual price");
    };
    let Ok(out) = pool.remove_liquidity_one_token(&mut ledger, alice(), shares, 2, quoted) else {
        panic!("withdraw");
    };
    assert_eq!(out, quoted);
    let Ok(vp_after) = pool.virtual_price() else {
        panic!("virtual price");
    };
    assert!(vp_after >= vp_before);
    assert_eq!(
        pool.take_events(),
        vec![PoolEvent::LiquidityRemovedOneToken {
            actor: alice(),
            asset_index: 2,
            amount_out: out,
            shares_burned: shares,
        }]
    );
    assert_custody_matches(&pool, &ledger);
}

#[test]
fn imbalanced_withdrawal_of_exact_amounts() {
    let (mut pool, mut ledger) = seeded(200, 10_000);
    let amounts = [dai().whole(100), Amount::ZERO, usdt().whole(40)];
    let Ok(quoted) = pool.quote_remove_liquidity_imbalance(&amounts) else {
        panic!("quote");
    };
    let Ok(burned) = pool.remove_liquidity_imbalance(&mut ledger, alice(), amounts, quoted) else {
        panic!("withdraw");
    };
    assert_eq!(burned, quoted);
    assert_eq!(
        ledger.balance_of(&dai(), &alice()),
        Amount::new(dai().whole(100_000_000).get() - dai().whole(10_000).get() + dai().whole(100).get())
    );
    assert_eq!(pool.user_deposits(&alice())[0], dai().whole(9_900));
    assert_custody_matches(&pool, &ledger);
}

// ---------------------------------------------------------------------------
// Swaps
// ---------------------------------------------------------------------------

#[test]
fn virtual_price_non_decreasing_across_swaps() {
    let (mut pool, mut ledger) = seeded(100, 50_000);
    let Ok(mut last) = pool.virtual_price() else {
        panic!("virtual price");
    };
    let legs = [
        (0, 1, dai().whole(5_000)),
        (1, 2, usdc().whole(12_000)),
        (2, 0, usdt().whole(3_000)),
        (1, 0, usdc().whole(20_000)),
        (0, 2, dai().whole(7)),
    ];
    for (i, j, dx) in legs {
        let Ok(_) = pool.swap(&mut ledger, bob(), i, j, dx, Amount::ZERO) else {
            panic!("swap {i} -> {j}");
        };
        let Ok(vp) = pool.virtual_price() else {
            panic!("virtual price");
        };
        assert!(vp >= last, "{vp} < {last}");
        last = vp;
    }
    assert_custody_matches(&pool, &ledger);
}

#[test]
fn slippage_boundary_leaves_state_untouched() {
    let (mut pool, mut ledger) = seeded(200, 10_000);
    let dx = dai().whole(250);
    let Ok(dy) = pool.get_dy(0, 2, dx) else {
        panic!("quote");
    };
    let before = pool.state().clone();
    let calls = ledger.calls();

    let Some(too_high) = dy.checked_add(&Amount::new(1)) else {
        panic!("no overflow");
    };
    let Err(AmmError::SlippageExceeded(_)) = pool.swap(&mut ledger, bob(), 0, 2, dx, too_high) else {
        panic!("expected SlippageExceeded");
    };
    assert_eq!(pool.state(), &before);
    assert_eq!(ledger.calls(), calls);

    let Ok(paid) = pool.swap(&mut ledger, bob(), 0, 2, dx, dy) else {
        panic!("swap at the exact bound");
    };
    assert_eq!(paid, dy);
}

#[test]
fn rate_asset_is_priced_by_its_rate() {
    let staked = tok(4, 6);
    let Ok(rated) = AssetConfig::new(staked, 2) else {
        panic!("valid asset");
    };
    let Ok(cfg) = PoolConfig::new(
        [AssetConfig::reference(dai()), AssetConfig::reference(usdc()), rated],
        200,
        fee_4bp(),
    ) else {
        panic!("valid config");
    };
    let Ok(mut pool) = StableSwapPool::new(cfg) else {
        panic!("valid pool");
    };
    let mut ledger = funded_ledger(pool.tokens(), &[alice(), bob()]);
    let amounts = [dai().whole(1_000), usdc().whole(1_000), staked.whole(500)];
    let Ok(minted) = pool.add_liquidity(&mut ledger, alice(), amounts, Shares::ZERO) else {
        panic!("genesis deposit");
    };
    // 500 units worth 2 each make the pool balanced.
    assert_eq!(minted, Shares::new(3_000 * E18));

    let Ok(out) = pool.swap(&mut ledger, bob(), 2, 0, staked.whole(1), Amount::ZERO) else {
        panic!("swap");
    };
    assert!(out.get() < 2 * E18);
    assert!(out.get() > 1_990_000_000_000_000_000, "out = {out}");
}

// ---------------------------------------------------------------------------
// Ledger failure and rollback
// ---------------------------------------------------------------------------

#[test]
fn failed_payout_rolls_back_swap() {
    let (mut pool, mut ledger) = seeded(200, 10_000);
    let before = pool.state().clone();
    // call 0 = debit of DAI, call 1 = credit of USDC
    ledger.fail_on_call(1);
    assert_eq!(
        pool.swap(&mut ledger, bob(), 0, 1, dai().whole(10), Amount::ZERO),
        Err(AmmError::Ledger(LedgerError::Rejected("injected failure")))
    );
    assert_eq!(pool.state(), &before);
    assert_eq!(ledger.balance_of(&dai(), &bob()), dai().whole(100_000_000));
    assert_eq!(ledger.balance_of(&usdc(), &bob()), usdc().whole(100_000_000));
    assert!(pool.take_events().is_empty());
    assert_custody_matches(&pool, &ledger);
}

#[test]
fn failed_third_debit_rolls_back_deposit() {
    let (mut pool, mut ledger) = seeded(200, 10_000);
    let before = pool.state().clone();
    ledger.fail_on_call(2);
    let Err(AmmError::Ledger(_)) = pool.add_liquidity(&mut ledger, bob(), basket(10), Shares::ZERO) else {
        panic!("expected ledger error");
    };
    assert_eq!(pool.state(), &before);
    for t in pool.tokens() {
        assert_eq!(ledger.balance_of(t, &bob()), t.whole(100_000_000));
    }
    assert_custody_matches(&pool, &ledger);
}

#[test]
fn unfunded_depositor_changes_nothing() {
    let (mut pool, mut ledger) = seeded(200, 10_000);
    let stranger = AccountId::from_bytes([0x5e; 32]);
    let before = pool.state().clone();
    assert_eq!(
        pool.add_liquidity(&mut ledger, stranger, basket(1), Shares::ZERO),
        Err(AmmError::Ledger(LedgerError::InsufficientBalance))
    );
    assert_eq!(pool.state(), &before);
}

#[test]
fn failed_payout_rolls_back_proportional_withdrawal() {
    let (mut pool, mut ledger) = seeded(200, 10_000);
    let before = pool.state().clone();
    // no debits; calls 0 and 1 are credits, call 2 fails
    ledger.fail_on_call(2);
    let Err(AmmError::Ledger(_)) =
        pool.remove_liquidity(&mut ledger, alice(), Shares::new(E18), [Amount::ZERO; N_ASSETS])
    else {
        panic!("expected ledger error");
    };
    assert_eq!(pool.state(), &before);
    assert_eq!(pool.shares_of(&alice()), Shares::new(30_000 * E18));
    assert_custody_matches(&pool, &ledger);
}

// ---------------------------------------------------------------------------
// Events and concurrency
// ---------------------------------------------------------------------------

#[test]
fn events_follow_committed_operations() {
    let (mut pool, mut ledger) = seeded(200, 10_000);
    let Ok(minted) = pool.add_liquidity(&mut ledger, bob(), basket(5), Shares::ZERO) else {
        panic!("deposit");
    };
    let Ok(dy) = pool.swap(&mut ledger, bob(), 1, 0, usdc().whole(3), Amount::ZERO) else {
        panic!("swap");
    };
    let Ok(out) = pool.remove_liquidity(&mut ledger, bob(), minted, [Amount::ZERO; N_ASSETS]) else {
        panic!("withdraw");
    };

    let events = pool.take_events();
    assert_eq!(
        events,
        vec![
            PoolEvent::LiquidityAdded {
                actor: bob(),
                amounts: basket(5),
                shares_minted: minted,
            },
            PoolEvent::SwapExecuted {
                actor: bob(),
                from: 1,
                to: 0,
                amount_in: usdc().whole(3),
                amount_out: dy,
            },
            PoolEvent::LiquidityRemoved {
                actor: bob(),
                amounts_out: out,
                shares_burned: minted,
            },
        ]
    );
    let Ok(json) = serde_json::to_string(&events) else {
        panic!("serialize");
    };
    assert!(json.contains("\"liquidity_added\""));
}

#[test]
fn shared_pool_serializes_concurrent_swaps() {
    let (pool, ledger) = seeded(200, 1_000_000);
    let shared = SharedPool::new(pool);
    let ledger = Arc::new(Mutex::new(ledger));
    let Ok(vp_start) = shared.virtual_price() else {
        panic!("virtual price");
    };

    let handles: Vec<_> = (0..4usize)
        .map(|t| {
            let shared = shared.clone();
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for n in 0..10usize {
                    let i = (t + n) % N_ASSETS;
                    let j = (i + 1) % N_ASSETS;
                    let dx = shared.with(|p| p.tokens()[i]).whole(100);
                    let result = shared.with(|p| {
                        let mut ledger = ledger.lock();
                        p.swap(&mut *ledger, bob(), i, j, dx, Amount::ZERO)
                    });
                    assert!(result.is_ok(), "thread {t} swap {n}: {result:?}");
                }
            })
        })
        .collect();
    for h in handles {
        let Ok(()) = h.join() else {
            panic!("worker panicked");
        };
    }

    let Ok(vp_end) = shared.virtual_price() else {
        panic!("virtual price");
    };
    assert!(vp_end >= vp_start);
    let snapshot = shared.snapshot();
    assert_eq!(
        snapshot
            .clone()
            .take_events()
            .iter()
            .filter(|e| matches!(e, PoolEvent::SwapExecuted { .. }))
            .count(),
        40
    );
    assert_custody_matches(&snapshot, &ledger.lock());
}
