//! Three-asset StableSwap walkthrough (Curve 3pool style).
//!
//! Seeds a DAI / USDC / USDT pool, trades across it, and withdraws in
//! every supported way, printing balances and the virtual price as it
//! goes.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=tripool_amm=debug cargo run --example three_pool
//! ```

use tracing_subscriber::EnvFilter;
use tripool_amm::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Three-asset StableSwap ===\n");

    // ── 1. Define the assets ────────────────────────────────────────────
    let dai = Token::new(TokenAddress::from_bytes([1u8; 32]), Decimals::new(18)?);
    let usdc = Token::new(TokenAddress::from_bytes([2u8; 32]), Decimals::new(6)?);
    let usdt = Token::new(TokenAddress::from_bytes([3u8; 32]), Decimals::new(6)?);

    // ── 2. Configure the pool ───────────────────────────────────────────
    //    A = 200, 4 bp swap fee (liquidity fee derives to 1.5 bp)
    let config = PoolConfig::new(
        [
            AssetConfig::reference(dai),
            AssetConfig::reference(usdc),
            AssetConfig::reference(usdt),
        ],
        200,
        FeeRate::from_bps(4)?,
    )?;
    println!("Amplification: {}", config.amplification());
    println!("Swap fee:      {}", config.swap_fee());
    println!("Multipliers:   {:?}", config.multipliers());

    let mut pool = StableSwapPool::new(config)?;
    println!("Liquidity fee: {}", pool.fee_model().liquidity_fee());

    // ── 3. Fund two accounts ────────────────────────────────────────────
    let lp = AccountId::from_bytes([0xaa; 32]);
    let trader = AccountId::from_bytes([0xbb; 32]);
    let mut ledger = InMemoryLedger::new();
    for who in [lp, trader] {
        for t in [dai, usdc, usdt] {
            ledger.mint(&t, &who, t.whole(10_000_000));
        }
    }

    // ── 4. Genesis deposit ──────────────────────────────────────────────
    let seed = [dai.whole(1_000_000), usdc.whole(1_000_000), usdt.whole(1_000_000)];
    let minted = pool.add_liquidity(&mut ledger, lp, seed, Shares::ZERO)?;
    println!("\nGenesis deposit minted {minted} shares");
    println!("  Invariant D:    {}", pool.invariant()?);
    println!("  Virtual price:  {}", pool.virtual_price()?);

    // ── 5. Trade ────────────────────────────────────────────────────────
    let dx = dai.whole(50_000);
    let quoted = pool.get_dy(0, 1, dx)?;
    let dy = pool.swap(&mut ledger, trader, 0, 1, dx, quoted)?;
    println!("\n--- Swap: sell {dx} raw DAI ---");
    println!("  Received:       {dy} raw USDC");
    println!("  Virtual price:  {}", pool.virtual_price()?);

    // Asking for one unit more than the quote is rejected and changes nothing.
    let dx = usdt.whole(1_000);
    let quoted = pool.get_dy(2, 0, dx)?;
    let too_high = quoted.safe_add(&Amount::new(1))?;
    match pool.swap(&mut ledger, trader, 2, 0, dx, too_high) {
        Err(AmmError::SlippageExceeded(reason)) => println!("  Rejected:       {reason}"),
        other => println!("  Unexpected:     {other:?}"),
    }

    // ── 6. Withdraw ─────────────────────────────────────────────────────
    let tenth = Shares::new(minted.get() / 10);
    let basket = pool.remove_liquidity(&mut ledger, lp, tenth, [Amount::ZERO; N_ASSETS])?;
    println!("\nProportional withdrawal of {tenth} shares: {basket:?}");

    let (one, fee) = pool.calc_withdraw_one_token(tenth, 2)?;
    let out = pool.remove_liquidity_one_token(&mut ledger, lp, tenth, 2, one)?;
    println!("One-token withdrawal: {out} raw USDT (imbalance fee {fee})");

    let exact = [dai.whole(1_000), Amount::ZERO, usdt.whole(500)];
    let burned = pool.remove_liquidity_imbalance(&mut ledger, lp, exact, tenth)?;
    println!("Imbalanced withdrawal burned {burned} shares");

    // ── 7. Final state ──────────────────────────────────────────────────
    println!("\nBalances:       {:?}", pool.balances());
    println!("Total shares:   {}", pool.total_shares());
    println!("Virtual price:  {}", pool.virtual_price()?);
    println!("LP deposits:    {:?}", pool.user_deposits(&lp));

    for event in pool.take_events() {
        println!("event: {}", serde_json::to_string(&event)?);
    }

    Ok(())
}
