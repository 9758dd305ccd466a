//! Three-asset StableSwap pool (Curve 3pool style).
//!
//! Specialised for low-slippage exchange between pegged assets that
//! differ in decimals or carry a fixed exchange-rate constant.
//!
//! # Operation shape
//!
//! Every mutating operation follows the same steps:
//!
//! 1. Normalize current balances and price the operation with the
//!    invariant and balance solvers. Nothing is mutated.
//! 2. Check every failure condition, slippage bounds included.
//! 3. Hand the resulting [`Delta`] to the settlement step, which debits
//!    inbound assets, commits state, and credits outbound assets, or
//!    rolls all of it back.
//! 4. Record a [`PoolEvent`].
//!
//! Read-only quotes ([`get_dy`](StableSwapPool::get_dy),
//! [`calc_withdraw_one_token`](StableSwapPool::calc_withdraw_one_token),
//! [`calc_token_amount`](StableSwapPool::calc_token_amount)) run step 1
//! only and return exactly what the matching operation would pay.
//!
//! # Rounding
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | swap and one-token outputs | down, after subtracting 1 normalized unit |
//! | pro-rata withdrawal | down |
//! | shares minted | down |
//! | shares burned by an imbalanced withdrawal | down, then + 1 |
//! | fees | down |

use primitive_types::U256;
use tracing::{info, warn};

use super::fee_model::{deduct, FeeModel};
use super::settlement::settle;
use super::state::{Delta, PoolState};
use crate::config::PoolConfig;
use crate::domain::{AccountId, Amount, PoolEvent, Rounding, Shares, Token};
use crate::error::AmmError;
use crate::math::{
    abs_diff, check_index, compute_d, denormalize, div_round_u256, normalize, normalize_one,
    solve_balance_for_d, solve_y_given_x, Xp,
};
use crate::traits::TokenLedger;
use crate::N_ASSETS;

/// `a · b / den`, rounded down.
fn mul_div(a: U256, b: U256, den: U256) -> Result<U256, AmmError> {
    let product = a
        .checked_mul(b)
        .ok_or(AmmError::Overflow("mul_div product overflow"))?;
    div_round_u256(product, den, Rounding::Down)
}

/// A StableSwap pool over exactly three assets.
///
/// Created from a validated [`PoolConfig`]; the amplification, fee
/// rate, and normalization multipliers are fixed for its lifetime.
///
/// # State
///
/// - raw `balances` per asset and `total_shares` outstanding.
/// - per-owner share balances and net deposits.
/// - a buffer of [`PoolEvent`]s for committed operations, drained with
///   [`take_events`](Self::take_events).
///
/// Mutating operations take `&mut self`, so one pool value serves one
/// writer at a time. Use [`SharedPool`](super::SharedPool) to share a
/// pool between threads.
#[derive(Debug, Clone)]
pub struct StableSwapPool {
    config: PoolConfig,
    fees: FeeModel,
    tokens: [Token; N_ASSETS],
    multipliers: [u128; N_ASSETS],
    state: PoolState,
    events: Vec<PoolEvent>,
}

impl StableSwapPool {
    /// Creates an empty pool.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if the derived liquidity fee is
    /// out of range.
    pub fn new(config: PoolConfig) -> Result<Self, AmmError> {
        let fees = FeeModel::new(config.swap_fee())?;
        let assets = config.assets();
        let tokens = core::array::from_fn(|k| assets[k].token());
        let multipliers = config.multipliers();
        Ok(Self {
            config,
            fees,
            tokens,
            multipliers,
            state: PoolState::new(),
            events: Vec::new(),
        })
    }

    /// Returns the construction parameters.
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns the fee schedule.
    #[must_use]
    pub const fn fee_model(&self) -> FeeModel {
        self.fees
    }

    /// Returns the pool's tokens in index order.
    #[must_use]
    pub const fn tokens(&self) -> &[Token; N_ASSETS] {
        &self.tokens
    }

    /// Returns the underlying state.
    #[must_use]
    pub const fn state(&self) -> &PoolState {
        &self.state
    }

    /// Raw balances per asset.
    #[must_use]
    pub const fn balances(&self) -> [Amount; N_ASSETS] {
        self.state.balances()
    }

    /// Total shares outstanding.
    #[must_use]
    pub const fn total_shares(&self) -> Shares {
        self.state.total_shares()
    }

    /// Shares held by `owner`.
    #[must_use]
    pub fn shares_of(&self, owner: &AccountId) -> Shares {
        self.state.shares_of(owner)
    }

    /// Best-effort net deposits of `owner`, floored at zero.
    #[must_use]
    pub fn user_deposits(&self, owner: &AccountId) -> [Amount; N_ASSETS] {
        self.state.deposited_of(owner)
    }

    /// Drains the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<PoolEvent> {
        core::mem::take(&mut self.events)
    }

    fn amp(&self) -> u128 {
        self.config.amplification()
    }

    fn xp(&self) -> Xp {
        normalize(&self.state.balances(), &self.multipliers)
    }

    /// Current invariant `D` of the pool's balances.
    ///
    /// # Errors
    ///
    /// Any error from [`compute_d`].
    pub fn invariant(&self) -> Result<U256, AmmError> {
        compute_d(&self.xp(), self.amp())
    }

    /// Value of one share in normalized units, scaled by `10^18`.
    ///
    /// Zero while no shares exist. Never decreases across fee-charging
    /// operations.
    ///
    /// # Errors
    ///
    /// Any error from [`compute_d`].
    pub fn virtual_price(&self) -> Result<U256, AmmError> {
        let total = self.state.total_shares();
        if total.is_zero() {
            return Ok(U256::zero());
        }
        mul_div(self.invariant()?, U256::exp10(18), total.to_u256())
    }

    // -----------------------------------------------------------------
    // Swap
    // -----------------------------------------------------------------

    /// Returns `(dy, fee)` for selling `dx` of asset `i` for asset `j`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IndexOutOfRange`] / [`AmmError::SameTokenSwap`] for
    ///   bad indices.
    /// - [`AmmError::InvalidQuantity`] if `dx` is zero.
    /// - [`AmmError::NoLiquidity`] if the pool is empty.
    /// - [`AmmError::Underflow`] if the output is smaller than the
    ///   rounding margin.
    /// - [`AmmError::InvalidQuantity`] if the output rounds down to zero
    ///   raw units of asset `j`.
    pub fn quote_swap(&self, i: usize, j: usize, dx: Amount) -> Result<(Amount, Amount), AmmError> {
        check_index(i)?;
        check_index(j)?;
        if i == j {
            return Err(AmmError::SameTokenSwap);
        }
        if dx.is_zero() {
            return Err(AmmError::InvalidQuantity("swap amount must be greater than zero"));
        }
        if self.state.total_shares().is_zero() {
            return Err(AmmError::NoLiquidity);
        }

        let xp = self.xp();
        let x = xp[i]
            .checked_add(normalize_one(dx, self.multipliers[i]))
            .ok_or(AmmError::Overflow("swap input overflow"))?;
        let y = solve_y_given_x(i, j, x, &xp, self.amp())?;
        let dy = xp[j]
            .checked_sub(y)
            .and_then(|out| out.checked_sub(U256::one()))
            .ok_or(AmmError::Underflow("swap output below rounding margin"))?;
        let gross = denormalize(dy, self.multipliers[j], Rounding::Down)?;
        let (net, fee) = self.fees.charge_swap(gross)?;
        if net.is_zero() {
            return Err(AmmError::InvalidQuantity("swap output rounds to zero"));
        }
        Ok((net, fee))
    }

    /// Amount of asset `j` that [`swap`](Self::swap) would pay for `dx`
    /// of asset `i` right now, swap fee included.
    ///
    /// # Errors
    ///
    /// Same as [`quote_swap`](Self::quote_swap).
    pub fn get_dy(&self, i: usize, j: usize, dx: Amount) -> Result<Amount, AmmError> {
        self.quote_swap(i, j, dx).map(|(dy, _)| dy)
    }

    /// Sells `dx` of asset `i` for at least `min_dy` of asset `j`.
    ///
    /// # Errors
    ///
    /// - Any error from [`quote_swap`](Self::quote_swap).
    /// - [`AmmError::SlippageExceeded`] if the output is below `min_dy`.
    /// - [`AmmError::Ledger`] if a token movement fails.
    ///
    /// On error the pool and the ledger are as they were before the call.
    pub fn swap(
        &mut self,
        ledger: &mut impl TokenLedger,
        actor: AccountId,
        i: usize,
        j: usize,
        dx: Amount,
        min_dy: Amount,
    ) -> Result<Amount, AmmError> {
        let (dy, fee) = self.quote_swap(i, j, dx)?;
        if dy < min_dy {
            warn!(%actor, from = i, to = j, %dy, %min_dy, "swap rejected: slippage");
            return Err(AmmError::SlippageExceeded("swap output below minimum"));
        }

        let mut delta = Delta::empty(actor);
        delta.inbound[i] = dx;
        delta.outbound[j] = dy;
        settle(&mut self.state, &self.tokens, &delta, ledger)?;

        info!(%actor, from = i, to = j, amount_in = %dx, amount_out = %dy, %fee, "swap executed");
        self.events.push(PoolEvent::SwapExecuted {
            actor,
            from: i,
            to: j,
            amount_in: dx,
            amount_out: dy,
        });
        Ok(dy)
    }

    // -----------------------------------------------------------------
    // Deposits
    // -----------------------------------------------------------------

    /// Shares [`add_liquidity`](Self::add_liquidity) would mint for
    /// `amounts`, imbalance fee included.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if the pool is empty and any amount
    ///   is zero.
    /// - [`AmmError::LiquidityNotIncreased`] if the deposit does not raise
    ///   the invariant (an all-zero deposit into a funded pool).
    pub fn quote_add_liquidity(&self, amounts: &[Amount; N_ASSETS]) -> Result<Shares, AmmError> {
        let total = self.state.total_shares();
        if total.is_zero() && amounts.iter().any(Amount::is_zero) {
            return Err(AmmError::InvalidQuantity("genesis deposit must include every asset"));
        }

        let amp = self.amp();
        let xp0 = self.xp();
        let d0 = if total.is_zero() {
            U256::zero()
        } else {
            compute_d(&xp0, amp)?
        };

        let mut xp1 = xp0;
        for (k, x) in xp1.iter_mut().enumerate() {
            *x = x
                .checked_add(normalize_one(amounts[k], self.multipliers[k]))
                .ok_or(AmmError::Overflow("deposit balance overflow"))?;
        }
        let d1 = compute_d(&xp1, amp)?;
        if d1 <= d0 {
            return Err(AmmError::LiquidityNotIncreased);
        }

        // Genesis: no prior ratio to be imbalanced against.
        if total.is_zero() {
            return Shares::try_from_u256(d1);
        }

        let fees = self.fees.imbalance_fees(&xp0, &xp1, d0, d1)?;
        let d2 = compute_d(&deduct(&xp1, &fees)?, amp)?;
        let gain = d2.checked_sub(d0).ok_or(AmmError::LiquidityNotIncreased)?;
        Shares::try_from_u256(mul_div(gain, total.to_u256(), d0)?)
    }

    /// Deposits `amounts` and mints at least `min_shares` to `actor`.
    ///
    /// # Errors
    ///
    /// - Any error from [`quote_add_liquidity`](Self::quote_add_liquidity).
    /// - [`AmmError::InsufficientSharesMinted`] if fewer than `min_shares`
    ///   (or zero) shares would be minted.
    /// - [`AmmError::Ledger`] if a token movement fails.
    pub fn add_liquidity(
        &mut self,
        ledger: &mut impl TokenLedger,
        actor: AccountId,
        amounts: [Amount; N_ASSETS],
        min_shares: Shares,
    ) -> Result<Shares, AmmError> {
        let minted = self.quote_add_liquidity(&amounts)?;
        if minted.is_zero() || minted < min_shares {
            warn!(%actor, %minted, %min_shares, "deposit rejected: slippage");
            return Err(AmmError::InsufficientSharesMinted);
        }

        let delta = Delta {
            inbound: amounts,
            minted,
            track_deposits: true,
            ..Delta::empty(actor)
        };
        settle(&mut self.state, &self.tokens, &delta, ledger)?;

        info!(%actor, ?amounts, %minted, "liquidity added");
        self.events.push(PoolEvent::LiquidityAdded {
            actor,
            amounts,
            shares_minted: minted,
        });
        Ok(minted)
    }

    /// Fee-free estimate of the shares minted by depositing `amounts`
    /// (`is_deposit`) or burned by withdrawing them.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NoLiquidity`] for a withdrawal from an empty pool.
    /// - [`AmmError::InsufficientBalance`] if a withdrawal exceeds a
    ///   balance.
    /// - Any solver error.
    pub fn calc_token_amount(
        &self,
        amounts: &[Amount; N_ASSETS],
        is_deposit: bool,
    ) -> Result<Shares, AmmError> {
        let total = self.state.total_shares();
        if total.is_zero() && !is_deposit {
            return Err(AmmError::NoLiquidity);
        }

        let amp = self.amp();
        let xp0 = self.xp();
        let mut xp1 = xp0;
        for (k, x) in xp1.iter_mut().enumerate() {
            let change = normalize_one(amounts[k], self.multipliers[k]);
            *x = if is_deposit {
                x.checked_add(change)
                    .ok_or(AmmError::Overflow("deposit balance overflow"))?
            } else {
                x.checked_sub(change).ok_or(AmmError::InsufficientBalance)?
            };
        }
        let d1 = compute_d(&xp1, amp)?;
        if total.is_zero() {
            return Shares::try_from_u256(d1);
        }

        let d0 = compute_d(&xp0, amp)?;
        Shares::try_from_u256(mul_div(abs_diff(d1, d0), total.to_u256(), d0)?)
    }

    // -----------------------------------------------------------------
    // Withdrawals
    // -----------------------------------------------------------------

    fn check_withdraw_shares(&self, shares: Shares) -> Result<Shares, AmmError> {
        let total = self.state.total_shares();
        if total.is_zero() {
            return Err(AmmError::NoLiquidity);
        }
        if shares.is_zero() {
            return Err(AmmError::InvalidSharesAmount("shares must be greater than zero"));
        }
        if shares > total {
            return Err(AmmError::InvalidSharesAmount("shares exceed total supply"));
        }
        Ok(total)
    }

    fn check_owner(&self, actor: &AccountId, shares: Shares) -> Result<(), AmmError> {
        if shares > self.state.shares_of(actor) {
            return Err(AmmError::InvalidSharesAmount("shares exceed owner balance"));
        }
        Ok(())
    }

    /// Burns `shares` for a pro-rata slice of every balance.
    ///
    /// No curve math and no fee: a proportional withdrawal is
    /// imbalance-free.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NoLiquidity`] if no shares exist.
    /// - [`AmmError::InvalidSharesAmount`] if `shares` is zero or exceeds
    ///   the actor's balance.
    /// - [`AmmError::SlippageExceeded`] if any output is below its bound.
    /// - [`AmmError::Ledger`] if a token movement fails.
    pub fn remove_liquidity(
        &mut self,
        ledger: &mut impl TokenLedger,
        actor: AccountId,
        shares: Shares,
        min_amounts: [Amount; N_ASSETS],
    ) -> Result<[Amount; N_ASSETS], AmmError> {
        let total = self.check_withdraw_shares(shares)?;
        self.check_owner(&actor, shares)?;

        let balances = self.state.balances();
        let mut amounts_out = [Amount::ZERO; N_ASSETS];
        for (k, out) in amounts_out.iter_mut().enumerate() {
            *out = Amount::try_from_u256(mul_div(
                balances[k].to_u256(),
                shares.to_u256(),
                total.to_u256(),
            )?)?;
            if *out < min_amounts[k] {
                warn!(%actor, asset = k, amount = %out, minimum = %min_amounts[k], "withdrawal rejected: slippage");
                return Err(AmmError::SlippageExceeded("withdrawn amount below minimum"));
            }
        }

        let delta = Delta {
            outbound: amounts_out,
            burned: shares,
            track_deposits: true,
            ..Delta::empty(actor)
        };
        settle(&mut self.state, &self.tokens, &delta, ledger)?;

        info!(%actor, ?amounts_out, %shares, "liquidity removed");
        self.events.push(PoolEvent::LiquidityRemoved {
            actor,
            amounts_out,
            shares_burned: shares,
        });
        Ok(amounts_out)
    }

    /// Returns `(amount_out, fee)` for burning `shares` into asset `i`
    /// alone.
    ///
    /// `fee` is the difference between the fee-free amount and what the
    /// caller actually receives.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IndexOutOfRange`] if `i` is not in `0..3`.
    /// - [`AmmError::NoLiquidity`] if no shares exist.
    /// - [`AmmError::InvalidSharesAmount`] if `shares` is zero, exceeds
    ///   the supply, or is the whole supply (use
    ///   [`remove_liquidity`](Self::remove_liquidity) to exit completely).
    /// - [`AmmError::InvalidQuantity`] if the output rounds down to zero
    ///   raw units.
    /// - Any solver error.
    pub fn calc_withdraw_one_token(&self, shares: Shares, i: usize) -> Result<(Amount, Amount), AmmError> {
        check_index(i)?;
        let total = self.check_withdraw_shares(shares)?;
        // Retiring all of D would strand the other two balances.
        if shares == total {
            return Err(AmmError::InvalidSharesAmount(
                "one-token withdrawal cannot burn the whole supply",
            ));
        }

        let amp = self.amp();
        let mult = self.multipliers[i];
        let xp = self.xp();
        let d0 = compute_d(&xp, amp)?;
        let retired = mul_div(d0, shares.to_u256(), total.to_u256())?;
        let d1 = d0
            .checked_sub(retired)
            .ok_or(AmmError::Underflow("retired invariant exceeds D"))?;

        let new_y = solve_balance_for_d(i, &xp, d1, amp)?;
        let fee_free = xp[i]
            .checked_sub(new_y)
            .ok_or(AmmError::Underflow("withdrawal raised the asset balance"))?;
        let dy0 = denormalize(fee_free, mult, Rounding::Down)?;

        let mut after = xp;
        after[i] = new_y;
        let fees = self.fees.imbalance_fees(&xp, &after, d0, d1)?;
        let reduced = deduct(&xp, &fees)?;

        let y1 = solve_balance_for_d(i, &reduced, d1, amp)?;
        let dy = reduced[i]
            .checked_sub(y1)
            .and_then(|out| out.checked_sub(U256::one()))
            .ok_or(AmmError::Underflow("withdrawal output below rounding margin"))?;
        let dy = denormalize(dy, mult, Rounding::Down)?;
        if dy.is_zero() {
            return Err(AmmError::InvalidQuantity("withdrawal output rounds to zero"));
        }

        Ok((dy, dy0.saturating_sub(&dy)))
    }

    /// Burns `shares` for at least `min_amount` of asset `i`.
    ///
    /// # Errors
    ///
    /// - Any error from
    ///   [`calc_withdraw_one_token`](Self::calc_withdraw_one_token).
    /// - [`AmmError::InvalidSharesAmount`] if `shares` exceeds the
    ///   actor's balance.
    /// - [`AmmError::SlippageExceeded`] if the output is below
    ///   `min_amount`.
    /// - [`AmmError::Ledger`] if a token movement fails.
    pub fn remove_liquidity_one_token(
        &mut self,
        ledger: &mut impl TokenLedger,
        actor: AccountId,
        shares: Shares,
        i: usize,
        min_amount: Amount,
    ) -> Result<Amount, AmmError> {
        let (amount_out, fee) = self.calc_withdraw_one_token(shares, i)?;
        self.check_owner(&actor, shares)?;
        if amount_out < min_amount {
            warn!(%actor, asset = i, %amount_out, %min_amount, "one-token withdrawal rejected: slippage");
            return Err(AmmError::SlippageExceeded("withdrawn amount below minimum"));
        }

        let mut delta = Delta {
            burned: shares,
            track_deposits: true,
            ..Delta::empty(actor)
        };
        delta.outbound[i] = amount_out;
        settle(&mut self.state, &self.tokens, &delta, ledger)?;

        info!(%actor, asset = i, %amount_out, %fee, %shares, "liquidity removed in one token");
        self.events.push(PoolEvent::LiquidityRemovedOneToken {
            actor,
            asset_index: i,
            amount_out,
            shares_burned: shares,
        });
        Ok(amount_out)
    }

    /// Shares [`remove_liquidity_imbalance`](Self::remove_liquidity_imbalance)
    /// would burn to withdraw exactly `amounts`, imbalance fee included.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NoLiquidity`] if no shares exist.
    /// - [`AmmError::InvalidQuantity`] if every amount is zero.
    /// - [`AmmError::InsufficientBalance`] if an amount exceeds its
    ///   balance.
    /// - Any solver error.
    pub fn quote_remove_liquidity_imbalance(
        &self,
        amounts: &[Amount; N_ASSETS],
    ) -> Result<Shares, AmmError> {
        let total = self.state.total_shares();
        if total.is_zero() {
            return Err(AmmError::NoLiquidity);
        }
        if amounts.iter().all(Amount::is_zero) {
            return Err(AmmError::InvalidQuantity("withdrawal must include at least one asset"));
        }
        let balances = self.state.balances();
        if amounts.iter().zip(balances.iter()).any(|(a, b)| a > b) {
            return Err(AmmError::InsufficientBalance);
        }

        let amp = self.amp();
        let xp0 = self.xp();
        let d0 = compute_d(&xp0, amp)?;
        let mut xp1 = xp0;
        for (k, x) in xp1.iter_mut().enumerate() {
            *x = x
                .checked_sub(normalize_one(amounts[k], self.multipliers[k]))
                .ok_or(AmmError::InsufficientBalance)?;
        }
        let d1 = compute_d(&xp1, amp)?;
        let fees = self.fees.imbalance_fees(&xp0, &xp1, d0, d1)?;
        let d2 = compute_d(&deduct(&xp1, &fees)?, amp)?;

        let lost = d0
            .checked_sub(d2)
            .ok_or(AmmError::Underflow("withdrawal raised the invariant"))?;
        let burned = mul_div(lost, total.to_u256(), d0)?
            .checked_add(U256::one())
            .ok_or(AmmError::Overflow("burned shares overflow"))?;
        Shares::try_from_u256(burned)
    }

    /// Withdraws exactly `amounts`, burning at most `max_burn` shares.
    ///
    /// # Errors
    ///
    /// - Any error from
    ///   [`quote_remove_liquidity_imbalance`](Self::quote_remove_liquidity_imbalance).
    /// - [`AmmError::SlippageExceeded`] if more than `max_burn` shares
    ///   would be burned.
    /// - [`AmmError::InvalidSharesAmount`] if the burn exceeds the actor's
    ///   balance.
    /// - [`AmmError::Ledger`] if a token movement fails.
    pub fn remove_liquidity_imbalance(
        &mut self,
        ledger: &mut impl TokenLedger,
        actor: AccountId,
        amounts: [Amount; N_ASSETS],
        max_burn: Shares,
    ) -> Result<Shares, AmmError> {
        let burned = self.quote_remove_liquidity_imbalance(&amounts)?;
        if burned > max_burn {
            warn!(%actor, %burned, %max_burn, "imbalanced withdrawal rejected: slippage");
            return Err(AmmError::SlippageExceeded("burned shares above maximum"));
        }
        self.check_owner(&actor, burned)?;

        let delta = Delta {
            outbound: amounts,
            burned,
            track_deposits: true,
            ..Delta::empty(actor)
        };
        settle(&mut self.state, &self.tokens, &delta, ledger)?;

        info!(%actor, ?amounts, %burned, "liquidity removed imbalanced");
        self.events.push(PoolEvent::LiquidityRemovedImbalance {
            actor,
            amounts_out: amounts,
            shares_burned: burned,
        });
        Ok(burned)
    }
}
