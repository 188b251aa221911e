//! One-directional constant-product swaps
//!
//! The input reserve used in the formula is the ledger reserve before the
//! deposit, i.e. the observed balance minus the amount that just landed.
//! The output and platform fee are paid from the reserves only after the
//! computation succeeds.

use tracing::debug;

use crate::error::{AmmError, AmmResult};
use crate::fees::FeeSide;
use crate::pool_state::{Asset, PoolState, SwapDirection};
use crate::ratio::RatioOracle;

/// Result of a swap and the state to commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub direction: SwapDirection,
    pub in_amount: u128,
    pub out_amount: u128,
    /// Protocol fee, denominated in `platform_fee_asset`
    pub platform_fee: u128,
    pub platform_fee_asset: Asset,
    pub pool: PoolState,
}

/// Read-only price quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    pub out_amount: u128,
    pub platform_fee: u128,
    pub platform_fee_asset: Asset,
}

pub struct SwapEngine;

impl SwapEngine {
    /// Swap `in_amount` of the input asset, requiring at least `min_out_amount` back
    pub fn swap(
        pool: &PoolState,
        direction: SwapDirection,
        in_amount: u128,
        min_out_amount: u128,
    ) -> AmmResult<SwapOutcome> {
        if in_amount == 0 {
            return Err(AmmError::ZeroInput { operation: "swap" });
        }
        pool.ensure_operable()?;

        let fees = pool.fees();
        let (in_reserve, out_reserve) = pool.reserves_for(direction);

        let out_amount = fees.output_with_fee(in_amount, in_reserve, out_reserve, fees.swap_fee())?;
        if out_amount == 0 {
            return Err(AmmError::ZeroSwapOutput);
        }
        if out_amount < min_out_amount {
            return Err(AmmError::SlippageExceeded {
                out_amount,
                min_out_amount,
            });
        }

        let fee_in_output = fees.platform_fee_of(in_amount, in_reserve, out_reserve)?;
        let in_asset = direction.input_asset();
        let out_asset = direction.output_asset();

        let (platform_fee, platform_fee_asset, new_in_reserve, new_out_reserve) =
            match pool.platform_fee_asset().side_for(direction) {
                FeeSide::Output => {
                    let paid_out = out_amount
                        .checked_add(fee_in_output)
                        .filter(|paid| *paid < out_reserve)
                        .ok_or(AmmError::InsufficientLiquidity)?;
                    let new_in = in_reserve
                        .checked_add(in_amount)
                        .ok_or(AmmError::Overflow)?;

                    (fee_in_output, out_asset, new_in, out_reserve - paid_out)
                }
                FeeSide::Input => {
                    if out_amount >= out_reserve {
                        return Err(AmmError::InsufficientLiquidity);
                    }
                    let deposited = in_reserve
                        .checked_add(in_amount)
                        .ok_or(AmmError::Overflow)?;
                    let fee_in_input = Self::fee_in_input(pool, fee_in_output, out_reserve, deposited)?;
                    let new_in = deposited
                        .checked_sub(fee_in_input)
                        .ok_or(AmmError::InsufficientLiquidity)?;

                    (fee_in_input, in_asset, new_in, out_reserve - out_amount)
                }
            };

        let mut next = pool.clone();
        next.set_reserve(in_asset, new_in_reserve);
        next.set_reserve(out_asset, new_out_reserve);
        RatioOracle::update(&mut next);

        debug!(
            ?direction,
            in_amount,
            out_amount,
            platform_fee,
            ?platform_fee_asset,
            reserve_x = next.reserve_x(),
            reserve_y = next.reserve_y(),
            "Computed swap"
        );

        Ok(SwapOutcome {
            direction,
            in_amount,
            out_amount,
            platform_fee,
            platform_fee_asset,
            pool: next,
        })
    }

    /// Output and platform fee for a prospective swap, without slippage limit
    pub fn quote(
        pool: &PoolState,
        direction: SwapDirection,
        in_amount: u128,
    ) -> AmmResult<SwapQuote> {
        let outcome = Self::swap(pool, direction, in_amount, 0)?;
        Ok(SwapQuote {
            out_amount: outcome.out_amount,
            platform_fee: outcome.platform_fee,
            platform_fee_asset: outcome.platform_fee_asset,
        })
    }

    /// Smallest input that buys at least `out_amount` at the current swap fee
    pub fn quote_input(
        pool: &PoolState,
        direction: SwapDirection,
        out_amount: u128,
    ) -> AmmResult<u128> {
        if out_amount == 0 {
            return Err(AmmError::ZeroInput { operation: "quote" });
        }
        pool.ensure_operable()?;

        let (in_reserve, out_reserve) = pool.reserves_for(direction);
        let fees = pool.fees();
        fees.input_for_output(out_amount, in_reserve, out_reserve, fees.swap_fee())
    }

    /// Ledger reserve for a caller that only sees the post-deposit balance
    pub fn effective_reserve(observed_balance: u128, just_received: u128) -> AmmResult<u128> {
        observed_balance
            .checked_sub(just_received)
            .ok_or(AmmError::InsufficientLiquidity)
    }

    // Fee-less reverse trade of the output-asset fee back into the input asset,
    // priced against the reserves after the deposit landed
    fn fee_in_input(
        pool: &PoolState,
        fee_in_output: u128,
        out_reserve: u128,
        in_reserve_after_deposit: u128,
    ) -> AmmResult<u128> {
        if fee_in_output == 0 {
            return Ok(0);
        }
        pool.fees().output_with_fee(
            fee_in_output,
            out_reserve - fee_in_output,
            in_reserve_after_deposit,
            0,
        )
    }
}
