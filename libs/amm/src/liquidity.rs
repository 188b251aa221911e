//! Liquidity provision: minting and burning LP shares
//!
//! ## Share Pricing
//!
//! - **First deposit**: both amounts are normalized to the pool's LP decimals
//!   and the geometric mean `isqrt(x * y)` becomes the initial share supply
//! - **Later deposits**: each side's contribution relative to its reserve is
//!   computed as a scale fraction and the smaller one prices the shares, so
//!   over-supplying one asset never mints extra shares
//! - **Burns**: redemptions are the exact pro-rata slice of both reserves
//!
//! Amounts are computed against the reserves recorded before the deposit,
//! which is what an observer sees as `balance - just_received`.

use tracing::debug;

use crate::error::{AmmError, AmmResult};
use crate::fixed_point::{convert_decimals, isqrt_product, mul_div};
use crate::pool_state::{LpSupply, PoolState};
use crate::ratio::RatioOracle;

/// Shares minted by a deposit and the state to commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOutcome {
    pub shares: u128,
    pub pool: PoolState,
}

/// Assets redeemed by a burn and the state to commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnOutcome {
    pub amount_x: u128,
    pub amount_y: u128,
    pub pool: PoolState,
}

pub struct LiquidityEngine;

impl LiquidityEngine {
    /// Deposit `amount_x` and `amount_y` and compute the shares owed
    pub fn mint(pool: &PoolState, amount_x: u128, amount_y: u128) -> AmmResult<MintOutcome> {
        if amount_x == 0 || amount_y == 0 {
            return Err(AmmError::ZeroInput { operation: "mint" });
        }
        if !pool.is_seeded() {
            return Err(AmmError::EmptyReserve);
        }

        // A pool whose every share was burned is re-seeded like a fresh one
        let first_deposit = !pool.initialized || pool.lp_issued == 0;

        let shares = if first_deposit {
            Self::initial_shares(pool, amount_x, amount_y)?
        } else {
            Self::proportional_shares(pool, amount_x, amount_y)?
        };

        if shares == 0 {
            return Err(AmmError::ZeroMintAmount);
        }

        let issued = pool
            .lp_issued
            .checked_add(shares)
            .filter(|issued| *issued <= pool.lp_supply.capacity())
            .ok_or(AmmError::Overflow)?;

        let mut next = pool.clone();
        next.reserve_x = pool
            .reserve_x
            .checked_add(amount_x)
            .ok_or(AmmError::Overflow)?;
        next.reserve_y = pool
            .reserve_y
            .checked_add(amount_y)
            .ok_or(AmmError::Overflow)?;
        next.lp_issued = issued;
        next.initialized = true;
        RatioOracle::update(&mut next);

        debug!(
            amount_x,
            amount_y,
            shares,
            first_deposit,
            total_lp_supply = issued,
            "Computed LP mint"
        );

        Ok(MintOutcome { shares, pool: next })
    }

    /// Redeem `lp_amount` shares for their slice of both reserves
    pub fn burn(pool: &PoolState, lp_amount: u128) -> AmmResult<BurnOutcome> {
        if lp_amount == 0 {
            return Err(AmmError::ZeroInput { operation: "burn" });
        }
        pool.ensure_operable()?;
        if lp_amount > pool.lp_issued {
            return Err(AmmError::InsufficientShares {
                requested: lp_amount,
                outstanding: pool.lp_issued,
            });
        }

        // Outstanding supply still counts the shares being redeemed
        let issued_before = pool.lp_issued;
        let amount_x = mul_div(pool.reserve_x, lp_amount, issued_before)?;
        let amount_y = mul_div(pool.reserve_y, lp_amount, issued_before)?;

        if amount_x == 0 || amount_y == 0 {
            return Err(AmmError::ZeroBurnAmount);
        }

        let mut next = pool.clone();
        next.reserve_x -= amount_x;
        next.reserve_y -= amount_y;
        next.lp_issued -= lp_amount;
        RatioOracle::update(&mut next);

        debug!(
            lp_amount,
            amount_x,
            amount_y,
            total_lp_supply = next.lp_issued,
            "Computed LP burn"
        );

        Ok(BurnOutcome {
            amount_x,
            amount_y,
            pool: next,
        })
    }

    /// Outstanding shares before a burn, from on-account LP balances
    ///
    /// With fixed-supply accounting the redeemed shares have already landed in
    /// the pool's account, so they are added back:
    /// `total - (pool_held_balance - just_received)`.
    pub fn issued_before_burn(
        lp_supply: LpSupply,
        pool_held_balance: u128,
        just_received: u128,
    ) -> AmmResult<u128> {
        let held_before = pool_held_balance
            .checked_sub(just_received)
            .ok_or(AmmError::InsufficientShares {
                requested: just_received,
                outstanding: pool_held_balance,
            })?;

        match lp_supply {
            LpSupply::Fixed { total } => total.checked_sub(held_before).ok_or(AmmError::Overflow),
            LpSupply::Counted => Err(AmmError::InvalidConfig(
                "counted LP supply has no pool-held balance".into(),
            )),
        }
    }

    fn initial_shares(pool: &PoolState, amount_x: u128, amount_y: u128) -> AmmResult<u128> {
        let normalized_x = convert_decimals(amount_x, pool.decimals_x, pool.lp_decimals)?;
        let normalized_y = convert_decimals(amount_y, pool.decimals_y, pool.lp_decimals)?;

        isqrt_product(normalized_x, normalized_y)
    }

    fn proportional_shares(pool: &PoolState, amount_x: u128, amount_y: u128) -> AmmResult<u128> {
        let scale = pool.scale();
        let ratio_x = mul_div(amount_x, scale, pool.reserve_x)?;
        let ratio_y = mul_div(amount_y, scale, pool.reserve_y)?;

        mul_div(ratio_x.min(ratio_y), pool.lp_issued, scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;

    fn seeded(config: &PoolConfig, x: u128, y: u128) -> PoolState {
        let pool = PoolState::new(config).unwrap();
        LiquidityEngine::mint(&pool, x, y).unwrap().pool
    }

    #[test]
    fn test_first_mint_uses_geometric_mean() {
        let pool = PoolState::new(&PoolConfig::two_token()).unwrap();
        let outcome = LiquidityEngine::mint(&pool, 1_000_000, 1_000_000).unwrap();

        assert_eq!(outcome.shares, 1_000_000);
        assert_eq!(outcome.pool.total_lp_supply(), 1_000_000);
        assert_eq!(outcome.pool.reserve_x(), 1_000_000);
        assert_eq!(outcome.pool.reserve_y(), 1_000_000);
        assert!(outcome.pool.is_initialized());
        assert_eq!(outcome.pool.ratio(), outcome.pool.scale());

        // input untouched
        assert!(!pool.is_initialized());
    }

    #[test]
    fn test_first_mint_normalizes_decimals() {
        let mut config = PoolConfig::arc200_pair();
        config.decimals_y = 8;
        let pool = PoolState::new(&config).unwrap();

        // 1.0 X (6 decimals) and 1.0 Y (8 decimals)
        let outcome = LiquidityEngine::mint(&pool, 1_000_000, 100_000_000).unwrap();
        assert_eq!(outcome.shares, 1_000_000);
        // reserves stay in raw units
        assert_eq!(outcome.pool.reserve_y(), 100_000_000);
    }

    #[test]
    fn test_proportional_mint() {
        let pool = seeded(&PoolConfig::two_token(), 1_000_000, 4_000_000);
        assert_eq!(pool.total_lp_supply(), 2_000_000);

        let outcome = LiquidityEngine::mint(&pool, 100_000, 400_000).unwrap();
        assert_eq!(outcome.shares, 200_000);
        assert_eq!(outcome.pool.total_lp_supply(), 2_200_000);
    }

    #[test]
    fn test_constrained_side_prices_shares() {
        let pool = seeded(&PoolConfig::two_token(), 1_000_000, 1_000_000);

        // over-supplying X earns nothing extra
        let balanced = LiquidityEngine::mint(&pool, 10_000, 10_000).unwrap();
        let lopsided = LiquidityEngine::mint(&pool, 500_000, 10_000).unwrap();
        assert_eq!(balanced.shares, lopsided.shares);
    }

    #[test]
    fn test_zero_inputs_rejected() {
        let pool = seeded(&PoolConfig::two_token(), 1_000_000, 1_000_000);
        let before = pool.clone();

        assert_eq!(
            LiquidityEngine::mint(&pool, 0, 10),
            Err(AmmError::ZeroInput { operation: "mint" })
        );
        assert_eq!(
            LiquidityEngine::burn(&pool, 0),
            Err(AmmError::ZeroInput { operation: "burn" })
        );
        assert_eq!(pool, before);
    }

    #[test]
    fn test_dust_mint_rejected() {
        let pool = seeded(&PoolConfig::two_token(), 1_000_000_000_000, 1);
        assert_eq!(pool.total_lp_supply(), 1_000_000);

        assert_eq!(
            LiquidityEngine::mint(&pool, 1, 1),
            Err(AmmError::ZeroMintAmount)
        );
    }

    #[test]
    fn test_burn_is_pro_rata() {
        let pool = seeded(&PoolConfig::two_token(), 1_000_000, 4_000_000);
        let outcome = LiquidityEngine::burn(&pool, 500_000).unwrap();

        assert_eq!(outcome.amount_x, 250_000);
        assert_eq!(outcome.amount_y, 1_000_000);
        assert_eq!(outcome.pool.reserve_x(), 750_000);
        assert_eq!(outcome.pool.reserve_y(), 3_000_000);
        assert_eq!(outcome.pool.total_lp_supply(), 1_500_000);
    }

    #[test]
    fn test_dust_burn_rejected() {
        let pool = seeded(&PoolConfig::two_token(), 1_000_000_000_000, 1);
        assert_eq!(LiquidityEngine::burn(&pool, 1), Err(AmmError::ZeroBurnAmount));
    }

    #[test]
    fn test_burn_more_than_outstanding() {
        let pool = seeded(&PoolConfig::two_token(), 1_000, 1_000);
        assert_eq!(
            LiquidityEngine::burn(&pool, 1_001),
            Err(AmmError::InsufficientShares {
                requested: 1_001,
                outstanding: 1_000
            })
        );
    }

    #[test]
    fn test_burn_on_empty_pool() {
        let pool = PoolState::new(&PoolConfig::two_token()).unwrap();
        assert_eq!(LiquidityEngine::burn(&pool, 1), Err(AmmError::EmptyReserve));
    }

    #[test]
    fn test_full_exit_then_reseed() {
        let pool = seeded(&PoolConfig::two_token(), 1_000_000, 1_000_000);
        let drained = LiquidityEngine::burn(&pool, 1_000_000).unwrap().pool;

        assert_eq!(drained.reserve_x(), 0);
        assert_eq!(drained.total_lp_supply(), 0);
        assert!(drained.is_initialized());

        let reseeded = LiquidityEngine::mint(&drained, 4_000, 9_000).unwrap();
        assert_eq!(reseeded.shares, 6_000);
    }

    #[test]
    fn test_fixed_supply_capacity() {
        let mut config = PoolConfig::two_token();
        config.lp_supply = LpSupply::Fixed { total: 1_000 };
        let pool = PoolState::new(&config).unwrap();

        assert_eq!(
            LiquidityEngine::mint(&pool, 1_001, 1_001),
            Err(AmmError::Overflow)
        );
        let outcome = LiquidityEngine::mint(&pool, 1_000, 1_000).unwrap();
        assert_eq!(outcome.pool.pool_held_shares(), 0);
    }

    #[test]
    fn test_bootstrap_required_before_first_mint() {
        let pool = PoolState::new(&PoolConfig::native_pair(1_000_000)).unwrap();
        assert_eq!(
            LiquidityEngine::mint(&pool, 1_000, 1_000),
            Err(AmmError::EmptyReserve)
        );

        let mut seeded = pool.clone();
        seeded.seed_reserve_x(1).unwrap();
        let outcome = LiquidityEngine::mint(&seeded, 1_000, 1_000).unwrap();
        assert_eq!(outcome.shares, 1_000);
        assert_eq!(outcome.pool.reserve_x(), 1_001);

        // the only provider redeems the seed together with the deposit
        let burned = LiquidityEngine::burn(&outcome.pool, outcome.shares).unwrap();
        assert_eq!((burned.amount_x, burned.amount_y), (1_001, 1_000));
    }

    #[test]
    fn test_issued_before_burn_matches_state() {
        let pool = seeded(&PoolConfig::two_token(), 1_000_000, 1_000_000);
        let supply = pool.lp_supply();
        let lp_amount = 250_000;

        // the redeemed shares already sit in the pool's account
        let held_after_receipt = pool.pool_held_shares() + lp_amount;
        let issued =
            LiquidityEngine::issued_before_burn(supply, held_after_receipt, lp_amount).unwrap();
        assert_eq!(issued, pool.total_lp_supply());
    }
}
