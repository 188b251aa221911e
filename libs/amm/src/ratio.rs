//! Advisory price ratio
//!
//! The ratio is recomputed after every mint, burn and swap. Nothing in the
//! engine reads it back as an input.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::error::AmmResult;
use crate::fixed_point::mul_div;
use crate::pool_state::PoolState;

pub struct RatioOracle;

impl RatioOracle {
    /// `reserve_x * scale / reserve_y`, or `scale` once reserve Y is empty
    pub fn compute(pool: &PoolState) -> AmmResult<u128> {
        if pool.reserve_y == 0 {
            return Ok(pool.scale());
        }
        mul_div(pool.reserve_x, pool.scale(), pool.reserve_y)
    }

    /// Recompute and store the ratio on `pool`
    ///
    /// Saturates at `u128::MAX` when the ratio does not fit; the value is
    /// advisory and must not fail an otherwise valid operation.
    pub fn update(pool: &mut PoolState) -> u128 {
        let ratio = Self::compute(pool).unwrap_or(u128::MAX);
        pool.ratio = ratio;
        ratio
    }

    /// Stored ratio as a decimal price of Y in units of X
    pub fn price(pool: &PoolState) -> Option<Decimal> {
        let ratio = Decimal::from_u128(pool.ratio())?;
        let scale = Decimal::from_u128(pool.scale())?;
        ratio.checked_div(scale)
    }
}
