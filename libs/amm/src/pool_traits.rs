//! Pool trait definitions for a unified read-only pricing interface

use rust_decimal::Decimal;

use crate::error::AmmResult;
use crate::pool::Pool;
use crate::pool_state::{PoolState, SwapDirection};
use crate::swap::SwapEngine;

/// Unified pool interface for routers and quoting
pub trait AmmPool {
    /// Calculate output amount for given input
    fn get_amount_out(&self, direction: SwapDirection, amount_in: u128) -> AmmResult<u128>;

    /// Calculate required input for desired output
    fn get_amount_in(&self, direction: SwapDirection, amount_out: u128) -> AmmResult<u128>;

    /// Get current reserves as `(x, y)`
    fn get_reserves(&self) -> (u128, u128);

    /// Get swap fee in scale units
    fn get_swap_fee(&self) -> u128;

    /// Get swap fee as a percentage
    fn get_swap_fee_percent(&self) -> Option<Decimal>;
}

impl AmmPool for PoolState {
    fn get_amount_out(&self, direction: SwapDirection, amount_in: u128) -> AmmResult<u128> {
        SwapEngine::quote(self, direction, amount_in).map(|quote| quote.out_amount)
    }

    fn get_amount_in(&self, direction: SwapDirection, amount_out: u128) -> AmmResult<u128> {
        SwapEngine::quote_input(self, direction, amount_out)
    }

    fn get_reserves(&self) -> (u128, u128) {
        (self.reserve_x(), self.reserve_y())
    }

    fn get_swap_fee(&self) -> u128 {
        self.fees().swap_fee()
    }

    fn get_swap_fee_percent(&self) -> Option<Decimal> {
        self.fees().swap_fee_percent()
    }
}

impl AmmPool for Pool {
    fn get_amount_out(&self, direction: SwapDirection, amount_in: u128) -> AmmResult<u128> {
        self.state().get_amount_out(direction, amount_in)
    }

    fn get_amount_in(&self, direction: SwapDirection, amount_out: u128) -> AmmResult<u128> {
        self.state().get_amount_in(direction, amount_out)
    }

    fn get_reserves(&self) -> (u128, u128) {
        self.state().get_reserves()
    }

    fn get_swap_fee(&self) -> u128 {
        self.state().get_swap_fee()
    }

    fn get_swap_fee_percent(&self) -> Option<Decimal> {
        self.state().get_swap_fee_percent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::pool::AccountId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pool_and_state_agree() {
        let mut pool = Pool::new(&PoolConfig::two_token(), AccountId::from("admin")).unwrap();
        pool.mint(&AccountId::from("lp"), 1_000_000, 1_000_000).unwrap();

        let pools: [&dyn AmmPool; 2] = [&pool, pool.state()];
        for amm in pools {
            assert_eq!(amm.get_amount_out(SwapDirection::XToY, 10_000).unwrap(), 9_851);
            assert_eq!(amm.get_amount_in(SwapDirection::XToY, 9_851).unwrap(), 10_000);
            assert_eq!(amm.get_reserves(), (1_000_000, 1_000_000));
            assert_eq!(amm.get_swap_fee(), 500_000);
            assert_eq!(amm.get_swap_fee_percent(), Some(dec!(0.5)));
        }
    }
}
