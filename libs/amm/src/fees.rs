//! Swap fee and platform fee model
//!
//! Both rates are fractions of the pool scale: with `scale = 10^8`, a swap fee
//! of `500_000` is 0.5% and a platform fee of `50_000_000` hands half of the
//! liquidity-provider fee to the protocol treasury.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AmmError, AmmResult};
use crate::fixed_point::{mul_div, ratio_over_difference_ceil, wide_ratio};
use crate::pool_state::{Asset, SwapDirection};

/// Which asset the platform fee is paid in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformFeeAsset {
    /// Skimmed from the output reserve in the output asset
    Output,
    /// Converted into the input asset and paid from the input side
    Input,
    /// Always paid in the given asset, whichever way the trade goes
    Always(Asset),
}

/// Side of a particular trade the platform fee comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeSide {
    Output,
    Input,
}

impl PlatformFeeAsset {
    pub fn side_for(self, direction: SwapDirection) -> FeeSide {
        match self {
            Self::Output => FeeSide::Output,
            Self::Input => FeeSide::Input,
            Self::Always(asset) if asset == direction.output_asset() => FeeSide::Output,
            Self::Always(_) => FeeSide::Input,
        }
    }
}

/// Swap and platform fee rates over a fixed scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeModel {
    scale: u128,
    swap_fee: u128,
    platform_fee: u128,
}

impl FeeModel {
    pub fn new(scale: u128, swap_fee: u128, platform_fee: u128) -> AmmResult<Self> {
        if scale == 0 {
            return Err(AmmError::InvalidConfig("scale must be positive".into()));
        }
        Self::check_fee(swap_fee, scale)?;
        Self::check_fee(platform_fee, scale)?;

        Ok(Self {
            scale,
            swap_fee,
            platform_fee,
        })
    }

    fn check_fee(fee: u128, scale: u128) -> AmmResult<()> {
        if fee > scale {
            return Err(AmmError::InvalidFee { fee, scale });
        }
        Ok(())
    }

    pub fn scale(&self) -> u128 {
        self.scale
    }

    pub fn swap_fee(&self) -> u128 {
        self.swap_fee
    }

    pub fn platform_fee(&self) -> u128 {
        self.platform_fee
    }

    /// Replace both rates; nothing changes if either is out of range
    pub fn set_fees(&mut self, swap_fee: u128, platform_fee: u128) -> AmmResult<()> {
        Self::check_fee(swap_fee, self.scale)?;
        Self::check_fee(platform_fee, self.scale)?;
        self.swap_fee = swap_fee;
        self.platform_fee = platform_fee;
        Ok(())
    }

    /// Constant-product output with fee:
    /// `floor(in * out_reserve * (scale - fee) / ((in + in_reserve) * scale))`
    pub fn output_with_fee(
        &self,
        in_amount: u128,
        in_reserve: u128,
        out_reserve: u128,
        fee: u128,
    ) -> AmmResult<u128> {
        if in_reserve == 0 || out_reserve == 0 {
            return Err(AmmError::EmptyReserve);
        }
        Self::check_fee(fee, self.scale)?;

        let denominator = in_amount
            .checked_add(in_reserve)
            .ok_or(AmmError::Overflow)?;

        wide_ratio(
            &[in_amount, out_reserve, self.scale - fee],
            &[denominator, self.scale],
        )
    }

    /// Protocol share of the fee actually charged on a trade, in the output asset
    ///
    /// Derived as the gap between the fee-less and the fee-inclusive output,
    /// times `platform_fee / scale`, so it can never exceed the LP fee.
    pub fn platform_fee_of(
        &self,
        in_amount: u128,
        in_reserve: u128,
        out_reserve: u128,
    ) -> AmmResult<u128> {
        let without_fee = self.output_with_fee(in_amount, in_reserve, out_reserve, 0)?;
        let with_fee = self.output_with_fee(in_amount, in_reserve, out_reserve, self.swap_fee)?;

        mul_div(without_fee - with_fee, self.platform_fee, self.scale)
    }

    /// Smallest input that yields at least `out_amount` at the given fee
    pub fn input_for_output(
        &self,
        out_amount: u128,
        in_reserve: u128,
        out_reserve: u128,
        fee: u128,
    ) -> AmmResult<u128> {
        if in_reserve == 0 || out_reserve == 0 {
            return Err(AmmError::EmptyReserve);
        }
        Self::check_fee(fee, self.scale)?;

        ratio_over_difference_ceil(
            &[self.scale, in_reserve, out_amount],
            (out_reserve, self.scale - fee),
            (out_amount, self.scale),
        )
    }

    /// Swap fee as a percentage, e.g. `0.5` for 0.5%
    pub fn swap_fee_percent(&self) -> Option<Decimal> {
        self.as_percent(self.swap_fee)
    }

    /// Platform share of the swap fee as a percentage
    pub fn platform_fee_percent(&self) -> Option<Decimal> {
        self.as_percent(self.platform_fee)
    }

    fn as_percent(&self, fee: u128) -> Option<Decimal> {
        let fee = Decimal::from_u128(fee)?;
        let scale = Decimal::from_u128(self.scale)?;
        fee.checked_mul(dec!(100))?.checked_div(scale)
    }
}
