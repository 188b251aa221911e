//! Pool state for a single trading pair
//!
//! `PoolState` is an explicit value threaded through the engines. Engines
//! never mutate their input; they return a fresh state that the caller
//! commits only when the whole operation succeeded.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::config::PoolConfig;
use crate::error::{AmmError, AmmResult};
use crate::fees::{FeeModel, PlatformFeeAsset};

/// One side of the pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Asset {
    X,
    Y,
}

impl Asset {
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// Swap direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    XToY,
    YToX,
}

impl SwapDirection {
    pub fn input_asset(self) -> Asset {
        match self {
            Self::XToY => Asset::X,
            Self::YToX => Asset::Y,
        }
    }

    pub fn output_asset(self) -> Asset {
        self.input_asset().other()
    }

    pub fn reverse(self) -> Self {
        match self {
            Self::XToY => Self::YToX,
            Self::YToX => Self::XToY,
        }
    }
}

/// How outstanding LP shares are accounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LpSupply {
    /// Shares are created on mint; outstanding supply starts at zero
    Counted,
    /// All shares exist up front and unissued ones sit in the pool's own account
    Fixed {
        #[serde(with = "crate::config::amount")]
        total: u128,
    },
}

impl LpSupply {
    /// Maximum number of shares that can ever be outstanding
    pub fn capacity(&self) -> u128 {
        match self {
            Self::Counted => u128::MAX,
            Self::Fixed { total } => *total,
        }
    }
}

/// Per-operation kill switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationFlags {
    pub mint: bool,
    pub burn: bool,
    pub swap: bool,
}

impl Default for OperationFlags {
    fn default() -> Self {
        Self {
            mint: true,
            burn: true,
            swap: true,
        }
    }
}

/// Reserves, LP supply and pricing metadata of one pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub(crate) reserve_x: u128,
    pub(crate) reserve_y: u128,
    /// Outstanding LP shares
    pub(crate) lp_issued: u128,
    pub(crate) lp_supply: LpSupply,
    pub(crate) decimals_x: u32,
    pub(crate) decimals_y: u32,
    /// Common basis both amounts are normalized to on the first deposit
    pub(crate) lp_decimals: u32,
    pub(crate) fees: FeeModel,
    pub(crate) platform_fee_asset: PlatformFeeAsset,
    pub(crate) ratio: u128,
    pub(crate) initialized: bool,
    /// First mint needs a seeded X reserve
    pub(crate) requires_bootstrap: bool,
    pub(crate) operations: OperationFlags,
}

impl PoolState {
    /// Create an empty, uninitialized pool
    pub fn new(config: &PoolConfig) -> AmmResult<Self> {
        config.validate()?;

        let fees = FeeModel::new(config.scale, config.swap_fee, config.platform_fee)?;

        Ok(Self {
            reserve_x: 0,
            reserve_y: 0,
            lp_issued: 0,
            lp_supply: config.lp_supply,
            decimals_x: config.decimals_x,
            decimals_y: config.decimals_y,
            lp_decimals: config.lp_decimals,
            fees,
            platform_fee_asset: config.platform_fee_asset,
            ratio: config.scale,
            initialized: false,
            requires_bootstrap: config.requires_bootstrap,
            operations: OperationFlags::default(),
        })
    }

    pub fn reserve_x(&self) -> u128 {
        self.reserve_x
    }

    pub fn reserve_y(&self) -> u128 {
        self.reserve_y
    }

    pub fn reserve(&self, asset: Asset) -> u128 {
        match asset {
            Asset::X => self.reserve_x,
            Asset::Y => self.reserve_y,
        }
    }

    /// `(in_reserve, out_reserve)` for a swap direction
    pub fn reserves_for(&self, direction: SwapDirection) -> (u128, u128) {
        (
            self.reserve(direction.input_asset()),
            self.reserve(direction.output_asset()),
        )
    }

    /// Outstanding LP shares
    pub fn total_lp_supply(&self) -> u128 {
        self.lp_issued
    }

    /// Shares still held by the pool itself (fixed-supply accounting only)
    pub fn pool_held_shares(&self) -> u128 {
        match self.lp_supply {
            LpSupply::Counted => 0,
            LpSupply::Fixed { total } => total.saturating_sub(self.lp_issued),
        }
    }

    pub fn lp_supply(&self) -> LpSupply {
        self.lp_supply
    }

    pub fn scale(&self) -> u128 {
        self.fees.scale()
    }

    pub fn decimals(&self) -> (u32, u32) {
        (self.decimals_x, self.decimals_y)
    }

    pub fn lp_decimals(&self) -> u32 {
        self.lp_decimals
    }

    pub fn fees(&self) -> &FeeModel {
        &self.fees
    }

    pub fn platform_fee_asset(&self) -> PlatformFeeAsset {
        self.platform_fee_asset
    }

    /// Last advisory price ratio
    pub fn ratio(&self) -> u128 {
        self.ratio
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether a pool that needs a seed can accept its first mint
    pub fn is_seeded(&self) -> bool {
        !self.requires_bootstrap || self.reserve_x > 0
    }

    pub fn requires_bootstrap(&self) -> bool {
        self.requires_bootstrap
    }

    pub fn operations(&self) -> OperationFlags {
        self.operations
    }

    /// `reserve_x * reserve_y` at full width
    pub fn constant_product(&self) -> U256 {
        U256::from(self.reserve_x) * U256::from(self.reserve_y)
    }

    /// Both reserves must be nonzero before a swap or burn
    pub fn ensure_operable(&self) -> AmmResult<()> {
        if self.reserve_x == 0 || self.reserve_y == 0 {
            return Err(AmmError::EmptyReserve);
        }
        Ok(())
    }

    pub(crate) fn set_reserve(&mut self, asset: Asset, value: u128) {
        match asset {
            Asset::X => self.reserve_x = value,
            Asset::Y => self.reserve_y = value,
        }
    }

    pub(crate) fn set_fees(&mut self, swap_fee: u128, platform_fee: u128) -> AmmResult<()> {
        self.fees.set_fees(swap_fee, platform_fee)
    }

    pub(crate) fn set_operations(&mut self, operations: OperationFlags) {
        self.operations = operations;
    }

    /// Credit the administrative seed to reserve X
    ///
    /// The seed stays in the pool: the first mint lands on top of it and
    /// burns pay it out pro rata. A drained pool may be seeded again.
    pub(crate) fn seed_reserve_x(&mut self, seed_x: u128) -> AmmResult<()> {
        if seed_x == 0 {
            return Err(AmmError::ZeroInput {
                operation: "bootstrap",
            });
        }
        if self.reserve_x > 0 {
            return Err(AmmError::AlreadyBootstrapped);
        }
        self.reserve_x = seed_x;
        Ok(())
    }
}
