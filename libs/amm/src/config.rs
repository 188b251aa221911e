//! Pool configuration
//!
//! Loads pool parameters from TOML. Amounts wider than a TOML integer (the
//! fixed LP supply of a 10^14-scale pool, for example) may be written as
//! decimal strings.
//!
//! ```toml
//! scale = 100_000_000
//! swap_fee = 500_000
//! platform_fee = 50_000_000
//! decimals_x = 6
//! decimals_y = 6
//! lp_decimals = 6
//! lp_supply = { fixed = { total = "10000000000000000" } }
//! platform_fee_asset = { always = "x" }
//! requires_bootstrap = true
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AmmError, AmmResult};
use crate::fees::PlatformFeeAsset;
use crate::fixed_point::MAX_DECIMALS;
use crate::pool_state::{Asset, LpSupply};

/// Scale used by the simple and native pools (10^8)
pub const SCALE_8: u128 = 100_000_000;

/// Scale used by the decimals-aware pool (10^14)
pub const SCALE_14: u128 = 100_000_000_000_000;

/// Fixed LP share supply of the simple and native pools
pub const FIXED_LP_SUPPLY: u128 = 10_000_000_000_000_000;

/// Default LP token precision
pub const LP_DECIMALS: u32 = 6;

/// Parameters fixed at pool creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    #[serde(with = "amount")]
    pub scale: u128,
    #[serde(with = "amount")]
    pub swap_fee: u128,
    #[serde(with = "amount")]
    pub platform_fee: u128,
    pub decimals_x: u32,
    pub decimals_y: u32,
    pub lp_decimals: u32,
    pub lp_supply: LpSupply,
    pub platform_fee_asset: PlatformFeeAsset,
    /// Mint is refused until an administrator seeds the pool
    pub requires_bootstrap: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::two_token()
    }
}

impl PoolConfig {
    /// Two-token pool: 10^8 scale, 0.5% swap fee, half of it to the platform
    pub fn two_token() -> Self {
        Self {
            scale: SCALE_8,
            swap_fee: 500_000,
            platform_fee: 50_000_000,
            decimals_x: LP_DECIMALS,
            decimals_y: LP_DECIMALS,
            lp_decimals: LP_DECIMALS,
            lp_supply: LpSupply::Fixed {
                total: FIXED_LP_SUPPLY,
            },
            platform_fee_asset: PlatformFeeAsset::Output,
            requires_bootstrap: false,
        }
    }

    /// Decimals-aware token pair: 10^14 scale, 1% swap fee, half to the platform
    pub fn arc200_pair() -> Self {
        Self {
            scale: SCALE_14,
            swap_fee: 1_000_000_000_000,
            platform_fee: 50_000_000_000_000,
            decimals_x: LP_DECIMALS,
            decimals_y: LP_DECIMALS,
            lp_decimals: LP_DECIMALS,
            lp_supply: LpSupply::Fixed {
                total: SCALE_14 * 10u128.pow(LP_DECIMALS),
            },
            platform_fee_asset: PlatformFeeAsset::Output,
            requires_bootstrap: false,
        }
    }

    /// Token/native-asset pool: X is the native asset and always carries the
    /// platform fee; the pool must be seeded before the first deposit
    pub fn native_pair(swap_fee: u128) -> Self {
        Self {
            scale: SCALE_8,
            swap_fee,
            platform_fee: 50_000_000,
            decimals_x: LP_DECIMALS,
            decimals_y: LP_DECIMALS,
            lp_decimals: LP_DECIMALS,
            lp_supply: LpSupply::Fixed {
                total: FIXED_LP_SUPPLY,
            },
            platform_fee_asset: PlatformFeeAsset::Always(Asset::X),
            requires_bootstrap: true,
        }
    }

    pub fn validate(&self) -> AmmResult<()> {
        if self.scale == 0 {
            return Err(AmmError::InvalidConfig("scale must be positive".into()));
        }
        for fee in [self.swap_fee, self.platform_fee] {
            if fee > self.scale {
                return Err(AmmError::InvalidFee {
                    fee,
                    scale: self.scale,
                });
            }
        }
        for decimals in [self.decimals_x, self.decimals_y, self.lp_decimals] {
            if decimals > MAX_DECIMALS {
                return Err(AmmError::InvalidConfig(format!(
                    "decimals {decimals} exceed maximum {MAX_DECIMALS}"
                )));
            }
        }
        if self.lp_supply == (LpSupply::Fixed { total: 0 }) {
            return Err(AmmError::InvalidConfig(
                "fixed LP supply must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse pool configuration")?;
        config.validate().context("Invalid pool configuration")?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading pool config: {:?}", path);
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pool config {}", path.display()))?;
        Self::from_toml_str(&content)
    }
}

/// Named pool configurations loaded from one file
///
/// ```toml
/// [pools.voi_via]
/// scale = 100_000_000
/// swap_fee = 500_000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolsConfig {
    pub pools: BTreeMap<String, PoolConfig>,
}

impl PoolsConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse pools configuration")?;
        for (name, pool) in &config.pools {
            pool.validate()
                .with_context(|| format!("Invalid configuration for pool '{name}'"))?;
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pools config {}", path.display()))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded {} pool configurations from {:?}", config.pools.len(), path);
        Ok(config)
    }

    pub fn get(&self, name: &str) -> Option<&PoolConfig> {
        self.pools.get(name)
    }
}

/// Serde codec for `u128` amounts: integers when they fit TOML's i64,
/// decimal strings otherwise
pub mod amount {
    use std::fmt;

    use serde::{de, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        match i64::try_from(*value) {
            Ok(small) => serializer.serialize_i64(small),
            Err(_) => serializer.collect_str(value),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl<'de> de::Visitor<'de> for AmountVisitor {
        type Value = u128;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a non-negative integer or integer string")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u128, E> {
            Ok(value.into())
        }

        fn visit_u128<E: de::Error>(self, value: u128) -> Result<u128, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u128, E> {
            u128::try_from(value).map_err(|_| E::custom("amount must be non-negative"))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u128, E> {
            value.replace('_', "").parse().map_err(E::custom)
        }
    }
}
