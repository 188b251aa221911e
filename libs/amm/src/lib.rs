//! # AMM Engine - Constant-Product Pool Settlement
//!
//! ## Purpose
//!
//! Deterministic integer mathematics and state transitions for a two-asset
//! constant-product liquidity pool: LP share issuance on deposit, pro-rata
//! redemption on withdrawal, and fee-bearing swaps with a protocol fee split.
//! All amounts are unsigned integers in each asset's smallest unit; fees are
//! fractions of a fixed scale (10^8 or 10^14).
//!
//! ## Integration Points
//!
//! - **Input**: Operation requests carrying amounts the host already received
//! - **Output**: Updated `PoolState` plus `Transfer` instructions to execute
//! - **Configuration**: `PoolConfig` presets or TOML files via `PoolsConfig`
//! - **Quoting**: `AmmPool` trait for read-only pricing by routers
//!
//! ## Architecture Role
//!
//! The engines (`LiquidityEngine`, `SwapEngine`) are pure: they take a state
//! and return a new one. `Pool` layers roles, operation switches and
//! commit-on-success on top, so a rejected operation never leaves a partial
//! update behind.
//!
//! ## Precision
//!
//! - Intermediate products are carried in 256/512-bit integers
//! - Every division floors, except the reverse quote which rounds up
//! - Rounding always favours the pool, so `x * y` never decreases on a swap

pub mod config;
pub mod error;
pub mod fees;
pub mod fixed_point;
pub mod liquidity;
pub mod pool;
pub mod pool_state;
pub mod pool_traits;
pub mod ratio;
pub mod swap;

pub use config::{PoolConfig, PoolsConfig};
pub use error::{AmmError, AmmResult};
pub use fees::{FeeModel, PlatformFeeAsset};
pub use liquidity::{BurnOutcome, LiquidityEngine, MintOutcome};
pub use pool::{
    AccountId, BurnReceipt, MintReceipt, Operation, OperationResult, Pool, Roles, SwapReceipt,
    Token, Transfer,
};
pub use pool_state::{Asset, LpSupply, OperationFlags, PoolState, SwapDirection};
pub use pool_traits::AmmPool;
pub use ratio::RatioOracle;
pub use swap::{SwapEngine, SwapOutcome, SwapQuote};

/// Common types for fee reporting
pub use rust_decimal::Decimal;
