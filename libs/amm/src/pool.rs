//! Pool facade: roles, operation requests and commit-on-success
//!
//! `Pool` owns one `PoolState` and applies engine outcomes atomically: the
//! stored state is replaced only after an engine returned `Ok`. The caller
//! must serialize access (a mutex, an actor mailbox or a single-threaded
//! loop all work) and execute the returned [`Transfer`] instructions.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PoolConfig;
use crate::error::{AmmError, AmmResult};
use crate::liquidity::LiquidityEngine;
use crate::pool_state::{Asset, OperationFlags, PoolState, SwapDirection};
use crate::ratio::RatioOracle;
use crate::swap::{SwapEngine, SwapQuote};

/// Opaque account identifier supplied by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Token moved by a transfer instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    Reserve(Asset),
    LpShare,
}

/// Payout the host must execute after committing an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub token: Token,
    pub amount: u128,
    pub to: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    pub shares_to_mint: u128,
    pub new_reserve_x: u128,
    pub new_reserve_y: u128,
    pub transfers: Vec<Transfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnReceipt {
    pub amount_x: u128,
    pub amount_y: u128,
    pub new_reserve_x: u128,
    pub new_reserve_y: u128,
    pub transfers: Vec<Transfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub out_amount: u128,
    pub platform_fee: u128,
    pub platform_fee_asset: Asset,
    pub new_reserve_x: u128,
    pub new_reserve_y: u128,
    pub transfers: Vec<Transfer>,
}

/// Operation requests accepted by [`Pool::execute`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Mint {
        amount_x: u128,
        amount_y: u128,
    },
    Burn {
        lp_amount: u128,
    },
    Swap {
        direction: SwapDirection,
        in_amount: u128,
        min_out_amount: u128,
    },
    SetFees {
        swap_fee: u128,
        platform_fee: u128,
    },
    GetRatio,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mint { .. } => "mint",
            Self::Burn { .. } => "burn",
            Self::Swap { .. } => "swap",
            Self::SetFees { .. } => "set_fees",
            Self::GetRatio => "get_ratio",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationResult {
    Minted(MintReceipt),
    Burned(BurnReceipt),
    Swapped(SwapReceipt),
    FeesUpdated { swap_fee: u128, platform_fee: u128 },
    Ratio { ratio: u128 },
}

/// Privileged accounts of a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    /// Manager: controls roles and switches, receives platform fees
    pub admin: AccountId,
    /// May change the fee rates
    pub fee_controller: AccountId,
}

/// A pool with its privileged roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    state: PoolState,
    roles: Roles,
}

impl Pool {
    pub fn new(config: &PoolConfig, admin: AccountId) -> AmmResult<Self> {
        let state = PoolState::new(config)?;
        Ok(Self {
            state,
            roles: Roles {
                fee_controller: admin.clone(),
                admin,
            },
        })
    }

    /// Rebuild a pool from persisted parts
    pub fn from_parts(state: PoolState, roles: Roles) -> Self {
        Self { state, roles }
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn roles(&self) -> &Roles {
        &self.roles
    }

    /// Current advisory ratio
    pub fn ratio(&self) -> u128 {
        self.state.ratio()
    }

    pub fn quote(&self, direction: SwapDirection, in_amount: u128) -> AmmResult<SwapQuote> {
        SwapEngine::quote(&self.state, direction, in_amount)
    }

    /// Record the admin's seed of `seed_x` units of X, which the host has
    /// already moved into the pool account
    pub fn bootstrap(&mut self, caller: &AccountId, seed_x: u128) -> AmmResult<()> {
        self.authorize(caller, "bootstrap the pool", true)?;
        let mut next = self.state.clone();
        next.seed_reserve_x(seed_x)
            .map_err(|e| Self::rejected("bootstrap", caller, e))?;
        RatioOracle::update(&mut next);
        self.state = next;
        info!(sender = %caller, seed_x, "Pool bootstrapped");
        Ok(())
    }

    pub fn mint(
        &mut self,
        caller: &AccountId,
        amount_x: u128,
        amount_y: u128,
    ) -> AmmResult<MintReceipt> {
        let outcome = self
            .ensure_enabled(self.state.operations().mint, "Mint")
            .and_then(|_| LiquidityEngine::mint(&self.state, amount_x, amount_y))
            .map_err(|e| Self::rejected("mint", caller, e))?;

        self.state = outcome.pool;

        info!(
            sender = %caller,
            amount_x,
            amount_y,
            lp_minted = outcome.shares,
            reserve_x = self.state.reserve_x(),
            reserve_y = self.state.reserve_y(),
            "Deposit"
        );

        Ok(MintReceipt {
            shares_to_mint: outcome.shares,
            new_reserve_x: self.state.reserve_x(),
            new_reserve_y: self.state.reserve_y(),
            transfers: vec![Transfer {
                token: Token::LpShare,
                amount: outcome.shares,
                to: caller.clone(),
            }],
        })
    }

    pub fn burn(&mut self, caller: &AccountId, lp_amount: u128) -> AmmResult<BurnReceipt> {
        let outcome = self
            .ensure_enabled(self.state.operations().burn, "Burn")
            .and_then(|_| LiquidityEngine::burn(&self.state, lp_amount))
            .map_err(|e| Self::rejected("burn", caller, e))?;

        self.state = outcome.pool;

        info!(
            sender = %caller,
            lp_burned = lp_amount,
            amount_x = outcome.amount_x,
            amount_y = outcome.amount_y,
            reserve_x = self.state.reserve_x(),
            reserve_y = self.state.reserve_y(),
            "Withdraw"
        );

        Ok(BurnReceipt {
            amount_x: outcome.amount_x,
            amount_y: outcome.amount_y,
            new_reserve_x: self.state.reserve_x(),
            new_reserve_y: self.state.reserve_y(),
            transfers: vec![
                Transfer {
                    token: Token::Reserve(Asset::X),
                    amount: outcome.amount_x,
                    to: caller.clone(),
                },
                Transfer {
                    token: Token::Reserve(Asset::Y),
                    amount: outcome.amount_y,
                    to: caller.clone(),
                },
            ],
        })
    }

    pub fn swap(
        &mut self,
        caller: &AccountId,
        direction: SwapDirection,
        in_amount: u128,
        min_out_amount: u128,
    ) -> AmmResult<SwapReceipt> {
        let outcome = self
            .ensure_enabled(self.state.operations().swap, "Swap")
            .and_then(|_| SwapEngine::swap(&self.state, direction, in_amount, min_out_amount))
            .map_err(|e| Self::rejected("swap", caller, e))?;

        self.state = outcome.pool;

        info!(
            sender = %caller,
            ?direction,
            in_amount,
            out_amount = outcome.out_amount,
            platform_fee = outcome.platform_fee,
            reserve_x = self.state.reserve_x(),
            reserve_y = self.state.reserve_y(),
            "Swap"
        );

        let mut transfers = vec![Transfer {
            token: Token::Reserve(direction.output_asset()),
            amount: outcome.out_amount,
            to: caller.clone(),
        }];
        if outcome.platform_fee > 0 {
            transfers.push(Transfer {
                token: Token::Reserve(outcome.platform_fee_asset),
                amount: outcome.platform_fee,
                to: self.roles.admin.clone(),
            });
        }

        Ok(SwapReceipt {
            out_amount: outcome.out_amount,
            platform_fee: outcome.platform_fee,
            platform_fee_asset: outcome.platform_fee_asset,
            new_reserve_x: self.state.reserve_x(),
            new_reserve_y: self.state.reserve_y(),
            transfers,
        })
    }

    /// Replace both fee rates
    ///
    /// The fee controller may only move the swap fee; changing the platform
    /// share needs the admin.
    pub fn set_fees(
        &mut self,
        caller: &AccountId,
        swap_fee: u128,
        platform_fee: u128,
    ) -> AmmResult<()> {
        if platform_fee == self.state.fees().platform_fee() {
            self.authorize(caller, "set fees", false)?;
        } else {
            self.authorize(caller, "set the platform fee", true)?;
        }

        let mut next = self.state.clone();
        next.set_fees(swap_fee, platform_fee)
            .map_err(|e| Self::rejected("set_fees", caller, e))?;
        self.state = next;

        info!(sender = %caller, swap_fee, platform_fee, "Fees updated");
        Ok(())
    }

    /// Change only the platform share; admin only
    pub fn set_platform_fee(&mut self, caller: &AccountId, platform_fee: u128) -> AmmResult<()> {
        let swap_fee = self.state.fees().swap_fee();
        self.authorize(caller, "set the platform fee", true)?;
        self.set_fees(caller, swap_fee, platform_fee)
    }

    /// Hand the fee controller role over; admin or current controller
    pub fn set_fee_controller(
        &mut self,
        caller: &AccountId,
        fee_controller: AccountId,
    ) -> AmmResult<()> {
        self.authorize(caller, "change the fee controller", false)?;
        info!(sender = %caller, %fee_controller, "Fee controller updated");
        self.roles.fee_controller = fee_controller;
        Ok(())
    }

    pub fn set_admin(&mut self, caller: &AccountId, admin: AccountId) -> AmmResult<()> {
        self.authorize(caller, "change the admin", true)?;
        info!(sender = %caller, %admin, "Admin updated");
        self.roles.admin = admin;
        Ok(())
    }

    /// Enable or disable mint, burn and swap
    pub fn set_operations(&mut self, caller: &AccountId, flags: OperationFlags) -> AmmResult<()> {
        self.authorize(caller, "toggle operations", true)?;
        self.state.set_operations(flags);
        info!(sender = %caller, ?flags, "Operations updated");
        Ok(())
    }

    /// Dispatch an operation request
    pub fn execute(
        &mut self,
        caller: &AccountId,
        operation: Operation,
    ) -> AmmResult<OperationResult> {
        match operation {
            Operation::Mint { amount_x, amount_y } => {
                self.mint(caller, amount_x, amount_y).map(OperationResult::Minted)
            }
            Operation::Burn { lp_amount } => {
                self.burn(caller, lp_amount).map(OperationResult::Burned)
            }
            Operation::Swap {
                direction,
                in_amount,
                min_out_amount,
            } => self
                .swap(caller, direction, in_amount, min_out_amount)
                .map(OperationResult::Swapped),
            Operation::SetFees {
                swap_fee,
                platform_fee,
            } => self
                .set_fees(caller, swap_fee, platform_fee)
                .map(|_| OperationResult::FeesUpdated {
                    swap_fee,
                    platform_fee,
                }),
            Operation::GetRatio => Ok(OperationResult::Ratio {
                ratio: self.ratio(),
            }),
        }
    }

    fn ensure_enabled(&self, enabled: bool, operation: &'static str) -> AmmResult<()> {
        if enabled {
            Ok(())
        } else {
            Err(AmmError::OperationDisabled(operation))
        }
    }

    // Admin always qualifies; the fee controller only for non-admin actions
    fn authorize(
        &self,
        caller: &AccountId,
        action: &'static str,
        admin_only: bool,
    ) -> AmmResult<()> {
        let permitted = *caller == self.roles.admin
            || (!admin_only && *caller == self.roles.fee_controller);

        if permitted {
            Ok(())
        } else {
            warn!(sender = %caller, action, "Unauthorized pool operation");
            Err(AmmError::Unauthorized {
                caller: caller.to_string(),
                action,
            })
        }
    }

    fn rejected(operation: &'static str, caller: &AccountId, error: AmmError) -> AmmError {
        warn!(
            sender = %caller,
            operation,
            code = error.code(),
            "Pool operation rejected: {}",
            error
        );
        error
    }
}
