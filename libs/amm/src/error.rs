//! Error taxonomy for pool settlement
//!
//! Every engine operation reports failure synchronously through [`AmmError`].
//! A returned error always means the pool state was left untouched.

use thiserror::Error;

/// Result alias used throughout the engine
pub type AmmResult<T> = Result<T, AmmError>;

/// Errors raised by the settlement engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    /// An operation that needs nonzero reserves ran against an empty or drained pool
    #[error("Pool reserve is empty")]
    EmptyReserve,

    /// Computed LP shares rounded down to zero
    #[error("Deposit would mint zero LP shares")]
    ZeroMintAmount,

    /// Computed redemption for one of the assets rounded down to zero
    #[error("Burn would return a zero amount")]
    ZeroBurnAmount,

    /// Computed swap output rounded down to zero
    #[error("Swap output is zero")]
    ZeroSwapOutput,

    /// Output fell below the caller's declared minimum
    #[error("Slippage exceeded: output {out_amount} is below minimum {min_out_amount}")]
    SlippageExceeded {
        out_amount: u128,
        min_out_amount: u128,
    },

    /// An arithmetic step exceeded the working integer width
    #[error("Arithmetic overflow")]
    Overflow,

    /// Caller lacks the role required for an administrative operation
    #[error("Account {caller} is not authorized to {action}")]
    Unauthorized { caller: String, action: &'static str },

    /// A caller-supplied amount was zero
    #[error("{operation} amount must be positive")]
    ZeroInput { operation: &'static str },

    /// Burn request exceeds the outstanding LP shares
    #[error("Cannot burn {requested} shares, only {outstanding} outstanding")]
    InsufficientShares { requested: u128, outstanding: u128 },

    /// Payout would exhaust the output reserve
    #[error("Insufficient liquidity for requested output")]
    InsufficientLiquidity,

    /// Fee fraction larger than the pool scale
    #[error("Fee {fee} exceeds scale {scale}")]
    InvalidFee { fee: u128, scale: u128 },

    /// Mint, burn or swap has been switched off for this pool
    #[error("{0} is disabled for this pool")]
    OperationDisabled(&'static str),

    #[error("Pool has already been bootstrapped")]
    AlreadyBootstrapped,

    #[error("Invalid pool configuration: {0}")]
    InvalidConfig(String),
}

impl AmmError {
    /// Stable identifier for front-ends that translate errors into user messages
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyReserve => "empty_reserve",
            Self::ZeroMintAmount => "zero_mint_amount",
            Self::ZeroBurnAmount => "zero_burn_amount",
            Self::ZeroSwapOutput => "zero_swap_output",
            Self::SlippageExceeded { .. } => "slippage_exceeded",
            Self::Overflow => "overflow",
            Self::Unauthorized { .. } => "unauthorized",
            Self::ZeroInput { .. } => "zero_input",
            Self::InsufficientShares { .. } => "insufficient_shares",
            Self::InsufficientLiquidity => "insufficient_liquidity",
            Self::InvalidFee { .. } => "invalid_fee",
            Self::OperationDisabled(_) => "operation_disabled",
            Self::AlreadyBootstrapped => "already_bootstrapped",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }

    /// True when retrying with a looser limit may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SlippageExceeded { .. })
    }
}
