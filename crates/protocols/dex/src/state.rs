//! Orchestration state types
//!
//! Typed results, receipts, and the error taxonomy every operation in
//! this crate resolves to. Failures are classified where they are
//! detected and never surfaced as unclassified strings.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use ledger_client::LedgerError;
use pairswap_core::{Address, AmountError, BaseUnits, ConfigError, PathError, TradePath, TxId};

/// Result of pricing a trade path. Ephemeral: reserves can change
/// between this observation and settlement, so quotes are advisory and
/// never cached.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub path: TradePath,
    /// One amount per hop; first equals the requested input, last is the
    /// expected output.
    pub amounts: Vec<BaseUnits>,
}

impl Quote {
    pub fn amount_in(&self) -> &BaseUnits {
        &self.amounts[0]
    }

    pub fn amount_out(&self) -> &BaseUnits {
        &self.amounts[self.amounts.len() - 1]
    }
}

/// Outcome of the authorization ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// Existing allowance already covers the required amount; no
    /// fee-bearing approval was sent.
    AlreadySufficient,
    /// A maximum-amount approval was submitted and finalized.
    Granted(TxId),
}

impl Authorization {
    /// Approval transaction, if one was paid for.
    pub fn approval_tx(&self) -> Option<TxId> {
        match self {
            Self::AlreadySufficient => None,
            Self::Granted(tx_id) => Some(tx_id.clone()),
        }
    }
}

/// Current state of a pair, in the pair's own storage order.
///
/// The pool may store the two assets in either order; `token0`/`token1`
/// report which stored asset each reserve belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct PoolInfo {
    pub pair_address: Address,
    pub token0: Address,
    pub token1: Address,
    pub reserve0: BaseUnits,
    pub reserve1: BaseUnits,
}

impl PoolInfo {
    /// Reserve held for `token`, if the pool contains it.
    pub fn reserve_for(&self, token: &Address) -> Option<&BaseUnits> {
        if *token == self.token0 {
            Some(&self.reserve0)
        } else if *token == self.token1 {
            Some(&self.reserve1)
        } else {
            None
        }
    }
}

/// Swap controller phases. An intent moves strictly forward through
/// these; the phase reached is reported on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapPhase {
    Idle,
    Validating,
    Quoting,
    Authorizing,
    Submitting,
    Confirmed,
    Failed,
}

impl fmt::Display for SwapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Quoting => "quoting",
            Self::Authorizing => "authorizing",
            Self::Submitting => "submitting",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Finalized swap settlement.
#[derive(Debug, Clone, Serialize)]
pub struct SwapReceipt {
    pub tx_id: TxId,
    pub amount_in: BaseUnits,
    /// Output quoted immediately before submission
    pub quoted_out: BaseUnits,
    /// Slippage-bounded minimum the settlement enforced
    pub min_amount_out: BaseUnits,
    /// Unix deadline the settlement carried
    pub deadline: u64,
    /// Approval finalized on the way, if the allowance had to be raised
    pub approval: Option<TxId>,
}

/// Finalized liquidity deposit.
#[derive(Debug, Clone, Serialize)]
pub struct LiquidityReceipt {
    pub tx_id: TxId,
    pub amount_a: BaseUnits,
    pub amount_b: BaseUnits,
    /// Approvals finalized on the way (zero, one, or two)
    pub approvals: Vec<TxId>,
    pub deadline: u64,
}

/// Finalized pair creation.
#[derive(Debug, Clone, Serialize)]
pub struct PairCreated {
    pub tx_id: TxId,
    pub pair_address: Address,
}

/// Orchestration errors. Every external-boundary failure is classified
/// into one of these at the point of detection.
#[derive(Debug, Error)]
pub enum DexError {
    #[error("session not initialized")]
    NotInitialized,

    #[error(transparent)]
    MalformedAmount(#[from] AmountError),

    #[error("no route: pool missing or empty for the requested path")]
    NoRoute,

    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: BaseUnits, need: BaseUnits },

    #[error("authorization request failed: {cause}")]
    AuthorizationFailed { cause: String },

    #[error("pair already exists")]
    PairExists,

    #[error("pair not found")]
    PairNotFound,

    #[error("settlement deadline exceeded")]
    Expired,

    #[error("another operation is in flight for this account and key")]
    OperationInProgress,

    #[error("ledger rejected the operation: {cause}")]
    LedgerRejected { cause: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Path(#[from] PathError),
}

impl DexError {
    /// Catch-all classification for boundary failures that carry no more
    /// specific meaning at the call site.
    pub(crate) fn from_ledger(error: LedgerError) -> Self {
        Self::LedgerRejected {
            cause: error.to_string(),
        }
    }

    pub(crate) fn authorization_failed(error: LedgerError) -> Self {
        Self::AuthorizationFailed {
            cause: error.to_string(),
        }
    }
}

/// Terminal swap failure. Reports the phase reached and any approval
/// that already finalized, so a retry never pays for authorization
/// twice.
#[derive(Debug, Error)]
#[error("swap failed while {phase}: {error}")]
pub struct SwapFailure {
    pub phase: SwapPhase,
    pub error: DexError,
    pub approval: Option<TxId>,
}

/// Terminal liquidity-operation failure; carries the approvals that
/// already finalized before the failure.
#[derive(Debug, Error)]
#[error("liquidity operation failed: {error}")]
pub struct LiquidityFailure {
    pub error: DexError,
    pub approvals: Vec<TxId>,
}

impl From<DexError> for LiquidityFailure {
    fn from(error: DexError) -> Self {
        Self {
            error,
            approvals: Vec::new(),
        }
    }
}
