//! ledger-client: the external ledger boundary as typed async traits
//!
//! The orchestration core never talks to a network directly. Everything
//! that crosses the ledger boundary (account discovery, contract reads,
//! settlement sends, finality waits) goes through the [`Ledger`] trait
//! defined here. A concrete implementation (wallet session, RPC
//! transport, signing) lives outside this workspace; tests drive the
//! core with an in-memory implementation.
//!
//! `send`-shaped methods return a [`PendingTransaction`]; callers must
//! await finality before treating any state change as real.

pub mod meta;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pairswap_core::{Address, BaseUnits, TradePath, TxId};

pub use meta::DecimalsCache;

/// Failures surfaced by the concrete ledger client.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// The external program rejected (reverted) the call. `reason` is the
    /// revert message as reported by the ledger, unparsed.
    #[error("ledger program rejected the call: {reason}")]
    Rejected { reason: String },

    /// Transport or session failure beneath the client.
    #[error("ledger transport failure: {message}")]
    Transport { message: String },
}

impl LedgerError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Result type for ledger boundary calls
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Per-send execution options
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SendOptions {
    /// Gas ceiling for this settlement request
    pub gas_limit: u64,
}

/// Finalized settlement receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_id: TxId,
    pub block_number: u64,
    /// Ledger timestamp (unix seconds) at which the transaction finalized
    pub finalized_at: u64,
}

/// A submitted, not yet finalized transaction.
///
/// Consuming `await_finality` is the only way to learn the outcome;
/// there is no local cancellation once a transaction has been sent.
#[async_trait]
pub trait PendingTransaction: Send + Sized {
    fn tx_id(&self) -> TxId;

    /// Suspend until the ledger finalizes or rejects the transaction.
    async fn await_finality(self) -> Result<Receipt>;
}

/// The full external surface the orchestration core depends on:
/// session account, token (metadata + allowance) calls, router calls,
/// factory calls, and pair reads.
///
/// Read methods are side-effect free; methods returning
/// [`Self::Pending`] mutate ledger state and charge fees.
#[async_trait]
pub trait Ledger: Send + Sync {
    type Pending: PendingTransaction;

    /// Resolve the connected account.
    async fn request_account(&self) -> Result<Address>;

    // ── Token (asset metadata service) ──────────────────────────────────

    /// Per-asset precision. Immutable once deployed; cache via
    /// [`DecimalsCache`] rather than re-querying.
    async fn decimals(&self, token: &Address) -> Result<u32>;

    async fn balance_of(&self, token: &Address, holder: &Address) -> Result<BaseUnits>;

    async fn allowance(
        &self,
        token: &Address,
        holder: &Address,
        spender: &Address,
    ) -> Result<BaseUnits>;

    /// Raise the holder's spend authorization for `spender` to `amount`.
    async fn approve(
        &self,
        token: &Address,
        spender: &Address,
        amount: &BaseUnits,
        options: SendOptions,
    ) -> Result<Self::Pending>;

    // ── Router (pricing oracle + settlement) ────────────────────────────

    /// Deterministic output amounts along `path` for `amount_in`.
    /// Advisory only: reserves can move before settlement.
    async fn get_amounts_out(
        &self,
        router: &Address,
        amount_in: &BaseUnits,
        path: &TradePath,
    ) -> Result<Vec<BaseUnits>>;

    #[allow(clippy::too_many_arguments)]
    async fn swap_exact_tokens_for_tokens(
        &self,
        router: &Address,
        amount_in: &BaseUnits,
        min_amount_out: &BaseUnits,
        path: &TradePath,
        recipient: &Address,
        deadline: u64,
        options: SendOptions,
    ) -> Result<Self::Pending>;

    #[allow(clippy::too_many_arguments)]
    async fn add_liquidity(
        &self,
        router: &Address,
        token_a: &Address,
        token_b: &Address,
        amount_a: &BaseUnits,
        amount_b: &BaseUnits,
        min_a: &BaseUnits,
        min_b: &BaseUnits,
        recipient: &Address,
        deadline: u64,
        options: SendOptions,
    ) -> Result<Self::Pending>;

    // ── Factory ─────────────────────────────────────────────────────────

    /// Resolve the pair address for two tokens. Returns the zero address
    /// when no pair exists; callers must treat that as "absent", not as
    /// a usable handle.
    async fn get_pair(
        &self,
        factory: &Address,
        token_a: &Address,
        token_b: &Address,
    ) -> Result<Address>;

    async fn create_pair(
        &self,
        factory: &Address,
        token_a: &Address,
        token_b: &Address,
        options: SendOptions,
    ) -> Result<Self::Pending>;

    // ── Pair ────────────────────────────────────────────────────────────

    /// Current reserves in the pair's own storage order (reserve0, reserve1).
    async fn get_reserves(&self, pair: &Address) -> Result<(BaseUnits, BaseUnits)>;

    async fn token0(&self, pair: &Address) -> Result<Address>;

    async fn token1(&self, pair: &Address) -> Result<Address>;
}
