//! Swap controller
//!
//! The primary orchestration state machine:
//! `Idle -> Validating -> Quoting -> Authorizing -> Submitting ->
//! Confirmed | Failed`. Each step strictly follows completion of its
//! predecessor: a step's output decides whether the next may run at
//! all, so there is no speculative parallelism. The quote is taken
//! immediately before submission and converted into a slippage-bounded
//! minimum; the deadline is enforced by the external ledger and a
//! deadline rejection is classified `Expired`, never retried with the
//! same deadline.

use ledger_client::{Ledger, LedgerError, PendingTransaction};
use pairswap_core::{amount, AmountError, TradePath, TxId};

use crate::locks::IntentKey;
use crate::session::{now_unix, Dex};
use crate::state::{DexError, SwapFailure, SwapPhase, SwapReceipt};

impl<L: Ledger> Dex<L> {
    /// Swap a display-denominated amount of token A for token B along
    /// the canonical direct path, with the configured slippage bound
    /// and deadline.
    pub async fn swap(&self, amount_in: &str) -> Result<SwapReceipt, SwapFailure> {
        let session = self
            .session()
            .await
            .map_err(|e| fail(SwapPhase::Validating, e, None))?;
        let config = self.config();
        let token_in = config.token_a_address.clone();
        let token_out = config.token_b_address.clone();

        // Locked before Validating: a conflicting intent never starts.
        let _guard = self
            .locks()
            .try_acquire(vec![
                IntentKey::asset(&session.account, &token_in),
                IntentKey::pool(&session.account, &token_in, &token_out),
            ])
            .map_err(|e| fail(SwapPhase::Idle, e, None))?;

        tracing::debug!(amount_in, phase = %SwapPhase::Validating, "swap intent accepted");

        let decimals_in = self
            .meta()
            .decimals(self.ledger(), &token_in)
            .await
            .map_err(|e| fail(SwapPhase::Validating, DexError::from_ledger(e), None))?;
        let units_in = amount::to_base_units(amount_in, decimals_in)
            .map_err(|e| fail(SwapPhase::Validating, e.into(), None))?;
        if units_in.is_zero() {
            let error = AmountError::Malformed {
                input: amount_in.to_string(),
                reason: "amount must be greater than zero",
            };
            return Err(fail(SwapPhase::Validating, error.into(), None));
        }

        tracing::debug!(units_in = %units_in, phase = %SwapPhase::Quoting, "pricing swap");

        let path = TradePath::direct(token_in.clone(), token_out.clone())
            .map_err(|e| fail(SwapPhase::Quoting, e.into(), None))?;
        let quote = self
            .quote(units_in.clone(), path.clone())
            .await
            .map_err(|e| fail(SwapPhase::Quoting, e, None))?;
        let quoted_out = quote.amount_out().clone();

        // Integer slippage bound: out * (100 - tolerance) / 100.
        let min_amount_out =
            quoted_out.mul_ratio(u64::from(100 - config.slippage_percent), 100);

        tracing::debug!(
            quoted_out = %quoted_out,
            min_amount_out = %min_amount_out,
            phase = %SwapPhase::Authorizing,
            "ensuring spend authorization"
        );

        let authorization = self
            .ensure_authorized(&session.account, &session.router, &token_in, &units_in)
            .await
            .map_err(|e| fail(SwapPhase::Authorizing, e, None))?;
        let approval = authorization.approval_tx();

        let deadline = self.deadline();

        tracing::info!(
            units_in = %units_in,
            min_amount_out = %min_amount_out,
            deadline,
            phase = %SwapPhase::Submitting,
            "submitting swap settlement"
        );

        let pending = self
            .ledger()
            .swap_exact_tokens_for_tokens(
                &session.router,
                &units_in,
                &min_amount_out,
                &path,
                &session.account,
                deadline,
                self.send_options(),
            )
            .await
            .map_err(|e| {
                fail(
                    SwapPhase::Submitting,
                    classify_settlement_failure(e, deadline),
                    approval.clone(),
                )
            })?;

        let receipt = pending.await_finality().await.map_err(|e| {
            fail(
                SwapPhase::Submitting,
                classify_settlement_failure(e, deadline),
                approval.clone(),
            )
        })?;

        tracing::info!(tx_id = %receipt.tx_id, phase = %SwapPhase::Confirmed, "swap confirmed");

        Ok(SwapReceipt {
            tx_id: receipt.tx_id,
            amount_in: units_in,
            quoted_out,
            min_amount_out,
            deadline,
            approval,
        })
    }
}

fn fail(phase: SwapPhase, error: DexError, approval: Option<TxId>) -> SwapFailure {
    tracing::warn!(%phase, %error, "swap intent failed");
    SwapFailure {
        phase,
        error,
        approval,
    }
}

/// Classify a settlement rejection. The ledger enforces the deadline
/// itself; a rejection that names it, or that resolves only after the
/// deadline has passed, is `Expired`. Everything else stays the
/// `LedgerRejected` catch-all, and transport failures are never
/// `Expired`.
pub(crate) fn classify_settlement_failure(error: LedgerError, deadline: u64) -> DexError {
    match error {
        LedgerError::Rejected { reason } => {
            if reason.to_ascii_lowercase().contains("expired") || now_unix() > deadline {
                DexError::Expired
            } else {
                DexError::LedgerRejected { cause: reason }
            }
        }
        other => DexError::LedgerRejected {
            cause: other.to_string(),
        },
    }
}
