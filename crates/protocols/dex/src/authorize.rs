//! Authorization manager
//!
//! Guarantees spend rights before any transfer-dependent operation.
//! Order matters: balance first (an approval the holder cannot fund
//! would only mask the real problem), then allowance (approvals cost a
//! settlement fee and are skipped when already sufficient), then a
//! single maximum-amount approval that amortizes over future
//! operations.

use ledger_client::{Ledger, PendingTransaction};
use pairswap_core::{Address, BaseUnits, TxId};

use crate::locks::IntentKey;
use crate::session::Dex;
use crate::state::{Authorization, DexError};

impl<L: Ledger> Dex<L> {
    /// Ensure `spender` may move `required` of `token` from `holder`.
    ///
    /// Fetches balance and allowance fresh; authorization state is
    /// never cached across operations. On any non-`Authorized` outcome
    /// the caller must abort before settlement.
    pub(crate) async fn ensure_authorized(
        &self,
        holder: &Address,
        spender: &Address,
        token: &Address,
        required: &BaseUnits,
    ) -> Result<Authorization, DexError> {
        let balance = self
            .ledger()
            .balance_of(token, holder)
            .await
            .map_err(DexError::from_ledger)?;

        if balance < *required {
            return Err(DexError::InsufficientBalance {
                have: balance,
                need: required.clone(),
            });
        }

        let allowance = self
            .ledger()
            .allowance(token, holder, spender)
            .await
            .map_err(DexError::from_ledger)?;

        if allowance >= *required {
            tracing::debug!(%token, %spender, "existing allowance is sufficient");
            return Ok(Authorization::AlreadySufficient);
        }

        tracing::info!(%token, %spender, "raising spend authorization to maximum");

        let pending = self
            .ledger()
            .approve(
                token,
                spender,
                &BaseUnits::max_uint256(),
                self.send_options(),
            )
            .await
            .map_err(DexError::authorization_failed)?;

        let receipt = pending
            .await_finality()
            .await
            .map_err(DexError::authorization_failed)?;

        tracing::info!(%token, tx_id = %receipt.tx_id, "approval finalized");
        Ok(Authorization::Granted(receipt.tx_id))
    }

    /// Unconditionally approve the router for the maximum amount of
    /// `token`. Standalone convenience; the swap and liquidity flows
    /// raise allowances on their own when needed.
    pub async fn approve_max(&self, token: &Address) -> Result<TxId, DexError> {
        let session = self.session().await?;

        let _guard = self
            .locks()
            .try_acquire(vec![IntentKey::asset(&session.account, token)])?;

        let pending = self
            .ledger()
            .approve(
                token,
                &session.router,
                &BaseUnits::max_uint256(),
                self.send_options(),
            )
            .await
            .map_err(DexError::authorization_failed)?;

        let receipt = pending
            .await_finality()
            .await
            .map_err(DexError::authorization_failed)?;

        tracing::info!(%token, tx_id = %receipt.tx_id, "max approval finalized");
        Ok(receipt.tx_id)
    }
}
