//! Liquidity controller
//!
//! Pair creation and liquidity provisioning. Pair creation is guarded
//! by a registry lookup so the caller sees `PairExists` instead of a
//! wasted settlement; provisioning authorizes both deposits before a
//! single joint submission with zero minimums. The deposit ratio is
//! the caller's responsibility, not silently adjusted here.

use ledger_client::{Ledger, PendingTransaction};
use pairswap_core::{amount, Address, AmountError, BaseUnits, TxId};

use crate::locks::IntentKey;
use crate::session::Dex;
use crate::state::{DexError, LiquidityFailure, LiquidityReceipt, PairCreated};

impl<L: Ledger> Dex<L> {
    /// Register the configured token pair with the factory.
    ///
    /// Idempotence guard: if the registry already maps the pair to a
    /// live address this fails with `PairExists` and submits nothing.
    pub async fn create_pair(&self) -> Result<PairCreated, DexError> {
        let session = self.session().await?;
        let config = self.config();
        let token_a = &config.token_a_address;
        let token_b = &config.token_b_address;

        let _guard = self.locks().try_acquire(vec![IntentKey::pool(
            &session.account,
            token_a,
            token_b,
        )])?;

        let existing = self
            .ledger()
            .get_pair(&session.factory, token_a, token_b)
            .await
            .map_err(DexError::from_ledger)?;
        if !existing.is_zero() {
            tracing::debug!(pair = %existing, "pair already registered");
            return Err(DexError::PairExists);
        }

        tracing::info!(%token_a, %token_b, "registering pair with factory");

        let pending = self
            .ledger()
            .create_pair(&session.factory, token_a, token_b, self.send_options())
            .await
            .map_err(DexError::from_ledger)?;
        let receipt = pending
            .await_finality()
            .await
            .map_err(DexError::from_ledger)?;

        // Resolve the address the factory assigned.
        let pair_address = self
            .ledger()
            .get_pair(&session.factory, token_a, token_b)
            .await
            .map_err(DexError::from_ledger)?;
        if pair_address.is_zero() {
            return Err(DexError::LedgerRejected {
                cause: "factory finalized pair creation without registering an address"
                    .to_string(),
            });
        }

        tracing::info!(tx_id = %receipt.tx_id, pair = %pair_address, "pair created");
        Ok(PairCreated {
            tx_id: receipt.tx_id,
            pair_address,
        })
    }

    /// Deposit both configured tokens into their pool.
    ///
    /// Both deposits are authorized (in A-then-B order) before the joint
    /// settlement is submitted; any approval that finalized before a
    /// later failure is reported so a retry does not pay for it again.
    pub async fn add_liquidity(
        &self,
        amount_a: &str,
        amount_b: &str,
    ) -> Result<LiquidityReceipt, LiquidityFailure> {
        let session = self.session().await?;
        let config = self.config();
        let token_a = config.token_a_address.clone();
        let token_b = config.token_b_address.clone();

        let _guard = self.locks().try_acquire(vec![
            IntentKey::asset(&session.account, &token_a),
            IntentKey::asset(&session.account, &token_b),
            IntentKey::pool(&session.account, &token_a, &token_b),
        ])?;

        let units_a = self.parse_deposit(&token_a, amount_a).await?;
        let units_b = self.parse_deposit(&token_b, amount_b).await?;

        tracing::debug!(units_a = %units_a, units_b = %units_b, "liquidity intent accepted");

        let mut approvals: Vec<TxId> = Vec::new();
        for (token, required) in [(&token_a, &units_a), (&token_b, &units_b)] {
            let authorization = self
                .ensure_authorized(&session.account, &session.router, token, required)
                .await
                .map_err(|error| LiquidityFailure {
                    error,
                    approvals: approvals.clone(),
                })?;
            approvals.extend(authorization.approval_tx());
        }

        let deadline = self.deadline();

        tracing::info!(
            units_a = %units_a,
            units_b = %units_b,
            deadline,
            "submitting liquidity deposit"
        );

        // Zero minimums: the pool settles the actual ratio.
        let min = BaseUnits::zero();
        let submit = self
            .ledger()
            .add_liquidity(
                &session.router,
                &token_a,
                &token_b,
                &units_a,
                &units_b,
                &min,
                &min,
                &session.account,
                deadline,
                self.send_options(),
            )
            .await;
        let pending = match submit {
            Ok(pending) => pending,
            Err(e) => {
                return Err(LiquidityFailure {
                    error: crate::swap::classify_settlement_failure(e, deadline),
                    approvals,
                })
            }
        };

        let receipt = match pending.await_finality().await {
            Ok(receipt) => receipt,
            Err(e) => {
                return Err(LiquidityFailure {
                    error: crate::swap::classify_settlement_failure(e, deadline),
                    approvals,
                })
            }
        };

        tracing::info!(tx_id = %receipt.tx_id, "liquidity deposit confirmed");

        Ok(LiquidityReceipt {
            tx_id: receipt.tx_id,
            amount_a: units_a,
            amount_b: units_b,
            approvals,
            deadline,
        })
    }

    /// Resolve one display-denominated deposit to base units, rejecting
    /// zero.
    async fn parse_deposit(&self, token: &Address, input: &str) -> Result<BaseUnits, DexError> {
        let decimals = self
            .meta()
            .decimals(self.ledger(), token)
            .await
            .map_err(DexError::from_ledger)?;
        let units = amount::to_base_units(input, decimals)?;
        if units.is_zero() {
            return Err(AmountError::Malformed {
                input: input.to_string(),
                reason: "amount must be greater than zero",
            }
            .into());
        }
        Ok(units)
    }
}
