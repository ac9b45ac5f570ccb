//! Quote engine
//!
//! Prices a trade path against the router. Quotes are advisory only:
//! other participants move the reserves at any time, which is why the
//! swap controller re-quotes immediately before submission and bounds
//! the acceptable output instead of trusting an earlier number.

use ledger_client::{Ledger, LedgerError};
use pairswap_core::{amount, AmountError, BaseUnits, TradePath};

use crate::session::Dex;
use crate::state::{DexError, Quote};

impl<L: Ledger> Dex<L> {
    /// Price `amount_in` along `path`.
    ///
    /// A router rejection or a zero/absent output means the pool does
    /// not exist or is empty: surfaced as `NoRoute`, never as a quote
    /// of zero.
    pub async fn quote(&self, amount_in: BaseUnits, path: TradePath) -> Result<Quote, DexError> {
        let session = self.session().await?;

        if amount_in.is_zero() {
            return Err(AmountError::Malformed {
                input: "0".to_string(),
                reason: "amount must be greater than zero",
            }
            .into());
        }

        let amounts = match self
            .ledger()
            .get_amounts_out(&session.router, &amount_in, &path)
            .await
        {
            Ok(amounts) => amounts,
            Err(LedgerError::Rejected { reason }) => {
                tracing::debug!(%reason, "router refused to quote the path");
                return Err(DexError::NoRoute);
            }
            Err(other) => return Err(DexError::from_ledger(other)),
        };

        if amounts.len() != path.len() || amounts[0] != amount_in {
            return Err(DexError::LedgerRejected {
                cause: format!(
                    "router returned a malformed quote: {} amounts for {} hops",
                    amounts.len(),
                    path.len()
                ),
            });
        }

        if amounts[amounts.len() - 1].is_zero() {
            return Err(DexError::NoRoute);
        }

        Ok(Quote { path, amounts })
    }

    /// Expected output for a display-denominated input of token A,
    /// formatted with token B's precision. Pure preview: no slippage
    /// bound, no authorization, no settlement.
    pub async fn preview_out(&self, amount_in: &str) -> Result<String, DexError> {
        let session = self.session().await?;
        let config = self.config();

        let decimals_in = self
            .meta()
            .decimals(self.ledger(), &config.token_a_address)
            .await
            .map_err(DexError::from_ledger)?;
        let units_in = amount::to_base_units(amount_in, decimals_in)?;

        let path = TradePath::direct(
            config.token_a_address.clone(),
            config.token_b_address.clone(),
        )?;
        let quote = self.quote(units_in, path).await?;

        let decimals_out = self
            .meta()
            .decimals(self.ledger(), &config.token_b_address)
            .await
            .map_err(DexError::from_ledger)?;

        tracing::debug!(
            account = %session.account,
            amount_in,
            amount_out = %quote.amount_out(),
            "quoted expected output"
        );

        Ok(amount::to_display_string(quote.amount_out(), decimals_out))
    }
}
