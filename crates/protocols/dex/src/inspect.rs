//! Pool inspector
//!
//! Read-only snapshot of the configured pair: registry lookup, then
//! reserves and stored asset order from the pair itself. Reserves are
//! reported exactly as the pool stores them; `token0`/`token1` say
//! which configured asset each reserve belongs to, and callers must not
//! assume that order matches the configuration.

use ledger_client::Ledger;

use crate::session::Dex;
use crate::state::{DexError, PoolInfo};

impl<L: Ledger> Dex<L> {
    /// Snapshot the configured pair's pool, or `PairNotFound` when the
    /// registry has no live pair for the configured tokens.
    pub async fn pool_info(&self) -> Result<PoolInfo, DexError> {
        let session = self.session().await?;
        let config = self.config();

        let pair_address = self
            .ledger()
            .get_pair(
                &session.factory,
                &config.token_a_address,
                &config.token_b_address,
            )
            .await
            .map_err(DexError::from_ledger)?;
        if pair_address.is_zero() {
            return Err(DexError::PairNotFound);
        }

        let (reserve0, reserve1) = self
            .ledger()
            .get_reserves(&pair_address)
            .await
            .map_err(DexError::from_ledger)?;
        let token0 = self
            .ledger()
            .token0(&pair_address)
            .await
            .map_err(DexError::from_ledger)?;
        let token1 = self
            .ledger()
            .token1(&pair_address)
            .await
            .map_err(DexError::from_ledger)?;

        tracing::debug!(
            pair = %pair_address,
            reserve0 = %reserve0,
            reserve1 = %reserve1,
            "pool snapshot taken"
        );

        Ok(PoolInfo {
            pair_address,
            token0,
            token1,
            reserve0,
            reserve1,
        })
    }
}
