//! Session-lifetime token metadata cache
//!
//! Asset precision is immutable on the ledger, so one fetch per token
//! per session is enough. Balances and allowances are deliberately NOT
//! cached anywhere: they change under concurrent traffic.

use std::collections::HashMap;

use tokio::sync::RwLock;

use pairswap_core::Address;

use crate::{Ledger, Result};

/// Caches `decimals()` per token for the lifetime of a session.
#[derive(Debug, Default)]
pub struct DecimalsCache {
    inner: RwLock<HashMap<Address, u32>>,
}

impl DecimalsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a token's precision, fetching and caching it on first use.
    pub async fn decimals<L: Ledger>(&self, ledger: &L, token: &Address) -> Result<u32> {
        if let Some(d) = self.inner.read().await.get(token) {
            return Ok(*d);
        }

        let d = ledger.decimals(token).await?;
        self.inner.write().await.insert(token.clone(), d);
        tracing::debug!(token = %token, decimals = d, "cached token precision");
        Ok(d)
    }

    /// Cached value, if any, without touching the ledger.
    pub async fn peek(&self, token: &Address) -> Option<u32> {
        self.inner.read().await.get(token).copied()
    }
}
