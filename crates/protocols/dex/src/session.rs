//! Session context and the orchestration entry point
//!
//! Every operation shares one precondition: the connected account and
//! the factory/router handles must be resolved first. `initialize`
//! builds that context once; it is immutable afterwards and replaced
//! wholesale on re-initialization (e.g. a network change), never
//! mutated field by field.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;

use ledger_client::{DecimalsCache, Ledger, SendOptions};
use pairswap_core::{Address, DexConfig};

use crate::locks::IntentLocks;
use crate::state::DexError;

/// Resolved per-session state: read-only once built, safe to share
/// across concurrent intents.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Connected account (swap recipient and liquidity provider)
    pub account: Address,
    /// Pair registry contract
    pub factory: Address,
    /// Pricing + settlement contract
    pub router: Address,
}

/// The orchestration core. Owns the ledger handle, the configuration
/// surface, the session slot, the per-key intent locks, and the
/// session-lifetime decimals cache.
pub struct Dex<L: Ledger> {
    ledger: L,
    config: DexConfig,
    session: RwLock<Option<Arc<SessionContext>>>,
    locks: IntentLocks,
    meta: DecimalsCache,
}

impl<L: Ledger> Dex<L> {
    /// Create an uninitialized core. Every operation fails with
    /// `NotInitialized` until [`Dex::initialize`] succeeds.
    pub fn new(ledger: L, config: DexConfig) -> Self {
        Self {
            ledger,
            config,
            session: RwLock::new(None),
            locks: IntentLocks::new(),
            meta: DecimalsCache::new(),
        }
    }

    /// Validate the configuration, resolve the connected account, and
    /// install the session context. Calling this again replaces the
    /// whole context atomically.
    pub async fn initialize(&self) -> Result<Arc<SessionContext>, DexError> {
        self.config.validate()?;

        let account = self
            .ledger
            .request_account()
            .await
            .map_err(DexError::from_ledger)?;

        let context = Arc::new(SessionContext {
            account,
            factory: self.config.factory_address.clone(),
            router: self.config.router_address.clone(),
        });

        tracing::info!(
            account = %context.account,
            factory = %context.factory,
            router = %context.router,
            "session initialized"
        );

        *self.session.write().await = Some(Arc::clone(&context));
        Ok(context)
    }

    /// The current session, or `NotInitialized`.
    pub async fn session(&self) -> Result<Arc<SessionContext>, DexError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(DexError::NotInitialized)
    }

    pub fn config(&self) -> &DexConfig {
        &self.config
    }

    pub(crate) fn ledger(&self) -> &L {
        &self.ledger
    }

    pub(crate) fn locks(&self) -> &IntentLocks {
        &self.locks
    }

    pub(crate) fn meta(&self) -> &DecimalsCache {
        &self.meta
    }

    pub(crate) fn send_options(&self) -> SendOptions {
        SendOptions {
            gas_limit: self.config.gas_limit,
        }
    }

    /// Settlement deadline for an intent submitted now.
    pub(crate) fn deadline(&self) -> u64 {
        now_unix() + self.config.deadline_secs
    }
}

/// Current unix time in seconds.
pub(crate) fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
