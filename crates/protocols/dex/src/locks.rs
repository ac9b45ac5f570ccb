//! Per-key intent locks
//!
//! The core runs each intent as one strictly sequential async flow, but
//! nothing stops the presentation layer from firing two intents that
//! touch the same external state. Every mutating operation therefore
//! registers the (account, asset) and (account, pool) keys it touches
//! before validating, and a second intent on an occupied key is rejected
//! with `OperationInProgress` rather than queued.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use pairswap_core::Address;

use crate::state::DexError;

/// External state a pending intent mutates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntentKey {
    /// Balance/allowance of one asset for one account
    Asset { account: Address, token: Address },
    /// One pool, canonically ordered, for one account
    Pool {
        account: Address,
        token0: Address,
        token1: Address,
    },
}

impl IntentKey {
    pub fn asset(account: &Address, token: &Address) -> Self {
        Self::Asset {
            account: account.clone(),
            token: token.clone(),
        }
    }

    /// Pool key; the token order the caller used does not matter.
    pub fn pool(account: &Address, token_a: &Address, token_b: &Address) -> Self {
        let (token0, token1) = if token_a.as_str() <= token_b.as_str() {
            (token_a.clone(), token_b.clone())
        } else {
            (token_b.clone(), token_a.clone())
        };
        Self::Pool {
            account: account.clone(),
            token0,
            token1,
        }
    }
}

type KeySet = Arc<Mutex<HashSet<IntentKey>>>;

/// In-flight marker set shared by all operations of one `Dex` instance.
#[derive(Debug, Default)]
pub struct IntentLocks {
    inner: KeySet,
}

impl IntentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every key at once, or fail with `OperationInProgress` if
    /// any of them is already held. All-or-nothing: a partial grab would
    /// deadlock two liquidity intents against each other.
    pub fn try_acquire(&self, keys: Vec<IntentKey>) -> Result<IntentGuard, DexError> {
        let mut held = lock_set(&self.inner);

        if keys.iter().any(|k| held.contains(k)) {
            return Err(DexError::OperationInProgress);
        }
        for key in &keys {
            held.insert(key.clone());
        }

        Ok(IntentGuard {
            keys,
            set: Arc::clone(&self.inner),
        })
    }
}

/// Releases its keys when the owning intent reaches a terminal state
/// (dropped on both success and failure paths).
#[derive(Debug)]
pub struct IntentGuard {
    keys: Vec<IntentKey>,
    set: KeySet,
}

impl Drop for IntentGuard {
    fn drop(&mut self) {
        let mut held = lock_set(&self.set);
        for key in &self.keys {
            held.remove(key);
        }
    }
}

// The set is only touched in short critical sections with no await
// inside; a poisoned mutex still holds consistent data.
fn lock_set(set: &KeySet) -> std::sync::MutexGuard<'_, HashSet<IntentKey>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
