//! Pairswap orchestration core
//!
//! Turns a user intent ("swap X of token A for token B") into a
//! correctly-ordered sequence of authorization and settlement requests
//! against the external ledger: validate, quote, bound slippage, ensure
//! spend authorization, submit with a deadline, await finality. Also
//! covers pair creation, liquidity provisioning, standalone approvals,
//! and pool inspection.
//!
//! Pricing and settlement themselves live in the deployed
//! factory/router/pair programs; this crate only sequences calls to
//! them through the `ledger-client` traits.

pub mod authorize;
pub mod inspect;
pub mod liquidity;
pub mod locks;
pub mod quote;
pub mod session;
pub mod state;
pub mod swap;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports
pub use locks::{IntentGuard, IntentKey, IntentLocks};
pub use session::{Dex, SessionContext};
pub use state::{
    Authorization, DexError, LiquidityFailure, LiquidityReceipt, PairCreated, PoolInfo, Quote,
    SwapFailure, SwapPhase, SwapReceipt,
};
