//! Configuration types for Pairswap

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::{constants, Address};

/// Deployment and execution settings consumed by the orchestration core.
///
/// The contract addresses are externally supplied (the factory, router,
/// and pair programs are already deployed); the remaining knobs default
/// to the values the reference deployment uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DexConfig {
    /// Factory contract address (pair registry)
    pub factory_address: Address,

    /// Router contract address (pricing oracle + settlement entry point)
    pub router_address: Address,

    /// First traded token
    pub token_a_address: Address,

    /// Second traded token
    pub token_b_address: Address,

    /// Slippage tolerance as an integer percent (5 = accept >= 95% of quote)
    #[serde(default = "default_slippage_percent")]
    pub slippage_percent: u32,

    /// Settlement deadline offset from submission time, in seconds
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,

    /// Gas ceiling per settlement request
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
}

fn default_slippage_percent() -> u32 {
    constants::DEFAULT_SLIPPAGE_PERCENT
}

fn default_deadline_secs() -> u64 {
    constants::DEFAULT_DEADLINE_SECS
}

fn default_gas_limit() -> u64 {
    constants::DEFAULT_GAS_LIMIT
}

impl DexConfig {
    /// Build a config with the default slippage/deadline/gas settings.
    pub fn new(
        factory_address: Address,
        router_address: Address,
        token_a_address: Address,
        token_b_address: Address,
    ) -> Self {
        Self {
            factory_address,
            router_address,
            token_a_address,
            token_b_address,
            slippage_percent: default_slippage_percent(),
            deadline_secs: default_deadline_secs(),
            gas_limit: default_gas_limit(),
        }
    }

    /// Validate the configuration surface before a session is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, addr) in [
            ("factory_address", &self.factory_address),
            ("router_address", &self.router_address),
            ("token_a_address", &self.token_a_address),
            ("token_b_address", &self.token_b_address),
        ] {
            if addr.is_zero() {
                return Err(ConfigError::ZeroAddress { field });
            }
        }
        if self.token_a_address == self.token_b_address {
            return Err(ConfigError::IdenticalTokens);
        }
        if self.slippage_percent >= 100 {
            return Err(ConfigError::SlippageOutOfRange(self.slippage_percent));
        }
        if self.deadline_secs == 0 {
            return Err(ConfigError::ZeroDeadline);
        }
        Ok(())
    }
}
