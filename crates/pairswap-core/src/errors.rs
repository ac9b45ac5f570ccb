//! Error types for Pairswap core

use thiserror::Error;

/// Amount codec errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("malformed amount '{input}': {reason}")]
    Malformed { input: String, reason: &'static str },
}

impl AmountError {
    pub(crate) fn malformed(input: &str, reason: &'static str) -> Self {
        Self::Malformed {
            input: input.to_string(),
            reason,
        }
    }
}

/// Address parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid address '{0}': expected 0x-prefixed 20-byte hex")]
    Invalid(String),
}

/// Trade path construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("trade path needs at least 2 hops, got {0}")]
    TooShort(usize),

    #[error("trade path repeats the same asset at hop {0}")]
    DuplicateHop(usize),
}

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} is the zero address")]
    ZeroAddress { field: &'static str },

    #[error("token_a_address and token_b_address are identical")]
    IdenticalTokens,

    #[error("slippage_percent {0} out of range (0..=99)")]
    SlippageOutOfRange(u32),

    #[error("deadline_secs must be greater than 0")]
    ZeroDeadline,
}
