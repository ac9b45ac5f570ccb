//! Core type definitions for Pairswap

use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{AddressError, PathError};

/// Ledger address (20 bytes, 0x-prefixed hex). Used for accounts,
/// contracts, and token identifiers alike.
///
/// Stored lowercased so equality and hashing ignore the mixed-case
/// checksum form the ledger tooling sometimes emits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create an address without validation (caller vouches for the format).
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into().to_ascii_lowercase())
    }

    /// Parse and validate an address string.
    pub fn parse(addr: &str) -> Result<Self, AddressError> {
        let body = addr
            .strip_prefix("0x")
            .or_else(|| addr.strip_prefix("0X"))
            .ok_or_else(|| AddressError::Invalid(addr.to_string()))?;

        if body.len() != 40 || hex::decode(body).is_err() {
            return Err(AddressError::Invalid(addr.to_string()));
        }

        Ok(Self::new(addr))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The null/zero address the factory returns for an absent pair.
    pub fn zero() -> Self {
        Self(constants::ZERO_ADDRESS.to_string())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == constants::ZERO_ADDRESS
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction ID (hex-encoded hash)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(pub String);

impl TxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An on-ledger amount in base units (the smallest indivisible unit).
///
/// Arbitrary precision: ledger amounts routinely exceed the safe integer
/// range of native floats, so every arithmetic path stays in `BigUint`.
/// Values are only ever produced by the amount codec or read back from
/// the ledger, never by float math.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BaseUnits(BigUint);

impl BaseUnits {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn from_u64(v: u64) -> Self {
        Self(BigUint::from(v))
    }

    pub fn from_biguint(v: BigUint) -> Self {
        Self(v)
    }

    /// Parse a plain base-10 integer string (no decimal point).
    pub fn from_decimal_str(s: &str) -> Option<Self> {
        BigUint::parse_bytes(s.as_bytes(), 10).map(Self)
    }

    /// The maximum representable on-ledger amount (2^256 - 1).
    /// Used for amortized spend approvals: one approval covers all
    /// future operations.
    pub fn max_uint256() -> Self {
        Self((BigUint::one() << 256u32) - BigUint::one())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn checked_add(&self, other: &Self) -> Self {
        Self(&self.0 + &other.0)
    }

    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        if self.0 >= other.0 {
            Some(Self(&self.0 - &other.0))
        } else {
            None
        }
    }

    /// `self * numerator / denominator` in integer arithmetic, rounding
    /// toward zero. Denominator must be non-zero.
    pub fn mul_ratio(&self, numerator: u64, denominator: u64) -> Self {
        debug_assert!(denominator != 0);
        Self(&self.0 * BigUint::from(numerator) / BigUint::from(denominator))
    }
}

impl fmt::Display for BaseUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_str_radix(10))
    }
}

// BaseUnits serializes as a decimal string: JSON numbers cannot carry
// 256-bit values losslessly.
impl Serialize for BaseUnits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_str_radix(10))
    }
}

impl<'de> Deserialize<'de> for BaseUnits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BaseUnits::from_decimal_str(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid base-unit amount: {s}")))
    }
}

/// Ordered hop sequence for a swap. Length >= 2, no identical consecutive
/// hops. Existence of liquidity along the path is not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradePath(Vec<Address>);

impl TradePath {
    pub fn new(hops: Vec<Address>) -> Result<Self, PathError> {
        if hops.len() < 2 {
            return Err(PathError::TooShort(hops.len()));
        }
        for (i, pair) in hops.windows(2).enumerate() {
            if pair[0] == pair[1] {
                return Err(PathError::DuplicateHop(i + 1));
            }
        }
        Ok(Self(hops))
    }

    /// The canonical single-swap path `[token_in, token_out]`.
    pub fn direct(token_in: Address, token_out: Address) -> Result<Self, PathError> {
        Self::new(vec![token_in, token_out])
    }

    pub fn first(&self) -> &Address {
        &self.0[0]
    }

    pub fn last(&self) -> &Address {
        &self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false // invariant: length >= 2
    }

    pub fn hops(&self) -> &[Address] {
        &self.0
    }
}

/// Constants
pub mod constants {
    /// Null address sentinel returned by the factory for an absent pair
    pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

    /// Default slippage tolerance (integer percent)
    pub const DEFAULT_SLIPPAGE_PERCENT: u32 = 5;

    /// Default settlement deadline offset (seconds)
    pub const DEFAULT_DEADLINE_SECS: u64 = 600;

    /// Default gas ceiling per settlement request
    pub const DEFAULT_GAS_LIMIT: u64 = 300_000;
}
