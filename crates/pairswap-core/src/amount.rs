//! Decimal amount codec
//!
//! Converts between human-entered decimal strings and integer base units
//! using a per-asset precision. Excess fractional digits are an input
//! error, never silently truncated; formatting back is always lossless.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::errors::AmountError;
use crate::types::BaseUnits;

fn pow10(exp: u32) -> BigUint {
    BigUint::from(10u32).pow(exp)
}

/// Parse a non-negative decimal string into base units.
///
/// Accepts `"12"`, `"12.5"`, `"0.000001"`. Rejects empty input, signs,
/// exponents, multiple dots, bare `"."`, and fractional parts longer
/// than `decimals`.
pub fn to_base_units(input: &str, decimals: u32) -> Result<BaseUnits, AmountError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(AmountError::malformed(input, "empty input"));
    }

    let (int_part, frac_part) = match s.split_once('.') {
        None => (s, ""),
        Some((i, f)) => (i, f),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::malformed(input, "no digits"));
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::malformed(input, "non-digit characters"));
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::malformed(input, "non-digit characters"));
    }
    if frac_part.len() as u32 > decimals {
        return Err(AmountError::malformed(
            input,
            "more fractional digits than the asset precision allows",
        ));
    }

    let parse = |digits: &str| {
        BigUint::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| AmountError::malformed(input, "non-digit characters"))
    };

    let int_units = if int_part.is_empty() {
        BigUint::zero()
    } else {
        parse(int_part)?
    };

    let frac_units = if frac_part.is_empty() {
        BigUint::zero()
    } else {
        parse(frac_part)? * pow10(decimals - frac_part.len() as u32)
    };

    Ok(BaseUnits::from_biguint(int_units * pow10(decimals) + frac_units))
}

/// Format base units as a decimal string with exactly `decimals`
/// fractional digits (`1500000` at 6 decimals -> `"1.500000"`).
pub fn to_display_string(amount: &BaseUnits, decimals: u32) -> String {
    let value = amount.as_biguint();
    if decimals == 0 {
        return value.to_str_radix(10);
    }

    let scale = pow10(decimals);
    let whole = value / &scale;
    let frac = value % &scale;

    format!(
        "{}.{:0>width$}",
        whole.to_str_radix(10),
        frac.to_str_radix(10),
        width = decimals as usize
    )
}
