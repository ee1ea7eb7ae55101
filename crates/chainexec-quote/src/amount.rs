//! Integer amount parsing and basis-point arithmetic on `U256`.
//!
//! Amounts never touch floating point. Fees round in the caller's favour on
//! exact-input (floor of the fee) and in the pool's favour on exact-output
//! (ceiling of the required input).

use alloy_primitives::U256;
use serde_json::Value;

use crate::error::QuoteError;

/// 10 000 bps = 100 %.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Parse a non-negative integer amount.
///
/// Accepts a decimal string, a `0x`-prefixed hex string, or a non-negative
/// JSON integer. Signs, whitespace inside the digits, fractions and exponents
/// are rejected.
pub fn parse_amount(field: &str, value: &Value) -> Result<U256, QuoteError> {
    match value {
        Value::String(s) => parse_amount_str(field, s),
        Value::Number(n) => n.as_u64().map(U256::from).ok_or_else(|| {
            QuoteError::validation(format!(
                "{field} must be a non-negative integer; pass large amounts as strings (got {n})"
            ))
        }),
        other => Err(QuoteError::validation(format!(
            "{field} must be an integer string or number (got {other})"
        ))),
    }
}

pub fn parse_amount_str(field: &str, raw: &str) -> Result<U256, QuoteError> {
    let s = raw.trim();
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16u64),
        None => (s, 10u64),
    };
    let valid = !digits.is_empty()
        && digits.bytes().all(|b| match radix {
            16 => b.is_ascii_hexdigit(),
            _ => b.is_ascii_digit(),
        });
    if !valid {
        return Err(QuoteError::validation(format!(
            "{field} must be a non-negative integer (got {raw:?})"
        )));
    }
    U256::from_str_radix(digits, radix)
        .map_err(|e| QuoteError::validation(format!("{field} does not fit in 256 bits: {e}")))
}

fn overflow(what: &str) -> QuoteError {
    QuoteError::validation(format!("amount too large: {what} overflows 256 bits"))
}

/// `floor(amount * bps / 10_000)`.
pub fn bps_of_floor(amount: U256, bps: u32) -> Result<U256, QuoteError> {
    let scaled = amount
        .checked_mul(U256::from(bps))
        .ok_or_else(|| overflow("amount * bps"))?;
    Ok(scaled / U256::from(BPS_DENOMINATOR))
}

/// `amount - floor(amount * fee_bps / 10_000)`.
pub fn deduct_bps(amount: U256, bps: u32) -> Result<U256, QuoteError> {
    let fee = bps_of_floor(amount, bps)?;
    Ok(amount.saturating_sub(fee))
}

/// Bridge output: the fee is taken once, rounded down.
pub fn bridge_amount_out(amount: U256, fee_bps: u32) -> Result<U256, QuoteError> {
    deduct_bps(amount, fee_bps)
}

/// Exact-input swap output: fee first, then price impact on what remains.
pub fn swap_amount_out(amount_in: U256, fee_bps: u32, price_impact_bps: u32) -> Result<U256, QuoteError> {
    let after_fee = deduct_bps(amount_in, fee_bps)?;
    deduct_bps(after_fee, price_impact_bps)
}

/// Exact-output swap input:
/// `ceil(out * 1e8 / ((10_000 - fee) * (10_000 - impact)))`.
///
/// Returns `None` when either factor is 100 % or more (no input can deliver
/// any output).
pub fn swap_amount_in(
    amount_out: U256,
    fee_bps: u32,
    price_impact_bps: u32,
) -> Result<Option<U256>, QuoteError> {
    let denom = u64::from(fee_bps) < BPS_DENOMINATOR && u64::from(price_impact_bps) < BPS_DENOMINATOR;
    if !denom {
        return Ok(None);
    }
    let keep_fee = U256::from(BPS_DENOMINATOR - u64::from(fee_bps));
    let keep_impact = U256::from(BPS_DENOMINATOR - u64::from(price_impact_bps));
    let denominator = keep_fee * keep_impact;

    let numerator = amount_out
        .checked_mul(U256::from(BPS_DENOMINATOR * BPS_DENOMINATOR))
        .ok_or_else(|| overflow("amountOut * 1e8"))?;

    let quotient = numerator / denominator;
    let rounded = if (numerator % denominator).is_zero() {
        quotient
    } else {
        quotient + U256::from(1u64)
    };
    Ok(Some(rounded))
}
