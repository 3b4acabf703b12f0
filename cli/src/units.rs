//! Human decimal amounts <-> 18-decimal base units

use anyhow::{bail, Context, Result};
use zcurve_model::U256;

/// Fractional digits of one whole token or payment unit
pub const DECIMALS: usize = 18;

/// Parse "1.5", "800000000" or "0.01" into base units
pub fn parse_amount(input: &str) -> Result<U256> {
    let trimmed = input.trim().replace('_', "");
    if trimmed.is_empty() {
        bail!("Empty amount");
    }
    if trimmed.starts_with('-') {
        bail!("Amount must not be negative: {}", input);
    }

    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed.as_str(), ""),
    };
    if trimmed.contains('.') && frac.is_empty() {
        bail!("Amount {} has no digits after the decimal point", input);
    }
    if frac.len() > DECIMALS {
        bail!("Amount {} has more than {} decimal places", input, DECIMALS);
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        bail!("Invalid amount: {}", input);
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let digits = format!("{}{:0<width$}", whole, frac, width = DECIMALS);
    digits
        .parse::<U256>()
        .with_context(|| format!("Amount out of range: {}", input))
}

/// Parse a raw integer (no decimal scaling), used for the divisor
pub fn parse_raw(input: &str) -> Result<U256> {
    let trimmed = input.trim().replace('_', "");
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        bail!("Invalid integer: {}", input);
    }
    trimmed
        .parse::<U256>()
        .with_context(|| format!("Integer out of range: {}", input))
}

/// Render base units as a decimal with trailing zeros trimmed
pub fn format_amount(value: U256) -> String {
    let digits = value.to_string();
    let (whole, frac) = if digits.len() > DECIMALS {
        let split = digits.len() - DECIMALS;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        ("0".to_string(), format!("{:0>width$}", digits, width = DECIMALS))
    };

    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole
    } else {
        format!("{}.{}", whole, frac)
    }
}
