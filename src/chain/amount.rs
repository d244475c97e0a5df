//! Ether amounts as the UI handles them: decimal strings in, wei out.

use alloy_primitives::U256;
use alloy_primitives::utils::parse_ether;

use super::Amount;

/// 0.001 ETH, the stepper increment and the default tip.
pub const STEP_WEI: Amount = U256::from_limbs([1_000_000_000_000_000, 0, 0, 0]);

pub const DEFAULT_TIP: &str = "0.001";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount must not be negative: {0}")]
    Negative(String),
    #[error("amount is not a valid ether value: {0}")]
    Malformed(String),
}

pub fn parse_amount(raw: &str) -> Result<Amount, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative(trimmed.to_string()));
    }
    parse_ether(trimmed).map_err(|_| AmountError::Malformed(trimmed.to_string()))
}

/// Formats wei as ether rounded to three decimals, e.g. `0.012`.
pub fn format_eth(amount: Amount) -> String {
    let half_step = STEP_WEI / U256::from(2u64);
    let milli = amount.saturating_add(half_step) / STEP_WEI;
    let thousand = U256::from(1000u64);
    let whole = milli / thousand;
    let frac = (milli % thousand).as_limbs()[0];
    format!("{whole}.{frac:03}")
}

/// Stepper `+` button. Unparsable input counts as zero.
pub fn step_up(raw: &str) -> String {
    let current = parse_amount(raw).unwrap_or(U256::ZERO);
    format_eth(current.saturating_add(STEP_WEI))
}

/// Stepper `-` button, floored at zero.
pub fn step_down(raw: &str) -> String {
    let current = parse_amount(raw).unwrap_or(U256::ZERO);
    format_eth(current.saturating_sub(STEP_WEI))
}
