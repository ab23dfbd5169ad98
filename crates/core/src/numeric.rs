//! Decimal helpers shared by the valuation and ledger engines.
//!
//! Money and quantities are `rust_decimal::Decimal` throughout; arithmetic
//! that can leave the decimal range goes through [`checked`].

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{DomainError, DomainResult};

/// Reject negative values; returns the value unchanged otherwise.
pub fn ensure_non_negative(value: Decimal, field: &str) -> DomainResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(DomainError::invalid_input(format!("{field} cannot be negative (got {value})")));
    }
    Ok(value)
}

/// Unwrap the result of a checked decimal operation.
pub fn checked(value: Option<Decimal>, what: &str) -> DomainResult<Decimal> {
    value.ok_or_else(|| DomainError::invalid_input(format!("arithmetic overflow in {what}")))
}

/// Round for presentation (midpoint away from zero, the way printed
/// statements round). Engines keep full precision; only renderers call this.
pub fn round_display(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
