//! Weighted-average-cost (WAC) valuation.
//!
//! The summary is always recomputed by replaying a product's full movement
//! history in chronological order. Nothing here is incremental: the average
//! cost is path-dependent, so a cached running total would drift as soon as a
//! back-dated movement is inserted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerbook_core::{DomainResult, ValueObject, checked, round_display};

use crate::movement::StockMovement;

/// Derived stock position of one product.
///
/// Invariant: `average_unit_cost == total_value / quantity_on_hand` when
/// `quantity_on_hand > 0`, and exactly zero otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValuationSummary {
    pub quantity_on_hand: Decimal,
    pub total_value: Decimal,
    pub average_unit_cost: Decimal,
}

impl ValueObject for ValuationSummary {}

/// Soft integrity flags. Returned alongside a summary, never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityWarning {
    /// More stock was consumed than was ever received.
    NegativeQuantity { quantity_on_hand: Decimal },
    NegativeValue { total_value: Decimal },
}

impl core::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IntegrityWarning::NegativeQuantity { quantity_on_hand } => {
                write!(f, "negative quantity on hand ({quantity_on_hand}); stock oversold")
            }
            IntegrityWarning::NegativeValue { total_value } => {
                write!(f, "negative stock value ({total_value})")
            }
        }
    }
}

impl ValuationSummary {
    /// Build a summary from totals, deriving the average cost.
    pub fn from_totals(quantity_on_hand: Decimal, total_value: Decimal) -> DomainResult<Self> {
        Ok(Self {
            quantity_on_hand,
            total_value,
            average_unit_cost: average_cost(quantity_on_hand, total_value)?,
        })
    }

    pub fn is_oversold(&self) -> bool {
        self.quantity_on_hand < Decimal::ZERO
    }

    /// Integrity flags the caller may want to surface (oversold stock).
    pub fn integrity_warnings(&self) -> Vec<IntegrityWarning> {
        let mut warnings = Vec::new();
        if self.quantity_on_hand < Decimal::ZERO {
            warnings.push(IntegrityWarning::NegativeQuantity {
                quantity_on_hand: self.quantity_on_hand,
            });
        }
        if self.total_value < Decimal::ZERO {
            warnings.push(IntegrityWarning::NegativeValue {
                total_value: self.total_value,
            });
        }
        warnings
    }

    /// Presentation copy rounded to `dp` decimal places.
    pub fn rounded(&self, dp: u32) -> Self {
        Self {
            quantity_on_hand: round_display(self.quantity_on_hand, dp),
            total_value: round_display(self.total_value, dp),
            average_unit_cost: round_display(self.average_unit_cost, dp),
        }
    }
}

/// One replayed movement with the position standing after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationStep {
    pub movement: StockMovement,
    /// Unit cost the movement was booked at: its own rate for receipts, the
    /// pre-event average for consumption.
    pub unit_cost_applied: Decimal,
    pub quantity_after: Decimal,
    pub value_after: Decimal,
}

fn average_cost(quantity: Decimal, value: Decimal) -> DomainResult<Decimal> {
    if quantity > Decimal::ZERO {
        checked(value.checked_div(quantity), "average unit cost")
    } else {
        Ok(Decimal::ZERO)
    }
}

#[derive(Debug, Default)]
struct Position {
    quantity: Decimal,
    value: Decimal,
}

impl Position {
    /// Apply one movement and return the unit cost it was booked at.
    fn apply(&mut self, movement: &StockMovement) -> DomainResult<Decimal> {
        let qty = movement.quantity;

        if movement.kind.adds_stock() {
            let rate = movement.unit_rate.unwrap_or(Decimal::ZERO);
            let cost = checked(qty.checked_mul(rate), "receipt value")?;
            self.quantity = checked(self.quantity.checked_add(qty), "quantity on hand")?;
            self.value = checked(self.value.checked_add(cost), "total value")?;
            return Ok(rate);
        }

        // Consumption is costed at the average in effect before this movement.
        let avg = average_cost(self.quantity, self.value)?;
        let cost = if self.quantity > Decimal::ZERO {
            // qty * (value / on_hand), multiplied first to avoid rounding the average.
            let scaled = checked(qty.checked_mul(self.value), "consumption cost")?;
            checked(scaled.checked_div(self.quantity), "consumption cost")?
        } else {
            Decimal::ZERO
        };
        self.quantity = checked(self.quantity.checked_sub(qty), "quantity on hand")?;
        self.value = checked(self.value.checked_sub(cost), "total value")?;
        Ok(avg)
    }
}

/// Validate and order movements: by timestamp, then creation sequence, then
/// input position (the sort is stable).
fn ordered(movements: &[StockMovement]) -> DomainResult<Vec<&StockMovement>> {
    for m in movements {
        m.validate()?;
    }
    let mut ordered: Vec<&StockMovement> = movements.iter().collect();
    ordered.sort_by_key(|m| (m.occurred_at, m.sequence));
    Ok(ordered)
}

/// Replay a product's movements and return the per-movement trail.
pub fn replay(movements: &[StockMovement]) -> DomainResult<Vec<ValuationStep>> {
    let mut position = Position::default();
    let mut steps = Vec::with_capacity(movements.len());

    for movement in ordered(movements)? {
        let unit_cost_applied = position.apply(movement)?;
        tracing::trace!(
            kind = %movement.kind,
            quantity = %movement.quantity,
            unit_cost = %unit_cost_applied,
            on_hand = %position.quantity,
            value = %position.value,
            "movement replayed"
        );
        steps.push(ValuationStep {
            movement: movement.clone(),
            unit_cost_applied,
            quantity_after: position.quantity,
            value_after: position.value,
        });
    }

    Ok(steps)
}

/// Compute the WAC summary of one product from its full movement history.
///
/// This is the position after the last step of [`replay`]. The input may be
/// in any order. Negative results (oversold stock) are returned as-is; see
/// [`ValuationSummary::integrity_warnings`].
pub fn compute_summary(movements: &[StockMovement]) -> DomainResult<ValuationSummary> {
    let steps = replay(movements)?;
    let summary = match steps.last() {
        Some(last) => ValuationSummary::from_totals(last.quantity_after, last.value_after)?,
        None => ValuationSummary::default(),
    };

    tracing::debug!(
        movements = movements.len(),
        quantity_on_hand = %summary.quantity_on_hand,
        total_value = %summary.total_value,
        "valuation computed"
    );
    Ok(summary)
}
