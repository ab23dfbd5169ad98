use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerbook_core::{DomainError, DomainResult, Timestamped, ensure_non_negative};

/// What a stock movement does to quantity on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Legacy stock seeded at an average cost. Costed like a purchase.
    Opening,
    Purchase,
    Sale,
    Waste,
    /// Stock correction. Always reduces stock.
    Adjustment,
}

impl MovementKind {
    /// Opening and Purchase add stock at their own rate; everything else
    /// consumes stock at the prevailing average.
    pub fn adds_stock(self) -> bool {
        matches!(self, MovementKind::Opening | MovementKind::Purchase)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Opening => "opening",
            MovementKind::Purchase => "purchase",
            MovementKind::Sale => "sale",
            MovementKind::Waste => "waste",
            MovementKind::Adjustment => "adjustment",
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for MovementKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "opening" => Ok(MovementKind::Opening),
            "purchase" => Ok(MovementKind::Purchase),
            "sale" => Ok(MovementKind::Sale),
            "waste" => Ok(MovementKind::Waste),
            "adjustment" => Ok(MovementKind::Adjustment),
            other => Err(DomainError::validation(format!("unknown movement kind: {other}"))),
        }
    }
}

/// One append-only stock movement of a single product.
///
/// `sequence` is the creation sequence; it breaks ties between movements that
/// share a timestamp. `sell_rate` is informational only and never used for
/// costing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub kind: MovementKind,
    pub occurred_at: DateTime<Utc>,
    pub quantity: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell_rate: Option<Decimal>,
    #[serde(default)]
    pub sequence: u64,
}

impl StockMovement {
    pub fn new(
        kind: MovementKind,
        occurred_at: DateTime<Utc>,
        quantity: Decimal,
        unit_rate: Option<Decimal>,
    ) -> Self {
        Self {
            kind,
            occurred_at,
            quantity,
            unit_rate,
            sell_rate: None,
            sequence: 0,
        }
    }

    pub fn opening(occurred_at: DateTime<Utc>, quantity: Decimal, unit_rate: Decimal) -> Self {
        Self::new(MovementKind::Opening, occurred_at, quantity, Some(unit_rate))
    }

    pub fn purchase(occurred_at: DateTime<Utc>, quantity: Decimal, unit_rate: Decimal) -> Self {
        Self::new(MovementKind::Purchase, occurred_at, quantity, Some(unit_rate))
    }

    pub fn sale(occurred_at: DateTime<Utc>, quantity: Decimal) -> Self {
        Self::new(MovementKind::Sale, occurred_at, quantity, None)
    }

    pub fn waste(occurred_at: DateTime<Utc>, quantity: Decimal) -> Self {
        Self::new(MovementKind::Waste, occurred_at, quantity, None)
    }

    pub fn adjustment(occurred_at: DateTime<Utc>, quantity: Decimal) -> Self {
        Self::new(MovementKind::Adjustment, occurred_at, quantity, None)
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_sell_rate(mut self, sell_rate: Decimal) -> Self {
        self.sell_rate = Some(sell_rate);
        self
    }

    /// Reject negative quantities and rates.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_non_negative(self.quantity, "quantity")?;
        if let Some(rate) = self.unit_rate {
            ensure_non_negative(rate, "unit_rate")?;
        }
        if let Some(rate) = self.sell_rate {
            ensure_non_negative(rate, "sell_rate")?;
        }
        Ok(())
    }
}

impl Timestamped for StockMovement {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
