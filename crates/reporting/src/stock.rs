//! Stock valuation report across products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerbook_core::{ProductId, checked};
use ledgerbook_inventory::{IntegrityWarning, StockMovement, ValuationSummary, compute_summary};

use crate::error::{ReportError, ReportResult};

/// Full movement history of one product, as supplied by persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductHistory {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub movements: Vec<StockMovement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockReportLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub name: String,
    #[serde(flatten)]
    pub summary: ValuationSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<IntegrityWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockValuationReport {
    pub lines: Vec<StockReportLine>,
    pub total_value: Decimal,
}

impl StockValuationReport {
    pub fn flagged(&self) -> impl Iterator<Item = &StockReportLine> {
        self.lines.iter().filter(|l| !l.warnings.is_empty())
    }
}

/// Value every product with movements, sorted by product name.
///
/// Products without movements are left out. Any failure aborts the whole
/// report.
pub fn build_stock_report(products: &[ProductHistory]) -> ReportResult<StockValuationReport> {
    let mut lines = Vec::with_capacity(products.len());

    for product in products.iter().filter(|p| !p.movements.is_empty()) {
        let summary = compute_summary(&product.movements)
            .map_err(|e| ReportError::compute(format!("valuation of {}", product.name), e))?;
        let warnings = summary.integrity_warnings();
        for warning in &warnings {
            tracing::warn!(product = %product.name, %warning, "stock integrity warning");
        }
        lines.push(StockReportLine {
            product_id: product.product_id,
            name: product.name.clone(),
            summary,
            warnings,
        });
    }

    lines.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    let total_value = lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, l| checked(acc.checked_add(l.summary.total_value), "stock total"))
        .map_err(|e| ReportError::compute("stock valuation total", e))?;

    tracing::info!(products = lines.len(), total_value = %total_value, "stock report built");
    Ok(StockValuationReport { lines, total_value })
}
