//! Inventory domain module: stock movements and weighted-average-cost valuation.
//!
//! Pure, deterministic domain logic (no IO, no storage). Callers supply the
//! full movement history of one product; the engine replays it.

pub mod movement;
pub mod valuation;

pub use movement::{MovementKind, StockMovement};
pub use valuation::{IntegrityWarning, ValuationStep, ValuationSummary, compute_summary, replay};
