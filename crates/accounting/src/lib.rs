//! Accounting module: per-account ledgers, running balances, period totals.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod period;
pub mod running;
pub mod transaction;

pub use period::{
    Granularity, PeriodKey, PeriodTotal, PeriodTotals, aggregate_periods, aggregate_periods_checked,
    try_aggregate_periods,
};
pub use running::{RunningLedgerRow, compute_running, compute_running_checked, try_compute_running};
pub use transaction::{AccountOpeningState, BalanceSide, LedgerTransaction, net_movement};
