//! Reporting layer: turns engine output into statements and exports.
//!
//! Assembles the stock valuation report and per-account ledger statements,
//! renders them as CSV, and loads report settings from the environment.

pub mod config;
pub mod error;
pub mod export;
pub mod statement;
pub mod stock;

pub use config::{ConfigError, ReportConfig};
pub use error::{ReportError, ReportResult};
pub use export::{write_period_totals_csv, write_statement_csv, write_stock_report_csv};
pub use statement::{AccountHistory, LedgerStatement, OrderingMode, ReportWindow, build_statement};
pub use stock::{ProductHistory, StockReportLine, StockValuationReport, build_stock_report};
