//! CSV export of statements and reports.
//!
//! Every field is quoted, headers first. Amounts are rounded to the
//! configured display scale; dates are ISO calendar dates.

use std::io::Write;

use csv::{QuoteStyle, Writer, WriterBuilder};
use rust_decimal::Decimal;

use ledgerbook_accounting::{BalanceSide, PeriodTotals};
use ledgerbook_core::round_display;

use crate::error::ReportResult;
use crate::statement::LedgerStatement;
use crate::stock::StockValuationReport;

fn writer<W: Write>(out: W) -> Writer<W> {
    WriterBuilder::new().quote_style(QuoteStyle::Always).from_writer(out)
}

fn amount(value: Decimal, scale: u32) -> String {
    format!("{:.*}", scale as usize, round_display(value, scale))
}

/// Statement rows: date, voucher, description, debit, credit, balance, side.
pub fn write_statement_csv<W: Write>(statement: &LedgerStatement, out: W, scale: u32) -> ReportResult<()> {
    let mut wtr = writer(out);
    wtr.write_record(["Date", "Voucher", "Description", "Debit", "Credit", "Balance", "Dr/Cr"])?;

    let (opening, side) = BalanceSide::of(statement.opening);
    let opening_date = statement.window.from.map(|d| d.to_string()).unwrap_or_default();
    wtr.write_record([
        opening_date,
        String::new(),
        "Opening balance".to_string(),
        String::new(),
        String::new(),
        amount(opening, scale),
        side.to_string(),
    ])?;

    for row in &statement.rows {
        let tx = &row.transaction;
        let (balance, side) = BalanceSide::of(row.running_balance);
        wtr.write_record([
            tx.occurred_at.date_naive().to_string(),
            tx.voucher_ref.clone().unwrap_or_default(),
            tx.narrative.clone().unwrap_or_default(),
            amount(tx.debit_amount, scale),
            amount(tx.credit_amount, scale),
            amount(balance, scale),
            side.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Period totals: period, debit, credit, closing, side.
pub fn write_period_totals_csv<W: Write>(totals: &PeriodTotals, out: W, scale: u32) -> ReportResult<()> {
    let mut wtr = writer(out);
    wtr.write_record(["Period", "Debit", "Credit", "Closing", "Dr/Cr"])?;
    for item in &totals.items {
        let (closing, side) = BalanceSide::of(item.closing_balance);
        wtr.write_record([
            item.key.to_string(),
            amount(item.debit_sum, scale),
            amount(item.credit_sum, scale),
            amount(closing, scale),
            side.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Stock report: product, quantity, average cost, value, flags; then a total row.
pub fn write_stock_report_csv<W: Write>(report: &StockValuationReport, out: W, scale: u32) -> ReportResult<()> {
    let mut wtr = writer(out);
    wtr.write_record(["Product", "Quantity", "Average Cost", "Value", "Warnings"])?;
    for line in &report.lines {
        let warnings: Vec<String> = line.warnings.iter().map(ToString::to_string).collect();
        wtr.write_record([
            line.name.clone(),
            amount(line.summary.quantity_on_hand, scale),
            amount(line.summary.average_unit_cost, scale),
            amount(line.summary.total_value, scale),
            warnings.join("; "),
        ])?;
    }
    wtr.write_record([
        "Total".to_string(),
        String::new(),
        String::new(),
        amount(report.total_value, scale),
        String::new(),
    ])?;
    wtr.flush()?;
    Ok(())
}
