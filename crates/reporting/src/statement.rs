//! Ledger statements over a report window.
//!
//! A statement starts from the balance standing at the window start (the
//! account's signed opening plus everything booked before the window), runs
//! the in-window transactions, and groups them into period totals.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerbook_accounting::{
    AccountOpeningState, Granularity, LedgerTransaction, PeriodTotals, RunningLedgerRow,
    try_compute_running,
};
use ledgerbook_core::{AccountId, DomainResult, checked, ensure_chronological, sort_chronologically};

use crate::error::{ReportError, ReportResult};

/// Inclusive calendar-date window (UTC). Open ends are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReportWindow {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> ReportResult<Self> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(ReportError::Window(format!("from {from} is after to {to}")));
            }
        }
        Ok(Self { from, to })
    }

    pub fn all_time() -> Self {
        Self::default()
    }

    /// First instant inside the window.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.from.map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let date = at.date_naive();
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Everything known about one account, as supplied by persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountHistory {
    #[serde(default)]
    pub account_id: Option<AccountId>,
    pub name: String,
    #[serde(default)]
    pub opening: AccountOpeningState,
    #[serde(default)]
    pub transactions: Vec<LedgerTransaction>,
}

/// How the builder treats transaction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingMode {
    /// Stable-sort by timestamp before running balances.
    #[default]
    Sort,
    /// Require chronological input and fail otherwise.
    Verify,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerStatement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    pub name: String,
    pub window: ReportWindow,
    pub opening: Decimal,
    pub rows: Vec<RunningLedgerRow>,
    pub totals: PeriodTotals,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub closing: Decimal,
}

/// Build the statement of one account for `window`.
///
/// Every transaction is validated first, including those before the window,
/// since they feed the opening.
pub fn build_statement(
    history: &AccountHistory,
    window: ReportWindow,
    granularity: Granularity,
    ordering: OrderingMode,
) -> ReportResult<LedgerStatement> {
    let subject = || format!("ledger of {}", history.name);

    let mut transactions = history.transactions.clone();
    for tx in &transactions {
        tx.validate().map_err(|e| ReportError::compute(subject(), e))?;
    }
    match ordering {
        OrderingMode::Sort => sort_chronologically(&mut transactions),
        OrderingMode::Verify => {
            ensure_chronological(&transactions).map_err(|e| ReportError::compute(subject(), e))?
        }
    }

    let opening = history
        .opening
        .opening_at(&transactions, window.start())
        .map_err(|e| ReportError::compute(subject(), e))?;
    let in_window: Vec<LedgerTransaction> = transactions
        .into_iter()
        .filter(|t| window.contains(t.occurred_at))
        .collect();

    let rows = try_compute_running(opening, in_window).map_err(|e| ReportError::compute(subject(), e))?;
    let closing = rows.last().map_or(opening, |r| r.running_balance);
    let totals =
        PeriodTotals::compute(&rows, granularity).map_err(|e| ReportError::compute(subject(), e))?;
    let (total_debit, total_credit) = column_totals(&rows).map_err(|e| ReportError::compute(subject(), e))?;

    tracing::info!(
        account = %history.name,
        rows = rows.len(),
        opening = %opening,
        closing = %closing,
        "ledger statement built"
    );

    Ok(LedgerStatement {
        account_id: history.account_id,
        name: history.name.clone(),
        window,
        opening,
        rows,
        totals,
        total_debit,
        total_credit,
        closing,
    })
}

fn column_totals(rows: &[RunningLedgerRow]) -> DomainResult<(Decimal, Decimal)> {
    rows.iter().try_fold((Decimal::ZERO, Decimal::ZERO), |(debit, credit), row| {
        Ok((
            checked(debit.checked_add(row.transaction.debit_amount), "total debit")?,
            checked(credit.checked_add(row.transaction.credit_amount), "total credit")?,
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ledgerbook_core::DomainError;
    use rust_decimal_macros::dec;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn history() -> AccountHistory {
        AccountHistory {
            account_id: None,
            name: "Madina Traders".to_string(),
            opening: AccountOpeningState::debit(dec!(1000)),
            transactions: vec![
                LedgerTransaction::debit(at(5, 10), dec!(50)),
                LedgerTransaction::credit(at(1, 10), dec!(200)),
                LedgerTransaction::debit(at(9, 23), dec!(5)),
                LedgerTransaction::credit(at(10, 0), dec!(1)),
            ],
        }
    }

    #[test]
    fn window_rejects_inverted_range() {
        assert!(ReportWindow::new(Some(date(5)), Some(date(4))).is_err());
        assert!(ReportWindow::new(Some(date(4)), Some(date(4))).is_ok());
    }

    #[test]
    fn window_end_date_is_inclusive_through_the_day() {
        let window = ReportWindow::new(Some(date(2)), Some(date(9))).unwrap();
        assert!(window.contains(at(9, 23)));
        assert!(!window.contains(at(10, 0)));
        assert!(!window.contains(at(1, 23)));
        assert!(ReportWindow::all_time().contains(at(1, 0)));
    }

    #[test]
    fn opening_carries_everything_before_the_window() {
        let window = ReportWindow::new(Some(date(2)), Some(date(9))).unwrap();
        let statement =
            build_statement(&history(), window, Granularity::Day, OrderingMode::Sort).unwrap();

        assert_eq!(statement.opening, dec!(800));
        let balances: Vec<_> = statement.rows.iter().map(|r| r.running_balance).collect();
        assert_eq!(balances, vec![dec!(850), dec!(855)]);
        assert_eq!(statement.closing, dec!(855));
        assert_eq!(statement.total_debit, dec!(55));
        assert_eq!(statement.total_credit, Decimal::ZERO);
    }

    #[test]
    fn empty_window_keeps_opening_as_closing() {
        let window = ReportWindow::new(Some(date(20)), None).unwrap();
        let statement =
            build_statement(&history(), window, Granularity::Month, OrderingMode::Sort).unwrap();
        assert!(statement.rows.is_empty());
        assert!(statement.totals.items.is_empty());
        assert_eq!(statement.opening, dec!(854));
        assert_eq!(statement.closing, dec!(854));
    }

    #[test]
    fn verify_mode_refuses_unsorted_history() {
        let err = build_statement(
            &history(),
            ReportWindow::all_time(),
            Granularity::Day,
            OrderingMode::Verify,
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::Compute { .. }));
        assert!(err.to_string().starts_with("could not compute ledger of Madina Traders"));
    }

    #[test]
    fn negative_amount_in_history_is_rejected() {
        let json = r#"{
            "name": "Madina Traders",
            "transactions": [
                {"occurred_at": "2024-01-03T10:00:00Z", "debit_amount": "-500"}
            ]
        }"#;
        let history: AccountHistory = serde_json::from_str(json).unwrap();
        let err = build_statement(&history, ReportWindow::all_time(), Granularity::Day, OrderingMode::Sort)
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::Compute {
                source: DomainError::InvalidInput(_),
                ..
            }
        ));
    }

    #[test]
    fn negative_amount_before_the_window_is_rejected() {
        let mut history = history();
        history
            .transactions
            .push(LedgerTransaction::credit(at(1, 8), dec!(-30)));
        let window = ReportWindow::new(Some(date(20)), None).unwrap();
        assert!(build_statement(&history, window, Granularity::Day, OrderingMode::Sort).is_err());
    }

    #[test]
    fn overflowing_balances_fail_instead_of_panicking() {
        let history = AccountHistory {
            account_id: None,
            name: "Vault".to_string(),
            opening: AccountOpeningState::debit(Decimal::MAX),
            transactions: vec![LedgerTransaction::debit(at(2, 9), dec!(1))],
        };
        let all_time = build_statement(&history, ReportWindow::all_time(), Granularity::Day, OrderingMode::Sort);
        assert!(matches!(all_time, Err(ReportError::Compute { .. })));

        let later = ReportWindow::new(Some(date(5)), None).unwrap();
        assert!(build_statement(&history, later, Granularity::Day, OrderingMode::Sort).is_err());
    }
}
