//! Period aggregation (daybook / monthly statement totals).
//!
//! Each bucket shows its debit and credit sums plus the balance standing at
//! its end, which is the running balance of the last row falling into it.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use ledgerbook_core::{DomainError, DomainResult, ValueObject, checked, ensure_chronological};

use crate::running::RunningLedgerRow;

/// Bucket size for period totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Month,
}

impl core::fmt::Display for Granularity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Granularity::Day => f.write_str("day"),
            Granularity::Month => f.write_str("month"),
        }
    }
}

impl core::str::FromStr for Granularity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "month" => Ok(Granularity::Month),
            other => Err(DomainError::validation(format!(
                "unknown period granularity: {other} (expected day or month)"
            ))),
        }
    }
}

/// Calendar bucket a timestamp falls into (UTC calendar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodKey {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
}

impl ValueObject for PeriodKey {}

impl PeriodKey {
    pub fn of(at: DateTime<Utc>, granularity: Granularity) -> Self {
        let date = at.date_naive();
        match granularity {
            Granularity::Day => PeriodKey::Day(date),
            Granularity::Month => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }
}

impl core::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PeriodKey::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            PeriodKey::Month { year, month } => write!(f, "{year:04}-{month:02}"),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Totals of one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTotal {
    pub key: PeriodKey,
    pub debit_sum: Decimal,
    pub credit_sum: Decimal,
    pub closing_balance: Decimal,
}

impl ValueObject for PeriodTotal {}

/// Period totals together with the granularity they were computed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub granularity: Granularity,
    pub items: Vec<PeriodTotal>,
}

impl PeriodTotals {
    pub fn compute(rows: &[RunningLedgerRow], granularity: Granularity) -> DomainResult<Self> {
        Ok(Self {
            granularity,
            items: try_aggregate_periods(rows, granularity)?,
        })
    }

    pub fn get(&self, key: &PeriodKey) -> Option<&PeriodTotal> {
        self.items.iter().find(|t| &t.key == key)
    }
}

/// One `PeriodTotal` per distinct bucket, in first-seen order.
///
/// Closing balances are last-write-wins, so they are only meaningful for
/// chronological input (see [`aggregate_periods_checked`]).
///
/// # Panics
///
/// Panics if a bucket sum leaves the decimal range; [`try_aggregate_periods`]
/// reports that as an error instead.
pub fn aggregate_periods(rows: &[RunningLedgerRow], granularity: Granularity) -> Vec<PeriodTotal> {
    let mut totals: Vec<PeriodTotal> = Vec::new();
    let mut index: HashMap<PeriodKey, usize> = HashMap::new();

    for row in rows {
        let total = bucket(&mut totals, &mut index, PeriodKey::of(row.transaction.occurred_at, granularity));
        total.debit_sum += row.transaction.debit_amount;
        total.credit_sum += row.transaction.credit_amount;
        total.closing_balance = row.running_balance;
    }

    tracing::debug!(rows = rows.len(), buckets = totals.len(), %granularity, "period totals computed");
    totals
}

/// [`aggregate_periods`] with overflow reported as `InvalidInput`.
pub fn try_aggregate_periods(
    rows: &[RunningLedgerRow],
    granularity: Granularity,
) -> DomainResult<Vec<PeriodTotal>> {
    let mut totals: Vec<PeriodTotal> = Vec::new();
    let mut index: HashMap<PeriodKey, usize> = HashMap::new();

    for row in rows {
        let total = bucket(&mut totals, &mut index, PeriodKey::of(row.transaction.occurred_at, granularity));
        total.debit_sum = checked(total.debit_sum.checked_add(row.transaction.debit_amount), "period debit sum")?;
        total.credit_sum =
            checked(total.credit_sum.checked_add(row.transaction.credit_amount), "period credit sum")?;
        total.closing_balance = row.running_balance;
    }

    tracing::debug!(rows = rows.len(), buckets = totals.len(), %granularity, "period totals computed");
    Ok(totals)
}

fn bucket<'a>(
    totals: &'a mut Vec<PeriodTotal>,
    index: &mut HashMap<PeriodKey, usize>,
    key: PeriodKey,
) -> &'a mut PeriodTotal {
    let slot = *index.entry(key).or_insert_with(|| {
        totals.push(PeriodTotal {
            key,
            debit_sum: Decimal::ZERO,
            credit_sum: Decimal::ZERO,
            closing_balance: Decimal::ZERO,
        });
        totals.len() - 1
    });
    &mut totals[slot]
}

/// Like [`try_aggregate_periods`], but also fails with `OrderingViolation`
/// when the rows are not chronological.
pub fn aggregate_periods_checked(
    rows: &[RunningLedgerRow],
    granularity: Granularity,
) -> DomainResult<Vec<PeriodTotal>> {
    ensure_chronological(rows)?;
    try_aggregate_periods(rows, granularity)
}
