//! Running-balance engine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerbook_core::{DomainResult, Timestamped, checked, ensure_chronological};

use crate::transaction::LedgerTransaction;

/// A ledger transaction with the balance standing after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningLedgerRow {
    #[serde(flatten)]
    pub transaction: LedgerTransaction,
    pub running_balance: Decimal,
}

impl Timestamped for RunningLedgerRow {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.transaction.occurred_at
    }
}

/// Fold `transactions` left to right from `opening`.
///
/// Input must already be scoped to one account and in chronological order;
/// this is trusted, not checked (see [`compute_running_checked`]). Amounts are
/// not re-validated.
///
/// # Panics
///
/// Panics if a balance leaves the decimal range. Use [`try_compute_running`]
/// where that must surface as an error.
pub fn compute_running(opening: Decimal, transactions: Vec<LedgerTransaction>) -> Vec<RunningLedgerRow> {
    let mut balance = opening;
    let rows: Vec<RunningLedgerRow> = transactions
        .into_iter()
        .map(|transaction| {
            balance += transaction.debit_amount - transaction.credit_amount;
            RunningLedgerRow {
                transaction,
                running_balance: balance,
            }
        })
        .collect();

    tracing::debug!(rows = rows.len(), opening = %opening, closing = %balance, "running balance computed");
    rows
}

/// [`compute_running`] with overflow reported as `InvalidInput`.
pub fn try_compute_running(
    opening: Decimal,
    transactions: Vec<LedgerTransaction>,
) -> DomainResult<Vec<RunningLedgerRow>> {
    let mut balance = opening;
    let mut rows = Vec::with_capacity(transactions.len());

    for transaction in transactions {
        balance = checked(balance.checked_add(transaction.net()?), "running balance")?;
        rows.push(RunningLedgerRow {
            transaction,
            running_balance: balance,
        });
    }

    tracing::debug!(rows = rows.len(), opening = %opening, closing = %balance, "running balance computed");
    Ok(rows)
}

/// Like [`try_compute_running`], but also fails with `OrderingViolation` when
/// the input is not chronological.
pub fn compute_running_checked(
    opening: Decimal,
    transactions: Vec<LedgerTransaction>,
) -> DomainResult<Vec<RunningLedgerRow>> {
    ensure_chronological(&transactions)?;
    try_compute_running(opening, transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use ledgerbook_core::DomainError;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 9, 0, 0).unwrap()
    }

    #[test]
    fn party_ledger_scenario() {
        let rows = compute_running(
            dec!(500000),
            vec![
                LedgerTransaction::credit(day(1), dec!(100000)),
                LedgerTransaction::debit(day(2), dec!(150000)),
                LedgerTransaction::credit(day(2), dec!(7500)),
            ],
        );
        let balances: Vec<_> = rows.iter().map(|r| r.running_balance).collect();
        assert_eq!(balances, vec![dec!(400000), dec!(550000), dec!(542500)]);
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(compute_running(dec!(123.45), Vec::new()).is_empty());
    }

    #[test]
    fn pass_through_fields_survive() {
        let tx = LedgerTransaction::debit(day(1), dec!(10))
            .with_voucher("JV-7")
            .with_narrative("diesel")
            .with_extra("vehicle", serde_json::json!("LEB-1234"));
        let rows = compute_running(Decimal::ZERO, vec![tx.clone()]);
        assert_eq!(rows[0].transaction, tx);
    }

    #[test]
    fn row_serializes_flat() {
        let rows = compute_running(dec!(1), vec![LedgerTransaction::debit(day(1), dec!(2))]);
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["running_balance"], serde_json::json!("3"));
        assert_eq!(json["debit_amount"], serde_json::json!("2"));
    }

    #[test]
    fn checked_variant_rejects_out_of_order_input() {
        let txs = vec![
            LedgerTransaction::debit(day(2), dec!(1)),
            LedgerTransaction::debit(day(1), dec!(1)),
        ];
        assert_eq!(
            compute_running_checked(Decimal::ZERO, txs),
            Err(DomainError::ordering(1))
        );
    }

    #[test]
    fn balance_overflow_is_reported() {
        let txs = vec![LedgerTransaction::debit(day(1), dec!(1))];
        assert!(matches!(
            try_compute_running(Decimal::MAX, txs.clone()),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(compute_running_checked(Decimal::MAX, txs).is_err());
    }

    #[test]
    fn fallible_fold_matches_plain_fold() {
        let txs = vec![
            LedgerTransaction::credit(day(1), dec!(100000)),
            LedgerTransaction::debit(day(2), dec!(150000)),
        ];
        assert_eq!(
            try_compute_running(dec!(500000), txs.clone()).unwrap(),
            compute_running(dec!(500000), txs)
        );
    }

    fn arb_transactions() -> impl Strategy<Value = Vec<LedgerTransaction>> {
        prop::collection::vec((0i64..10_000_000, 0i64..10_000_000), 0..50).prop_map(|amounts| {
            amounts
                .into_iter()
                .enumerate()
                .map(|(i, (debit, credit))| {
                    LedgerTransaction::new(
                        day(1) + Duration::hours(i as i64),
                        Decimal::new(debit, 2),
                        Decimal::new(credit, 2),
                    )
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: running_balance[i] = opening + Σ_{j≤i}(debit_j − credit_j).
        #[test]
        fn running_balance_matches_direct_summation(
            opening in -1_000_000_000i64..1_000_000_000i64,
            txs in arb_transactions(),
        ) {
            let opening = Decimal::new(opening, 2);
            let rows = compute_running_checked(opening, txs.clone()).unwrap();
            prop_assert_eq!(rows.len(), txs.len());

            for (i, row) in rows.iter().enumerate() {
                let expected = opening
                    + txs[..=i].iter().map(|t| t.debit_amount).sum::<Decimal>()
                    - txs[..=i].iter().map(|t| t.credit_amount).sum::<Decimal>();
                prop_assert_eq!(row.running_balance, expected);
            }
        }
    }
}
