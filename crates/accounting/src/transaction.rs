use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use ledgerbook_core::{DomainResult, Timestamped, ValueObject, checked, ensure_non_negative};

/// One append-only ledger line of a single account.
///
/// `extra` carries user-defined columns through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub occurred_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voucher_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(default)]
    pub debit_amount: Decimal,
    #[serde(default)]
    pub credit_amount: Decimal,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, JsonValue>,
}

impl LedgerTransaction {
    pub fn new(occurred_at: DateTime<Utc>, debit_amount: Decimal, credit_amount: Decimal) -> Self {
        Self {
            occurred_at,
            voucher_ref: None,
            narrative: None,
            debit_amount,
            credit_amount,
            extra: BTreeMap::new(),
        }
    }

    pub fn debit(occurred_at: DateTime<Utc>, amount: Decimal) -> Self {
        Self::new(occurred_at, amount, Decimal::ZERO)
    }

    pub fn credit(occurred_at: DateTime<Utc>, amount: Decimal) -> Self {
        Self::new(occurred_at, Decimal::ZERO, amount)
    }

    pub fn with_voucher(mut self, voucher_ref: impl Into<String>) -> Self {
        self.voucher_ref = Some(voucher_ref.into());
        self
    }

    pub fn with_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narrative = Some(narrative.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Signed effect on the balance (debit positive).
    pub fn net(&self) -> DomainResult<Decimal> {
        checked(self.debit_amount.checked_sub(self.credit_amount), "transaction net")
    }

    /// Reject negative amounts. Normalizers call this; the engines trust it.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_non_negative(self.debit_amount, "debit_amount")?;
        ensure_non_negative(self.credit_amount, "credit_amount")?;
        Ok(())
    }
}

impl Timestamped for LedgerTransaction {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// Σ(debit − credit) over `transactions`.
pub fn net_movement<'a>(
    transactions: impl IntoIterator<Item = &'a LedgerTransaction>,
) -> DomainResult<Decimal> {
    transactions.into_iter().try_fold(Decimal::ZERO, |acc, t| {
        checked(acc.checked_add(t.net()?), "net movement")
    })
}

/// Balance an account carries from before its first transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOpeningState {
    #[serde(default)]
    pub opening_balance: Decimal,
    #[serde(default = "default_is_debit")]
    pub opening_is_debit: bool,
}

fn default_is_debit() -> bool {
    true
}

impl Default for AccountOpeningState {
    fn default() -> Self {
        Self {
            opening_balance: Decimal::ZERO,
            opening_is_debit: true,
        }
    }
}

impl ValueObject for AccountOpeningState {}

impl AccountOpeningState {
    pub fn debit(opening_balance: Decimal) -> Self {
        Self {
            opening_balance,
            opening_is_debit: true,
        }
    }

    pub fn credit(opening_balance: Decimal) -> Self {
        Self {
            opening_balance,
            opening_is_debit: false,
        }
    }

    /// Opening balance with its side applied (debit positive).
    pub fn signed(&self) -> Decimal {
        if self.opening_is_debit {
            self.opening_balance
        } else {
            -self.opening_balance
        }
    }

    /// Opening scalar for a report window starting at `window_start`.
    ///
    /// Adds the net of every transaction dated strictly before the window
    /// start. With no window start nothing precedes the window.
    pub fn opening_at(
        &self,
        transactions: &[LedgerTransaction],
        window_start: Option<DateTime<Utc>>,
    ) -> DomainResult<Decimal> {
        let Some(start) = window_start else {
            return Ok(self.signed());
        };
        let before = net_movement(transactions.iter().filter(|t| t.occurred_at < start))?;
        checked(self.signed().checked_add(before), "opening balance")
    }
}

/// Which side a signed balance stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceSide {
    #[serde(rename = "Dr")]
    Debit,
    #[serde(rename = "Cr")]
    Credit,
}

impl BalanceSide {
    /// Split a signed balance into (magnitude, side). Zero reads as debit.
    pub fn of(balance: Decimal) -> (Decimal, BalanceSide) {
        if balance < Decimal::ZERO {
            (-balance, BalanceSide::Credit)
        } else {
            (balance, BalanceSide::Debit)
        }
    }
}

impl core::fmt::Display for BalanceSide {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BalanceSide::Debit => f.write_str("Dr"),
            BalanceSide::Credit => f.write_str("Cr"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ledgerbook_core::DomainError;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn signed_opening_follows_side() {
        assert_eq!(AccountOpeningState::debit(dec!(500)).signed(), dec!(500));
        assert_eq!(AccountOpeningState::credit(dec!(500)).signed(), dec!(-500));
    }

    #[test]
    fn opening_at_window_start_includes_only_strictly_earlier_transactions() {
        let txs = vec![
            LedgerTransaction::debit(day(1), dec!(100)),
            LedgerTransaction::credit(day(2), dec!(30)),
            LedgerTransaction::debit(day(3), dec!(1000)),
        ];
        let state = AccountOpeningState::credit(dec!(50));

        let start = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        assert_eq!(state.opening_at(&txs, Some(start)), Ok(dec!(20)));
        // A transaction exactly at the window start belongs to the window.
        assert_eq!(state.opening_at(&txs, Some(day(3))), Ok(dec!(20)));
        assert_eq!(state.opening_at(&txs, None), Ok(dec!(-50)));
    }

    #[test]
    fn opening_overflow_is_an_error_not_a_panic() {
        let txs = vec![LedgerTransaction::debit(day(1), Decimal::MAX)];
        let err = AccountOpeningState::debit(dec!(1))
            .opening_at(&txs, Some(day(2)))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let both = vec![
            LedgerTransaction::debit(day(1), Decimal::MAX),
            LedgerTransaction::debit(day(1), Decimal::MAX),
        ];
        assert!(net_movement(&both).is_err());
    }

    #[test]
    fn negative_amounts_fail_validation() {
        assert!(LedgerTransaction::new(day(1), dec!(-1), dec!(0)).validate().is_err());
        assert!(LedgerTransaction::new(day(1), dec!(0), dec!(-1)).validate().is_err());
        assert!(LedgerTransaction::debit(day(1), dec!(1)).validate().is_ok());
    }

    #[test]
    fn balance_side_splits_sign() {
        assert_eq!(BalanceSide::of(dec!(-7.5)), (dec!(7.5), BalanceSide::Credit));
        assert_eq!(BalanceSide::of(dec!(0)), (dec!(0), BalanceSide::Debit));
        assert_eq!(BalanceSide::Credit.to_string(), "Cr");
    }

    #[test]
    fn missing_amounts_default_to_zero_and_extra_passes_through() {
        let json = r#"{"occurred_at":"2024-01-01T12:00:00Z","debit_amount":"10","extra":{"category":"fuel"}}"#;
        let tx: LedgerTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.credit_amount, Decimal::ZERO);
        assert_eq!(tx.extra.get("category"), Some(&JsonValue::from("fuel")));
    }
}
