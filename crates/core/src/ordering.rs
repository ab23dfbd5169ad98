//! Chronological ordering helpers.
//!
//! The ledger engine and the period aggregator trust their callers to pass
//! chronological input. `ensure_chronological` is the optional precondition
//! check used by the `*_checked` entry points and by tests.

use chrono::{DateTime, Utc};

use crate::error::{DomainError, DomainResult};

/// Anything carrying a business timestamp.
pub trait Timestamped {
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// Fail with `OrderingViolation` at the first record dated before its predecessor.
///
/// Equal timestamps are allowed.
pub fn ensure_chronological<T: Timestamped>(items: &[T]) -> DomainResult<()> {
    match items
        .windows(2)
        .position(|pair| pair[1].occurred_at() < pair[0].occurred_at())
    {
        Some(pos) => Err(DomainError::ordering(pos + 1)),
        None => Ok(()),
    }
}

/// Stable sort by timestamp; records sharing a timestamp keep their input order.
pub fn sort_chronologically<T: Timestamped>(items: &mut [T]) {
    items.sort_by_key(|item| item.occurred_at());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone, PartialEq)]
    struct Stamp(DateTime<Utc>, &'static str);

    impl Timestamped for Stamp {
        fn occurred_at(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn accepts_sorted_and_equal_timestamps() {
        let items = vec![Stamp(day(1), "a"), Stamp(day(2), "b"), Stamp(day(2), "c")];
        assert!(ensure_chronological(&items).is_ok());
        assert!(ensure_chronological::<Stamp>(&[]).is_ok());
    }

    #[test]
    fn reports_first_out_of_order_index() {
        let items = vec![Stamp(day(1), "a"), Stamp(day(3), "b"), Stamp(day(2), "c")];
        assert_eq!(ensure_chronological(&items), Err(DomainError::ordering(2)));
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let mut items = vec![Stamp(day(2), "x"), Stamp(day(1), "a"), Stamp(day(2), "y")];
        sort_chronologically(&mut items);
        let labels: Vec<_> = items.iter().map(|s| s.1).collect();
        assert_eq!(labels, vec!["a", "x", "y"]);
    }
}
