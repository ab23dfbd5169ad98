//! Value object trait: equality by value, not identity.
//!
//! Everything the engines derive (valuation summaries, period totals, opening
//! states) is a value object: it has no identity and is recomputed from source
//! on every read rather than stored and mutated.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Two summaries
/// computed from the same movement history are equal, whichever call produced
/// them; that is what makes recompute-on-read safe to cache at the edge.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct PeriodTotal { key: PeriodKey, debit: Decimal, credit: Decimal, closing: Decimal }
///
/// impl ValueObject for PeriodTotal {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {
    /// Whether `self` and `other` describe the same value.
    fn same_value_as(&self, other: &Self) -> bool {
        self == other
    }
}
