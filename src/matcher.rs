use chrono::Duration;

use crate::models::Transaction;

/// Window inside which two equal amounts count as the same event.
pub const MATCH_WINDOW_DAYS: i64 = 2;

/// Fuzzy equality: exact amount, dates strictly less than two days apart.
///
/// Reflexive and symmetric, not transitive.
pub fn same_event(a: &Transaction, b: &Transaction) -> bool {
    if a.amount() != b.amount() {
        return false;
    }
    let gap = if a.date() >= b.date() {
        a.date() - b.date()
    } else {
        b.date() - a.date()
    };
    gap < Duration::days(MATCH_WINDOW_DAYS)
}

/// Candidates with no fuzzy match anywhere in `existing`, in input order.
pub fn new_transactions(candidates: &[Transaction], existing: &[Transaction]) -> Vec<Transaction> {
    candidates
        .iter()
        .filter(|c| !existing.iter().any(|e| same_event(c, e)))
        .cloned()
        .collect()
}
