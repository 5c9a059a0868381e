use serde::Serialize;

use crate::error::{Result, YnaiError};
use crate::models::Transaction;

/// One transaction in the shape `POST /budgets/{id}/transactions` expects.
#[derive(Debug, Clone, Serialize)]
pub struct SaveTransaction {
    pub account_id: String,
    pub date: String,
    pub amount: i64,
    pub payee_name: String,
    pub memo: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveTransactions {
    pub transactions: Vec<SaveTransaction>,
}

/// Convert canonical transactions to a YNAB submission payload.
///
/// The date keeps only the calendar day and the amount goes from cents
/// back to milliunits. An empty batch is a caller error.
pub fn to_wire(account_id: &str, transactions: &[Transaction]) -> Result<SaveTransactions> {
    if transactions.is_empty() {
        return Err(YnaiError::EmptyBatch);
    }
    let transactions = transactions
        .iter()
        .map(|t| {
            let amount = t
                .amount()
                .checked_mul(10)
                .ok_or(YnaiError::AmountOverflow(t.amount()))?;
            Ok(SaveTransaction {
                account_id: account_id.to_string(),
                date: t.date().format("%Y-%m-%d").to_string(),
                amount,
                payee_name: t.payee().to_string(),
                memo: t.memo().to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(SaveTransactions { transactions })
}
