use chrono::NaiveDateTime;
use serde::Deserialize;

/// Source-agnostic transaction every importer normalizes into.
///
/// `amount` is in cents. YNAB milliunits are ten times that.
///
/// There is deliberately no `PartialEq`/`Hash` here: two transactions are
/// compared with [`crate::matcher::same_event`], which is not transitive.
#[derive(Debug, Clone)]
pub struct Transaction {
    date: NaiveDateTime,
    payee: String,
    memo: String,
    amount: i64,
}

impl Transaction {
    pub fn new(date: NaiveDateTime, payee: impl Into<String>, memo: impl Into<String>, amount: i64) -> Self {
        Self {
            date,
            payee: payee.into(),
            memo: memo.into(),
            amount,
        }
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    pub fn payee(&self) -> &str {
        &self.payee
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }
}

/// A budget or account as listed by YNAB.
#[derive(Debug, Clone, Deserialize)]
pub struct NameIdPair {
    pub name: String,
    pub id: String,
}

/// Linear scan for an exact name match.
pub fn resolve_name(items: &[NameIdPair], name: &str, kind: &'static str) -> crate::error::Result<String> {
    items
        .iter()
        .find(|item| item.name == name)
        .map(|item| item.id.clone())
        .ok_or_else(|| crate::error::YnaiError::UnknownName {
            kind,
            name: name.to_string(),
        })
}
