use std::path::Path;

use tracing::info;

use crate::error::{Result, YnaiError};
use crate::importer::parse_venmo_file;
use crate::matcher::new_transactions;
use crate::models::Transaction;
use crate::ynab::{Ledger, Session, TransactionFilter};

#[derive(Debug)]
pub struct UploadReport {
    /// Transactions that were (or with `dry_run`, would have been) uploaded.
    pub transactions: Vec<Transaction>,
    pub submitted: bool,
}

/// Upload the Venmo transactions from `source` that the YNAB account does
/// not already have.
pub fn upload<L: Ledger>(
    session: &Session<'_, L>,
    account: &str,
    source: &Path,
    dry_run: bool,
) -> Result<UploadReport> {
    let candidates = parse_venmo_file(source)?;
    let existing = session.account_transactions(account, &TransactionFilter::default())?;
    let fresh = new_transactions(&candidates, &existing);
    info!(
        parsed = candidates.len(),
        existing = existing.len(),
        new = fresh.len(),
        "matched source against ledger"
    );

    if fresh.is_empty() {
        return Ok(UploadReport {
            transactions: fresh,
            submitted: false,
        });
    }

    if !dry_run {
        session.submit(account, &fresh)?;
    }
    Ok(UploadReport {
        transactions: fresh,
        submitted: !dry_run,
    })
}

/// Read transactions from a Venmo file at `source`, or, when no such file
/// exists, from the YNAB account named `source`.
pub fn resolve_source<L: Ledger>(
    session: &Session<'_, L>,
    source: &str,
    filter: &TransactionFilter,
) -> Result<Vec<Transaction>> {
    match parse_venmo_file(Path::new(source)) {
        Err(YnaiError::SourceNotFound(_)) => {
            info!(source, "no such file, reading YNAB account instead");
            session.account_transactions(source, filter)
        }
        other => other,
    }
}
