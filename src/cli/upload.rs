use std::path::Path;

use crate::cli::transactions_table;
use crate::error::Result;
use crate::sync;
use crate::ynab::{Ledger, Session};

pub fn run<L: Ledger>(session: &Session<'_, L>, account: &str, source: &str, dry_run: bool) -> Result<()> {
    let report = sync::upload(session, account, Path::new(source), dry_run)?;

    if report.transactions.is_empty() {
        println!("No transactions to upload");
        return Ok(());
    }

    let budget = &session.budget().name;
    if report.submitted {
        println!("Transactions uploaded to {account} ({budget}):");
    } else {
        println!("Dry run, transactions that would be uploaded to {account} ({budget}):");
    }
    println!("{}", transactions_table(&report.transactions));
    Ok(())
}
