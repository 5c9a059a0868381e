use chrono::NaiveDate;

use crate::cli::{transactions_table, KindArg};
use crate::error::Result;
use crate::models::NameIdPair;
use crate::sync::resolve_source;
use crate::ynab::{Ledger, Session, TransactionFilter};

fn print_pairs(pairs: &[NameIdPair], verbose: bool) {
    for pair in pairs {
        if verbose {
            println!("{} {}", pair.id, pair.name);
        } else {
            println!("{}", pair.name);
        }
    }
}

pub fn budgets<L: Ledger>(session: &Session<'_, L>, verbose: bool) -> Result<()> {
    print_pairs(&session.budgets()?, verbose);
    Ok(())
}

pub fn accounts<L: Ledger>(session: &Session<'_, L>, verbose: bool) -> Result<()> {
    print_pairs(&session.accounts()?, verbose);
    Ok(())
}

pub fn transactions<L: Ledger>(
    session: &Session<'_, L>,
    source: &str,
    since: Option<NaiveDate>,
    kind: Option<KindArg>,
    server_knowledge: Option<i64>,
) -> Result<()> {
    let filter = TransactionFilter {
        since_date: since,
        kind: kind.map(Into::into),
        last_knowledge_of_server: server_knowledge,
    };
    let transactions = resolve_source(session, source, &filter)?;
    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }
    println!("{}", transactions_table(&transactions));
    Ok(())
}
