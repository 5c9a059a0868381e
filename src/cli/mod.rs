pub mod list;
pub mod upload;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::fmt::money;
use crate::models::Transaction;
use crate::ynab::TransactionKind;

#[derive(Parser)]
#[command(name = "ynai", version, about = "Sync Venmo statement exports into YNAB.")]
pub struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Budget name to use instead of the default budget
    #[arg(short, long, global = true)]
    pub budget: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List budgets, accounts or transactions.
    List {
        #[command(subcommand)]
        command: ListCommands,
    },
    /// Upload Venmo transactions missing from a YNAB account.
    Upload {
        /// YNAB account name
        account: String,
        /// Venmo statement CSV
        source: String,
        /// Show what would be uploaded without uploading
        #[arg(short = 'n', long = "dry-run")]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
pub enum ListCommands {
    /// List budgets.
    Budgets,
    /// List accounts in the selected budget.
    Accounts,
    /// List transactions from a Venmo CSV, or from a YNAB account by name.
    Transactions {
        /// Venmo statement CSV or YNAB account name
        source: String,
        /// Only YNAB transactions on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,
        /// Only uncategorized or unapproved YNAB transactions
        #[arg(long = "type", value_enum)]
        kind: Option<KindArg>,
        /// Only YNAB transactions changed since this server knowledge value
        #[arg(long = "server-knowledge")]
        server_knowledge: Option<i64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum KindArg {
    Uncategorized,
    Unapproved,
}

impl From<KindArg> for TransactionKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Uncategorized => TransactionKind::Uncategorized,
            KindArg::Unapproved => TransactionKind::Unapproved,
        }
    }
}

pub(crate) fn transactions_table(transactions: &[Transaction]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Payee", "Memo", "Amount"]);
    for t in transactions {
        let amount = if t.amount() < 0 {
            money(t.amount()).red().to_string()
        } else {
            money(t.amount()).green().to_string()
        };
        table.add_row(vec![
            Cell::new(t.date().format("%Y-%m-%d %H:%M")),
            Cell::new(t.payee()),
            Cell::new(t.memo()),
            Cell::new(amount),
        ]);
    }
    table
}
