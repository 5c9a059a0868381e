//! YNAB API access.
//!
//! [`Ledger`] is what the sync driver talks to. [`YnabClient`] implements it
//! over HTTP with a bearer token; tests substitute an in-memory ledger.
//! [`Session`] pairs a ledger with the selected budget and is passed
//! explicitly to everything that needs it.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::conversions::{to_wire, SaveTransactions};
use crate::error::{Result, YnaiError};
use crate::importer::{from_ynab_records, YnabRecord};
use crate::models::{resolve_name, NameIdPair, Transaction};

pub const DEFAULT_API_URL: &str = "https://api.ynab.com/v1";

// ---------------------------------------------------------------------------
// Query filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransactionKind {
    Uncategorized,
    Unapproved,
}

impl TransactionKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Uncategorized => "uncategorized",
            Self::Unapproved => "unapproved",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub since_date: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    pub last_knowledge_of_server: Option<i64>,
}

impl TransactionFilter {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(since) = self.since_date {
            params.push(("since_date", since.format("%Y-%m-%d").to_string()));
        }
        if let Some(kind) = self.kind {
            params.push(("type", kind.key().to_string()));
        }
        if let Some(knowledge) = self.last_knowledge_of_server {
            params.push(("last_knowledge_of_server", knowledge.to_string()));
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

pub trait Ledger {
    fn budgets(&self) -> Result<Vec<NameIdPair>>;
    fn accounts(&self, budget_id: &str) -> Result<Vec<NameIdPair>>;
    fn transactions(
        &self,
        budget_id: &str,
        account_id: Option<&str>,
        filter: &TransactionFilter,
    ) -> Result<Vec<YnabRecord>>;
    fn post_transactions(&self, budget_id: &str, payload: &SaveTransactions) -> Result<()>;
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct BudgetsData {
    budgets: Vec<NameIdPair>,
}

#[derive(Deserialize)]
struct AccountsData {
    accounts: Vec<NameIdPair>,
}

#[derive(Deserialize)]
struct TransactionsData {
    transactions: Vec<YnabRecord>,
}

pub struct YnabClient {
    http: Client,
    base_url: String,
    token: Zeroizing<String>,
}

impl YnabClient {
    /// Build a client and check the token against `GET /user`.
    pub fn connect(base_url: &str, token: Zeroizing<String>) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let client = Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        };
        let status = client
            .http
            .get(client.url("/user"))
            .bearer_auth(client.token.as_str())
            .send()?
            .status();
        if status != StatusCode::OK {
            debug!(%status, "token rejected");
            return Err(YnaiError::AuthenticationFailed);
        }
        Ok(client)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let envelope: Envelope<T> = self
            .http
            .get(&url)
            .bearer_auth(self.token.as_str())
            .query(query)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(envelope.data)
    }
}

pub fn transactions_path(budget_id: &str, account_id: Option<&str>) -> String {
    match account_id {
        Some(account_id) => format!("/budgets/{budget_id}/accounts/{account_id}/transactions"),
        None => format!("/budgets/{budget_id}/transactions"),
    }
}

impl Ledger for YnabClient {
    fn budgets(&self) -> Result<Vec<NameIdPair>> {
        Ok(self.get::<BudgetsData>("/budgets", &[])?.budgets)
    }

    fn accounts(&self, budget_id: &str) -> Result<Vec<NameIdPair>> {
        Ok(self
            .get::<AccountsData>(&format!("/budgets/{budget_id}/accounts"), &[])?
            .accounts)
    }

    fn transactions(
        &self,
        budget_id: &str,
        account_id: Option<&str>,
        filter: &TransactionFilter,
    ) -> Result<Vec<YnabRecord>> {
        let path = transactions_path(budget_id, account_id);
        Ok(self.get::<TransactionsData>(&path, &filter.query())?.transactions)
    }

    fn post_transactions(&self, budget_id: &str, payload: &SaveTransactions) -> Result<()> {
        let url = self.url(&transactions_path(budget_id, None));
        debug!(%url, count = payload.transactions.len(), "POST");
        self.http
            .post(&url)
            .bearer_auth(self.token.as_str())
            .json(payload)
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session<'a, L: Ledger> {
    ledger: &'a L,
    budget: NameIdPair,
}

impl<'a, L: Ledger> Session<'a, L> {
    /// Select `budget_name`, or the first budget when none is given.
    pub fn open(ledger: &'a L, budget_name: Option<&str>) -> Result<Self> {
        let budgets = ledger.budgets()?;
        let budget = match budget_name {
            Some(name) => NameIdPair {
                name: name.to_string(),
                id: resolve_name(&budgets, name, "budget")?,
            },
            None => budgets
                .into_iter()
                .next()
                .ok_or_else(|| YnaiError::Other("No budgets found for this token".to_string()))?,
        };
        info!(budget = %budget.name, id = %budget.id, "budget selected");
        Ok(Self { ledger, budget })
    }

    pub fn budget(&self) -> &NameIdPair {
        &self.budget
    }

    pub fn budgets(&self) -> Result<Vec<NameIdPair>> {
        self.ledger.budgets()
    }

    pub fn accounts(&self) -> Result<Vec<NameIdPair>> {
        self.ledger.accounts(&self.budget.id)
    }

    pub fn resolve_account(&self, account_name: &str) -> Result<String> {
        resolve_name(&self.accounts()?, account_name, "account")
    }

    pub fn account_transactions(
        &self,
        account_name: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        let account_id = self.resolve_account(account_name)?;
        let records = self
            .ledger
            .transactions(&self.budget.id, Some(&account_id), filter)?;
        info!(account = account_name, count = records.len(), "fetched ledger transactions");
        from_ynab_records(&records)
    }

    pub fn submit(&self, account_name: &str, transactions: &[Transaction]) -> Result<()> {
        if transactions.is_empty() {
            return Err(YnaiError::EmptyBatch);
        }
        let account_id = self.resolve_account(account_name)?;
        let payload = to_wire(&account_id, transactions)?;
        self.ledger.post_transactions(&self.budget.id, &payload)?;
        info!(account = account_name, count = transactions.len(), "submitted transactions");
        Ok(())
    }
}
