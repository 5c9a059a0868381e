use std::io::Read;
use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, YnaiError};
use crate::models::Transaction;

// ---------------------------------------------------------------------------
// Field extraction
// ---------------------------------------------------------------------------

/// One raw record from a source, with an extractor per canonical field.
pub trait SourceRecord {
    fn date(&self) -> std::result::Result<NaiveDateTime, String>;
    fn payee(&self) -> String;
    fn memo(&self) -> String;
    fn amount(&self) -> std::result::Result<i64, String>;

    fn to_transaction(&self) -> std::result::Result<Transaction, String> {
        Ok(Transaction::new(self.date()?, self.payee(), self.memo(), self.amount()?))
    }
}

/// Strip `$`, spaces, commas and periods and read what is left as cents.
/// `"+ $1,500.00"` becomes `150000`.
pub fn parse_amount(raw: &str) -> std::result::Result<i64, String> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ' ' | ',' | '.'))
        .collect();
    digits
        .parse::<i64>()
        .map_err(|e| format!("invalid amount '{raw}': {e}"))
}

// ---------------------------------------------------------------------------
// Venmo statement parser
// ---------------------------------------------------------------------------

pub const VENMO_FIELD_COUNT: usize = 22;
const VENMO_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const VENMO_UTC_OFFSET_HOURS: i64 = 4;

/// A transaction row of a Venmo statement export, in column order.
#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct VenmoRecord {
    pub empty: String,
    pub id: String,
    pub datetime: String,
    pub kind: String,
    pub status: String,
    pub note: String,
    pub from: String,
    pub to: String,
    pub amount_total: String,
    pub amount_tip: String,
    pub amount_tax: String,
    pub amount_fee: String,
    pub tax_rate: String,
    pub tax_exempt: String,
    pub funding_source: String,
    pub destination: String,
    pub beginning_balance: String,
    pub ending_balance: String,
    pub statement_period_venmo_fees: String,
    pub terminal_location: String,
    pub year_to_date_venmo_fees: String,
    pub disclaimer: String,
}

impl SourceRecord for VenmoRecord {
    fn date(&self) -> std::result::Result<NaiveDateTime, String> {
        let stamp = NaiveDateTime::parse_from_str(self.datetime.trim(), VENMO_DATETIME_FORMAT)
            .map_err(|e| format!("invalid datetime '{}': {e}", self.datetime))?;
        Ok(stamp - Duration::hours(VENMO_UTC_OFFSET_HOURS))
    }

    /// A `+Charge` is money owed to the other side, so the counterparty is
    /// `to`; a `+Payment` was received from `from`. Outgoing rows flip both.
    fn payee(&self) -> String {
        let incoming = self.amount_total.trim_start().starts_with('+');
        if incoming ^ (self.kind == "Charge") {
            self.from.clone()
        } else {
            self.to.clone()
        }
    }

    fn memo(&self) -> String {
        self.note.clone()
    }

    fn amount(&self) -> std::result::Result<i64, String> {
        parse_amount(&self.amount_total)
    }
}

/// Parse a Venmo statement file. A missing file is reported as
/// [`YnaiError::SourceNotFound`] so callers can try another source.
pub fn parse_venmo_file(file_path: &Path) -> Result<Vec<Transaction>> {
    let file = std::fs::File::open(file_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => YnaiError::SourceNotFound(file_path.to_path_buf()),
        _ => YnaiError::Io(e),
    })?;
    parse_venmo(std::io::BufReader::new(file))
}

pub fn parse_venmo<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| YnaiError::Parse {
            record: format!("line {}", e.position().map_or(0, |p| p.line())),
            reason: e.to_string(),
        })?;
        let line = record.position().map_or(0, |p| p.line());
        let id = record.get(1).map(str::trim).unwrap_or("");
        if id.is_empty() || id == "ID" {
            debug!(line, "skipping non-transaction row");
            continue;
        }
        let located = |reason: String| YnaiError::Parse {
            record: format!("line {line}"),
            reason,
        };
        if record.len() != VENMO_FIELD_COUNT {
            return Err(located(format!(
                "expected {VENMO_FIELD_COUNT} fields, found {}",
                record.len()
            )));
        }
        let venmo: VenmoRecord = record
            .deserialize(None)
            .map_err(|e| located(e.to_string()))?;
        rows.push(venmo.to_transaction().map_err(located)?);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// YNAB transaction parser
// ---------------------------------------------------------------------------

/// A transaction as returned by the YNAB API. Fields this tool has no use
/// for are dropped during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct YnabRecord {
    pub id: String,
    pub date: String,
    /// Milliunits.
    pub amount: i64,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub payee_name: Option<String>,
}

impl SourceRecord for YnabRecord {
    fn date(&self) -> std::result::Result<NaiveDateTime, String> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map(|d| d.and_time(chrono::NaiveTime::MIN))
            .map_err(|e| format!("invalid date '{}': {e}", self.date))
    }

    fn payee(&self) -> String {
        self.payee_name.clone().unwrap_or_default()
    }

    fn memo(&self) -> String {
        self.memo.clone().unwrap_or_default()
    }

    /// Milliunits to cents, truncating toward zero.
    fn amount(&self) -> std::result::Result<i64, String> {
        Ok(self.amount / 10)
    }
}

pub fn from_ynab_records(records: &[YnabRecord]) -> Result<Vec<Transaction>> {
    records
        .iter()
        .map(|r| {
            r.to_transaction().map_err(|reason| YnaiError::Parse {
                record: format!("transaction {}", r.id),
                reason,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: &str = ",ID,Datetime,Type,Status,Note,From,To,Amount (total),Amount (tip),Amount (tax),Amount (fee),Tax Rate,Tax Exempt,Funding Source,Destination,Beginning Balance,Ending Balance,Statement Period Venmo Fees,Terminal Location,Year to Date Venmo Fees,Disclaimer";

    fn venmo_row(id: &str, datetime: &str, kind: &str, note: &str, total: &str) -> String {
        format!(
            ",{id},{datetime},{kind},Complete,{note},Christine Esposito,Ben Esposito,\"{total}\",,0,,0,,,Venmo balance,,,,Venmo,,"
        )
    }

    fn venmo(kind: &str, total: &str) -> VenmoRecord {
        let csv = venmo_row("1", "2023-03-03T20:35:12", kind, "note", total);
        parse_single(&csv)
    }

    fn parse_single(line: &str) -> VenmoRecord {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(line.as_bytes());
        rdr.records().next().unwrap().unwrap().deserialize(None).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("+ $150.00"), Ok(15000));
        assert_eq!(parse_amount("- $10.00"), Ok(-1000));
        assert_eq!(parse_amount("+ $1,500.25"), Ok(150025));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("ten dollars").is_err());
    }

    #[test]
    fn test_venmo_payee_charge_incoming_is_to() {
        assert_eq!(venmo("Charge", "+ $10.00").payee(), "Ben Esposito");
    }

    #[test]
    fn test_venmo_payee_payment_incoming_is_from() {
        assert_eq!(venmo("Payment", "+ $10.00").payee(), "Christine Esposito");
    }

    #[test]
    fn test_venmo_payee_charge_outgoing_is_from() {
        assert_eq!(venmo("Charge", "- $10.00").payee(), "Christine Esposito");
    }

    #[test]
    fn test_venmo_payee_payment_outgoing_is_to() {
        assert_eq!(venmo("Payment", "- $10.00").payee(), "Ben Esposito");
    }

    #[test]
    fn test_venmo_date_shifted_four_hours() {
        let expected = NaiveDate::from_ymd_opt(2023, 3, 3)
            .unwrap()
            .and_hms_opt(16, 35, 12)
            .unwrap();
        assert_eq!(venmo("Payment", "+ $1.00").date(), Ok(expected));
    }

    #[test]
    fn test_venmo_date_shift_crosses_midnight() {
        let csv = venmo_row("1", "2023-03-04T02:00:00", "Payment", "x", "+ $1.00");
        let expected = NaiveDate::from_ymd_opt(2023, 3, 3)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        assert_eq!(parse_single(&csv).date(), Ok(expected));
    }

    #[test]
    fn test_parse_venmo_skips_header_and_blank_ids() {
        let content = format!(
            "Account Statement - (@ben) ,,,,,,,,,,,,,,,,,,,,,\n\
             Account Activity,,,,,,,,,,,,,,,,,,,,,\n\
             {HEADER}\n\
             ,,,,,,,,,,,,,,,,$0.00,,,,,\n\
             {}\n\
             {}\n\
             ,,,,,,,,,,,,,,,,,$25.00,$0.00,,$0.00,Disclaimer text\n",
            venmo_row("3750611336113345566", "2023-03-03T20:35:12", "Payment", "Pizza", "+ $150.00"),
            venmo_row("3750611336113345567", "2023-03-05T10:00:00", "Charge", "Rent", "- $1,200.00"),
        );
        let rows = parse_venmo(content.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].memo(), "Pizza");
        assert_eq!(rows[0].amount(), 15000);
        assert_eq!(rows[0].payee(), "Christine Esposito");
        assert_eq!(rows[1].amount(), -120000);
        assert_eq!(rows[1].payee(), "Christine Esposito");
    }

    #[test]
    fn test_parse_venmo_header_only_is_empty() {
        let rows = parse_venmo(format!("{HEADER}\n").as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_venmo_wrong_field_count() {
        let content = format!("{HEADER}\n,123,2023-03-03T20:35:12,Payment,Complete\n");
        let err = parse_venmo(content.as_bytes()).unwrap_err();
        match err {
            YnaiError::Parse { record, reason } => {
                assert_eq!(record, "line 2");
                assert!(reason.contains("expected 22 fields"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_venmo_bad_amount_is_parse_error() {
        let content = venmo_row("1", "2023-03-03T20:35:12", "Payment", "x", "lots");
        let err = parse_venmo(content.as_bytes()).unwrap_err();
        assert!(matches!(err, YnaiError::Parse { .. }));
    }

    #[test]
    fn test_parse_venmo_invalid_utf8_is_parse_error() {
        let mut content = format!("{HEADER}\n").into_bytes();
        content.extend_from_slice(b",9,2023-03-03T20:35:12,Payment,Complete,");
        content.extend_from_slice(&[0xff, 0xfe]);
        content.extend_from_slice(
            b",Christine Esposito,Ben Esposito,+ $1.00,,0,,0,,,Venmo balance,,,,Venmo,,\n",
        );
        match parse_venmo(content.as_slice()).unwrap_err() {
            YnaiError::Parse { record, reason } => {
                assert!(record.starts_with("line"));
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_venmo_file_missing_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        match parse_venmo_file(&path).unwrap_err() {
            YnaiError::SourceNotFound(p) => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_venmo_file_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("venmo.csv");
        let content = format!(
            "{HEADER}\n{}\n",
            venmo_row("42", "2024-01-02T12:00:00", "Payment", "Lunch", "- $15.00")
        );
        std::fs::write(&path, content).unwrap();
        let rows = parse_venmo_file(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount(), -1500);
    }

    fn ynab(date: &str, amount: i64) -> YnabRecord {
        YnabRecord {
            id: "t-1".into(),
            date: date.into(),
            amount,
            memo: None,
            payee_name: Some("Grocer".into()),
        }
    }

    #[test]
    fn test_ynab_record_midnight_and_divided_amount() {
        let txns = from_ynab_records(&[ynab("2024-02-29", -15000)]).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(txns[0].date(), expected);
        assert_eq!(txns[0].amount(), -1500);
        assert_eq!(txns[0].payee(), "Grocer");
        assert_eq!(txns[0].memo(), "");
    }

    #[test]
    fn test_ynab_amount_truncates_toward_zero() {
        assert_eq!(ynab("2024-01-01", 12345).amount(), Ok(1234));
        assert_eq!(ynab("2024-01-01", -12345).amount(), Ok(-1234));
    }

    #[test]
    fn test_ynab_record_deserializes_api_shape() {
        let json = r#"{
            "id": "abc", "date": "2024-05-01", "amount": -42000, "memo": "tea",
            "cleared": "cleared", "approved": true, "flag_color": null,
            "account_id": "acc", "account_name": "Venmo", "payee_id": null,
            "payee_name": "Cafe", "category_id": null, "category_name": null,
            "transfer_account_id": null, "transfer_transaction_id": null,
            "matched_transaction_id": null, "import_id": null,
            "import_payee_name": null, "import_payee_name_original": null,
            "debt_transaction_type": null, "deleted": false, "subtransactions": []
        }"#;
        let record: YnabRecord = serde_json::from_str(json).unwrap();
        let txn = record.to_transaction().unwrap();
        assert_eq!(txn.amount(), -4200);
        assert_eq!(txn.memo(), "tea");
        assert_eq!(txn.payee(), "Cafe");
    }

    #[test]
    fn test_ynab_bad_date_names_record() {
        let err = from_ynab_records(&[ynab("05/01/2024", 1000)]).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Parse error at transaction t-1: invalid date '05/01/2024'"));
    }
}
