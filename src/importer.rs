use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::classifier::{Classifier, ClassifyInput, ACCEPT_THRESHOLD};
use crate::db::{InsertOutcome, Store};
use crate::enrich::{PayeeEnricher, PayeeQuery, CONFIDENCE_FLOOR};
use crate::error::{PennyError, Result};
use crate::models::{RawRow, TransactionRecord, TransactionType};
use crate::normalizer::Normalizer;
use crate::patterns;
use crate::payee::PayeeExtractor;

// ---------------------------------------------------------------------------
// Header mapping
// ---------------------------------------------------------------------------

const DATE_HEADERS: &[&str] = &[
    "date", "run date", "posting date", "posted date", "trade date", "transaction date",
];
const ACTION_HEADERS: &[&str] = &["action"];
const DESCRIPTION_HEADERS: &[&str] = &["description", "memo", "details", "payee"];
const AMOUNT_HEADERS: &[&str] = &["amount", "amount ($)", "amount (usd)", "amount usd"];
const ACCOUNT_HEADERS: &[&str] = &["account", "account name"];
const NUMBER_HEADERS: &[&str] = &["account number", "account #", "acct number"];
const SYMBOL_HEADERS: &[&str] = &["symbol", "ticker"];
const CURRENCY_HEADERS: &[&str] = &["currency"];

#[derive(Debug, Clone, Copy, Default)]
struct ColumnMap {
    date: usize,
    action: Option<usize>,
    description: Option<usize>,
    amount: usize,
    account: Option<usize>,
    number: Option<usize>,
    symbol: Option<usize>,
    currency: Option<usize>,
}

fn find_column(record: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    record.iter().position(|field| {
        let f = field.trim().to_lowercase();
        names.contains(&f.as_str())
    })
}

/// A header row is any row naming both a date column and an amount column;
/// bank exports love to precede it with account preambles and summaries.
fn map_header(record: &csv::StringRecord) -> Option<ColumnMap> {
    let date = find_column(record, DATE_HEADERS)?;
    let amount = find_column(record, AMOUNT_HEADERS)?;
    Some(ColumnMap {
        date,
        action: find_column(record, ACTION_HEADERS),
        description: find_column(record, DESCRIPTION_HEADERS),
        amount,
        account: find_column(record, ACCOUNT_HEADERS),
        number: find_column(record, NUMBER_HEADERS),
        symbol: find_column(record, SYMBOL_HEADERS),
        currency: find_column(record, CURRENCY_HEADERS),
    })
}

fn cell(record: &csv::StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").trim().to_string()
}

fn opt_cell(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.map(|i| cell(record, i)).filter(|v| !v.is_empty())
}

/// Read one export into raw rows via header discovery and column-name
/// synonyms, so checking, card and brokerage layouts all feed one reader.
pub fn read_rows(file_path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let mut columns: Option<ColumnMap> = None;
    let mut rows = Vec::new();

    for result in rdr.records() {
        let Ok(record) = result else { continue };
        let Some(cols) = columns else {
            columns = map_header(&record);
            continue;
        };

        let date = cell(&record, cols.date);
        if date.is_empty() {
            // preamble/summary filler, not a data row
            continue;
        }
        let action = cols
            .action
            .map(|i| cell(&record, i))
            .filter(|a| !a.is_empty())
            .or_else(|| cols.description.map(|i| cell(&record, i)))
            .unwrap_or_default();
        let description = cols.description.map(|i| cell(&record, i)).unwrap_or_default();

        rows.push(RawRow {
            date,
            action,
            description,
            amount: cell(&record, cols.amount),
            account: opt_cell(&record, cols.account),
            account_number: opt_cell(&record, cols.number),
            symbol: opt_cell(&record, cols.symbol),
            currency: opt_cell(&record, cols.currency),
        });
    }

    if columns.is_none() {
        return Err(PennyError::NoHeader(file_path.display().to_string()));
    }
    Ok(rows)
}

fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

// ---------------------------------------------------------------------------
// import_file
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct IngestReport {
    pub imported: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub errors: usize,
    pub duplicate_file: bool,
}

impl IngestReport {
    /// A file counts as processed when something was ingested, or when every
    /// row turned out to be a clean duplicate with zero true errors. Anything
    /// else stays eligible for retry on the next scan.
    pub fn processed(&self) -> bool {
        self.imported > 0 || (self.duplicates > 0 && self.errors == 0)
    }
}

pub fn import_file(
    store: &Store,
    catalog: &Catalog,
    file_path: &Path,
    account_override: Option<&str>,
    enricher: Option<&dyn PayeeEnricher>,
) -> Result<IngestReport> {
    let checksum = compute_checksum(file_path)?;
    if store.file_already_imported(&checksum)? {
        return Ok(IngestReport {
            duplicate_file: true,
            ..IngestReport::default()
        });
    }

    let raw_rows = read_rows(file_path)?;
    let normalizer = Normalizer::new(catalog);
    let extractor = PayeeExtractor::new(catalog);
    let classifier = Classifier::new(catalog);

    let mut report = IngestReport::default();
    let mut records: Vec<TransactionRecord> = Vec::with_capacity(raw_rows.len());

    for raw in &raw_rows {
        match normalizer.normalize(raw, file_path) {
            Ok(mut rec) => {
                if let Some(account) = account_override {
                    rec.account = account.to_string();
                }
                if rec.allows_payee() {
                    rec.payee = extractor.extract(&rec.action, &rec.description);
                }
                records.push(rec);
            }
            Err(reason) if reason.is_error() => {
                report.errors += 1;
                warn!(file = %file_path.display(), %reason, "row skipped");
            }
            Err(reason) => {
                report.skipped += 1;
                debug!(file = %file_path.display(), %reason, "row dropped");
            }
        }
    }

    if let Some(enricher) = enricher {
        apply_enrichment(&mut records, enricher);
    }

    for rec in &mut records {
        classify_record(store, catalog, &classifier, rec);

        let account_id = store.get_or_create_account(&rec.account, &rec.account_number)?;
        match store.insert_transaction(account_id, rec)? {
            InsertOutcome::Duplicate => report.duplicates += 1,
            InsertOutcome::Inserted(_) => {
                report.imported += 1;
                feed_back(store, catalog, rec);
            }
        }
    }

    store.record_import(
        &file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        &checksum,
        report.imported,
        report.duplicates,
        report.skipped,
        report.errors,
        report.processed(),
    )?;

    info!(
        file = %file_path.display(),
        imported = report.imported,
        duplicates = report.duplicates,
        skipped = report.skipped,
        errors = report.errors,
        "import finished"
    );
    Ok(report)
}

/// One batched call per file for rows the structural cascade could not
/// resolve; answers below the floor are discarded.
fn apply_enrichment(records: &mut [TransactionRecord], enricher: &dyn PayeeEnricher) {
    let unresolved: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.payee.is_none() && r.allows_payee())
        .map(|(i, _)| i)
        .collect();
    if unresolved.is_empty() {
        return;
    }

    let batch: Vec<PayeeQuery> = unresolved
        .iter()
        .map(|&i| PayeeQuery {
            action: records[i].action.clone(),
            description: records[i].description.clone(),
            amount: records[i].amount,
        })
        .collect();

    match enricher.suggest(&batch) {
        Ok(answers) => {
            for (&i, answer) in unresolved.iter().zip(answers.iter()) {
                if answer.confidence >= CONFIDENCE_FLOOR {
                    if let Some(payee) = &answer.payee {
                        debug!(payee = %payee, explanation = %answer.explanation, "payee enriched");
                        records[i].payee = Some(payee.clone());
                    }
                }
            }
        }
        Err(e) => warn!(error = %e, "payee enrichment failed; continuing without it"),
    }
}

/// Fast path first, cascade second. Pattern-store trouble is a warning, not
/// a failed row: classification always completes.
fn classify_record(store: &Store, catalog: &Catalog, classifier: &Classifier, rec: &mut TransactionRecord) {
    let pattern_hit = match patterns::find(store, &rec.description, &rec.action, rec.payee.as_deref()) {
        Ok(hit) => hit,
        Err(e) => {
            warn!(error = %e, "pattern lookup failed; falling back to cascade");
            None
        }
    };

    if let Some(hit) = pattern_hit {
        rec.category_id = Some(hit.category_id);
        rec.subcategory_id = hit.subcategory_id;
        rec.confidence = hit.confidence;
        rec.review_needed = hit.confidence < ACCEPT_THRESHOLD;
        return;
    }

    let suggestion = classifier.classify(&ClassifyInput {
        description: &rec.description,
        action: &rec.action,
        amount: rec.amount,
        payee: rec.payee.as_deref(),
        txn_type: rec.txn_type,
    });

    match resolve_ids(store, suggestion.category, suggestion.subcategory) {
        Ok((category_id, subcategory_id)) => {
            rec.category_id = Some(category_id);
            rec.subcategory_id = Some(subcategory_id);
        }
        Err(e) => warn!(error = %e, "could not resolve taxonomy ids"),
    }
    rec.confidence = suggestion.confidence;
    rec.review_needed = suggestion.confidence < ACCEPT_THRESHOLD;
}

fn resolve_ids(store: &Store, category: &str, subcategory: &str) -> Result<(i64, i64)> {
    let category_id = store.get_or_create_category(category)?;
    let subcategory_id = store.get_or_create_subcategory(category_id, subcategory)?;
    Ok((category_id, subcategory_id))
}

/// Feedback loop: a committed, confidently classified row teaches the
/// pattern store its distinguishing substrings.
fn feed_back(store: &Store, catalog: &Catalog, rec: &TransactionRecord) {
    if rec.review_needed || rec.confidence < ACCEPT_THRESHOLD {
        return;
    }
    let Some(category_id) = rec.category_id else { return };
    if let Err(e) = patterns::extract_and_learn(
        store,
        catalog,
        &rec.description,
        &rec.action,
        category_id,
        rec.subcategory_id,
        rec.confidence,
    ) {
        warn!(error = %e, "pattern learning failed");
    }
}

// ---------------------------------------------------------------------------
// Reclassification of stored rows
// ---------------------------------------------------------------------------

pub struct ReclassifyStats {
    pub classified: usize,
    pub still_review: usize,
}

/// Re-run the fast path + cascade over rows that never cleared the
/// acceptance threshold, typically after new patterns have been learned.
pub fn reclassify_pending(store: &Store, catalog: &Catalog) -> Result<ReclassifyStats> {
    let classifier = Classifier::new(catalog);

    let pending: Vec<(i64, String, String, f64, Option<String>, String)> = {
        let mut stmt = store.conn().prepare(
            "SELECT id, description, action, amount, payee, txn_type FROM transactions \
             WHERE review_needed = 1 OR category_id IS NULL",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows
    };

    let mut stats = ReclassifyStats { classified: 0, still_review: 0 };

    for (id, description, action, amount, payee, type_key) in &pending {
        let mut rec_like = TransactionRecord {
            date: chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default(),
            account: String::new(),
            account_number: String::new(),
            action: action.clone(),
            description: description.clone(),
            amount: *amount,
            currency: String::new(),
            symbol: None,
            payee: payee.clone(),
            txn_type: TransactionType::from_key(type_key),
            category_id: None,
            subcategory_id: None,
            confidence: 0.0,
            review_needed: true,
            source_file: String::new(),
            dedup_hash: String::new(),
        };
        classify_record(store, catalog, &classifier, &mut rec_like);

        store.conn().execute(
            "UPDATE transactions SET category_id = ?1, subcategory_id = ?2, confidence = ?3, \
             review_needed = ?4 WHERE id = ?5",
            rusqlite::params![
                rec_like.category_id,
                rec_like.subcategory_id,
                rec_like.confidence,
                rec_like.review_needed as i64,
                id,
            ],
        )?;

        if rec_like.review_needed {
            stats.still_review += 1;
        } else {
            stats.classified += 1;
            feed_back(store, catalog, &rec_like);
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(&dir.path().join("test.db")).unwrap();
        store.init().unwrap();
        (dir, store)
    }

    fn write_bank_csv(dir: &Path, name: &str, rows: &[(&str, &str, &str)]) -> PathBuf {
        let path = dir.join(name);
        let mut content = String::from("Account Summary as of 07/31/2025\n\nDate,Description,Amount,Running Bal.\n");
        for (date, desc, amount) in rows {
            content.push_str(&format!("{date},\"{desc}\",{amount},0.00\n"));
        }
        std::fs::write(&path, &content).unwrap();
        path
    }

    fn write_brokerage_csv(dir: &Path, name: &str, rows: &[(&str, &str, &str, &str)]) -> PathBuf {
        let path = dir.join(name);
        let mut content = String::from("Run Date,Action,Symbol,Description,Amount ($)\n");
        for (date, action, symbol, amount) in rows {
            content.push_str(&format!("{date},\"{action}\",{symbol},{action},{amount}\n"));
        }
        std::fs::write(&path, &content).unwrap();
        path
    }

    #[test]
    fn test_read_rows_discovers_header_after_preamble() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_bank_csv(dir.path(), "Export_1425.csv", &[
            ("07/30/2025", "CHECK 1042", "-120.00"),
        ]);
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "07/30/2025");
        assert_eq!(rows[0].action, "CHECK 1042");
        assert_eq!(rows[0].amount, "-120.00");
    }

    #[test]
    fn test_read_rows_no_header_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.csv");
        std::fs::write(&path, "one,two\nthree,four\n").unwrap();
        assert!(matches!(read_rows(&path), Err(PennyError::NoHeader(_))));
    }

    #[test]
    fn test_import_classifies_and_counts() {
        let (_dir, store) = test_store();
        let catalog = Catalog::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_bank_csv(dir.path(), "Export_1425.csv", &[
            ("07/30/2025", "DEBIT CARD PURCHASE MCDONALD'S F18095 MANASSAS VA", "-8.42"),
            ("07/30/2025", "DIRECT DEBIT STATE FARM RO SFPP (Cash)", "-141.27"),
        ]);
        let report = import_file(&store, &catalog, &path, None, None).unwrap();
        assert_eq!(report.imported, 2);
        assert_eq!(report.errors, 0);
        assert!(report.processed());

        let (payee, cat, sub): (String, String, String) = store
            .conn()
            .query_row(
                "SELECT t.payee, c.name, s.name FROM transactions t \
                 JOIN categories c ON t.category_id = c.id \
                 JOIN subcategories s ON t.subcategory_id = s.id \
                 WHERE t.payee = 'McDonald''s'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(payee, "McDonald's");
        assert_eq!(cat, "Food & Dining");
        assert_eq!(sub, "Fast Food");

        let (payee, cat, sub): (String, String, String) = store
            .conn()
            .query_row(
                "SELECT t.payee, c.name, s.name FROM transactions t \
                 JOIN categories c ON t.category_id = c.id \
                 JOIN subcategories s ON t.subcategory_id = s.id \
                 WHERE t.payee = 'State Farm'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(payee, "State Farm");
        assert_eq!(cat, "Insurance");
        assert_eq!(sub, "Auto");
    }

    #[test]
    fn test_reimport_is_idempotent() {
        let (_dir, store) = test_store();
        let catalog = Catalog::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_bank_csv(dir.path(), "Export_1425.csv", &[
            ("07/30/2025", "CHECK 1042", "-120.00"),
            ("07/31/2025", "ATM WITHDRAWAL 00423", "-60.00"),
        ]);
        let first = import_file(&store, &catalog, &path, None, None).unwrap();
        assert_eq!(first.imported, 2);

        // byte-identical file short-circuits on the whole-file checksum
        let second = import_file(&store, &catalog, &path, None, None).unwrap();
        assert!(second.duplicate_file);
        assert_eq!(second.imported, 0);

        let count: i64 = store
            .conn()
            .query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_row_dedup_across_date_formats() {
        let (_dir, store) = test_store();
        let catalog = Catalog::default();
        let dir = tempfile::tempdir().unwrap();
        // same logical transactions, different file bytes and date formats
        let a = write_bank_csv(dir.path(), "july_a_1425.csv", &[
            ("07/30/2025", "CHECK 1042", "-120.00"),
        ]);
        let b = write_bank_csv(dir.path(), "july_b_1425.csv", &[
            ("7/30/25", "CHECK 1042", "-120.00"),
        ]);
        let first = import_file(&store, &catalog, &a, None, None).unwrap();
        assert_eq!(first.imported, 1);
        let second = import_file(&store, &catalog, &b, None, None).unwrap();
        assert!(!second.duplicate_file);
        assert_eq!(second.imported, 0);
        assert_eq!(second.duplicates, 1);
        assert!(second.processed());

        let count: i64 = store
            .conn()
            .query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_bad_rows_do_not_abort_batch() {
        let (_dir, store) = test_store();
        let catalog = Catalog::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_bank_csv(dir.path(), "Export_1425.csv", &[
            ("garbage", "CHECK 1042", "-120.00"),
            ("07/30/2025", "CHECK 1043", ""),
            ("07/31/2025", "ATM WITHDRAWAL", "-60.00"),
        ]);
        let report = import_file(&store, &catalog, &path, None, None).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.errors, 2);
        assert!(report.processed());
    }

    #[test]
    fn test_pending_rows_dropped_without_error() {
        let (_dir, store) = test_store();
        let catalog = Catalog::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_bank_csv(dir.path(), "Export_1425.csv", &[
            ("07/31/2025", "PENDING DEBIT CARD PURCHASE WAWA 998", "-12.00"),
            ("07/30/2025", "CHECK 1042", "-120.00"),
        ]);
        let report = import_file(&store, &catalog, &path, None, None).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.errors, 0);
        let count: i64 = store
            .conn()
            .query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_brokerage_rows_have_no_payee() {
        let (_dir, store) = test_store();
        let catalog = Catalog::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_brokerage_csv(dir.path(), "Brokerage_7731.csv", &[
            ("07/30/2025", "DIVIDEND RECEIVED VANGUARD TOTAL MKT", "VTI", "12.33"),
            ("07/30/2025", "YOU BOUGHT VANGUARD TOTAL MKT", "VTI", "-500.00"),
        ]);
        let report = import_file(&store, &catalog, &path, None, None).unwrap();
        assert_eq!(report.imported, 2);

        let payees: Vec<Option<String>> = store
            .conn()
            .prepare("SELECT payee FROM transactions")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert!(payees.iter().all(|p| p.is_none()));

        let (cat, sub, confidence): (String, String, f64) = store
            .conn()
            .query_row(
                "SELECT c.name, s.name, t.confidence FROM transactions t \
                 JOIN categories c ON t.category_id = c.id \
                 JOIN subcategories s ON t.subcategory_id = s.id \
                 WHERE t.txn_type = 'dividend'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(cat, "Investment");
        assert_eq!(sub, "Dividend");
        assert_eq!(confidence, 0.95);
    }

    #[test]
    fn test_unclassifiable_row_lands_in_miscellaneous() {
        let (_dir, store) = test_store();
        let catalog = Catalog::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_bank_csv(dir.path(), "Export_1425.csv", &[
            ("07/30/2025", "zzqx 4411", "-45.00"),
        ]);
        import_file(&store, &catalog, &path, None, None).unwrap();
        let (cat, sub, confidence, review): (String, String, f64, i64) = store
            .conn()
            .query_row(
                "SELECT c.name, s.name, t.confidence, t.review_needed FROM transactions t \
                 JOIN categories c ON t.category_id = c.id \
                 JOIN subcategories s ON t.subcategory_id = s.id",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
            )
            .unwrap();
        assert_eq!(cat, "Miscellaneous");
        assert_eq!(sub, "Other");
        assert_eq!(confidence, 0.2);
        assert_eq!(review, 1);
    }

    #[test]
    fn test_learned_pattern_takes_fast_path() {
        let (_dir, store) = test_store();
        let catalog = Catalog::default();
        let travel = store.get_or_create_category("Travel").unwrap();
        let hotels = store.get_or_create_subcategory(travel, "Hotels").unwrap();
        patterns::learn(&store, "zzqx resorts", crate::models::PatternScope::Both, travel, Some(hotels), 0.92)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = write_bank_csv(dir.path(), "Export_1425.csv", &[
            ("07/30/2025", "zzqx resorts folio 8841", "-310.00"),
        ]);
        import_file(&store, &catalog, &path, None, None).unwrap();

        let (cat_id, confidence, review): (i64, f64, i64) = store
            .conn()
            .query_row(
                "SELECT category_id, confidence, review_needed FROM transactions",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(cat_id, travel);
        assert_eq!(confidence, 0.92);
        assert_eq!(review, 0);
    }

    #[test]
    fn test_high_confidence_import_learns_patterns() {
        let (_dir, store) = test_store();
        let catalog = Catalog::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_bank_csv(dir.path(), "Export_1425.csv", &[
            ("07/30/2025", "DEBIT CARD PURCHASE MCDONALD'S F18095 MANASSAS VA", "-8.42"),
        ]);
        import_file(&store, &catalog, &path, None, None).unwrap();
        let count: i64 = store
            .conn()
            .query_row("SELECT count(*) FROM patterns", [], |r| r.get(0))
            .unwrap();
        assert!(count > 0, "confident classifications must feed the pattern store");
    }

    #[test]
    fn test_enricher_fills_unresolved_payees() {
        use crate::enrich::testing::FixtureEnricher;
        let (_dir, store) = test_store();
        let catalog = Catalog::default();
        let enricher = FixtureEnricher {
            answers: vec![
                ("zzqx", "Zzqx Services", 0.9),
                ("lowconf", "Should Not Apply", 0.5),
            ],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = write_bank_csv(dir.path(), "Export_1425.csv", &[
            ("07/30/2025", "zzqx monthly svc 4411", "-45.00"),
            ("07/30/2025", "lowconf monthly svc 9921", "-46.00"),
        ]);
        import_file(&store, &catalog, &path, None, Some(&enricher)).unwrap();

        let payees: Vec<Option<String>> = store
            .conn()
            .prepare("SELECT payee FROM transactions ORDER BY amount DESC")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(payees[0].as_deref(), Some("Zzqx Services"));
        assert_eq!(payees[1], None, "below-floor suggestions are discarded");
    }

    #[test]
    fn test_account_override_wins() {
        let (_dir, store) = test_store();
        let catalog = Catalog::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_bank_csv(dir.path(), "Export_9999.csv", &[
            ("07/30/2025", "CHECK 1042", "-120.00"),
        ]);
        import_file(&store, &catalog, &path, Some("Side Checking"), None).unwrap();
        let name: String = store
            .conn()
            .query_row(
                "SELECT a.name FROM transactions t JOIN accounts a ON t.account_id = a.id",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(name, "Side Checking");
    }

    #[test]
    fn test_reclassify_pending_after_learning() {
        let (_dir, store) = test_store();
        let catalog = Catalog::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_bank_csv(dir.path(), "Export_1425.csv", &[
            ("07/30/2025", "zzqx resorts folio 8841", "-310.00"),
        ]);
        import_file(&store, &catalog, &path, None, None).unwrap();
        let review: i64 = store
            .conn()
            .query_row("SELECT review_needed FROM transactions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(review, 1);

        // a manual confirmation elsewhere taught the store this merchant
        let travel = store.get_or_create_category("Travel").unwrap();
        let hotels = store.get_or_create_subcategory(travel, "Hotels").unwrap();
        patterns::learn(&store, "zzqx resorts", crate::models::PatternScope::Both, travel, Some(hotels), 0.92)
            .unwrap();

        let stats = reclassify_pending(&store, &catalog).unwrap();
        assert_eq!(stats.classified, 1);
        assert_eq!(stats.still_review, 0);

        let (cat_id, review): (i64, i64) = store
            .conn()
            .query_row(
                "SELECT category_id, review_needed FROM transactions",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(cat_id, travel);
        assert_eq!(review, 0);
    }
}
