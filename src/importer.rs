use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;

use rusqlite::Connection;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{Result, TallyError};
use crate::models::{
    Category, NewCategory, NewTransaction, StagedTransaction, Transaction, TransactionType,
};
use crate::store::{CategoryStore, SqliteStore, TransactionStore};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a value cell: an optional `-`, an optional `$`, then a number whose
/// integer part may use comma thousands groups (`1,200.50`). Anything else is
/// rejected.
pub fn parse_value(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let (sign, s) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let s = s.strip_prefix('$').unwrap_or(s);
    let (int_part, frac) = match s.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (s, None),
    };

    let digits = if int_part.contains(',') {
        let mut groups = int_part.split(',');
        let lead = groups.next()?;
        if lead.is_empty() || lead.len() > 3 || !groups.all(|g| g.len() == 3) {
            return None;
        }
        int_part.replace(',', "")
    } else {
        int_part.to_string()
    };

    let mut number = format!("{sign}{digits}");
    if let Some(frac) = frac {
        number.push('.');
        number.push_str(frac);
    }
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

// ---------------------------------------------------------------------------
// Parse & stage
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ParsedFile {
    pub staged: Vec<StagedTransaction>,
    pub skipped: usize,
}

/// Drain the whole CSV stream into staged rows. The first physical line is
/// the header and is always discarded, even when blank; rows with an empty
/// title, type or value are dropped.
pub fn read_rows<R: BufRead>(mut reader: R) -> Result<ParsedFile> {
    let mut header = Vec::new();
    reader.read_until(b'\n', &mut header)?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut staged = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.records() {
        let record = result?;
        // +1 for the header consumed above
        let line = record.position().map_or(0, |p| p.line()) + 1;
        match stage_record(&record, line)? {
            Some(row) => staged.push(row),
            None => {
                debug!(line, "dropping row with empty title, type or value");
                skipped += 1;
            }
        }
    }
    Ok(ParsedFile { staged, skipped })
}

fn stage_record(record: &csv::StringRecord, line: u64) -> Result<Option<StagedTransaction>> {
    let cell = |i: usize| record.get(i).unwrap_or("");
    let (title, kind, value, category) = (cell(0), cell(1), cell(2), cell(3));
    if title.is_empty() || kind.is_empty() || value.is_empty() {
        return Ok(None);
    }
    let kind = kind.parse::<TransactionType>().map_err(|_| TallyError::InvalidType {
        line,
        value: kind.to_string(),
    })?;
    let value = parse_value(value).ok_or_else(|| TallyError::InvalidValue {
        line,
        value: value.to_string(),
    })?;
    Ok(Some(StagedTransaction {
        title: title.to_string(),
        kind,
        value,
        category: category.to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Reconcile & persist
// ---------------------------------------------------------------------------

/// Titles in `seen` with no match in `existing`, deduplicated, first occurrence first.
pub fn missing_titles<'a>(seen: &[&'a str], existing: &[Category]) -> Vec<&'a str> {
    let known: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();
    let mut emitted = HashSet::new();
    seen.iter()
        .copied()
        .filter(|title| !known.contains(title) && emitted.insert(*title))
        .collect()
}

#[derive(Debug)]
pub struct Persisted {
    pub transactions: Vec<Transaction>,
    pub created_categories: Vec<Category>,
}

/// Resolve every staged row's category, creating the missing ones, then save
/// the transactions. The store decides whether both writes are atomic.
pub fn persist_staged<S>(store: &S, staged: &[StagedTransaction], import_id: Option<i64>) -> Result<Persisted>
where
    S: CategoryStore + TransactionStore,
{
    let seen: Vec<&str> = staged.iter().map(|s| s.category.as_str()).collect();
    let mut lookup = seen.clone();
    lookup.sort_unstable();
    lookup.dedup();
    let existing = store.find_by_titles(&lookup)?;

    let new_categories: Vec<NewCategory> = missing_titles(&seen, &existing)
        .into_iter()
        .map(|title| NewCategory { title: title.to_string() })
        .collect();
    let created = store.insert_categories(&new_categories)?;
    info!(existing = existing.len(), created = created.len(), "reconciled categories");

    let by_title: HashMap<&str, &Category> = created
        .iter()
        .chain(existing.iter())
        .map(|c| (c.title.as_str(), c))
        .collect();

    let new_transactions = staged
        .iter()
        .map(|s| {
            let category = by_title
                .get(s.category.as_str())
                .copied()
                .ok_or_else(|| TallyError::UnresolvedCategory(s.category.clone()))?;
            Ok(NewTransaction {
                title: &s.title,
                kind: s.kind,
                value: s.value,
                category,
                import_id,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let transactions = store.insert_transactions(&new_transactions)?;
    info!(count = transactions.len(), "saved transactions");

    Ok(Persisted {
        transactions,
        created_categories: created,
    })
}

// ---------------------------------------------------------------------------
// import_transactions
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ImportResult {
    pub import_id: i64,
    pub transactions: Vec<Transaction>,
    pub created_categories: Vec<Category>,
    pub skipped: usize,
}

/// Import the CSV at `file_path`: stage its rows, reconcile categories, save
/// everything in one SQLite transaction, then delete the file.
///
/// The file is only removed once the transaction has committed. Any error
/// before that leaves both the database and the file untouched.
pub fn import_transactions(conn: &Connection, file_path: &Path) -> Result<ImportResult> {
    let file = std::fs::File::open(file_path)?;
    let parsed = read_rows(std::io::BufReader::new(file))?;
    let checksum = compute_checksum(file_path)?;
    let filename = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let tx = conn.unchecked_transaction()?;
    let (import_id, persisted) = {
        let store = SqliteStore::new(&tx);
        let import_id = store.record_import(&filename, &checksum, parsed.staged.len())?;
        let persisted = persist_staged(&store, &parsed.staged, Some(import_id))?;
        (import_id, persisted)
    };
    tx.commit()?;

    std::fs::remove_file(file_path)?;
    info!(file = %file_path.display(), import_id, "import complete, source file removed");

    Ok(ImportResult {
        import_id,
        transactions: persisted.transactions,
        created_categories: persisted.created_categories,
        skipped: parsed.skipped,
    })
}
