use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Outcome,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Outcome => "outcome",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "outcome" => Ok(Self::Outcome),
            _ => Err(()),
        }
    }
}

impl rusqlite::types::FromSql for TransactionType {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse()
            .map_err(|_| rusqlite::types::FromSqlError::Other(format!("bad kind: {s}").into()))
    }
}

impl rusqlite::types::ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub title: String,
    pub kind: TransactionType,
    pub value: f64,
    pub category: Category,
    pub import_id: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct ImportRecord {
    pub id: i64,
    pub filename: String,
    pub checksum: String,
    pub record_count: i64,
    pub created_at: String,
}

/// A CSV row that passed the title/type/value check, waiting for its
/// category to be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedTransaction {
    pub title: String,
    pub kind: TransactionType,
    pub value: f64,
    pub category: String,
}

/// Unsaved category, one per missing title.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub title: String,
}

/// Unsaved transaction with its category already resolved.
#[derive(Debug, Clone)]
pub struct NewTransaction<'a> {
    pub title: &'a str,
    pub kind: TransactionType,
    pub value: f64,
    pub category: &'a Category,
    pub import_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance {
    pub income: f64,
    pub outcome: f64,
    pub total: f64,
}
