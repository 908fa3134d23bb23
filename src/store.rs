use rusqlite::{Connection, Row};

use crate::error::Result;
use crate::models::{Balance, Category, ImportRecord, NewCategory, NewTransaction, Transaction};

/// SQLite caps the number of bound parameters per statement; stay well under it.
const MAX_IN_PARAMS: usize = 500;

pub trait CategoryStore {
    /// Existing categories whose title is one of `titles`. Unknown titles are ignored.
    fn find_by_titles(&self, titles: &[&str]) -> Result<Vec<Category>>;

    /// Create and save `new` as one batch, returning the saved rows in input order.
    fn insert_categories(&self, new: &[NewCategory]) -> Result<Vec<Category>>;
}

pub trait TransactionStore {
    /// Create and save `new` as one batch. An empty batch is a successful no-op.
    fn insert_transactions(&self, new: &[NewTransaction<'_>]) -> Result<Vec<Transaction>>;
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        title: row.get(1)?,
        created_at: row.get(2)?,
    })
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn record_import(&self, filename: &str, checksum: &str, record_count: usize) -> Result<i64> {
        let id = self.conn.query_row(
            "INSERT INTO imports (filename, checksum, record_count) VALUES (?1, ?2, ?3) RETURNING id",
            rusqlite::params![filename, checksum, record_count as i64],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    pub fn list_imports(&self) -> Result<Vec<ImportRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, checksum, record_count, created_at FROM imports ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ImportRecord {
                id: row.get(0)?,
                filename: row.get(1)?,
                checksum: row.get(2)?,
                record_count: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Every category with the number of transactions pointing at it.
    pub fn list_categories(&self) -> Result<Vec<(Category, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.title, c.created_at, count(t.id) \
             FROM categories c LEFT JOIN transactions t ON t.category_id = c.id \
             GROUP BY c.id ORDER BY c.title",
        )?;
        let rows = stmt.query_map([], |row| Ok((category_from_row(row)?, row.get(3)?)))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.title, t.kind, t.value, t.import_id, t.created_at, \
                    c.id, c.title, c.created_at \
             FROM transactions t JOIN categories c ON t.category_id = c.id \
             ORDER BY t.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Transaction {
                id: row.get(0)?,
                title: row.get(1)?,
                kind: row.get(2)?,
                value: row.get(3)?,
                import_id: row.get(4)?,
                created_at: row.get(5)?,
                category: Category {
                    id: row.get(6)?,
                    title: row.get(7)?,
                    created_at: row.get(8)?,
                },
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn balance(&self) -> Result<Balance> {
        let (income, outcome): (f64, f64) = self.conn.query_row(
            "SELECT \
                COALESCE(SUM(CASE WHEN kind = 'income' THEN value END), 0.0), \
                COALESCE(SUM(CASE WHEN kind = 'outcome' THEN value END), 0.0) \
             FROM transactions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(Balance {
            income,
            outcome,
            total: income - outcome,
        })
    }
}

impl CategoryStore for SqliteStore<'_> {
    fn find_by_titles(&self, titles: &[&str]) -> Result<Vec<Category>> {
        let mut found = Vec::new();
        for chunk in titles.chunks(MAX_IN_PARAMS) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT id, title, created_at FROM categories WHERE title IN ({placeholders}) ORDER BY id"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params_from_iter(chunk.iter()), category_from_row)?;
            for row in rows {
                found.push(row?);
            }
        }
        Ok(found)
    }

    fn insert_categories(&self, new: &[NewCategory]) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO categories (title) VALUES (?1) RETURNING id, title, created_at",
        )?;
        let mut saved = Vec::with_capacity(new.len());
        for category in new {
            saved.push(stmt.query_row([&category.title], category_from_row)?);
        }
        Ok(saved)
    }
}

impl TransactionStore for SqliteStore<'_> {
    fn insert_transactions(&self, new: &[NewTransaction<'_>]) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO transactions (title, kind, value, category_id, import_id) \
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id, created_at",
        )?;
        let mut saved = Vec::with_capacity(new.len());
        for txn in new {
            let (id, created_at): (i64, String) = stmt.query_row(
                rusqlite::params![txn.title, txn.kind, txn.value, txn.category.id, txn.import_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            saved.push(Transaction {
                id,
                title: txn.title.to_string(),
                kind: txn.kind,
                value: txn.value,
                category: txn.category.clone(),
                import_id: txn.import_id,
                created_at,
            });
        }
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::models::TransactionType;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn new_categories(titles: &[&str]) -> Vec<NewCategory> {
        titles
            .iter()
            .map(|t| NewCategory { title: t.to_string() })
            .collect()
    }

    #[test]
    fn test_insert_categories_returns_ids_in_order() {
        let (_dir, conn) = test_db();
        let store = SqliteStore::new(&conn);
        let saved = store.insert_categories(&new_categories(&["Food", "Housing"])).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].title, "Food");
        assert_eq!(saved[1].title, "Housing");
        assert!(saved[0].id < saved[1].id);
        assert!(!saved[0].created_at.is_empty());
    }

    #[test]
    fn test_find_by_titles_ignores_unknown() {
        let (_dir, conn) = test_db();
        let store = SqliteStore::new(&conn);
        store.insert_categories(&new_categories(&["Food", "Housing"])).unwrap();
        let found = store.find_by_titles(&["Food", "Travel"]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Food");
    }

    #[test]
    fn test_find_by_titles_is_case_sensitive() {
        let (_dir, conn) = test_db();
        let store = SqliteStore::new(&conn);
        store.insert_categories(&new_categories(&["Food"])).unwrap();
        assert!(store.find_by_titles(&["food"]).unwrap().is_empty());
    }

    #[test]
    fn test_find_by_titles_empty_input() {
        let (_dir, conn) = test_db();
        let store = SqliteStore::new(&conn);
        assert!(store.find_by_titles(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_find_by_titles_spans_chunks() {
        let (_dir, conn) = test_db();
        let store = SqliteStore::new(&conn);
        let titles: Vec<String> = (0..1200).map(|i| format!("cat-{i}")).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        store.insert_categories(&new_categories(&refs)).unwrap();
        let found = store.find_by_titles(&refs).unwrap();
        assert_eq!(found.len(), 1200);
    }

    #[test]
    fn test_insert_transactions_empty_batch() {
        let (_dir, conn) = test_db();
        let store = SqliteStore::new(&conn);
        assert!(store.insert_transactions(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_list_categories_counts_and_balance() {
        let (_dir, conn) = test_db();
        let store = SqliteStore::new(&conn);
        let cats = store.insert_categories(&new_categories(&["Food", "Salary"])).unwrap();
        store
            .insert_transactions(&[
                NewTransaction {
                    title: "Salary",
                    kind: TransactionType::Income,
                    value: 5000.0,
                    category: &cats[1],
                    import_id: None,
                },
                NewTransaction {
                    title: "Groceries",
                    kind: TransactionType::Outcome,
                    value: 200.0,
                    category: &cats[0],
                    import_id: None,
                },
                NewTransaction {
                    title: "Lunch",
                    kind: TransactionType::Outcome,
                    value: 15.5,
                    category: &cats[0],
                    import_id: None,
                },
            ])
            .unwrap();

        let listed = store.list_categories().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].0.title, "Food");
        assert_eq!(listed[0].1, 2);
        assert_eq!(listed[1].1, 1);

        let balance = store.balance().unwrap();
        assert_eq!(balance.income, 5000.0);
        assert_eq!(balance.outcome, 215.5);
        assert_eq!(balance.total, 4784.5);

        let txns = store.list_transactions().unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[1].title, "Groceries");
        assert_eq!(txns[1].kind, TransactionType::Outcome);
        assert_eq!(txns[1].category.title, "Food");
    }

    #[test]
    fn test_balance_of_empty_store() {
        let (_dir, conn) = test_db();
        let balance = SqliteStore::new(&conn).balance().unwrap();
        assert_eq!(balance.income, 0.0);
        assert_eq!(balance.outcome, 0.0);
        assert_eq!(balance.total, 0.0);
    }

    #[test]
    fn test_record_and_list_imports() {
        let (_dir, conn) = test_db();
        let store = SqliteStore::new(&conn);
        let id = store.record_import("march.csv", "abc123", 4).unwrap();
        let imports = store.list_imports().unwrap();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].id, id);
        assert_eq!(imports[0].filename, "march.csv");
        assert_eq!(imports[0].checksum, "abc123");
        assert_eq!(imports[0].record_count, 4);
    }
}
