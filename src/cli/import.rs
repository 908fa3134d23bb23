use std::path::PathBuf;

use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::signed_money;
use crate::importer::import_transactions;

use super::open_db;

pub fn run(file: &str) -> Result<()> {
    let file_path = PathBuf::from(file);
    let conn = open_db()?;

    let result = import_transactions(&conn, &file_path)?;

    if !result.transactions.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["ID", "Title", "Type", "Value", "Category"]);
        for txn in &result.transactions {
            table.add_row(vec![
                Cell::new(txn.id),
                Cell::new(&txn.title),
                Cell::new(txn.kind),
                Cell::new(signed_money(txn.kind, txn.value)),
                Cell::new(&txn.category.title),
            ]);
        }
        println!("{table}");
    }

    println!(
        "Import #{}: {} imported, {} skipped (incomplete rows), {} new categories",
        result.import_id,
        result.transactions.len(),
        result.skipped,
        result.created_categories.len()
    );
    Ok(())
}
