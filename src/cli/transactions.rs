use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::{money, signed_money};
use crate::store::SqliteStore;

use super::open_db;

pub fn run() -> Result<()> {
    let conn = open_db()?;
    let store = SqliteStore::new(&conn);
    let transactions = store.list_transactions()?;
    let balance = store.balance()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Type", "Value", "Category", "Import", "Created"]);
    for txn in &transactions {
        table.add_row(vec![
            Cell::new(txn.id),
            Cell::new(&txn.title),
            Cell::new(txn.kind),
            Cell::new(signed_money(txn.kind, txn.value)),
            Cell::new(&txn.category.title),
            Cell::new(txn.import_id.map(|id| format!("#{id}")).unwrap_or_default()),
            Cell::new(&txn.created_at),
        ]);
    }
    println!("Transactions\n{table}");

    let total = if balance.total >= 0.0 {
        money(balance.total).green().bold()
    } else {
        money(balance.total).red().bold()
    };
    println!("Income:   {}", money(balance.income));
    println!("Outcome:  {}", money(balance.outcome));
    println!("Total:    {total}");
    Ok(())
}
