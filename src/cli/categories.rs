use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::store::SqliteStore;

use super::open_db;

pub fn run() -> Result<()> {
    let conn = open_db()?;
    let categories = SqliteStore::new(&conn).list_categories()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Transactions", "Created"]);
    for (category, count) in categories {
        table.add_row(vec![
            Cell::new(category.id),
            Cell::new(category.title),
            Cell::new(count),
            Cell::new(category.created_at),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}
