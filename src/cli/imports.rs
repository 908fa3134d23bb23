use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::store::SqliteStore;

use super::open_db;

pub fn run() -> Result<()> {
    let conn = open_db()?;
    let imports = SqliteStore::new(&conn).list_imports()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "File", "Records", "Checksum", "Imported"]);
    for record in imports {
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(record.filename),
            Cell::new(record.record_count),
            Cell::new(&record.checksum[..record.checksum.len().min(12)]),
            Cell::new(record.created_at),
        ]);
    }
    println!("Imports\n{table}");
    Ok(())
}
