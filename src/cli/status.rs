use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::settings::{load_settings, DB_FILE};
use crate::store::SqliteStore;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join(DB_FILE);

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let conn = get_connection(&db_path)?;

        let categories: i64 = conn.query_row("SELECT count(*) FROM categories", [], |r| r.get(0))?;
        let transactions: i64 = conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
        let imports: i64 = conn.query_row("SELECT count(*) FROM imports", [], |r| r.get(0))?;
        let balance = SqliteStore::new(&conn).balance()?;

        println!();
        println!("Categories:    {categories}");
        println!("Transactions:  {transactions}");
        println!("Imports:       {imports}");
        println!("Balance:       {}", money(balance.total));
    } else {
        println!();
        println!("Database not found. Run `tally init` to set up.");
    }

    Ok(())
}
