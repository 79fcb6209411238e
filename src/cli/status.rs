use crate::db::Store;
use crate::error::Result;
use crate::fmt::money;
use crate::settings::{get_data_dir, load_settings};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = get_data_dir();
    let db_path = data_dir.join("penny.db");

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());
    println!("Currency:   {}", settings.default_currency);

    if !db_path.exists() {
        println!();
        println!("Database not found. Run `penny init` to set up.");
        return Ok(());
    }

    let store = Store::open(&db_path)?;
    let conn = store.conn();
    let accounts: i64 = conn.query_row("SELECT count(*) FROM accounts", [], |r| r.get(0))?;
    let transactions: i64 = conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
    let review: i64 = conn.query_row(
        "SELECT count(*) FROM transactions WHERE review_needed = 1",
        [],
        |r| r.get(0),
    )?;
    let patterns: i64 = conn.query_row("SELECT count(*) FROM patterns", [], |r| r.get(0))?;
    let imports: i64 = conn.query_row("SELECT count(*) FROM imports", [], |r| r.get(0))?;
    let net: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM transactions",
        [],
        |r| r.get(0),
    )?;

    println!();
    println!("Accounts:       {accounts}");
    println!("Transactions:   {transactions}");
    println!("Need review:    {review}");
    println!("Patterns:       {patterns}");
    println!("Imports:        {imports}");
    println!("Net amount:     {}", money(net));

    Ok(())
}
