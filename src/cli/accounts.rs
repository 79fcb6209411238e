use comfy_table::{Cell, Table};

use crate::db::Store;
use crate::error::Result;
use crate::settings::db_path;

pub fn add(name: &str, number: Option<&str>, institution: Option<&str>) -> Result<()> {
    let store = Store::open(&db_path())?;
    store.conn().execute(
        "INSERT INTO accounts (name, number, institution) VALUES (?1, ?2, ?3)",
        rusqlite::params![name, number, institution],
    )?;
    println!("Added account: {name}");
    Ok(())
}

pub fn list() -> Result<()> {
    let store = Store::open(&db_path())?;
    let mut stmt = store
        .conn()
        .prepare("SELECT id, name, number, institution FROM accounts ORDER BY name")?;
    let rows: Vec<(i64, String, Option<String>, Option<String>)> = stmt
        .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Number", "Institution"]);
    for (id, name, number, institution) in rows {
        table.add_row(vec![
            Cell::new(id),
            Cell::new(name),
            Cell::new(number.unwrap_or_default()),
            Cell::new(institution.unwrap_or_default()),
        ]);
    }
    println!("Accounts\n{table}");
    Ok(())
}
