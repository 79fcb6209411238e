use comfy_table::{Cell, Table};

use crate::db::Store;
use crate::error::Result;
use crate::fmt::percent;
use crate::settings::db_path;

pub fn list() -> Result<()> {
    let store = Store::open(&db_path())?;
    let mut stmt = store.conn().prepare(
        "SELECT p.pattern, p.scope, c.name, s.name, p.confidence, p.usage_count \
         FROM patterns p \
         JOIN categories c ON p.category_id = c.id \
         LEFT JOIN subcategories s ON p.subcategory_id = s.id \
         ORDER BY p.confidence DESC, p.usage_count DESC",
    )?;
    let rows: Vec<(String, String, String, Option<String>, f64, i64)> = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec!["Pattern", "Scope", "Category", "Subcategory", "Confidence", "Uses"]);
    for (pattern, scope, category, subcategory, confidence, uses) in rows {
        table.add_row(vec![
            Cell::new(pattern),
            Cell::new(scope),
            Cell::new(category),
            Cell::new(subcategory.unwrap_or_default()),
            Cell::new(percent(confidence)),
            Cell::new(uses),
        ]);
    }
    println!("Learned patterns\n{table}");
    Ok(())
}
