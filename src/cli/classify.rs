use crate::catalog::Catalog;
use crate::db::Store;
use crate::error::Result;
use crate::importer::reclassify_pending;
use crate::settings::db_path;

pub fn run() -> Result<()> {
    let store = Store::open(&db_path())?;
    let catalog = Catalog::default();

    let stats = reclassify_pending(&store, &catalog)?;
    println!(
        "{} classified, {} still need review",
        stats.classified, stats.still_review
    );
    Ok(())
}
