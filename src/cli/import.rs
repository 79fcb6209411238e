use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::db::Store;
use crate::error::Result;
use crate::importer::import_file;
use crate::settings::db_path;

pub fn run(file: &str, account: Option<&str>) -> Result<()> {
    let file_path = PathBuf::from(file);
    let store = Store::open(&db_path())?;
    let catalog = Catalog::default();

    let report = import_file(&store, &catalog, &file_path, account, None)?;

    if report.duplicate_file {
        println!("This file has already been imported (identical checksum).");
        return Ok(());
    }

    println!(
        "{} imported, {} duplicates, {} dropped, {} errors",
        report.imported, report.duplicates, report.skipped, report.errors
    );
    if !report.processed() {
        println!("File left eligible for retry (nothing ingested cleanly).");
    }
    Ok(())
}
