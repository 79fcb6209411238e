use colored::Colorize;

use crate::db::Store;
use crate::error::Result;
use crate::settings::{save_settings, Settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = Settings::default();
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }

    let dir = std::path::PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&dir)?;

    let store = Store::open(&dir.join("penny.db"))?;
    store.init()?;
    save_settings(&settings)?;

    println!("{} {}", "Initialized database at".green(), dir.join("penny.db").display());
    Ok(())
}
