use std::path::PathBuf;

use crate::error::Result;
use crate::importer::statement_files;
use crate::settings::{load_settings, settings_path};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let path = settings_path();

    println!(
        "Settings:    {}{}",
        path.display(),
        if path.exists() { "" } else { " (not written, using defaults)" }
    );
    println!("Currency:    {}", settings.currency_symbol);
    println!("Platform:    {}", settings.platform_name);

    match settings.statements_dir.as_deref() {
        Some(dir) => {
            println!("Statements:  {dir}");
            let dir = PathBuf::from(dir);
            if dir.is_dir() {
                let files = statement_files(&dir)?;
                println!("CSV files:   {}", files.len());
            } else {
                println!();
                println!("Statements directory not found.");
            }
        }
        None => {
            println!("Statements:  (not set)");
        }
    }

    Ok(())
}
