use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path};

pub fn run(
    statements_dir: Option<String>,
    currency: Option<String>,
    platform: Option<String>,
) -> Result<()> {
    let mut settings = load_settings();

    if let Some(dir) = statements_dir {
        settings.statements_dir = Some(shellexpand_path(&dir));
    }
    if let Some(symbol) = currency {
        settings.currency_symbol = symbol;
    }
    if let Some(name) = platform {
        settings.platform_name = name;
    }

    save_settings(&settings)?;
    println!("Saved settings to {}", settings_path().display());
    Ok(())
}
