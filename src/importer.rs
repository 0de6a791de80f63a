use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{FcstatError, Result};
use crate::models::{Row, Statement};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn amount_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\p{Sc}?((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?)$").expect("valid regex")
    })
}

/// Parse a money column: unsigned digits with an optional fraction, optional
/// `,` thousands grouping and an optional leading currency symbol. Anything
/// else (signs, exponents, decimal commas, empty) is `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let caps = amount_pattern().captures(raw.trim())?;
    caps[1]
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("csv"))
}

// ---------------------------------------------------------------------------
// Statement reader
// ---------------------------------------------------------------------------

pub fn read_statement(file_path: &Path) -> Result<Statement> {
    if !file_path.is_file() {
        return Err(FcstatError::NotFound(file_path.to_path_buf()));
    }
    let file = std::fs::File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .quote(b'"')
        .from_reader(std::io::BufReader::new(file));

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 1);
        rows.push(Row::new(line, record.iter().map(str::to_string).collect()));
    }
    log::info!("read {} rows from {}", rows.len(), file_path.display());
    Ok(Statement::new(rows))
}

/// CSV files directly inside `dir`, ordered by file name.
pub fn statement_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(FcstatError::NotFound(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_csv(&path) {
            log::info!("found CSV file: {}", path.display());
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
