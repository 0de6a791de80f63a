use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FcstatError {
    #[error("Path \"{}\" does not exist.", .0.display())]
    NotFound(PathBuf),

    #[error("Line {line}: {column} value {value:?} is not an amount (description: {description:?})")]
    MalformedRow {
        line: usize,
        column: &'static str,
        value: String,
        description: String,
    },

    #[error("Line {line}: expected at least 4 fields, found {fields}")]
    ShortRow { line: usize, fields: usize },

    #[error("{}: {source}", path.display())]
    Statement {
        path: PathBuf,
        source: Box<FcstatError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, FcstatError>;
