use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Input file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("{}: missing field '{}'{}", .path.display(), .column, line_suffix(.line))]
    MissingField {
        path: PathBuf,
        column: String,
        /// `None` when the header itself lacks the column
        line: Option<u64>,
    },

    #[error("{}: invalid UTF-8{}", .path.display(), line_suffix(.line))]
    Encoding { path: PathBuf, line: Option<u64> },

    #[error("{}: CSV error: {}", .path.display(), .source)]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),
}

impl MapError {
    /// Classify a reader error for `path`.
    pub(crate) fn from_csv(path: &Path, err: csv::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                return MapError::FileNotFound { path };
            }
            csv::ErrorKind::Utf8 { pos, .. } => {
                let line = pos.as_ref().map(|p| p.line());
                return MapError::Encoding { path, line };
            }
            _ => {}
        }
        MapError::Csv { path, source: err }
    }

    /// True for errors caused by the input data rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MapError::MissingField { .. } | MapError::Encoding { .. } | MapError::Csv { .. }
        )
    }
}

fn line_suffix(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!(" (line {})", line),
        None => " (header)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
