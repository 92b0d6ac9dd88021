//! CSV input tables with by-name column access

use crate::error::{MapError, Result};
use csv::{StringRecord, Trim};
use std::fs::File;
use std::path::{Path, PathBuf};

/// An open CSV table. Columns are resolved against the header row by name.
pub struct Table {
    path: PathBuf,
    reader: csv::Reader<File>,
    headers: StringRecord,
}

impl Table {
    /// Open `path` and read its header row.
    ///
    /// Rows may be shorter than the header; a missing cell only becomes an
    /// error when a required column is read from it.
    pub fn open(path: &Path, trim: bool) -> Result<Self> {
        if !path.exists() {
            return Err(MapError::FileNotFound { path: path.to_path_buf() });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(if trim { Trim::All } else { Trim::None })
            .from_path(path)
            .map_err(|e| MapError::from_csv(path, e))?;

        let headers = reader.headers().map_err(|e| MapError::from_csv(path, e))?.clone();

        Ok(Self { path: path.to_path_buf(), reader, headers })
    }

    /// True when the file has no header row at all (zero bytes).
    /// A blank header line still counts as a header.
    pub fn has_no_header(&self) -> bool {
        self.headers.is_empty()
    }

    /// Index of the header named `name`.
    pub fn column(&self, name: &str) -> Result<Column> {
        self.headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
            .map(|index| Column { name: name.to_string(), index })
            .ok_or_else(|| MapError::MissingField {
                path: self.path.clone(),
                column: name.to_string(),
                line: None,
            })
    }

    /// Like [`Table::column`], but only when `required`.
    pub fn column_if(&self, name: &str, required: bool) -> Result<Option<Column>> {
        if required {
            self.column(name).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Iterate data rows in file order.
    pub fn rows(&mut self) -> impl Iterator<Item = Result<Row<'_>>> + '_ {
        let path = self.path.as_path();
        self.reader.records().map(move |result| {
            result
                .map(|record| Row { path, record })
                .map_err(|e| MapError::from_csv(path, e))
        })
    }
}

/// A resolved header column.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    index: usize,
}

/// One data row of a [`Table`].
pub struct Row<'a> {
    path: &'a Path,
    record: StringRecord,
}

impl Row<'_> {
    /// 1-based line number of this row in its file.
    pub fn line(&self) -> u64 {
        self.record.position().map(|p| p.line()).unwrap_or(0)
    }

    pub fn get(&self, column: &Column) -> Result<&str> {
        self.record.get(column.index).ok_or_else(|| MapError::MissingField {
            path: self.path.to_path_buf(),
            column: column.name.clone(),
            line: Some(self.line()),
        })
    }

    pub fn get_opt(&self, column: Option<&Column>) -> Result<Option<&str>> {
        column.map(|c| self.get(c)).transpose()
    }
}
