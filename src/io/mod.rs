use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::model::enriched::EnrichedTable;

pub mod error;

pub mod csv;
pub mod json;

pub use csv::reader::read as read_csv;
pub use csv::writer::write as write_csv;
pub use json::writer::write as write_json;

use error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    /// Guesses the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Format::Csv),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Csv => write!(f, "CSV"),
            Format::Json => write!(f, "JSON"),
        }
    }
}

/// Options shared by the table writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Emit the key (molecule name) as the first column.
    ///
    /// Off by default: the written table then carries the structure,
    /// metadata and descriptor columns only.
    pub include_key: bool,
}

/// Writes `table` in the given format.
pub fn write_table<W: Write>(
    format: Format,
    writer: W,
    table: &EnrichedTable,
    options: WriteOptions,
) -> Result<(), Error> {
    match format {
        Format::Csv => write_csv(writer, table, options),
        Format::Json => write_json(writer, table, options),
    }
}

/// Runs `write` against a temporary file next to `path`, then renames it
/// into place.
///
/// If `write` fails, the temporary file is removed and `path` is left
/// untouched.
pub fn persist_atomic<F>(path: &Path, write: F) -> Result<(), Error>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Error>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io { source: e.error })?;
    Ok(())
}
