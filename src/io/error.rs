use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to read or write CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to encode or decode JSON data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("the {0} input has no header row")]
    MissingHeader(Format),

    #[error("row at line {line} has {found} fields, but the header declares {expected}")]
    RowWidth {
        line: u64,
        expected: usize,
        found: usize,
    },
}

impl Error {
    pub fn row_width(line: u64, expected: usize, found: usize) -> Self {
        Self::RowWidth {
            line,
            expected,
            found,
        }
    }
}
