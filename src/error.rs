use std::path::PathBuf;

use thiserror::Error;

use crate::address::MAX_COLUMN_INDEX;

/// Failures raised by the serialization engine.
///
/// Malformed scalar values never show up here; the classifier absorbs them.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("column index {0} is beyond the last two-letter column (max index {max})", max = MAX_COLUMN_INDEX)]
    ColumnOutOfRange(usize),
    #[error("row {0} is outside the worksheet (rows are numbered 1 to {max})", max = crate::grid::MAX_ROWS)]
    RowOutOfRange(u64),
    #[error("invalid cell reference '{0}'")]
    InvalidReference(String),
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload must be a JSON object, found {0}")]
    InvalidPayload(&'static str),
    #[error("payload has no `values` field")]
    MissingValues,
    #[error("`values` must be an array of rows, found {0}")]
    InvalidValues(&'static str),
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type GridResult<T> = std::result::Result<T, GridError>;
