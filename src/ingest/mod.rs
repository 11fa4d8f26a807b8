pub mod csv;
pub mod source;

pub use self::csv::{parse_csv, ParsedDataset};
pub use source::{DatasetSource, FileSource};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("dataset is empty")]
    Empty,

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] ::csv::Error),
}
