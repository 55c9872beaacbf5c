//! Error types for songdb-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input ended before a primitive value was complete.
    #[error("Truncated input at offset {offset}: needed {needed} more byte(s)")]
    Truncated { offset: u64, needed: u64 },

    #[error("Corrupt data at offset {offset}: {reason}")]
    CorruptData { offset: u64, reason: String },

    /// A record ran out of input after some of its bytes were consumed.
    #[error("Corrupt record #{index} starting at offset {offset}: {source}")]
    CorruptRecord {
        index: u64,
        offset: u64,
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Io(e.into())
    }
}

impl Error {
    /// True when the input simply ran out of bytes.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Error::Truncated { .. })
    }

    /// True for structurally invalid input, including mid-record truncation.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Error::CorruptData { .. } | Error::CorruptRecord { .. })
    }
}
