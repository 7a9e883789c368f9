use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Which file an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Config,
    Input,
    Output,
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRole::Config => write!(f, "config"),
            FileRole::Input => write!(f, "input"),
            FileRole::Output => write!(f, "output"),
        }
    }
}

/// Coarse error class, for callers that only need to branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    UnsupportedFormat,
    MissingField,
    InvalidThreshold,
    ConfigParse,
    Decode,
    Encode,
    Io,
}

/// Error type for every fatal failure of a filtering run.
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("{role} file not found: {}", path.display())]
    NotFound { role: FileRole, path: PathBuf },

    #[error("unsupported {role} format '.{extension}': {}", path.display())]
    UnsupportedFormat {
        role: FileRole,
        extension: String,
        path: PathBuf,
    },

    #[error("config {} is missing required field '{field}'", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("config {}: threshold must be an integer, got {value}", path.display())]
    InvalidThreshold { path: PathBuf, value: String },

    #[error("failed to parse config {}: {reason}", path.display())]
    ConfigParse { path: PathBuf, reason: String },

    #[error("failed to decode {format} data from {}", path.display())]
    Decode {
        format: &'static str,
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("failed to encode {format} data for {}", path.display())]
    Encode {
        format: &'static str,
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SieveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SieveError::NotFound { .. } => ErrorKind::NotFound,
            SieveError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            SieveError::MissingField { .. } => ErrorKind::MissingField,
            SieveError::InvalidThreshold { .. } => ErrorKind::InvalidThreshold,
            SieveError::ConfigParse { .. } => ErrorKind::ConfigParse,
            SieveError::Decode { .. } => ErrorKind::Decode,
            SieveError::Encode { .. } => ErrorKind::Encode,
            SieveError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        SieveError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Failures raised by a codec while converting between bytes and records.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Spreadsheet(#[from] calamine::Error),

    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Io(#[from] io::Error),

    /// The document parsed but does not have a tabular shape.
    #[error("{0}")]
    Shape(String),
}

pub type Result<T, E = SieveError> = std::result::Result<T, E>;
