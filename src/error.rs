// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("environment variable {0} is not set or is an empty string")]
    MissingEnv(String),

    #[error("required field '{field}' not found in {file}")]
    MissingField { file: PathBuf, field: String },

    #[error("required input file missing: {0}")]
    MissingInput(PathBuf),

    #[error("node '{0}' is not listed in the node registry")]
    UnknownNode(String),

    #[error("malformed {what} entry on line {line}: {text}")]
    Malformed {
        what: &'static str,
        line: usize,
        text: String,
    },

    #[error("unknown build-matrix type: {0}")]
    BadBuildType(String),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl ReportError {
    /// Attaches the offending path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            source,
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

// Allow `?` on std::io::Error by converting to ReportError::Io with unknown path.
impl From<std::io::Error> for ReportError {
    fn from(source: std::io::Error) -> Self {
        ReportError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

impl From<walkdir::Error> for ReportError {
    fn from(e: walkdir::Error) -> Self {
        let path = e
            .path()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("<unknown>"));
        match e.into_io_error() {
            Some(source) => ReportError::Io { source, path },
            None => ReportError::Io {
                source: std::io::Error::new(std::io::ErrorKind::Other, "directory walk error"),
                path,
            },
        }
    }
}
