//! Error types for xmlscope
//!
//! Every public operation returns an explicit outcome; no panic crosses a
//! public boundary. Uses `thiserror` for Display/Error implementations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for xmlscope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for document loading, searching, and history persistence
#[derive(Debug, Error)]
pub enum Error {
    /// The requested file does not exist
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path as given by the caller
        path: PathBuf,
    },

    /// Neither the extension nor the content sniff identified the file as XML
    #[error("not a valid XML file: {}", path.display())]
    NotXml {
        /// Path as given by the caller
        path: PathBuf,
    },

    /// Malformed markup, with the parser diagnostic and byte position
    #[error("XML parsing error at byte {position}: {message}")]
    Parse {
        /// Parser diagnostic
        message: String,
        /// Byte offset into the input where the fault was detected
        position: usize,
    },

    /// A search or reload was attempted with no document resident
    #[error("no XML document loaded")]
    NoDocumentLoaded,

    /// Empty query while the empty-means-all policy is disabled
    #[error("empty search query")]
    MissingQuery,

    /// Unexpected fault during traversal or matching
    #[error("error searching for tag: {0}")]
    Search(String),

    /// History record (de)serialization failure
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Underlying I/O failure (read, write, remove)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_file_not_found() {
        let err = Error::FileNotFound {
            path: PathBuf::from("/tmp/missing.xml"),
        };
        assert!(err.to_string().contains("file not found"));
        assert!(err.to_string().contains("missing.xml"));
    }

    #[test]
    fn test_display_parse() {
        let err = Error::Parse {
            message: "tag mismatch: <a> closed with </b>".to_string(),
            position: 42,
        };
        let msg = err.to_string();
        assert!(msg.contains("byte 42"));
        assert!(msg.contains("tag mismatch"));
    }

    #[test]
    fn test_io_conversion() {
        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
