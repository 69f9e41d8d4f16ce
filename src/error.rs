//! Error types for vpxsplit

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vpxsplit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vpxsplit
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input stream could not be opened
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither an IVF header nor a VP8/VP9 WebM video track was found
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A declared frame or packet body is truncated
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    /// Demux engine failure
    #[error("Demux engine error: {0}")]
    Engine(String),

    /// A superframe index declares a frame larger than the bytes left in the packet
    #[error("Superframe index size mismatch: frame {frame} declares {declared} bytes, {remaining} remaining")]
    IndexSizeMismatch {
        frame: usize,
        declared: usize,
        remaining: usize,
    },
}

impl Error {
    /// Create an open error for the given path
    pub fn open<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Error::Open {
            path: path.into(),
            source,
        }
    }

    /// Create an unsupported format error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::UnsupportedFormat(msg.into())
    }

    /// Create a demux engine error
    pub fn engine<S: Into<String>>(msg: S) -> Self {
        Error::Engine(msg.into())
    }
}
