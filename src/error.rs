// error.rs — Error taxonomy for the gradient-magnitude pipeline.
//
// Three kinds of failure exist:
//   Io              — a file could not be opened, read or written
//   Format          — a PGM header or payload is not what we can parse
//   InvalidArgument — a caller passed mismatched lengths or empty images
//
// Io and Format are detected at the file boundary and stop the pipeline
// before any gradient work happens. InvalidArgument is the fail-fast signal
// for precondition violations in the kernel, the extractor and the
// replicator.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by `gradmag`.
#[derive(Debug, Error)]
pub enum GradMagError {
    /// The resource at `path` could not be opened, read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Unrecognized format tag or malformed header/payload.
    #[error("format error: {0}")]
    Format(String),

    /// Length mismatch, zero dimension or similar caller bug.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl GradMagError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GradMagError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        GradMagError::Format(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        GradMagError::InvalidArgument(msg.into())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GradMagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path() {
        let err = GradMagError::io(
            "missing.pgm",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("missing.pgm"), "got {msg}");
        assert!(msg.contains("no such file"), "got {msg}");
    }

    #[test]
    fn test_format_and_invalid_messages() {
        assert_eq!(
            GradMagError::format("bad magic").to_string(),
            "format error: bad magic"
        );
        assert_eq!(
            GradMagError::invalid("n too large").to_string(),
            "invalid argument: n too large"
        );
    }
}
