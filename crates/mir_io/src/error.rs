//! Error types for mir_io.

use thiserror::Error;

/// Errors from the log/export writers. None of these are fatal to the
/// simulation; callers report them and disable the affected feature.
#[derive(Error, Debug)]
pub enum IoError {
    /// File system errors
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

/// Result type alias for mir_io operations.
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = IoError::from(io_err).with_context("opening population log");
        assert!(err.to_string().contains("opening population log"));
    }
}
