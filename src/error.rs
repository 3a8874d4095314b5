use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed document text; `line` is 1-based
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

/// Convenience type alias for Results with Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Parse {
            line: 7,
            message: "expected 'key=value'".to_string(),
        };
        assert_eq!(err.to_string(), "parse error on line 7: expected 'key=value'");

        let err = Error::validation("section must not be empty");
        assert_eq!(err.to_string(), "validation error: section must not be empty");
    }

    #[test]
    fn test_io_error_carries_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io("/tmp/missing.ini", io_err);
        assert!(matches!(err, Error::Io { .. }));
        let text = err.to_string();
        assert!(text.contains("/tmp/missing.ini"));
        assert!(text.contains("file not found"));
    }
}
