//! Error type shared by the importer crates.
//!
//! An import either yields every entry of a statement or fails as a whole;
//! none of these errors is recovered from inside the library.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// A line the statement layout requires (balance, year header) is absent
    #[error("no line containing '{keyword}' found in statement")]
    NotFound { keyword: String },

    /// A located line does not have the expected shape
    #[error("malformed statement line '{line}': {message}")]
    Format { line: String, message: String },

    /// The file is not a statement this importer understands
    #[error("unsupported document: {}", path.display())]
    UnsupportedDocument { path: PathBuf },

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("extracting text from {}: {message}", path.display())]
    Pdf { path: PathBuf, message: String },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A configured narration rule cannot be compiled
    #[error("invalid narration rule '{rule}': {message}")]
    InvalidRule { rule: String, message: String },
}

impl ImportError {
    pub fn not_found(keyword: impl Into<String>) -> Self {
        ImportError::NotFound {
            keyword: keyword.into(),
        }
    }

    pub fn format(line: impl Into<String>, message: impl Into<String>) -> Self {
        ImportError::Format {
            line: line.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::not_found(
        ImportError::not_found("NEUER KONTOSTAND"),
        "no line containing 'NEUER KONTOSTAND' found in statement"
    )]
    #[case::format(
        ImportError::format("KONTOAUSZUG 20", "expected a four digit year"),
        "malformed statement line 'KONTOAUSZUG 20': expected a four digit year"
    )]
    #[case::unsupported(
        ImportError::UnsupportedDocument { path: PathBuf::from("/tmp/x.pdf") },
        "unsupported document: /tmp/x.pdf"
    )]
    #[case::pdf(
        ImportError::Pdf { path: PathBuf::from("a.pdf"), message: "bad xref".to_string() },
        "extracting text from a.pdf: bad xref"
    )]
    fn test_error_display(#[case] error: ImportError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;
        let err = ImportError::Io {
            path: PathBuf::from("missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().starts_with("reading missing.txt"));
        assert!(err.source().is_some());
    }
}
