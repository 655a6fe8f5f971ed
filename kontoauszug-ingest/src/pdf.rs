//! File loading. Text extraction from PDFs is left to `pdf-extract`.

use std::fs;
use std::path::Path;

use kontoauszug_core::{ImportError, Result};

pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

pub fn extract_pdf_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ImportError::Pdf {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log::debug!("extracted {} chars from {}", text.len(), path.display());
    Ok(text)
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_ignores_case() {
        assert!(is_pdf(Path::new("Kontoauszug_2020_02.PDF")));
        assert!(is_pdf(Path::new("dir/a.pdf")));
        assert!(!is_pdf(Path::new("a.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn test_garbage_pdf_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let err = extract_pdf_text(&path).unwrap_err();
        assert!(matches!(err, ImportError::Pdf { .. }));
    }
}
