//! Statement text and the per-statement context handed to parsers.

use std::path::Path;

use kontoauszug_core::Result;

use crate::locale::NumberFormat;
use crate::pdf;

/// Decoded text of one statement file, read line by line by the parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementText {
    text: String,
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

impl StatementText {
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self {
            text: text.replace("\r\n", "\n"),
        }
    }

    /// Load a statement: PDFs go through text extraction, anything else is
    /// taken as already-extracted UTF-8 text.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = if pdf::is_pdf(path) {
            pdf::extract_pdf_text(path)?
        } else {
            pdf::read_text(path)?
        };
        Ok(Self::new(text))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Lines of the statement. Page breaks (form feeds) count as line breaks;
    /// a trailing break does not produce an empty last line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        let body = self.text.strip_suffix(is_line_break).unwrap_or(&self.text);
        (!body.is_empty())
            .then(|| body.split(is_line_break))
            .into_iter()
            .flatten()
    }

    pub fn contains(&self, marker: &str) -> bool {
        self.text.contains(marker)
    }

    /// First line containing `keyword`, with its 1-based line number.
    pub fn find_line(&self, keyword: &str) -> Option<(usize, &str)> {
        self.lines()
            .enumerate()
            .find(|(_, line)| line.contains(keyword))
            .map(|(i, line)| (i + 1, line))
    }
}

/// Account and money conventions applied while reading one statement
#[derive(Debug, Clone, Copy)]
pub struct StatementContext<'a> {
    /// Recorded in entry metadata
    pub filename: &'a str,
    pub account: &'a str,
    pub currency: &'a str,
    pub number_format: NumberFormat,
}
