//! Document parsers: raw bytes → page texts.

use voibot_core::document::{DocumentParser, PageText};
use voibot_core::error::IngestError;

const PDF_MAGIC: &[u8] = b"%PDF";
const PAGE_BREAK: char = '\u{c}';

fn parse_error(source: &str, reason: impl Into<String>) -> IngestError {
    IngestError::Parse {
        url: source.to_string(),
        reason: reason.into(),
    }
}

/// Split extracted text into pages on form feeds, numbering from 1 and
/// skipping blank pages. Fails when nothing is left.
fn into_pages(source: &str, text: &str) -> Result<Vec<PageText>, IngestError> {
    let pages: Vec<PageText> = text
        .split(PAGE_BREAK)
        .enumerate()
        .filter(|(_, t)| !t.trim().is_empty())
        .map(|(i, t)| PageText {
            source: source.to_string(),
            page: i + 1,
            text: t.to_string(),
        })
        .collect();

    if pages.is_empty() {
        return Err(parse_error(source, "document contains no extractable text"));
    }
    Ok(pages)
}

/// Extracts text from PDF documents.
pub struct PdfParser;

impl DocumentParser for PdfParser {
    fn parse(&self, source: &str, bytes: &[u8]) -> Result<Vec<PageText>, IngestError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| parse_error(source, e.to_string()))?;
        into_pages(source, &text)
    }
}

/// Treats the document as UTF-8 text.
pub struct PlainTextParser;

impl DocumentParser for PlainTextParser {
    fn parse(&self, source: &str, bytes: &[u8]) -> Result<Vec<PageText>, IngestError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| parse_error(source, format!("not valid UTF-8: {e}")))?;
        into_pages(source, text)
    }
}

/// Picks the PDF parser for `%PDF` content and plain text otherwise.
pub struct AutoParser;

impl DocumentParser for AutoParser {
    fn parse(&self, source: &str, bytes: &[u8]) -> Result<Vec<PageText>, IngestError> {
        if bytes.starts_with(PDF_MAGIC) {
            PdfParser.parse(source, bytes)
        } else {
            PlainTextParser.parse(source, bytes)
        }
    }
}
