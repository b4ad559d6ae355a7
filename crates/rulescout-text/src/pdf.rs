//! lopdf-backed page text extraction.

use lopdf::Document;
use rulescout_core::traits::PageExtractor;
use rulescout_core::types::Page;
use rulescout_core::{Error, Result};

/// Extracts per-page text from PDF bytes.
///
/// Bytes that do not parse as a PDF at all fail with `Error::Extraction`.
/// A page whose content streams cannot be decoded yields empty text, which
/// downstream treats the same as a page with nothing printed on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl PageExtractor for PdfExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<Page>> {
        let doc = Document::load_mem(bytes).map_err(|e| Error::Extraction(e.to_string()))?;

        let mut pages = Vec::new();
        for &number in doc.get_pages().keys() {
            let text = match doc.extract_text(&[number]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(page = number, error = %e, "page text could not be decoded");
                    String::new()
                }
            };
            pages.push(Page { number, text });
        }
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_an_extraction_error() {
        let extractor = PdfExtractor::new();
        let err = extractor.extract_pages(b"not a pdf").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn empty_bytes_are_an_extraction_error() {
        let extractor = PdfExtractor::new();
        assert!(extractor.extract_pages(&[]).is_err());
    }
}
