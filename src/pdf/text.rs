use crate::pdf::{guarded, PdfDocument};
use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Per-page plain text for one document.
///
/// pdf-extract reads the whole document in one pass, which gives the best
/// text but cannot say which page broke when it fails or panics. In that case,
/// or when its page count disagrees with the page tree, every page is read on
/// its own through lopdf instead.
pub struct TextExtractor {
    pages: Option<Vec<String>>,
}

impl TextExtractor {
    pub fn new(doc: &PdfDocument) -> Self {
        let expected = doc.page_count() as usize;
        let pages = match guarded(|| pdf_extract::extract_text_from_mem_by_pages(&doc.bytes)) {
            Ok(Ok(pages)) if pages.len() == expected => {
                debug!(pages = pages.len(), "extracted text with pdf-extract");
                Some(pages)
            }
            Ok(Ok(pages)) => {
                warn!(
                    got = pages.len(),
                    expected, "pdf-extract page count mismatch, reading pages individually"
                );
                None
            }
            Ok(Err(e)) => {
                warn!(error = %e, "pdf-extract failed, reading pages individually");
                None
            }
            Err(e) => {
                warn!(error = %e, "pdf-extract aborted, reading pages individually");
                None
            }
        };
        TextExtractor { pages }
    }

    /// Extractor that always goes page by page through lopdf.
    #[cfg(test)]
    pub fn per_page() -> Self {
        TextExtractor { pages: None }
    }

    pub fn page_text(&self, doc: &PdfDocument, page: u32) -> Result<String> {
        if let Some(pages) = &self.pages {
            return pages
                .get((page as usize).wrapping_sub(1))
                .cloned()
                .with_context(|| format!("Page {} is out of range (1-{})", page, pages.len()));
        }

        doc.page_id(page)?;
        guarded(|| doc.doc.extract_text(&[page]))?
            .with_context(|| format!("Failed to extract text from page {}", page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::document::tests::{make_test_pdf, make_test_pdf_with_encoding};

    #[test]
    fn test_extracts_each_page() {
        let doc = PdfDocument::from_bytes(make_test_pdf(&[
            "Inspection Checklist",
            "BMD WORKS REQUIRED",
            "Routine maintenance",
        ]))
        .unwrap();
        let extractor = TextExtractor::new(&doc);

        let second = extractor.page_text(&doc, 2).unwrap();
        assert!(second.to_uppercase().contains("BMD"), "got: {second}");
        let third = extractor.page_text(&doc, 3).unwrap();
        assert!(third.to_uppercase().contains("ROUTINE"), "got: {third}");
    }

    #[test]
    fn test_blank_page_has_blank_text() {
        let doc = PdfDocument::from_bytes(make_test_pdf(&["cover", ""])).unwrap();
        for extractor in [TextExtractor::new(&doc), TextExtractor::per_page()] {
            let text = extractor.page_text(&doc, 2).unwrap();
            assert!(text.trim().is_empty(), "got: {text:?}");
        }
    }

    #[test]
    fn test_out_of_range_page() {
        let doc = PdfDocument::from_bytes(make_test_pdf(&["only"])).unwrap();
        for extractor in [TextExtractor::new(&doc), TextExtractor::per_page()] {
            assert!(extractor.page_text(&doc, 0).is_err());
            assert!(extractor.page_text(&doc, 2).is_err());
        }
    }

    #[test]
    fn test_unknown_encoding_falls_back_per_page() {
        let doc = PdfDocument::from_bytes(make_test_pdf_with_encoding(
            &["Inspection Checklist", "BMD WORKS REQUIRED"],
            2,
            "BogusEncoding",
        ))
        .unwrap();
        let extractor = TextExtractor::new(&doc);

        // Page 1 keeps the standard font and must still read.
        let first = extractor.page_text(&doc, 1).unwrap();
        assert!(first.to_uppercase().contains("CHECKLIST"), "got: {first}");
        // Page 2 may read or fail, but as a value.
        let _ = extractor.page_text(&doc, 2);
    }
}
