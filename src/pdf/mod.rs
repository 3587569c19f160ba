pub mod document;
pub mod render;
pub mod text;

pub use document::PdfDocument;

use crate::checklist::PageSource;
use crate::error::JobError;
use anyhow::{anyhow, Result};
use render::{renderer_for, PageRenderer, RendererChoice};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use text::TextExtractor;
use tracing::warn;

/// A parsed PDF together with the text extractor and renderer chosen for it.
pub struct PdfPageSource {
    doc: PdfDocument,
    text: TextExtractor,
    renderer: Box<dyn PageRenderer>,
}

impl PdfPageSource {
    pub fn new(doc: PdfDocument, choice: RendererChoice) -> Self {
        let text = TextExtractor::new(&doc);
        let renderer = renderer_for(choice, &doc);
        PdfPageSource {
            doc,
            text,
            renderer,
        }
    }

    pub fn from_bytes(bytes: Vec<u8>, choice: RendererChoice) -> Result<Self, JobError> {
        Ok(Self::new(PdfDocument::from_bytes(bytes)?, choice))
    }

    /// Read and parse a checklist file.
    pub fn open<P: AsRef<Path>>(path: P, choice: RendererChoice) -> Result<Self, JobError> {
        let path = path.as_ref();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            warn!(path = %path.display(), "input does not have a .pdf extension");
        }

        let bytes = std::fs::read(path).map_err(|e| {
            JobError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_bytes(bytes, choice)
    }
}

/// Run a call into the PDF crates, turning a panic into an error.
pub(crate) fn guarded<T>(f: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        anyhow!("PDF library panicked: {}", reason)
    })
}

impl PageSource for PdfPageSource {
    fn page_count(&self) -> u32 {
        self.doc.page_count()
    }

    fn page_text(&self, page: u32) -> Result<String> {
        self.text.page_text(&self.doc, page)
    }

    fn render_page(&self, page: u32) -> Result<Vec<u8>> {
        guarded(|| self.renderer.render(&self.doc, page))?
    }
}
