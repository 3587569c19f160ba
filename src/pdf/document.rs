use crate::error::JobError;
use anyhow::{Context, Result};
use lopdf::{Document, ObjectId};

const PDF_SIGNATURE: &[u8] = b"%PDF-";
/// Readers accept the header anywhere in the first kilobyte.
const SIGNATURE_WINDOW: usize = 1024;

pub struct PdfDocument {
    pub doc: Document,
    pub bytes: Vec<u8>,
}

impl PdfDocument {
    /// Parse a document after checking it carries a PDF signature.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, JobError> {
        check_signature(&bytes)?;
        let doc = Document::load_mem(&bytes)
            .map_err(|e| JobError::InvalidDocument(format!("unparsable PDF: {}", e)))?;
        Ok(PdfDocument { doc, bytes })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    pub fn page_id(&self, page: u32) -> Result<ObjectId> {
        let total = self.page_count();
        self.doc
            .get_pages()
            .get(&page)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Page {} is out of range (1-{})", page, total))
    }

    pub fn is_encrypted(&self) -> bool {
        self.doc.trailer.get(b"Encrypt").is_ok()
    }
}

/// Serialize a document to bytes.
pub fn save_to_vec(doc: &mut Document) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    doc.save_to(&mut out).context("Failed to write PDF")?;
    Ok(out)
}

fn check_signature(bytes: &[u8]) -> Result<(), JobError> {
    let window = &bytes[..bytes.len().min(SIGNATURE_WINDOW)];
    if window
        .windows(PDF_SIGNATURE.len())
        .any(|w| w == PDF_SIGNATURE)
    {
        return Ok(());
    }
    let head: Vec<u8> = bytes.iter().take(8).copied().collect();
    Err(JobError::InvalidDocument(format!(
        "missing %PDF- header (starts with {:?})",
        String::from_utf8_lossy(&head)
    )))
}
