use thiserror::Error;

/// Ways a checklist job can fail. Every failure aborts the whole job; there is
/// no partial output.
#[derive(Debug, Error)]
pub enum JobError {
    /// Missing address or unsupported pack type. The user has to fix the
    /// arguments and run again.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The input is not a PDF we can read at all.
    #[error("Not a usable PDF document: {0}\nTry re-exporting or re-saving the checklist as PDF.")]
    InvalidDocument(String),

    /// Text extraction or rendering failed on one page.
    #[error("Failed to process page {page}: {source:#}")]
    PageProcessing {
        page: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to build archive: {0}")]
    Archive(String),
}

impl JobError {
    pub fn page(page: u32, source: anyhow::Error) -> Self {
        JobError::PageProcessing { page, source }
    }
}
