use crate::checklist::classify::{classify_page, Category, Counters, PackType};
use crate::checklist::normalize::normalize_address;
use crate::checklist::uniquify::UsedNames;
use crate::error::JobError;
use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

/// Page access a job needs from a PDF engine. Pages are 1-based.
pub trait PageSource {
    fn page_count(&self) -> u32;

    /// Plain text of one page. May be empty.
    fn page_text(&self, page: u32) -> Result<String>;

    /// The page as a standalone single-page document.
    fn render_page(&self, page: u32) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct NamedBlob {
    pub name: String,
    pub page: u32,
    pub category: Category,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedPage {
    pub page: u32,
    pub category: Category,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobPlan {
    pub address: String,
    pub pack_type: PackType,
    pub page_count: u32,
    pub pages: Vec<PlannedPage>,
    pub skipped: Vec<u32>,
}

/// Normalize a user-supplied address, rejecting one with nothing left.
pub fn validate_address(raw: &str) -> Result<String, JobError> {
    let address = normalize_address(raw);
    if address.is_empty() {
        return Err(JobError::InvalidInput(
            "Address is empty after normalization".to_string(),
        ));
    }
    Ok(address)
}

/// Mutable state owned by a single job.
#[derive(Debug)]
struct JobState {
    address: String,
    pack: PackType,
    counters: Counters,
    used: UsedNames,
}

impl JobState {
    fn new(raw_address: &str, pack: PackType) -> Result<Self, JobError> {
        Ok(JobState {
            address: validate_address(raw_address)?,
            pack,
            counters: Counters::default(),
            used: UsedNames::new(),
        })
    }

    fn name_checklist(&mut self) -> PlannedPage {
        let name = self.used.uniquify(&Category::Checklist.file_name(&self.address));
        PlannedPage {
            page: 1,
            category: Category::Checklist,
            name,
        }
    }

    /// Classify and name a page, or `None` if its text is blank.
    fn name_page(&mut self, page: u32, text: &str) -> Option<PlannedPage> {
        if text.trim().is_empty() {
            return None;
        }
        let classified = classify_page(text, self.pack, &self.address, &mut self.counters);
        let name = self.used.uniquify(&classified.templated_name);
        Some(PlannedPage {
            page,
            category: classified.category,
            name,
        })
    }
}

fn page_count(source: &dyn PageSource) -> Result<u32, JobError> {
    let total = source.page_count();
    if total == 0 {
        return Err(JobError::InvalidDocument("document has no pages".to_string()));
    }
    Ok(total)
}

/// Split, classify and name every page.
///
/// Page 1 is always the checklist. Later pages with blank text are dropped.
/// Any page failure aborts the job.
pub fn run_job(
    source: &dyn PageSource,
    address: &str,
    pack: PackType,
) -> Result<Vec<NamedBlob>, JobError> {
    let mut state = JobState::new(address, pack)?;
    let total = page_count(source)?;
    info!(address = %state.address, pack = %pack, pages = total, "starting job");

    let mut blobs = Vec::with_capacity(total as usize);

    let cover = state.name_checklist();
    let bytes = source
        .render_page(1)
        .map_err(|e| JobError::page(1, e))?;
    debug!(page = 1, name = %cover.name, "emitting checklist");
    blobs.push(NamedBlob {
        name: cover.name,
        page: 1,
        category: cover.category,
        bytes,
    });

    for page in 2..=total {
        let text = source
            .page_text(page)
            .map_err(|e| JobError::page(page, e))?;

        let Some(planned) = state.name_page(page, &text) else {
            debug!(page, "skipping blank page");
            continue;
        };

        let bytes = source
            .render_page(page)
            .map_err(|e| JobError::page(page, e))?;
        debug!(page, name = %planned.name, "emitting page");
        blobs.push(NamedBlob {
            name: planned.name,
            page,
            category: planned.category,
            bytes,
        });
    }

    info!(
        emitted = blobs.len(),
        skipped = total as usize - blobs.len(),
        "job finished"
    );
    Ok(blobs)
}

/// Same naming as [`run_job`] without rendering any page.
pub fn plan_job(
    source: &dyn PageSource,
    address: &str,
    pack: PackType,
) -> Result<JobPlan, JobError> {
    let mut state = JobState::new(address, pack)?;
    let total = page_count(source)?;

    let mut pages = vec![state.name_checklist()];
    let mut skipped = Vec::new();

    for page in 2..=total {
        let text = source
            .page_text(page)
            .map_err(|e| JobError::page(page, e))?;
        match state.name_page(page, &text) {
            Some(planned) => pages.push(planned),
            None => skipped.push(page),
        }
    }

    Ok(JobPlan {
        address: state.address,
        pack_type: pack,
        page_count: total,
        pages,
        skipped,
    })
}
