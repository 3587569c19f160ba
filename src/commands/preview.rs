use crate::checklist::{plan_job, validate_address, JobPlan, PackType};
use crate::pdf::render::RendererChoice;
use crate::pdf::PdfPageSource;
use anyhow::{Context, Result};
use std::path::Path;

/// Classify every page and report the names a real run would produce.
pub fn preview<P: AsRef<Path>>(input: P, address: &str, pack_type: &str) -> Result<JobPlan> {
    let input = input.as_ref();
    validate_address(address)?;
    let pack: PackType = pack_type.parse()?;
    let source = PdfPageSource::open(input, RendererChoice::Auto)?;
    let plan = plan_job(&source, address, pack)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    Ok(plan)
}

pub fn run<P: AsRef<Path>>(input: P, address: &str, pack_type: &str) -> Result<()> {
    let plan = preview(input, address, pack_type)?;

    println!("Address: {}", plan.address);
    println!("Pack: {}", plan.pack_type);
    println!("Pages: {}", plan.page_count);
    println!();

    for page in &plan.pages {
        println!("p{}: {}", page.page, page.name);
    }

    if !plan.skipped.is_empty() {
        let skipped: Vec<_> = plan.skipped.iter().map(|p| p.to_string()).collect();
        println!("\nSkipped blank page(s): {}", skipped.join(", "));
    }

    Ok(())
}
