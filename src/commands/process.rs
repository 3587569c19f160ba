use crate::checklist::archive::{archive_name, assemble};
use crate::checklist::{run_job, validate_address, NamedBlob, PackType};
use crate::pdf::render::RendererChoice;
use crate::pdf::PdfPageSource;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct ProcessOptions {
    pub address: String,
    pub pack_type: String,
    pub output_dir: PathBuf,
    pub unpacked: bool,
    pub renderer: RendererChoice,
}

#[derive(Debug, Serialize)]
pub struct ProcessReport {
    pub output_path: PathBuf,
    pub files: Vec<String>,
}

/// Split a checklist into named pages and write the archive (or directory).
pub fn process<P: AsRef<Path>>(input: P, options: &ProcessOptions) -> Result<ProcessReport> {
    let input = input.as_ref();
    let address = validate_address(&options.address)?;
    let pack: PackType = options.pack_type.parse()?;

    let source = PdfPageSource::open(input, options.renderer)?;
    let blobs = run_job(&source, &options.address, pack)
        .with_context(|| format!("Failed to process {}", input.display()))?;

    std::fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "Failed to create directory: {}",
            options.output_dir.display()
        )
    })?;

    let output_path = if options.unpacked {
        write_unpacked(&blobs, &options.output_dir, &address)?
    } else {
        let archive = assemble(&blobs)?;
        let path = options.output_dir.join(archive_name(&address));
        std::fs::write(&path, archive)
            .with_context(|| format!("Failed to write archive: {}", path.display()))?;
        path
    };

    info!(path = %output_path.display(), files = blobs.len(), "wrote output");

    Ok(ProcessReport {
        output_path,
        files: blobs.into_iter().map(|b| b.name).collect(),
    })
}

fn write_unpacked(blobs: &[NamedBlob], output_dir: &Path, address: &str) -> Result<PathBuf> {
    let archive = archive_name(address);
    let dir_name = archive.strip_suffix(".zip").unwrap_or(&archive);
    let dir = output_dir.join(dir_name);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    for blob in blobs {
        let path = dir.join(&blob.name);
        std::fs::write(&path, &blob.bytes)
            .with_context(|| format!("Failed to save PDF: {}", path.display()))?;
    }
    Ok(dir)
}

pub fn run<P: AsRef<Path>>(input: P, options: &ProcessOptions) -> Result<()> {
    let report = process(input, options)?;

    for name in &report.files {
        println!("  {}", name);
    }
    println!(
        "Split {} page(s) into {}",
        report.files.len(),
        report.output_path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JobError;
    use crate::pdf::document::tests::make_test_pdf;
    use std::io::Cursor;

    fn write_input(dir: &Path, pages: &[&str]) -> PathBuf {
        let path = dir.join("checklist.pdf");
        std::fs::write(&path, make_test_pdf(pages)).unwrap();
        path
    }

    fn options(out: &Path, pack: &str) -> ProcessOptions {
        ProcessOptions {
            address: "2 Ash Way.".to_string(),
            pack_type: pack.to_string(),
            output_dir: out.to_path_buf(),
            unpacked: false,
            renderer: RendererChoice::Auto,
        }
    }

    #[test]
    fn test_writes_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let input = write_input(tmp.path(), &["Cover", "RECHARGE WORK", "Loft hatch", ""]);
        let out = tmp.path().join("out");

        let report = process(&input, &options(&out, "BMD_PACK")).unwrap();
        assert_eq!(
            report.output_path,
            out.join("2 ASH WAY - PROCESSED_CHECKLIST.zip")
        );

        let bytes = std::fs::read(&report.output_path).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<_> = archive.file_names().collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"2 ASH WAY - INSPECTION CHECKLIST.pdf"));
        assert!(names.contains(&"2 ASH WAY - VOID RECHARGEABLE WORKS.pdf"));
        assert!(names.contains(&"2 ASH WAY - VOID BMD WORKS (1).pdf"));
    }

    #[test]
    fn test_writes_unpacked_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let input = write_input(tmp.path(), &["Cover", "Routine"]);
        let mut opts = options(tmp.path(), "AC_GOLD");
        opts.unpacked = true;

        let report = process(&input, &opts).unwrap();
        assert_eq!(
            report.output_path,
            tmp.path().join("2 ASH WAY - PROCESSED_CHECKLIST")
        );
        assert!(report
            .output_path
            .join("2 ASH WAY - AC GOLD MTW (1).pdf")
            .is_file());
    }

    #[test]
    fn test_bad_pack_type_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let input = write_input(tmp.path(), &["Cover"]);
        let out = tmp.path().join("out");

        let err = process(&input, &options(&out, "GOLD")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<JobError>(),
            Some(JobError::InvalidInput(_))
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_non_pdf_input() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("checklist.pdf");
        std::fs::write(&input, b"<html></html>").unwrap();

        let err = process(&input, &options(tmp.path(), "AC_GOLD")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<JobError>(),
            Some(JobError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_empty_address_checked_before_reading_input() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("checklist.pdf");
        std::fs::write(&input, b"<html></html>").unwrap();
        let mut opts = options(tmp.path(), "AC_GOLD");
        opts.address = " .,!? ".to_string();

        let err = process(&input, &opts).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<JobError>(),
            Some(JobError::InvalidInput(_))
        ));
    }
}
