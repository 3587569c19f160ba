use crate::checklist::job::NamedBlob;
use crate::error::JobError;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub fn archive_name(address: &str) -> String {
    format!("{} - PROCESSED_CHECKLIST.zip", address)
}

/// Pack blobs into a ZIP, one entry per blob, in the given order.
///
/// Entry timestamps are fixed so the same blobs always give the same bytes.
pub fn assemble(blobs: &[NamedBlob]) -> Result<Vec<u8>, JobError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    for blob in blobs {
        writer
            .start_file(blob.name.as_str(), options)
            .map_err(|e| JobError::Archive(format!("{}: {}", blob.name, e)))?;
        writer
            .write_all(&blob.bytes)
            .map_err(|e| JobError::Archive(format!("{}: {}", blob.name, e)))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| JobError::Archive(e.to_string()))?;
    Ok(cursor.into_inner())
}
