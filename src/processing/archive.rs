//! ZIP export of converted images.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::core::ConversionResult;
use crate::utils::{ConverterResult, extract_filename};

/// Packages every converted item into one ZIP archive, in result order.
///
/// Entries are stored uncompressed with a fixed timestamp, so the same
/// results always produce the same bytes. Failed items are skipped and an
/// empty list yields an empty archive.
pub fn export_zip(results: &[ConversionResult]) -> ConverterResult<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let entries = output_entries(results);

    for (name, data) in &entries {
        writer.start_file(name.as_str(), options)?;
        writer.write_all(data)?;
    }

    let archive = writer.finish()?.into_inner();
    debug!("Archived {} images ({} bytes)", entries.len(), archive.len());
    Ok(archive)
}

/// Output names and payloads for the converted items, in result order.
///
/// Names that collide (`a.png` and `a.jpg` both become `a.webp`) get a
/// numeric suffix: `a-2.webp`, `a-3.webp`. Directory parts are dropped first,
/// so `x/a.webp` collides with `a.webp` too. Archive members and files saved
/// one by one use the same names.
pub fn output_entries(results: &[ConversionResult]) -> Vec<(String, &[u8])> {
    let mut taken = HashSet::new();
    results
        .iter()
        .filter_map(|r| r.converted_bytes().map(|data| (r.filename.as_str(), data)))
        .map(|(name, data)| (unique_name(extract_filename(name), &mut taken), data))
        .collect()
}

fn unique_name(name: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.to_string()) {
        return name.to_string();
    }

    let (stem, ext) = match name.rfind('.') {
        Some(dot) => (&name[..dot], &name[dot..]),
        None => (name, ""),
    };
    let mut n = 2;
    loop {
        let candidate = format!("{stem}-{n}{ext}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
