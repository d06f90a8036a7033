#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::psp::decode::decode;
use crate::psp::encode::{encode_to, validate, EncodeOptions};
use crate::psp::error::{PspError, PspResult};
use crate::psp::format::Entry;
use crate::psp::limits::{check_loader_limits, LimitViolation};
use crate::psp::path::safe_join;
use crate::psp::read::Archive;
use crate::psp::source::{collect_dir, collect_zip, SourceEntry, SourceOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackSummary {
    pub entries: usize,
    pub bytes: u64,
}

/// Pack every file under `input` into `output`.
pub fn build(
    input: &Path,
    output: &Path,
    source: &SourceOptions,
    opts: EncodeOptions,
) -> PspResult<PackSummary> {
    if !input.is_dir() {
        return Err(PspError::Invalid(format!(
            "input is not a directory: {}",
            input.display()
        )));
    }
    info!(input = %input.display(), "collecting files");
    let files = collect_dir(input, source)?;
    write_container(output, &files, opts)
}

/// Convert a zip archive into a container without unpacking it to disk.
pub fn repack(
    input_zip: &Path,
    output: &Path,
    source: &SourceOptions,
    opts: EncodeOptions,
) -> PspResult<PackSummary> {
    info!(input = %input_zip.display(), "reading zip archive");
    let files = collect_zip(std::io::BufReader::new(File::open(input_zip)?), source)?;
    write_container(output, &files, opts)
}

fn write_container(
    output: &Path,
    files: &[SourceEntry],
    opts: EncodeOptions,
) -> PspResult<PackSummary> {
    // Fail before touching the output file.
    validate(files, opts)?;

    info!(entries = files.len(), output = %output.display(), "writing container");
    let mut out = BufWriter::new(File::create(output)?);
    let bytes = encode_to(&mut out, files, opts)?;
    out.flush()?;

    info!(entries = files.len(), bytes, "container written");
    Ok(PackSummary {
        entries: files.len(),
        bytes,
    })
}

/// Read the entry table (without reading payloads).
pub fn entries(psp: &Path) -> PspResult<Vec<Entry>> {
    let archive = Archive::open_path(psp)?;
    Ok(archive.entries().to_vec())
}

pub fn list(psp: &Path, verbose: bool) -> PspResult<()> {
    let mut archive = Archive::open_path(psp)?;
    let entries = archive.entries().to_vec();

    for (i, e) in entries.iter().enumerate() {
        if verbose {
            let payload = archive.read_index(i)?.unwrap_or_default();
            println!(
                "{}  off={} len={} blake3={}",
                e.path,
                e.offset,
                e.len,
                blake3::hash(&payload).to_hex()
            );
        } else {
            println!("{}", e.path);
        }
    }
    Ok(())
}

/// Write entries under `output`. With a non-empty `filter`, only entries whose path
/// contains one of the filter strings are written. Returns how many were written.
pub fn extract(psp: &Path, output: &Path, filter: &[String]) -> PspResult<usize> {
    let mut archive = Archive::open_path(psp)?;
    let entries = archive.entries().to_vec();
    std::fs::create_dir_all(output)?;

    let mut written = 0;
    for (i, e) in entries.iter().enumerate() {
        if !filter.is_empty() && !filter.iter().any(|s| e.path.contains(s)) {
            continue;
        }

        let out_path = safe_join(output, &e.path)?;
        let payload = archive
            .read_index(i)?
            .ok_or_else(|| PspError::EntryNotFound(e.path.clone()))?;
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&out_path, &payload)?;
        debug!(path = %e.path, len = e.len, "extracted");
        written += 1;
    }

    info!(written, output = %output.display(), "extract finished");
    Ok(written)
}

/// Full structural check of a container, followed by the loader limit check.
/// With `strict`, any limit violation fails the check.
pub fn verify(psp: &Path, strict: bool) -> PspResult<Vec<LimitViolation>> {
    let data = std::fs::read(psp)?;
    let container = decode(&data)?;

    let violations = check_loader_limits(container.entries());
    for v in &violations {
        warn!("{v}");
    }
    if strict && !violations.is_empty() {
        return Err(PspError::Invalid(format!(
            "{} entries exceed loader limits",
            violations.len()
        )));
    }

    println!("ok: {} entries", container.len());
    Ok(violations)
}
