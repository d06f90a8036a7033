#![forbid(unsafe_code)]

use std::io::{Read, Seek};
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::psp::error::{PspError, PspResult};
use crate::psp::path::{normalize_archive_name, normalize_rel_path, prefixed, should_exclude};

/// Largest payload a table record can describe.
const MAX_CONTENT_LEN: u64 = u32::MAX as u64;

/// Upper bound on what is reserved up front for one zip entry.
const PREALLOC_LIMIT: u64 = 64 * 1024;

/// A file to be packed: container path and raw bytes.
pub type SourceEntry = (String, Vec<u8>);

/// How input files are named and filtered before packing.
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    /// Prepended to every container path (e.g. "data/").
    pub prefix: String,
    /// Substrings; a path containing any of them is skipped.
    pub excludes: Vec<String>,
}

impl SourceOptions {
    fn logical(&self, rel: &str) -> Option<String> {
        let logical = prefixed(&self.prefix, rel);
        if should_exclude(&logical, &self.excludes) {
            debug!(path = %logical, "excluded");
            return None;
        }
        Some(logical)
    }
}

/// Collect every regular file under `root`.
///
/// Entries are sorted by path bytes so the same tree always packs to the same
/// container, whatever order the filesystem lists it in.
pub fn collect_dir(root: &Path, opts: &SourceOptions) -> PspResult<Vec<SourceEntry>> {
    let mut files: Vec<SourceEntry> = Vec::new();
    for ent in WalkDir::new(root).follow_links(false).into_iter() {
        let ent = ent.map_err(|e| {
            let msg = e.to_string();
            let io = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, msg));
            PspError::Io(io)
        })?;

        if !ent.file_type().is_file() {
            continue;
        }

        let rel = normalize_rel_path(root, ent.path())?;
        let Some(logical) = opts.logical(&rel) else {
            continue;
        };
        let content = std::fs::read(ent.path())?;
        debug!(path = %logical, len = content.len(), "collected file");
        files.push((logical, content));
    }

    sort_entries(&mut files);
    Ok(files)
}

/// Collect every file entry of a zip archive, in memory.
///
/// Nothing is extracted to disk; directory entries are skipped since the
/// container only records file paths.
pub fn collect_zip<R: Read + Seek>(
    reader: R,
    opts: &SourceOptions,
) -> PspResult<Vec<SourceEntry>> {
    let mut archive = ZipArchive::new(reader)?;
    let mut files: Vec<SourceEntry> = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let rel = normalize_archive_name(file.name())?;
        let Some(logical) = opts.logical(&rel) else {
            continue;
        };
        // The declared size comes from the archive and is only a hint.
        let declared = file.size();
        if declared > MAX_CONTENT_LEN {
            return Err(too_large(logical, declared));
        }
        let mut content = Vec::with_capacity(declared.min(PREALLOC_LIMIT) as usize);
        file.by_ref()
            .take(MAX_CONTENT_LEN + 1)
            .read_to_end(&mut content)?;
        if content.len() as u64 > MAX_CONTENT_LEN {
            return Err(too_large(logical, content.len() as u64));
        }
        debug!(path = %logical, len = content.len(), "collected zip entry");
        files.push((logical, content));
    }

    sort_entries(&mut files);
    Ok(files)
}

fn too_large(path: String, len: u64) -> PspError {
    PspError::FieldTooLarge {
        path,
        field: "content",
        len: usize::try_from(len).unwrap_or(usize::MAX),
    }
}

fn sort_entries(files: &mut [SourceEntry]) {
    files.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
}
