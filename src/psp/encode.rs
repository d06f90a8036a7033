#![forbid(unsafe_code)]

use std::collections::HashSet;
use std::io::Write;

use crate::psp::error::{PspError, PspResult};
use crate::psp::format::{encoded_len, MAGIC, MAX_ENTRIES};
use crate::psp::io::write_u32;

/// V4PSP layout:
/// - [MAGIC 5] "V4PSP"
/// - [u8 entry_count][3 zero bytes]
/// - entries...
///   - [u32 path_len][path bytes UTF-8]
///   - [u32 content_len]
/// - payloads, back to back, in entry order
///
/// Payload offsets are not stored. A reader rebuilds them by summing the content
/// lengths of the preceding entries, starting right after the last record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Reject repeated paths. Lookup by path is only well defined when paths are unique.
    pub strict_paths: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { strict_paths: true }
    }
}

/// Encode `(path, content)` pairs into a container, in the given order.
pub fn encode<P, C>(entries: &[(P, C)]) -> PspResult<Vec<u8>>
where
    P: AsRef<str>,
    C: AsRef<[u8]>,
{
    encode_with(entries, EncodeOptions::default())
}

pub fn encode_with<P, C>(entries: &[(P, C)], opts: EncodeOptions) -> PspResult<Vec<u8>>
where
    P: AsRef<str>,
    C: AsRef<[u8]>,
{
    validate(entries, opts)?;
    let mut out = Vec::with_capacity(encoded_len(entries) as usize);
    write_unchecked(&mut out, entries)?;
    Ok(out)
}

/// Stream a container into `w`. Returns the number of bytes written.
///
/// All entries are validated before the first byte goes out, so a rejected input
/// never leaves a partial container behind.
pub fn encode_to<W, P, C>(w: &mut W, entries: &[(P, C)], opts: EncodeOptions) -> PspResult<u64>
where
    W: Write,
    P: AsRef<str>,
    C: AsRef<[u8]>,
{
    validate(entries, opts)?;
    write_unchecked(w, entries)?;
    Ok(encoded_len(entries))
}

pub(crate) fn validate<P, C>(entries: &[(P, C)], opts: EncodeOptions) -> PspResult<()>
where
    P: AsRef<str>,
    C: AsRef<[u8]>,
{
    if entries.len() > MAX_ENTRIES {
        return Err(PspError::CapacityExceeded {
            count: entries.len(),
            max: MAX_ENTRIES,
        });
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(entries.len());
    for (index, (path, content)) in entries.iter().enumerate() {
        let path = path.as_ref();
        if path.is_empty() {
            return Err(PspError::EmptyPath { index });
        }
        if u32::try_from(path.len()).is_err() {
            return Err(PspError::FieldTooLarge {
                path: path.to_string(),
                field: "path",
                len: path.len(),
            });
        }
        let len = content.as_ref().len();
        if u32::try_from(len).is_err() {
            return Err(PspError::FieldTooLarge {
                path: path.to_string(),
                field: "content",
                len,
            });
        }
        if opts.strict_paths && !seen.insert(path) {
            return Err(PspError::DuplicatePath(path.to_string()));
        }
    }
    Ok(())
}

fn write_unchecked<P, C>(w: &mut dyn Write, entries: &[(P, C)]) -> PspResult<()>
where
    P: AsRef<str>,
    C: AsRef<[u8]>,
{
    w.write_all(&MAGIC)?;
    w.write_all(&[entries.len() as u8, 0, 0, 0])?;

    for (path, content) in entries {
        let p = path.as_ref().as_bytes();
        write_u32(w, p.len() as u32)?;
        w.write_all(p)?;
        write_u32(w, content.as_ref().len() as u32)?;
    }

    for (_, content) in entries {
        w.write_all(content.as_ref())?;
    }
    Ok(())
}
