#![forbid(unsafe_code)]

use std::ops::Range;

/// V4PSP header magic.
pub const MAGIC: [u8; 5] = *b"V4PSP";

/// Width of the entry count field. Only the first byte carries the count.
pub const COUNT_FIELD_LEN: usize = 4;

/// Magic plus entry count field.
pub const HEADER_LEN: usize = MAGIC.len() + COUNT_FIELD_LEN;

/// The count is a single byte on disk.
pub const MAX_ENTRIES: usize = u8::MAX as usize;

/// `path_length` and `content_length` of every table record.
pub(crate) const RECORD_OVERHEAD: usize = 4 + 4;

/// One entry of a parsed table.
///
/// `offset` is absolute within the container. It is never stored on disk; it is
/// rebuilt from the lengths of the entries that precede this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: String,
    pub offset: u64,
    pub len: u32,
}

impl Entry {
    pub fn end(&self) -> u64 {
        self.offset + u64::from(self.len)
    }

    pub fn range(&self) -> Range<u64> {
        self.offset..self.end()
    }
}

/// Size of the table record for a path of `path_len` bytes.
pub(crate) fn record_len(path_len: usize) -> usize {
    RECORD_OVERHEAD + path_len
}

/// Total container size for the given `(path, content)` pairs.
pub fn encoded_len<P, C>(entries: &[(P, C)]) -> u64
where
    P: AsRef<str>,
    C: AsRef<[u8]>,
{
    let table: u64 = entries
        .iter()
        .map(|(p, _)| record_len(p.as_ref().len()) as u64)
        .sum();
    let payload: u64 = entries.iter().map(|(_, c)| c.as_ref().len() as u64).sum();
    HEADER_LEN as u64 + table + payload
}

/// Assign payload offsets to `(path, len)` records, starting at `payload_start`.
pub(crate) fn assign_offsets(records: Vec<(String, u32)>, payload_start: u64) -> Vec<Entry> {
    let mut offset = payload_start;
    records
        .into_iter()
        .map(|(path, len)| {
            let e = Entry { path, offset, len };
            offset += u64::from(len);
            e
        })
        .collect()
}
