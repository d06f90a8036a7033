#![forbid(unsafe_code)]

use crate::psp::error::{PspError, PspResult};
use crate::psp::format::{assign_offsets, Entry, MAGIC};
use crate::psp::io::{read_exact, read_u32, read_vec, ByteSource, SliceSource};

/// Header and entry table, with offsets resolved.
#[derive(Debug, Clone)]
pub(crate) struct Table {
    pub entries: Vec<Entry>,
    pub payload_start: u64,
}

impl Table {
    pub fn payload_end(&self) -> u64 {
        self.entries.last().map_or(self.payload_start, Entry::end)
    }
}

pub(crate) fn parse_table(src: &mut dyn ByteSource) -> PspResult<Table> {
    let magic = read_exact::<5>(src, "magic")?;
    if magic != MAGIC {
        return Err(PspError::BadMagic { found: magic });
    }

    let count_at = src.position();
    let count = read_exact::<4>(src, "entry_count")?;
    if count[1..].iter().any(|&b| b != 0) {
        return Err(PspError::MalformedHeader {
            offset: count_at + 1,
            padding: [count[1], count[2], count[3]],
        });
    }

    let n = count[0] as usize;
    let mut records: Vec<(String, u32)> = Vec::with_capacity(n);
    for _ in 0..n {
        let path_len = read_u32(src, "path_length")?;
        let path_at = src.position();
        let path = String::from_utf8(read_vec(src, path_len, "path")?)
            .map_err(|_| PspError::InvalidPath { offset: path_at })?;
        let len = read_u32(src, "content_length")?;
        records.push((path, len));
    }

    let payload_start = src.position();
    Ok(Table {
        entries: assign_offsets(records, payload_start),
        payload_start,
    })
}

/// The table must account for every byte of the input: no missing payload bytes,
/// nothing after the last payload.
pub(crate) fn check_extent(table: &Table, total: u64) -> PspResult<()> {
    if let Some(e) = table.entries.iter().find(|e| e.end() > total) {
        return Err(PspError::TruncatedInput {
            field: "payload",
            offset: e.offset,
            needed: u64::from(e.len),
            available: total.saturating_sub(e.offset),
        });
    }

    let end = table.payload_end();
    if end < total {
        return Err(PspError::TrailingData {
            offset: end,
            extra: total - end,
        });
    }
    Ok(())
}

/// A validated container borrowing its bytes.
///
/// Parsing happens once in [`decode`]; afterwards every payload is a sub-slice of
/// the input, found by index in O(1) or by path with a linear scan.
#[derive(Debug, Clone)]
pub struct Container<'a> {
    data: &'a [u8],
    table: Table,
}

pub fn decode(data: &[u8]) -> PspResult<Container<'_>> {
    let table = parse_table(&mut SliceSource::new(data))?;
    check_extent(&table, data.len() as u64)?;
    Ok(Container { data, table })
}

impl<'a> Container<'a> {
    pub fn entries(&self) -> &[Entry] {
        &self.table.entries
    }

    pub fn len(&self) -> usize {
        self.table.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.entries.is_empty()
    }

    /// Absolute offset of the first payload byte (end of the entry table).
    pub fn payload_start(&self) -> u64 {
        self.table.payload_start
    }

    /// `(path, size)` in table order.
    pub fn list_entries(&self) -> Vec<(&str, u32)> {
        self.table
            .entries
            .iter()
            .map(|e| (e.path.as_str(), e.len))
            .collect()
    }

    pub fn find(&self, path: &str) -> Option<&Entry> {
        self.table.entries.iter().find(|e| e.path == path)
    }

    pub fn lookup(&self, path: &str) -> PspResult<&'a [u8]> {
        self.find(path)
            .map(|e| self.payload(e))
            .ok_or_else(|| PspError::EntryNotFound(path.to_string()))
    }

    pub fn get(&self, index: usize) -> Option<(&Entry, &'a [u8])> {
        self.table.entries.get(index).map(|e| (e, self.payload(e)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Entry, &'a [u8])> + '_ {
        self.table.entries.iter().map(|e| (e, self.payload(e)))
    }

    fn payload(&self, e: &Entry) -> &'a [u8] {
        // Ranges were checked against the input length in `decode`.
        &self.data[e.offset as usize..e.end() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psp::encode::encode;

    fn sample() -> Vec<u8> {
        encode(&[("a.txt", &b"hi"[..]), ("b/c.txt", &b""[..])]).unwrap()
    }

    #[test]
    fn offsets_follow_the_table() {
        let data = sample();
        let c = decode(&data).unwrap();
        assert_eq!(c.payload_start(), 37);
        assert_eq!(c.entries()[0].offset, 37);
        assert_eq!(c.entries()[1].offset, 39);
        assert_eq!(c.list_entries(), vec![("a.txt", 2), ("b/c.txt", 0)]);
    }

    #[test]
    fn lookup_by_path_and_index() {
        let data = sample();
        let c = decode(&data).unwrap();
        assert_eq!(c.lookup("a.txt").unwrap(), b"hi");
        assert_eq!(c.lookup("b/c.txt").unwrap(), b"");
        assert_eq!(c.get(0).map(|(_, b)| b), Some(&b"hi"[..]));
        assert!(c.get(2).is_none());
        assert!(matches!(c.lookup("nope"), Err(PspError::EntryNotFound(p)) if p == "nope"));
    }

    #[test]
    fn header_only_decodes_to_nothing() {
        let c = decode(b"V4PSP\0\0\0\0").unwrap();
        assert!(c.is_empty());
        assert_eq!(c.payload_start(), 9);
    }

    #[test]
    fn every_magic_byte_is_checked() {
        let data = sample();
        for i in 0..5 {
            let mut bad = data.clone();
            bad[i] ^= 0x20;
            assert!(matches!(decode(&bad), Err(PspError::BadMagic { .. })), "byte {i}");
        }
    }

    #[test]
    fn short_input_is_truncated_not_bad_magic() {
        assert!(matches!(
            decode(b"V4P"),
            Err(PspError::TruncatedInput { field: "magic", .. })
        ));
    }

    #[test]
    fn nonzero_padding_is_malformed() {
        let mut data = sample();
        data[7] = 1;
        match decode(&data) {
            Err(PspError::MalformedHeader { offset, padding }) => {
                assert_eq!(offset, 6);
                assert_eq!(padding, [0, 1, 0]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn truncated_payload_names_the_entry_offset() {
        let data = sample();
        match decode(&data[..data.len() - 1]) {
            Err(PspError::TruncatedInput {
                field,
                offset,
                needed,
                available,
            }) => {
                assert_eq!(field, "payload");
                assert_eq!(offset, 37);
                assert_eq!(needed, 2);
                assert_eq!(available, 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn truncated_table_is_reported() {
        let data = sample();
        assert!(matches!(
            decode(&data[..20]),
            Err(PspError::TruncatedInput { field: "content_length", offset: 18, .. })
        ));
    }

    #[test]
    fn oversized_path_length_is_truncation() {
        let mut data = b"V4PSP\x01\0\0\0".to_vec();
        data.extend_from_slice(&1000u32.to_le_bytes());
        data.extend_from_slice(b"abc");
        assert!(matches!(
            decode(&data),
            Err(PspError::TruncatedInput { field: "path", needed: 1000, .. })
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut data = sample();
        data.extend_from_slice(b"xyz");
        assert!(matches!(
            decode(&data),
            Err(PspError::TrailingData { offset: 39, extra: 3 })
        ));
    }

    #[test]
    fn non_utf8_path_is_rejected() {
        let mut data = b"V4PSP\x01\0\0\0".to_vec();
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&[0xff, 0xfe]);
        data.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(decode(&data), Err(PspError::InvalidPath { offset: 13 })));
    }

    #[test]
    fn repeated_lookup_is_stable() {
        let data = sample();
        let c = decode(&data).unwrap();
        let first = c.lookup("a.txt").unwrap();
        let second = c.lookup("a.txt").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_ptr(), second.as_ptr());
    }
}
