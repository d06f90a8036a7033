#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::psp::decode::{check_extent, parse_table, Table};
use crate::psp::error::{PspError, PspResult};
use crate::psp::format::Entry;
use crate::psp::io::{ByteSource, SeekSource};

/// A container read through a seekable handle.
///
/// Only the header and the entry table are read on open. Payloads are fetched one
/// at a time by seeking to their derived offset.
#[derive(Debug)]
pub struct Archive<R> {
    inner: R,
    table: Table,
}

impl Archive<BufReader<File>> {
    pub fn open_path(path: &Path) -> PspResult<Self> {
        Self::open(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> Archive<R> {
    pub fn open(mut inner: R) -> PspResult<Self> {
        let (table, total) = {
            let mut src = SeekSource::new(&mut inner)?;
            let total = src.len();
            (parse_table(&mut src)?, total)
        };
        check_extent(&table, total)?;
        Ok(Self { inner, table })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.table.entries
    }

    pub fn find(&self, path: &str) -> Option<&Entry> {
        self.table.entries.iter().find(|e| e.path == path)
    }

    pub fn read_entry(&mut self, path: &str) -> PspResult<Vec<u8>> {
        let (offset, len) = self
            .find(path)
            .map(|e| (e.offset, e.len))
            .ok_or_else(|| PspError::EntryNotFound(path.to_string()))?;
        self.read_at(offset, len)
    }

    pub fn read_index(&mut self, index: usize) -> PspResult<Option<Vec<u8>>> {
        match self.table.entries.get(index).map(|e| (e.offset, e.len)) {
            Some((offset, len)) => self.read_at(offset, len).map(Some),
            None => Ok(None),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_at(&mut self, offset: u64, len: u32) -> PspResult<Vec<u8>> {
        self.inner.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len as usize];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }
}
