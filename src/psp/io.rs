#![forbid(unsafe_code)]

use std::io::{Read, Seek, SeekFrom, Write};

use crate::psp::error::{PspError, PspResult};

/// A bounded, position-tracking source the table parser reads from.
///
/// Every read is checked against the known total length first, so running out
/// of bytes is reported as `TruncatedInput` with the field and offset instead of
/// a bare EOF.
pub(crate) trait ByteSource {
    fn position(&self) -> u64;
    fn len(&self) -> u64;
    fn fill(&mut self, buf: &mut [u8]) -> PspResult<()>;

    fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.position())
    }
}

pub(crate) struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl ByteSource for SliceSource<'_> {
    fn position(&self) -> u64 {
        self.pos as u64
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn fill(&mut self, buf: &mut [u8]) -> PspResult<()> {
        let end = self.pos + buf.len();
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(())
    }
}

/// Reads from the start of a seekable stream whose length was measured up front.
pub(crate) struct SeekSource<'r, R> {
    inner: &'r mut R,
    pos: u64,
    len: u64,
}

impl<'r, R: Read + Seek> SeekSource<'r, R> {
    pub fn new(inner: &'r mut R) -> PspResult<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, pos: 0, len })
    }
}

impl<R: Read + Seek> ByteSource for SeekSource<'_, R> {
    fn position(&self) -> u64 {
        self.pos
    }

    fn len(&self) -> u64 {
        self.len
    }

    fn fill(&mut self, buf: &mut [u8]) -> PspResult<()> {
        self.inner.read_exact(buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }
}

fn ensure(src: &dyn ByteSource, needed: u64, field: &'static str) -> PspResult<()> {
    let available = src.remaining();
    if needed > available {
        return Err(PspError::TruncatedInput {
            field,
            offset: src.position(),
            needed,
            available,
        });
    }
    Ok(())
}

pub(crate) fn read_exact<const N: usize>(
    src: &mut dyn ByteSource,
    field: &'static str,
) -> PspResult<[u8; N]> {
    ensure(src, N as u64, field)?;
    let mut buf = [0u8; N];
    src.fill(&mut buf)?;
    Ok(buf)
}

pub(crate) fn read_u32(src: &mut dyn ByteSource, field: &'static str) -> PspResult<u32> {
    Ok(u32::from_le_bytes(read_exact::<4>(src, field)?))
}

/// Reads `len` bytes, checking availability before allocating.
pub(crate) fn read_vec(
    src: &mut dyn ByteSource,
    len: u32,
    field: &'static str,
) -> PspResult<Vec<u8>> {
    ensure(src, u64::from(len), field)?;
    let mut buf = vec![0u8; len as usize];
    src.fill(&mut buf)?;
    Ok(buf)
}

pub(crate) fn write_u32(w: &mut dyn Write, v: u32) -> PspResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}
