#![forbid(unsafe_code)]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PspError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("too many entries: {count} (max {max})")]
    CapacityExceeded { count: usize, max: usize },

    #[error("entry #{index} has an empty path")]
    EmptyPath { index: usize },

    #[error("duplicate path: {0}")]
    DuplicatePath(String),

    #[error("{field} of {path} is {len} bytes, does not fit in u32")]
    FieldTooLarge {
        path: String,
        field: &'static str,
        len: usize,
    },

    #[error("bad magic: found \"{}\"", .found.escape_ascii())]
    BadMagic { found: [u8; 5] },

    #[error(
        "malformed header: entry count padding at offset {offset} is {padding:02x?}, \
         expected zeros"
    )]
    MalformedHeader { offset: u64, padding: [u8; 3] },

    #[error(
        "truncated input: {field} at offset {offset} needs {needed} bytes, \
         {available} available"
    )]
    TruncatedInput {
        field: &'static str,
        offset: u64,
        needed: u64,
        available: u64,
    },

    #[error("path at offset {offset} is not valid utf-8")]
    InvalidPath { offset: u64 },

    #[error("trailing data: {extra} unexplained bytes after offset {offset}")]
    TrailingData { offset: u64, extra: u64 },

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error("path is outside root: {0}")]
    Outside(String),

    #[error("invalid psp: {0}")]
    Invalid(String),
}

pub type PspResult<T> = Result<T, PspError>;
