#![forbid(unsafe_code)]

mod decode;
mod encode;
mod error;
mod format;
mod io;
mod limits;
mod ops;
mod path;
mod read;
mod source;

pub use decode::{decode, Container};
pub use encode::{encode, encode_to, encode_with, EncodeOptions};
pub use error::{PspError, PspResult};
pub use format::{encoded_len, Entry, HEADER_LEN, MAGIC, MAX_ENTRIES};
pub use limits::{
    check_loader_limits, LimitKind, LimitViolation, LOADER_MAX_FILE_LEN, LOADER_MAX_PATH_LEN,
};
pub use read::Archive;
pub use source::{collect_dir, collect_zip, SourceEntry, SourceOptions};

pub use ops::{build, entries, extract, list, repack, verify, PackSummary};
