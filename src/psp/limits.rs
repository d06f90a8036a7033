#![forbid(unsafe_code)]

use std::fmt;

use crate::psp::format::Entry;

/// The game-side loader keeps paths in a 40 byte buffer and refuses any path of
/// this many bytes or more.
pub const LOADER_MAX_PATH_LEN: usize = 39;

/// Size of each of the loader's open-file buffers.
pub const LOADER_MAX_FILE_LEN: u32 = 512 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitKind {
    PathTooLong { len: usize },
    FileTooLarge { len: u32 },
}

/// An entry the loader would refuse even though the container itself is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitViolation {
    pub path: String,
    pub kind: LimitKind,
}

impl fmt::Display for LimitViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LimitKind::PathTooLong { len } => write!(
                f,
                "{}: path is {len} bytes, loader accepts at most {}",
                self.path,
                LOADER_MAX_PATH_LEN - 1
            ),
            LimitKind::FileTooLarge { len } => write!(
                f,
                "{}: {len} bytes, loader buffers hold {LOADER_MAX_FILE_LEN}",
                self.path
            ),
        }
    }
}

pub fn check_loader_limits(entries: &[Entry]) -> Vec<LimitViolation> {
    let mut out = Vec::new();
    for e in entries {
        if e.path.len() >= LOADER_MAX_PATH_LEN {
            out.push(LimitViolation {
                path: e.path.clone(),
                kind: LimitKind::PathTooLong { len: e.path.len() },
            });
        }
        if e.len > LOADER_MAX_FILE_LEN {
            out.push(LimitViolation {
                path: e.path.clone(),
                kind: LimitKind::FileTooLarge { len: e.len },
            });
        }
    }
    out
}
