#![forbid(unsafe_code)]

//! V4PSP: a flat, uncompressed container for a tree of data files.
//!
//! ```text
//! [MAGIC "V4PSP"][u8 count][3 zero bytes]
//! count x [u32 path_len][path][u32 content_len]
//! payloads, back to back, in table order
//! ```
//!
//! Offsets are derived from the table, so any reader parses the whole table once
//! and then reaches each payload directly.
//!
//! ```
//! use vpsp::psp;
//!
//! let bytes = psp::encode(&[("a.txt", &b"hi"[..]), ("b/c.txt", &b""[..])]).unwrap();
//! let container = psp::decode(&bytes).unwrap();
//! assert_eq!(container.lookup("a.txt").unwrap(), b"hi");
//! assert_eq!(container.list_entries(), vec![("a.txt", 2), ("b/c.txt", 0)]);
//! ```

pub mod psp;
