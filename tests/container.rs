//! Container round-trip and corruption properties.

use proptest::prelude::*;
use vpsp::psp::{self, EncodeOptions, PspError};

fn entries_strategy() -> impl Strategy<Value = Vec<(String, Vec<u8>)>> {
    prop::collection::btree_map(
        "[a-z0-9_]{1,12}(/[a-z0-9_.]{1,12}){0,2}",
        prop::collection::vec(any::<u8>(), 0..64),
        0..40,
    )
    .prop_map(|m| m.into_iter().collect::<Vec<_>>())
    .prop_flat_map(|v| Just(v).prop_shuffle())
}

proptest! {
    #[test]
    fn round_trip_preserves_order_and_bytes(entries in entries_strategy()) {
        let bytes = psp::encode(&entries).unwrap();
        prop_assert_eq!(bytes.len() as u64, psp::encoded_len(&entries));

        let container = psp::decode(&bytes).unwrap();
        prop_assert_eq!(container.len(), entries.len());
        for ((path, content), (entry, payload)) in entries.iter().zip(container.iter()) {
            prop_assert_eq!(&entry.path, path);
            prop_assert_eq!(entry.len as usize, content.len());
            prop_assert_eq!(payload, content.as_slice());
        }
    }

    #[test]
    fn consecutive_offsets_differ_by_size(entries in entries_strategy()) {
        let bytes = psp::encode(&entries).unwrap();
        let container = psp::decode(&bytes).unwrap();
        for pair in container.entries().windows(2) {
            prop_assert_eq!(pair[1].offset, pair[0].offset + u64::from(pair[0].len));
        }
    }

    #[test]
    fn any_cut_inside_the_payload_is_truncation(
        entries in entries_strategy(),
        cut in any::<prop::sample::Index>(),
    ) {
        let bytes = psp::encode(&entries).unwrap();
        let start = psp::decode(&bytes).unwrap().payload_start() as usize;
        prop_assume!(bytes.len() > start);

        let at = start + cut.index(bytes.len() - start);
        let truncated = psp::decode(&bytes[..at]);
        prop_assert!(
            matches!(truncated, Err(PspError::TruncatedInput { .. })),
            "unexpected result: {:?}",
            truncated
        );
    }
}

#[test]
fn scenario_two_entries() {
    let bytes = psp::encode(&[("a.txt", &b"hi"[..]), ("b/c.txt", &b""[..])]).unwrap();
    assert_eq!(&bytes[..5], b"V4PSP");
    assert_eq!(bytes[5..9], [2u8, 0, 0, 0]);
    assert_eq!(&bytes[bytes.len() - 2..], b"hi");

    let container = psp::decode(&bytes).unwrap();
    let listed = container.list_entries();
    assert_eq!(listed, vec![("a.txt", 2), ("b/c.txt", 0)]);
    assert_eq!(container.entries()[1].offset, container.entries()[0].offset + 2);
}

#[test]
fn scenario_empty() {
    let none: Vec<(String, Vec<u8>)> = Vec::new();
    let bytes = psp::encode(&none).unwrap();
    assert_eq!(bytes.len(), 9);
    assert!(psp::decode(&bytes).unwrap().is_empty());
}

#[test]
fn capacity_boundary() {
    let make = |n: usize| -> Vec<(String, Vec<u8>)> {
        (0..n).map(|i| (format!("file{i:03}.bin"), vec![0u8; i % 7])).collect()
    };

    let ok = psp::encode(&make(255)).unwrap();
    let container = psp::decode(&ok).unwrap();
    assert_eq!(container.len(), 255);
    assert_eq!(container.lookup("file254.bin").unwrap().len(), 254 % 7);

    assert!(matches!(
        psp::encode(&make(256)),
        Err(PspError::CapacityExceeded { count: 256, .. })
    ));
}

#[test]
fn lenient_encoding_keeps_first_match_on_lookup() {
    let entries = [("dup", &b"first"[..]), ("dup", &b"second"[..])];
    let bytes = psp::encode_with(&entries, EncodeOptions { strict_paths: false }).unwrap();
    let container = psp::decode(&bytes).unwrap();
    assert_eq!(container.lookup("dup").unwrap(), b"first");
    assert_eq!(container.get(1).unwrap().1, b"second");
}

#[test]
fn decoded_container_is_shareable_across_threads() {
    let bytes = psp::encode(&[("x", vec![1u8; 1000]), ("y", vec![2u8; 10])]).unwrap();
    let container = psp::decode(&bytes).unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                assert_eq!(container.lookup("x").unwrap(), &[1u8; 1000][..]);
                assert_eq!(container.lookup("y").unwrap(), &[2u8; 10][..]);
            });
        }
    });
}
