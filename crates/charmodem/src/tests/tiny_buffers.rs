//! Minimal capacities must still produce full, correct output through
//! repeated rounds: output-full is transparent and carry-over byte-exact.

use super::{SPADE_POINTS, SPADE_UTF8};
use crate::{
    CodePoint, ConvError, DecodeIter, DecodeWriter, EncodeIter, EncodeWriter,
    engine::WhatwgEngine,
};

#[test]
fn single_slot_output_decodes_fully() {
    let iter =
        DecodeIter::with_capacities(SPADE_UTF8.iter().copied(), "UTF-8", WhatwgEngine, 4096, 1);
    let points: Vec<CodePoint> = iter.collect::<Result<_, _>>().unwrap();
    assert_eq!(points, SPADE_POINTS);
}

#[test]
fn single_slot_output_handles_supplementary_plane() {
    // four-byte sequences exercise the engine's one-at-a-time path
    let bytes = "😀😀x".as_bytes();
    let iter = DecodeIter::with_capacities(bytes.iter().copied(), "UTF-8", WhatwgEngine, 4096, 1);
    let points: Vec<CodePoint> = iter.collect::<Result<_, _>>().unwrap();
    assert_eq!(points, [0x1F600, 0x1F600, u32::from('x')]);
}

#[test]
fn tiny_staging_carries_split_sequences() {
    // every staging size from "one full sequence" upward splits the spade's
    // three bytes differently across rounds
    for staging in 3..=9 {
        let iter = DecodeIter::with_capacities(
            SPADE_UTF8.iter().copied(),
            "UTF-8",
            WhatwgEngine,
            staging,
            2,
        );
        let points: Vec<CodePoint> = iter.collect::<Result<_, _>>().unwrap();
        assert_eq!(points, SPADE_POINTS, "staging capacity {staging}");
    }
}

#[test]
fn tiny_encode_output_region() {
    // three bytes is exactly one spade; anything smaller could never fit it
    for out in 3..=9 {
        let iter = EncodeIter::with_capacities(
            SPADE_POINTS.iter().copied(),
            "UTF-8",
            WhatwgEngine,
            1024,
            out,
        );
        let bytes: Vec<u8> = iter.collect::<Result<_, _>>().unwrap();
        assert_eq!(bytes, SPADE_UTF8, "output capacity {out}");
    }
}

#[test]
fn tiny_encode_staging() {
    for staging in 1..=4 {
        let iter = EncodeIter::with_capacities(
            SPADE_POINTS.iter().copied(),
            "UTF-8",
            WhatwgEngine,
            staging,
            1024,
        );
        let bytes: Vec<u8> = iter.collect::<Result<_, _>>().unwrap();
        assert_eq!(bytes, SPADE_UTF8, "staging capacity {staging}");
    }
}

#[test]
fn tiny_push_decoding_matches_oneshot() {
    let mut writer = DecodeWriter::with_capacities(Vec::new(), "UTF-8", WhatwgEngine, 5, 2);
    writer.feed(&SPADE_UTF8).unwrap();
    assert_eq!(writer.finish().unwrap(), SPADE_POINTS);
}

#[test]
fn tiny_push_encoding_matches_oneshot() {
    let mut writer = EncodeWriter::with_capacities(Vec::new(), "UTF-8", WhatwgEngine, 2, 4);
    writer.feed(&SPADE_POINTS).unwrap();
    assert_eq!(writer.finish().unwrap(), SPADE_UTF8);
}

#[test]
fn output_too_small_for_one_character_is_a_failure_not_bad_input() {
    // two output bytes can never take the three-byte spade; the input is
    // valid, so the stall must not be reported as an invalid sequence
    let mut writer = EncodeWriter::with_capacities(Vec::new(), "UTF-8", WhatwgEngine, 1024, 2);
    writer.push(0x2660).unwrap();
    assert!(matches!(writer.finish(), Err(ConvError::Failed { .. })));

    let mut iter =
        EncodeIter::with_capacities([0x2660].iter().copied(), "UTF-8", WhatwgEngine, 1024, 2);
    assert!(matches!(iter.next(), Some(Err(ConvError::Failed { .. }))));
}

#[test]
fn utf16_source_with_odd_splits() {
    // two-byte units split across every staging boundary
    let bytes = [0x41, 0x00, 0x16, 0x4E, 0x4C, 0x75]; // "A世界" in UTF-16LE
    for staging in 2..=5 {
        let iter = DecodeIter::with_capacities(
            bytes.iter().copied(),
            "UTF-16LE",
            WhatwgEngine,
            staging,
            1,
        );
        let points: Vec<CodePoint> = iter.collect::<Result<_, _>>().unwrap();
        assert_eq!(points, [0x41, 0x4E16, 0x754C], "staging capacity {staging}");
    }
}
