#![allow(missing_docs)]
use charmodem::{ConvError, DecodeIter, DecodeWriter, EncodeIter, EncodeWriter, decode, encode};

const POINTS: [u32; 7] = [0x66, 0x6F, 0x6F, 0x2660, 0x62, 0x61, 0x72];
const UTF8: [u8; 9] = [0x66, 0x6F, 0x6F, 0xE2, 0x99, 0xA0, 0x62, 0x61, 0x72];

#[test]
fn oneshot_roundtrip() {
    let bytes = encode(&POINTS, "UTF-8").unwrap();
    assert_eq!(bytes, UTF8);
    assert_eq!(decode(&bytes, "UTF-8").unwrap(), POINTS);
}

#[test]
fn pull_adapters_match_oneshots() {
    let bytes: Vec<u8> = EncodeIter::new(POINTS.iter().copied(), "UTF-8")
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(bytes, UTF8);

    let points: Vec<u32> = DecodeIter::new(bytes.iter().copied(), "UTF-8")
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(points, POINTS);
}

#[test]
fn push_adapters_match_oneshots() {
    let mut encoder = EncodeWriter::new(Vec::new(), "UTF-8");
    encoder.feed(&POINTS).unwrap();
    assert_eq!(encoder.finish().unwrap(), UTF8);

    let mut decoder = DecodeWriter::new(Vec::new(), "UTF-8");
    decoder.feed(&UTF8).unwrap();
    assert_eq!(decoder.finish().unwrap(), POINTS);
}

#[test]
fn decoder_works_as_io_writer() {
    use std::io::Write as _;

    let mut decoder = DecodeWriter::new(Vec::new(), "UTF-8");
    decoder.write_all(&UTF8[..4]).unwrap();
    decoder.write_all(&UTF8[4..]).unwrap();
    assert_eq!(decoder.finish().unwrap(), POINTS);
}

#[test]
fn failures_carry_a_message() {
    let err = decode(b"\xFF", "UTF-8").unwrap_err();
    assert!(matches!(err, ConvError::InvalidSequence { .. }));
    assert!(err.to_string().contains("invalid character sequence"));
}
