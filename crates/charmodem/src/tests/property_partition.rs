use quickcheck::QuickCheck;
use quickcheck_macros::quickcheck;

use crate::{CodePoint, DecodeWriter, EncodeWriter, decode, encode};

fn test_count() -> u64 {
    if is_ci::cached() { 1_000 } else { 200 }
}

/// Property: feeding UTF-8 text to the push decoder in arbitrary chunk sizes,
/// with an explicit flush after every chunk, yields exactly the one-shot
/// decoding of the whole input. Validates byte-exact carry-over.
#[test]
fn decode_partition_quickcheck() {
    fn prop(text: String, splits: Vec<usize>) -> bool {
        let bytes = text.as_bytes();
        let expected = decode(bytes, "UTF-8").unwrap();

        let mut writer = DecodeWriter::new(Vec::new(), "UTF-8");
        let mut idx = 0;
        for split in splits {
            if idx == bytes.len() {
                break;
            }
            let size = 1 + split % (bytes.len() - idx);
            writer.feed(&bytes[idx..idx + size]).unwrap();
            // partial sequences must survive an explicit mid-stream flush
            writer.flush().unwrap();
            idx += size;
        }
        writer.feed(&bytes[idx..]).unwrap();
        writer.finish().unwrap() == expected
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(String, Vec<usize>) -> bool);
}

/// Property: the push encoder is chunk-size independent too, and its output
/// equals the UTF-8 bytes of the original text.
#[test]
fn encode_partition_quickcheck() {
    fn prop(text: String, splits: Vec<usize>) -> bool {
        let points: Vec<CodePoint> = text.chars().map(u32::from).collect();
        let expected = encode(&points, "UTF-8").unwrap();
        if expected != text.as_bytes() {
            return false;
        }

        let mut writer = EncodeWriter::new(Vec::new(), "UTF-8");
        let mut idx = 0;
        for split in splits {
            if idx == points.len() {
                break;
            }
            let size = 1 + split % (points.len() - idx);
            writer.feed(&points[idx..idx + size]).unwrap();
            idx += size;
        }
        writer.feed(&points[idx..]).unwrap();
        writer.finish().unwrap() == expected
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(String, Vec<usize>) -> bool);
}

/// Property: encode-then-decode is the identity on representable sequences.
#[quickcheck]
fn utf8_roundtrip_quickcheck(text: String) -> bool {
    let points: Vec<CodePoint> = text.chars().map(u32::from).collect();
    let bytes = encode(&points, "UTF-8").unwrap();
    decode(&bytes, "UTF-8").unwrap() == points
}

/// Property: every byte sequence decodes under windows-1252 and the mapping
/// is reversible, so decode-then-encode is the identity on raw bytes.
#[quickcheck]
fn windows_1252_bytes_roundtrip_quickcheck(bytes: Vec<u8>) -> bool {
    let points = decode(&bytes, "windows-1252").unwrap();
    encode(&points, "windows-1252").unwrap() == bytes
}
