//! Default conversion engine backed by the WHATWG Encoding Standard registry.

use encoding_rs::{Decoder, DecoderResult, EncoderResult, Encoding};

use super::{Conversion, Converted, ConvertStatus, Engine};
use crate::error::ConvError;

/// Longest tail worth probing for a clean character boundary. No supported
/// encoding holds more pending bytes than this in an incomplete sequence.
const MAX_SEQUENCE_TAIL: usize = 8;

/// Conversion engine over [`encoding_rs`].
///
/// The external side of a name pair is resolved as a WHATWG label; the other
/// side must be one of the UTF-32 pivot names (`"UTF-32"` for native order,
/// `"UTF-32LE"`, `"UTF-32BE"`).
///
/// Semantics mirror a freshly opened `iconv`-style handle per call: every
/// `convert` runs a new decoder or encoder, so shift state of stateful
/// encodings such as ISO-2022-JP does not survive a round boundary (the same
/// limitation a per-round reopened handle has). Decoders are created without
/// byte-order-mark sniffing: a mark in the input decodes as ordinary U+FEFF
/// content, and none is ever produced on output.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhatwgEngine;

impl Engine for WhatwgEngine {
    type Conversion = WhatwgConversion;

    fn open(&self, from: &str, to: &str) -> Result<WhatwgConversion, ConvError> {
        let unsupported = || ConvError::Init {
            from: from.to_owned(),
            to: to.to_owned(),
        };
        if let Some(order) = pivot_order(to) {
            // Bytes in `from` decoded to pivot code points.
            let encoding = Encoding::for_label(from.as_bytes()).ok_or_else(unsupported)?;
            Ok(WhatwgConversion {
                encoding,
                order,
                dir: Dir::Decode,
            })
        } else if let Some(order) = pivot_order(from) {
            // Pivot code points encoded to bytes in `to`. The standard
            // defines no encoder for UTF-16 or replacement; `new_encoder`
            // would silently substitute UTF-8, so refuse those here.
            let encoding = Encoding::for_label(to.as_bytes()).ok_or_else(unsupported)?;
            if encoding.output_encoding() != encoding {
                return Err(unsupported());
            }
            Ok(WhatwgConversion {
                encoding,
                order,
                dir: Dir::Encode,
            })
        } else {
            Err(unsupported())
        }
    }
}

/// One resolved conversion pair.
#[derive(Debug)]
pub struct WhatwgConversion {
    encoding: &'static Encoding,
    order: ByteOrder,
    dir: Dir,
}

impl Conversion for WhatwgConversion {
    fn convert(&mut self, input: &[u8], output: &mut [u8]) -> Converted {
        match self.dir {
            Dir::Decode => decode_region(self.encoding, self.order, input, output),
            Dir::Encode => encode_region(self.encoding, self.order, input, output),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Dir {
    Decode,
    Encode,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    const NATIVE: Self = if cfg!(target_endian = "little") {
        Self::Little
    } else {
        Self::Big
    };

    fn put(self, value: u32, out: &mut [u8]) {
        let bytes = match self {
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        };
        out[..4].copy_from_slice(&bytes);
    }

    fn get(self, bytes: &[u8]) -> u32 {
        let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
        match self {
            Self::Little => u32::from_le_bytes(raw),
            Self::Big => u32::from_be_bytes(raw),
        }
    }
}

fn pivot_order(label: &str) -> Option<ByteOrder> {
    match label {
        "UTF-32" => Some(ByteOrder::NATIVE),
        "UTF-32LE" => Some(ByteOrder::Little),
        "UTF-32BE" => Some(ByteOrder::Big),
        _ => None,
    }
}

fn decode_region(
    encoding: &'static Encoding,
    order: ByteOrder,
    input: &[u8],
    output: &mut [u8],
) -> Converted {
    let slots = output.len() / 4;
    if input.is_empty() || slots == 0 {
        let status = if input.is_empty() {
            ConvertStatus::Exhausted
        } else {
            ConvertStatus::OutputFull
        };
        return Converted {
            consumed: 0,
            produced: 0,
            status,
        };
    }

    // `slots` UTF-16 units hold at most `slots` code points, so the produced
    // count below can never overflow the output region.
    let mut units = vec![0u16; slots];
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let (result, read, written) =
        decoder.decode_to_utf16_without_replacement(input, &mut units, false);

    let status = match result {
        DecoderResult::Malformed(..) => {
            return Converted {
                consumed: read,
                produced: 0,
                status: ConvertStatus::Malformed,
            };
        }
        DecoderResult::OutputFull if written == 0 => {
            // A supplementary-plane character needs two units at once, which
            // a single-slot output region cannot take through the bulk call.
            // Decode exactly one code point instead.
            return decode_one(encoding, order, input, output);
        }
        DecoderResult::OutputFull => ConvertStatus::OutputFull,
        DecoderResult::InputEmpty => ConvertStatus::Exhausted,
    };

    // Bytes the decoder buffered as an incomplete trailing sequence belong to
    // the caller's remainder, not to `consumed`.
    let pending = pending_bytes(encoding, &mut decoder, input, read);
    debug_assert!(pending <= read);

    let mut produced = 0;
    let mut iter = units[..written].iter().copied();
    while let Some(unit) = iter.next() {
        let scalar = if (0xD800..0xDC00).contains(&unit) {
            let Some(low) = iter.next() else {
                // The decoder never splits a surrogate pair across calls.
                return Converted {
                    consumed: 0,
                    produced: 0,
                    status: ConvertStatus::Failed,
                };
            };
            0x1_0000 + (((u32::from(unit) - 0xD800) << 10) | (u32::from(low) - 0xDC00))
        } else {
            u32::from(unit)
        };
        order.put(scalar, &mut output[produced..]);
        produced += 4;
    }

    Converted {
        consumed: read - pending,
        produced,
        status,
    }
}

/// Decodes exactly one code point, feeding the decoder a byte at a time so
/// that a supplementary-plane character lands in a single four-byte slot.
fn decode_one(
    encoding: &'static Encoding,
    order: ByteOrder,
    input: &[u8],
    output: &mut [u8],
) -> Converted {
    debug_assert!(output.len() >= 4);
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut pair = [0u16; 2];
    let mut read = 0;
    let mut fed = 0;
    while fed < input.len() {
        let (result, r, written) =
            decoder.decode_to_utf16_without_replacement(&input[fed..=fed], &mut pair, false);
        fed += 1;
        read += r;
        if matches!(result, DecoderResult::Malformed(..)) {
            return Converted {
                consumed: read,
                produced: 0,
                status: ConvertStatus::Malformed,
            };
        }
        if written == 0 {
            continue;
        }
        let scalar = if written == 2 {
            0x1_0000 + (((u32::from(pair[0]) - 0xD800) << 10) | (u32::from(pair[1]) - 0xDC00))
        } else {
            u32::from(pair[0])
        };
        order.put(scalar, output);
        let status = if fed == input.len() {
            ConvertStatus::Exhausted
        } else {
            ConvertStatus::OutputFull
        };
        return Converted {
            consumed: read,
            produced: 4,
            status,
        };
    }
    // Input ran out inside one sequence; it stays with the caller.
    Converted {
        consumed: 0,
        produced: 0,
        status: ConvertStatus::Exhausted,
    }
}

/// Measures how many bytes the decoder is holding as an incomplete trailing
/// sequence. An end-of-stream probe over empty input reports them as a
/// malformed sequence without touching the input itself.
fn pending_bytes(
    encoding: &'static Encoding,
    decoder: &mut Decoder,
    input: &[u8],
    read: usize,
) -> usize {
    let mut scratch = [0u16; 8];
    let mut pending = 0;
    let mut simple = true;
    loop {
        let (result, _, written) =
            decoder.decode_to_utf16_without_replacement(&[], &mut scratch, true);
        if written > 0 {
            simple = false;
        }
        match result {
            DecoderResult::Malformed(bad, extra) => {
                if pending > 0 {
                    simple = false;
                }
                pending += usize::from(bad) + usize::from(extra);
            }
            DecoderResult::InputEmpty => break,
            DecoderResult::OutputFull => simple = false,
        }
    }
    if simple {
        return pending;
    }
    // Rare: while flushing, the decoder re-interpreted part of its pending
    // bytes as content (multi-byte restarts such as gb18030's four-byte
    // forms). The probe result is then not the true remainder, so find the
    // nearest clean character boundary directly.
    for tail in 1..=read.min(MAX_SEQUENCE_TAIL) {
        if ends_on_boundary(encoding, &input[..read - tail]) {
            return tail;
        }
    }
    pending
}

/// Whether decoding `prefix` from a fresh state ends exactly on a character
/// boundary.
fn ends_on_boundary(encoding: &'static Encoding, prefix: &[u8]) -> bool {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut scratch = [0u16; 64];
    let mut pos = 0;
    loop {
        let (result, r, _) =
            decoder.decode_to_utf16_without_replacement(&prefix[pos..], &mut scratch, true);
        pos += r;
        match result {
            DecoderResult::InputEmpty => return true,
            DecoderResult::Malformed(..) => return false,
            DecoderResult::OutputFull => {}
        }
    }
}

fn encode_region(
    encoding: &'static Encoding,
    order: ByteOrder,
    input: &[u8],
    output: &mut [u8],
) -> Converted {
    let mut encoder = encoding.new_encoder();
    let mut consumed = 0;
    let mut produced = 0;
    while consumed + 4 <= input.len() {
        let scalar = order.get(&input[consumed..consumed + 4]);
        let Some(ch) = char::from_u32(scalar) else {
            // Surrogates and out-of-range values are bad UTF-32 input.
            return Converted {
                consumed,
                produced,
                status: ConvertStatus::Malformed,
            };
        };
        let mut utf8 = [0u8; 4];
        let (result, _, written) = encoder.encode_from_utf8_without_replacement(
            ch.encode_utf8(&mut utf8),
            &mut output[produced..],
            false,
        );
        match result {
            EncoderResult::InputEmpty => {
                consumed += 4;
                produced += written;
            }
            EncoderResult::OutputFull => {
                return Converted {
                    consumed,
                    produced,
                    status: ConvertStatus::OutputFull,
                };
            }
            EncoderResult::Unmappable(_) => {
                return Converted {
                    consumed,
                    produced,
                    status: ConvertStatus::Malformed,
                };
            }
        }
    }
    // A trailing fragment of an element (under four bytes) stays unconsumed.
    Converted {
        consumed,
        produced,
        status: ConvertStatus::Exhausted,
    }
}
