//! Streaming conversion between byte sequences in an arbitrary named
//! character set and sequences of Unicode code points.
//!
//! The crate is one buffering pattern applied in two directions (decode:
//! bytes to code points; encode: code points to bytes) and two consumption
//! styles (pull: lazy iterators; push: writers draining into a [`Sink`]).
//! Every adapter stages input in a fixed-capacity buffer, hands the staged
//! run to a conversion engine one bounded round at a time, exposes the
//! produced output, and carries the unconsumed remainder (for example the
//! first two bytes of a three-byte character split across chunks) over to the
//! next round. Chunk boundaries therefore never corrupt or drop data, and an
//! output region that fills mid-round is routine rather than an error.
//!
//! The conversion primitive sits behind the [`engine::Engine`] seam and
//! defaults to [`engine::WhatwgEngine`], backed by the WHATWG Encoding
//! Standard registry of [`encoding_rs`]. Encoding names are opaque labels
//! passed through to the engine unmodified.
//!
//! ```
//! use charmodem::{decode, encode};
//!
//! let bytes = encode(&[0x66, 0x6F, 0x6F, 0x2660], "UTF-8")?;
//! assert_eq!(bytes, b"foo\xE2\x99\xA0");
//!
//! let back = decode(&bytes, "UTF-8")?;
//! assert_eq!(back, [0x66, 0x6F, 0x6F, 0x2660]);
//! # Ok::<(), charmodem::ConvError>(())
//! ```

mod decode;
mod encode;
mod error;
mod outbuf;
mod pump;
mod sink;
mod staging;

pub mod engine;

#[cfg(test)]
mod tests;

pub use decode::{DecodeIter, DecodeWriter, decode};
pub use encode::{EncodeIter, EncodeWriter, encode};
pub use error::ConvError;
pub use sink::{FnSink, Sink};

/// One Unicode scalar value as a fixed-width 32-bit unit.
///
/// Kept as a plain `u32` rather than `char`: scalar-value validation is the
/// conversion engine's business, and an invalid value fed to an encoder is
/// reported as an invalid sequence instead of being unrepresentable.
pub type CodePoint = u32;
