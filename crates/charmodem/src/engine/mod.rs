//! Conversion-engine seam.
//!
//! The buffering core drives an engine through a narrow contract: open a
//! handle for a `(from, to)` name pair, run one `convert` call over one input
//! region into one output region, classify the outcome, and close. Closing is
//! the handle's `Drop`; a handle is opened immediately before a convert round
//! and never survives past it, on any exit path, so no directional or
//! stateful configuration inside the engine can leak between rounds.

mod whatwg;

pub use whatwg::WhatwgEngine;

use crate::error::ConvError;

/// Byte-order-explicit name of the 32-bit pivot form in the host's byte
/// order. Decode rounds name their *output* side with this instead of plain
/// `"UTF-32"` so no engine can prefix a byte-order mark onto decoded data.
/// Encode rounds name their input side plain `"UTF-32"`, meaning native
/// order; no mark can appear there since the pivot is the input.
pub const UTF_32_NATIVE: &str = if cfg!(target_endian = "little") {
    "UTF-32LE"
} else {
    "UTF-32BE"
};

/// Classification of one `convert` call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConvertStatus {
    /// All convertible input was consumed. An incomplete trailing sequence
    /// may have been left unconsumed for the caller's remainder; whether that
    /// remainder can still be completed is the caller's call, since only the
    /// caller knows whether the source has ended.
    Exhausted,
    /// The output region filled before the input ran out. Routine, never an
    /// error: the caller drains the output and converts again.
    OutputFull,
    /// The input at the consumed position is not valid under the stated
    /// encoding, or a code point is unrepresentable in the target.
    Malformed,
    /// Any other engine failure.
    Failed,
}

/// Outcome of one `convert` call.
///
/// `consumed` and `produced` are byte counts and are authoritative for
/// remainder bookkeeping: on [`ConvertStatus::Exhausted`] and
/// [`ConvertStatus::OutputFull`] the unconsumed input suffix becomes the
/// caller's carry-over remainder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Converted {
    /// Bytes of input consumed, covering whole character sequences only.
    pub consumed: usize,
    /// Bytes of output written, covering whole output elements only.
    pub produced: usize,
    /// How the call ended.
    pub status: ConvertStatus,
}

/// A character-set conversion primitive.
///
/// One side of the `(from, to)` pair is the 32-bit pivot form (`"UTF-32"`,
/// `"UTF-32LE"` or `"UTF-32BE"`); the other is an opaque external encoding
/// name the engine resolves however it likes.
pub trait Engine {
    /// An open conversion handle. Dropping it is the close; the core drops it
    /// at the end of the round that opened it, exactly once.
    type Conversion: Conversion;

    /// Opens a handle for the named pair.
    ///
    /// # Errors
    ///
    /// [`ConvError::Init`] when either name is unsupported or resources
    /// cannot be allocated.
    fn open(&self, from: &str, to: &str) -> Result<Self::Conversion, ConvError>;
}

/// One open conversion handle.
pub trait Conversion {
    /// Converts as much of `input` as fits in `output`.
    ///
    /// Only whole character sequences are consumed and only whole output
    /// elements produced. An incomplete trailing input sequence is left
    /// unconsumed, not reported as malformed: the caller feeds it back with
    /// more data in the next round.
    fn convert(&mut self, input: &[u8], output: &mut [u8]) -> Converted;
}
