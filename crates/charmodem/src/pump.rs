//! The shared buffering round: fill, open, convert, classify, close.
//!
//! All four adapters drive the same cycle. Input units accumulate in a
//! [`Staging`] buffer; one round opens a fresh engine handle for the
//! direction's name pair, converts the staged run into the output region,
//! classifies the outcome, and lets the handle drop. The unconsumed suffix
//! stays in the staging buffer as the carry-over remainder, so an adapter's
//! whole resumable state lives in its buffers and never inside the engine.

use bytemuck::Pod;

use crate::{
    engine::{Conversion as _, ConvertStatus, Engine, UTF_32_NATIVE},
    error::ConvError,
    outbuf::OutBuf,
    staging::Staging,
};

/// Selects element types, the engine name pair, and default capacities for
/// one transcoding direction.
pub(crate) trait Direction {
    /// Element type staged from upstream.
    type In: Pod;
    /// Element type produced by the engine.
    type Out: Pod;

    const STAGING_ELEMS: usize;
    const OUT_ELEMS: usize;

    /// `(from, to)` encoding names for the engine handle.
    fn names(encoding: &str) -> (&str, &str);
}

/// Bytes in an external character set to 32-bit code points.
pub(crate) struct Decoding;

impl Direction for Decoding {
    type In = u8;
    type Out = u32;

    const STAGING_ELEMS: usize = 4096;
    const OUT_ELEMS: usize = 256;

    fn names(encoding: &str) -> (&str, &str) {
        (encoding, UTF_32_NATIVE)
    }
}

/// 32-bit code points to bytes in an external character set.
pub(crate) struct Encoding;

impl Direction for Encoding {
    type In = u32;
    type Out = u8;

    const STAGING_ELEMS: usize = 1024;
    const OUT_ELEMS: usize = 1024;

    fn names(encoding: &str) -> (&str, &str) {
        ("UTF-32", encoding)
    }
}

/// What one convert round achieved.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Progress {
    pub consumed: usize,
    pub produced: usize,
}

impl Progress {
    /// A round with no progress will make none on a retry either; the caller
    /// decides whether that means a truncated sequence or a stuck engine.
    pub fn any(self) -> bool {
        self.consumed > 0 || self.produced > 0
    }
}

pub(crate) struct Pump<D: Direction, E: Engine> {
    staging: Staging<D::In>,
    out: OutBuf<D::Out>,
    encoding: String,
    engine: E,
    /// The last completed round ended with a full output region.
    out_was_full: bool,
}

impl<D: Direction, E: Engine> Pump<D, E> {
    pub fn new(encoding: &str, engine: E) -> Self {
        Self::with_capacities(encoding, engine, D::STAGING_ELEMS, D::OUT_ELEMS)
    }

    pub fn with_capacities(
        encoding: &str,
        engine: E,
        staging_elems: usize,
        out_elems: usize,
    ) -> Self {
        Self {
            staging: Staging::with_capacity(staging_elems),
            out: OutBuf::with_capacity(out_elems),
            encoding: encoding.to_owned(),
            engine,
            out_was_full: false,
        }
    }

    /// Next produced-but-unread output element, if any.
    pub fn take_output(&mut self) -> Option<D::Out> {
        self.out.next()
    }

    /// Appends from a pull source; `true` when the source is exhausted.
    pub fn fill_from<I: Iterator<Item = D::In>>(&mut self, src: &mut I) -> bool {
        self.staging.fill_from(src)
    }

    /// Appends one pushed element; `false` when the staging buffer is full.
    pub fn stage(&mut self, item: D::In) -> bool {
        self.staging.push(item)
    }

    /// No staged input is left (remainder included).
    pub fn is_drained(&self) -> bool {
        self.staging.is_empty()
    }

    /// Runs one convert round over the staged remainder: opens a fresh engine
    /// handle, converts into the output region, classifies, and drops the
    /// handle. The handle never outlives the round, on any path.
    pub fn round(&mut self) -> Result<Progress, ConvError> {
        let (from, to) = D::names(&self.encoding);
        let mut conversion = self.engine.open(from, to)?;
        let outcome = conversion.convert(self.staging.bytes(), self.out.free_bytes());
        drop(conversion);
        match outcome.status {
            ConvertStatus::Exhausted | ConvertStatus::OutputFull => {
                self.out_was_full = outcome.status == ConvertStatus::OutputFull;
                self.staging.consume(outcome.consumed);
                self.out.set_produced(outcome.produced);
                Ok(Progress {
                    consumed: outcome.consumed,
                    produced: outcome.produced,
                })
            }
            ConvertStatus::Malformed => Err(ConvError::InvalidSequence {
                encoding: self.encoding.clone(),
            }),
            ConvertStatus::Failed => Err(ConvError::Failed {
                from: from.to_owned(),
                to: to.to_owned(),
            }),
        }
    }

    /// Error for staged data that will never convert. At end of input a stall
    /// on exhausted input is a truncated final sequence; a stall with a full
    /// output region means the region cannot take one converted unit, and a
    /// stall before end of input means the engine has violated its progress
    /// contract. The latter two do not implicate the input.
    pub fn stall_error(&self, at_end: bool) -> ConvError {
        if at_end && !self.out_was_full {
            ConvError::InvalidSequence {
                encoding: self.encoding.clone(),
            }
        } else {
            let (from, to) = D::names(&self.encoding);
            ConvError::Failed {
                from: from.to_owned(),
                to: to.to_owned(),
            }
        }
    }
}
