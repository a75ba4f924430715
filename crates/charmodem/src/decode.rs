//! Bytes-to-code-points adapters: pull iterator, push writer, one-shot.

use std::io;

use crate::{
    CodePoint,
    engine::{Engine, WhatwgEngine},
    error::ConvError,
    pump::{Decoding, Pump},
    sink::Sink,
};

/// Lazy, single-pass decoding of a byte source into code points.
///
/// Each [`Iterator::next`] call serves buffered output first and runs a
/// fill-and-convert round only when drained, so no work happens until
/// requested. The sequence is forward-only and not restartable: after `None`
/// or an error it stays exhausted, and a fresh adapter must be constructed to
/// decode again.
///
/// A source that ends partway through a multi-byte sequence yields
/// [`ConvError::InvalidSequence`] at the point the remainder can no longer be
/// completed.
pub struct DecodeIter<I, E: Engine = WhatwgEngine> {
    src: core::iter::Fuse<I>,
    pump: Pump<Decoding, E>,
    src_done: bool,
    failed: bool,
}

impl<I: Iterator<Item = u8>> DecodeIter<I> {
    /// Creates a decoder over `source` for the named `encoding`.
    pub fn new<S>(source: S, encoding: &str) -> Self
    where
        S: IntoIterator<Item = u8, IntoIter = I>,
    {
        Self::with_engine(source, encoding, WhatwgEngine)
    }
}

impl<I: Iterator<Item = u8>, E: Engine> DecodeIter<I, E> {
    /// Like [`DecodeIter::new`], with a custom conversion engine.
    pub fn with_engine<S>(source: S, encoding: &str, engine: E) -> Self
    where
        S: IntoIterator<Item = u8, IntoIter = I>,
    {
        Self {
            src: source.into_iter().fuse(),
            pump: Pump::new(encoding, engine),
            src_done: false,
            failed: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_capacities<S>(
        source: S,
        encoding: &str,
        engine: E,
        staging_elems: usize,
        out_elems: usize,
    ) -> Self
    where
        S: IntoIterator<Item = u8, IntoIter = I>,
    {
        Self {
            src: source.into_iter().fuse(),
            pump: Pump::with_capacities(encoding, engine, staging_elems, out_elems),
            src_done: false,
            failed: false,
        }
    }
}

impl<I: Iterator<Item = u8>, E: Engine> Iterator for DecodeIter<I, E> {
    type Item = Result<CodePoint, ConvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(unit) = self.pump.take_output() {
                return Some(Ok(unit));
            }
            if !self.src_done {
                self.src_done = self.pump.fill_from(&mut self.src);
            }
            if self.pump.is_drained() {
                return None;
            }
            match self.pump.round() {
                Ok(progress) if progress.any() => {}
                Ok(_) => {
                    self.failed = true;
                    return Some(Err(self.pump.stall_error(self.src_done)));
                }
                Err(error) => {
                    self.failed = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

impl<I: Iterator<Item = u8>, E: Engine> core::iter::FusedIterator for DecodeIter<I, E> {}

/// Push-style decoding: accepts bytes, forwards code points to a [`Sink`].
///
/// Bytes accumulate in the staging buffer; once it fills, complete sequences
/// are converted and forwarded inside the push call. [`DecodeWriter::flush`]
/// converts everything currently convertible while an incomplete trailing
/// sequence carries over, so arbitrary chunking stays lossless.
/// [`DecodeWriter::finish`] performs the terminal flush, where a dangling
/// partial sequence is an error, and hands the sink back. Dropping the writer
/// without `finish` runs the same terminal flush best-effort, so staged data
/// is not silently lost; units always reach the sink in push order.
///
/// Also usable through [`std::io::Write`], where failures surface as
/// [`io::ErrorKind::InvalidData`].
pub struct DecodeWriter<S: Sink<CodePoint>, E: Engine = WhatwgEngine> {
    pump: Pump<Decoding, E>,
    sink: Option<S>,
    error: Option<ConvError>,
}

impl<S: Sink<CodePoint>> DecodeWriter<S> {
    /// Creates a writer decoding the named `encoding` into `sink`.
    pub fn new(sink: S, encoding: &str) -> Self {
        Self::with_engine(sink, encoding, WhatwgEngine)
    }
}

impl<S: Sink<CodePoint>, E: Engine> DecodeWriter<S, E> {
    /// Like [`DecodeWriter::new`], with a custom conversion engine.
    pub fn with_engine(sink: S, encoding: &str, engine: E) -> Self {
        Self {
            pump: Pump::new(encoding, engine),
            sink: Some(sink),
            error: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_capacities(
        sink: S,
        encoding: &str,
        engine: E,
        staging_elems: usize,
        out_elems: usize,
    ) -> Self {
        Self {
            pump: Pump::with_capacities(encoding, engine, staging_elems, out_elems),
            sink: Some(sink),
            error: None,
        }
    }

    /// Pushes one byte, converting and forwarding if the buffer is full.
    ///
    /// # Errors
    ///
    /// Any conversion failure. A failed writer is dead: every later call
    /// returns the same error, and dropping it flushes nothing.
    pub fn push(&mut self, byte: u8) -> Result<(), ConvError> {
        self.live()?;
        if self.pump.stage(byte) {
            return Ok(());
        }
        self.drain_rounds()?;
        if self.pump.stage(byte) {
            Ok(())
        } else {
            Err(self.fail(self.pump.stall_error(false)))
        }
    }

    /// Pushes a run of bytes.
    ///
    /// # Errors
    ///
    /// As for [`DecodeWriter::push`].
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), ConvError> {
        for &byte in bytes {
            self.push(byte)?;
        }
        Ok(())
    }

    /// Converts and forwards everything currently convertible. An incomplete
    /// trailing sequence stays staged for the next push.
    ///
    /// # Errors
    ///
    /// Any conversion failure; see [`DecodeWriter::push`].
    pub fn flush(&mut self) -> Result<(), ConvError> {
        self.live()?;
        self.drain_rounds()
    }

    /// Terminal flush; returns the sink.
    ///
    /// # Errors
    ///
    /// A partial sequence still staged here can no longer be completed and is
    /// reported as [`ConvError::InvalidSequence`], besides the failures of
    /// [`DecodeWriter::flush`].
    pub fn finish(mut self) -> Result<S, ConvError> {
        self.live()?;
        self.drain_rounds()?;
        if !self.pump.is_drained() {
            return Err(self.fail(self.pump.stall_error(true)));
        }
        let Some(sink) = self.sink.take() else {
            unreachable!()
        };
        Ok(sink)
    }

    fn live(&self) -> Result<(), ConvError> {
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn fail(&mut self, error: ConvError) -> ConvError {
        self.error = Some(error.clone());
        error
    }

    fn drain_rounds(&mut self) -> Result<(), ConvError> {
        loop {
            if self.pump.is_drained() {
                return Ok(());
            }
            let progress = match self.pump.round() {
                Ok(progress) => progress,
                Err(error) => return Err(self.fail(error)),
            };
            if let Some(sink) = self.sink.as_mut() {
                while let Some(unit) = self.pump.take_output() {
                    sink.accept(unit);
                }
            }
            if !progress.any() {
                return Ok(());
            }
        }
    }
}

impl<S: Sink<CodePoint>, E: Engine> Drop for DecodeWriter<S, E> {
    fn drop(&mut self) {
        if self.error.is_none() && self.sink.is_some() {
            let _ = self.drain_rounds();
        }
    }
}

impl<S: Sink<CodePoint>, E: Engine> io::Write for DecodeWriter<S, E> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.feed(buf).map_err(io_error)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        DecodeWriter::flush(self).map_err(io_error)
    }
}

fn io_error(error: ConvError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, error)
}

/// Decodes a whole byte sequence in the named encoding into code points.
///
/// # Errors
///
/// [`ConvError::Init`] when the encoding cannot be opened,
/// [`ConvError::InvalidSequence`] when the bytes are not valid under it.
pub fn decode(input: &[u8], encoding: &str) -> Result<Vec<CodePoint>, ConvError> {
    DecodeIter::new(input.iter().copied(), encoding).collect()
}
