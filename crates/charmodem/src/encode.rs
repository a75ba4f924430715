//! Code-points-to-bytes adapters: pull iterator, push writer, one-shot.

use crate::{
    CodePoint,
    engine::{Engine, WhatwgEngine},
    error::ConvError,
    pump::{Encoding, Pump},
    sink::Sink,
};

/// Lazy, single-pass encoding of a code-point source into bytes.
///
/// Mirror of [`crate::DecodeIter`] with source and target reversed: code
/// points are staged in a 32-bit buffer whose remainder is still tracked in
/// bytes, and converted bytes come out one at a time. Forward-only and not
/// restartable.
pub struct EncodeIter<I, E: Engine = WhatwgEngine> {
    src: core::iter::Fuse<I>,
    pump: Pump<Encoding, E>,
    src_done: bool,
    failed: bool,
}

impl<I: Iterator<Item = CodePoint>> EncodeIter<I> {
    /// Creates an encoder over `source` for the named `encoding`.
    pub fn new<S>(source: S, encoding: &str) -> Self
    where
        S: IntoIterator<Item = CodePoint, IntoIter = I>,
    {
        Self::with_engine(source, encoding, WhatwgEngine)
    }
}

impl<I: Iterator<Item = CodePoint>, E: Engine> EncodeIter<I, E> {
    /// Like [`EncodeIter::new`], with a custom conversion engine.
    pub fn with_engine<S>(source: S, encoding: &str, engine: E) -> Self
    where
        S: IntoIterator<Item = CodePoint, IntoIter = I>,
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
        S: IntoIterator<Item = CodePoint, IntoIter = I>,
    {
        Self {
            src: source.into_iter().fuse(),
            pump: Pump::with_capacities(encoding, engine, staging_elems, out_elems),
            src_done: false,
            failed: false,
        }
    }
}

impl<I: Iterator<Item = CodePoint>, E: Engine> Iterator for EncodeIter<I, E> {
    type Item = Result<u8, ConvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(byte) = self.pump.take_output() {
                return Some(Ok(byte));
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

impl<I: Iterator<Item = CodePoint>, E: Engine> core::iter::FusedIterator for EncodeIter<I, E> {}

/// Push-style encoding: accepts code points, forwards bytes to a [`Sink`].
///
/// Mirror of [`crate::DecodeWriter`]: staged code points are converted on
/// buffer-full, on [`EncodeWriter::flush`], on [`EncodeWriter::finish`], and
/// best-effort on drop, with bytes reaching the sink strictly in push order.
pub struct EncodeWriter<S: Sink<u8>, E: Engine = WhatwgEngine> {
    pump: Pump<Encoding, E>,
    sink: Option<S>,
    error: Option<ConvError>,
}

impl<S: Sink<u8>> EncodeWriter<S> {
    /// Creates a writer encoding into the named `encoding` toward `sink`.
    pub fn new(sink: S, encoding: &str) -> Self {
        Self::with_engine(sink, encoding, WhatwgEngine)
    }
}

impl<S: Sink<u8>, E: Engine> EncodeWriter<S, E> {
    /// Like [`EncodeWriter::new`], with a custom conversion engine.
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

    /// Pushes one code point, converting and forwarding if the buffer is
    /// full.
    ///
    /// # Errors
    ///
    /// Any conversion failure. A failed writer is dead: every later call
    /// returns the same error, and dropping it flushes nothing.
    pub fn push(&mut self, point: CodePoint) -> Result<(), ConvError> {
        self.live()?;
        if self.pump.stage(point) {
            return Ok(());
        }
        self.drain_rounds()?;
        if self.pump.stage(point) {
            Ok(())
        } else {
            Err(self.fail(self.pump.stall_error(false)))
        }
    }

    /// Pushes a run of code points.
    ///
    /// # Errors
    ///
    /// As for [`EncodeWriter::push`].
    pub fn feed(&mut self, points: &[CodePoint]) -> Result<(), ConvError> {
        for &point in points {
            self.push(point)?;
        }
        Ok(())
    }

    /// Pushes the code points of a string.
    ///
    /// # Errors
    ///
    /// As for [`EncodeWriter::push`].
    pub fn push_str(&mut self, s: &str) -> Result<(), ConvError> {
        for ch in s.chars() {
            self.push(u32::from(ch))?;
        }
        Ok(())
    }

    /// Converts and forwards everything currently staged.
    ///
    /// # Errors
    ///
    /// Any conversion failure; see [`EncodeWriter::push`].
    pub fn flush(&mut self) -> Result<(), ConvError> {
        self.live()?;
        self.drain_rounds()
    }

    /// Terminal flush; returns the sink.
    ///
    /// # Errors
    ///
    /// As for [`EncodeWriter::flush`], plus [`ConvError::InvalidSequence`]
    /// for staged input that can no longer convert.
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
                while let Some(byte) = self.pump.take_output() {
                    sink.accept(byte);
                }
            }
            if !progress.any() {
                return Ok(());
            }
        }
    }
}

impl<S: Sink<u8>, E: Engine> Drop for EncodeWriter<S, E> {
    fn drop(&mut self) {
        if self.error.is_none() && self.sink.is_some() {
            let _ = self.drain_rounds();
        }
    }
}

/// Encodes a whole code-point sequence into bytes of the named encoding.
///
/// # Errors
///
/// [`ConvError::Init`] when the encoding cannot be opened for encoding,
/// [`ConvError::InvalidSequence`] when a code point is not a Unicode scalar
/// value or is unrepresentable in the target encoding.
pub fn encode(input: &[CodePoint], encoding: &str) -> Result<Vec<u8>, ConvError> {
    EncodeIter::new(input.iter().copied(), encoding).collect()
}
