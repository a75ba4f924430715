//! Fixed-capacity engine output region with an element read cursor.
//!
//! The engine writes raw bytes into the whole region; the owning adapter then
//! reads the produced run back out element by element. A round may only start
//! once the previous production is fully drained, so the region is always
//! entirely free when handed to the engine.

use bytemuck::Pod;

pub(crate) struct OutBuf<T> {
    buf: Box<[T]>,
    /// Elements produced by the last convert round.
    len: usize,
    /// Elements already handed out.
    pos: usize,
}

impl<T: Pod> OutBuf<T> {
    pub fn with_capacity(elems: usize) -> Self {
        Self {
            buf: vec![T::zeroed(); elems].into_boxed_slice(),
            len: 0,
            pos: 0,
        }
    }

    /// The whole region as bytes for the engine to write into.
    pub fn free_bytes(&mut self) -> &mut [u8] {
        debug_assert_eq!(self.pos, self.len, "previous production must be drained first");
        bytemuck::cast_slice_mut(&mut self.buf)
    }

    /// Records how many bytes the engine wrote. Engines produce whole
    /// elements only.
    pub fn set_produced(&mut self, bytes: usize) {
        debug_assert_eq!(bytes % size_of::<T>(), 0);
        self.len = bytes / size_of::<T>();
        self.pos = 0;
    }

    pub fn next(&mut self) -> Option<T> {
        if self.pos == self.len {
            return None;
        }
        let item = self.buf[self.pos];
        self.pos += 1;
        Some(item)
    }
}
