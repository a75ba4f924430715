//! Read-side staging buffer with byte-exact carry-over.
//!
//! Input units pulled or pushed from upstream accumulate here until the
//! buffer is full, then the whole unconsumed region is handed to the
//! conversion engine. The engine may stop mid-buffer, either because its
//! output region filled or because the tail is an incomplete multi-byte
//! sequence, so the unconsumed suffix is kept as a remainder and moved back
//! to the front before more input is appended.
//!
//! The remainder length is tracked in *bytes* even when the element type is
//! wider than a byte (the code-point side stages `u32`s), because the engine
//! consumes byte counts. Conflating bytes with elements is an easy
//! off-by-a-factor-of-four bug, so the byte offset is the only length this
//! type keeps.

use bytemuck::Pod;

pub(crate) struct Staging<T> {
    buf: Box<[T]>,
    /// Length of the unconsumed region at the front, in bytes.
    avail: usize,
}

impl<T: Pod> Staging<T> {
    pub fn with_capacity(elems: usize) -> Self {
        Self {
            buf: vec![T::zeroed(); elems].into_boxed_slice(),
            avail: 0,
        }
    }

    /// The unconsumed region, as the byte run the engine consumes.
    pub fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.buf)[..self.avail]
    }

    pub fn is_empty(&self) -> bool {
        self.avail == 0
    }

    fn capacity_bytes(&self) -> usize {
        self.buf.len() * size_of::<T>()
    }

    /// Appends elements until the buffer is full or the source runs out.
    /// Returns `true` when the source reported exhaustion.
    pub fn fill_from<I: Iterator<Item = T>>(&mut self, src: &mut I) -> bool {
        let unit = size_of::<T>();
        debug_assert_eq!(self.avail % unit, 0, "remainder must end on an element boundary");
        while self.avail < self.capacity_bytes() {
            let Some(item) = src.next() else {
                return true;
            };
            self.buf[self.avail / unit] = item;
            self.avail += unit;
        }
        false
    }

    /// Appends one element; `false` when there is no room left.
    pub fn push(&mut self, item: T) -> bool {
        let unit = size_of::<T>();
        debug_assert_eq!(self.avail % unit, 0, "remainder must end on an element boundary");
        if self.avail + unit > self.capacity_bytes() {
            return false;
        }
        self.buf[self.avail / unit] = item;
        self.avail += unit;
        true
    }

    /// Drops `n` consumed bytes from the front and moves the remainder to the
    /// start of the buffer. The move is byte-exact: mid-sequence remainders
    /// need not cover whole elements.
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.avail);
        if n == 0 {
            return;
        }
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.buf);
        bytes.copy_within(n..self.avail, 0);
        self.avail -= n;
    }
}

#[cfg(test)]
mod tests {
    use super::Staging;

    #[test]
    fn fill_reports_source_exhaustion() {
        let mut staging = Staging::<u8>::with_capacity(4);
        let mut src = [1u8, 2, 3].into_iter();
        assert!(staging.fill_from(&mut src));
        assert_eq!(staging.bytes(), [1, 2, 3]);
    }

    #[test]
    fn fill_stops_at_capacity() {
        let mut staging = Staging::<u8>::with_capacity(2);
        let mut src = [1u8, 2, 3].into_iter();
        assert!(!staging.fill_from(&mut src));
        assert_eq!(staging.bytes(), [1, 2]);
        assert_eq!(src.next(), Some(3));
    }

    #[test]
    fn consume_compacts_remainder_to_front() {
        let mut staging = Staging::<u8>::with_capacity(8);
        let mut src = [1u8, 2, 3, 4, 5].into_iter();
        staging.fill_from(&mut src);
        staging.consume(3);
        assert_eq!(staging.bytes(), [4, 5]);

        let mut more = [6u8, 7].into_iter();
        staging.fill_from(&mut more);
        assert_eq!(staging.bytes(), [4, 5, 6, 7]);
    }

    #[test]
    fn remainders_are_counted_in_bytes_for_wide_elements() {
        let mut staging = Staging::<u32>::with_capacity(4);
        let mut src = [0x1122_3344u32, 0x5566_7788].into_iter();
        staging.fill_from(&mut src);
        staging.consume(4);
        assert_eq!(staging.bytes(), 0x5566_7788u32.to_ne_bytes());
    }

    #[test]
    fn push_refuses_when_full() {
        let mut staging = Staging::<u8>::with_capacity(1);
        assert!(staging.push(9));
        assert!(!staging.push(10));
        staging.consume(1);
        assert!(staging.push(11));
    }
}
