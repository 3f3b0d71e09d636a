//! Fixed-capacity circular byte queue
//!
//! Overwrites the oldest byte when full. Dropping old data under sustained
//! overrun is the intended policy for a serial receive buffer: the freshest
//! bytes are the ones worth keeping, and the writer (a radio link) cannot
//! be back-pressured anyway.

/// Circular byte queue of capacity `N` with overwrite-oldest semantics.
///
/// Index 0 is always the oldest resident byte, index `len() - 1` the newest.
pub struct RingBuffer<const N: usize> {
    buf: [u8; N],
    /// Index the next byte will be written to
    newest: usize,
    len: usize,
}

impl<const N: usize> RingBuffer<N> {
    /// Create an empty ring buffer
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            newest: 0,
            len: 0,
        }
    }

    /// Append a byte in O(1).
    ///
    /// Never fails; when the buffer is full the oldest byte is overwritten
    /// and returned so layered bookkeeping can account for the loss.
    pub fn add(&mut self, byte: u8) -> Option<u8> {
        let evicted = if self.len == N {
            Some(self.buf[self.newest])
        } else {
            self.len += 1;
            None
        };
        self.buf[self.newest] = byte;
        self.newest = (self.newest + 1) % N;
        evicted
    }

    /// Remove and return the oldest byte, or `None` when empty
    pub fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        let oldest = (N + self.newest - self.len) % N;
        self.len -= 1;
        Some(self.buf[oldest])
    }

    /// Non-destructive random access; `get(0)` is the oldest byte.
    ///
    /// Returns `None` for `index >= len()`.
    pub fn get(&self, index: usize) -> Option<u8> {
        if index >= self.len {
            return None;
        }
        Some(self.buf[(N + self.newest - self.len + index) % N])
    }

    /// Reset to empty in O(1)
    pub fn clear(&mut self) {
        self.newest = 0;
        self.len = 0;
    }

    /// Number of bytes currently buffered
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Total capacity `N`
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_in_fifo_order() {
        let mut ring: RingBuffer<8> = RingBuffer::new();
        for b in 0..5u8 {
            assert_eq!(ring.add(b), None);
        }
        assert_eq!(ring.len(), 5);

        for b in 0..5u8 {
            assert_eq!(ring.pop(), Some(b));
        }
        assert_eq!(ring.pop(), None);
        assert!(ring.is_empty());
    }

    #[test]
    fn overflow_overwrites_oldest() {
        let mut ring: RingBuffer<4> = RingBuffer::new();
        for b in 0..10u8 {
            ring.add(b);
        }

        // After 10 adds into capacity 4, the oldest survivor is byte 6
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.get(0), Some(6));
        assert_eq!(ring.get(3), Some(9));
    }

    #[test]
    fn add_reports_evicted_byte() {
        let mut ring: RingBuffer<2> = RingBuffer::new();
        assert_eq!(ring.add(10), None);
        assert_eq!(ring.add(11), None);
        assert_eq!(ring.add(12), Some(10));
        assert_eq!(ring.add(13), Some(11));
    }

    #[test]
    fn get_out_of_range_is_none() {
        let mut ring: RingBuffer<4> = RingBuffer::new();
        ring.add(1);
        assert_eq!(ring.get(0), Some(1));
        assert_eq!(ring.get(1), None);
        assert_eq!(ring.get(100), None);
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut ring: RingBuffer<4> = RingBuffer::new();
        for b in 0..4u8 {
            ring.add(b);
        }
        assert!(ring.is_full());

        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.pop(), None);

        // Usable again after clear
        ring.add(42);
        assert_eq!(ring.pop(), Some(42));
    }

    #[test]
    fn pop_interleaved_with_add_keeps_order() {
        let mut ring: RingBuffer<4> = RingBuffer::new();
        ring.add(1);
        ring.add(2);
        assert_eq!(ring.pop(), Some(1));
        ring.add(3);
        ring.add(4);
        ring.add(5);
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), Some(3));
        assert_eq!(ring.pop(), Some(4));
        assert_eq!(ring.pop(), Some(5));
        assert_eq!(ring.pop(), None);
    }
}
