//! Line framing over the receive ring buffer
//!
//! Keeps a running count of completed (newline-terminated) lines resident in
//! the ring so `available_lines`/`read_line` are O(1) to gate on. The count
//! is maintained on both ends: it goes up when a newline is buffered, and
//! down when a newline is consumed or evicted by overflow.

use crate::buffer::ring::RingBuffer;
use crate::config::protocol::LINE_DELIMITER;

/// Receive buffer with line framing, capacity `N` bytes.
pub struct LineBuffer<const N: usize> {
    ring: RingBuffer<N>,
    lines: usize,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            ring: RingBuffer::new(),
            lines: 0,
        }
    }

    /// Append one received byte, updating the completed-line count.
    pub fn push(&mut self, byte: u8) {
        if self.ring.add(byte) == Some(LINE_DELIMITER) {
            // Overflow evicted a buffered newline; that line is gone.
            self.lines -= 1;
        }
        if byte == LINE_DELIMITER {
            self.lines += 1;
        }
    }

    /// Append a received chunk in arrival order
    pub fn extend(&mut self, data: &[u8]) {
        for &byte in data {
            self.push(byte);
        }
    }

    /// Number of bytes currently buffered
    pub fn available(&self) -> usize {
        self.ring.len()
    }

    /// Oldest buffered byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.ring.get(0)
    }

    /// Remove and return the oldest byte, decrementing the line count when
    /// the consumed byte terminates a line.
    pub fn read(&mut self) -> Option<u8> {
        let byte = self.ring.pop()?;
        if byte == LINE_DELIMITER {
            self.lines -= 1;
        }
        Some(byte)
    }

    /// Number of completed lines currently buffered
    pub fn available_lines(&self) -> usize {
        self.lines
    }

    /// Copy the oldest line into `out` without consuming it.
    ///
    /// Stops at the newline (not copied), the end of buffered data, or the
    /// capacity of `out`. Returns the number of bytes copied; 0 when no
    /// complete line is buffered yet (a partial line is not an error, it is
    /// simply not ready).
    pub fn peek_line(&self, out: &mut [u8]) -> usize {
        if self.lines == 0 {
            return 0;
        }
        let mut copied = 0;
        while copied < out.len() {
            match self.ring.get(copied) {
                None | Some(LINE_DELIMITER) => break,
                Some(byte) => {
                    out[copied] = byte;
                    copied += 1;
                }
            }
        }
        copied
    }

    /// Consume the oldest line, copying what fits into `out`.
    ///
    /// The whole line is always drained, newline included; bytes past the
    /// capacity of `out` are discarded. Returns the number of bytes copied;
    /// 0 when no complete line is buffered.
    pub fn read_line(&mut self, out: &mut [u8]) -> usize {
        if self.lines == 0 {
            return 0;
        }
        let mut copied = 0;
        loop {
            match self.read() {
                None | Some(LINE_DELIMITER) => break,
                Some(byte) => {
                    if copied < out.len() {
                        out[copied] = byte;
                        copied += 1;
                    }
                }
            }
        }
        copied
    }

    /// Discard all buffered data
    pub fn clear(&mut self) {
        self.ring.clear();
        self.lines = 0;
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
