//! Outbound chunk coalescing
//!
//! Accumulates application bytes into a chunk sized to the link's maximum
//! attribute payload. The owning role decides readiness and performs the
//! actual stack call; the coalescer is pure bookkeeping: fill state plus the
//! last-flush timestamp that drives the flush-on-timeout rule.

use heapless::Vec;

use crate::config::timing::FLUSH_INTERVAL_MS;

/// Transmit chunk accumulator of capacity `N` bytes.
pub struct TransmitCoalescer<const N: usize> {
    chunk: Vec<u8, N>,
    last_flush_ms: u64,
    flush_interval_ms: u64,
}

impl<const N: usize> TransmitCoalescer<N> {
    /// Create an empty coalescer with the given flush interval
    pub fn new(flush_interval_ms: u64) -> Self {
        Self {
            chunk: Vec::new(),
            last_flush_ms: 0,
            flush_interval_ms,
        }
    }

    /// Append up to the remaining chunk capacity from `data`.
    ///
    /// Returns the number of bytes accepted; the caller continues with the
    /// remainder after flushing a full chunk.
    pub fn fill(&mut self, data: &[u8]) -> usize {
        let room = N - self.chunk.len();
        let take = data.len().min(room);
        // Cannot fail: take is bounded by the remaining capacity
        let _ = self.chunk.extend_from_slice(&data[..take]);
        take
    }

    /// Take the pending chunk for transmission, leaving the coalescer empty.
    ///
    /// Returns `None` when nothing is pending.
    pub fn take_chunk(&mut self) -> Option<Vec<u8, N>> {
        if self.chunk.is_empty() {
            return None;
        }
        Some(core::mem::take(&mut self.chunk))
    }

    /// Record that a flush happened at `now_ms`
    pub fn mark_flushed(&mut self, now_ms: u64) {
        self.last_flush_ms = now_ms;
    }

    /// True when the time since the last flush exceeds the flush interval
    pub fn flush_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_flush_ms) > self.flush_interval_ms
    }

    pub fn is_full(&self) -> bool {
        self.chunk.len() == N
    }

    pub fn is_empty(&self) -> bool {
        self.chunk.is_empty()
    }

    /// Bytes currently pending in the chunk
    pub fn len(&self) -> usize {
        self.chunk.len()
    }
}

impl<const N: usize> Default for TransmitCoalescer<N> {
    fn default() -> Self {
        Self::new(FLUSH_INTERVAL_MS)
    }
}
