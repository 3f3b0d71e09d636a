//! Monotonic clock abstraction
//!
//! The transport only needs "milliseconds since some fixed origin" to time
//! transmit flushes. Abstracting it keeps the crate off-target testable and
//! lets the embedding firmware supply whatever timebase it already has.

/// A monotonic millisecond clock.
///
/// Implementations must never go backwards; the origin is arbitrary.
pub trait MonotonicClock {
    /// Milliseconds elapsed since the clock's origin
    fn now_ms(&self) -> u64;
}
