//! Receive-side buffering: a fixed-capacity ring buffer and a line framer
//! layered on top of it.

pub mod line;
pub mod ring;

pub use line::LineBuffer;
pub use ring::RingBuffer;
