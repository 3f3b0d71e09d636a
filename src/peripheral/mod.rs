//! Peripheral (server) role: advertises the UART service and notifies a
//! subscribed central.
//!
//! Advertising, connection supervision, and re-advertising after a
//! disconnect are handled by the BLE stack; this role only needs to know
//! whether anyone is subscribed before it transmits. The receive path is
//! [`PeripheralRole::on_received`], invoked by the stack's write-indication
//! dispatch for every chunk a central writes to the RX characteristic.

use log::warn;

use crate::ble::traits::{GattStack, StackError};
use crate::buffer::LineBuffer;
use crate::config::buffers::RECEIVE_BUFFER_SIZE;
use crate::config::protocol::MAX_ATTRIBUTE_PAYLOAD;
use crate::time::MonotonicClock;
use crate::transmit::TransmitCoalescer;

/// BLE serial transport in the peripheral role.
///
/// `RX_CAP` is the receive buffer capacity, `CHUNK` the link's maximum
/// attribute payload.
pub struct PeripheralRole<
    const RX_CAP: usize = { RECEIVE_BUFFER_SIZE },
    const CHUNK: usize = { MAX_ATTRIBUTE_PAYLOAD },
> {
    recv: LineBuffer<RX_CAP>,
    tx: TransmitCoalescer<CHUNK>,
}

impl<const RX_CAP: usize, const CHUNK: usize> PeripheralRole<RX_CAP, CHUNK> {
    pub fn new() -> Self {
        Self {
            recv: LineBuffer::new(),
            tx: TransmitCoalescer::default(),
        }
    }

    /// Register the UART service under `name` and begin advertising.
    ///
    /// Fails only if the underlying stack fails to initialise.
    pub fn setup<S: GattStack>(&mut self, stack: &mut S, name: &str) -> Result<(), StackError> {
        stack.advertise(name)
    }

    /// Receive path: push a chunk written to the RX characteristic.
    ///
    /// Called from the stack's own event dispatch; it only touches the
    /// receive buffer, so it is safe under the single-threaded cooperative
    /// model without locking.
    pub fn on_received(&mut self, data: &[u8]) {
        self.recv.extend(data);
    }

    /// Transmit-ready predicate: a central has subscribed to notifications.
    pub fn transmit_ready<S: GattStack>(&self, stack: &S) -> bool {
        stack.notify_subscribed()
    }

    /// Queue bytes for transmission, flushing full chunks as they form.
    ///
    /// Readiness is re-checked before each chunk fill; the returned count
    /// may be short of `data.len()` when the subscriber goes away mid-write
    /// (or was never there, in which case it is 0). Callers must check the
    /// count and retry the remainder later.
    pub fn write<S, C>(&mut self, stack: &mut S, clock: &C, data: &[u8]) -> usize
    where
        S: GattStack,
        C: MonotonicClock,
    {
        let mut written = 0;
        while written < data.len() {
            if !self.transmit_ready(stack) {
                break;
            }
            written += self.tx.fill(&data[written..]);
            if self.tx.is_full() {
                self.flush(stack, clock);
            }
        }
        written
    }

    /// Queue a single byte; returns 1 on acceptance, 0 when not ready.
    pub fn write_byte<S, C>(&mut self, stack: &mut S, clock: &C, byte: u8) -> usize
    where
        S: GattStack,
        C: MonotonicClock,
    {
        self.write(stack, clock, &[byte])
    }

    /// Send any pending chunk as one notification and stamp the flush time.
    pub fn flush<S, C>(&mut self, stack: &mut S, clock: &C)
    where
        S: GattStack,
        C: MonotonicClock,
    {
        if let Some(chunk) = self.tx.take_chunk() {
            if let Err(err) = stack.notify(&chunk) {
                warn!("dropping {} byte chunk, notify failed: {:?}", chunk.len(), err);
            }
        }
        self.tx.mark_flushed(clock.now_ms());
        stack.poll();
    }

    /// Periodic service entry point.
    ///
    /// Forces a flush once a partially filled chunk has been pending longer
    /// than the flush interval; otherwise just services the stack. Must be
    /// called at a bounded interval by the application loop.
    pub fn poll<S, C>(&mut self, stack: &mut S, clock: &C)
    where
        S: GattStack,
        C: MonotonicClock,
    {
        if self.tx.flush_due(clock.now_ms()) {
            self.flush(stack, clock);
        } else {
            stack.poll();
        }
    }

    /// Number of received bytes available to read
    pub fn available(&self) -> usize {
        self.recv.available()
    }

    /// Oldest received byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.recv.peek()
    }

    /// Consume and return the oldest received byte
    pub fn read(&mut self) -> Option<u8> {
        self.recv.read()
    }

    /// Number of completed lines available to read
    pub fn available_lines(&self) -> usize {
        self.recv.available_lines()
    }

    /// Copy the oldest completed line into `out` without consuming it
    pub fn peek_line(&self, out: &mut [u8]) -> usize {
        self.recv.peek_line(out)
    }

    /// Consume the oldest completed line; see [`LineBuffer::read_line`]
    pub fn read_line(&mut self, out: &mut [u8]) -> usize {
        self.recv.read_line(out)
    }

    /// Link-connected status as reported by the stack
    pub fn is_connected<S: GattStack>(&self, stack: &S) -> bool {
        stack.connected()
    }

    /// Drop buffered received data and push out anything pending.
    pub fn end<S, C>(&mut self, stack: &mut S, clock: &C)
    where
        S: GattStack,
        C: MonotonicClock,
    {
        self.recv.clear();
        self.flush(stack, clock);
    }
}

impl<const RX_CAP: usize, const CHUNK: usize> Default for PeripheralRole<RX_CAP, CHUNK> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::traits::mock::{MockStack, Op};
    use crate::time::mock::MockClock;

    type TestRole = PeripheralRole<64, 4>;

    #[test]
    fn write_without_subscriber_accepts_nothing() {
        let mut role = TestRole::new();
        let mut stack = MockStack::new();
        let clock = MockClock::new();

        assert_eq!(role.write(&mut stack, &clock, b"hello"), 0);
        assert_eq!(stack.count(|op| matches!(op, Op::Notify(_))), 0);
    }

    #[test]
    fn full_chunk_flushes_immediately() {
        let mut role = TestRole::new();
        let mut stack = MockStack::new();
        stack.subscribed = true;
        let clock = MockClock::new();

        assert_eq!(role.write(&mut stack, &clock, b"abcd"), 4);
        assert_eq!(stack.count(|op| matches!(op, Op::Notify(_))), 1);
        assert_eq!(stack.notified.as_slice(), b"abcd");
    }

    #[test]
    fn overflow_byte_waits_for_timeout_flush() {
        let mut role = TestRole::new();
        let mut stack = MockStack::new();
        stack.subscribed = true;
        let clock = MockClock::new();

        // Capacity + 1: one full chunk goes out during the write, the
        // trailing byte goes out on the timer.
        assert_eq!(role.write(&mut stack, &clock, b"abcde"), 5);
        assert_eq!(stack.ops(), &[Op::Notify(4)]);

        clock.advance(150);
        role.poll(&mut stack, &clock);
        assert_eq!(stack.ops(), &[Op::Notify(4), Op::Notify(1)]);
        assert_eq!(stack.notified.as_slice(), b"abcde");
    }

    #[test]
    fn timeout_flush_fires_exactly_once() {
        let mut role = TestRole::new();
        let mut stack = MockStack::new();
        stack.subscribed = true;
        let clock = MockClock::new();

        role.write(&mut stack, &clock, b"hi");
        clock.advance(150);
        role.poll(&mut stack, &clock);
        assert_eq!(stack.count(|op| matches!(op, Op::Notify(_))), 1);

        // Repeated polls with no new data produce no further notifications
        role.poll(&mut stack, &clock);
        clock.advance(150);
        role.poll(&mut stack, &clock);
        assert_eq!(stack.count(|op| matches!(op, Op::Notify(_))), 1);
    }

    #[test]
    fn poll_with_nothing_pending_only_services_stack() {
        let mut role = TestRole::new();
        let mut stack = MockStack::new();
        let clock = MockClock::new();

        role.poll(&mut stack, &clock);
        assert_eq!(stack.ops(), &[]);
        assert_eq!(stack.polls, 1);
    }

    #[test]
    fn multi_chunk_write_preserves_order() {
        let mut role = TestRole::new();
        let mut stack = MockStack::new();
        stack.subscribed = true;
        let clock = MockClock::new();

        assert_eq!(role.write(&mut stack, &clock, b"0123456789ab"), 12);
        assert_eq!(
            stack.ops(),
            &[Op::Notify(4), Op::Notify(4), Op::Notify(4)]
        );
        assert_eq!(stack.notified.as_slice(), b"0123456789ab");
    }

    #[test]
    fn received_chunks_become_readable_lines() {
        let mut role = TestRole::new();

        role.on_received(b"tempera");
        role.on_received(b"ture 21\n");
        assert_eq!(role.available_lines(), 1);

        let mut out = [0u8; 32];
        let n = role.read_line(&mut out);
        assert_eq!(&out[..n], b"temperature 21");
    }

    #[test]
    fn setup_propagates_stack_init_failure() {
        let mut role = TestRole::new();
        let mut stack = MockStack::new();
        stack.fail_advertise = true;

        assert_eq!(role.setup(&mut stack, "uart"), Err(StackError::InitFailed));
    }

    #[test]
    fn end_clears_receive_buffer_and_flushes() {
        let mut role = TestRole::new();
        let mut stack = MockStack::new();
        stack.subscribed = true;
        let clock = MockClock::new();

        role.on_received(b"stale\n");
        role.write(&mut stack, &clock, b"by");
        role.end(&mut stack, &clock);

        assert_eq!(role.available(), 0);
        assert_eq!(role.available_lines(), 0);
        assert_eq!(stack.notified.as_slice(), b"by");
    }
}
