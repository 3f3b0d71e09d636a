//! Host (central) role: finds a peripheral advertising the UART service and
//! owns the connection's lifecycle.
//!
//! The establishment sequence runs as a chain of synchronous stack calls the
//! moment a peer is discovered: stop scanning, connect, discover attributes,
//! look up and validate both characteristics, subscribe, and confirm the
//! link survived the setup. Every failure branch converges on one recovery
//! path: release the half-established connection and resume scanning. The
//! application never sees a hard error; it observes progress through
//! [`HostRole::state`] and [`HostRole::is_connected`].

use log::{debug, info, warn};

use crate::ble::service::{RX_CHARACTERISTIC_UUID, TX_CHARACTERISTIC_UUID, UART_SERVICE_UUID};
use crate::ble::traits::{GattStack, StackError};
use crate::buffer::LineBuffer;
use crate::config::buffers::RECEIVE_BUFFER_SIZE;
use crate::config::protocol::MAX_ATTRIBUTE_PAYLOAD;
use crate::time::MonotonicClock;
use crate::transmit::TransmitCoalescer;

/// Connection state machine phases.
///
/// The intermediate phases are transient: they resolve within the discovery
/// handler, so steady-state observations are `Scanning`, `Connected`, or
/// (briefly) `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Scanning,
    Discovered,
    Connecting,
    DiscoveringAttributes,
    ValidatingCharacteristics,
    Subscribing,
    Connected,
    Disconnected,
}

/// Why a connection attempt was abandoned.
///
/// Never surfaced to the application; logged and recovered internally. A
/// peer with a malformed UART service (`Missing*`/`Not*`) is treated the
/// same as a link-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// A stack operation failed
    Stack(StackError),
    /// Peer does not expose the UART RX characteristic
    MissingWriteCharacteristic,
    /// Peer does not expose the UART TX characteristic
    MissingNotifyCharacteristic,
    /// Peer RX characteristic does not accept writes
    NotWritable,
    /// Peer TX characteristic does not support subscription
    NotSubscribable,
    /// The link dropped while the setup sequence was still running
    LinkDropped,
}

impl From<StackError> for LinkError {
    fn from(err: StackError) -> Self {
        LinkError::Stack(err)
    }
}

/// Validated handles for an established link
struct Link<S: GattStack> {
    peer: S::Peer,
    /// Peer's RX characteristic: this side's transmit target
    write_char: S::Characteristic,
    /// Peer's TX characteristic: this side's receive source
    notify_char: S::Characteristic,
}

/// BLE serial transport in the host role.
///
/// Generic over the stack because it holds the peer and characteristic
/// handles of the current link. `RX_CAP` is the receive buffer capacity,
/// `CHUNK` the link's maximum attribute payload.
pub struct HostRole<
    S: GattStack,
    const RX_CAP: usize = { RECEIVE_BUFFER_SIZE },
    const CHUNK: usize = { MAX_ATTRIBUTE_PAYLOAD },
> {
    recv: LineBuffer<RX_CAP>,
    tx: TransmitCoalescer<CHUNK>,
    state: LinkState,
    link: Option<Link<S>>,
    /// Gates re-scan triggering from `poll` when a disconnect event was missed
    was_connected: bool,
}

impl<S: GattStack, const RX_CAP: usize, const CHUNK: usize> HostRole<S, RX_CAP, CHUNK> {
    /// Create a host with no link; call [`HostRole::setup`] to start scanning.
    pub fn new() -> Self {
        Self {
            recv: LineBuffer::new(),
            tx: TransmitCoalescer::default(),
            state: LinkState::Disconnected,
            link: None,
            was_connected: false,
        }
    }

    /// Start scanning for advertisers of the UART service
    pub fn setup(&mut self, stack: &mut S) -> Result<(), StackError> {
        stack.scan_for_service(UART_SERVICE_UUID)?;
        self.state = LinkState::Scanning;
        Ok(())
    }

    /// Current state machine phase
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Handle of the connected counterpart device, if any
    pub fn peer(&self) -> Option<S::Peer> {
        self.link.as_ref().map(|link| link.peer)
    }

    /// Discovery event handler.
    ///
    /// Ignored unless currently scanning: scanning is stopped before the
    /// connect attempt, so a duplicate discovery event cannot start a second
    /// attempt until this one resolves and scanning is explicitly re-armed.
    pub fn on_discovered(&mut self, stack: &mut S, peer: S::Peer) {
        if self.state != LinkState::Scanning {
            debug!("ignoring discovery of {:?} in state {:?}", peer, self.state);
            return;
        }
        self.state = LinkState::Discovered;
        stack.stop_scan();

        match self.establish(stack, peer) {
            Ok(link) => {
                info!("uart link established to {:?}", peer);
                self.link = Some(link);
                self.was_connected = true;
                self.state = LinkState::Connected;
            }
            Err(err) => {
                warn!("link setup to {:?} failed: {:?}", peer, err);
                stack.disconnect(peer);
                self.resume_scanning(stack);
            }
        }
    }

    /// Run the establishment sequence against a discovered peer
    fn establish(&mut self, stack: &mut S, peer: S::Peer) -> Result<Link<S>, LinkError> {
        self.state = LinkState::Connecting;
        stack.connect(peer)?;

        self.state = LinkState::DiscoveringAttributes;
        stack.discover_attributes(peer)?;

        self.state = LinkState::ValidatingCharacteristics;
        // The peer's receive characteristic is this side's transmit target
        let write_char = stack
            .characteristic(peer, RX_CHARACTERISTIC_UUID)
            .ok_or(LinkError::MissingWriteCharacteristic)?;
        if !stack.properties(write_char).can_write {
            return Err(LinkError::NotWritable);
        }
        // The peer's transmit characteristic is this side's receive source
        let notify_char = stack
            .characteristic(peer, TX_CHARACTERISTIC_UUID)
            .ok_or(LinkError::MissingNotifyCharacteristic)?;
        if !stack.properties(notify_char).can_subscribe {
            return Err(LinkError::NotSubscribable);
        }

        self.state = LinkState::Subscribing;
        stack.subscribe(notify_char)?;

        // A disconnect can race the setup sequence; check one final time
        if !stack.connected() {
            return Err(LinkError::LinkDropped);
        }

        Ok(Link {
            peer,
            write_char,
            notify_char,
        })
    }

    /// Disconnect event handler: invalidate the link and scan again.
    ///
    /// Buffered received data stays readable after the link is gone.
    pub fn on_disconnected(&mut self, stack: &mut S, peer: S::Peer) {
        info!("peer {:?} disconnected, resuming scan", peer);
        self.was_connected = false;
        self.state = LinkState::Disconnected;
        self.resume_scanning(stack);
    }

    /// Notification handler for the subscribed peer TX characteristic.
    ///
    /// Chunks for any other characteristic are ignored.
    pub fn on_notification(&mut self, characteristic: S::Characteristic, data: &[u8]) {
        match &self.link {
            Some(link) if link.notify_char == characteristic => self.recv.extend(data),
            _ => {}
        }
    }

    fn resume_scanning(&mut self, stack: &mut S) {
        self.link = None;
        self.state = LinkState::Scanning;
        if let Err(err) = stack.scan_for_service(UART_SERVICE_UUID) {
            warn!("failed to re-arm scanning: {:?}", err);
        }
    }

    /// Transmit-ready predicate: link established and still connected.
    ///
    /// The host is the subscriber, not the subscribed; raw connected status
    /// is the whole story on this side.
    pub fn transmit_ready(&self, stack: &S) -> bool {
        self.link.is_some() && stack.connected()
    }

    /// Queue bytes for transmission, flushing full chunks as they form.
    ///
    /// Partial-write contract as on the peripheral side: readiness is
    /// re-checked before each chunk fill and the accepted count is returned.
    pub fn write<C>(&mut self, stack: &mut S, clock: &C, data: &[u8]) -> usize
    where
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
    pub fn write_byte<C>(&mut self, stack: &mut S, clock: &C, byte: u8) -> usize
    where
        C: MonotonicClock,
    {
        self.write(stack, clock, &[byte])
    }

    /// Write any pending chunk to the peer's RX characteristic and stamp the
    /// flush time.
    pub fn flush<C>(&mut self, stack: &mut S, clock: &C)
    where
        C: MonotonicClock,
    {
        if let Some(link) = &self.link {
            if let Some(chunk) = self.tx.take_chunk() {
                if let Err(err) = stack.write_characteristic(link.write_char, &chunk) {
                    warn!("dropping {} byte chunk, write failed: {:?}", chunk.len(), err);
                }
            }
        }
        self.tx.mark_flushed(clock.now_ms());
        stack.poll();
    }

    /// Periodic service entry point.
    ///
    /// Re-arms scanning if the link went away without a disconnect event
    /// (gated by the previously-connected flag so it fires once), then
    /// applies the flush-on-timeout rule.
    pub fn poll<C>(&mut self, stack: &mut S, clock: &C)
    where
        C: MonotonicClock,
    {
        if self.was_connected && !stack.connected() {
            warn!("link lost without a disconnect event, resuming scan");
            self.was_connected = false;
            self.state = LinkState::Disconnected;
            self.resume_scanning(stack);
        }
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
    pub fn is_connected(&self, stack: &S) -> bool {
        stack.connected()
    }

    /// Drop buffered received data and push out anything pending.
    pub fn end<C>(&mut self, stack: &mut S, clock: &C)
    where
        C: MonotonicClock,
    {
        self.recv.clear();
        self.flush(stack, clock);
    }
}

impl<S: GattStack, const RX_CAP: usize, const CHUNK: usize> Default for HostRole<S, RX_CAP, CHUNK> {
    fn default() -> Self {
        Self::new()
    }
}
