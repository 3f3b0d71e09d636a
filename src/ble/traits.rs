//! GATT stack trait for abstraction and testability
//!
//! This trait defines the interface the transport needs from the underlying
//! BLE stack, allowing the real controller bindings to be swapped with a
//! mock for testing. Stack events (discovery, disconnects, inbound
//! characteristic writes and notifications) are delivered by the embedding
//! glue calling the matching handler method on the role instance, so the
//! trait only covers the command direction.

use uuid::Uuid;

/// Errors that can occur during GATT stack operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    /// The controller failed to initialise, register the service, or advertise
    InitFailed,
    /// Scan request was rejected by the stack
    ScanFailed,
    /// Connection attempt to a discovered peer failed
    ConnectFailed,
    /// GATT attribute discovery on the peer failed
    DiscoveryFailed,
    /// Subscription to a characteristic failed
    SubscribeFailed,
    /// Outbound attribute update (write or notify) was rejected
    WriteFailed,
}

/// Capability flags reported for a remote characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharacteristicProps {
    /// Characteristic accepts writes
    pub can_write: bool,
    /// Characteristic supports notification subscription
    pub can_subscribe: bool,
}

/// Abstract GATT stack interface
///
/// The transport is single-threaded and cooperative: [`GattStack::poll`]
/// must be invoked regularly (the roles do so from their own `poll` and
/// `flush`) to let the stack service the link. No method may block
/// indefinitely.
pub trait GattStack {
    /// Opaque handle to a remote peer
    type Peer: Copy + PartialEq + core::fmt::Debug;
    /// Opaque handle to a characteristic on a connected peer
    type Characteristic: Copy + PartialEq + core::fmt::Debug;

    /// Register the UART service with its RX/TX characteristics under the
    /// given device name and begin advertising it.
    fn advertise(&mut self, name: &str) -> Result<(), StackError>;

    /// True when a remote central has subscribed to the local TX
    /// characteristic's notifications.
    fn notify_subscribed(&self) -> bool;

    /// Push one chunk to the local TX characteristic, notifying subscribers
    fn notify(&mut self, data: &[u8]) -> Result<(), StackError>;

    /// Start scanning for advertisers of the given service UUID
    fn scan_for_service(&mut self, service: Uuid) -> Result<(), StackError>;

    /// Stop an in-progress scan
    fn stop_scan(&mut self);

    /// Attempt to connect to a discovered peer
    fn connect(&mut self, peer: Self::Peer) -> Result<(), StackError>;

    /// Drop the connection to a peer. Also used to release half-established
    /// connections, so it must tolerate peers that never fully connected.
    fn disconnect(&mut self, peer: Self::Peer);

    /// Run GATT attribute discovery on a connected peer
    fn discover_attributes(&mut self, peer: Self::Peer) -> Result<(), StackError>;

    /// Look up a characteristic on a connected peer by UUID
    fn characteristic(&mut self, peer: Self::Peer, uuid: Uuid) -> Option<Self::Characteristic>;

    /// Capability flags of a previously looked-up characteristic
    fn properties(&self, characteristic: Self::Characteristic) -> CharacteristicProps;

    /// Subscribe to notifications from a peer characteristic
    fn subscribe(&mut self, characteristic: Self::Characteristic) -> Result<(), StackError>;

    /// Write one chunk to a peer characteristic
    fn write_characteristic(
        &mut self,
        characteristic: Self::Characteristic,
        data: &[u8],
    ) -> Result<(), StackError>;

    /// Current link-connected status
    fn connected(&self) -> bool;

    /// Service the stack's internal event processing
    fn poll(&mut self);
}
