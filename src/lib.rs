#![cfg_attr(not(test), no_std)]

//! UART/serial port emulation over a BLE GATT link, following the Nordic
//! UART Service convention.
//!
//! Two roles are provided:
//! - [`peripheral::PeripheralRole`]: advertises the UART service and pushes
//!   outgoing bytes to a subscribed central via notifications.
//! - [`host::HostRole`]: scans for a peripheral advertising the UART service,
//!   connects, validates its characteristics, subscribes, and reconnects
//!   automatically after a disconnect.
//!
//! Both roles expose byte- and line-oriented `read`/`write` semantics while
//! the transport handles chunking to the link's maximum attribute payload,
//! receive buffering, and transmit coalescing. The BLE stack and the
//! monotonic clock are abstracted behind [`ble::traits::GattStack`] and
//! [`time::MonotonicClock`] so the crate stays hardware-agnostic and
//! testable off-target.

pub mod ble;
pub mod buffer;
pub mod config;
pub mod host;
pub mod peripheral;
pub mod time;
pub mod transmit;
