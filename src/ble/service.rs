//! Nordic UART Service (NUS) definition
//!
//! The de-facto standard service for BLE serial communication.
//! - Service UUID: 6E400001-B5A3-F393-E0A9-E50E24DCCA9E
//! - RX Characteristic: 6E400002-... (write, write without response)
//! - TX Characteristic: 6E400003-... (notify)
//!
//! Direction names follow the peripheral's point of view: a central writes
//! host→device bytes to RX, and the peripheral notifies device→host bytes
//! on TX. A host role therefore transmits on the peer's RX characteristic
//! and receives from the peer's TX characteristic.

use uuid::Uuid;

/// UART service UUID advertised by the peripheral and scanned for by the host
pub const UART_SERVICE_UUID: Uuid = Uuid::from_u128(0x6E400001_B5A3_F393_E0A9_E50E24DCCA9E);

/// RX characteristic UUID: the peripheral's inbound byte stream
pub const RX_CHARACTERISTIC_UUID: Uuid = Uuid::from_u128(0x6E400002_B5A3_F393_E0A9_E50E24DCCA9E);

/// TX characteristic UUID: the peripheral's outbound byte stream
pub const TX_CHARACTERISTIC_UUID: Uuid = Uuid::from_u128(0x6E400003_B5A3_F393_E0A9_E50E24DCCA9E);
