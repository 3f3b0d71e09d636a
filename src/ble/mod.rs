//! BLE-facing definitions: the Nordic UART Service constants and the
//! abstract GATT stack interface the transport drives.

pub mod service;
pub mod traits;
