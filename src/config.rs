//! Configuration constants for the BLE serial transport

/// Protocol constants
pub mod protocol {
    /// Maximum payload of a single GATT attribute update (write or notify).
    ///
    /// 20 bytes is the classic ATT_MTU(23) minus the 3-byte ATT header. All
    /// chunking is parameterised on this value, so a link that negotiates a
    /// larger payload can instantiate the transport with a bigger chunk.
    pub const MAX_ATTRIBUTE_PAYLOAD: usize = 20;

    /// Line delimiter for the line-oriented read API
    pub const LINE_DELIMITER: u8 = b'\n';
}

/// Buffer capacities
pub mod buffers {
    /// Capacity of the receive ring buffer, in bytes
    pub const RECEIVE_BUFFER_SIZE: usize = 256;
}

/// Timing configuration
pub mod timing {
    /// Flush a partially filled transmit chunk after this many milliseconds
    /// without a flush, so trailing bytes are not held indefinitely.
    pub const FLUSH_INTERVAL_MS: u64 = 100;
}
