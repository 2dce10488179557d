// Serial link
pub const SERIAL_BAUD: u32 = 115200;

// Pin assignments on the Arduino
pub const LED_PIN: u8 = 13;
pub const CAM_PIN: u8 = 12;
pub const LEFT_LIGHT_PIN: u8 = 4;
pub const RIGHT_LIGHT_PIN: u8 = 5;

/// When set, the Arduino sends back every message it receives before replying.
pub const DEBUG: bool = false;

// Handshake timing
pub const SETTLE_DELAY_MS: u64 = 3000;
pub const RETRY_DELAY_MS: u64 = 3000;
pub const READ_TIMEOUT_MS: u64 = 1000;

/// Orders skipped after the first HELLO/ALREADY_CONNECTED byte. The next one
/// must be RECEIVED.
pub const HANDSHAKE_DRAIN: usize = 2;
