use crate::constants::*;

/// Hardware configuration flashed into the Arduino, grouped in one place so it
/// can be inspected without a device attached.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Parameters {
    /// Serial rate in bits per second.
    pub serial_baud: u32,
    pub led_pin: u8,
    pub cam_pin: u8,
    pub left_light_pin: u8,
    pub right_light_pin: u8,
    /// Device echoes every received message back when set.
    pub debug: bool,
}

impl Parameters {
    pub const DEFAULT: Parameters = Parameters {
        serial_baud: SERIAL_BAUD,
        led_pin: LED_PIN,
        cam_pin: CAM_PIN,
        left_light_pin: LEFT_LIGHT_PIN,
        right_light_pin: RIGHT_LIGHT_PIN,
        debug: DEBUG,
    };

    /// All output pins the device configures at startup.
    pub fn output_pins(&self) -> [u8; 4] {
        [self.led_pin, self.cam_pin, self.left_light_pin, self.right_light_pin]
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters::DEFAULT
    }
}
