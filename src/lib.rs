mod codec;
mod config;
mod constants;
mod controller;
mod parameters;
mod transport;
mod types;

pub use config::HostConfig;
pub use controller::{Controller, ProtocolError};
pub use parameters::Parameters;
pub use transport::{Link, Transport, TransportError};
pub use types::{BallMovement, Light, Order, UnknownBallMovement, UnknownOrder};

// Re-export the wire helpers and the raw device header values
pub use codec::{read_i16, read_i32, read_i8, read_order, write_i16, write_i32, write_i8, write_order};
pub use constants::{CAM_PIN, DEBUG, LED_PIN, LEFT_LIGHT_PIN, RIGHT_LIGHT_PIN, SERIAL_BAUD};
