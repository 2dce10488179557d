use crate::{
    config::HostConfig,
    constants::HANDSHAKE_DRAIN,
    transport::{Transport, TransportError},
    types::Order,
};
#[cfg(feature = "lights")]
use crate::types::{BallMovement, Light};
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ProtocolError {
    Transport(TransportError),
    /// The device answered something other than RECEIVED.
    NotAcknowledged { sent: Order, got: Order },
    /// The device answered ERROR.
    DeviceError { sent: Order },
    /// Debug echo did not repeat what was sent.
    EchoMismatch { sent: Order, got: Order },
    ValueOutOfRange { name: &'static str, value: i64 },
    HandshakeFailed { attempts: u32 },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Transport(e) => write!(f, "{}", e),
            ProtocolError::NotAcknowledged { sent, got } => {
                write!(f, "Order {} was not acknowledged, device replied {}", sent, got)
            }
            ProtocolError::DeviceError { sent } => write!(f, "Device reported an error for order {}", sent),
            ProtocolError::EchoMismatch { sent, got } => {
                write!(f, "Debug echo mismatch: sent {} but device echoed {}", sent, got)
            }
            ProtocolError::ValueOutOfRange { name, value } => {
                write!(f, "{} value {} does not fit in an int16", name, value)
            }
            ProtocolError::HandshakeFailed { attempts } => {
                write!(f, "Arduino did not answer HELLO after {} attempts", attempts)
            }
        }
    }
}

impl Error for ProtocolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProtocolError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for ProtocolError {
    fn from(e: TransportError) -> Self {
        ProtocolError::Transport(e)
    }
}

pub struct Controller {
    transport: Transport,
    config: HostConfig,
    connected: bool,
}

impl Controller {
    /// Opens the configured port, or the first one found.
    pub fn new(config: HostConfig) -> Result<Self, ProtocolError> {
        let transport = match &config.port {
            Some(port) => Transport::open(port, config.baud_rate)?,
            None => Transport::detect(config.baud_rate)?,
        };
        Ok(Self::with_transport(transport, config))
    }

    pub fn with_transport(transport: Transport, config: HostConfig) -> Self {
        Controller {
            transport,
            config,
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Repeats HELLO until the Arduino answers HELLO or ALREADY_CONNECTED,
    /// then waits for its RECEIVED.
    pub async fn connect(&mut self) -> Result<(), ProtocolError> {
        tokio::time::sleep(self.config.settle_delay()).await;

        let mut attempts = 0u32;
        loop {
            if let Some(max) = self.config.max_attempts {
                if attempts >= max {
                    return Err(ProtocolError::HandshakeFailed { attempts });
                }
            }
            attempts += 1;

            println!("Waiting for Arduino...");
            self.transport.send_order(Order::Hello).await?;
            match self.transport.recv_byte().await? {
                Some(byte) if byte == Order::Hello.code() || byte == Order::AlreadyConnected.code() => break,
                Some(byte) => println!("Ignoring byte {} while waiting for HELLO", byte),
                None => tokio::time::sleep(self.config.retry_delay()).await,
            }
        }

        println!("Connecting to Arduino...");
        // Replies still queued behind the first one: boot HELLOs, late answers
        // to earlier attempts, plus the echo in debug mode. Skipping a fixed
        // count keeps the next read aligned with the handshake's RECEIVED.
        let drain = HANDSHAKE_DRAIN + usize::from(self.config.debug);
        for _ in 0..drain {
            let skipped = self.transport.recv_order().await?;
            println!("Skipping {} during handshake", skipped);
        }

        match self.transport.recv_order().await? {
            Order::Received => {
                self.connected = true;
                println!("Connected to Arduino!");
                Ok(())
            }
            got => Err(ProtocolError::NotAcknowledged {
                sent: Order::Hello,
                got,
            }),
        }
    }

    /// Sends `order` and waits for RECEIVED.
    pub async fn send(&mut self, order: Order) -> Result<(), ProtocolError> {
        self.transport.send_order(order).await?;
        self.expect_received(order, None).await
    }

    #[cfg(feature = "hardware-trigger")]
    async fn send_with_arg(&mut self, order: Order, name: &'static str, value: i64) -> Result<(), ProtocolError> {
        let arg = i16::try_from(value).map_err(|_| ProtocolError::ValueOutOfRange { name, value })?;
        self.transport.send_order(order).await?;
        self.transport.send_i16(arg).await?;
        self.expect_received(order, Some(arg)).await
    }

    async fn expect_received(&mut self, sent: Order, arg: Option<i16>) -> Result<(), ProtocolError> {
        if self.config.debug {
            let echoed = self.transport.recv_order().await?;
            if echoed != sent {
                return Err(ProtocolError::EchoMismatch { sent, got: echoed });
            }
            if let Some(arg) = arg {
                let echoed_arg = self.transport.recv_i16().await?;
                if echoed_arg != arg {
                    println!("Debug echo of {} argument: sent {} got {}", sent.name(), arg, echoed_arg);
                }
            }
        }

        match self.transport.recv_order().await? {
            Order::Received => Ok(()),
            Order::Error => Err(ProtocolError::DeviceError { sent }),
            got => Err(ProtocolError::NotAcknowledged { sent, got }),
        }
    }

    pub async fn start_cam(&mut self) -> Result<(), ProtocolError> {
        self.send(Order::StartCam).await?;
        println!("Camera hardware triggering started!");
        Ok(())
    }

    /// Sends the trigger period and exposure time, then starts the camera.
    #[cfg(feature = "hardware-trigger")]
    pub async fn configure_hardware_trigger(&mut self) -> Result<(), ProtocolError> {
        let period = self.config.frame_period_us();
        self.send_with_arg(Order::ConfigureCamFps, "Frame period", period).await?;
        println!("Hardware trigger configured [FPS] successfully!");

        let exposure = i64::from(self.config.exposure_time);
        self.send_with_arg(Order::ConfigureCamExposureTime, "Exposure time", exposure)
            .await?;
        println!("Hardware trigger configured [EXPOSURE_TIME] successfully!");

        self.start_cam().await
    }

    #[cfg(feature = "lights")]
    pub async fn switch_light(&mut self, light: Light, on: bool) -> Result<(), ProtocolError> {
        let order = Order::light_switch(light, on);
        self.send(order).await.map_err(|e| {
            println!("Failed to send {} to light on pin {}: {}", order.name(), light.pin(), e);
            e
        })
    }

    #[cfg(feature = "lights")]
    pub async fn switch_left_light(&mut self, on: bool) -> Result<(), ProtocolError> {
        self.switch_light(Light::Left, on).await
    }

    #[cfg(feature = "lights")]
    pub async fn switch_right_light(&mut self, on: bool) -> Result<(), ProtocolError> {
        self.switch_light(Light::Right, on).await
    }

    /// Mirrors the ball's motion on the lights. The light being turned off is
    /// switched first so both are never on together.
    #[cfg(feature = "lights")]
    pub async fn indicate(&mut self, movement: BallMovement) -> Result<(), ProtocolError> {
        let (left, right) = movement.lights();
        if left {
            self.switch_right_light(right).await?;
            self.switch_left_light(left).await
        } else {
            self.switch_left_light(left).await?;
            self.switch_right_light(right).await
        }
    }
}
