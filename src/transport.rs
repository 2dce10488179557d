use crate::codec;
use crate::constants::READ_TIMEOUT_MS;
use crate::types::{Order, UnknownOrder};
use parking_lot::Mutex;
use serialport::{DataBits, FlowControl, Parity, SerialPortType, StopBits};
use std::error::Error;
use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;
use tokio::time::Duration;

/// Anything the controller can talk through: a serial port or an in-memory
/// stand-in.
pub trait Link: Read + Write + Send {}

impl<T: Read + Write + Send> Link for T {}

#[derive(Debug)]
pub enum TransportError {
    Io(io::Error),
    UnknownOrder(UnknownOrder),
    DeviceError(String),
    NoDeviceFound,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Io(e) => write!(f, "Serial I/O error: {}", e),
            TransportError::UnknownOrder(e) => write!(f, "{}", e),
            TransportError::DeviceError(msg) => write!(f, "Device error: {}", msg),
            TransportError::NoDeviceFound => write!(f, "No device found"),
        }
    }
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TransportError::Io(e) => Some(e),
            TransportError::UnknownOrder(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(e: io::Error) -> Self {
        match codec::unknown_order(&e) {
            Some(unknown) => TransportError::UnknownOrder(unknown),
            None => TransportError::Io(e),
        }
    }
}

impl From<serialport::Error> for TransportError {
    fn from(e: serialport::Error) -> Self {
        TransportError::DeviceError(e.to_string())
    }
}

impl From<tokio::task::JoinError> for TransportError {
    fn from(e: tokio::task::JoinError) -> Self {
        TransportError::DeviceError(format!("Serial task failed: {}", e))
    }
}

pub struct Transport {
    link: Arc<Mutex<Box<dyn Link>>>,
}

impl Transport {
    /// Opens `port` as 8N1 without flow control.
    pub fn open(port: &str, baud: u32) -> Result<Self, TransportError> {
        let serial = serialport::new(port, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(READ_TIMEOUT_MS))
            .open()?;
        println!("Opened {} at {} baud", port, baud);
        Ok(Self::from_link(serial))
    }

    /// Opens the first USB serial port, falling back to the first port of any
    /// kind.
    pub fn detect(baud: u32) -> Result<Self, TransportError> {
        let ports = serialport::available_ports()?;
        let port = ports
            .iter()
            .find(|p| matches!(p.port_type, SerialPortType::UsbPort(_)))
            .or_else(|| ports.first())
            .ok_or(TransportError::NoDeviceFound)?;
        Self::open(&port.port_name, baud)
    }

    pub fn from_link<L: Link + 'static>(link: L) -> Self {
        let link: Box<dyn Link> = Box::new(link);
        Transport {
            link: Arc::new(Mutex::new(link)),
        }
    }

    async fn with_link<T, F>(&self, op: F) -> Result<T, TransportError>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn Link) -> io::Result<T> + Send + 'static,
    {
        let link = Arc::clone(&self.link);
        let result = tokio::task::spawn_blocking(move || {
            let mut guard = link.lock();
            op(&mut **guard)
        })
        .await?;
        Ok(result?)
    }

    pub async fn send_order(&mut self, order: Order) -> Result<(), TransportError> {
        self.with_link(move |link| {
            codec::write_order(link, order)?;
            link.flush()
        })
        .await
    }

    pub async fn send_i16(&mut self, value: i16) -> Result<(), TransportError> {
        self.with_link(move |link| {
            codec::write_i16(link, value)?;
            link.flush()
        })
        .await
    }

    pub async fn recv_order(&mut self) -> Result<Order, TransportError> {
        self.with_link(|link| codec::read_order(link)).await
    }

    pub async fn recv_i16(&mut self) -> Result<i16, TransportError> {
        self.with_link(|link| codec::read_i16(link)).await
    }

    /// Reads a single raw byte. `None` when nothing arrived before the port's
    /// read timeout.
    pub async fn recv_byte(&mut self) -> Result<Option<u8>, TransportError> {
        self.with_link(|link| {
            let mut buf = [0u8; 1];
            match link.read(&mut buf) {
                Ok(0) => Ok(None),
                Ok(_) => Ok(Some(buf[0])),
                Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .await
    }
}
