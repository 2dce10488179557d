#![allow(dead_code)]

use cam_controller::{HostConfig, Order};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::Arc;

/// HELLOs the Arduino's setup loop has queued by the time the host writes its
/// first byte (one per second, host settles for three).
pub const BOOT_HELLOS: usize = 2;

/// Arduino stand-in speaking the order protocol over an in-memory link.
#[derive(Default)]
pub struct DeviceState {
    pub written: Vec<u8>,
    pub rx: VecDeque<u8>,
    pub connected: bool,
    pub debug: bool,
    /// HELLOs dropped without any answer.
    pub silent_hellos: u32,
    /// HELLOs whose answer only goes out when the next HELLO arrives.
    pub late_hellos: u32,
    /// Reply sent instead of RECEIVED for every non-HELLO order.
    pub reply: Option<Order>,
    pub left_light: bool,
    pub right_light: bool,
    owed_hellos: u32,
    pending: Option<(u8, Vec<u8>)>,
}

#[derive(Clone, Default)]
pub struct FakeArduino {
    pub state: Arc<Mutex<DeviceState>>,
}

// CONFIGURE_CAM_FPS and CONFIGURE_CAM_EXPOSURE_TIME carry an int16.
fn argument_len(code: u8) -> usize {
    if cfg!(feature = "hardware-trigger") && (code == 12 || code == 13) {
        2
    } else {
        0
    }
}

impl DeviceState {
    fn push(&mut self, order: Order) {
        self.rx.push_back(order.code());
    }

    fn answer_hello(&mut self) {
        if self.debug {
            self.push(Order::Hello);
        }
        if self.connected {
            self.push(Order::AlreadyConnected);
        } else {
            self.connected = true;
            self.push(Order::Hello);
        }
        self.push(Order::Received);
    }

    fn handle_byte(&mut self, byte: u8) {
        if let Some((code, mut arg)) = self.pending.take() {
            arg.push(byte);
            if arg.len() < argument_len(code) {
                self.pending = Some((code, arg));
            } else {
                self.finish(code, &arg);
            }
            return;
        }

        if byte == Order::Hello.code() {
            if self.silent_hellos > 0 {
                self.silent_hellos -= 1;
                return;
            }
            if self.late_hellos > 0 {
                self.late_hellos -= 1;
                self.owed_hellos += 1;
                return;
            }
            while self.owed_hellos > 0 {
                self.owed_hellos -= 1;
                self.answer_hello();
            }
            self.answer_hello();
            return;
        }

        if argument_len(byte) > 0 {
            self.pending = Some((byte, Vec::new()));
        } else {
            self.finish(byte, &[]);
        }
    }

    fn finish(&mut self, code: u8, arg: &[u8]) {
        if self.debug {
            self.rx.push_back(code);
            self.rx.extend(arg.iter().copied());
        }
        self.track_lights(code);
        let reply = self.reply.unwrap_or(Order::Received);
        self.push(reply);
    }

    #[cfg(feature = "lights")]
    fn track_lights(&mut self, code: u8) {
        match Order::try_from(code) {
            Ok(Order::TurnLeftLightOn) => self.left_light = true,
            Ok(Order::TurnLeftLightOff) => self.left_light = false,
            Ok(Order::TurnRightLightOn) => self.right_light = true,
            Ok(Order::TurnRightLightOff) => self.right_light = false,
            _ => {}
        }
    }

    #[cfg(not(feature = "lights"))]
    fn track_lights(&mut self, _code: u8) {}
}

impl FakeArduino {
    /// A freshly reset board that has already sent its boot HELLOs.
    pub fn new() -> Self {
        Self::booted(BOOT_HELLOS)
    }

    pub fn booted(boot_hellos: usize) -> Self {
        let device = Self::default();
        device
            .state
            .lock()
            .rx
            .extend(std::iter::repeat(Order::Hello.code()).take(boot_hellos));
        device
    }

    pub fn with(self, f: impl FnOnce(&mut DeviceState)) -> Self {
        f(&mut self.state.lock());
        self
    }

    pub fn written(&self) -> Vec<u8> {
        self.state.lock().written.clone()
    }

    pub fn pending_rx(&self) -> Vec<u8> {
        self.state.lock().rx.iter().copied().collect()
    }
}

impl Read for FakeArduino {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        let n = buf.len().min(state.rx.len());
        for slot in buf.iter_mut().take(n) {
            *slot = state.rx.pop_front().unwrap();
        }
        Ok(n)
    }
}

impl Write for FakeArduino {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        for &byte in buf {
            state.written.push(byte);
            state.handle_byte(byte);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn test_config() -> HostConfig {
    HostConfig {
        settle_delay_ms: 0,
        retry_delay_ms: 0,
        max_attempts: Some(10),
        ..HostConfig::default()
    }
}

pub fn debug_config() -> HostConfig {
    HostConfig {
        debug: true,
        ..test_config()
    }
}
