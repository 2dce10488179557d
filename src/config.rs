use crate::constants::*;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tokio::time::Duration;

/// Host-side settings for talking to the Arduino, read from a JSON file.
/// Every field is optional; missing ones fall back to the device parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Serial device path. Auto-detected when absent.
    pub port: Option<String>,
    pub baud_rate: u32,
    /// Camera trigger rate in frames per second.
    pub fps: f64,
    /// Exposure time in microseconds.
    pub exposure_time: i32,
    /// Must match the device's DEBUG flag.
    pub debug: bool,
    pub settle_delay_ms: u64,
    pub retry_delay_ms: u64,
    /// HELLO attempts before giving up. Unlimited when absent.
    pub max_attempts: Option<u32>,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            port: None,
            baud_rate: SERIAL_BAUD,
            fps: 100.0,
            exposure_time: 3000,
            debug: DEBUG,
            settle_delay_ms: SETTLE_DELAY_MS,
            retry_delay_ms: RETRY_DELAY_MS,
            max_attempts: None,
        }
    }
}

impl HostConfig {
    pub fn from_json(text: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let config: HostConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_json(&text)
    }

    /// The trigger period and exposure travel as int16 microseconds, so both
    /// must land in `1..=i16::MAX`.
    pub fn validate(&self) -> Result<(), String> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(format!("fps must be positive, got {}", self.fps));
        }
        let period = self.frame_period_us();
        if !(1..=i64::from(i16::MAX)).contains(&period) {
            return Err(format!(
                "fps {} gives a frame period of {}us, outside 1..={}",
                self.fps,
                period,
                i16::MAX
            ));
        }
        if !(1..=i32::from(i16::MAX)).contains(&self.exposure_time) {
            return Err(format!(
                "exposure_time {} is outside 1..={}",
                self.exposure_time,
                i16::MAX
            ));
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Trigger period in microseconds for the configured frame rate.
    pub fn frame_period_us(&self) -> i64 {
        (1_000_000.0 / self.fps) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_device_defaults() {
        let config = HostConfig::from_json("{}").unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.baud_rate, 115200);
        assert!(!config.debug);
        assert_eq!(config.settle_delay(), Duration::from_secs(3));
    }

    #[test]
    fn fields_override_defaults() {
        let config = HostConfig::from_json(
            r#"{"port": "/dev/ttyACM0", "fps": 100, "exposure_time": 2500, "debug": true, "max_attempts": 5}"#,
        )
        .unwrap();
        assert_eq!(config.port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(config.frame_period_us(), 10_000);
        assert_eq!(config.exposure_time, 2500);
        assert!(config.debug);
        assert_eq!(config.max_attempts, Some(5));
        assert_eq!(config.retry_delay_ms, RETRY_DELAY_MS);
    }

    #[test]
    fn default_period_fits_int16() {
        let config = HostConfig::default();
        assert!(i16::try_from(config.frame_period_us()).is_ok());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn from_json_rejects_unusable_trigger_values() {
        for text in [
            r#"{"fps": -5}"#,
            r#"{"fps": 0}"#,
            r#"{"fps": 30}"#,
            r#"{"exposure_time": 40000}"#,
            r#"{"exposure_time": -1}"#,
        ] {
            assert!(HostConfig::from_json(text).is_err(), "{} was accepted", text);
        }
        assert_eq!(HostConfig::from_json(r#"{"fps": 31}"#).unwrap().frame_period_us(), 32258);
    }

    #[test]
    fn load_rejects_non_positive_fps() {
        let path = std::env::temp_dir().join(format!("cam_controller_fps_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"fps": 0}"#).unwrap();
        let err = HostConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("fps"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = HostConfig::load("/nonexistent/cam_controller.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
