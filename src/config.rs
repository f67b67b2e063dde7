// Accelink - Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C6 + MMA8451Q breakout

use std::time::Duration;

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C6 pinout)
// ---------------------------------------------------------------------------
pub const PIN_I2C_SDA: i32 = 5; // D4 - I2C data line
pub const PIN_I2C_SCL: i32 = 6; // D5 - I2C clock line

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_BAUDRATE_KHZ: u32 = 400;
pub const I2C_READ_TIMEOUT_MS: u32 = 1000;
pub const I2C_WRITE_TIMEOUT_MS: u32 = 100;

// ---------------------------------------------------------------------------
// MMA8451 Register Map
// ---------------------------------------------------------------------------
pub const I2C_ADDR_MMA8451: u8 = 0x1D;
pub const REG_OUT_X_MSB: u8 = 0x01; // Start of 6-byte XYZ burst
pub const REG_WHO_AM_I: u8 = 0x0D;
pub const REG_XYZ_DATA_CFG: u8 = 0x0E;
pub const REG_PL_STATUS: u8 = 0x10;
pub const REG_PL_CFG: u8 = 0x11;
pub const REG_PL_COUNT: u8 = 0x12;
pub const REG_PL_BF_ZCOMP: u8 = 0x13;
pub const REG_CTRL_REG1: u8 = 0x2A;

pub const WHO_AM_I_EXPECTED: u8 = 0x1A;

pub const CTRL_STANDBY: u8 = 0x00;
pub const CTRL_ACTIVE: u8 = 0x01;
pub const RANGE_2G: u8 = 0x00;
pub const PL_CFG_ENABLE: u8 = 0x40;
pub const PL_COUNT_DEBOUNCE: u8 = 0x05;
pub const PL_BF_ZCOMP_45DEG: u8 = 0x44;

// ---------------------------------------------------------------------------
// MMA8451 Scale Factors
// ---------------------------------------------------------------------------
pub const ACCEL_SCALE_2G_14BIT: f32 = 4096.0; // LSB/g at ±2 g
pub const GRAVITY_CONSTANT: f32 = 9.80665; // m/s² per g

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_SAMPLER: usize = 12 * 1024; // HTTP client runs on this stack
pub const STACK_TEMPO: usize = 8192;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const SAMPLE_INTERVAL_MS: u64 = 200; // 5 Hz
pub const TEMPO_POLL_INTERVAL_MS: u64 = 3000;
pub const HTTP_TIMEOUT_MS: u64 = 5000;
pub const STARTUP_RETRY_DELAY_MS: u64 = 500;

// ---------------------------------------------------------------------------
// Batch geometry
// ---------------------------------------------------------------------------
pub const AXES_PER_SAMPLE: usize = 3; // x, y, z
pub const SAMPLES_PER_BATCH: usize = 50;
pub const BATCH_CAPACITY: usize = SAMPLES_PER_BATCH * AXES_PER_SAMPLE; // 150

// ---------------------------------------------------------------------------
// Collector endpoint
// ---------------------------------------------------------------------------
pub const COLLECTOR_BASE_URL: &str = "http://10.29.199.121:8000";
pub const UPLOAD_PATH: &str = "/acc_data";
pub const TEMPO_PATH: &str = "/tempo";
pub const PROBE_PATH: &str = "/";

/// Register map and conversion constants for one accelerometer.
///
/// Built once at startup and only ever read afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceConfig {
    pub address: u8,
    pub reg_data_out: u8,
    pub reg_identity: u8,
    pub reg_range: u8,
    pub reg_control: u8,
    pub reg_orientation_status: u8,
    pub reg_orientation_cfg: u8,
    pub reg_orientation_count: u8,
    pub reg_orientation_zcomp: u8,
    pub expected_identity: u8,
    /// Native sensitivity in LSB/g, before any justification shift.
    pub sensitivity: f32,
    pub gravity: f32,
}

impl DeviceConfig {
    pub const fn mma8451() -> Self {
        Self {
            address: I2C_ADDR_MMA8451,
            reg_data_out: REG_OUT_X_MSB,
            reg_identity: REG_WHO_AM_I,
            reg_range: REG_XYZ_DATA_CFG,
            reg_control: REG_CTRL_REG1,
            reg_orientation_status: REG_PL_STATUS,
            reg_orientation_cfg: REG_PL_CFG,
            reg_orientation_count: REG_PL_COUNT,
            reg_orientation_zcomp: REG_PL_BF_ZCOMP,
            expected_identity: WHO_AM_I_EXPECTED,
            sensitivity: ACCEL_SCALE_2G_14BIT,
            gravity: GRAVITY_CONSTANT,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::mma8451()
    }
}

/// Runtime knobs for the acquisition loop and the collector link.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub sample_period: Duration,
    pub collector_url: String,
    pub upload_path: String,
    pub tempo_path: String,
    pub tempo_period: Duration,
    pub http_timeout: Duration,
    pub wifi_ssid: String,
    pub wifi_pass: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_period: Duration::from_millis(SAMPLE_INTERVAL_MS),
            collector_url: COLLECTOR_BASE_URL.to_string(),
            upload_path: UPLOAD_PATH.to_string(),
            tempo_path: TEMPO_PATH.to_string(),
            tempo_period: Duration::from_millis(TEMPO_POLL_INTERVAL_MS),
            http_timeout: Duration::from_millis(HTTP_TIMEOUT_MS),
            wifi_ssid: String::new(),
            wifi_pass: String::new(),
        }
    }
}

impl PipelineConfig {
    /// Defaults, overridden by `ACCELINK_*` variables present at build time.
    pub fn from_build_env() -> Self {
        Self::default().with_overrides(
            option_env!("ACCELINK_COLLECTOR_URL"),
            option_env!("ACCELINK_SAMPLE_PERIOD_MS"),
            option_env!("ACCELINK_WIFI_SSID"),
            option_env!("ACCELINK_WIFI_PASS"),
        )
    }

    fn with_overrides(
        mut self,
        collector_url: Option<&str>,
        sample_period_ms: Option<&str>,
        wifi_ssid: Option<&str>,
        wifi_pass: Option<&str>,
    ) -> Self {
        if let Some(url) = collector_url.filter(|u| !u.is_empty()) {
            self.collector_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = sample_period_ms {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => self.sample_period = Duration::from_millis(ms),
                _ => log::warn!("Ignoring invalid sample period {:?}", raw),
            }
        }
        if let Some(ssid) = wifi_ssid {
            self.wifi_ssid = ssid.to_string();
        }
        if let Some(pass) = wifi_pass {
            self.wifi_pass = pass.to_string();
        }
        self
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.collector_url, self.upload_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_is_fifty_xyz_samples() {
        assert_eq!(BATCH_CAPACITY, 150);
    }

    #[test]
    fn overrides_replace_defaults() {
        let cfg = PipelineConfig::default().with_overrides(
            Some("http://192.168.1.20:9000/"),
            Some("100"),
            Some("lab"),
            None,
        );
        assert_eq!(cfg.collector_url, "http://192.168.1.20:9000");
        assert_eq!(cfg.upload_url(), "http://192.168.1.20:9000/acc_data");
        assert_eq!(cfg.sample_period, Duration::from_millis(100));
        assert_eq!(cfg.wifi_ssid, "lab");
        assert!(cfg.wifi_pass.is_empty());
    }

    #[test]
    fn bad_period_keeps_default() {
        let cfg = PipelineConfig::default().with_overrides(None, Some("fast"), None, None);
        assert_eq!(cfg.sample_period, Duration::from_millis(SAMPLE_INTERVAL_MS));

        let cfg = PipelineConfig::default().with_overrides(None, Some("0"), None, None);
        assert_eq!(cfg.sample_period, Duration::from_millis(SAMPLE_INTERVAL_MS));
    }
}
