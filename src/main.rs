// Accelink - Firmware Entry Point
//
// Boot sequence:
//   1. Join Wi-Fi and wait until the station has an address.
//   2. Probe the collector once (GET /).
//   3. Install the I2C driver, verify the MMA8451 ID and configure it.
//   4. Spawn the sampler and tempo tasks.
//
// A wrong device ID stops the boot before any register is written; the
// firmware then idles so the error stays visible on the serial console.

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("accelink is ESP-IDF firmware; build it for an espidf target to flash it.");
}

#[cfg(target_os = "espidf")]
mod firmware {
    use std::sync::atomic::{AtomicBool, AtomicI32};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;

    use accelink::config::*;
    use accelink::drivers::bus::EspI2cBus;
    use accelink::drivers::mma8451::Mma8451;
    use accelink::error::StartupError;
    use accelink::net;
    use accelink::tasks::{sampler::Sampler, tempo};
    use accelink::uplink::esp::EspHttpTransport;
    use accelink::uplink::TelemetryUploader;

    /// Configuration writes that fail on the bus are retried this many times.
    const STARTUP_ATTEMPTS: u32 = 3;

    pub fn run() -> anyhow::Result<()> {
        // Link esp-idf-sys runtime patches and initialise logging.
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
        log::info!("Accelink firmware starting...");

        let cfg = PipelineConfig::from_build_env();

        // ---- Peripherals & network ----------------------------------------
        let peripherals = Peripherals::take()?;
        let sysloop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take()?;

        let _wifi = net::connect_wifi(peripherals.modem, sysloop, nvs, &cfg)?;

        let mut probe = TelemetryUploader::new(
            EspHttpTransport::new(cfg.http_timeout),
            cfg.collector_url.clone(),
            cfg.upload_path.clone(),
        );
        match probe.probe(PROBE_PATH) {
            Ok(status) => log::info!("Collector reachable (HTTP {})", status),
            Err(e) => log::warn!("Collector probe failed: {}", e),
        }

        // ---- I2C bus (owned by the sampler) --------------------------------
        let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio5, // SDA
            peripherals.pins.gpio6, // SCL
            &i2c_config,
        )?;
        log::info!("I2C initialized on SDA:{}, SCL:{}", PIN_I2C_SDA, PIN_I2C_SCL);

        let device = DeviceConfig::mma8451();
        let imu = Mma8451::new(EspI2cBus::new(i2c, device.address), device);
        let uploader = TelemetryUploader::new(
            EspHttpTransport::new(cfg.http_timeout),
            cfg.collector_url.clone(),
            cfg.upload_path.clone(),
        );
        let mut sampler = Sampler::new(imu, uploader, cfg.sample_period);

        if let Err(e) = start_with_retries(|| sampler.start()) {
            log::error!("Sensor startup aborted: {}", e);
            park();
        }

        // ---- Shared state -------------------------------------------------
        let stop = Arc::new(AtomicBool::new(false));
        let tempo_bpm = Arc::new(AtomicI32::new(0));

        // ---- Spawn tasks (map to FreeRTOS tasks via std::thread) ------------
        let sampler_stop = Arc::clone(&stop);
        thread::Builder::new()
            .name("sampler".into())
            .stack_size(STACK_SAMPLER)
            .spawn(move || {
                if let Err(e) = sampler.run(&sampler_stop) {
                    log::error!("Sampler halted: {}", e);
                }
            })?;

        let tempo_uploader = TelemetryUploader::new(
            EspHttpTransport::new(cfg.http_timeout),
            cfg.collector_url.clone(),
            cfg.upload_path.clone(),
        );
        let tempo_stop = Arc::clone(&stop);
        let tempo_value = Arc::clone(&tempo_bpm);
        let tempo_path = cfg.tempo_path.clone();
        let tempo_period = cfg.tempo_period;
        thread::Builder::new()
            .name("tempo".into())
            .stack_size(STACK_TEMPO)
            .spawn(move || {
                tempo::tempo_task(tempo_uploader, tempo_path, tempo_period, &tempo_value, &tempo_stop);
            })?;

        // Main thread has nothing left to do; the Wi-Fi driver must stay alive.
        park();
    }

    fn start_with_retries(mut start: impl FnMut() -> Result<(), StartupError>) -> Result<(), StartupError> {
        let mut attempt = 1;
        loop {
            match start() {
                Ok(()) => return Ok(()),
                Err(e @ StartupError::IdentityMismatch { .. }) => return Err(e),
                Err(e) if attempt >= STARTUP_ATTEMPTS => return Err(e),
                Err(e) => {
                    log::warn!("Startup attempt {} failed: {}", attempt, e);
                    attempt += 1;
                    thread::sleep(Duration::from_millis(STARTUP_RETRY_DELAY_MS));
                }
            }
        }
    }

    fn park() -> ! {
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }
}
