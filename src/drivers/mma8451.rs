// Accelink - MMA8451 Accelerometer Driver
//
// Register-level driver on top of any `RegisterBus`.

use crate::config::*;
use crate::decoder;
use crate::drivers::bus::RegisterBus;
use crate::error::{BusError, StartupError};
use crate::events::{OrientationStatus, RawFrame, Sample, RAW_FRAME_LEN};

pub struct Mma8451<B> {
    bus: B,
    device: DeviceConfig,
}

impl<B: RegisterBus> Mma8451<B> {
    pub fn new(bus: B, device: DeviceConfig) -> Self {
        Self { bus, device }
    }

    pub fn device(&self) -> &DeviceConfig {
        &self.device
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Read WHO_AM_I and compare it against the expected device ID.
    ///
    /// Nothing is written to the device before this check passes.
    pub fn verify_identity(&mut self) -> Result<(), StartupError> {
        let found = self.bus.read_u8(self.device.reg_identity)?;
        if found != self.device.expected_identity {
            return Err(StartupError::IdentityMismatch {
                found,
                expected: self.device.expected_identity,
            });
        }
        Ok(())
    }

    /// Standby, orientation engine, ±2 g range, then back to active.
    ///
    /// Configuration registers only accept writes while in standby.
    pub fn configure(&mut self) -> Result<(), BusError> {
        let d = self.device;

        self.bus.write(d.reg_control, CTRL_STANDBY)?;

        self.bus.write(d.reg_orientation_cfg, PL_CFG_ENABLE)?;
        self.bus.write(d.reg_orientation_count, PL_COUNT_DEBOUNCE)?;
        self.bus.write(d.reg_orientation_zcomp, PL_BF_ZCOMP_45DEG)?;

        self.bus.write(d.reg_range, RANGE_2G)?;

        self.bus.write(d.reg_control, CTRL_ACTIVE)?;

        log::info!("MMA8451 initialised (±2g, portrait/landscape detection on)");
        Ok(())
    }

    /// Identity check followed by configuration.
    pub fn init(&mut self) -> Result<(), StartupError> {
        self.verify_identity()?;
        self.configure()?;
        Ok(())
    }

    /// Burst-read the six data-out registers.
    pub fn read_frame(&mut self) -> Result<RawFrame, BusError> {
        let mut raw = [0u8; RAW_FRAME_LEN];
        self.bus.read(self.device.reg_data_out, &mut raw)?;
        Ok(raw)
    }

    pub fn read_sample(&mut self) -> Result<Sample, BusError> {
        let raw = self.read_frame()?;
        Ok(decoder::decode_sample(&raw, &self.device))
    }

    pub fn read_orientation(&mut self) -> Result<OrientationStatus, BusError> {
        let status = self.bus.read_u8(self.device.reg_orientation_status)?;
        Ok(decoder::decode_orientation(status))
    }
}
