// Accelink - Register Bus
//
// One register transaction per call, each bounded by a timeout. Retry policy
// belongs to the caller.

use crate::error::BusError;

pub trait RegisterBus {
    /// Burst-read `buf.len()` bytes starting at `register`.
    fn read(&mut self, register: u8, buf: &mut [u8]) -> Result<(), BusError>;

    /// Write a single register.
    fn write(&mut self, register: u8, value: u8) -> Result<(), BusError>;

    fn read_u8(&mut self, register: u8) -> Result<u8, BusError> {
        let mut buf = [0u8; 1];
        self.read(register, &mut buf)?;
        Ok(buf[0])
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read(&mut self, register: u8, buf: &mut [u8]) -> Result<(), BusError> {
        (**self).read(register, buf)
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), BusError> {
        (**self).write(register, value)
    }
}

#[cfg(target_os = "espidf")]
pub use esp::EspI2cBus;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::delay::TickType;
    use esp_idf_hal::i2c::I2cDriver;
    use esp_idf_sys::{esp_err_t, EspError, ESP_ERR_TIMEOUT, ESP_FAIL};

    use super::RegisterBus;
    use crate::config::*;
    use crate::error::BusError;

    /// MMA8451 register access over the ESP-IDF I2C master driver.
    pub struct EspI2cBus {
        i2c: I2cDriver<'static>,
        address: u8,
        read_timeout: u32,
        write_timeout: u32,
    }

    impl EspI2cBus {
        pub fn new(i2c: I2cDriver<'static>, address: u8) -> Self {
            Self {
                i2c,
                address,
                read_timeout: TickType::new_millis(I2C_READ_TIMEOUT_MS as u64).ticks(),
                write_timeout: TickType::new_millis(I2C_WRITE_TIMEOUT_MS as u64).ticks(),
            }
        }
    }

    impl RegisterBus for EspI2cBus {
        fn read(&mut self, register: u8, buf: &mut [u8]) -> Result<(), BusError> {
            self.i2c
                .write_read(self.address, &[register], buf, self.read_timeout)
                .map_err(bus_error)
        }

        fn write(&mut self, register: u8, value: u8) -> Result<(), BusError> {
            self.i2c
                .write(self.address, &[register, value], self.write_timeout)
                .map_err(bus_error)
        }
    }

    // The legacy I2C driver reports a missing ACK as a generic ESP_FAIL.
    fn bus_error(err: EspError) -> BusError {
        match err.code() {
            code if code == ESP_ERR_TIMEOUT as esp_err_t => BusError::Timeout,
            code if code == ESP_FAIL as esp_err_t => BusError::NoAck,
            code => BusError::Other(code),
        }
    }
}
