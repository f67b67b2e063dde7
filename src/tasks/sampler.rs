// Accelink - Sampler Task
//
// Fixed-period acquire -> decode -> buffer loop. When the batch fills, the
// loop blocks on the upload (sampling pauses), resets the batch and carries
// on. A failed bus read drops that tick; a failed upload drops that batch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::buffer::SampleBuffer;
use crate::drivers::bus::RegisterBus;
use crate::drivers::mma8451::Mma8451;
use crate::error::{SamplerError, StartupError};
use crate::uplink::{TelemetryUploader, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Sampling,
    Flushing,
    /// Terminal. Startup found the wrong device or the batch invariant broke.
    Fatal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerStats {
    pub ticks: u64,
    pub dropped_ticks: u64,
    pub batches_sent: u64,
    pub batches_lost: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Three axis values were appended.
    Sampled,
    /// The bus read failed; nothing was appended.
    Dropped,
    /// The batch filled and was handed to the uploader.
    Flushed { delivered: bool },
}

pub struct Sampler<B, T> {
    imu: Mma8451<B>,
    buffer: SampleBuffer,
    uploader: TelemetryUploader<T>,
    period: Duration,
    state: SchedulerState,
    stats: SamplerStats,
}

impl<B: RegisterBus, T: Transport> Sampler<B, T> {
    pub fn new(imu: Mma8451<B>, uploader: TelemetryUploader<T>, period: Duration) -> Self {
        Self {
            imu,
            buffer: SampleBuffer::new(),
            uploader,
            period,
            state: SchedulerState::Idle,
            stats: SamplerStats::default(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn stats(&self) -> SamplerStats {
        self.stats
    }

    /// Values waiting in the current (unsent) batch.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Verify and configure the sensor, then enter `Sampling`.
    ///
    /// A wrong device ID is terminal. A bus failure during configuration
    /// leaves the sampler `Idle` so the caller may try again.
    pub fn start(&mut self) -> Result<(), StartupError> {
        if self.state != SchedulerState::Idle {
            return Ok(());
        }

        match self.imu.init() {
            Ok(()) => {
                // Orientation is reported once here so every sampling tick
                // stays a single bus transaction.
                match self.imu.read_orientation() {
                    Ok(orientation) => log::info!("Orientation: {}", orientation),
                    Err(e) => log::debug!("Orientation read failed: {}", e),
                }

                self.state = SchedulerState::Sampling;
                log::info!(
                    "Sampler running (MMA8451 @ 0x{:02X}, {} ms period)",
                    self.imu.device().address,
                    self.period.as_millis()
                );
                Ok(())
            }
            Err(e @ StartupError::IdentityMismatch { .. }) => {
                log::error!("{}. Check wiring.", e);
                self.state = SchedulerState::Fatal;
                Err(e)
            }
            Err(e) => {
                log::warn!("Sensor setup failed: {}", e);
                Err(e)
            }
        }
    }

    /// Run one acquisition cycle.
    pub fn tick(&mut self) -> Result<TickOutcome, SamplerError> {
        if self.state != SchedulerState::Sampling {
            return Err(SamplerError::NotRunning);
        }
        self.stats.ticks += 1;

        let sample = match self.imu.read_sample() {
            Ok(sample) => sample,
            Err(e) => {
                self.stats.dropped_ticks += 1;
                log::warn!("IMU read error: {}", e);
                return Ok(TickOutcome::Dropped);
            }
        };

        let mut full = false;
        for value in sample.axes() {
            full = match self.buffer.append(value) {
                Ok(full) => full,
                Err(e) => {
                    log::error!("Batch boundary lost: {}", e);
                    self.state = SchedulerState::Fatal;
                    return Err(e.into());
                }
            };
        }

        if full {
            let delivered = self.flush();
            return Ok(TickOutcome::Flushed { delivered });
        }
        Ok(TickOutcome::Sampled)
    }

    fn flush(&mut self) -> bool {
        self.state = SchedulerState::Flushing;

        let delivered = match self.uploader.send(self.buffer.as_slice()) {
            Ok(status) => {
                self.stats.batches_sent += 1;
                log::info!("Sent {} floats. Status = {}", self.buffer.len(), status);
                true
            }
            Err(e) => {
                self.stats.batches_lost += 1;
                log::warn!("Batch lost: {}", e);
                false
            }
        };

        self.buffer.reset();
        self.state = SchedulerState::Sampling;
        delivered
    }

    /// Tick at the configured period until `stop` is raised.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<(), SamplerError> {
        while !stop.load(Ordering::Relaxed) {
            let tick_start = Instant::now();

            self.tick()?;

            // Sleep for the remainder of the period; an upload that overran
            // it starts the next tick immediately.
            let elapsed = tick_start.elapsed();
            if elapsed < self.period {
                thread::sleep(self.period - elapsed);
            }
        }

        log::info!("Sampler stopped ({:?})", self.stats);
        Ok(())
    }
}
