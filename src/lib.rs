// Accelink - MMA8451 telemetry pipeline
//
// Register bus -> sample decoder -> fixed batch -> HTTP uploader, driven by a
// fixed-period sampler. Everything except the ESP-IDF adapters builds and
// tests on the host.

pub mod buffer;
pub mod config;
pub mod decoder;
pub mod drivers;
pub mod error;
pub mod events;
#[cfg(target_os = "espidf")]
pub mod net;
pub mod tasks;
pub mod uplink;
