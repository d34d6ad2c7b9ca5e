// src/recorder/mod.rs

mod config;
pub mod sync_recorder;

pub use config::RecorderConfig;
pub use sync_recorder::{ConcurrentAcks, MeasurementState, SensorTable, SyncRecorder};
