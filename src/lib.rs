// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod common;
pub mod recorder;

// Re-export key types for convenience
pub use common::{Command, MeasurementTiming, Sdi12Addr, Sdi12Error, SensorInfo};
pub use common::{Sdi12Serial, Sdi12Timer};
pub use recorder::{MeasurementState, RecorderConfig, SyncRecorder};
