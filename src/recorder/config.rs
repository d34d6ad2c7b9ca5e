// src/recorder/config.rs

use crate::common::timing;

/// Timing knobs and line handling of one [`SyncRecorder`](super::SyncRecorder).
///
/// `Default` yields the reference timings from [`crate::common::timing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Sleep between two transport polls, in milliseconds.
    pub poll_interval_ms: u32,
    /// Polls allowed before the first byte of a response arrives.
    pub first_byte_polls: u16,
    /// Consecutive empty polls allowed in the middle of a line.
    pub idle_polls: u16,
    /// Slice slept between service-request checks, in milliseconds.
    pub service_request_poll_ms: u32,
    /// Recovery pause around measure commands and scan probes, in milliseconds.
    pub settle_delay_ms: u32,
    /// Highest number of `aDx!` requests issued for one measurement. Values
    /// above 10 act as 10.
    pub max_data_commands: u8,
    /// Strip trailing spaces and control characters from every line read.
    pub trim_trailing_whitespace: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        RecorderConfig {
            poll_interval_ms: timing::POLL_INTERVAL_MS,
            first_byte_polls: timing::FIRST_BYTE_POLLS,
            idle_polls: timing::IDLE_POLLS,
            service_request_poll_ms: timing::SERVICE_REQUEST_POLL_MS,
            settle_delay_ms: timing::SETTLE_DELAY_MS,
            max_data_commands: timing::MAX_DATA_COMMANDS,
            trim_trailing_whitespace: true,
        }
    }
}

impl RecorderConfig {
    /// Same as `default()` but without any settle pauses; for fast sensors.
    pub fn without_settle_delay() -> Self {
        RecorderConfig { settle_delay_ms: 0, ..Self::default() }
    }
}
