// src/common/timing.rs

// Reference timings of the session engine. They are the defaults of
// `RecorderConfig`; hosts talking to slow or fast sensors override them there.

// === Response Reader ===

/// Interval between transport polls while waiting for bytes.
pub const POLL_INTERVAL_MS: u32 = 10;
/// Polls before the first byte of a response must have arrived (~500 ms).
pub const FIRST_BYTE_POLLS: u16 = 50;
/// Consecutive empty polls tolerated in the middle of a line.
pub const IDLE_POLLS: u16 = 10;

// === Measurement ===

/// Slice length while waiting for a service request.
pub const SERVICE_REQUEST_POLL_MS: u32 = 200;
/// Pause some sensors need between finishing one exchange and the next command.
pub const SETTLE_DELAY_MS: u32 = 500;
/// Number of `aD0!`..`aD9!` sub-indices available to a measurement.
pub const MAX_DATA_COMMANDS: u8 = 10;

// === Capacities ===

/// Bytes held by one response line, terminator excluded.
pub const RESPONSE_CAPACITY: usize = 80;
/// Values kept from one measurement.
pub const MAX_VALUES: usize = 32;
/// Entries in the sensor table (scan results, concurrent batch size).
pub const MAX_SENSORS: usize = 10;
/// Characters kept from one `D` value field, sign included.
pub const MAX_VALUE_CHARS: usize = 9;
