// src/common/mod.rs

pub mod address;
pub mod command;
pub mod crc;
pub mod error;
pub mod hal_traits;
pub mod response;
pub mod timing;
pub mod types;

pub use address::Sdi12Addr;

pub use command::{Command, CommandBuffer, CommandIndexError, DataIndex, MeasurementIndex};

pub use crc::{
    append_crc_ascii, calculate_crc16, decode_crc_ascii, encode_crc_ascii, verify_response_crc_ascii,
};

pub use error::Sdi12Error;

pub use hal_traits::{MillisInstant, Sdi12Instant, Sdi12Serial, Sdi12Timer};
#[cfg(feature = "embedded-hal")]
pub use hal_traits::HalTimer;
#[cfg(feature = "std")]
pub use hal_traits::StdTimer;

pub use response::{parse_values, MeasurementTiming, ResponseBuffer, SensorInfo};

pub use types::{bytes_to_float, float_to_bytes, values_to_bytes, ByteOrder, MeasurementValues};
