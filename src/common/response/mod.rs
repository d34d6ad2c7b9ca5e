// src/common/response/mod.rs

mod buffer;
mod identification;
pub mod parse;
mod timing;

pub use buffer::ResponseBuffer;
pub use identification::{SensorInfo, INFO_TAIL_LEN, MODEL_LEN, SENSOR_VERSION_LEN, VENDOR_LEN};
pub use parse::parse_values;
pub use timing::MeasurementTiming;
