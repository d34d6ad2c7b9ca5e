// src/common/response/identification.rs

use core::fmt;

use crate::common::address::Sdi12Addr;

pub const VENDOR_LEN: usize = 8;
pub const MODEL_LEN: usize = 6;
pub const SENSOR_VERSION_LEN: usize = 3;
pub const INFO_TAIL_LEN: usize = 13;

const VERSION_START: usize = 1;
const VENDOR_START: usize = VERSION_START + 2;
const MODEL_START: usize = VENDOR_START + VENDOR_LEN;
const SENSOR_VERSION_START: usize = MODEL_START + MODEL_LEN;
const TAIL_START: usize = SENSOR_VERSION_START + SENSOR_VERSION_LEN;

/// Identification returned by `aI!`: `allccccccccmmmmmmvvv[xxx...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorInfo {
    pub address: Sdi12Addr,
    /// Protocol version as sent, e.g. `14` for SDI-12 v1.4.
    pub sdi_version: Option<u8>,
    pub vendor: heapless::String<VENDOR_LEN>,
    pub model: heapless::String<MODEL_LEN>,
    pub sensor_version: heapless::String<SENSOR_VERSION_LEN>,
    /// Optional vendor-defined tail (serial number etc.).
    pub info: heapless::String<INFO_TAIL_LEN>,
}

impl SensorInfo {
    /// Copies as many fields as the payload holds.
    ///
    /// Sensors in the field send short or padded identification lines; a
    /// field that is missing is left empty rather than rejecting the sensor.
    pub fn from_payload(address: Sdi12Addr, payload: &[u8]) -> Self {
        SensorInfo {
            address,
            sdi_version: parse_version(field(payload, VERSION_START, 2)),
            vendor: copy_field(field(payload, VENDOR_START, VENDOR_LEN)),
            model: copy_field(field(payload, MODEL_START, MODEL_LEN)),
            sensor_version: copy_field(field(payload, SENSOR_VERSION_START, SENSOR_VERSION_LEN)),
            info: copy_field(field(payload, TAIL_START, INFO_TAIL_LEN)),
        }
    }

    pub fn sdi_version_major(&self) -> Option<u8> {
        self.sdi_version.map(|v| v / 10)
    }

    pub fn sdi_version_minor(&self) -> Option<u8> {
        self.sdi_version.map(|v| v % 10)
    }
}

fn field(payload: &[u8], start: usize, len: usize) -> &[u8] {
    let start = start.min(payload.len());
    let end = (start + len).min(payload.len());
    &payload[start..end]
}

fn parse_version(bytes: &[u8]) -> Option<u8> {
    match bytes {
        [major, minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Some((major - b'0') * 10 + (minor - b'0'))
        }
        _ => None,
    }
}

fn copy_field<const N: usize>(bytes: &[u8]) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for &b in bytes.iter().filter(|b| (0x20..=0x7e).contains(*b)) {
        if out.push(b as char).is_err() {
            break;
        }
    }
    out
}

impl fmt::Display for SensorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "address {}", self.address)?;
        match (self.sdi_version_major(), self.sdi_version_minor()) {
            (Some(major), Some(minor)) => write!(f, ", SDI-12 {}.{}", major, minor)?,
            _ => write!(f, ", SDI-12 ?")?,
        }
        write!(
            f,
            ", vendor '{}', model '{}', version '{}'",
            self.vendor.trim_end(),
            self.model.trim_end(),
            self.sensor_version.trim_end()
        )?;
        if !self.info.is_empty() {
            write!(f, ", info '{}'", self.info.trim_end())?;
        }
        Ok(())
    }
}
