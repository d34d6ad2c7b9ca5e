// src/common/response/timing.rs

use crate::common::address::Sdi12Addr;
use crate::common::error::Sdi12Error;

/// Acknowledgement of a measure command: `atttn` (5 bytes) or `atttnn`
/// (6 bytes, concurrent variants). Consumed immediately to drive the wait.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MeasurementTiming {
    /// The address of the responding sensor.
    pub address: Sdi12Addr,
    /// Seconds until data is ready (ttt). 0-999.
    pub time_seconds: u16,
    /// Number of values that will be returned (n or nn).
    pub values_count: u16,
}

impl MeasurementTiming {
    /// Length of the acknowledgement to a plain, additional or verify command.
    pub const LEN: usize = 5;
    /// Length of the acknowledgement to a concurrent command.
    pub const CONCURRENT_LEN: usize = 6;

    /// Parses an acknowledgement line that must be exactly `expected_len`
    /// bytes long.
    ///
    /// The count field is read first, the delay field second, each from its
    /// own slice of the line.
    pub fn parse<E>(line: &[u8], expected_len: usize) -> Result<Self, Sdi12Error<E>>
    where
        E: core::fmt::Debug,
    {
        if line.len() != expected_len || expected_len < Self::LEN {
            return Err(Sdi12Error::InvalidResponse);
        }
        let address = Sdi12Addr::from_byte(line[0]).map_err(|_| Sdi12Error::InvalidResponse)?;

        let values_count = parse_digits(&line[4..]).ok_or(Sdi12Error::InvalidResponse)?;
        let time_seconds = parse_digits(&line[1..4]).ok_or(Sdi12Error::InvalidResponse)?;

        Ok(MeasurementTiming { address, time_seconds, values_count })
    }
}

fn parse_digits(field: &[u8]) -> Option<u16> {
    if field.is_empty() {
        return None;
    }
    field.iter().try_fold(0u16, |acc, &b| {
        if b.is_ascii_digit() {
            Some(acc * 10 + u16::from(b - b'0'))
        } else {
            None
        }
    })
}
