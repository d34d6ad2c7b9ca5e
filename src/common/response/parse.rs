// src/common/response/parse.rs

use core::str::FromStr;

use log::warn;

use crate::common::error::Sdi12Error;
use crate::common::timing::{MAX_VALUES, MAX_VALUE_CHARS};
use crate::common::types::MeasurementValues;

/// Decodes a data payload `a<values>` into `out`, appending in order.
///
/// `payload` starts with the sensor address; each value is introduced by
/// `+` or `-` and made of digits and at most one `.`. Any other character
/// is `MalformedValue`. A CRC suffix must already have been stripped.
///
/// Returns the number of values decoded from this payload.
pub fn parse_values<E>(payload: &[u8], out: &mut MeasurementValues) -> Result<usize, Sdi12Error<E>>
where
    E: core::fmt::Debug,
{
    match payload.get(1) {
        Some(b'+') | Some(b'-') => {}
        _ => {
            warn!("data payload does not start with a sign: {:?}", payload);
            return Err(Sdi12Error::MalformedValue);
        }
    }

    let mut field: heapless::String<MAX_VALUE_CHARS> = heapless::String::new();
    let mut decoded = 0;

    for &ch in &payload[1..] {
        match ch {
            b'+' | b'-' => {
                if !field.is_empty() {
                    push_value(&field, out)?;
                    decoded += 1;
                    field.clear();
                }
                push_char(&mut field, ch)?;
            }
            b'0'..=b'9' | b'.' => push_char(&mut field, ch)?,
            _ => {
                warn!("unexpected {:#04x} in data payload", ch);
                return Err(Sdi12Error::MalformedValue);
            }
        }
    }
    if !field.is_empty() {
        push_value(&field, out)?;
        decoded += 1;
    }

    Ok(decoded)
}

fn push_char<E>(field: &mut heapless::String<MAX_VALUE_CHARS>, ch: u8) -> Result<(), Sdi12Error<E>>
where
    E: core::fmt::Debug,
{
    field.push(ch as char).map_err(|_| Sdi12Error::MalformedValue)
}

fn push_value<E>(field: &str, out: &mut MeasurementValues) -> Result<(), Sdi12Error<E>>
where
    E: core::fmt::Debug,
{
    let value = f32::from_str(field).map_err(|_| {
        warn!("unparseable value field {:?}", field);
        Sdi12Error::MalformedValue
    })?;
    out.push(value).map_err(|_| Sdi12Error::BufferOverflow {
        needed: MAX_VALUES + 1,
        got: MAX_VALUES,
    })
}
