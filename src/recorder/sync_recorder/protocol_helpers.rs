// src/recorder/sync_recorder/protocol_helpers.rs

use log::{debug, warn};

use super::SyncRecorder;
use crate::common::{
    address::Sdi12Addr,
    crc::verify_response_crc_ascii,
    error::Sdi12Error,
    hal_traits::{Sdi12Serial, Sdi12Timer},
    response::{parse_values, MeasurementTiming},
};

/// Shortest data line accepted: address, sign and one digit.
const MIN_DATA_LEN: usize = 3;

impl<IF> SyncRecorder<IF>
where
    IF: Sdi12Serial + Sdi12Timer,
{
    /// Parses the acknowledgement in the response buffer and checks it came
    /// from `address`.
    pub(super) fn parse_ack(
        &self,
        address: Sdi12Addr,
        expected_len: usize,
    ) -> Result<MeasurementTiming, Sdi12Error<IF::Error>> {
        let ack = MeasurementTiming::parse::<IF::Error>(self.response.as_bytes(), expected_len)
            .map_err(|e| {
                warn!("unexpected acknowledgement from {}: {:?}", address, self.response.as_bytes());
                e
            })?;
        if ack.address != address {
            warn!("acknowledgement from {} while addressing {}", ack.address, address);
            return Err(Sdi12Error::InvalidResponse);
        }
        debug!("{}: ready in {} s, {} values", address, ack.time_seconds, ack.values_count);
        Ok(ack)
    }

    /// Checks the data line in the response buffer and appends its values.
    ///
    /// With `crc` set the last three characters must hold the line's CRC;
    /// they are verified and dropped before the values are parsed.
    /// Returns how many values the line carried.
    pub(super) fn collect_data_values(
        &mut self,
        address: Sdi12Addr,
        crc: bool,
    ) -> Result<usize, Sdi12Error<IF::Error>> {
        let line = self.response.as_bytes();
        if line.len() < MIN_DATA_LEN {
            warn!("data line from {} too short: {:?}", address, line);
            return Err(Sdi12Error::InvalidResponse);
        }
        if line[0] != address.as_byte() {
            warn!("data line from {:?} while addressing {}", line[0] as char, address);
            return Err(Sdi12Error::InvalidResponse);
        }

        let payload = if crc {
            verify_response_crc_ascii::<IF::Error>(line).map_err(|e| {
                warn!("bad CRC from {}: {:?}", address, e);
                e
            })?
        } else {
            line
        };

        let count = parse_values::<IF::Error>(payload, &mut self.values)?;
        debug!("{}: {} values (total {})", address, count, self.values.len());
        Ok(count)
    }
}
