// src/recorder/sync_recorder/io_helpers.rs

use log::{trace, warn};

use super::SyncRecorder;
use crate::common::{
    error::Sdi12Error,
    hal_traits::{Sdi12Serial, Sdi12Timer},
};

impl<IF> SyncRecorder<IF>
where
    IF: Sdi12Serial + Sdi12Timer,
{
    /// Reads one response line into the response buffer.
    ///
    /// Waits a bounded number of polls for the first byte, then collects
    /// printable bytes until `\n`, a full buffer, or a stretch of silence.
    /// `\r` is dropped. Any byte outside `\r`, `\n` and `0x20..=0x7E` aborts
    /// the read and discards what was collected.
    ///
    /// Returns the line length, which is 0 for a bare `\r\n`.
    pub(super) fn read_response(&mut self) -> Result<usize, Sdi12Error<IF::Error>> {
        self.response.clear();
        self.wait_for_first_byte()?;

        let mut idle = 0u16;
        while !self.response.is_full() {
            if idle >= self.config.idle_polls {
                warn!(
                    "response stalled after {} bytes: {:?}",
                    self.response.len(),
                    printable(self.response.as_bytes())
                );
                self.response.clear();
                return Err(Sdi12Error::Timeout);
            }

            match self.interface.read_byte() {
                Ok(b'\n') => break,
                Ok(b'\r') => idle = 0,
                Ok(byte @ 0x20..=0x7e) => {
                    idle = 0;
                    self.response.push(byte);
                }
                Ok(byte) => {
                    warn!("invalid character {:#04x} in response", byte);
                    self.response.clear();
                    return Err(Sdi12Error::InvalidCharacter(byte));
                }
                Err(nb::Error::WouldBlock) => {
                    self.interface.delay_ms(self.config.poll_interval_ms);
                    idle += 1;
                }
                Err(nb::Error::Other(e)) => {
                    self.response.clear();
                    return Err(Sdi12Error::Io(e));
                }
            }
        }

        if self.config.trim_trailing_whitespace {
            self.response.trim_trailing_whitespace();
        }
        trace!("<- {:?}", printable(self.response.as_bytes()));
        Ok(self.response.len())
    }

    fn wait_for_first_byte(&mut self) -> Result<(), Sdi12Error<IF::Error>> {
        for _ in 0..self.config.first_byte_polls {
            self.interface.delay_ms(self.config.poll_interval_ms);
            if self.interface.available() > 0 {
                return Ok(());
            }
        }
        trace!("no response after {} polls", self.config.first_byte_polls);
        Err(Sdi12Error::Timeout)
    }
}

/// Lines only ever hold printable ASCII, so this never loses anything.
fn printable(bytes: &[u8]) -> &str {
    core::str::from_utf8(bytes).unwrap_or_default()
}
