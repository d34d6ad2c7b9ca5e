// src/recorder/sync_recorder/transaction.rs

use log::trace;

use super::SyncRecorder;
use crate::common::{
    command::{Command, CommandIndexError},
    error::Sdi12Error,
    hal_traits::{Sdi12Serial, Sdi12Timer},
};

impl<IF> SyncRecorder<IF>
where
    IF: Sdi12Serial + Sdi12Timer,
{
    /// Sends one command and reads its response line.
    ///
    /// The command is formatted into a fresh stack buffer. The input buffer
    /// is cleared first unless the command continues a measurement (`aDx!`).
    /// Returns the length of the line now held in the response buffer.
    pub(super) fn execute_transaction(
        &mut self,
        command: &Command,
    ) -> Result<usize, Sdi12Error<IF::Error>> {
        let frame = command.format_into().map_err(CommandIndexError::into_sdi12)?;

        if command.clears_input() {
            self.interface.clear_buffer();
        }
        trace!("-> {}", frame);
        self.interface.send_command(frame.as_bytes())?;

        self.read_response()
    }

    /// Pause some sensors need before they accept the next command.
    pub(super) fn settle(&mut self) {
        if self.config.settle_delay_ms > 0 {
            self.interface.delay_ms(self.config.settle_delay_ms);
        }
    }

    pub(super) fn sleep_seconds(&mut self, seconds: u16) {
        self.interface.delay_ms(u32::from(seconds) * 1_000);
    }
}
