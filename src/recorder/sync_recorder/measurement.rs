// src/recorder/sync_recorder/measurement.rs

use core::time::Duration;

use log::{debug, trace, warn};

use super::{MeasurementState, SyncRecorder};
use crate::common::{
    address::Sdi12Addr,
    command::{Command, CommandIndexError, DataIndex},
    error::Sdi12Error,
    hal_traits::{Sdi12Serial, Sdi12Timer},
    response::MeasurementTiming,
    timing::MAX_SENSORS,
};

/// Acknowledgements of one concurrent batch, in the order addressed.
pub type ConcurrentAcks = heapless::Vec<MeasurementTiming, MAX_SENSORS>;

impl<IF> SyncRecorder<IF>
where
    IF: Sdi12Serial + Sdi12Timer,
{
    /// Runs `aM!` (or `aMx!`, `aMC!`, `aMCx!`) on one sensor and collects
    /// its values.
    ///
    /// With `wait_full_time` the recorder sleeps the whole announced delay
    /// instead of returning early on the sensor's service request.
    ///
    /// Returns the number of values collected; read them with
    /// [`get_values`](Self::get_values).
    pub fn measure(
        &mut self,
        address: Sdi12Addr,
        additional: Option<u8>,
        crc: bool,
        wait_full_time: bool,
    ) -> Result<usize, Sdi12Error<IF::Error>> {
        let command =
            Command::measurement(address, additional, crc).map_err(CommandIndexError::into_sdi12)?;
        self.run_measurement(&command, wait_full_time)
    }

    /// Runs `aV!` and collects the verification values.
    pub fn verify(&mut self, address: Sdi12Addr) -> Result<usize, Sdi12Error<IF::Error>> {
        self.run_measurement(&Command::StartVerification { address }, false)
    }

    /// Drives any single-sensor measurement command through
    /// `Idle -> CommandSent -> AckParsed -> Waiting -> DataPolling -> Done`.
    ///
    /// Commands that do not answer with a 5-byte `atttn` (concurrent starts,
    /// data requests, ...) are refused with `InvalidResponse` before anything
    /// goes on the bus. On error the state ends in `Failed` and the value
    /// array must not be trusted.
    pub fn run_measurement(
        &mut self,
        command: &Command,
        wait_full_time: bool,
    ) -> Result<usize, Sdi12Error<IF::Error>> {
        self.values.clear();
        self.set_state(MeasurementState::Idle);

        let result = self.drive_measurement(command, wait_full_time);
        self.finish(command, result)
    }

    fn drive_measurement(
        &mut self,
        command: &Command,
        wait_full_time: bool,
    ) -> Result<usize, Sdi12Error<IF::Error>> {
        if command.ack_len() != Some(MeasurementTiming::LEN) {
            warn!("{} is not a single-sensor measurement", command);
            return Err(Sdi12Error::InvalidResponse);
        }
        let address = command.address();

        self.settle();
        self.set_state(MeasurementState::CommandSent);
        self.execute_transaction(command)?;

        let ack = self.parse_ack(address, MeasurementTiming::LEN)?;
        self.set_state(MeasurementState::AckParsed);

        if ack.time_seconds > 0 {
            self.set_state(MeasurementState::Waiting);
            if wait_full_time {
                self.sleep_seconds(ack.time_seconds);
                // The service request arrived somewhere in there.
                self.interface.clear_buffer();
            } else {
                self.wait_for_service_request(ack.time_seconds)?;
            }
        }
        self.settle();

        self.set_state(MeasurementState::DataPolling);
        self.poll_data(address, usize::from(ack.values_count), command.expects_crc())
    }

    /// Polls in fixed slices until a one-byte line arrives or `seconds` have
    /// passed.
    fn wait_for_service_request(&mut self, seconds: u16) -> Result<(), Sdi12Error<IF::Error>> {
        let deadline = self.interface.now() + Duration::from_secs(u64::from(seconds));

        while self.interface.now() < deadline {
            self.interface.delay_ms(self.config.service_request_poll_ms);
            match self.read_response() {
                Ok(1) => {
                    trace!("service request {:?}", self.response.first().map(char::from));
                    return Ok(());
                }
                Ok(0) => {}
                Ok(len) => {
                    warn!("expected a service request, got {} bytes", len);
                    return Err(Sdi12Error::InvalidResponse);
                }
                Err(Sdi12Error::Io(e)) => return Err(Sdi12Error::Io(e)),
                Err(_) => {}
            }
        }

        warn!("no service request within {} s", seconds);
        Err(Sdi12Error::ServiceRequestMissing)
    }

    /// Issues `aD0!`, `aD1!`, ... until `expected` values have arrived or
    /// the data commands run out. Reaching the bound is not an error.
    pub(super) fn poll_data(
        &mut self,
        address: Sdi12Addr,
        expected: usize,
        crc: bool,
    ) -> Result<usize, Sdi12Error<IF::Error>> {
        let limit = self.config.max_data_commands.min(DataIndex::MAX + 1);
        let mut total = 0;
        let mut index = 0;

        while total < expected && index < limit {
            let command = Command::send_data(address, index).map_err(CommandIndexError::into_sdi12)?;
            self.execute_transaction(&command)?;
            total += self.collect_data_values(address, crc)?;
            index += 1;
        }

        if total < expected {
            debug!("{}: {} of {} values after {} data commands", address, total, expected, index);
        }
        Ok(total)
    }

    /// Starts `aC!` (or `aCC!`, `aCx!`, `aCCx!`) on every address, sleeps
    /// once for the longest announced delay, then fetches `aD0!` from each.
    ///
    /// All or nothing: the first bad acknowledgement, data line or CRC aborts
    /// the batch. Values from all sensors are appended in address order.
    pub fn concurrent_measure(
        &mut self,
        addresses: &[Sdi12Addr],
        additional: Option<u8>,
        crc: bool,
    ) -> Result<ConcurrentAcks, Sdi12Error<IF::Error>> {
        if addresses.len() > MAX_SENSORS {
            return Err(Sdi12Error::TooManySensors { max: MAX_SENSORS, got: addresses.len() });
        }
        self.values.clear();
        self.set_state(MeasurementState::Idle);

        let result = self.drive_concurrent(addresses, additional, crc);
        match result {
            Ok(acks) => {
                debug!("concurrent batch of {} done, {} values", acks.len(), self.values.len());
                self.set_state(MeasurementState::Done);
                Ok(acks)
            }
            Err(e) => {
                warn!("concurrent batch failed: {:?}", e);
                self.set_state(MeasurementState::Failed);
                Err(e)
            }
        }
    }

    fn drive_concurrent(
        &mut self,
        addresses: &[Sdi12Addr],
        additional: Option<u8>,
        crc: bool,
    ) -> Result<ConcurrentAcks, Sdi12Error<IF::Error>> {
        let mut acks = ConcurrentAcks::new();
        let mut max_delay: u16 = 0;

        self.set_state(MeasurementState::CommandSent);
        for &address in addresses {
            let command = Command::concurrent_measurement(address, additional, crc)
                .map_err(CommandIndexError::into_sdi12)?;
            self.execute_transaction(&command)?;
            let ack = self.parse_ack(address, MeasurementTiming::CONCURRENT_LEN)?;
            max_delay = max_delay.max(ack.time_seconds);
            acks.push(ack).map_err(|_| Sdi12Error::TooManySensors {
                max: MAX_SENSORS,
                got: addresses.len(),
            })?;
        }
        self.set_state(MeasurementState::AckParsed);

        if max_delay > 0 {
            self.set_state(MeasurementState::Waiting);
            self.sleep_seconds(max_delay);
        }

        self.set_state(MeasurementState::DataPolling);
        for ack in &acks {
            let command =
                Command::send_data(ack.address, 0).map_err(CommandIndexError::into_sdi12)?;
            self.execute_transaction(&command)?;
            self.collect_data_values(ack.address, crc)?;
        }

        Ok(acks)
    }

    fn finish(
        &mut self,
        command: &Command,
        result: Result<usize, Sdi12Error<IF::Error>>,
    ) -> Result<usize, Sdi12Error<IF::Error>> {
        match &result {
            Ok(count) => {
                debug!("{} done: {} values", command, count);
                self.set_state(MeasurementState::Done);
            }
            Err(e) => {
                warn!("{} failed: {:?}", command, e);
                self.set_state(MeasurementState::Failed);
            }
        }
        result
    }
}
