// src/recorder/sync_recorder/mod.rs

use log::trace;

use crate::common::{
    hal_traits::{Sdi12Serial, Sdi12Timer},
    response::ResponseBuffer,
    types::MeasurementValues,
};

use super::RecorderConfig;

mod io_helpers;
mod measurement;
mod protocol_helpers;
mod scan;
mod transaction;

#[cfg(test)]
pub(crate) mod mock;

pub use measurement::ConcurrentAcks;
pub use scan::SensorTable;

/// Progress of the measurement currently (or last) driven by the recorder.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MeasurementState {
    #[default]
    Idle,
    /// Measure command sent, acknowledgement being read.
    CommandSent,
    /// `atttn[n]` accepted; delay and value count known.
    AckParsed,
    /// Waiting for the service request or for the announced delay.
    Waiting,
    /// Issuing `aD0!`.. and collecting values.
    DataPolling,
    Done,
    Failed,
}

/// An SDI-12 recorder (data logger) driving a bus synchronously.
///
/// One instance owns the transport, the line buffer and the value array;
/// operations are strictly sequential, so every method takes `&mut self`.
#[derive(Debug)]
pub struct SyncRecorder<IF>
where
    IF: Sdi12Serial + Sdi12Timer,
{
    interface: IF,
    config: RecorderConfig,
    response: ResponseBuffer,
    values: MeasurementValues,
    state: MeasurementState,
}

impl<IF> SyncRecorder<IF>
where
    IF: Sdi12Serial + Sdi12Timer,
{
    pub fn new(interface: IF) -> Self {
        Self::with_config(interface, RecorderConfig::default())
    }

    pub fn with_config(interface: IF, config: RecorderConfig) -> Self {
        SyncRecorder {
            interface,
            config,
            response: ResponseBuffer::new(),
            values: MeasurementValues::new(),
            state: MeasurementState::Idle,
        }
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    /// Gives the transport back.
    pub fn into_inner(self) -> IF {
        self.interface
    }

    /// Values collected by the last measurement, in arrival order.
    ///
    /// Only meaningful after that measurement returned `Ok`.
    pub fn get_values(&self) -> &[f32] {
        &self.values
    }

    /// One collected value, or NaN if `index` is past the last one.
    pub fn get_value(&self, index: usize) -> f32 {
        self.values.get(index).copied().unwrap_or(f32::NAN)
    }

    /// The last line read from the bus, terminator excluded.
    pub fn last_response(&self) -> &[u8] {
        self.response.as_bytes()
    }

    pub fn state(&self) -> MeasurementState {
        self.state
    }

    fn set_state(&mut self, next: MeasurementState) {
        if next != self.state {
            trace!("measurement state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}
