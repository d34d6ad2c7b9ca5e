// src/recorder/sync_recorder/scan.rs

use log::{debug, info, trace, warn};

use super::SyncRecorder;
use crate::common::{
    address::Sdi12Addr,
    command::Command,
    error::Sdi12Error,
    hal_traits::{Sdi12Serial, Sdi12Timer},
    response::SensorInfo,
    timing::MAX_SENSORS,
};

/// Sensors found by one scan, in ascending address order.
pub type SensorTable = heapless::Vec<SensorInfo, MAX_SENSORS>;

impl<IF> SyncRecorder<IF>
where
    IF: Sdi12Serial + Sdi12Timer,
{
    /// Creates a recorder and scans the bus once.
    pub fn begin(interface: IF) -> Result<(Self, SensorTable), Sdi12Error<IF::Error>> {
        let mut recorder = Self::new(interface);
        let sensors = recorder.scan_bus()?;
        Ok((recorder, sensors))
    }

    /// Sends `a!`; `true` if the sensor answered with a single byte.
    pub fn acknowledge(&mut self, address: Sdi12Addr) -> Result<bool, Sdi12Error<IF::Error>> {
        let len = self.execute_transaction(&Command::AcknowledgeActive { address })?;
        Ok(len == 1)
    }

    /// Sends `aI!` and splits the reply into its fixed-width fields.
    pub fn identify(&mut self, address: Sdi12Addr) -> Result<SensorInfo, Sdi12Error<IF::Error>> {
        let len = self.execute_transaction(&Command::SendIdentification { address })?;
        if len == 0 {
            return Err(Sdi12Error::InvalidResponse);
        }
        Ok(SensorInfo::from_payload(address, self.response.as_bytes()))
    }

    /// Probes addresses `0` to `9` and identifies every sensor that answers.
    ///
    /// A silent or garbled address is skipped. Only transport failures
    /// abort the scan.
    pub fn scan_bus(&mut self) -> Result<SensorTable, Sdi12Error<IF::Error>> {
        let mut sensors = SensorTable::new();

        for address in Sdi12Addr::standard() {
            trace!("probing {}", address);
            match self.acknowledge(address) {
                Ok(true) => {
                    self.settle();
                    match self.identify(address) {
                        Ok(sensor) => {
                            info!("found sensor: {}", sensor);
                            sensors.push(sensor).map_err(|_| Sdi12Error::TooManySensors {
                                max: MAX_SENSORS,
                                got: MAX_SENSORS + 1,
                            })?;
                        }
                        Err(Sdi12Error::Io(e)) => return Err(Sdi12Error::Io(e)),
                        Err(e) => debug!("{} answered but did not identify: {:?}", address, e),
                    }
                }
                Ok(false) => debug!("{}: unexpected reply {:?}", address, self.response.as_bytes()),
                Err(Sdi12Error::Io(e)) => return Err(Sdi12Error::Io(e)),
                Err(e) => trace!("{}: {:?}", address, e),
            }
            self.settle();
        }

        Ok(sensors)
    }

    /// Sends `aAb!`. `true` only if the sensor confirmed with exactly `b`.
    ///
    /// Silence or a garbled reply is `false`; only transport failures are
    /// returned as errors.
    pub fn change_address(
        &mut self,
        from: Sdi12Addr,
        to: Sdi12Addr,
    ) -> Result<bool, Sdi12Error<IF::Error>> {
        let command = Command::ChangeAddress { address: from, new_address: to };
        let confirmed = match self.execute_transaction(&command) {
            Ok(len) => len == 1 && self.response.first() == Some(to.as_byte()),
            Err(Sdi12Error::Io(e)) => return Err(Sdi12Error::Io(e)),
            Err(e) => {
                debug!("address change {} -> {}: {:?}", from, to, e);
                false
            }
        };
        if confirmed {
            info!("sensor {} moved to {}", from, to);
        } else {
            warn!("address change {} -> {} not confirmed: {:?}", from, to, self.response.as_bytes());
        }
        Ok(confirmed)
    }
}
