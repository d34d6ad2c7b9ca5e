//! SDI-12 command definitions.
//!
//! Every command is built fresh per call and formatted into a stack buffer;
//! nothing here holds a shared, mutable template.

use core::fmt::{self, Write};

use arrayvec::ArrayString;

use super::{address::Sdi12Addr, Sdi12Error};

/// Longest formatted command is `aMCx!` / `aCCx!` (5 bytes); leave headroom.
pub const COMMAND_CAPACITY: usize = 8;

/// A formatted command frame, ready to hand to the transport.
pub type CommandBuffer = ArrayString<COMMAND_CAPACITY>;

/// Error raised when a command index is out of range or formatting fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CommandIndexError {
    /// Index not in `0..=9`.
    OutOfRange(u8),
    /// Formatted command did not fit in [`CommandBuffer`].
    Capacity,
}

impl fmt::Display for CommandIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandIndexError::OutOfRange(i) => write!(f, "command index {} out of range 0-9", i),
            CommandIndexError::Capacity => write!(f, "command does not fit the frame buffer"),
        }
    }
}

impl CommandIndexError {
    /// Lifts the error into `Sdi12Error` for any transport error type.
    pub fn into_sdi12<E: fmt::Debug>(self) -> Sdi12Error<E> {
        match self {
            CommandIndexError::OutOfRange(i) => Sdi12Error::InvalidCommandIndex(i),
            CommandIndexError::Capacity => Sdi12Error::BufferOverflow {
                needed: COMMAND_CAPACITY + 1,
                got: COMMAND_CAPACITY,
            },
        }
    }
}

/// Selects `aM!` (base) or one of the additional measurements `aMx!`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MeasurementIndex {
    #[default]
    Base,
    Additional(u8),
}

impl MeasurementIndex {
    pub fn new(index: Option<u8>) -> Result<Self, CommandIndexError> {
        match index {
            None => Ok(MeasurementIndex::Base),
            Some(i) if i <= 9 => Ok(MeasurementIndex::Additional(i)),
            Some(i) => Err(CommandIndexError::OutOfRange(i)),
        }
    }

    fn validate(&self) -> Result<(), CommandIndexError> {
        match *self {
            MeasurementIndex::Additional(i) if i > 9 => Err(CommandIndexError::OutOfRange(i)),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for MeasurementIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementIndex::Base => Ok(()),
            MeasurementIndex::Additional(i) => write!(f, "{}", i),
        }
    }
}

/// Sub-index of a send-data command, `aD0!`..`aD9!`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DataIndex(u8);

impl DataIndex {
    pub const MAX: u8 = 9;

    pub fn new(index: u8) -> Result<Self, CommandIndexError> {
        if index <= Self::MAX {
            Ok(DataIndex(index))
        } else {
            Err(CommandIndexError::OutOfRange(index))
        }
    }

    #[inline]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// The commands this session engine issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `a!`
    AcknowledgeActive { address: Sdi12Addr },
    /// `aAb!`
    ChangeAddress { address: Sdi12Addr, new_address: Sdi12Addr },
    /// `aM!` / `aMx!`
    StartMeasurement { address: Sdi12Addr, index: MeasurementIndex },
    /// `aMC!` / `aMCx!`
    StartMeasurementCRC { address: Sdi12Addr, index: MeasurementIndex },
    /// `aC!` / `aCx!`
    StartConcurrentMeasurement { address: Sdi12Addr, index: MeasurementIndex },
    /// `aCC!` / `aCCx!`
    StartConcurrentMeasurementCRC { address: Sdi12Addr, index: MeasurementIndex },
    /// `aV!`
    StartVerification { address: Sdi12Addr },
    /// `aD0!`..`aD9!`
    SendData { address: Sdi12Addr, index: DataIndex },
    /// `aI!`
    SendIdentification { address: Sdi12Addr },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::AcknowledgeActive { address } => write!(f, "{}!", address),
            Command::ChangeAddress { address, new_address } => {
                write!(f, "{}A{}!", address, new_address)
            }
            Command::StartMeasurement { address, index } => write!(f, "{}M{}!", address, index),
            Command::StartMeasurementCRC { address, index } => write!(f, "{}MC{}!", address, index),
            Command::StartConcurrentMeasurement { address, index } => {
                write!(f, "{}C{}!", address, index)
            }
            Command::StartConcurrentMeasurementCRC { address, index } => {
                write!(f, "{}CC{}!", address, index)
            }
            Command::StartVerification { address } => write!(f, "{}V!", address),
            Command::SendData { address, index } => write!(f, "{}D{}!", address, index.get()),
            Command::SendIdentification { address } => write!(f, "{}I!", address),
        }
    }
}

impl Command {
    /// Builds the measure command for `address`, picking the CRC-requesting
    /// variant when `crc` is set.
    pub fn measurement(
        address: Sdi12Addr,
        additional: Option<u8>,
        crc: bool,
    ) -> Result<Self, CommandIndexError> {
        let index = MeasurementIndex::new(additional)?;
        Ok(if crc {
            Command::StartMeasurementCRC { address, index }
        } else {
            Command::StartMeasurement { address, index }
        })
    }

    /// Builds the concurrent measure command for `address`.
    pub fn concurrent_measurement(
        address: Sdi12Addr,
        additional: Option<u8>,
        crc: bool,
    ) -> Result<Self, CommandIndexError> {
        let index = MeasurementIndex::new(additional)?;
        Ok(if crc {
            Command::StartConcurrentMeasurementCRC { address, index }
        } else {
            Command::StartConcurrentMeasurement { address, index }
        })
    }

    pub fn send_data(address: Sdi12Addr, index: u8) -> Result<Self, CommandIndexError> {
        Ok(Command::SendData { address, index: DataIndex::new(index)? })
    }

    /// Returns the address the command is directed to.
    pub fn address(&self) -> Sdi12Addr {
        match self {
            Command::AcknowledgeActive { address }
            | Command::ChangeAddress { address, .. }
            | Command::StartMeasurement { address, .. }
            | Command::StartMeasurementCRC { address, .. }
            | Command::StartConcurrentMeasurement { address, .. }
            | Command::StartConcurrentMeasurementCRC { address, .. }
            | Command::StartVerification { address }
            | Command::SendData { address, .. }
            | Command::SendIdentification { address } => *address,
        }
    }

    /// True for the variants whose data responses carry a 3-character CRC.
    pub fn expects_crc(&self) -> bool {
        matches!(
            self,
            Command::StartMeasurementCRC { .. } | Command::StartConcurrentMeasurementCRC { .. }
        )
    }

    /// Exact length of the `atttn[n]` acknowledgement this command elicits,
    /// or `None` if it is not a measurement start.
    pub fn ack_len(&self) -> Option<usize> {
        match self {
            Command::StartMeasurement { .. }
            | Command::StartMeasurementCRC { .. }
            | Command::StartVerification { .. } => Some(5),
            Command::StartConcurrentMeasurement { .. }
            | Command::StartConcurrentMeasurementCRC { .. } => Some(6),
            _ => None,
        }
    }

    /// Data requests follow straight on from the previous exchange, every
    /// other command starts from an empty input buffer.
    pub fn clears_input(&self) -> bool {
        !matches!(self, Command::SendData { .. })
    }

    /// Formats the command into a fresh stack buffer.
    pub fn format_into(&self) -> Result<CommandBuffer, CommandIndexError> {
        match self {
            Command::StartMeasurement { index, .. }
            | Command::StartMeasurementCRC { index, .. }
            | Command::StartConcurrentMeasurement { index, .. }
            | Command::StartConcurrentMeasurementCRC { index, .. } => index.validate()?,
            _ => {}
        }
        let mut buffer = CommandBuffer::new();
        write!(buffer, "{}", self).map_err(|_| CommandIndexError::Capacity)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(c: char) -> Sdi12Addr {
        Sdi12Addr::new(c).unwrap()
    }

    fn fmt(cmd: Command) -> String {
        cmd.format_into().unwrap().as_str().to_string()
    }

    #[test]
    fn test_command_formatting() {
        assert_eq!(fmt(Command::AcknowledgeActive { address: addr('1') }), "1!");
        assert_eq!(
            fmt(Command::ChangeAddress { address: addr('0'), new_address: addr('1') }),
            "0A1!"
        );
        assert_eq!(fmt(Command::measurement(addr('1'), None, false).unwrap()), "1M!");
        assert_eq!(fmt(Command::measurement(addr('1'), None, true).unwrap()), "1MC!");
        assert_eq!(fmt(Command::measurement(addr('1'), Some(3), false).unwrap()), "1M3!");
        assert_eq!(fmt(Command::measurement(addr('1'), Some(9), true).unwrap()), "1MC9!");
        assert_eq!(fmt(Command::concurrent_measurement(addr('2'), None, false).unwrap()), "2C!");
        assert_eq!(fmt(Command::concurrent_measurement(addr('2'), None, true).unwrap()), "2CC!");
        assert_eq!(fmt(Command::concurrent_measurement(addr('2'), Some(4), false).unwrap()), "2C4!");
        assert_eq!(fmt(Command::concurrent_measurement(addr('2'), Some(4), true).unwrap()), "2CC4!");
        assert_eq!(fmt(Command::StartVerification { address: addr('5') }), "5V!");
        assert_eq!(fmt(Command::send_data(addr('6'), 0).unwrap()), "6D0!");
        assert_eq!(fmt(Command::send_data(addr('6'), 9).unwrap()), "6D9!");
        assert_eq!(fmt(Command::SendIdentification { address: addr('7') }), "7I!");
    }

    #[test]
    fn test_invalid_indices() {
        assert_eq!(MeasurementIndex::new(Some(10)), Err(CommandIndexError::OutOfRange(10)));
        assert_eq!(DataIndex::new(10), Err(CommandIndexError::OutOfRange(10)));
        assert!(Command::measurement(addr('0'), Some(12), false).is_err());

        // Hand-built out-of-range index is caught at formatting time.
        let cmd = Command::StartMeasurement {
            address: addr('0'),
            index: MeasurementIndex::Additional(11),
        };
        assert_eq!(cmd.format_into(), Err(CommandIndexError::OutOfRange(11)));

        let e: Sdi12Error<()> = CommandIndexError::OutOfRange(11).into_sdi12();
        assert!(matches!(e, Sdi12Error::InvalidCommandIndex(11)));
        let e: Sdi12Error<u8> = CommandIndexError::Capacity.into_sdi12();
        assert!(matches!(e, Sdi12Error::BufferOverflow { .. }));
    }

    #[test]
    fn test_builders_are_independent() {
        // Two commands built back to back never share storage.
        let a = Command::measurement(addr('1'), Some(2), false).unwrap().format_into().unwrap();
        let b = Command::measurement(addr('3'), Some(4), true).unwrap().format_into().unwrap();
        assert_eq!(a.as_str(), "1M2!");
        assert_eq!(b.as_str(), "3MC4!");
    }

    #[test]
    fn test_command_properties() {
        let m = Command::measurement(addr('0'), None, false).unwrap();
        assert_eq!(m.ack_len(), Some(5));
        assert!(!m.expects_crc());
        assert!(m.clears_input());

        let cc = Command::concurrent_measurement(addr('0'), None, true).unwrap();
        assert_eq!(cc.ack_len(), Some(6));
        assert!(cc.expects_crc());

        let d = Command::send_data(addr('4'), 1).unwrap();
        assert_eq!(d.ack_len(), None);
        assert!(!d.clears_input());
        assert_eq!(d.address(), addr('4'));

        assert_eq!(Command::StartVerification { address: addr('8') }.ack_len(), Some(5));
    }
}
