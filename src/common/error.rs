// src/common/error.rs

#[derive(Debug, thiserror::Error)]
pub enum Sdi12Error<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the bus transport.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// No response (or no line terminator) within the polling bound.
    #[error("Operation timed out")]
    Timeout,

    /// Byte outside `{CR, LF} ∪ [0x20, 0x7E]` received in a response line.
    #[error("Invalid character received: {0:#04x}")]
    InvalidCharacter(u8),

    /// Provided address character is not a valid SDI-12 address.
    #[error("Invalid SDI-12 address character: '{0}'")]
    InvalidAddress(char),

    /// Measurement or data index outside `0..=9`.
    #[error("Invalid command index: {0}")]
    InvalidCommandIndex(u8),

    /// Response had the wrong length or could not be interpreted.
    #[error("Invalid response")]
    InvalidResponse,

    /// Sensor announced a delay but never sent its service request.
    #[error("Service request missing")]
    ServiceRequestMissing,

    /// Received CRC does not match calculated CRC.
    #[error("CRC mismatch: expected {expected:#06x}, calculated {calculated:#06x}")]
    CrcMismatch { expected: u16, calculated: u16 },

    /// Data payload did not start with a sign character or held a bad field.
    #[error("Malformed value in data response")]
    MalformedValue,

    /// Value array or other fixed-capacity storage was too small.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// More addresses than the sensor table can hold.
    #[error("Too many sensors: max {max}, got {got}")]
    TooManySensors { max: usize, got: usize },
}

// Allow mapping from the transport error with `?`.
impl<E: core::fmt::Debug> From<E> for Sdi12Error<E> {
    fn from(e: E) -> Self {
        Sdi12Error::Io(e)
    }
}
