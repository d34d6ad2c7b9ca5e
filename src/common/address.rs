// src/common/address.rs

use super::error::Sdi12Error;
use core::convert::TryFrom;
use core::fmt;

/// A single-character sensor address on the shared bus.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Sdi12Addr(char);

impl Sdi12Addr {
    pub const DEFAULT_ADDRESS: Sdi12Addr = Sdi12Addr('0');

    /// Creates a new `Sdi12Addr` if the given character is a valid address.
    /// Returns `Result<Self, Sdi12Error<()>>` because validation itself
    /// cannot cause an I/O error.
    pub fn new(address_char: char) -> Result<Self, Sdi12Error<()>> {
        if Self::is_valid_address_char(address_char) {
            Ok(Sdi12Addr(address_char))
        } else {
            Err(Sdi12Error::InvalidAddress(address_char))
        }
    }

    /// Builds an address from a raw response byte.
    pub fn from_byte(byte: u8) -> Result<Self, Sdi12Error<()>> {
        Self::new(byte as char)
    }

    #[inline]
    pub const fn as_char(&self) -> char {
        self.0
    }

    /// The address as the single ASCII byte sent on the wire.
    #[inline]
    pub const fn as_byte(&self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub const fn is_standard(&self) -> bool {
        matches!(self.0, '0'..='9')
    }

    #[inline]
    pub const fn is_extended(&self) -> bool {
        matches!(self.0, 'a'..='z' | 'A'..='Z')
    }

    #[inline]
    pub const fn is_valid_address_char(c: char) -> bool {
        matches!(c, '0'..='9' | 'a'..='z' | 'A'..='Z')
    }

    /// The standard addresses `'0'..='9'` in ascending order, as probed by a bus scan.
    pub fn standard() -> impl Iterator<Item = Sdi12Addr> {
        ('0'..='9').map(Sdi12Addr)
    }
}

impl Default for Sdi12Addr {
    fn default() -> Self {
        Self::DEFAULT_ADDRESS
    }
}

impl TryFrom<char> for Sdi12Addr {
    type Error = Sdi12Error<()>;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sdi12Addr> for char {
    fn from(value: Sdi12Addr) -> Self {
        value.0
    }
}

impl fmt::Display for Sdi12Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
