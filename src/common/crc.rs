// src/common/crc.rs

use super::error::Sdi12Error;
use crc::{Algorithm, Crc};

/// Length of the ASCII-encoded CRC suffix on data responses.
pub const CRC_ASCII_LEN: usize = 3;

/// CRC-16/ARC as used by SDI-12: reflected polynomial 0xA001
/// (0x8005 in normal form), initial value 0, no final XOR.
pub const SDI12_CRC: Algorithm<u16> = Algorithm {
    width: 16,
    poly: 0x8005,
    init: 0x0000,
    refin: true,
    refout: true,
    xorout: 0x0000,
    check: 0xBB3D,
    residue: 0x0000,
};

const CRC_COMPUTER: Crc<u16> = Crc::<u16>::new(&SDI12_CRC);

/// Calculates the SDI-12 CRC-16 over `data` (address included, CRC and
/// line terminator excluded).
#[inline]
pub fn calculate_crc16(data: &[u8]) -> u16 {
    CRC_COMPUTER.checksum(data)
}

/// Encodes a 16-bit CRC into three printable characters: bits 12-15,
/// bits 6-11 and bits 0-5, each OR'd with 0x40.
pub fn encode_crc_ascii(crc_value: u16) -> [u8; CRC_ASCII_LEN] {
    let char1 = 0x40 | ((crc_value >> 12) & 0x3F) as u8;
    let char2 = 0x40 | ((crc_value >> 6) & 0x3F) as u8;
    let char3 = 0x40 | (crc_value & 0x3F) as u8;
    [char1, char2, char3]
}

/// Decodes three ASCII CRC characters back into a 16-bit value.
pub fn decode_crc_ascii(crc_chars: &[u8; CRC_ASCII_LEN]) -> u16 {
    let byte1 = u16::from(crc_chars[0] & 0x3F);
    let byte2 = u16::from(crc_chars[1] & 0x3F);
    let byte3 = u16::from(crc_chars[2] & 0x3F);
    (byte1 << 12) | (byte2 << 6) | byte3
}

/// Computes and appends the ASCII CRC for `payload`, as a sensor would.
pub fn append_crc_ascii<const N: usize>(
    payload: &mut heapless::Vec<u8, N>,
) -> Result<(), Sdi12Error<()>> {
    let encoded = encode_crc_ascii(calculate_crc16(payload));
    payload.extend_from_slice(&encoded).map_err(|_| Sdi12Error::BufferOverflow {
        needed: payload.len() + CRC_ASCII_LEN,
        got: N,
    })
}

/// Verifies a response line whose last three bytes are the ASCII CRC.
///
/// The checksum is recomputed over every byte before the suffix and the
/// encoded result is compared character by character with the suffix.
/// On success returns the line with the CRC stripped.
pub fn verify_response_crc_ascii<E>(response_with_crc: &[u8]) -> Result<&[u8], Sdi12Error<E>>
where
    E: core::fmt::Debug,
{
    if response_with_crc.len() < CRC_ASCII_LEN {
        return Err(Sdi12Error::InvalidResponse);
    }
    let data_len = response_with_crc.len() - CRC_ASCII_LEN;
    let (data_part, received) = response_with_crc.split_at(data_len);

    let calculated = calculate_crc16(data_part);
    let expected_chars = encode_crc_ascii(calculated);

    if expected_chars[..] == *received {
        Ok(data_part)
    } else {
        let received_crc = decode_crc_ascii(&[received[0], received[1], received[2]]);
        Err(Sdi12Error::CrcMismatch { expected: received_crc, calculated })
    }
}
