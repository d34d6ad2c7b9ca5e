// src/common/types.rs

use super::timing::MAX_VALUES;

/// Values collected by one measurement, in arrival order.
pub type MeasurementValues = heapless::Vec<f32, MAX_VALUES>;

/// Byte order for serialising measurement values into messages.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Encodes an `f32` into four bytes in the requested order.
pub fn float_to_bytes(value: f32, order: ByteOrder) -> [u8; 4] {
    match order {
        ByteOrder::Little => value.to_le_bytes(),
        ByteOrder::Big => value.to_be_bytes(),
    }
}

/// Decodes four bytes in the given order back into an `f32`.
pub fn bytes_to_float(bytes: [u8; 4], order: ByteOrder) -> f32 {
    match order {
        ByteOrder::Little => f32::from_le_bytes(bytes),
        ByteOrder::Big => f32::from_be_bytes(bytes),
    }
}

/// Writes every value into `out` back to back, four bytes each.
///
/// Returns the number of bytes written, or `None` if `out` is too small.
pub fn values_to_bytes(values: &[f32], order: ByteOrder, out: &mut [u8]) -> Option<usize> {
    let needed = values.len() * 4;
    if out.len() < needed {
        return None;
    }
    for (chunk, value) in out.chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&float_to_bytes(*value, order));
    }
    Some(needed)
}
