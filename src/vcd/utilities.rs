use num::BigUint;

use super::signal::Bit;

#[derive(Debug, PartialEq)]
pub(super) enum BitStringErr {
    Empty,
    OtherValue(char),
}

/// Parses the digits of a `b...` vector, most significant bit first.
pub(super) fn parse_bit_string(word: &str) -> Result<Vec<Bit>, BitStringErr> {
    if word.is_empty() {
        return Err(BitStringErr::Empty);
    }

    word.chars()
        .map(|chr| Bit::from_char(chr).ok_or(BitStringErr::OtherValue(chr)))
        .collect()
}

// Packs at most 8 bits into a byte. Returns None on x or z.
fn bits_to_byte(bits: &[Bit]) -> Option<u8> {
    let mut val = 0u8;

    for (idx, bit) in bits.iter().rev().enumerate() {
        match bit {
            Bit::One => val |= 1u8 << idx,
            Bit::Zero => {}
            Bit::X | Bit::Z => return None,
        }
    }

    Some(val)
}

/// Converts a msb-first bit sequence into a number, walking it from the
/// least significant end one byte at a time.
pub(super) fn bits_to_biguint(bits: &[Bit]) -> Option<BigUint> {
    let mut bytes_le: Vec<u8> = Vec::with_capacity(bits.len() / 8 + 1);

    let mut tail_idx = bits.len();
    while tail_idx > 0 {
        // clamp head if fewer than 8 bits remain
        let head_idx = tail_idx.saturating_sub(8);
        bytes_le.push(bits_to_byte(&bits[head_idx..tail_idx])?);
        tail_idx = head_idx;
    }

    Some(BigUint::from_bytes_le(&bytes_le))
}
