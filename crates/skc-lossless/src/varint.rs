//! Canonical byte layout for code arrays.
//!
//! Each code is written as an unsigned LEB128 varint: seven bits per byte,
//! least significant group first, high bit set on every byte but the last.
//! Every code has exactly one encoding: a trailing zero group is rejected.
//! The layout carries no length or shape; the byte count delimits it.

use skc_core::{Error, Result};

/// Longest encoding of a `u32`.
const MAX_VARINT_LEN: usize = 5;

/// Bytes needed to encode `codes`.
pub fn encoded_len(codes: &[u32]) -> usize {
    codes.iter().map(|&c| varint_len(c)).sum()
}

fn varint_len(code: u32) -> usize {
    match code {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0xFFF_FFFF => 4,
        _ => 5,
    }
}

/// Serialize codes to the varint layout.
pub fn encode_codes(codes: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(codes));
    for &code in codes {
        let mut v = code;
        while v >= 0x80 {
            out.push((v as u8 & 0x7F) | 0x80);
            v >>= 7;
        }
        out.push(v as u8);
    }
    out
}

/// Parse the varint layout back into codes.
pub fn decode_codes(bytes: &[u8]) -> Result<Vec<u32>> {
    let mut codes = Vec::with_capacity(bytes.len());
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let mut value: u32 = 0;
        let mut shift = 0;
        loop {
            let Some(&byte) = bytes.get(pos) else {
                return Err(Error::corrupted_at("truncated varint", start));
            };
            pos += 1;

            let group = (byte & 0x7F) as u32;
            if pos - start == MAX_VARINT_LEN && group > 0x0F {
                return Err(Error::corrupted_at("varint overflows u32", start));
            }
            value |= group << shift;

            if byte & 0x80 == 0 {
                if byte == 0 && pos - start > 1 {
                    return Err(Error::corrupted_at("non-minimal varint", start));
                }
                break;
            }
            if pos - start == MAX_VARINT_LEN {
                return Err(Error::corrupted_at("varint longer than 5 bytes", start));
            }
            shift += 7;
        }
        codes.push(value);
    }

    Ok(codes)
}
