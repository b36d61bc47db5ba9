//! Byte-field decoding for SEG-Y header values.
//!
//! All SEG-Y header fields handled here are big-endian. A field is described
//! by a 0-based offset into a buffer, a width in bytes (the "gap") and an
//! [`Encoding`]. The width must agree with the encoding; a mismatch is a
//! configuration error and is reported separately from short reads so that
//! callers can degrade short reads to an absent value while still failing
//! loudly on bad configuration.

use seismic_common::FieldValue;
use std::fmt;
use thiserror::Error;

/// Numeric encodings supported for header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Int16,
    Uint16,
    Int32,
    Uint32,
    IbmFloat32,
    IeeeFloat32,
}

impl Encoding {
    /// The only width this encoding can be decoded from.
    pub fn natural_width(&self) -> usize {
        match self {
            Encoding::Int16 | Encoding::Uint16 => 2,
            Encoding::Int32 | Encoding::Uint32 | Encoding::IbmFloat32 | Encoding::IeeeFloat32 => 4,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Encoding::IbmFloat32 | Encoding::IeeeFloat32)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Int16 => "int16",
            Encoding::Uint16 => "uint16",
            Encoding::Int32 => "int32",
            Encoding::Uint32 => "uint32",
            Encoding::IbmFloat32 => "ibm",
            Encoding::IeeeFloat32 => "ieee",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Encoding {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Field-level decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The buffer ends before `offset + width`.
    #[error("short read: need {width} bytes at offset {offset}, buffer has {available}")]
    ShortRead {
        offset: usize,
        width: usize,
        available: usize,
    },

    /// The declared width cannot hold this encoding.
    #[error("{encoding} format requires {} bytes, but gap is {width}", .encoding.natural_width())]
    WidthMismatch { encoding: Encoding, width: usize },
}

impl DecodeError {
    /// Configuration errors must abort extraction; short reads must not.
    pub fn is_configuration(&self) -> bool {
        matches!(self, DecodeError::WidthMismatch { .. })
    }
}

/// Decode one field from `buffer`.
pub fn decode(
    buffer: &[u8],
    offset: usize,
    width: usize,
    encoding: Encoding,
) -> Result<FieldValue, DecodeError> {
    if width != encoding.natural_width() {
        return Err(DecodeError::WidthMismatch { encoding, width });
    }

    let end = offset.checked_add(width).ok_or(DecodeError::ShortRead {
        offset,
        width,
        available: buffer.len(),
    })?;
    let bytes = buffer.get(offset..end).ok_or(DecodeError::ShortRead {
        offset,
        width,
        available: buffer.len(),
    })?;

    let value = match encoding {
        Encoding::Int16 => {
            let raw = u16::from_be_bytes([bytes[0], bytes[1]]) as i64;
            FieldValue::Int(sign_extend_16(raw))
        }
        Encoding::Uint16 => FieldValue::Int(u16::from_be_bytes([bytes[0], bytes[1]]) as i64),
        Encoding::Int32 => {
            FieldValue::Int(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64)
        }
        Encoding::Uint32 => {
            FieldValue::Int(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64)
        }
        Encoding::IbmFloat32 => {
            let word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            FieldValue::Float(ibm_to_f64(word))
        }
        Encoding::IeeeFloat32 => {
            let v = f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            FieldValue::Float(v as f64)
        }
    };

    Ok(value)
}

/// Mask to 16 bits and sign-extend from bit 15.
///
/// This is the "2-bit" gap rule: read the value as unsigned 16-bit, then
/// subtract 0x10000 when bit 15 is set.
pub fn sign_extend_16(raw: i64) -> i64 {
    let v = raw & 0xFFFF;
    if v & 0x8000 != 0 {
        v - 0x10000
    } else {
        v
    }
}

/// Convert an IBM System/370 single-precision word to `f64`.
///
/// Layout: sign in bit 31, excess-64 base-16 exponent in bits 24-30, and a
/// 24-bit fraction in bits 0-23 interpreted as `fraction / 2^24`.
pub fn ibm_to_f64(word: u32) -> f64 {
    if word == 0 {
        return 0.0;
    }

    let sign = if (word >> 31) & 0x01 == 1 { -1.0 } else { 1.0 };
    let exponent = ((word >> 24) & 0x7F) as i32;
    let mantissa = (word & 0x00FF_FFFF) as f64 / (1u32 << 24) as f64;

    sign * mantissa * 16f64.powi(exponent - 64)
}

/// Encode a value as an IBM System/370 single-precision word.
///
/// Values beyond the IBM range saturate to the largest magnitude; values too
/// small to represent encode as zero. Non-finite inputs encode as zero.
pub fn f64_to_ibm(value: f64) -> u32 {
    if value == 0.0 || !value.is_finite() {
        return 0;
    }

    let sign: u32 = if value < 0.0 { 0x8000_0000 } else { 0 };
    let mut fraction = value.abs();
    let mut exponent: i32 = 64;

    while fraction >= 1.0 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 1.0 / 16.0 {
        fraction *= 16.0;
        exponent -= 1;
    }

    let mut mantissa = (fraction * (1u32 << 24) as f64).round() as u32;
    if mantissa >= 0x0100_0000 {
        mantissa >>= 4;
        exponent += 1;
    }

    if exponent > 127 {
        return sign | 0x7FFF_FFFF;
    }
    if exponent < 0 {
        return 0;
    }

    sign | ((exponent as u32) << 24) | mantissa
}
