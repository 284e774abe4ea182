//! Pixel sample types
//!
//! Maps the BitsPerSample/SampleFormat pair of a single-band raster to a
//! concrete numeric type and converts samples to and from `f64`.

use std::fmt;

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::sample_format;
use crate::tiff::errors::{TiffError, TiffResult};

/// Numeric type of one raster sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
    F64,
}

impl SampleType {
    /// Resolves the sample type from BitsPerSample and SampleFormat
    pub fn from_tags(bits: u16, format: u16) -> TiffResult<Self> {
        match (bits, format) {
            (8, sample_format::UNSIGNED) => Ok(SampleType::U8),
            (16, sample_format::UNSIGNED) => Ok(SampleType::U16),
            (32, sample_format::UNSIGNED) => Ok(SampleType::U32),
            (8, sample_format::SIGNED) => Ok(SampleType::I8),
            (16, sample_format::SIGNED) => Ok(SampleType::I16),
            (32, sample_format::SIGNED) => Ok(SampleType::I32),
            (32, sample_format::IEEEFP) => Ok(SampleType::F32),
            (64, sample_format::IEEEFP) => Ok(SampleType::F64),
            _ => Err(TiffError::UnsupportedSampleType { bits, format }),
        }
    }

    pub fn bits(&self) -> u16 {
        (self.bytes() * 8) as u16
    }

    pub fn bytes(&self) -> usize {
        match self {
            SampleType::U8 | SampleType::I8 => 1,
            SampleType::U16 | SampleType::I16 => 2,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 4,
            SampleType::F64 => 8,
        }
    }

    pub fn format_code(&self) -> u16 {
        match self {
            SampleType::U8 | SampleType::U16 | SampleType::U32 => sample_format::UNSIGNED,
            SampleType::I8 | SampleType::I16 | SampleType::I32 => sample_format::SIGNED,
            SampleType::F32 | SampleType::F64 => sample_format::IEEEFP,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }

    /// Type used for the values of a normalized frame
    ///
    /// Float frames keep their type; integer frames cannot hold z-scores
    /// and become Float32.
    pub fn normalized(&self) -> SampleType {
        if self.is_float() { *self } else { SampleType::F32 }
    }

    /// Reads the raw bits of the sample at the start of `bytes`
    pub fn read_bits(&self, bytes: &[u8], order: ByteOrder) -> u64 {
        let width = self.bytes();
        let mut word = [0u8; 8];
        match order {
            ByteOrder::LittleEndian => {
                word[..width].copy_from_slice(&bytes[..width]);
                u64::from_le_bytes(word)
            }
            ByteOrder::BigEndian => {
                word[8 - width..].copy_from_slice(&bytes[..width]);
                u64::from_be_bytes(word)
            }
        }
    }

    /// Writes raw sample bits back to the start of `bytes`
    pub fn write_bits(&self, bits: u64, bytes: &mut [u8], order: ByteOrder) {
        let width = self.bytes();
        match order {
            ByteOrder::LittleEndian => bytes[..width].copy_from_slice(&bits.to_le_bytes()[..width]),
            ByteOrder::BigEndian => bytes[..width].copy_from_slice(&bits.to_be_bytes()[8 - width..]),
        }
    }

    /// Decodes one sample in the given byte order
    pub fn decode(&self, bytes: &[u8], order: ByteOrder) -> f64 {
        let bits = self.read_bits(bytes, order);
        match self {
            SampleType::U8 | SampleType::U16 | SampleType::U32 => bits as f64,
            SampleType::I8 => bits as u8 as i8 as f64,
            SampleType::I16 => bits as u16 as i16 as f64,
            SampleType::I32 => bits as u32 as i32 as f64,
            SampleType::F32 => f32::from_bits(bits as u32) as f64,
            SampleType::F64 => f64::from_bits(bits),
        }
    }

    /// Appends one sample little-endian, rounding and clamping integers
    pub fn encode_le(&self, value: f64, out: &mut Vec<u8>) {
        match self {
            SampleType::U8 => out.push(clamp_round(value, u8::MIN as f64, u8::MAX as f64) as u8),
            SampleType::I8 => out.push(clamp_round(value, i8::MIN as f64, i8::MAX as f64) as i8 as u8),
            SampleType::U16 => out.extend_from_slice(&(clamp_round(value, 0.0, u16::MAX as f64) as u16).to_le_bytes()),
            SampleType::I16 => out.extend_from_slice(&(clamp_round(value, i16::MIN as f64, i16::MAX as f64) as i16).to_le_bytes()),
            SampleType::U32 => out.extend_from_slice(&(clamp_round(value, 0.0, u32::MAX as f64) as u32).to_le_bytes()),
            SampleType::I32 => out.extend_from_slice(&(clamp_round(value, i32::MIN as f64, i32::MAX as f64) as i32).to_le_bytes()),
            SampleType::F32 => out.extend_from_slice(&(value as f32).to_le_bytes()),
            SampleType::F64 => out.extend_from_slice(&value.to_le_bytes()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SampleType::U8 => "UInt8",
            SampleType::U16 => "UInt16",
            SampleType::U32 => "UInt32",
            SampleType::I8 => "Int8",
            SampleType::I16 => "Int16",
            SampleType::I32 => "Int32",
            SampleType::F32 => "Float32",
            SampleType::F64 => "Float64",
        }
    }
}

fn clamp_round(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.round().clamp(min, max)
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_tag_pairs() {
        assert_eq!(SampleType::from_tags(32, 3).unwrap(), SampleType::F32);
        assert_eq!(SampleType::from_tags(16, 2).unwrap(), SampleType::I16);
        assert!(SampleType::from_tags(12, 1).is_err());
    }

    #[test]
    fn decodes_both_byte_orders() {
        assert_eq!(SampleType::I16.decode(&[0xFF, 0xFE], ByteOrder::BigEndian), -2.0);
        assert_eq!(SampleType::I16.decode(&[0xFE, 0xFF], ByteOrder::LittleEndian), -2.0);
        assert_eq!(SampleType::F32.decode(&1.5f32.to_be_bytes(), ByteOrder::BigEndian), 1.5);
    }

    #[test]
    fn encoding_clamps_integers() {
        let mut out = Vec::new();
        SampleType::U8.encode_le(300.0, &mut out);
        SampleType::U8.encode_le(-4.0, &mut out);
        SampleType::U8.encode_le(2.6, &mut out);
        assert_eq!(out, vec![255, 0, 3]);
    }

    #[test]
    fn integer_frames_normalize_to_float32() {
        assert_eq!(SampleType::U16.normalized(), SampleType::F32);
        assert_eq!(SampleType::F64.normalized(), SampleType::F64);
    }
}
