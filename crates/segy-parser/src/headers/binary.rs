//! 400-byte binary file header.

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;

use super::read_exact_at;
use crate::decoder::ibm_to_f64;
use crate::error::SegyResult;
use crate::geometry::{BINARY_HEADER_LEN, TEXT_HEADER_LEN};

/// Data sample format code (binary header bytes 3225-3226).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    IbmFloat32,
    Int32,
    Int16,
    FixedPointWithGain,
    IeeeFloat32,
    Int8,
    Unknown(i16),
}

impl SampleFormat {
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => SampleFormat::IbmFloat32,
            2 => SampleFormat::Int32,
            3 => SampleFormat::Int16,
            4 => SampleFormat::FixedPointWithGain,
            5 => SampleFormat::IeeeFloat32,
            8 => SampleFormat::Int8,
            other => SampleFormat::Unknown(other),
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            SampleFormat::IbmFloat32 => 1,
            SampleFormat::Int32 => 2,
            SampleFormat::Int16 => 3,
            SampleFormat::FixedPointWithGain => 4,
            SampleFormat::IeeeFloat32 => 5,
            SampleFormat::Int8 => 8,
            SampleFormat::Unknown(code) => *code,
        }
    }

    pub fn bytes_per_sample(&self) -> Option<usize> {
        match self {
            SampleFormat::IbmFloat32
            | SampleFormat::Int32
            | SampleFormat::FixedPointWithGain
            | SampleFormat::IeeeFloat32 => Some(4),
            SampleFormat::Int16 => Some(2),
            SampleFormat::Int8 => Some(1),
            SampleFormat::Unknown(_) => None,
        }
    }

    pub fn description(&self) -> String {
        match self {
            SampleFormat::IbmFloat32 => "4-byte IBM floating point".to_string(),
            SampleFormat::Int32 => "4-byte two's complement integer".to_string(),
            SampleFormat::Int16 => "2-byte two's complement integer".to_string(),
            SampleFormat::FixedPointWithGain => "4-byte fixed-point with gain".to_string(),
            SampleFormat::IeeeFloat32 => "4-byte IEEE floating point".to_string(),
            SampleFormat::Int8 => "1-byte two's complement integer".to_string(),
            SampleFormat::Unknown(code) => format!("Unknown format code {}", code),
        }
    }

    /// Decode one sample. `None` for unsupported formats or short input.
    pub fn decode_sample(&self, bytes: &[u8]) -> Option<f64> {
        let width = self.bytes_per_sample()?;
        let b = bytes.get(..width)?;
        match self {
            SampleFormat::IbmFloat32 => Some(ibm_to_f64(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))),
            SampleFormat::Int32 => Some(i32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f64),
            SampleFormat::Int16 => Some(i16::from_be_bytes([b[0], b[1]]) as f64),
            SampleFormat::IeeeFloat32 => Some(f32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f64),
            SampleFormat::Int8 => Some(b[0] as i8 as f64),
            SampleFormat::FixedPointWithGain | SampleFormat::Unknown(_) => None,
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl Serialize for SampleFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.description())
    }
}

/// Decoded binary header fields (big-endian, SEG-Y rev 1 layout).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryHeader {
    pub job_id: i32,
    pub line_number: i32,
    pub reel_number: i32,
    pub traces_per_ensemble: i16,
    pub aux_traces_per_ensemble: i16,
    /// Sample interval in microseconds.
    pub sample_interval: u16,
    pub original_sample_interval: u16,
    pub samples_per_trace: u16,
    pub original_samples_per_trace: u16,
    pub data_sample_format_code: i16,
    pub sample_format: SampleFormat,
    pub ensemble_fold: i16,
    pub trace_sorting_code: i16,
    pub measurement_system: i16,
    pub segy_revision: u16,
    pub fixed_length_traces: i16,
    pub extended_text_headers: i16,
}

impl BinaryHeader {
    pub fn parse(raw: &[u8; BINARY_HEADER_LEN as usize]) -> Self {
        let i32_at = |o: usize| i32::from_be_bytes([raw[o], raw[o + 1], raw[o + 2], raw[o + 3]]);
        let i16_at = |o: usize| i16::from_be_bytes([raw[o], raw[o + 1]]);
        let u16_at = |o: usize| u16::from_be_bytes([raw[o], raw[o + 1]]);

        let data_sample_format_code = i16_at(24);
        Self {
            job_id: i32_at(0),
            line_number: i32_at(4),
            reel_number: i32_at(8),
            traces_per_ensemble: i16_at(12),
            aux_traces_per_ensemble: i16_at(14),
            sample_interval: u16_at(16),
            original_sample_interval: u16_at(18),
            samples_per_trace: u16_at(20),
            original_samples_per_trace: u16_at(22),
            data_sample_format_code,
            sample_format: SampleFormat::from_code(data_sample_format_code),
            ensemble_fold: i16_at(26),
            trace_sorting_code: i16_at(28),
            measurement_system: i16_at(54),
            segy_revision: u16_at(300),
            fixed_length_traces: i16_at(302),
            extended_text_headers: i16_at(304),
        }
    }

    /// Sample interval in the unit the extraction record reports.
    pub fn sample_rate(&self) -> f64 {
        self.sample_interval as f64 / 1000.0
    }
}

pub fn read_binary_header(path: &Path) -> SegyResult<BinaryHeader> {
    let raw = read_exact_at::<{ BINARY_HEADER_LEN as usize }>(path, TEXT_HEADER_LEN)?;
    Ok(BinaryHeader::parse(&raw))
}
