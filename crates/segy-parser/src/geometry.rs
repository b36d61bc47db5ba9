//! Trace geometry derived from file size and the declared sample count.

use serde::Serialize;

pub const TEXT_HEADER_LEN: u64 = 3200;
pub const BINARY_HEADER_LEN: u64 = 400;
pub const FIRST_TRACE_OFFSET: u64 = TEXT_HEADER_LEN + BINARY_HEADER_LEN;
pub const TRACE_HEADER_LEN: u64 = 240;

/// Absolute offset of the 2-byte sample count read for geometry.
///
/// This is byte 115 of the first trace header (the per-trace sample count),
/// which is where files in practice carry a reliable value.
pub const SAMPLE_COUNT_OFFSET: u64 = FIRST_TRACE_OFFSET + 114;

/// Bytes per sample assumed when computing the trace stride.
pub const ASSUMED_SAMPLE_BYTES: u64 = 4;

/// Layout of the trace section of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileGeometry {
    pub file_size_bytes: u64,
    pub num_samples_per_trace: u16,
    pub trace_stride_bytes: u64,
    pub trace_count: u64,
}

impl FileGeometry {
    /// Compute geometry from the file size and the raw sample-count bytes.
    ///
    /// A truncated final trace is not counted.
    pub fn compute(file_size_bytes: u64, sample_count_raw: [u8; 2]) -> Self {
        let num_samples_per_trace = u16::from_be_bytes(sample_count_raw);
        let trace_stride_bytes =
            TRACE_HEADER_LEN + num_samples_per_trace as u64 * ASSUMED_SAMPLE_BYTES;

        let trace_count = if trace_stride_bytes == 0 || file_size_bytes < FIRST_TRACE_OFFSET {
            0
        } else {
            (file_size_bytes - FIRST_TRACE_OFFSET) / trace_stride_bytes
        };

        Self {
            file_size_bytes,
            num_samples_per_trace,
            trace_stride_bytes,
            trace_count,
        }
    }

    /// Absolute offset of trace header `index`, if that trace exists.
    pub fn trace_offset(&self, index: u64) -> Option<u64> {
        if index >= self.trace_count {
            return None;
        }
        Some(FIRST_TRACE_OFFSET + self.trace_stride_bytes * index)
    }

    /// Offset of the last trace header, only when there is more than one trace.
    pub fn last_trace_offset(&self) -> Option<u64> {
        if self.trace_count > 1 {
            self.trace_offset(self.trace_count - 1)
        } else {
            None
        }
    }

    /// Offset of the sample data following trace header `index`.
    pub fn trace_data_offset(&self, index: u64) -> Option<u64> {
        self.trace_offset(index).map(|o| o + TRACE_HEADER_LEN)
    }
}
