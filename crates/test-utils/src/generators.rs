//! Synthetic file generators.
//!
//! These builders write small, fully predictable SEG-Y and LAS files so
//! tests can assert exact values at exact byte offsets.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Size of the textual file header.
pub const TEXT_HEADER_BYTES: usize = 3200;
/// Size of the binary file header.
pub const BINARY_HEADER_BYTES: usize = 400;
/// Size of each trace header.
pub const TRACE_HEADER_BYTES: usize = 240;
/// Offset of the first trace header.
pub const FIRST_TRACE: usize = TEXT_HEADER_BYTES + BINARY_HEADER_BYTES;

/// Encodes a value as an IBM System/360 single-precision word.
///
/// Written independently of the parser's encoder: the mantissa is
/// truncated rather than rounded.
///
/// ```
/// use test_utils::encode_ibm;
///
/// assert_eq!(encode_ibm(1.0), [0x41, 0x10, 0x00, 0x00]);
/// assert_eq!(encode_ibm(0.0), [0, 0, 0, 0]);
/// ```
pub fn encode_ibm(value: f64) -> [u8; 4] {
    if value == 0.0 {
        return [0; 4];
    }
    let sign: u8 = if value < 0.0 { 0x80 } else { 0 };
    let mut fraction = value.abs();
    let mut exponent: i32 = 64;
    while fraction >= 1.0 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 0.0625 {
        fraction *= 16.0;
        exponent -= 1;
    }
    let mantissa = (fraction * 16_777_216.0) as u32;
    let m = mantissa.to_be_bytes();
    [sign | (exponent as u8 & 0x7F), m[1], m[2], m[3]]
}

/// Reads `width` bytes at an absolute file offset.
///
/// This is the reference read used to check reader output byte-for-byte.
pub fn read_bytes_at(path: &Path, offset: u64, width: usize) -> Vec<u8> {
    let mut file = File::open(path).expect("open reference file");
    file.seek(SeekFrom::Start(offset)).expect("seek reference file");
    let mut buf = vec![0u8; width];
    let n = file.read(&mut buf).expect("read reference file");
    buf.truncate(n);
    buf
}

/// Writes big-endian values into a 240-byte trace header using 1-based
/// SEG-Y byte positions.
#[derive(Debug, Clone)]
pub struct TraceHeaderWriter {
    bytes: [u8; TRACE_HEADER_BYTES],
}

impl TraceHeaderWriter {
    fn new() -> Self {
        Self {
            bytes: [0u8; TRACE_HEADER_BYTES],
        }
    }

    fn put(&mut self, byte: usize, data: &[u8]) -> &mut Self {
        let start = byte - 1;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        self
    }

    pub fn i32(&mut self, byte: usize, value: i32) -> &mut Self {
        self.put(byte, &value.to_be_bytes())
    }

    pub fn u32(&mut self, byte: usize, value: u32) -> &mut Self {
        self.put(byte, &value.to_be_bytes())
    }

    pub fn i16(&mut self, byte: usize, value: i16) -> &mut Self {
        self.put(byte, &value.to_be_bytes())
    }

    pub fn u16(&mut self, byte: usize, value: u16) -> &mut Self {
        self.put(byte, &value.to_be_bytes())
    }

    pub fn ibm(&mut self, byte: usize, value: f64) -> &mut Self {
        self.put(byte, &encode_ibm(value))
    }

    pub fn ieee(&mut self, byte: usize, value: f32) -> &mut Self {
        self.put(byte, &value.to_be_bytes())
    }

    pub fn raw(&mut self, byte: usize, data: &[u8]) -> &mut Self {
        self.put(byte, data)
    }

    /// Standard layout helper: FFID, CDP and source coordinates as int32.
    pub fn standard(&mut self, ffid: i32, cdp: i32, source_x: i32, source_y: i32) -> &mut Self {
        self.i32(9, ffid).i32(21, cdp).i32(73, source_x).i32(77, source_y)
    }
}

/// Builds a synthetic SEG-Y file.
///
/// # Example
///
/// ```
/// use test_utils::SegyFileBuilder;
///
/// let bytes = SegyFileBuilder::new(10)
///     .trace(|h| { h.standard(1, 100, 500_000, 6_000_000); })
///     .trace(|h| { h.standard(2, 101, 500_025, 6_000_050); })
///     .build();
/// assert_eq!(bytes.len(), 3600 + 2 * (240 + 40));
/// ```
#[derive(Debug, Clone)]
pub struct SegyFileBuilder {
    text_header: Vec<u8>,
    binary_header: [u8; BINARY_HEADER_BYTES],
    num_samples: u16,
    traces: Vec<TraceHeaderWriter>,
    trailing: Vec<u8>,
}

impl SegyFileBuilder {
    /// A builder for traces of `num_samples` 4-byte IBM samples at 4 ms.
    pub fn new(num_samples: u16) -> Self {
        Self {
            text_header: vec![b' '; TEXT_HEADER_BYTES],
            binary_header: [0u8; BINARY_HEADER_BYTES],
            num_samples,
            traces: Vec::new(),
            trailing: Vec::new(),
        }
        .text_line(0, "C 1 SYNTHETIC TEST LINE")
        .sample_interval(4000)
        .binary_u16(21, num_samples)
        .format_code(1)
    }

    /// Write an ASCII card image line (0-based line index).
    pub fn text_line(mut self, line: usize, text: &str) -> Self {
        let start = line * 80;
        let bytes = text.as_bytes();
        let len = bytes.len().min(80);
        self.text_header[start..start + len].copy_from_slice(&bytes[..len]);
        self
    }

    /// Set a 16-bit binary header value at a 1-based position within the
    /// binary header.
    pub fn binary_u16(mut self, byte: usize, value: u16) -> Self {
        self.binary_header[byte - 1..byte + 1].copy_from_slice(&value.to_be_bytes());
        self
    }

    pub fn sample_interval(self, microseconds: u16) -> Self {
        self.binary_u16(17, microseconds)
    }

    pub fn format_code(self, code: u16) -> Self {
        self.binary_u16(25, code)
    }

    /// Add a trace; bytes 115-116 always carry the sample count.
    pub fn trace(mut self, f: impl FnOnce(&mut TraceHeaderWriter)) -> Self {
        let mut header = TraceHeaderWriter::new();
        header.u16(115, self.num_samples);
        f(&mut header);
        self.traces.push(header);
        self
    }

    /// Add `count` traces, the closure receiving the 0-based trace index.
    pub fn traces(mut self, count: usize, mut f: impl FnMut(usize, &mut TraceHeaderWriter)) -> Self {
        for index in 0..count {
            let mut header = TraceHeaderWriter::new();
            header.u16(115, self.num_samples);
            f(index, &mut header);
            self.traces.push(header);
        }
        self
    }

    /// Append bytes after the last complete trace (a truncated trace).
    pub fn trailing_bytes(mut self, count: usize) -> Self {
        self.trailing = vec![0xAB; count];
        self
    }

    /// Offset of trace header `index` in the built file.
    pub fn trace_offset(&self, index: usize) -> u64 {
        (FIRST_TRACE + index * self.stride()) as u64
    }

    pub fn stride(&self) -> usize {
        TRACE_HEADER_BYTES + self.num_samples as usize * 4
    }

    /// Sample `j` of trace `i` is `(i + 1) * 1000 + j`, IBM encoded.
    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(FIRST_TRACE + self.traces.len() * self.stride());
        out.extend_from_slice(&self.text_header);
        out.extend_from_slice(&self.binary_header);
        for (i, header) in self.traces.iter().enumerate() {
            out.extend_from_slice(&header.bytes);
            for j in 0..self.num_samples as usize {
                out.extend_from_slice(&encode_ibm(((i + 1) * 1000 + j) as f64));
            }
        }
        out.extend_from_slice(&self.trailing);
        out
    }

    /// Write to `path`, returning the path.
    pub fn write_to(&self, path: &Path) -> PathBuf {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, self.build()).expect("write SEG-Y file");
        path.to_path_buf()
    }

    /// Write to `dir/name`.
    pub fn write_in(&self, dir: &Path, name: &str) -> PathBuf {
        self.write_to(&dir.join(name))
    }
}

/// Builds a LAS 2.0 text file.
///
/// ```
/// use test_utils::LasFileBuilder;
///
/// let text = LasFileBuilder::new()
///     .well("WELL", "", "TEST-1", "WELL")
///     .curve("DEPT", "M", "Depth")
///     .curve("GR", "GAPI", "Gamma ray")
///     .row(&[100.0, 45.2])
///     .row(&[100.5, 47.9])
///     .build();
/// assert!(text.contains("~A"));
/// ```
#[derive(Debug, Clone)]
pub struct LasFileBuilder {
    version: String,
    wrap: bool,
    null: f64,
    well: Vec<(String, String, String, String)>,
    curves: Vec<(String, String, String)>,
    params: Vec<(String, String, String, String)>,
    other: Option<String>,
    rows: Vec<Vec<f64>>,
}

impl Default for LasFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LasFileBuilder {
    pub fn new() -> Self {
        Self {
            version: "2.0".to_string(),
            wrap: false,
            null: -999.25,
            well: Vec::new(),
            curves: Vec::new(),
            params: Vec::new(),
            other: None,
            rows: Vec::new(),
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn null_value(mut self, null: f64) -> Self {
        self.null = null;
        self
    }

    pub fn well(mut self, mnemonic: &str, unit: &str, value: &str, description: &str) -> Self {
        self.well.push((
            mnemonic.to_string(),
            unit.to_string(),
            value.to_string(),
            description.to_string(),
        ));
        self
    }

    pub fn curve(mut self, mnemonic: &str, unit: &str, description: &str) -> Self {
        self.curves
            .push((mnemonic.to_string(), unit.to_string(), description.to_string()));
        self
    }

    pub fn param(mut self, mnemonic: &str, unit: &str, value: &str, description: &str) -> Self {
        self.params.push((
            mnemonic.to_string(),
            unit.to_string(),
            value.to_string(),
            description.to_string(),
        ));
        self
    }

    pub fn other(mut self, text: &str) -> Self {
        self.other = Some(text.to_string());
        self
    }

    pub fn row(mut self, values: &[f64]) -> Self {
        self.rows.push(values.to_vec());
        self
    }

    /// Depth rows `start, start + step, ...` with one extra column each.
    pub fn depth_rows(mut self, start: f64, step: f64, count: usize) -> Self {
        for i in 0..count {
            let depth = start + step * i as f64;
            self.rows.push(vec![depth, 50.0 + i as f64]);
        }
        self
    }

    fn has_well(&self, mnemonic: &str) -> bool {
        self.well.iter().any(|(m, ..)| m == mnemonic)
    }

    pub fn build(&self) -> String {
        let mut out = String::new();
        out.push_str("~VERSION INFORMATION\n");
        out.push_str(&format!(
            " VERS.                 {} : CWLS LOG ASCII STANDARD\n",
            self.version
        ));
        out.push_str(&format!(
            " WRAP.                 {} : ONE LINE PER DEPTH STEP\n",
            if self.wrap { "YES" } else { "NO" }
        ));

        out.push_str("~WELL INFORMATION\n");
        out.push_str("#MNEM.UNIT    DATA            : DESCRIPTION\n");
        let first = self.rows.first().and_then(|r| r.first()).copied();
        let last = self.rows.last().and_then(|r| r.first()).copied();
        if let (Some(start), false) = (first, self.has_well("STRT")) {
            out.push_str(&format!(" STRT.M        {}  : START DEPTH\n", start));
        }
        if let (Some(stop), false) = (last, self.has_well("STOP")) {
            out.push_str(&format!(" STOP.M        {}  : STOP DEPTH\n", stop));
        }
        if !self.has_well("NULL") {
            out.push_str(&format!(" NULL.         {}  : NULL VALUE\n", self.null));
        }
        for (m, u, v, d) in &self.well {
            out.push_str(&format!(" {}.{}    {}  : {}\n", m, u, v, d));
        }

        out.push_str("~CURVE INFORMATION\n");
        for (m, u, d) in &self.curves {
            out.push_str(&format!(" {}.{}      : {}\n", m, u, d));
        }

        if !self.params.is_empty() {
            out.push_str("~PARAMETER INFORMATION\n");
            for (m, u, v, d) in &self.params {
                out.push_str(&format!(" {}.{}    {}  : {}\n", m, u, v, d));
            }
        }

        if let Some(other) = &self.other {
            out.push_str("~OTHER\n");
            out.push_str(other);
            out.push('\n');
        }

        out.push_str("~A\n");
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(|v| format!("{:.4}", v)).collect();
            out.push_str(&line.join("  "));
            out.push('\n');
        }
        out
    }

    /// Write to `dir/name`.
    pub fn write_in(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).expect("write LAS file");
        path
    }
}
