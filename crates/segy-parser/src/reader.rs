//! Manual SEG-Y header reader.
//!
//! Reads the first and last trace headers by direct seeks computed from
//! [`FileGeometry`], decodes every resolved field at both positions, and
//! assembles an [`ExtractionResult`]. No full-featured SEG-Y library is
//! involved, so files with inconsistent or non-standard headers still
//! produce as much as can be read.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::decoder::DecodeError;
use crate::error::{SegyError, SegyResult};
use crate::fields::{
    resolve, CoordinateConfig, FieldMappingTable, FormatPolicy, HeaderFieldSpec, ResolvedFields,
    ResolverInput, FFID,
};
use crate::fingerprint::fingerprint;
use crate::geometry::{
    FileGeometry, BINARY_HEADER_LEN, FIRST_TRACE_OFFSET, SAMPLE_COUNT_OFFSET, TEXT_HEADER_LEN,
    TRACE_HEADER_LEN,
};
use crate::headers::BinaryHeader;
use crate::naming::FileNames;
use crate::result::{
    CustomExtractedFields, ExtractionRecord, ExtractionResult, FieldMappingsUsed, FieldRange,
    HeaderValues, SourceCoordinates,
};
use seismic_common::{ErrorRecord, FieldValue};

const PREVIEW_SAMPLES: usize = 5;

/// Which traces participate in the zero-coordinate check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// First and last trace only.
    #[default]
    Endpoints,
    /// Every trace; also reports per-field ranges.
    Full,
}

/// Everything [`extract`] needs besides the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    pub table: FieldMappingTable,
    pub policy: FormatPolicy,
    pub coordinates: CoordinateConfig,
    /// Caller byte positions, when the caller supplied any.
    pub custom_mappings: Option<BTreeMap<String, u32>>,
    pub scan: ScanMode,
}

impl ReaderConfig {
    pub fn from_resolved(resolved: ResolvedFields) -> Self {
        Self {
            table: resolved.table,
            policy: resolved.policy,
            coordinates: resolved.coordinates,
            custom_mappings: None,
            scan: ScanMode::Endpoints,
        }
    }

    /// Built-in fields, default format, endpoint scan.
    pub fn standard() -> SegyResult<Self> {
        Ok(Self::from_resolved(resolve(&ResolverInput::default())?))
    }

    pub fn with_custom_mappings(mut self, mappings: BTreeMap<String, u32>) -> Self {
        if !mappings.is_empty() {
            self.custom_mappings = Some(mappings);
        }
        self
    }

    pub fn with_scan(mut self, scan: ScanMode) -> Self {
        self.scan = scan;
        self
    }

    /// Bytes to read per trace header so every configured field is covered.
    fn header_span(&self) -> usize {
        (TRACE_HEADER_LEN as usize)
            .max(self.table.max_end())
            .max(self.coordinates.max_end())
    }
}

/// Open SEG-Y file with its geometry and binary header.
///
/// The handle is dropped with the reader, so every exit path closes it.
pub struct SegyReader {
    file: File,
    path: PathBuf,
    geometry: FileGeometry,
    binary_header: BinaryHeader,
}

impl SegyReader {
    pub fn open(path: &Path) -> SegyResult<Self> {
        let mut file = File::open(path)?;
        let size = file.metadata()?.len();
        if size < FIRST_TRACE_OFFSET {
            return Err(SegyError::FileTooSmall {
                size,
                required: FIRST_TRACE_OFFSET,
            });
        }

        let mut raw_binary = [0u8; BINARY_HEADER_LEN as usize];
        file.seek(SeekFrom::Start(TEXT_HEADER_LEN))?;
        file.read_exact(&mut raw_binary)?;
        let binary_header = BinaryHeader::parse(&raw_binary);

        // Missing bytes read as zero samples.
        let mut sample_count_raw = [0u8; 2];
        file.seek(SeekFrom::Start(SAMPLE_COUNT_OFFSET))?;
        let got = read_up_to(&mut file, &mut sample_count_raw)?;
        if got < 2 {
            sample_count_raw = [0, 0];
        }

        let geometry = FileGeometry::compute(size, sample_count_raw);
        debug!(
            file = %path.display(),
            size,
            samples = geometry.num_samples_per_trace,
            stride = geometry.trace_stride_bytes,
            traces = geometry.trace_count,
            "Computed trace geometry"
        );

        Ok(Self {
            file,
            path: path.to_path_buf(),
            geometry,
            binary_header,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn geometry(&self) -> &FileGeometry {
        &self.geometry
    }

    pub fn binary_header(&self) -> &BinaryHeader {
        &self.binary_header
    }

    /// Read up to `span` bytes at an absolute offset. A short read keeps the
    /// bytes that exist; the span never exceeds what remains of the file.
    pub fn read_header_at(&mut self, offset: u64, span: usize) -> SegyResult<Vec<u8>> {
        let remaining = self.geometry.file_size_bytes.saturating_sub(offset);
        let span = usize::try_from(remaining).map_or(span, |left| span.min(left));
        self.file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; span];
        let got = read_up_to(&mut self.file, &mut buf)?;
        buf.truncate(got);
        Ok(buf)
    }

    /// Trace header `index`, or `None` when the trace does not exist.
    pub fn read_trace_header(&mut self, index: u64, span: usize) -> SegyResult<Option<Vec<u8>>> {
        match self.geometry.trace_offset(index) {
            Some(offset) => self.read_header_at(offset, span).map(Some),
            None => Ok(None),
        }
    }

    /// Leading samples of trace `index` using the binary-header format.
    pub fn read_samples(&mut self, index: u64, count: usize) -> SegyResult<Vec<f64>> {
        let format = self.binary_header.sample_format;
        let (Some(width), Some(offset)) = (
            format.bytes_per_sample(),
            self.geometry.trace_data_offset(index),
        ) else {
            return Ok(Vec::new());
        };
        let count = count.min(self.geometry.num_samples_per_trace as usize);
        let raw = self.read_header_at(offset, width * count)?;
        Ok(raw
            .chunks_exact(width)
            .filter_map(|chunk| format.decode_sample(chunk))
            .collect())
    }
}

fn read_up_to(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Decode a field, degrading short reads to `None`.
fn decode_field(spec: &HeaderFieldSpec, header: &[u8]) -> SegyResult<Option<FieldValue>> {
    match spec.decode(header) {
        Ok(value) => Ok(Some(value)),
        Err(err @ DecodeError::ShortRead { .. }) => {
            debug!(field = %spec.name, offset = spec.byte_offset, width = spec.width_bytes, error = %err, "Field not decoded");
            Ok(None)
        }
        Err(source) => Err(SegyError::Decode {
            field: spec.name.clone(),
            source,
        }),
    }
}

/// Classify source coordinates read from the scanned traces.
///
/// `None` values do not participate. With nothing non-zero on either axis,
/// both count as all zero.
pub fn classify_zero_coordinates(
    xs: &[Option<FieldValue>],
    ys: &[Option<FieldValue>],
) -> ErrorRecord {
    let x_non_zero = xs.iter().flatten().any(|v| !v.is_zero());
    let y_non_zero = ys.iter().flatten().any(|v| !v.is_zero());

    match (x_non_zero, y_non_zero) {
        (false, false) => ErrorRecord::zero_coordinates("All Source_X and Source_Y are zero"),
        (false, true) => ErrorRecord::zero_coordinates(
            "All Source_X are zero, but Source_Y has non-zero values",
        ),
        (true, false) => ErrorRecord::zero_coordinates(
            "All Source_Y are zero, but Source_X has non-zero values",
        ),
        (true, true) => ErrorRecord::none(),
    }
}

/// Extract one file. Never fails; abort-level errors become a
/// `processing_error` record.
pub fn extract(path: &Path, config: &ReaderConfig) -> ExtractionResult {
    match try_extract(path, config) {
        Ok(record) => ExtractionResult::Extracted(Box::new(record)),
        Err(err) => {
            error!(file = %path.display(), error = %err, "SEG-Y extraction failed");
            ExtractionResult::failed(path, ErrorRecord::processing(err.to_string()))
        }
    }
}

fn try_extract(path: &Path, config: &ReaderConfig) -> SegyResult<ExtractionRecord> {
    let mut reader = SegyReader::open(path)?;
    let geometry = *reader.geometry();
    let span = config.header_span();

    let first = reader.read_header_at(FIRST_TRACE_OFFSET, span)?;
    let last = match geometry.last_trace_offset() {
        Some(offset) => Some(reader.read_header_at(offset, span)?),
        None => None,
    };

    let mut header_values = HeaderValues::new();
    for spec in config.table.iter() {
        let first_value = decode_field(spec, &first)?;
        let last_value = match &last {
            Some(buf) => decode_field(spec, buf)?,
            None => None,
        };
        header_values.insert(format!("First_{}", spec.name), first_value);
        header_values.insert(format!("Last_{}", spec.name), last_value);
    }

    let coords = &config.coordinates;
    let mut source = SourceCoordinates {
        first_x: decode_field(&coords.source_x, &first)?,
        first_y: decode_field(&coords.source_y, &first)?,
        ..Default::default()
    };
    if let Some(buf) = &last {
        source.last_x = decode_field(&coords.source_x, buf)?;
        source.last_y = decode_field(&coords.source_y, buf)?;
    }

    let (error, field_ranges) = match config.scan {
        ScanMode::Endpoints => {
            let xs = [source.first_x, source.last_x];
            let ys = [source.first_y, source.last_y];
            (classify_zero_coordinates(&xs, &ys), None)
        }
        ScanMode::Full => {
            let scan = full_scan(&mut reader, config, span)?;
            (
                classify_zero_coordinates(&scan.xs, &scan.ys),
                Some(scan.ranges),
            )
        }
    };

    let custom_extracted_fields = config.custom_mappings.as_ref().map(|mappings| {
        let mut custom = CustomExtractedFields {
            byte_positions: mappings.clone(),
            ..Default::default()
        };
        for name in mappings.keys().filter(|n| config.table.contains(n)) {
            custom.first_trace.insert(
                name.clone(),
                header_values.get(&format!("First_{}", name)).copied().flatten(),
            );
            custom.last_trace.insert(
                name.clone(),
                header_values.get(&format!("Last_{}", name)).copied().flatten(),
            );
        }
        custom
    });

    let first5_samples = if geometry.trace_count > 0 {
        reader.read_samples(0, PREVIEW_SAMPLES)?
    } else {
        Vec::new()
    };
    let binary = reader.binary_header().clone();
    // Close the handle before hashing reopens the file.
    drop(reader);

    let fp = fingerprint(path)?;
    let names = FileNames::from_path(path);
    let sample_rate = binary.sample_rate();
    let field_file = |key: &str| {
        header_values
            .get(key)
            .copied()
            .flatten()
            .map(|v| v.to_string())
            .unwrap_or_default()
    };
    let first_field_file = field_file(&format!("First_{}", FFID));
    let last_field_file = field_file(&format!("Last_{}", FFID));

    info!(
        file = %path.display(),
        traces = geometry.trace_count,
        fields = config.table.len(),
        "Extracted SEG-Y headers"
    );

    Ok(ExtractionRecord {
        folder_name: names.folder_name,
        composite_file_name: names.composite_file_name,
        file_name: names.file_name,
        seismic_name: names.seismic_name,
        extension_type: "SEGY".to_string(),
        first_field_file,
        last_field_file,
        first_trc: "1".to_string(),
        last_trc: geometry.trace_count.to_string(),
        ntraces: geometry.trace_count,
        sample_type: binary.sample_format.description(),
        sample_rate,
        sample_rate_uom: "seconds".to_string(),
        record_length: geometry.num_samples_per_trace as f64 * sample_rate,
        record_length_uom: "seconds".to_string(),
        file_windows_path: names.file_windows_path,
        file_unix_path: names.file_unix_path,
        file_size_bytes: fp.size_bytes,
        unique_id: fp.content_hash,
        header_values,
        source_coordinates: source,
        first5_samples,
        error,
        field_mappings_used: match &config.custom_mappings {
            Some(map) => FieldMappingsUsed::Custom(map.clone()),
            None => FieldMappingsUsed::Standard,
        },
        custom_extracted_fields,
        field_ranges,
    })
}

struct FullScan {
    xs: Vec<Option<FieldValue>>,
    ys: Vec<Option<FieldValue>>,
    ranges: BTreeMap<String, FieldRange>,
}

fn full_scan(reader: &mut SegyReader, config: &ReaderConfig, span: usize) -> SegyResult<FullScan> {
    let count = reader.geometry().trace_count;
    let mut scan = FullScan {
        xs: Vec::with_capacity(count as usize),
        ys: Vec::with_capacity(count as usize),
        ranges: BTreeMap::new(),
    };

    for index in 0..count {
        let Some(header) = reader.read_trace_header(index, span)? else {
            break;
        };
        scan.xs.push(decode_field(&config.coordinates.source_x, &header)?);
        scan.ys.push(decode_field(&config.coordinates.source_y, &header)?);

        for spec in config.table.iter() {
            if let Some(value) = decode_field(spec, &header)? {
                let v = value.as_f64();
                scan.ranges
                    .entry(spec.name.clone())
                    .and_modify(|r| r.include(v))
                    .or_insert_with(|| FieldRange::new(v));
            }
        }
    }

    debug!(file = %reader.path().display(), traces = count, "Full trace scan complete");
    Ok(scan)
}
