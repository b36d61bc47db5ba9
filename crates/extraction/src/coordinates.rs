//! Source coordinate sampling and conversion to WGS84.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use projection::{SourceReference, Transformer, BWI_GRID_SRID};
use segy_parser::fields::{SOURCE_X, SOURCE_Y};
use segy_parser::{sample_coordinates, FormatToken, HeaderFieldSpec, SamplingOptions};
use seismic_common::ErrorRecord;

use crate::config::{ExtractionLimits, DEFAULT_SAMPLE_INTERVAL};
use crate::error::{ExtractionError, Result};
use crate::paths::validate_segy_path;

/// PROJ string used when the caller gives none.
pub const DEFAULT_PROJ4: &str =
    "+proj=tmerc +lat_0=0 +lon_0=-62 +k=0.9995000000000001 +x_0=400000 +y_0=0 +ellps=GRS80 +units=m +no_defs";

const DEFAULT_SOURCE_X_BYTE: u32 = 73;
const DEFAULT_SOURCE_Y_BYTE: u32 = 77;

fn default_interval() -> u64 {
    DEFAULT_SAMPLE_INTERVAL
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversionOptions {
    /// Used when `proj4` is absent. With neither given the BWI grid
    /// defaults apply.
    #[serde(default)]
    pub srid: Option<u32>,
    #[serde(default)]
    pub proj4: Option<String>,
    /// 1-based Source_X position; must come with `byte_header_y`.
    #[serde(default)]
    pub byte_header_x: Option<u32>,
    #[serde(default)]
    pub byte_header_y: Option<u32>,
    #[serde(default = "default_interval")]
    pub sample_interval: u64,
    #[serde(default)]
    pub srcx_format: Option<String>,
    #[serde(default)]
    pub srcy_format: Option<String>,
    /// Apply the coordinate scalar at byte 71.
    #[serde(default)]
    pub apply_scalar: bool,
    #[serde(default)]
    pub max_samples: Option<usize>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            srid: None,
            proj4: None,
            byte_header_x: None,
            byte_header_y: None,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            srcx_format: None,
            srcy_format: None,
            apply_scalar: false,
            max_samples: None,
        }
    }
}

impl ConversionOptions {
    fn coordinate_spec(name: &str, byte: Option<u32>, format: Option<&str>) -> Result<HeaderFieldSpec> {
        let default_byte = match name {
            SOURCE_X => DEFAULT_SOURCE_X_BYTE,
            _ => DEFAULT_SOURCE_Y_BYTE,
        };
        let byte = byte.unwrap_or(default_byte);
        let token = match format {
            None => FormatToken::Int32,
            Some(raw) => FormatToken::parse(raw)
                .ok_or_else(|| ExtractionError::Input(format!("Invalid coordinate format '{}' for {}", raw, name)))?,
        };
        let width = token.width();
        let encoding = token
            .family()
            .encoding_for(width)
            .map_err(|e| ExtractionError::Input(e.to_string()))?;
        HeaderFieldSpec::new(name, byte, encoding, width).map_err(|e| ExtractionError::Input(e.to_string()))
    }

    /// Check the request shape and build sampling options.
    pub fn sampling_options(&self) -> Result<SamplingOptions> {
        match (self.byte_header_x, self.byte_header_y) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(ExtractionError::Input(
                    "Both byte_header_x and byte_header_y must be provided together".to_string(),
                ))
            }
            (Some(0), _) | (_, Some(0)) => {
                return Err(ExtractionError::Input(
                    "byte_header_x and byte_header_y must be positive integers".to_string(),
                ))
            }
            _ => {}
        }
        if self.sample_interval < 1 {
            return Err(ExtractionError::Input(
                "sample_interval must be a positive integer".to_string(),
            ));
        }

        let x = Self::coordinate_spec(SOURCE_X, self.byte_header_x, self.srcx_format.as_deref())?;
        let y = Self::coordinate_spec(SOURCE_Y, self.byte_header_y, self.srcy_format.as_deref())?;
        let mut options = SamplingOptions::new(x, y, self.sample_interval);
        if self.apply_scalar {
            options = options.with_scalar();
        }
        if let Some(max) = self.max_samples {
            options = options.with_max_samples(max);
        }
        Ok(options)
    }

    /// The SRID and PROJ string in effect after defaults.
    pub fn reference_inputs(&self) -> (Option<u32>, Option<&str>) {
        match (self.srid, self.proj4.as_deref()) {
            (None, None) => (Some(BWI_GRID_SRID), Some(DEFAULT_PROJ4)),
            (srid, proj4) => (srid, proj4),
        }
    }

    pub fn transformer(&self) -> Result<Transformer> {
        let (srid, proj4) = self.reference_inputs();
        let reference = SourceReference::select(srid, proj4)?;
        debug!(reference = %reference, "Selected source reference");
        Ok(Transformer::from_reference(&reference)?)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversionRequest {
    pub file_path: String,
    #[serde(flatten)]
    pub options: ConversionOptions,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MultiConversionRequest {
    #[serde(default)]
    pub segy_files: Vec<String>,
    #[serde(flatten)]
    pub options: ConversionOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub filename: String,
    pub original_coordinates: Vec<[f64; 2]>,
    pub converted_coordinates: Vec<[f64; 2]>,
    pub count: usize,
    pub byte_header_x: u32,
    pub byte_header_y: u32,
    pub sample_interval: u64,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn convert_with(
    path: &Path,
    options: &ConversionOptions,
    sampling: &SamplingOptions,
    transformer: &Transformer,
    limits: &ExtractionLimits,
) -> Result<ConversionResult> {
    validate_segy_path(path)?;
    limits.check_file_size(path)?;

    let samples = sample_coordinates(path, sampling)?;
    if samples.is_empty() {
        return Err(ExtractionError::NoCoordinates);
    }
    let original: Vec<(f64, f64)> = samples.iter().map(|s| (s.x, s.y)).collect();
    let converted = transformer.to_wgs84(&original);

    debug!(file = %path.display(), count = original.len(), "Converted source coordinates");
    Ok(ConversionResult {
        filename: file_name(path),
        count: original.len(),
        original_coordinates: original.into_iter().map(|(x, y)| [x, y]).collect(),
        converted_coordinates: converted.into_iter().map(|(lon, lat)| [lon, lat]).collect(),
        byte_header_x: sampling.x.byte_position(),
        byte_header_y: sampling.y.byte_position(),
        sample_interval: options.sample_interval,
    })
}

pub fn convert_file(request: &ConversionRequest, limits: &ExtractionLimits) -> Result<ConversionResult> {
    if request.file_path.is_empty() {
        return Err(ExtractionError::Input("file_path is required".to_string()));
    }
    let sampling = request.options.sampling_options()?;
    let transformer = request.options.transformer()?;
    convert_with(
        Path::new(&request.file_path),
        &request.options,
        &sampling,
        &transformer,
        limits,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConversionEntry {
    Converted(ConversionResult),
    Failed { error: ErrorRecord },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub total_files: usize,
    pub successful_conversions: usize,
    pub failed_conversions: usize,
    pub total_coordinates: usize,
    pub srid: Option<u32>,
    pub proj4_string: Option<String>,
    pub byte_header_x: Option<u32>,
    pub byte_header_y: Option<u32>,
    pub sample_interval: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionBatch {
    pub status: &'static str,
    /// Keyed by file name; a later file with the same name replaces an
    /// earlier one.
    pub results: BTreeMap<String, ConversionEntry>,
    pub summary: ConversionSummary,
}

pub fn convert_files(request: &MultiConversionRequest, limits: &ExtractionLimits) -> Result<ConversionBatch> {
    if request.segy_files.is_empty() {
        return Err(ExtractionError::Input(
            "segy_files array is required and cannot be empty".to_string(),
        ));
    }
    let options = &request.options;
    let sampling = options.sampling_options()?;
    let transformer = options.transformer()?;

    let converted: Vec<(String, ConversionEntry)> = request
        .segy_files
        .par_iter()
        .map(|file| {
            let path = Path::new(file);
            let entry = match convert_with(path, options, &sampling, &transformer, limits) {
                Ok(result) => ConversionEntry::Converted(result),
                Err(e) => ConversionEntry::Failed { error: e.to_record() },
            };
            (file_name(path), entry)
        })
        .collect();

    let successful: Vec<&ConversionResult> = converted
        .iter()
        .filter_map(|(_, e)| match e {
            ConversionEntry::Converted(r) => Some(r),
            ConversionEntry::Failed { .. } => None,
        })
        .collect();
    let successful_conversions = successful.len();
    let total_coordinates = successful.iter().map(|r| r.count).sum();
    let total_files = request.segy_files.len();

    info!(
        files = total_files,
        converted = successful_conversions,
        coordinates = total_coordinates,
        "Coordinate conversion complete"
    );

    Ok(ConversionBatch {
        status: "success",
        summary: ConversionSummary {
            total_files,
            successful_conversions,
            failed_conversions: total_files - successful_conversions,
            total_coordinates,
            srid: options.reference_inputs().0,
            proj4_string: options.reference_inputs().1.map(str::to_string),
            byte_header_x: options.byte_header_x,
            byte_header_y: options.byte_header_y,
            sample_interval: options.sample_interval,
        },
        results: converted.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use segy_parser::Encoding;
    use serde_json::json;

    #[test]
    fn test_request_defaults() {
        let req: ConversionRequest = serde_json::from_value(json!({"file_path": "a.sgy"})).unwrap();
        assert_eq!(req.options, ConversionOptions::default());
        let sampling = req.options.sampling_options().unwrap();
        assert_eq!(sampling.x.byte_position(), 73);
        assert_eq!(sampling.y.byte_position(), 77);
        assert_eq!(sampling.stride, 10);
        assert!(sampling.scalar.is_none());
    }

    #[test]
    fn test_byte_headers_together() {
        let only_x = ConversionOptions {
            byte_header_x: Some(181),
            ..Default::default()
        };
        let err = only_x.sampling_options().unwrap_err();
        assert!(err.to_string().contains("provided together"));

        let both = ConversionOptions {
            byte_header_x: Some(181),
            byte_header_y: Some(185),
            srcx_format: Some("IEEE".to_string()),
            ..Default::default()
        };
        let sampling = both.sampling_options().unwrap();
        assert_eq!(sampling.x.byte_offset, 180);
        assert_eq!(sampling.x.encoding, Encoding::IeeeFloat32);
        assert_eq!(sampling.y.encoding, Encoding::Int32);
    }

    #[test]
    fn test_interval_and_format_validation() {
        let zero = ConversionOptions {
            sample_interval: 0,
            ..Default::default()
        };
        assert!(zero.sampling_options().is_err());
        let bad = ConversionOptions {
            srcy_format: Some("float80".to_string()),
            ..Default::default()
        };
        assert_eq!(bad.sampling_options().unwrap_err().kind(), seismic_common::ErrorKind::InputError);
    }

    #[test]
    fn test_transformer_reference_selection() {
        assert_eq!(
            ConversionOptions::default().reference_inputs(),
            (Some(2000), Some(DEFAULT_PROJ4))
        );
        let both = ConversionOptions {
            srid: Some(9999),
            proj4: Some(DEFAULT_PROJ4.to_string()),
            ..Default::default()
        };
        assert!(both.transformer().is_ok());
        let srid_only = ConversionOptions {
            srid: Some(9999),
            ..Default::default()
        };
        assert!(srid_only.transformer().is_err());
        let utm = ConversionOptions {
            srid: Some(32620),
            ..Default::default()
        };
        assert!(utm.transformer().is_ok());
    }
}
