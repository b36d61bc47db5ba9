//! Normalised well metadata, quick summaries and the well-log report.

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::LasResult;
use crate::parser::{HeaderItem, LasFile};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const UNKNOWN: &str = "UNKNOWN";

/// Filesystem facts recorded alongside LAS metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FileStat {
    pub path: String,
    pub size: u64,
    pub created: DateTime<Local>,
    pub modified: DateTime<Local>,
}

impl FileStat {
    pub fn from_path(path: &Path) -> LasResult<Self> {
        let meta = std::fs::metadata(path)?;
        let modified = meta.modified()?;
        let created = meta.created().unwrap_or(modified);
        Ok(Self {
            path: path.display().to_string(),
            size: meta.len(),
            created: DateTime::<Local>::from(created),
            modified: DateTime::<Local>::from(modified),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveInfo {
    pub count: usize,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionCounts {
    pub well_count: usize,
    pub curve_count: usize,
    pub param_count: usize,
    pub data_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LasMetadata {
    pub data_source: String,
    pub region: String,
    pub country: String,
    pub state: String,
    pub asset: String,
    pub field_name: String,
    pub uwi: String,
    pub well_name: String,
    pub operator: String,
    pub surface_latitude: String,
    pub surface_longitude: String,
    pub created: String,
    pub loaded: String,
    pub approved: String,
    pub last_updated: String,
    pub file_path: String,
    pub file_size: u64,
    pub curves: CurveInfo,
    pub parameters: BTreeMap<String, Value>,
    pub version: String,
    pub sections: SectionCounts,
}

/// First non-blank well value among `keys`, compared case-insensitively.
pub fn well_field(las: &LasFile, keys: &[&str], default: &str) -> String {
    keys.iter()
        .filter_map(|key| las.well_item(key))
        .map(|item| item.value.trim())
        .find(|value| !value.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Coordinate well value, reformatted to six decimals when numeric.
fn coordinate_field(las: &LasFile, keys: &[&str]) -> String {
    let raw = well_field(las, keys, "");
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => format!("{:.6}", value),
        _ => raw,
    }
}

fn item_value(item: &HeaderItem) -> Value {
    item.value
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(item.value.clone()))
}

fn version_string(las: &LasFile) -> String {
    las.version_number()
        .filter(|v| !v.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

pub fn extract_metadata(las: &LasFile, stat: &FileStat) -> LasMetadata {
    let modified = stat.modified.format(TIMESTAMP_FORMAT).to_string();
    LasMetadata {
        data_source: well_field(las, &["COMP", "COMPANY", "DATA_SOURCE"], UNKNOWN),
        region: well_field(las, &["REGION", "PROV", "PROVINCE"], ""),
        country: well_field(las, &["CTRY", "COUNTRY"], UNKNOWN),
        state: well_field(las, &["STAT", "STATE"], UNKNOWN),
        asset: well_field(las, &["ASSET", "FIELD"], ""),
        field_name: well_field(las, &["FLD", "FIELD", "FIELD_NAME"], UNKNOWN),
        uwi: well_field(las, &["UWI", "WELL"], ""),
        well_name: well_field(las, &["WELL", "WELL_NAME"], ""),
        operator: well_field(las, &["COMP", "COMPANY", "OPERATOR"], UNKNOWN),
        surface_latitude: coordinate_field(las, &["LAT", "LATI", "LATITUDE", "SLAT"]),
        surface_longitude: coordinate_field(las, &["LON", "LONG", "LONGITUDE", "SLON"]),
        created: stat.created.format(TIMESTAMP_FORMAT).to_string(),
        loaded: modified.clone(),
        approved: String::new(),
        last_updated: modified,
        file_path: stat.path.clone(),
        file_size: stat.size,
        curves: CurveInfo {
            count: las.curves.len(),
            names: las.curve_names(),
        },
        parameters: las
            .params
            .iter()
            .map(|p| (p.mnemonic.clone(), item_value(p)))
            .collect(),
        version: version_string(las),
        sections: SectionCounts {
            well_count: las.well.len(),
            curve_count: las.curves.len(),
            param_count: las.params.len(),
            data_rows: las.data.len(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LasSummary {
    pub file_path: String,
    pub file_size: u64,
    pub well_name: String,
    pub curve_count: usize,
    pub data_points: usize,
    pub version: String,
}

pub fn summary(las: &LasFile, stat: &FileStat) -> LasSummary {
    LasSummary {
        file_path: stat.path.clone(),
        file_size: stat.size,
        well_name: well_field(las, &["WELL", "WELL_NAME"], "Unknown"),
        curve_count: las.curves.len(),
        data_points: las.data.len(),
        version: version_string(las),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionEntry {
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyWellInfo {
    pub creation_date: Option<String>,
    pub start_depth: Option<String>,
    pub stop_depth: Option<String>,
    pub company: Option<String>,
    pub well_name: Option<String>,
    pub field: Option<String>,
    pub location: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub uwi: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsciiDataSummary {
    pub row_count: usize,
    pub depth_stepping_consistent: bool,
    pub step_size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellReport {
    pub file_name: String,
    pub well_name: String,
    pub edafy_well_id: String,
    pub version_info: BTreeMap<String, VersionEntry>,
    pub well_info: KeyWellInfo,
    pub ascii_data_summary: AsciiDataSummary,
    pub success: bool,
    #[serde(rename = "extensionType")]
    pub extension_type: String,
    pub file_windows_path: String,
    pub file_unix_path: String,
    pub file_size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WellReportFailure {
    pub file_name: String,
    pub well_name: String,
    pub edafy_well_id: String,
    pub error: String,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WellReportResult {
    Parsed(Box<WellReport>),
    Failed(WellReportFailure),
}

impl WellReportResult {
    pub fn is_success(&self) -> bool {
        matches!(self, WellReportResult::Parsed(_))
    }
}

fn file_name_and_stem(path: &Path) -> (String, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (name, stem)
}

/// Depth-step consistency with steps rounded to five decimals.
pub fn validate_depth_step(depths: &[f64]) -> (bool, Option<f64>) {
    if depths.len() < 2 {
        return (true, None);
    }
    let round5 = |v: f64| (v * 1e5).round() / 1e5;
    let step = round5(depths[1] - depths[0]);
    let consistent = depths.windows(2).all(|w| round5(w[1] - w[0]) == step);
    (consistent, Some(step))
}

pub fn build_well_report(path: &Path, las: &LasFile, size_bytes: u64) -> WellReport {
    let (file_name, well_name) = file_name_and_stem(path);
    let lookup = |key: &str| las.well_item(key).map(|i| i.value.clone());
    let depths = las.depths();
    let (depth_stepping_consistent, step_size) = validate_depth_step(&depths);
    let path_text = path.display().to_string();

    WellReport {
        file_name,
        well_name,
        edafy_well_id: String::new(),
        version_info: las
            .version
            .iter()
            .map(|item| {
                (
                    item.mnemonic.clone(),
                    VersionEntry {
                        value: item.value.clone(),
                        description: item.description.clone(),
                    },
                )
            })
            .collect(),
        well_info: KeyWellInfo {
            creation_date: lookup("DATE"),
            start_depth: lookup("STRT"),
            stop_depth: lookup("STOP"),
            company: lookup("COMP"),
            well_name: lookup("WELL"),
            field: lookup("FLD"),
            location: lookup("LOC"),
            state: lookup("STAT"),
            country: lookup("CTRY"),
            uwi: lookup("UWI"),
            latitude: lookup("LATI"),
            longitude: lookup("LONG"),
        },
        ascii_data_summary: AsciiDataSummary {
            row_count: las.data.len(),
            depth_stepping_consistent,
            step_size,
        },
        success: true,
        extension_type: "LAS".to_string(),
        file_windows_path: path_text.replace('/', "\\"),
        file_unix_path: path_text.replace('\\', "/"),
        file_size_bytes: size_bytes,
    }
}

/// Parse `path` and build its report; failures become a report with
/// `success: false`.
pub fn well_report(path: &Path) -> WellReportResult {
    let failed = |error: String| {
        let (file_name, well_name) = file_name_and_stem(path);
        WellReportResult::Failed(WellReportFailure {
            file_name,
            well_name,
            edafy_well_id: String::new(),
            error,
            success: false,
        })
    };

    if !path.exists() {
        return failed(format!("File not found: {}", path.display()));
    }
    let las = match LasFile::read(path) {
        Ok(las) => las,
        Err(e) => return failed(format!("Failed to read LAS file: {}", e)),
    };
    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    WellReportResult::Parsed(Box::new(build_well_report(path, &las, size)))
}
