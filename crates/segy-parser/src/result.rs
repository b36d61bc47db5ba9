//! The extraction record returned for one file.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

use seismic_common::{ErrorRecord, FieldValue};

/// Header values keyed `First_<name>` / `Last_<name>`; `None` marks a
/// field that could not be decoded.
pub type HeaderValues = BTreeMap<String, Option<FieldValue>>;

/// Outcome of extracting one file. Both variants serialize to a plain
/// JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractionResult {
    Extracted(Box<ExtractionRecord>),
    Failed(FailedExtraction),
}

impl ExtractionResult {
    pub fn failed(path: &Path, error: ErrorRecord) -> Self {
        ExtractionResult::Failed(FailedExtraction {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            error,
            header_values: HeaderValues::new(),
        })
    }

    pub fn error(&self) -> &ErrorRecord {
        match self {
            ExtractionResult::Extracted(record) => &record.error,
            ExtractionResult::Failed(failed) => &failed.error,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExtractionResult::Failed(_))
    }

    pub fn record(&self) -> Option<&ExtractionRecord> {
        match self {
            ExtractionResult::Extracted(record) => Some(record),
            ExtractionResult::Failed(_) => None,
        }
    }
}

/// A file that could not be extracted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedExtraction {
    pub file_name: String,
    pub error: ErrorRecord,
    pub header_values: HeaderValues,
}

/// Source coordinates read at the first and last trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SourceCoordinates {
    #[serde(rename = "First_Source_X")]
    pub first_x: Option<FieldValue>,
    #[serde(rename = "First_Source_Y")]
    pub first_y: Option<FieldValue>,
    #[serde(rename = "Last_Source_X")]
    pub last_x: Option<FieldValue>,
    #[serde(rename = "Last_Source_Y")]
    pub last_y: Option<FieldValue>,
}

/// Raw values for caller-mapped fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomExtractedFields {
    pub first_trace: BTreeMap<String, Option<FieldValue>>,
    pub last_trace: BTreeMap<String, Option<FieldValue>>,
    pub byte_positions: BTreeMap<String, u32>,
}

/// Which field mapping produced the header values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMappingsUsed {
    Standard,
    Custom(BTreeMap<String, u32>),
}

impl Serialize for FieldMappingsUsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldMappingsUsed::Standard => serializer.serialize_str("standard"),
            FieldMappingsUsed::Custom(map) => map.serialize(serializer),
        }
    }
}

/// Minimum and maximum of one field over a full scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub fn new(value: f64) -> Self {
        Self { min: value, max: value }
    }

    pub fn include(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// A successfully extracted file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRecord {
    pub folder_name: String,
    pub composite_file_name: String,
    pub file_name: String,
    pub seismic_name: String,
    #[serde(rename = "extensionType")]
    pub extension_type: String,
    pub first_field_file: String,
    pub last_field_file: String,
    pub first_trc: String,
    pub last_trc: String,
    pub ntraces: u64,
    pub sample_type: String,
    pub sample_rate: f64,
    pub sample_rate_uom: String,
    pub record_length: f64,
    pub record_length_uom: String,
    pub file_windows_path: String,
    pub file_unix_path: String,
    pub file_size_bytes: u64,
    pub unique_id: String,
    pub header_values: HeaderValues,
    pub source_coordinates: SourceCoordinates,
    pub first5_samples: Vec<f64>,
    pub error: ErrorRecord,
    pub field_mappings_used: FieldMappingsUsed,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_extracted_fields: Option<CustomExtractedFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_ranges: Option<BTreeMap<String, FieldRange>>,
}

impl ExtractionRecord {
    pub fn first(&self, name: &str) -> Option<FieldValue> {
        self.header_values.get(&format!("First_{}", name)).copied().flatten()
    }

    pub fn last(&self, name: &str) -> Option<FieldValue> {
        self.header_values.get(&format!("Last_{}", name)).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_shape() {
        let result = ExtractionResult::failed(
            Path::new("/data/a/broken.sgy"),
            ErrorRecord::processing("File too small"),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "file_name": "broken.sgy",
                "error": {"type": "processing_error", "message": "File too small"},
                "header_values": {}
            })
        );
        assert!(result.is_failed());
        assert!(result.record().is_none());
    }

    #[test]
    fn test_field_mappings_used_serialization() {
        let standard = serde_json::to_value(FieldMappingsUsed::Standard).unwrap();
        assert_eq!(standard, "standard");

        let mut map = BTreeMap::new();
        map.insert("CDP".to_string(), 25);
        let custom = serde_json::to_value(FieldMappingsUsed::Custom(map)).unwrap();
        assert_eq!(custom, serde_json::json!({"CDP": 25}));
    }

    #[test]
    fn test_field_range() {
        let mut range = FieldRange::new(5.0);
        range.include(-2.0);
        range.include(9.5);
        assert_eq!(range, FieldRange { min: -2.0, max: 9.5 });
    }
}
