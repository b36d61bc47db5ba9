//! Caller request shapes and their validation.

use serde::Deserialize;
use std::collections::BTreeMap;

use segy_parser::{
    resolve, CoordinateOverrides, FieldNameMode, HeaderFieldSpec, ReaderConfig, ResolverInput, ScanMode,
};
use tracing::{debug, warn};

use crate::error::{ExtractionError, Result};

/// `format` as either a bare token or `{"Format": token}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FormatSpec {
    Token(String),
    Object {
        #[serde(rename = "Format")]
        format: String,
    },
}

impl FormatSpec {
    pub fn token(&self) -> &str {
        match self {
            FormatSpec::Token(t) => t,
            FormatSpec::Object { format } => format,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CoordinateRequest {
    pub srcx_value: Option<u32>,
    pub srcy_value: Option<u32>,
    pub srcx_format: Option<String>,
    pub srcy_format: Option<String>,
}

fn default_strict() -> bool {
    true
}

/// Field extraction settings shared by every SEG-Y extraction entry point.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractionRequest {
    #[serde(default)]
    pub header_bytes: BTreeMap<String, u32>,
    #[serde(default)]
    pub format: Option<FormatSpec>,
    #[serde(default)]
    pub gaps: BTreeMap<String, usize>,
    #[serde(default)]
    pub coordinate_config: Option<CoordinateRequest>,
    #[serde(default = "default_strict")]
    pub strict_field_names: bool,
    #[serde(default)]
    pub scan: ScanMode,
    /// Named byte positions reported back under `custom_extracted_fields`.
    #[serde(default)]
    pub field_mappings: Option<BTreeMap<String, i64>>,
}

impl Default for ExtractionRequest {
    fn default() -> Self {
        Self {
            header_bytes: BTreeMap::new(),
            format: None,
            gaps: BTreeMap::new(),
            coordinate_config: None,
            strict_field_names: true,
            scan: ScanMode::default(),
            field_mappings: None,
        }
    }
}

impl ExtractionRequest {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ExtractionError::Input(format!("Invalid request: {}", e)))
    }

    /// Field mappings with every position checked to be a 1-based byte.
    pub fn validated_field_mappings(&self) -> Result<BTreeMap<String, u32>> {
        let Some(mappings) = &self.field_mappings else {
            return Ok(BTreeMap::new());
        };
        mappings
            .iter()
            .map(|(name, &pos)| match u32::try_from(pos) {
                Ok(p) if p >= 1 => Ok((name.clone(), p)),
                _ => Err(ExtractionError::Input(format!(
                    "Invalid byte position for {}: must be a positive integer",
                    name
                ))),
            })
            .collect()
    }

    pub fn resolver_input(&self) -> ResolverInput {
        let coords = self.coordinate_config.clone().unwrap_or_default();
        ResolverInput {
            header_bytes: self.header_bytes.clone(),
            format: self.format.as_ref().map(|f| f.token().to_string()),
            gaps: self.gaps.clone(),
            coordinates: CoordinateOverrides {
                srcx_value: coords.srcx_value,
                srcy_value: coords.srcy_value,
                srcx_format: coords.srcx_format,
                srcy_format: coords.srcy_format,
            },
            mode: if self.strict_field_names {
                FieldNameMode::Strict
            } else {
                FieldNameMode::Lenient
            },
        }
    }

    /// Resolve into a reader configuration. Non-positive `field_mappings`
    /// are `input_error`; width and encoding conflicts are
    /// `processing_error`.
    pub fn reader_config(&self) -> Result<ReaderConfig> {
        let mappings = self.validated_field_mappings()?;
        let resolved = resolve(&self.resolver_input())?;
        for note in &resolved.diagnostics {
            debug!(note = %note, "Field resolution");
        }

        let mut config = ReaderConfig::from_resolved(resolved).with_scan(self.scan);

        // Explicit mappings are decoded under the request's default width
        // even when their names are not built in.
        for (name, &pos) in &mappings {
            if let Some(existing) = config.table.get(name) {
                if existing.byte_position() == pos {
                    continue;
                }
            }
            let width = config.policy.default_width;
            let encoding = config.policy.family.encoding_for(width)?;
            let spec = HeaderFieldSpec::new(name.clone(), pos, encoding, width)?;
            if config.table.contains(name) {
                warn!(field = %name, byte = pos, "Field mapping overrides header byte position");
            }
            config.policy.fields.insert(name.clone(), (encoding, width));
            config.table.insert(spec);
        }

        Ok(config.with_custom_mappings(mappings))
    }
}

/// One batch entry: `{"index": ..., "filePath": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatchFile {
    #[serde(default)]
    pub index: Option<serde_json::Value>,
    #[serde(rename = "filePath", default)]
    pub file_path: Option<String>,
}

impl BatchFile {
    /// Result key: the index stringified, `"unknown"` when absent.
    pub fn key(&self) -> String {
        match &self.index {
            None | Some(serde_json::Value::Null) => "unknown".to_string(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub files: Option<Vec<BatchFile>>,
    #[serde(flatten)]
    pub request: ExtractionRequest,
}

impl BatchRequest {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ExtractionError::Input("Input must contain 'files' array".to_string()));
        }
        serde_json::from_value(value).map_err(|e| ExtractionError::Input(format!("Invalid request: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segy_parser::{Encoding, FormatFamily};
    use serde_json::json;

    #[test]
    fn test_format_forms() {
        let a: ExtractionRequest = serde_json::from_value(json!({"format": "ibm"})).unwrap();
        let b: ExtractionRequest = serde_json::from_value(json!({"format": {"Format": "ibm"}})).unwrap();
        assert_eq!(a.format.as_ref().map(FormatSpec::token), Some("ibm"));
        assert_eq!(a.resolver_input(), b.resolver_input());
    }

    #[test]
    fn test_defaults() {
        let req: ExtractionRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.strict_field_names);
        assert_eq!(req.scan, ScanMode::Endpoints);
        let config = req.reader_config().unwrap();
        assert!(config.custom_mappings.is_none());
        assert_eq!(config.table.len(), segy_parser::DEFAULT_HEADER_BYTES.len());
    }

    #[test]
    fn test_field_mappings_validation() {
        let req: ExtractionRequest = serde_json::from_value(json!({"field_mappings": {"Il": 0}})).unwrap();
        let err = req.reader_config().unwrap_err();
        assert_eq!(err.kind(), seismic_common::ErrorKind::InputError);
        assert!(err.to_string().contains("Invalid byte position for Il"));
    }

    #[test]
    fn test_field_mappings_join_the_table() {
        let req: ExtractionRequest =
            serde_json::from_value(json!({"format": "int16", "field_mappings": {"Il": 189, "FFID": 9}})).unwrap();
        let config = req.reader_config().unwrap();
        let il = config.table.get("Il").unwrap();
        assert_eq!(il.byte_offset, 188);
        assert_eq!(il.encoding, Encoding::Int16);
        assert_eq!(config.policy.family, FormatFamily::Int32);
        assert_eq!(config.policy.default_width, 2);
        assert_eq!(config.custom_mappings.as_ref().map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_invalid_gap_is_processing_error() {
        let req: ExtractionRequest = serde_json::from_value(json!({"gaps": {"FFID": 3}})).unwrap();
        assert_eq!(req.reader_config().unwrap_err().kind(), seismic_common::ErrorKind::ProcessingError);

        let req: ExtractionRequest = serde_json::from_value(json!({"format": "ibm", "gaps": {"FFID": 2}})).unwrap();
        let err = req.reader_config().unwrap_err();
        assert_eq!(err.kind(), seismic_common::ErrorKind::ProcessingError);
        assert!(err.to_string().contains("requires 4 bytes, but gap is 2"), "{}", err);
    }

    #[test]
    fn test_non_positive_mapping_is_input_error() {
        let req: ExtractionRequest = serde_json::from_value(json!({"field_mappings": {"CDP": -1}})).unwrap();
        assert_eq!(req.reader_config().unwrap_err().kind(), seismic_common::ErrorKind::InputError);
    }

    #[test]
    fn test_batch_keys() {
        let req = BatchRequest::from_value(json!({
            "files": [{"index": 3, "filePath": "a.sgy"}, {"index": "x"}, {}],
            "format": "ieee"
        }))
        .unwrap();
        let files = req.files.unwrap();
        let keys: Vec<String> = files.iter().map(BatchFile::key).collect();
        assert_eq!(keys, vec!["3", "x", "unknown"]);
        assert_eq!(files[1].file_path, None);
        assert_eq!(req.request.format, Some(FormatSpec::Token("ieee".to_string())));
    }

    #[test]
    fn test_batch_non_object() {
        assert!(BatchRequest::from_value(json!([1, 2])).is_err());
        let missing = BatchRequest::from_value(json!({"format": "ibm"})).unwrap();
        assert!(missing.files.is_none());
    }
}
