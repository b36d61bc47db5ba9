//! Header field resolution.
//!
//! Turns caller-supplied byte positions, a format token, per-field gap
//! overrides and a coordinate configuration into a validated
//! [`FieldMappingTable`] plus the [`FormatPolicy`] and [`CoordinateConfig`]
//! the reader needs. Byte positions arrive 1-based (SEG-Y convention) and
//! are stored 0-based.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use crate::decoder::{decode, DecodeError, Encoding};
use crate::error::{SegyError, SegyResult};
use seismic_common::FieldValue;

pub const FFID: &str = "FFID";
pub const SHOT_POINT: &str = "ShotPoint";
pub const CDP: &str = "CDP";
pub const INLINE: &str = "Inline";
pub const XLINE: &str = "Xline";
pub const SOURCE_X: &str = "Source_X";
pub const SOURCE_Y: &str = "Source_Y";

/// Built-in field positions (1-based).
pub const DEFAULT_HEADER_BYTES: &[(&str, u32)] = &[
    (FFID, 9),
    (SHOT_POINT, 17),
    (CDP, 21),
    (INLINE, 189),
    (XLINE, 193),
    (SOURCE_X, 73),
    (SOURCE_Y, 77),
];

/// Coordinate scalar position (1-based, int16).
pub const COORDINATE_SCALAR_BYTE: u32 = 71;

/// The coordinate scalar field (int16 at byte 71).
pub fn coordinate_scalar_spec() -> HeaderFieldSpec {
    HeaderFieldSpec {
        name: "Scalar".to_string(),
        byte_offset: (COORDINATE_SCALAR_BYTE - 1) as usize,
        encoding: Encoding::Int16,
        width_bytes: 2,
    }
}

/// Format token used when the caller supplies none.
pub const DEFAULT_FORMAT: FormatToken = FormatToken::FourBit;

/// Look up a built-in field position.
pub fn default_byte_position(name: &str) -> Option<u32> {
    DEFAULT_HEADER_BYTES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, pos)| *pos)
}

/// One resolved trace-header field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderFieldSpec {
    pub name: String,
    /// 0-based offset within the trace header.
    pub byte_offset: usize,
    pub encoding: Encoding,
    pub width_bytes: usize,
}

impl HeaderFieldSpec {
    /// Build a field from a 1-based byte position.
    pub fn new(
        name: impl Into<String>,
        byte_position: u32,
        encoding: Encoding,
        width_bytes: usize,
    ) -> SegyResult<Self> {
        let name = name.into();
        if byte_position == 0 {
            return Err(SegyError::FieldConfig(format!(
                "Invalid byte position for {}: must be a positive integer",
                name
            )));
        }
        if width_bytes != encoding.natural_width() {
            return Err(SegyError::FieldConfig(format!(
                "{} format requires {} bytes, but gap is {} for {}",
                encoding,
                encoding.natural_width(),
                width_bytes,
                name
            )));
        }
        Ok(Self {
            name,
            byte_offset: (byte_position - 1) as usize,
            encoding,
            width_bytes,
        })
    }

    /// The 1-based byte position as callers supplied it.
    pub fn byte_position(&self) -> u32 {
        self.byte_offset as u32 + 1
    }

    /// One past the last byte this field covers.
    pub fn end(&self) -> usize {
        self.byte_offset + self.width_bytes
    }

    /// Decode this field from a trace header buffer.
    pub fn decode(&self, header: &[u8]) -> Result<FieldValue, DecodeError> {
        decode(header, self.byte_offset, self.width_bytes, self.encoding)
    }
}

/// Ordered mapping from logical field name to its resolved spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldMappingTable {
    fields: Vec<HeaderFieldSpec>,
}

impl FieldMappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, keeping first-insertion order.
    pub fn insert(&mut self, spec: HeaderFieldSpec) {
        match self.fields.iter_mut().find(|f| f.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
    }

    pub fn get(&self, name: &str) -> Option<&HeaderFieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderFieldSpec> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Largest field end, used to size trace-header reads.
    pub fn max_end(&self) -> usize {
        self.fields.iter().map(|f| f.end()).max().unwrap_or(0)
    }
}

/// Format tokens accepted from callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatToken {
    #[serde(rename = "ibm")]
    Ibm,
    #[serde(rename = "ieee")]
    Ieee,
    #[serde(rename = "uint32")]
    Uint32,
    #[serde(rename = "int32")]
    Int32,
    #[serde(rename = "int16")]
    Int16,
    #[serde(rename = "uint16")]
    Uint16,
    #[serde(rename = "2-bit")]
    TwoBit,
    #[serde(rename = "4-bit")]
    FourBit,
}

impl FormatToken {
    /// Case-insensitive parse; `None` for unrecognised tokens.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "ibm" => Some(FormatToken::Ibm),
            "ieee" => Some(FormatToken::Ieee),
            "uint32" => Some(FormatToken::Uint32),
            "int32" => Some(FormatToken::Int32),
            "int16" => Some(FormatToken::Int16),
            "uint16" => Some(FormatToken::Uint16),
            "2-bit" => Some(FormatToken::TwoBit),
            "4-bit" => Some(FormatToken::FourBit),
            _ => None,
        }
    }

    pub fn family(&self) -> FormatFamily {
        match self {
            FormatToken::Ibm => FormatFamily::Ibm,
            FormatToken::Ieee => FormatFamily::Ieee,
            FormatToken::Uint32 | FormatToken::Uint16 => FormatFamily::Uint32,
            FormatToken::Int32 | FormatToken::Int16 | FormatToken::TwoBit | FormatToken::FourBit => {
                FormatFamily::Int32
            }
        }
    }

    /// Gap implied by the token.
    pub fn width(&self) -> usize {
        match self {
            FormatToken::Int16 | FormatToken::Uint16 | FormatToken::TwoBit => 2,
            _ => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatToken::Ibm => "ibm",
            FormatToken::Ieee => "ieee",
            FormatToken::Uint32 => "uint32",
            FormatToken::Int32 => "int32",
            FormatToken::Int16 => "int16",
            FormatToken::Uint16 => "uint16",
            FormatToken::TwoBit => "2-bit",
            FormatToken::FourBit => "4-bit",
        }
    }
}

impl fmt::Display for FormatToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format family; combined with a gap it selects an [`Encoding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatFamily {
    Ibm,
    Ieee,
    Uint32,
    Int32,
}

impl FormatFamily {
    /// Encoding for this family at the given gap.
    ///
    /// | family | gap 2  | gap 4  |
    /// |--------|--------|--------|
    /// | int32  | int16  | int32  |
    /// | uint32 | uint16 | uint32 |
    /// | ibm    | error  | ibm    |
    /// | ieee   | error  | ieee   |
    pub fn encoding_for(&self, width: usize) -> SegyResult<Encoding> {
        match (self, width) {
            (FormatFamily::Int32, 2) => Ok(Encoding::Int16),
            (FormatFamily::Int32, 4) => Ok(Encoding::Int32),
            (FormatFamily::Uint32, 2) => Ok(Encoding::Uint16),
            (FormatFamily::Uint32, 4) => Ok(Encoding::Uint32),
            (FormatFamily::Ibm, 4) => Ok(Encoding::IbmFloat32),
            (FormatFamily::Ieee, 4) => Ok(Encoding::IeeeFloat32),
            (family, width) => Err(SegyError::FieldConfig(format!(
                "{:?} format requires 4 bytes, but gap is {}",
                family, width
            ))),
        }
    }
}

/// How field encodings were chosen for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatPolicy {
    /// Token after normalisation (unknown tokens resolve to `int32`).
    pub format: FormatToken,
    pub family: FormatFamily,
    pub default_width: usize,
    /// Per-field `(encoding, width)` actually used.
    pub fields: BTreeMap<String, (Encoding, usize)>,
}

impl FormatPolicy {
    pub fn encoding_of(&self, name: &str) -> Option<Encoding> {
        self.fields.get(name).map(|(e, _)| *e)
    }

    pub fn width_of(&self, name: &str) -> Option<usize> {
        self.fields.get(name).map(|(_, w)| *w)
    }
}

/// Source coordinate fields, resolved independently of the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinateConfig {
    pub source_x: HeaderFieldSpec,
    pub source_y: HeaderFieldSpec,
}

impl Default for CoordinateConfig {
    fn default() -> Self {
        Self {
            source_x: HeaderFieldSpec {
                name: SOURCE_X.to_string(),
                byte_offset: 72,
                encoding: Encoding::Int32,
                width_bytes: 4,
            },
            source_y: HeaderFieldSpec {
                name: SOURCE_Y.to_string(),
                byte_offset: 76,
                encoding: Encoding::Int32,
                width_bytes: 4,
            },
        }
    }
}

impl CoordinateConfig {
    pub fn max_end(&self) -> usize {
        self.source_x.end().max(self.source_y.end())
    }
}

/// Whether caller field names outside the built-in set are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldNameMode {
    /// Only built-in names; others are dropped with a diagnostic.
    #[default]
    Strict,
    /// Any caller name is accepted verbatim.
    Lenient,
}

/// Caller overrides for the coordinate fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinateOverrides {
    /// 1-based byte position of Source_X.
    pub srcx_value: Option<u32>,
    /// 1-based byte position of Source_Y.
    pub srcy_value: Option<u32>,
    pub srcx_format: Option<String>,
    pub srcy_format: Option<String>,
}

/// Everything a caller can configure about field extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverInput {
    /// Field name to 1-based byte position.
    pub header_bytes: BTreeMap<String, u32>,
    pub format: Option<String>,
    /// Per-field gap overrides (2 or 4).
    pub gaps: BTreeMap<String, usize>,
    pub coordinates: CoordinateOverrides,
    pub mode: FieldNameMode,
}

/// Output of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFields {
    pub table: FieldMappingTable,
    pub policy: FormatPolicy,
    pub coordinates: CoordinateConfig,
    /// Non-fatal notes (unknown tokens, dropped names).
    pub diagnostics: Vec<String>,
}

/// Resolve caller configuration against the built-in defaults.
pub fn resolve(input: &ResolverInput) -> SegyResult<ResolvedFields> {
    let mut diagnostics = Vec::new();

    let format = match input.format.as_deref() {
        None => DEFAULT_FORMAT,
        Some(token) => match FormatToken::parse(token) {
            Some(parsed) => parsed,
            None => {
                let note = format!("Unrecognised format '{}', using int32 with 4-byte gap", token);
                warn!(format = %token, "Unrecognised header format token");
                diagnostics.push(note);
                FormatToken::Int32
            }
        },
    };
    let family = format.family();
    let default_width = format.width();

    // Defaults first, then caller positions override or extend them.
    let mut positions: Vec<(String, u32)> = DEFAULT_HEADER_BYTES
        .iter()
        .map(|(name, pos)| (name.to_string(), *pos))
        .collect();

    for (name, pos) in &input.header_bytes {
        let known = default_byte_position(name).is_some();
        if !known && input.mode == FieldNameMode::Strict {
            warn!(field = %name, "Ignoring unknown header field in strict mode");
            diagnostics.push(format!("Ignored unknown header field '{}'", name));
            continue;
        }
        debug!(field = %name, byte = pos, "Using caller byte position");
        match positions.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = *pos,
            None => positions.push((name.clone(), *pos)),
        }
    }

    for (name, gap) in &input.gaps {
        if !positions.iter().any(|(n, _)| n == name) {
            diagnostics.push(format!("Ignored gap override for unknown field '{}'", name));
            continue;
        }
        if *gap != 2 && *gap != 4 {
            return Err(SegyError::FieldConfig(format!(
                "Invalid gap {} for {}: must be 2 or 4",
                gap, name
            )));
        }
    }

    let mut table = FieldMappingTable::new();
    let mut fields = BTreeMap::new();
    for (name, pos) in positions {
        let width = input.gaps.get(&name).copied().unwrap_or(default_width);
        let encoding = family.encoding_for(width)?;
        let spec = HeaderFieldSpec::new(name.clone(), pos, encoding, width)?;
        fields.insert(name, (encoding, width));
        table.insert(spec);
    }

    let coordinates = resolve_coordinates(&input.coordinates, &table, &mut diagnostics)?;

    Ok(ResolvedFields {
        table,
        policy: FormatPolicy {
            format,
            family,
            default_width,
            fields,
        },
        coordinates,
        diagnostics,
    })
}

fn resolve_coordinates(
    overrides: &CoordinateOverrides,
    table: &FieldMappingTable,
    diagnostics: &mut Vec<String>,
) -> SegyResult<CoordinateConfig> {
    let source_x = resolve_coordinate(
        SOURCE_X,
        overrides.srcx_value,
        overrides.srcx_format.as_deref(),
        table,
        diagnostics,
    )?;
    let source_y = resolve_coordinate(
        SOURCE_Y,
        overrides.srcy_value,
        overrides.srcy_format.as_deref(),
        table,
        diagnostics,
    )?;
    Ok(CoordinateConfig { source_x, source_y })
}

fn resolve_coordinate(
    name: &str,
    position: Option<u32>,
    format: Option<&str>,
    table: &FieldMappingTable,
    diagnostics: &mut Vec<String>,
) -> SegyResult<HeaderFieldSpec> {
    let position = position
        .or_else(|| table.get(name).map(|f| f.byte_position()))
        .or_else(|| default_byte_position(name))
        .unwrap_or(1);

    let token = match format {
        None => FormatToken::Int32,
        Some(raw) => match FormatToken::parse(raw) {
            Some(token) => token,
            None => {
                warn!(field = %name, format = %raw, "Invalid coordinate format, using int32");
                diagnostics.push(format!(
                    "Invalid format '{}' for {}, using int32",
                    raw, name
                ));
                FormatToken::Int32
            }
        },
    };

    let encoding = token.family().encoding_for(token.width())?;
    HeaderFieldSpec::new(name, position, encoding, token.width())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_with(format: Option<&str>) -> ResolverInput {
        ResolverInput {
            format: format.map(|s| s.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_are_complete() {
        let resolved = resolve(&ResolverInput::default()).unwrap();
        assert_eq!(resolved.table.len(), DEFAULT_HEADER_BYTES.len());

        let ffid = resolved.table.get(FFID).unwrap();
        assert_eq!(ffid.byte_offset, 8);
        assert_eq!(ffid.byte_position(), 9);
        assert_eq!(ffid.encoding, Encoding::Int32);
        assert_eq!(ffid.width_bytes, 4);

        assert_eq!(resolved.table.get(INLINE).unwrap().byte_offset, 188);
        assert_eq!(resolved.coordinates.source_x.byte_offset, 72);
        assert_eq!(resolved.coordinates.source_y.byte_offset, 76);
        assert!(resolved.diagnostics.is_empty());
    }

    #[test]
    fn test_format_tokens_case_insensitive() {
        assert_eq!(FormatToken::parse("IBM"), Some(FormatToken::Ibm));
        assert_eq!(FormatToken::parse("Ieee"), Some(FormatToken::Ieee));
        assert_eq!(FormatToken::parse("2-BIT"), Some(FormatToken::TwoBit));
        assert_eq!(FormatToken::parse("float"), None);
    }

    #[test]
    fn test_two_bit_selects_int16_everywhere() {
        let resolved = resolve(&input_with(Some("2-bit"))).unwrap();
        assert!(resolved
            .table
            .iter()
            .all(|f| f.encoding == Encoding::Int16 && f.width_bytes == 2));
        assert_eq!(resolved.policy.family, FormatFamily::Int32);
        assert_eq!(resolved.policy.default_width, 2);
    }

    #[test]
    fn test_four_bit_selects_int32() {
        let resolved = resolve(&input_with(Some("4-bit"))).unwrap();
        assert!(resolved
            .table
            .iter()
            .all(|f| f.encoding == Encoding::Int32 && f.width_bytes == 4));
    }

    #[test]
    fn test_unknown_format_defaults_with_diagnostic() {
        let resolved = resolve(&input_with(Some("float64"))).unwrap();
        assert_eq!(resolved.policy.format, FormatToken::Int32);
        assert_eq!(resolved.policy.encoding_of(CDP), Some(Encoding::Int32));
        assert_eq!(resolved.diagnostics.len(), 1);
    }

    #[test]
    fn test_strict_mode_drops_unknown_names() {
        let mut input = ResolverInput::default();
        input.header_bytes.insert("FFID".to_string(), 1);
        input.header_bytes.insert("Custom".to_string(), 5);

        let resolved = resolve(&input).unwrap();
        assert_eq!(resolved.table.get(FFID).unwrap().byte_offset, 0);
        assert!(!resolved.table.contains("Custom"));
        assert_eq!(resolved.diagnostics.len(), 1);
    }

    #[test]
    fn test_lenient_mode_accepts_unknown_names() {
        let mut input = ResolverInput {
            mode: FieldNameMode::Lenient,
            ..Default::default()
        };
        input.header_bytes.insert("Custom".to_string(), 5);

        let resolved = resolve(&input).unwrap();
        let custom = resolved.table.get("Custom").unwrap();
        assert_eq!(custom.byte_offset, 4);
        // Extras come after the built-in fields.
        assert_eq!(resolved.table.iter().last().unwrap().name, "Custom");
    }

    #[test]
    fn test_gap_override_per_field() {
        let mut input = ResolverInput::default();
        input.gaps.insert(CDP.to_string(), 2);

        let resolved = resolve(&input).unwrap();
        assert_eq!(resolved.table.get(CDP).unwrap().encoding, Encoding::Int16);
        assert_eq!(resolved.table.get(FFID).unwrap().encoding, Encoding::Int32);
    }

    #[test]
    fn test_ibm_with_two_byte_gap_is_configuration_error() {
        let mut input = input_with(Some("ibm"));
        input.gaps.insert(FFID.to_string(), 2);
        assert!(matches!(resolve(&input), Err(SegyError::FieldConfig(_))));
    }

    #[test]
    fn test_invalid_gap_value() {
        let mut input = ResolverInput::default();
        input.gaps.insert(FFID.to_string(), 3);
        assert!(matches!(resolve(&input), Err(SegyError::FieldConfig(_))));
    }

    #[test]
    fn test_zero_byte_position_rejected() {
        let mut input = ResolverInput::default();
        input.header_bytes.insert(CDP.to_string(), 0);
        assert!(resolve(&input).is_err());
    }

    #[test]
    fn test_coordinate_config_independent_of_header_format() {
        let mut input = input_with(Some("2-bit"));
        input.coordinates.srcx_value = Some(181);
        input.coordinates.srcx_format = Some("ieee".to_string());

        let resolved = resolve(&input).unwrap();
        assert_eq!(resolved.coordinates.source_x.byte_offset, 180);
        assert_eq!(resolved.coordinates.source_x.encoding, Encoding::IeeeFloat32);
        // Y falls back to the table entry (2-bit family applies to the table only).
        assert_eq!(resolved.coordinates.source_y.byte_offset, 76);
        assert_eq!(resolved.coordinates.source_y.encoding, Encoding::Int32);
    }

    #[test]
    fn test_coordinate_falls_back_to_table_entry() {
        let mut input = ResolverInput::default();
        input.header_bytes.insert(SOURCE_X.to_string(), 181);
        input.header_bytes.insert(SOURCE_Y.to_string(), 185);

        let resolved = resolve(&input).unwrap();
        assert_eq!(resolved.coordinates.source_x.byte_position(), 181);
        assert_eq!(resolved.coordinates.source_y.byte_position(), 185);
    }

    #[test]
    fn test_invalid_coordinate_format_defaults() {
        let mut input = ResolverInput::default();
        input.coordinates.srcy_format = Some("double".to_string());

        let resolved = resolve(&input).unwrap();
        assert_eq!(resolved.coordinates.source_y.encoding, Encoding::Int32);
        assert_eq!(resolved.diagnostics.len(), 1);
    }

    #[test]
    fn test_spec_width_must_match_encoding() {
        assert!(HeaderFieldSpec::new("X", 1, Encoding::Int16, 4).is_err());
        assert!(HeaderFieldSpec::new("X", 1, Encoding::IeeeFloat32, 2).is_err());
        assert!(HeaderFieldSpec::new("X", 1, Encoding::Uint16, 2).is_ok());
    }
}
