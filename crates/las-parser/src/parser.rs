//! LAS 2.0 text parsing.
//!
//! A LAS file is a sequence of `~` sections. Header sections hold lines of
//! the form `MNEM.UNIT  VALUE : DESCRIPTION`; the `~A` section holds
//! whitespace-separated numeric rows, one per depth step unless the
//! version section declares `WRAP. YES`.

use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::error::{LasError, LasResult};

/// One `MNEM.UNIT VALUE : DESCRIPTION` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderItem {
    pub mnemonic: String,
    pub unit: String,
    pub value: String,
    pub description: String,
}

impl HeaderItem {
    pub fn parse(line: &str, line_number: usize) -> LasResult<Self> {
        let line = line.trim();
        let dot = line
            .find('.')
            .ok_or_else(|| LasError::parse(line_number, "expected MNEM.UNIT VALUE : DESCRIPTION"))?;
        let mnemonic = line[..dot].trim();
        if mnemonic.is_empty() {
            return Err(LasError::parse(line_number, "empty mnemonic"));
        }

        let rest = &line[dot + 1..];
        let unit_len = rest
            .find(|c: char| c.is_whitespace() || c == ':')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        let after = &rest[unit_len..];

        let (value, description) = match after.rfind(':') {
            Some(colon) => (after[..colon].trim(), after[colon + 1..].trim()),
            None => (after.trim(), ""),
        };

        Ok(Self {
            mnemonic: mnemonic.to_string(),
            unit: unit.to_string(),
            value: value.to_string(),
            description: description.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Version,
    Well,
    Curves,
    Parameters,
    Other,
    Ascii,
    Unknown,
}

impl Section {
    fn from_header(line: &str) -> Self {
        match line.trim_start_matches('~').chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('V') => Section::Version,
            Some('W') => Section::Well,
            Some('C') => Section::Curves,
            Some('P') => Section::Parameters,
            Some('O') => Section::Other,
            Some('A') => Section::Ascii,
            _ => Section::Unknown,
        }
    }
}

/// A parsed LAS file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LasFile {
    pub version: Vec<HeaderItem>,
    pub well: Vec<HeaderItem>,
    pub curves: Vec<HeaderItem>,
    pub params: Vec<HeaderItem>,
    /// `~O` section text, unparsed.
    pub other: String,
    /// `~A` rows, one value per curve. NULL values are kept as written.
    pub data: Vec<Vec<f64>>,
}

impl LasFile {
    pub fn read(path: &Path) -> LasResult<Self> {
        if !path.exists() {
            return Err(LasError::NotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;
        Self::parse(&String::from_utf8_lossy(&bytes))
    }

    pub fn parse(text: &str) -> LasResult<Self> {
        let mut las = LasFile::default();
        let mut section: Option<Section> = None;
        let mut other_lines: Vec<&str> = Vec::new();
        let mut ascii_lines: Vec<(usize, &str)> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with('~') {
                let next = Section::from_header(trimmed);
                if next == Section::Unknown {
                    debug!(line = line_number, header = %trimmed, "Skipping unknown LAS section");
                }
                section = Some(next);
                continue;
            }

            match section {
                None => return Err(LasError::parse(line_number, "content before the first ~ section")),
                Some(Section::Version) => las.version.push(HeaderItem::parse(trimmed, line_number)?),
                Some(Section::Well) => las.well.push(HeaderItem::parse(trimmed, line_number)?),
                Some(Section::Curves) => las.curves.push(HeaderItem::parse(trimmed, line_number)?),
                Some(Section::Parameters) => las.params.push(HeaderItem::parse(trimmed, line_number)?),
                Some(Section::Other) => other_lines.push(raw.trim_end()),
                Some(Section::Ascii) => ascii_lines.push((line_number, trimmed)),
                Some(Section::Unknown) => {}
            }
        }

        if las.version.is_empty() {
            return Err(LasError::MissingSection("~V"));
        }
        las.other = other_lines.join("\n");

        // LAS 1.2 well sections carry the value in the description slot.
        if las.version_number().is_some_and(|v| v.starts_with('1')) {
            for item in las.well.iter_mut().filter(|i| i.value.is_empty()) {
                std::mem::swap(&mut item.value, &mut item.description);
            }
        }

        las.data = parse_ascii(&ascii_lines, las.curves.len(), las.is_wrapped())?;
        Ok(las)
    }

    fn find<'a>(items: &'a [HeaderItem], mnemonic: &str) -> Option<&'a HeaderItem> {
        items.iter().find(|i| i.mnemonic.eq_ignore_ascii_case(mnemonic))
    }

    /// `VERS` from the version section.
    pub fn version_number(&self) -> Option<&str> {
        Self::find(&self.version, "VERS").map(|i| i.value.as_str())
    }

    pub fn is_wrapped(&self) -> bool {
        Self::find(&self.version, "WRAP").is_some_and(|i| i.value.eq_ignore_ascii_case("YES"))
    }

    /// Case-insensitive well section lookup.
    pub fn well_item(&self, mnemonic: &str) -> Option<&HeaderItem> {
        Self::find(&self.well, mnemonic)
    }

    pub fn null_value(&self) -> Option<f64> {
        self.well_item("NULL").and_then(|i| i.value.parse().ok())
    }

    pub fn curve_names(&self) -> Vec<String> {
        self.curves.iter().map(|c| c.mnemonic.clone()).collect()
    }

    /// First-column values of every data row.
    pub fn depths(&self) -> Vec<f64> {
        self.data.iter().filter_map(|row| row.first().copied()).collect()
    }
}

fn parse_ascii(lines: &[(usize, &str)], curve_count: usize, wrapped: bool) -> LasResult<Vec<Vec<f64>>> {
    let Some(&(first_line, _)) = lines.first() else {
        return Ok(Vec::new());
    };
    if curve_count == 0 {
        return Err(LasError::parse(first_line, "~A data without ~C curve definitions"));
    }

    let mut rows = Vec::new();
    if wrapped {
        let mut current = Vec::with_capacity(curve_count);
        let mut last_line = first_line;
        for &(line_number, line) in lines {
            last_line = line_number;
            for token in line.split_whitespace() {
                current.push(parse_value(token, line_number)?);
                if current.len() == curve_count {
                    rows.push(std::mem::replace(&mut current, Vec::with_capacity(curve_count)));
                }
            }
        }
        if !current.is_empty() {
            return Err(LasError::parse(
                last_line,
                format!("wrapped data ends mid-row ({} of {} values)", current.len(), curve_count),
            ));
        }
    } else {
        for &(line_number, line) in lines {
            let row = line
                .split_whitespace()
                .map(|token| parse_value(token, line_number))
                .collect::<LasResult<Vec<f64>>>()?;
            if row.len() != curve_count {
                return Err(LasError::parse(
                    line_number,
                    format!("expected {} values, found {}", curve_count, row.len()),
                ));
            }
            rows.push(row);
        }
    }
    Ok(rows)
}

fn parse_value(token: &str, line_number: usize) -> LasResult<f64> {
    token
        .parse::<f64>()
        .map_err(|_| LasError::parse(line_number, format!("invalid number '{}'", token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::LasFileBuilder;

    #[test]
    fn test_header_item_forms() {
        let item = HeaderItem::parse(" STRT.M        1000.5  : START DEPTH", 1).unwrap();
        assert_eq!(item.mnemonic, "STRT");
        assert_eq!(item.unit, "M");
        assert_eq!(item.value, "1000.5");
        assert_eq!(item.description, "START DEPTH");

        let item = HeaderItem::parse(" NULL.   -999.25 : NULL VALUE", 2).unwrap();
        assert_eq!(item.unit, "");
        assert_eq!(item.value, "-999.25");

        let item = HeaderItem::parse("TIME.  10:30:00 : LOG TIME", 3).unwrap();
        assert_eq!(item.value, "10:30:00");
        assert_eq!(item.description, "LOG TIME");

        let item = HeaderItem::parse("GR.GAPI : Gamma ray", 4).unwrap();
        assert_eq!(item.unit, "GAPI");
        assert_eq!(item.value, "");

        assert!(HeaderItem::parse("no dot here", 5).is_err());
    }

    #[test]
    fn test_builder_output_parses() {
        let text = LasFileBuilder::new()
            .well("WELL", "", "TEST-1", "WELL")
            .curve("DEPT", "M", "Depth")
            .curve("GR", "GAPI", "Gamma ray")
            .param("BHT", "DEGC", "85.0", "Bottom hole temperature")
            .other("Logged by a test")
            .row(&[100.0, 45.2])
            .row(&[100.5, -999.25])
            .build();
        let las = LasFile::parse(&text).unwrap();

        assert_eq!(las.version_number(), Some("2.0"));
        assert!(!las.is_wrapped());
        assert_eq!(las.well_item("well").map(|i| i.value.as_str()), Some("TEST-1"));
        assert_eq!(las.null_value(), Some(-999.25));
        assert_eq!(las.curve_names(), vec!["DEPT", "GR"]);
        assert_eq!(las.params.len(), 1);
        assert_eq!(las.other, "Logged by a test");
        assert_eq!(las.data, vec![vec![100.0, 45.2], vec![100.5, -999.25]]);
        assert_eq!(las.depths(), vec![100.0, 100.5]);
    }

    #[test]
    fn test_wrapped_data() {
        let text = "~V\n VERS. 2.0 : v\n WRAP. YES : wrapped\n~C\n DEPT.M : d\n A. : a\n B. : b\n~A\n 1.0\n 10 20\n 2.0\n 11 21\n";
        let las = LasFile::parse(text).unwrap();
        assert!(las.is_wrapped());
        assert_eq!(las.data, vec![vec![1.0, 10.0, 20.0], vec![2.0, 11.0, 21.0]]);

        let truncated = "~V\n WRAP. YES : w\n~C\n DEPT.M : d\n A. : a\n~A\n 1.0 10 2.0\n";
        assert!(matches!(LasFile::parse(truncated), Err(LasError::Parse { line: 7, .. })));
    }

    #[test]
    fn test_las_12_value_in_description() {
        let text = "~V\n VERS. 1.2 : v\n~W\n WELL. : ANY ET AL 12-34\n~C\n DEPT.M : d\n";
        let las = LasFile::parse(text).unwrap();
        assert_eq!(las.well_item("WELL").map(|i| i.value.as_str()), Some("ANY ET AL 12-34"));
        assert!(las.data.is_empty());
    }

    #[test]
    fn test_malformed_files() {
        assert!(matches!(LasFile::parse("~W\n WELL. X : w\n"), Err(LasError::MissingSection("~V"))));
        assert!(matches!(LasFile::parse("hello\n"), Err(LasError::Parse { line: 1, .. })));
        let ragged = "~V\n VERS. 2.0 : v\n~C\n DEPT.M : d\n GR. : g\n~A\n 1.0 2.0\n 1.5\n";
        assert!(matches!(LasFile::parse(ragged), Err(LasError::Parse { line: 8, .. })));
        let no_curves = "~V\n VERS. 2.0 : v\n~A\n 1.0\n";
        assert!(LasFile::parse(no_curves).is_err());
        let bad_number = "~V\n VERS. 2.0 : v\n~C\n DEPT.M : d\n~A\n abc\n";
        assert!(LasFile::parse(bad_number).is_err());
    }

    #[test]
    fn test_read_missing_file() {
        let err = LasFile::read(Path::new("/nonexistent/well.las")).unwrap_err();
        assert!(matches!(err, LasError::NotFound(_)));
        assert_eq!(err.kind(), seismic_common::ErrorKind::PathError);
    }
}
