//! Textual (EBCDIC or ASCII) file header.

use ebcdic::ebcdic::Ebcdic;
use serde::Serialize;
use std::path::Path;

use super::read_exact_at;
use crate::error::SegyResult;
use crate::geometry::TEXT_HEADER_LEN;

pub const TEXT_LINE_LEN: usize = 80;
pub const TEXT_LINE_COUNT: usize = 40;

const EBCDIC_SPACE: u8 = 0x40;
const EBCDIC_C: u8 = 0xC3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    Ebcdic,
    Ascii,
}

/// Decoded textual header as 40 card-image lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextHeader {
    pub encoding: TextEncoding,
    pub lines: Vec<String>,
}

impl TextHeader {
    pub fn parse(raw: &[u8; TEXT_HEADER_LEN as usize]) -> Self {
        let encoding = detect_encoding(raw);
        let ascii = match encoding {
            TextEncoding::Ebcdic => {
                let mut out = vec![0u8; raw.len()];
                Ebcdic::ebcdic_to_ascii(raw, &mut out, raw.len(), true, false);
                out
            }
            TextEncoding::Ascii => raw.to_vec(),
        };

        let lines = ascii
            .chunks(TEXT_LINE_LEN)
            .take(TEXT_LINE_COUNT)
            .map(|line| {
                let printable: String = line
                    .iter()
                    .map(|&b| if b.is_ascii() && !b.is_ascii_control() { b as char } else { ' ' })
                    .collect();
                printable.trim_end().to_string()
            })
            .collect();

        Self { encoding, lines }
    }

    /// Lines joined with newlines, trailing blank lines removed.
    pub fn to_text(&self) -> String {
        let end = self
            .lines
            .iter()
            .rposition(|l| !l.is_empty())
            .map_or(0, |i| i + 1);
        self.lines[..end].join("\n")
    }
}

/// Headers padded with EBCDIC spaces, or starting with the EBCDIC `C`
/// of the first card, are EBCDIC; so is anything mostly in the high range.
fn detect_encoding(raw: &[u8]) -> TextEncoding {
    let last = raw.last().copied().unwrap_or(0);
    let first = raw.first().copied().unwrap_or(0);
    if last == EBCDIC_SPACE || first == EBCDIC_C {
        return TextEncoding::Ebcdic;
    }
    let high = raw.iter().filter(|&&b| b >= 0x80).count();
    if high * 2 > raw.len() {
        TextEncoding::Ebcdic
    } else {
        TextEncoding::Ascii
    }
}

pub fn read_text_header(path: &Path) -> SegyResult<TextHeader> {
    let raw = read_exact_at::<{ TEXT_HEADER_LEN as usize }>(path, 0)?;
    Ok(TextHeader::parse(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascii_header(first_line: &str) -> [u8; 3200] {
        let mut raw = [b' '; 3200];
        raw[..first_line.len()].copy_from_slice(first_line.as_bytes());
        raw[80..83].copy_from_slice(b"C 2");
        raw
    }

    #[test]
    fn test_ascii_lines() {
        let header = TextHeader::parse(&ascii_header("C 1 CLIENT TEST"));
        assert_eq!(header.encoding, TextEncoding::Ascii);
        assert_eq!(header.lines.len(), 40);
        assert_eq!(header.lines[0], "C 1 CLIENT TEST");
        assert_eq!(header.lines[1], "C 2");
        assert_eq!(header.to_text(), "C 1 CLIENT TEST\nC 2");
    }

    #[test]
    fn test_ebcdic_detected_from_padding() {
        let mut raw = [EBCDIC_SPACE; 3200];
        // "C 1" in EBCDIC
        raw[0] = 0xC3;
        raw[1] = 0x40;
        raw[2] = 0xF1;
        let header = TextHeader::parse(&raw);
        assert_eq!(header.encoding, TextEncoding::Ebcdic);
        assert!(header.lines[0].starts_with('C'));
        assert!(header.lines[0].ends_with('1'));
        assert_eq!(header.lines[39], "");
    }

    #[test]
    fn test_nul_padding_trimmed() {
        let mut raw = [0u8; 3200];
        raw[..4].copy_from_slice(b"C 01");
        let header = TextHeader::parse(&raw);
        assert_eq!(header.encoding, TextEncoding::Ascii);
        assert_eq!(header.lines[0], "C 01");
        assert_eq!(header.to_text(), "C 01");
    }
}
