//! File-level SEG-Y headers: the 3200-byte textual header and the
//! 400-byte binary header that precede the first trace.

pub mod binary;
pub mod text;

pub use binary::{read_binary_header, BinaryHeader, SampleFormat};
pub use text::{read_text_header, TextEncoding, TextHeader};

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{SegyError, SegyResult};

/// Read exactly `N` bytes at `offset`, failing with `FileTooSmall` when the
/// file ends first.
pub(crate) fn read_exact_at<const N: usize>(path: &Path, offset: u64) -> SegyResult<[u8; N]> {
    let mut file = File::open(path)?;
    let size = file.metadata()?.len();
    let required = offset + N as u64;
    if size < required {
        return Err(SegyError::FileTooSmall { size, required });
    }
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = [0u8; N];
    file.read_exact(&mut buf)?;
    Ok(buf)
}
