//! Common test fixtures.
//!
//! Pre-built files and reference values that recur across the workspace
//! tests.

use std::path::{Path, PathBuf};

use crate::generators::{LasFileBuilder, SegyFileBuilder};

/// A three-trace line whose folder-prefixed name exercises name cleanup.
///
/// Traces carry FFID 101..103, CDP 2001..2003 and source coordinates
/// `(500000 + 25i, 6000000 + 50i)`; the file is `<dir>/LINE01/LINE01_raw.sgy`.
pub fn standard_line(dir: &Path) -> PathBuf {
    SegyFileBuilder::new(10)
        .traces(3, |i, h| {
            let i = i as i32;
            h.standard(101 + i, 2001 + i, 500_000 + 25 * i, 6_000_000 + 50 * i)
                .i32(17, 10 + i)
                .i32(189, 1000)
                .i32(193, 3000 + i);
        })
        .write_to(&dir.join("LINE01").join("LINE01_raw.sgy"))
}

/// Two traces with the given first and last source coordinates.
pub fn coordinate_line(dir: &Path, name: &str, first: (i32, i32), last: (i32, i32)) -> PathBuf {
    SegyFileBuilder::new(4)
        .trace(|h| {
            h.standard(1, 1, first.0, first.1);
        })
        .trace(|h| {
            h.standard(2, 2, last.0, last.1);
        })
        .write_in(dir, name)
}

/// A minimal well log with version, well, curve, parameter and data sections.
pub fn standard_las(dir: &Path) -> PathBuf {
    LasFileBuilder::new()
        .well("COMP", "", "ACME EXPLORATION", "COMPANY")
        .well("WELL", "", "ACME-1", "WELL")
        .well("FLD", "", "NORTH FIELD", "FIELD")
        .well("LOC", "", "BLOCK 7", "LOCATION")
        .well("CTRY", "", "NO", "COUNTRY")
        .well("UWI", "", "100-07-001", "UNIQUE WELL ID")
        .well("DATE", "", "2023-05-01", "LOG DATE")
        .well("LATI", "DEG", "60.123456789", "LATITUDE")
        .well("LONG", "DEG", "4.987654321", "LONGITUDE")
        .well("STEP", "M", "0.5", "STEP")
        .curve("DEPT", "M", "Depth")
        .curve("GR", "GAPI", "Gamma ray")
        .param("BHT", "DEGC", "85.0", "Bottom hole temperature")
        .depth_rows(1000.0, 0.5, 5)
        .write_in(dir, "ACME-1.las")
}

/// Reference projection values.
pub mod projection {
    /// Snyder's worked transverse mercator example (Clarke 1866,
    /// central meridian -75, k0 0.9996): `(lon, lat)` and `(x, y)` metres.
    pub const SNYDER_TM_LONLAT: (f64, f64) = (-73.5, 40.5);
    pub const SNYDER_TM_XY: (f64, f64) = (127_106.5, 4_484_124.4);

    /// PROJ string for the Snyder example.
    pub const SNYDER_TM_PROJ: &str =
        "+proj=tmerc +lat_0=0 +lon_0=-75 +k=0.9996 +x_0=0 +y_0=0 +ellps=clrk66 +units=m";
}
