//! Stride sampling of source coordinates across a file's traces.

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::decoder::DecodeError;
use crate::error::{SegyError, SegyResult};
use crate::fields::{coordinate_scalar_spec, HeaderFieldSpec};
use crate::geometry::TRACE_HEADER_LEN;
use crate::reader::SegyReader;

/// A deduplicated source coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinateSample {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingOptions {
    pub x: HeaderFieldSpec,
    pub y: HeaderFieldSpec,
    /// Read every `stride`-th trace, starting at trace 0.
    pub stride: u64,
    /// Coordinate scalar field; `None` leaves values unscaled.
    pub scalar: Option<HeaderFieldSpec>,
    /// Stop once this many distinct pairs are collected.
    pub max_samples: Option<usize>,
}

impl SamplingOptions {
    pub fn new(x: HeaderFieldSpec, y: HeaderFieldSpec, stride: u64) -> Self {
        Self {
            x,
            y,
            stride,
            scalar: None,
            max_samples: None,
        }
    }

    pub fn with_scalar(mut self) -> Self {
        self.scalar = Some(coordinate_scalar_spec());
        self
    }

    pub fn with_max_samples(mut self, max: usize) -> Self {
        self.max_samples = Some(max);
        self
    }

    fn span(&self) -> usize {
        let scalar_end = self.scalar.as_ref().map_or(0, |s| s.end());
        (TRACE_HEADER_LEN as usize)
            .max(self.x.end())
            .max(self.y.end())
            .max(scalar_end)
    }
}

/// Apply a SEG-Y coordinate scalar: 0 means 1, negative divides,
/// positive multiplies.
pub fn apply_scalar(value: f64, scalar: i64) -> f64 {
    match scalar {
        0 => value,
        s if s < 0 => value / s.unsigned_abs() as f64,
        s => value * s as f64,
    }
}

/// Collects distinct, non-degenerate pairs in first-seen order.
#[derive(Debug, Default)]
pub struct SampleSet {
    seen: HashSet<(u64, u64)>,
    samples: Vec<CoordinateSample>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair. Pairs with either axis zero (or non-finite) are dropped.
    /// Returns whether the pair was new.
    pub fn push(&mut self, x: f64, y: f64) -> bool {
        if x == 0.0 || y == 0.0 || !x.is_finite() || !y.is_finite() {
            return false;
        }
        if !self.seen.insert((x.to_bits(), y.to_bits())) {
            return false;
        }
        self.samples.push(CoordinateSample { x, y });
        true
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn into_samples(self) -> Vec<CoordinateSample> {
        self.samples
    }
}

/// Filter and deduplicate already-read pairs.
pub fn dedup_and_filter(pairs: impl IntoIterator<Item = (f64, f64)>) -> Vec<CoordinateSample> {
    let mut set = SampleSet::new();
    for (x, y) in pairs {
        set.push(x, y);
    }
    set.into_samples()
}

/// Sample source coordinates at trace indices `0, stride, 2*stride, ...`.
pub fn sample_coordinates(path: &Path, options: &SamplingOptions) -> SegyResult<Vec<CoordinateSample>> {
    if options.stride == 0 {
        return Err(SegyError::InvalidArgument("stride must be at least 1".to_string()));
    }

    let mut reader = SegyReader::open(path)?;
    let count = reader.geometry().trace_count;
    let span = options.span();
    let mut set = SampleSet::new();
    let mut visited = 0u64;

    let mut index = 0u64;
    while index < count {
        let Some(header) = reader.read_trace_header(index, span)? else {
            break;
        };
        visited += 1;

        if let (Some(x), Some(y)) = (read_axis(&options.x, &header)?, read_axis(&options.y, &header)?) {
            let scalar = match &options.scalar {
                Some(spec) => read_axis(spec, &header)?.map_or(0, |v| v as i64),
                None => 0,
            };
            set.push(apply_scalar(x, scalar), apply_scalar(y, scalar));
        }

        if options.max_samples.is_some_and(|max| set.len() >= max) {
            break;
        }
        index = match index.checked_add(options.stride) {
            Some(next) => next,
            None => break,
        };
    }

    debug!(
        file = %path.display(),
        traces = count,
        visited,
        unique = set.len(),
        "Sampled source coordinates"
    );
    Ok(set.into_samples())
}

fn read_axis(spec: &HeaderFieldSpec, header: &[u8]) -> SegyResult<Option<f64>> {
    match spec.decode(header) {
        Ok(value) => Ok(Some(value.as_f64())),
        Err(DecodeError::ShortRead { .. }) => Ok(None),
        Err(source) => Err(SegyError::Decode {
            field: spec.name.clone(),
            source,
        }),
    }
}
