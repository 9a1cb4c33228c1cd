//! Individual filter predicates and the name registry
//!
//! Each predicate is a pure per-record decision bound to one numeric
//! parameter. The registry maps DSL names to constructor functions so the
//! chain compiler never needs to know the predicate set: adding a
//! primitive is one new row and one constructor, with the compiler and
//! evaluator untouched.

use crate::error::{ReadsieveError, Result};
use crate::metrics;
use crate::phred::DEFAULT_PHRED_OFFSET;
use crate::types::FastqRecord;

/// A filter primitive bound to its parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Predicate {
    /// Keep records at least this many bases long
    MinLength(usize),
    /// Keep records at most this many bases long
    MaxLength(usize),
    /// Keep records whose mean quality reaches this threshold
    MeanQuality(f64),
    /// Keep records whose median quality reaches this threshold
    MedianQuality(f64),
}

impl Predicate {
    /// DSL name of this predicate
    pub fn name(&self) -> &'static str {
        match self {
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
            Self::MeanQuality(_) => "mean_quality",
            Self::MedianQuality(_) => "median_quality",
        }
    }

    /// Decide whether `record` passes this predicate
    ///
    /// All comparisons are inclusive: a record exactly at the bound
    /// passes. Length predicates are total. Quality predicates first check
    /// that the record can be scored at all — a zero-length quality string
    /// or a sequence/quality length mismatch is an error, never a silent
    /// discard.
    pub fn passes(&self, record: &FastqRecord) -> Result<bool> {
        match self {
            Self::MinLength(n) => Ok(record.len() >= *n),
            Self::MaxLength(n) => Ok(record.len() <= *n),
            Self::MeanQuality(threshold) => {
                validate_scorable(record)?;
                Ok(metrics::mean_quality(&record.quality, DEFAULT_PHRED_OFFSET) >= *threshold)
            }
            Self::MedianQuality(threshold) => {
                validate_scorable(record)?;
                Ok(metrics::median_quality(&record.quality, DEFAULT_PHRED_OFFSET) >= *threshold)
            }
        }
    }
}

/// Check that a quality metric is defined for this record
fn validate_scorable(record: &FastqRecord) -> Result<()> {
    if record.sequence.len() != record.quality.len() {
        return Err(ReadsieveError::LengthMismatch {
            id: record.id.clone(),
            sequence: record.sequence.len(),
            quality: record.quality.len(),
        });
    }
    if record.quality.is_empty() {
        return Err(ReadsieveError::EmptyRead {
            id: record.id.clone(),
        });
    }
    Ok(())
}

/// Constructor signature stored in the registry
pub type BuildFn = fn(&str) -> Result<Predicate>;

const REGISTRY: &[(&str, BuildFn)] = &[
    ("min_length", build_min_length),
    ("max_length", build_max_length),
    ("mean_quality", build_mean_quality),
    ("median_quality", build_median_quality),
];

/// Look up a predicate constructor by DSL name
pub(crate) fn lookup(name: &str) -> Option<BuildFn> {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|&(_, build)| build)
}

/// All registered DSL names, in registry order
pub fn registered_names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|&(name, _)| name)
}

fn build_min_length(parameter: &str) -> Result<Predicate> {
    Ok(Predicate::MinLength(parse_length("min_length", parameter)?))
}

fn build_max_length(parameter: &str) -> Result<Predicate> {
    Ok(Predicate::MaxLength(parse_length("max_length", parameter)?))
}

fn build_mean_quality(parameter: &str) -> Result<Predicate> {
    Ok(Predicate::MeanQuality(parse_threshold(
        "mean_quality",
        parameter,
    )?))
}

fn build_median_quality(parameter: &str) -> Result<Predicate> {
    Ok(Predicate::MedianQuality(parse_threshold(
        "median_quality",
        parameter,
    )?))
}

/// Parse a length parameter: a non-negative integer, `3` and `3.0` alike
fn parse_length(name: &str, parameter: &str) -> Result<usize> {
    let value = parse_threshold(name, parameter)?;
    if value < 0.0 || value.fract() != 0.0 || value > usize::MAX as f64 {
        return Err(ReadsieveError::InvalidFilterExpression {
            msg: format!(
                "filter '{}' needs a non-negative integer, got '{}'",
                name, parameter
            ),
        });
    }
    Ok(value as usize)
}

/// Parse a quality threshold: any finite decimal number
fn parse_threshold(name: &str, parameter: &str) -> Result<f64> {
    if parameter.is_empty() {
        return Err(ReadsieveError::InvalidFilterExpression {
            msg: format!("filter '{}' is missing its parameter", name),
        });
    }
    let value: f64 = parameter
        .parse()
        .map_err(|_| ReadsieveError::InvalidFilterExpression {
            msg: format!(
                "filter '{}' needs a numeric parameter, got '{}'",
                name, parameter
            ),
        })?;
    if !value.is_finite() {
        return Err(ReadsieveError::InvalidFilterExpression {
            msg: format!(
                "filter '{}' needs a finite parameter, got '{}'",
                name, parameter
            ),
        });
    }
    Ok(value)
}
