//! Reference metric kernel
//!
//! Direct transcription of the metric definitions, one base at a time.
//! Kept deliberately plain: this is the implementation the optimized
//! kernel is checked against.

use crate::phred;

use super::MetricKernel;

/// Straightforward per-base metric computation
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceKernel;

impl MetricKernel for ReferenceKernel {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn mean(&self, quality: &[u8], offset: u8) -> f64 {
        let mut sum = 0.0;
        for q in phred::decode(quality, offset) {
            sum += phred::error_probability(f64::from(q));
        }
        phred::phred_from_probability(sum / quality.len() as f64)
    }

    fn median(&self, quality: &[u8], offset: u8) -> f64 {
        let mut scores: Vec<i32> = phred::decode(quality, offset).collect();
        if scores.is_empty() {
            return f64::NAN;
        }
        scores.sort_unstable();
        let mid = scores.len() / 2;
        if scores.len() % 2 == 0 {
            f64::from(scores[mid - 1] + scores[mid]) / 2.0
        } else {
            f64::from(scores[mid])
        }
    }
}
