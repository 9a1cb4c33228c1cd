//! Optimized metric kernel
//!
//! The mean replaces the per-base `powf` with a 256-entry lookup table
//! built once in the constructor. Table entries come from the same
//! [`phred::error_probability`] helper the reference kernel calls, and the
//! summation runs in the same left-to-right order, so per-byte results are
//! bit-identical to the direct computation rather than merely close.
//!
//! The median replaces sorting with a counting histogram over raw bytes.
//! Subtracting the offset is a monotonic shift, so selecting the middle
//! raw byte(s) first and shifting afterwards gives exactly the sort-based
//! answer.

use crate::phred;

use super::MetricKernel;

const TABLE_SIZE: usize = 256;

/// Lookup-table metric computation
pub struct OptimizedKernel {
    /// Error probability for every non-negative score a byte can decode to
    error_rates: [f64; TABLE_SIZE],
}

impl OptimizedKernel {
    /// Build the kernel, precomputing the error-rate table
    pub fn new() -> Self {
        let mut error_rates = [0.0; TABLE_SIZE];
        for (q, rate) in error_rates.iter_mut().enumerate() {
            *rate = phred::error_probability(q as f64);
        }
        Self { error_rates }
    }
}

impl Default for OptimizedKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricKernel for OptimizedKernel {
    fn name(&self) -> &'static str {
        "optimized"
    }

    fn mean(&self, quality: &[u8], offset: u8) -> f64 {
        let mut sum = 0.0;
        for &byte in quality {
            let q = i32::from(byte) - i32::from(offset);
            // a byte below the offset decodes to a negative score, which
            // the table cannot hold
            sum += if q >= 0 {
                self.error_rates[q as usize]
            } else {
                phred::error_probability(f64::from(q))
            };
        }
        phred::phred_from_probability(sum / quality.len() as f64)
    }

    fn median(&self, quality: &[u8], offset: u8) -> f64 {
        if quality.is_empty() {
            return f64::NAN;
        }
        let mut counts = [0u32; TABLE_SIZE];
        for &byte in quality {
            counts[usize::from(byte)] += 1;
        }

        let n = quality.len();
        let (lower_rank, upper_rank) = if n % 2 == 0 {
            (n / 2 - 1, n / 2)
        } else {
            (n / 2, n / 2)
        };

        let shift = f64::from(i32::from(offset));
        let mut seen = 0usize;
        let mut lower = None;
        for (byte, &count) in counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            seen += count as usize;
            if lower.is_none() && seen > lower_rank {
                lower = Some(byte as f64);
            }
            if seen > upper_rank {
                let upper = byte as f64;
                let lower = lower.unwrap_or(upper);
                return (lower + upper) / 2.0 - shift;
            }
        }
        unreachable!("histogram total covers every rank")
    }
}
