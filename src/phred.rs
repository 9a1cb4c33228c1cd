//! Phred quality score conversion
//!
//! A FASTQ quality string stores one byte per base: the Phred score plus a
//! fixed ASCII offset. These helpers centralize the byte-to-score and
//! score-to-probability formulas used by the metric kernels and the filter
//! predicates.

/// ASCII offset of the standard Phred+33 encoding
///
/// Subtracted from each quality byte to obtain the integer Phred score.
/// Process-wide constant: the Phred+64 era ended with Illumina 1.8 and
/// nothing in current pipelines produces it.
pub const DEFAULT_PHRED_OFFSET: u8 = 33;

/// Decode a quality string into integer Phred scores
///
/// Yields `byte - offset` as a signed integer for each byte. Bytes below
/// the offset produce negative scores rather than an error: the codec does
/// not judge domain validity, it only shifts. Callers that care (the
/// quality filters do) must validate the record first.
///
/// # Examples
///
/// ```
/// use readsieve::phred::{decode, DEFAULT_PHRED_OFFSET};
///
/// let scores: Vec<i32> = decode(b"II!", DEFAULT_PHRED_OFFSET).collect();
/// assert_eq!(scores, vec![40, 40, 0]);
/// ```
#[inline]
pub fn decode(quality: &[u8], offset: u8) -> impl Iterator<Item = i32> + '_ {
    quality.iter().map(move |&byte| i32::from(byte) - i32::from(offset))
}

/// Convert a Phred score to an error probability
///
/// `P = 10^(-Q / 10)`
#[inline]
pub fn error_probability(q: f64) -> f64 {
    10_f64.powf(-q / 10.0)
}

/// Convert an error probability to a Phred score
///
/// `Q = -10 * log10(P)`
#[inline]
pub fn phred_from_probability(p: f64) -> f64 {
    -10.0 * p.log10()
}
