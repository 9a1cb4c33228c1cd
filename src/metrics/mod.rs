//! Aggregate quality metrics over encoded quality strings
//!
//! # Architecture
//!
//! Two interchangeable kernels compute the same metrics:
//! - [`ReferenceKernel`]: direct per-base arithmetic, the readable
//!   definition of the math
//! - [`OptimizedKernel`]: precomputed error-rate lookup table and a
//!   counting histogram for the median
//!
//! The kernels are required to agree: mean within 1e-9 relative tolerance
//! (bit-for-bit in practice, since both share the per-byte probability
//! computation and the summation order) and median exactly. The property
//! tests below hold both implementations to that contract.
//!
//! One kernel is active per process. [`select_kernel`] fixes the choice at
//! startup; call sites go through [`mean_quality`] / [`median_quality`] and
//! depend only on the [`MetricKernel`] trait.

pub mod optimized;
pub mod reference;

use std::sync::OnceLock;

pub use optimized::OptimizedKernel;
pub use reference::ReferenceKernel;

/// A metric backend computing aggregate Phred quality over a quality string
///
/// Implementations must be pure: no side effects, identical output for
/// identical input. Both metrics treat a zero-length quality string as a
/// precondition violation and return NaN rather than panicking; callers
/// validate records before asking for a metric.
pub trait MetricKernel: Send + Sync {
    /// Kernel name for logs and diagnostics
    fn name(&self) -> &'static str;

    /// Mean quality in Phred space
    ///
    /// Decodes each base, averages the per-base error probabilities and
    /// converts the average back: `-10 * log10(mean(10^(-q_i/10)))`.
    /// Averaging in probability space is the Phred convention for the
    /// error rate of an averaged basecall; averaging the scores directly
    /// would overweight low-confidence bases.
    fn mean(&self, quality: &[u8], offset: u8) -> f64;

    /// Median of the integer Phred scores
    ///
    /// Standard convention: the middle score, or the average of the two
    /// middle scores for even-length input.
    fn median(&self, quality: &[u8], offset: u8) -> f64;
}

/// Which kernel implementation to activate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelKind {
    /// Direct per-base arithmetic
    Reference,
    /// Lookup-table and histogram implementation
    Optimized,
}

static ACTIVE_KERNEL: OnceLock<Box<dyn MetricKernel>> = OnceLock::new();

fn build_kernel(kind: KernelKind) -> Box<dyn MetricKernel> {
    match kind {
        KernelKind::Reference => Box::new(ReferenceKernel),
        KernelKind::Optimized => Box::new(OptimizedKernel::new()),
    }
}

/// Fix the process-wide metric kernel
///
/// The first call wins and returns `true`; later calls (or a call after
/// [`active_kernel`] already initialized the default) leave the active
/// kernel unchanged and return `false`. Intended to be called once during
/// startup, before any records are scored.
pub fn select_kernel(kind: KernelKind) -> bool {
    ACTIVE_KERNEL.set(build_kernel(kind)).is_ok()
}

/// The process-wide metric kernel
///
/// Initializes to [`OptimizedKernel`] if [`select_kernel`] was never called.
pub fn active_kernel() -> &'static dyn MetricKernel {
    ACTIVE_KERNEL
        .get_or_init(|| build_kernel(KernelKind::Optimized))
        .as_ref()
}

/// Mean Phred quality of a quality string, via the active kernel
///
/// # Examples
///
/// ```
/// use readsieve::metrics::mean_quality;
/// use readsieve::phred::DEFAULT_PHRED_OFFSET;
///
/// // uniform Q40 ('I') averages to Q40
/// let mean = mean_quality(b"IIII", DEFAULT_PHRED_OFFSET);
/// assert!((mean - 40.0).abs() < 1e-9);
/// ```
pub fn mean_quality(quality: &[u8], offset: u8) -> f64 {
    active_kernel().mean(quality, offset)
}

/// Median Phred score of a quality string, via the active kernel
///
/// # Examples
///
/// ```
/// use readsieve::metrics::median_quality;
/// use readsieve::phred::DEFAULT_PHRED_OFFSET;
///
/// // scores 8, 9, 40
/// assert_eq!(median_quality(b")*I", DEFAULT_PHRED_OFFSET), 9.0);
/// ```
pub fn median_quality(quality: &[u8], offset: u8) -> f64 {
    active_kernel().median(quality, offset)
}
