//! readsieve: streaming FASTQ filtering with compiled filter chains
//!
//! # Overview
//!
//! readsieve filters sequencing reads by length and quality. A filter
//! expression is compiled once into a chain of predicates, then applied
//! to a FASTQ stream record by record, so arbitrarily large inputs run
//! in constant memory.
//!
//! ## Key Features
//!
//! - **Streaming**: constant memory regardless of dataset size
//! - **Compiled chains**: `"min_length:50|mean_quality:28"` parsed once,
//!   evaluated millions of times
//! - **Short-circuit evaluation**: filters run left to right, stopping at
//!   the first rejection
//! - **Dual metric kernels**: a table-driven optimized kernel validated
//!   against a direct reference implementation
//! - **Transparent compression**: gzip input detected from content, gzip
//!   output chosen by extension
//!
//! ## Quick Start
//!
//! ```no_run
//! use readsieve::io::{DataSink, DataSource};
//! use readsieve::filter_fastq;
//!
//! # fn main() -> readsieve::Result<()> {
//! let stats = filter_fastq(
//!     "min_length:50|mean_quality:28",
//!     DataSource::from_path("input.fq.gz"),
//!     DataSink::from_path("kept.fq.gz"),
//! )?;
//! eprintln!("kept {} of {} reads", stats.kept_records, stats.input_records);
//! # Ok(())
//! # }
//! ```
//!
//! ## Filter Expressions
//!
//! An expression is `name:parameter` entries joined by `|`:
//!
//! - `min_length:N` — keep reads at least N bases long
//! - `max_length:N` — keep reads at most N bases long
//! - `mean_quality:Q` — keep reads whose error-averaged PHRED score is at
//!   least Q
//! - `median_quality:Q` — keep reads whose median PHRED score is at
//!   least Q
//!
//! All comparisons are inclusive. A read is kept only if every entry
//! accepts it.
//!
//! ## Module Organization
//!
//! - [`filters`]: filter predicates, the expression compiler, and chain
//!   evaluation
//! - [`metrics`]: per-read quality metrics (reference and optimized
//!   kernels)
//! - [`io`]: streaming FASTQ parser/writer, compression, sources and
//!   sinks
//! - [`pipeline`]: stream-to-sink filtering runs and their statistics
//! - [`phred`]: PHRED score encoding and error-probability conversions

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod filters;
pub mod io;
pub mod metrics;
pub mod phred;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use error::{ReadsieveError, Result};
pub use filters::{FilterChain, Predicate};
pub use io::{DataSink, DataSource, FastqStream, FastqWriter};
pub use metrics::{select_kernel, KernelKind, MetricKernel};
pub use pipeline::{filter_fastq, FilterStats};
pub use types::FastqRecord;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
