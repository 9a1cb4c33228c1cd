//! End-to-end filtering pipeline
//!
//! Wires a [`FastqStream`] through a [`FilterChain`] into a
//! [`FastqWriter`]. Two execution modes share the same semantics:
//! sequential record-at-a-time, and block-parallel where predicate
//! evaluation fans out over rayon while reading and writing stay on the
//! calling thread. Output order always matches input order.
//!
//! A record the chain cannot score (zero-length, or mismatched
//! sequence/quality lengths) aborts the run with an error rather than
//! being silently dropped; output written up to that point is flushed so
//! the failure is inspectable.

use crate::error::Result;
use crate::filters::FilterChain;
use crate::io::compression::{CompressedReader, CompressedWriter, DataSource};
use crate::io::fastq::{FastqStream, FastqWriter};
use crate::io::sink::DataSink;
use rayon::prelude::*;
use std::io::{BufRead, Write};

/// Counts accumulated over one filtering run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Records read from the input
    pub input_records: u64,
    /// Records that passed every filter and were written
    pub kept_records: u64,
    /// Records rejected by at least one filter
    pub discarded_records: u64,
}

/// Filter a record stream sequentially
///
/// Reads one record at a time, evaluates the chain, and writes keepers
/// immediately. Constant memory, no thread coordination.
pub fn filter_records<R: BufRead, W: Write>(
    chain: &FilterChain,
    stream: FastqStream<R>,
    writer: &mut FastqWriter<W>,
) -> Result<FilterStats> {
    let mut stats = FilterStats::default();
    for record in stream {
        let record = record?;
        stats.input_records += 1;
        if chain.accepts(&record)? {
            writer.write_record(&record)?;
            stats.kept_records += 1;
        } else {
            stats.discarded_records += 1;
        }
    }
    Ok(stats)
}

/// Filter a record stream with parallel predicate evaluation
///
/// Records are pulled in blocks of [`crate::io::BLOCK_SIZE`], verdicts
/// are computed across the rayon pool, then keepers are written in input
/// order. Verdicts are collected per block, so a scoring error anywhere
/// in a block surfaces before any of that block is written.
pub fn filter_records_parallel<R: BufRead, W: Write>(
    chain: &FilterChain,
    mut stream: FastqStream<R>,
    writer: &mut FastqWriter<W>,
) -> Result<FilterStats> {
    let mut stats = FilterStats::default();
    while let Some(block) = stream.next_block()? {
        let verdicts = block
            .par_iter()
            .map(|record| chain.accepts(record))
            .collect::<Result<Vec<bool>>>()?;

        for (record, keep) in block.iter().zip(&verdicts) {
            stats.input_records += 1;
            if *keep {
                writer.write_record(record)?;
                stats.kept_records += 1;
            } else {
                stats.discarded_records += 1;
            }
        }
    }
    Ok(stats)
}

/// Filter a compressed-capable stream into a compressed-capable sink
///
/// Takes ownership of the writer so compression trailers are always
/// finalized: on success the writer is finished and the stats returned;
/// on error the writer is finished best-effort and the original error
/// propagates.
pub fn filter_stream(
    chain: &FilterChain,
    stream: FastqStream<CompressedReader>,
    mut writer: FastqWriter<CompressedWriter>,
    parallel: bool,
) -> Result<FilterStats> {
    let result = if parallel {
        filter_records_parallel(chain, stream, &mut writer)
    } else {
        filter_records(chain, stream, &mut writer)
    };

    match result {
        Ok(stats) => {
            writer.finish()?;
            Ok(stats)
        }
        Err(e) => {
            let _ = writer.finish();
            Err(e)
        }
    }
}

/// Compile an expression and filter one input to one output
///
/// The expression is compiled before any file is opened, so a malformed
/// expression never touches the filesystem. Runs sequentially with the
/// default compression level; callers that need threads or an explicit
/// level compose [`filter_stream`] themselves.
///
/// # Example
///
/// ```no_run
/// use readsieve::io::{DataSink, DataSource};
/// use readsieve::pipeline::filter_fastq;
///
/// # fn main() -> readsieve::Result<()> {
/// let stats = filter_fastq(
///     "mean_quality:28|min_length:50",
///     DataSource::from_path("input.fq.gz"),
///     DataSink::from_path("kept.fq.gz"),
/// )?;
/// println!("kept {} of {}", stats.kept_records, stats.input_records);
/// # Ok(())
/// # }
/// ```
pub fn filter_fastq(expression: &str, input: DataSource, output: DataSink) -> Result<FilterStats> {
    let chain = FilterChain::compile(expression)?;
    let stream = FastqStream::new(input)?;
    let writer = FastqWriter::new(output)?;
    filter_stream(&chain, stream, writer, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReadsieveError;
    use std::io::{BufReader, Cursor};

    fn run_sequential(chain: &FilterChain, input: &[u8]) -> Result<(FilterStats, Vec<u8>)> {
        let stream = FastqStream::from_reader(BufReader::new(Cursor::new(input.to_vec())));
        let mut writer = FastqWriter::from_writer(Vec::new());
        let stats = filter_records(chain, stream, &mut writer)?;
        Ok((stats, writer.into_inner()))
    }

    fn run_parallel(chain: &FilterChain, input: &[u8]) -> Result<(FilterStats, Vec<u8>)> {
        let stream = FastqStream::from_reader(BufReader::new(Cursor::new(input.to_vec())));
        let mut writer = FastqWriter::from_writer(Vec::new());
        let stats = filter_records_parallel(chain, stream, &mut writer)?;
        Ok((stats, writer.into_inner()))
    }

    const THREE_READS: &[u8] = b"@TEST\nAA\n+\nAA\n@TEST\nA\n+\n-\n@TEST\nA\n+\nA\n";

    #[test]
    fn test_chain_keeps_only_matching_records() {
        let chain = FilterChain::compile("mean_quality:20|min_length:2").unwrap();
        let (stats, output) = run_sequential(&chain, THREE_READS).unwrap();

        assert_eq!(output, b"@TEST\nAA\n+\nAA\n");
        assert_eq!(stats.input_records, 3);
        assert_eq!(stats.kept_records, 1);
        assert_eq!(stats.discarded_records, 2);
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = FilterChain::new();
        let (stats, output) = run_sequential(&chain, THREE_READS).unwrap();

        assert_eq!(output, THREE_READS);
        assert_eq!(stats.input_records, 3);
        assert_eq!(stats.kept_records, 3);
        assert_eq!(stats.discarded_records, 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut input = Vec::new();
        for i in 0..100 {
            let qual = if i % 3 == 0 { "I".repeat(20) } else { "#".repeat(20) };
            input.extend_from_slice(
                format!("@read_{}\n{}\n+\n{}\n", i, "ACGT".repeat(5), qual).as_bytes(),
            );
        }

        let chain = FilterChain::compile("mean_quality:30").unwrap();
        let (seq_stats, seq_out) = run_sequential(&chain, &input).unwrap();
        let (par_stats, par_out) = run_parallel(&chain, &input).unwrap();

        assert_eq!(seq_stats, par_stats);
        assert_eq!(seq_out, par_out);
        assert_eq!(seq_stats.kept_records, 34);
    }

    #[test]
    fn test_empty_input_yields_zero_stats() {
        let chain = FilterChain::compile("min_length:1").unwrap();
        let (stats, output) = run_sequential(&chain, b"").unwrap();
        assert_eq!(stats, FilterStats::default());
        assert!(output.is_empty());
    }

    #[test]
    fn test_unscorable_record_aborts_run() {
        let input = b"@ok\nAC\n+\nII\n@empty\n\n+\n\n";
        let chain = FilterChain::compile("median_quality:10").unwrap();

        let err = run_sequential(&chain, input).unwrap_err();
        assert!(matches!(err, ReadsieveError::EmptyRead { .. }), "{err}");
    }

    #[test]
    fn test_unscorable_record_aborts_parallel_run() {
        let mut input = Vec::new();
        for i in 0..50 {
            input.extend_from_slice(format!("@read_{}\nACGT\n+\nIIII\n", i).as_bytes());
        }
        input.extend_from_slice(b"@empty\n\n+\n\n");

        let chain = FilterChain::compile("mean_quality:10").unwrap();
        let err = run_parallel(&chain, &input).unwrap_err();
        assert!(matches!(err, ReadsieveError::EmptyRead { .. }), "{err}");
    }

    #[test]
    fn test_malformed_input_aborts_with_line_number() {
        let input = b"@ok\nAC\n+\nII\nnot_a_header\nAC\n+\nII\n";
        let chain = FilterChain::new();

        let err = run_sequential(&chain, input).unwrap_err();
        match err {
            ReadsieveError::InvalidFastqFormat { line, .. } => assert_eq!(line, 5),
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_filter_fastq_compiles_before_opening_input() {
        let input = DataSource::from_path("/nonexistent/input.fq");
        let output = DataSink::from_path("/nonexistent/output.fq");

        let err = filter_fastq("bogus:1", input, output).unwrap_err();
        assert!(
            matches!(err, ReadsieveError::InvalidFilterExpression { .. }),
            "{err}"
        );
    }

    #[test]
    fn test_filter_fastq_reports_unreadable_input() {
        let input = DataSource::from_path("/nonexistent/input.fq");
        let output = DataSink::from_path("/nonexistent/output.fq");

        let err = filter_fastq("min_length:1", input, output).unwrap_err();
        assert!(matches!(err, ReadsieveError::Io(_)), "{err}");
    }
}
