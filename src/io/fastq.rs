//! FASTQ streaming parser and writer
//!
//! The parser reads one four-line record at a time into reusable line
//! buffers, so memory stays constant no matter how large the input is.
//! Errors carry 1-based line numbers, which is what users grep for when a
//! 100-million-line file turns out to be truncated.
//!
//! [`FastqStream::next_block`] hands out records in blocks of
//! [`BLOCK_SIZE`] for the parallel filter path; the `Iterator` impl stays
//! strictly one record at a time.

use crate::error::{ReadsieveError, Result};
use crate::io::compression::{CompressedReader, CompressedWriter, DataSource};
use crate::io::sink::DataSink;
use crate::types::FastqRecord;
use std::io::{BufRead, Write};
use std::path::Path;

/// Records per block for batch processing
///
/// Large enough to amortize per-block dispatch, small enough that a block
/// of 150 bp reads stays around 1.5 MB.
pub const BLOCK_SIZE: usize = 10_000;

/// Streaming FASTQ parser
///
/// Yields records in file order as `Result<FastqRecord>`; `None` only at
/// clean end of input, so I/O problems are always distinguishable from
/// EOF.
///
/// # Example
///
/// ```no_run
/// use readsieve::FastqStream;
/// use readsieve::io::DataSource;
///
/// # fn main() -> readsieve::Result<()> {
/// let stream = FastqStream::new(DataSource::from_path("lane1.fq.gz"))?;
/// for record in stream {
///     let record = record?;
///     // one record at a time, constant memory
/// }
/// # Ok(())
/// # }
/// ```
pub struct FastqStream<R: BufRead> {
    reader: R,
    line1: String,
    line2: String,
    line3: String,
    line4: String,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> FastqStream<R> {
    /// Create a FASTQ stream from a buffered reader
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            line1: String::with_capacity(256),
            line2: String::with_capacity(256),
            line3: String::with_capacity(256),
            line4: String::with_capacity(256),
            line_number: 0,
            finished: false,
        }
    }

    /// Read one FASTQ record from the reader
    fn read_record(&mut self) -> Result<Option<FastqRecord>> {
        self.line1.clear();
        self.line2.clear();
        self.line3.clear();
        self.line4.clear();

        let n1 = self.reader.read_line(&mut self.line1)?;
        if n1 == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let n2 = self.reader.read_line(&mut self.line2)?;
        if n2 == 0 {
            return Err(ReadsieveError::InvalidFastqFormat {
                line: self.line_number,
                msg: "Unexpected end of file after header".to_string(),
            });
        }
        self.line_number += 1;

        let n3 = self.reader.read_line(&mut self.line3)?;
        if n3 == 0 {
            return Err(ReadsieveError::InvalidFastqFormat {
                line: self.line_number,
                msg: "Unexpected end of file after sequence".to_string(),
            });
        }
        self.line_number += 1;

        let n4 = self.reader.read_line(&mut self.line4)?;
        if n4 == 0 {
            return Err(ReadsieveError::InvalidFastqFormat {
                line: self.line_number,
                msg: "Unexpected end of file after separator".to_string(),
            });
        }
        self.line_number += 1;

        if !self.line1.starts_with('@') {
            return Err(ReadsieveError::InvalidFastqFormat {
                line: self.line_number - 3,
                msg: format!(
                    "Expected '@' at start of header, got: {}",
                    &self.line1[..1.min(self.line1.len())]
                ),
            });
        }

        if !self.line3.starts_with('+') {
            return Err(ReadsieveError::InvalidFastqFormat {
                line: self.line_number - 1,
                msg: format!(
                    "Expected '+' at start of separator, got: {}",
                    &self.line3[..1.min(self.line3.len())]
                ),
            });
        }

        let id = self.line1[1..].trim_end().to_string();
        let sequence = self.line2.trim_end().as_bytes().to_vec();
        let quality = self.line4.trim_end().as_bytes().to_vec();

        if sequence.len() != quality.len() {
            return Err(ReadsieveError::InvalidFastqFormat {
                line: self.line_number,
                msg: format!(
                    "Sequence length ({}) != quality length ({})",
                    sequence.len(),
                    quality.len()
                ),
            });
        }

        Ok(Some(FastqRecord {
            id,
            sequence,
            quality,
        }))
    }

    /// Read the next block of up to [`BLOCK_SIZE`] records
    ///
    /// Returns `Ok(None)` once the stream is exhausted. The final block
    /// may be short. Records are moved out, not cloned; interleaving with
    /// the `Iterator` impl is fine, both pull from the same position.
    pub fn next_block(&mut self) -> Result<Option<Vec<FastqRecord>>> {
        if self.finished {
            return Ok(None);
        }

        let mut block = Vec::with_capacity(BLOCK_SIZE);
        while block.len() < BLOCK_SIZE {
            match self.read_record()? {
                Some(record) => block.push(record),
                None => {
                    self.finished = true;
                    break;
                }
            }
        }

        if block.is_empty() {
            Ok(None)
        } else {
            Ok(Some(block))
        }
    }
}

impl FastqStream<CompressedReader> {
    /// Create a FASTQ stream from a data source, with gzip auto-detection
    pub fn new(source: DataSource) -> Result<Self> {
        let reader = CompressedReader::new(source)?;
        Ok(Self::from_reader(reader))
    }

    /// Create a FASTQ stream from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(DataSource::from_path(path))
    }
}

impl<R: BufRead> Iterator for FastqStream<R> {
    type Item = Result<FastqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Streaming FASTQ writer
///
/// Writes the four-line layout `@id`, sequence, `+`, quality with the
/// separator kept bare. Sequence and quality bytes are emitted exactly as
/// held in the record, so parse-then-write round-trips byte for byte.
///
/// # Example
///
/// ```no_run
/// use readsieve::{FastqRecord, FastqWriter};
/// use readsieve::io::DataSink;
///
/// # fn main() -> readsieve::Result<()> {
/// let mut writer = FastqWriter::new(DataSink::from_path("kept.fq.gz"))?;
/// let record = FastqRecord::new("read1".to_string(), b"ACGT".to_vec(), b"IIII".to_vec());
/// writer.write_record(&record)?;
/// writer.finish()?; // flushes and finalizes compression
/// # Ok(())
/// # }
/// ```
pub struct FastqWriter<W: Write> {
    writer: W,
}

impl<W: Write> FastqWriter<W> {
    /// Create a FASTQ writer over any `Write` implementation
    pub fn from_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Write one record in four-line FASTQ layout
    ///
    /// A record whose sequence and quality lengths differ cannot be
    /// serialized as valid FASTQ and is refused.
    pub fn write_record(&mut self, record: &FastqRecord) -> Result<()> {
        if record.sequence.len() != record.quality.len() {
            return Err(ReadsieveError::LengthMismatch {
                id: record.id.clone(),
                sequence: record.sequence.len(),
                quality: record.quality.len(),
            });
        }

        self.writer.write_all(b"@")?;
        self.writer.write_all(record.id.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.write_all(&record.sequence)?;
        self.writer.write_all(b"\n+\n")?;
        self.writer.write_all(&record.quality)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush buffered output
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Consume the writer, returning the underlying `Write`
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl FastqWriter<CompressedWriter> {
    /// Create a writer for a sink, compressing when its extension calls
    /// for it
    pub fn new(sink: DataSink) -> Result<Self> {
        Ok(Self::from_writer(CompressedWriter::new(sink)?))
    }

    /// Create a writer for a sink with an explicit gzip level (0-9)
    pub fn with_level(sink: DataSink, level: u32) -> Result<Self> {
        Ok(Self::from_writer(CompressedWriter::with_level(
            sink, level,
        )?))
    }

    /// Finish writing: flush everything and finalize compression
    pub fn finish(self) -> Result<()> {
        self.writer.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    #[test]
    fn test_block_size_constant() {
        assert_eq!(BLOCK_SIZE, 10_000);
    }

    #[test]
    fn test_parse_valid_fastq() {
        let data = b"@SEQ_ID\nGATTACA\n+\n!!!!!!!\n";
        let mut stream = FastqStream::from_reader(BufReader::new(Cursor::new(data)));

        let record = stream.next().unwrap().unwrap();
        assert_eq!(record.id, "SEQ_ID");
        assert_eq!(record.sequence, b"GATTACA");
        assert_eq!(record.quality, b"!!!!!!!");
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_parse_multiple_records() {
        let data = b"@SEQ1\nGAT\n+\n!!!\n@SEQ2\nTACA\n+\n!!!!\n";
        let stream = FastqStream::from_reader(BufReader::new(Cursor::new(data)));

        let records: Vec<_> = stream.collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "SEQ1");
        assert_eq!(records[1].id, "SEQ2");
    }

    #[test]
    fn test_repeated_separator_id_is_accepted() {
        // '+SEQ1' on the separator line is legal FASTQ
        let data = b"@SEQ1\nGAT\n+SEQ1\n!!!\n";
        let stream = FastqStream::from_reader(BufReader::new(Cursor::new(data)));
        let records: Vec<_> = stream.collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_crlf_line_endings() {
        let data = b"@SEQ1\r\nGAT\r\n+\r\n!!!\r\n";
        let stream = FastqStream::from_reader(BufReader::new(Cursor::new(data)));
        let records: Vec<_> = stream.collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(records[0].id, "SEQ1");
        assert_eq!(records[0].sequence, b"GAT");
        assert_eq!(records[0].quality, b"!!!");
    }

    #[test]
    fn test_invalid_header() {
        let data = b"SEQ_ID\nGATTACA\n+\n!!!!!!!\n";
        let mut stream = FastqStream::from_reader(BufReader::new(Cursor::new(data)));

        let result = stream.next().unwrap();
        assert!(matches!(
            result,
            Err(ReadsieveError::InvalidFastqFormat { line: 1, .. })
        ));
    }

    #[test]
    fn test_truncated_record_reports_line() {
        let data = b"@SEQ1\nGAT\n+\n!!!\n@SEQ2\nTACA\n";
        let stream = FastqStream::from_reader(BufReader::new(Cursor::new(data)));
        let result: Result<Vec<_>> = stream.collect();
        match result {
            Err(ReadsieveError::InvalidFastqFormat { line, .. }) => assert_eq!(line, 6),
            other => panic!("expected truncation error, got {other:?}"),
        }
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let data = b"@SEQ1\nGATTA\n+\n!!!\n";
        let stream = FastqStream::from_reader(BufReader::new(Cursor::new(data)));
        let result: Result<Vec<_>> = stream.collect();
        assert!(matches!(
            result,
            Err(ReadsieveError::InvalidFastqFormat { .. })
        ));
    }

    #[test]
    fn test_next_block_moves_records() {
        let mut data = Vec::new();
        for i in 0..5 {
            data.extend_from_slice(format!("@read_{}\nACGT\n+\nIIII\n", i).as_bytes());
        }
        let mut stream = FastqStream::from_reader(BufReader::new(Cursor::new(data)));

        let block = stream.next_block().unwrap().unwrap();
        assert_eq!(block.len(), 5);
        assert_eq!(block[0].id, "read_0");
        assert_eq!(block[4].id, "read_4");
        assert!(stream.next_block().unwrap().is_none());
    }

    #[test]
    fn test_writer_layout() {
        let mut writer = FastqWriter::from_writer(Vec::new());
        let record = FastqRecord::new("TEST".to_string(), b"A".to_vec(), b"A".to_vec());
        for _ in 0..3 {
            writer.write_record(&record).unwrap();
        }
        let bytes = writer.into_inner();
        assert_eq!(bytes, b"@TEST\nA\n+\nA\n@TEST\nA\n+\nA\n@TEST\nA\n+\nA\n");
    }

    #[test]
    fn test_writer_refuses_mismatched_record() {
        let mut writer = FastqWriter::from_writer(Vec::new());
        let record = FastqRecord::new("TEST".to_string(), b"ACGT".to_vec(), b"II".to_vec());
        let err = writer.write_record(&record).unwrap_err();
        assert!(matches!(err, ReadsieveError::LengthMismatch { .. }), "{err}");
    }

    // Property-based tests
    use proptest::prelude::*;

    proptest! {
        /// Valid FASTQ records parse back exactly
        #[test]
        fn test_fastq_roundtrip(
            id in "[A-Za-z0-9_]{1,50}",
            seq in "[ACGTN]{1,500}",
        ) {
            let qual = "I".repeat(seq.len());
            let fastq = format!("@{}\n{}\n+\n{}\n", id, seq, qual);

            let stream = FastqStream::from_reader(BufReader::new(Cursor::new(fastq.as_bytes())));
            let records: Vec<_> = stream.collect::<Result<Vec<_>>>().unwrap();

            prop_assert_eq!(records.len(), 1);
            prop_assert_eq!(&records[0].id, &id);
            prop_assert_eq!(&records[0].sequence, seq.as_bytes());
            prop_assert_eq!(&records[0].quality, qual.as_bytes());
        }

        /// Writing then re-reading yields byte-identical records
        #[test]
        fn test_write_read_roundtrip(
            id in "[A-Za-z0-9_]{1,50}",
            seq in "[ACGTN]{1,200}",
            scores in proptest::collection::vec(0u8..94, 1..200),
        ) {
            // align the two lengths; proptest picks them independently
            let len = seq.len().min(scores.len());
            let sequence = seq.as_bytes()[..len].to_vec();
            let quality: Vec<u8> = scores[..len].iter().map(|q| q + 33).collect();
            let original = FastqRecord::new(id, sequence, quality);

            let mut writer = FastqWriter::from_writer(Vec::new());
            writer.write_record(&original).unwrap();
            let bytes = writer.into_inner();

            let stream = FastqStream::from_reader(BufReader::new(Cursor::new(&bytes)));
            let records: Vec<_> = stream.collect::<Result<Vec<_>>>().unwrap();
            prop_assert_eq!(records.len(), 1);
            prop_assert_eq!(&records[0], &original);
        }

        /// Mismatched sequence and quality lengths are rejected
        #[test]
        fn test_fastq_rejects_length_mismatch(
            id in "[A-Za-z0-9_]{1,50}",
            seq in "[ACGT]{10,20}",
            qual_len in 21..30usize,
        ) {
            let qual = "I".repeat(qual_len);
            let fastq = format!("@{}\n{}\n+\n{}\n", id, seq, qual);

            let stream = FastqStream::from_reader(BufReader::new(Cursor::new(fastq.as_bytes())));
            let result: Result<Vec<_>> = stream.collect();

            prop_assert!(result.is_err());
        }

        /// Multiple records parse in order
        #[test]
        fn test_fastq_multiple_records(
            records_count in 1..10usize,
        ) {
            let mut fastq = String::new();
            for i in 0..records_count {
                let seq = "ACGT".repeat(10);
                let qual = "I".repeat(40);
                fastq.push_str(&format!("@read_{}\n{}\n+\n{}\n", i, seq, qual));
            }

            let stream = FastqStream::from_reader(BufReader::new(Cursor::new(fastq.as_bytes())));
            let records: Vec<_> = stream.collect::<Result<Vec<_>>>().unwrap();

            prop_assert_eq!(records.len(), records_count);
            for (i, record) in records.iter().enumerate() {
                prop_assert_eq!(&record.id, &format!("read_{}", i));
            }
        }
    }
}
