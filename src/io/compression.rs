//! Transparent compression for record streams
//!
//! Input compression is detected by content, not by name: the reader peeks
//! at the first two bytes and unwraps gzip when it sees the magic pair, so
//! a misnamed `.fq` that is really gzipped still parses. Decompression
//! goes through [`MultiGzDecoder`] because real-world FASTQ is often
//! written by bgzip or pigz as many concatenated gzip members, and a
//! single-member decoder would stop silently at the first boundary.
//!
//! Output compression is chosen by the sink's extension, since there is no
//! content to sniff on the way out. Compressed writers must be closed with
//! [`CompressedWriter::finish`]; dropping one mid-stream loses the gzip
//! trailer.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::Result;
use crate::io::sink::DataSink;

const GZIP_MAGIC: [u8; 2] = [31, 139];

/// Input origin for a record stream
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Local file path
    Local(PathBuf),

    /// Standard input
    ///
    /// Lets the tool sit in a shell pipeline:
    /// ```bash
    /// zcat lane1.fq.gz | readsieve 'min_length:50' -
    /// ```
    Stdin,
}

impl DataSource {
    /// Create a local file data source
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        DataSource::Local(path.as_ref().to_path_buf())
    }

    /// Create a data source from a CLI argument, where `-` names stdin
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            DataSource::Stdin
        } else {
            DataSource::from_path(arg)
        }
    }

    /// Open the data source and return a buffered reader
    pub fn open(&self) -> Result<Box<dyn BufRead + Send>> {
        match self {
            DataSource::Local(path) => {
                let file = File::open(path)?;
                Ok(Box::new(BufReader::new(file)))
            }
            DataSource::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
        }
    }
}

/// Buffered reader with gzip auto-detection
///
/// # Example
///
/// ```no_run
/// use readsieve::io::{CompressedReader, DataSource};
///
/// # fn main() -> readsieve::Result<()> {
/// let source = DataSource::from_path("lane1.fq.gz");
/// let reader = CompressedReader::new(source)?;
/// // implements BufRead, feed it to the FASTQ parser
/// # Ok(())
/// # }
/// ```
pub struct CompressedReader {
    inner: Box<dyn BufRead + Send>,
}

impl CompressedReader {
    /// Open a data source, unwrapping gzip when the content calls for it
    pub fn new(source: DataSource) -> Result<Self> {
        let mut reader = source.open()?;

        // Peek without consuming; the decoder needs to see the magic too
        let first_bytes = {
            let peeked = reader.fill_buf()?;
            if peeked.len() >= 2 {
                [peeked[0], peeked[1]]
            } else if peeked.len() == 1 {
                [peeked[0], 0]
            } else {
                [0, 0]
            }
        };

        if first_bytes == GZIP_MAGIC {
            Ok(Self {
                inner: Box::new(BufReader::new(MultiGzDecoder::new(reader))),
            })
        } else {
            Ok(Self { inner: reader })
        }
    }
}

impl Read for CompressedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for CompressedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

/// Buffered writer with extension-driven gzip compression
///
/// # Example
///
/// ```no_run
/// use readsieve::io::{CompressedWriter, DataSink};
/// use std::io::Write;
///
/// # fn main() -> std::io::Result<()> {
/// let sink = DataSink::from_path("kept.fq.gz");
/// let mut writer = CompressedWriter::new(sink)?;
/// writer.write_all(b"@read1\nACGT\n+\nIIII\n")?;
/// writer.finish()?; // finalizes the gzip trailer
/// # Ok(())
/// # }
/// ```
pub enum CompressedWriter {
    /// Uncompressed writer with buffering
    Plain(BufWriter<Box<dyn Write>>),

    /// Gzip writer, compatible with all gzip tools
    Gzip(GzEncoder<BufWriter<Box<dyn Write>>>),
}

impl CompressedWriter {
    /// Create a writer for `sink` with the default gzip level
    pub fn new(sink: DataSink) -> io::Result<Self> {
        Self::with_level(sink, Compression::default().level())
    }

    /// Create a writer for `sink` with an explicit gzip level (0-9)
    ///
    /// The level only matters when the sink's extension selects gzip.
    pub fn with_level(sink: DataSink, level: u32) -> io::Result<Self> {
        let compressed = sink.is_compressed();
        let raw: Box<dyn Write> = match sink {
            DataSink::Local(path) => Box::new(File::create(path)?),
            DataSink::Stdout => Box::new(io::stdout()),
        };
        if compressed {
            Ok(Self::Gzip(GzEncoder::new(
                BufWriter::new(raw),
                Compression::new(level),
            )))
        } else {
            Ok(Self::Plain(BufWriter::new(raw)))
        }
    }

    /// Finish writing and consume the writer
    ///
    /// Flushes buffered data and, for gzip, writes the stream trailer.
    /// Always call this rather than relying on `Drop`: `finish` surfaces
    /// the errors `Drop` would have to swallow.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Self::Plain(mut writer) => writer.flush(),
            Self::Gzip(encoder) => {
                let mut inner = encoder.finish()?;
                inner.flush()
            }
        }
    }
}

impl Write for CompressedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(writer) => writer.write(buf),
            Self::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(writer) => writer.flush(),
            Self::Gzip(encoder) => encoder.flush(),
        }
    }
}
