//! Output destinations for streaming writes
//!
//! `DataSink` is the write counterpart to `DataSource`. A sink only names
//! the destination; [`crate::io::CompressedWriter`] decides the encoding
//! from its extension, since unlike input there are no bytes to sniff.

use std::path::{Path, PathBuf};

/// Output destination for streaming writes
#[derive(Debug, Clone)]
pub enum DataSink {
    /// Write to a local file path
    ///
    /// Compression is chosen by extension: `.gz`, `.bgz` and `.gzip`
    /// select gzip, anything else is written uncompressed.
    Local(PathBuf),

    /// Write to standard output, always uncompressed
    ///
    /// Useful for shell pipelines:
    /// ```bash
    /// readsieve 'min_length:50' reads.fq.gz | head -20
    /// ```
    Stdout,
}

impl DataSink {
    /// Create a sink from a file path
    ///
    /// # Example
    ///
    /// ```
    /// use readsieve::io::DataSink;
    ///
    /// let sink = DataSink::from_path("kept.fq.gz");
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::Local(path.as_ref().to_path_buf())
    }

    /// Create a sink for standard output
    pub fn stdout() -> Self {
        Self::Stdout
    }

    /// Create a sink from a CLI argument, where `-` names stdout
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdout
        } else {
            Self::from_path(arg)
        }
    }

    /// File extension if this is a local sink
    pub(crate) fn extension(&self) -> Option<&str> {
        match self {
            Self::Local(path) => path.extension().and_then(|s| s.to_str()),
            Self::Stdout => None,
        }
    }

    /// Whether this sink wants compressed output
    pub fn is_compressed(&self) -> bool {
        matches!(self.extension(), Some("gz") | Some("bgz") | Some("gzip"))
    }
}
