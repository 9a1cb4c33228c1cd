//! Input/output layer: FASTQ streaming, compression, sources and sinks
//!
//! Everything here is streaming. Readers hand out one record (or one
//! block) at a time and writers push bytes straight through, so memory
//! use does not scale with file size. Gzip input is detected from file
//! content, gzip output from the sink's extension.

pub mod compression;
pub mod fastq;
pub mod sink;

pub use compression::{CompressedReader, CompressedWriter, DataSource};
pub use fastq::{FastqStream, FastqWriter, BLOCK_SIZE};
pub use sink::DataSink;
