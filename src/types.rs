//! Common types used throughout readsieve

/// A FASTQ record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    /// Sequence identifier (without '@' prefix)
    pub id: String,
    /// DNA/RNA sequence
    pub sequence: Vec<u8>,
    /// Quality scores (Phred+33)
    pub quality: Vec<u8>,
}

impl FastqRecord {
    /// Create a new FASTQ record
    pub fn new(id: String, sequence: Vec<u8>, quality: Vec<u8>) -> Self {
        Self { id, sequence, quality }
    }

    /// Read length in bases
    ///
    /// # Examples
    ///
    /// ```
    /// use readsieve::FastqRecord;
    ///
    /// let record = FastqRecord::new("read1".to_string(), b"ACGT".to_vec(), b"IIII".to_vec());
    /// assert_eq!(record.len(), 4);
    /// ```
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Check if the record has an empty sequence
    ///
    /// Returns `true` if the sequence length is zero. Zero-length reads do
    /// occur in real data (adapter dimers collapse to nothing after
    /// trimming) and the quality filters refuse to score them, so screen
    /// them out with a length filter first.
    ///
    /// # Examples
    ///
    /// ```
    /// use readsieve::FastqRecord;
    ///
    /// let empty = FastqRecord::new("read1".to_string(), Vec::new(), Vec::new());
    /// assert!(empty.is_empty());
    ///
    /// let non_empty = FastqRecord::new("read2".to_string(), b"ACGT".to_vec(), b"IIII".to_vec());
    /// assert!(!non_empty.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
