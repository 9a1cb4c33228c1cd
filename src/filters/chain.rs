//! Filter chain compilation and evaluation
//!
//! The textual form is `name:parameter` entries joined by `|`, evaluated
//! left to right as a short-circuit AND. Ordering never changes the
//! verdict (AND over pure predicates is commutative); it only decides
//! which predicate gets to reject a record first, so put cheap length
//! checks ahead of quality metrics in hot pipelines.

use crate::error::{ReadsieveError, Result};
use crate::types::FastqRecord;

use super::predicate::{lookup, registered_names, Predicate};

/// A compiled, reusable filter chain
///
/// Immutable after compilation and `Send + Sync`: worker threads share one
/// chain by reference during parallel evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    predicates: Vec<Predicate>,
}

impl FilterChain {
    /// An empty chain, which accepts every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a textual filter expression
    ///
    /// Grammar: `entry ("|" entry)*` with each entry `name ":" parameter`.
    /// Names are case-sensitive and whitespace is not tolerated. Fails
    /// without touching any record when a name is unknown, a parameter is
    /// missing or malformed, or the separator grammar is violated (empty
    /// entries from leading, trailing or doubled `|`).
    ///
    /// # Examples
    ///
    /// ```
    /// use readsieve::FilterChain;
    ///
    /// let chain = FilterChain::compile("min_length:50|mean_quality:25.5")?;
    /// assert_eq!(chain.len(), 2);
    /// # Ok::<(), readsieve::ReadsieveError>(())
    /// ```
    pub fn compile(expression: &str) -> Result<Self> {
        let mut chain = Self::new();
        for entry in expression.split('|') {
            if entry.is_empty() {
                return Err(ReadsieveError::InvalidFilterExpression {
                    msg: format!("empty entry in '{}'", expression),
                });
            }
            let (name, parameter) =
                entry
                    .split_once(':')
                    .ok_or_else(|| ReadsieveError::InvalidFilterExpression {
                        msg: format!("expected 'name:parameter', got '{}'", entry),
                    })?;
            let build = lookup(name).ok_or_else(|| ReadsieveError::InvalidFilterExpression {
                msg: format!(
                    "unknown filter '{}' (known filters: {})",
                    name,
                    known_filter_list()
                ),
            })?;
            chain.push(build(parameter)?);
        }
        Ok(chain)
    }

    /// Append a predicate to the chain
    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// Number of predicates in the chain
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Whether the chain has no predicates
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// The compiled predicates, in evaluation order
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Decide whether `record` survives every predicate
    ///
    /// Logical AND with short-circuit evaluation in compile order; an
    /// empty chain is vacuously true. The only error case is a quality
    /// predicate meeting a record it cannot score (zero-length read or
    /// sequence/quality length mismatch); such an error aborts the
    /// evaluation and must not be treated as a discard.
    pub fn accepts(&self, record: &FastqRecord) -> Result<bool> {
        for predicate in &self.predicates {
            if !predicate.passes(record)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn known_filter_list() -> String {
    registered_names().collect::<Vec<_>>().join(", ")
}
