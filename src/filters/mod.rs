//! Record filtering: predicates, the name registry and the filter chain
//!
//! A filter run has two phases. Compilation turns the textual expression
//! (`min_length:50|mean_quality:25`) into a [`FilterChain`] of bound
//! [`Predicate`] values, rejecting malformed input before any record is
//! read. Evaluation then asks the chain about one record at a time;
//! records failing any predicate are discarded by the caller.
//!
//! Predicate names are resolved through an explicit registration table in
//! [`predicate`], so new primitives slot in without touching the compiler
//! or the evaluator.

pub mod chain;
pub mod predicate;

pub use chain::FilterChain;
pub use predicate::Predicate;
