//! Driven port supplying and reserving reference id candidates.
//!
//! Candidates come from a monotonic source (a database sequence in
//! production). A candidate only becomes an allocated id once
//! [`ReferenceIdSource::reserve`] succeeds, which the store guarantees can
//! happen at most once per id.

use async_trait::async_trait;

use crate::domain::ReferenceId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by reference id sources.
    pub enum ReferenceIdSourceError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "reference id source connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "reference id source query failed: {message}",
    }
}

/// Supplier and registry of text reference ids.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceIdSource: Send + Sync {
    /// Next candidate id. Never returns the same value twice.
    async fn next_candidate(&self) -> Result<ReferenceId, ReferenceIdSourceError>;

    /// Atomically claim `candidate`. Returns `false` if it was already taken
    /// (for example by rows imported with legacy ids).
    async fn reserve(&self, candidate: ReferenceId) -> Result<bool, ReferenceIdSourceError>;
}
