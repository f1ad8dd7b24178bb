//! Driven port for favorite/visited memberships.
//!
//! Adapters enforce uniqueness of [`AssociationKey`] so that concurrent adds
//! can never produce duplicate rows.

use async_trait::async_trait;

use crate::domain::{Association, AssociationKey, ContentKind, Relation, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by association repository adapters.
    pub enum AssociationRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "association repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "association repository query failed: {message}",
    }
}

/// Storage of user memberships. At most one row exists per key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssociationRepository: Send + Sync {
    /// Insert the membership. Returns `false` when it already existed.
    async fn insert(&self, key: &AssociationKey) -> Result<bool, AssociationRepositoryError>;

    /// Remove the membership. Returns `false` when it did not exist.
    async fn delete(&self, key: &AssociationKey) -> Result<bool, AssociationRepositoryError>;

    /// Memberships of one user for one relation and kind, newest first.
    async fn list(
        &self,
        user_id: UserId,
        relation: Relation,
        kind: ContentKind,
    ) -> Result<Vec<Association>, AssociationRepositoryError>;
}
