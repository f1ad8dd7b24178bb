//! Generic driven port for content persistence.
//!
//! One trait serves every content kind; adapters implement it once per
//! entity. Soft-deleted rows are invisible to every read and to `update`.
//! Lookups report absence with `None`/`false` rather than an error.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{ContentEntity, ContentFilter};

use super::define_port_error;

define_port_error! {
    /// Errors raised by content repository adapters.
    pub enum ContentRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "content repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "content repository query failed: {message}",
        /// A foreign key constraint rejected the write.
        ForeignKey { message: String } =>
            "content is referenced or references missing rows: {message}",
        /// A check constraint rejected the write.
        Constraint { message: String } =>
            "content violates a constraint: {message}",
        /// The requested sort field has no backing column.
        UnsupportedSort { field: String } =>
            "cannot sort by {field}",
    }
}

/// Storage for one content kind. Soft-deleted rows are invisible to every
/// read, including `exists` and `count`.
#[async_trait]
pub trait ContentRepository<T: ContentEntity>: Send + Sync {
    /// One live row, or `None`.
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, ContentRepositoryError>;

    /// Rows for the given ids, ordered by id. Missing ids are skipped.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<T>, ContentRepositoryError>;

    /// Every live row matching `filter`, ordered by id.
    async fn find_all(&self, filter: ContentFilter) -> Result<Vec<T>, ContentRepositoryError>;

    /// One page ordered by the requested sort (default `id ASC`) with `id ASC`
    /// as tiebreak. Pages past the end are empty with accurate totals.
    async fn find_page(
        &self,
        request: &PageRequest,
        filter: ContentFilter,
    ) -> Result<Paginated<T>, ContentRepositoryError>;

    /// Whether a live row has `id`.
    async fn exists(&self, id: i64) -> Result<bool, ContentRepositoryError>;

    /// Number of live rows matching `filter`.
    async fn count(&self, filter: ContentFilter) -> Result<u64, ContentRepositoryError>;

    /// Insert one row, stamping both timestamps.
    async fn create(&self, draft: T::Draft) -> Result<T, ContentRepositoryError>;

    /// Insert every draft atomically.
    async fn create_many(&self, drafts: Vec<T::Draft>) -> Result<Vec<T>, ContentRepositoryError>;

    /// Apply `patch`; `None` when no live row has `id`.
    async fn update(&self, id: i64, patch: T::Patch) -> Result<Option<T>, ContentRepositoryError>;

    /// Hard delete. Returns `false` when nothing was removed.
    async fn delete(&self, id: i64) -> Result<bool, ContentRepositoryError>;

    /// Hard delete every listed row, returning how many went.
    async fn delete_many(&self, ids: &[i64]) -> Result<u64, ContentRepositoryError>;

    /// Mark the row deleted while keeping it for audit. Returns `false` when
    /// no live row has `id`.
    async fn soft_delete(&self, id: i64) -> Result<bool, ContentRepositoryError>;
}
