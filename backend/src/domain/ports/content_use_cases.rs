//! Driving ports for content reads and writes.
//!
//! Inbound adapters depend on these traits rather than on concrete services.
//! Every read takes the requested language explicitly; there is no implicit
//! default below the adapter.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{ContentEntity, ContentFilter, Error, LanguageCode, Localized};

/// Read side of one content kind, used by HTTP handlers.
#[async_trait]
pub trait ContentQuery<T: ContentEntity>: Send + Sync {
    /// One live row with its text resolved; `NotFound` when absent.
    async fn get(&self, id: i64, language: &LanguageCode) -> Result<Localized<T>, Error>;

    /// One page with text resolved in a single batch.
    async fn list(
        &self,
        request: &PageRequest,
        filter: ContentFilter,
        language: &LanguageCode,
    ) -> Result<Paginated<Localized<T>>, Error>;

    /// Every live row matching `filter`, text resolved in a single batch.
    async fn list_all(
        &self,
        filter: ContentFilter,
        language: &LanguageCode,
    ) -> Result<Vec<Localized<T>>, Error>;

    /// Number of live rows matching `filter`.
    async fn count(&self, filter: ContentFilter) -> Result<u64, Error>;
}

/// Write side of one content kind. Every returned row has its text resolved.
#[async_trait]
pub trait ContentCommand<T: ContentEntity>: Send + Sync {
    /// Validate the draft, check its parents exist and insert it.
    async fn create(&self, draft: T::Draft, language: &LanguageCode)
    -> Result<Localized<T>, Error>;

    /// Create every draft or none of them.
    async fn create_many(
        &self,
        drafts: Vec<T::Draft>,
        language: &LanguageCode,
    ) -> Result<Vec<Localized<T>>, Error>;

    /// Apply a partial update; `NotFound` when no live row has `id`.
    async fn update(
        &self,
        id: i64,
        patch: T::Patch,
        language: &LanguageCode,
    ) -> Result<Localized<T>, Error>;

    /// Hard delete; `NotFound` when absent, `Conflict` while still referenced.
    async fn delete(&self, id: i64) -> Result<(), Error>;

    /// Returns the number of rows removed.
    async fn delete_many(&self, ids: &[i64]) -> Result<u64, Error>;

    /// Soft delete; `NotFound` when no live row has `id`.
    async fn archive(&self, id: i64) -> Result<(), Error>;
}
