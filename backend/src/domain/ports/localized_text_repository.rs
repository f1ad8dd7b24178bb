//! Driven port for the localized text store.
//!
//! Rows are keyed by `(reference_id, language_code)`, which adapters must
//! enforce as unique. Lookups never fail because a reference or language is
//! missing; they simply return fewer rows.

use async_trait::async_trait;

use crate::domain::{LanguageCode, LocalizedText, ReferenceId, TranslationInput};

use super::define_port_error;

define_port_error! {
    /// Errors raised by localized text store adapters.
    pub enum LocalizedTextRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "localized text store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "localized text store query failed: {message}",
    }
}

/// Storage of language variants keyed by `(reference, language)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocalizedTextRepository: Send + Sync {
    /// Every stored language of one group, ordered by language code.
    async fn find_by_reference(
        &self,
        reference: ReferenceId,
    ) -> Result<Vec<LocalizedText>, LocalizedTextRepositoryError>;

    /// Rows whose reference is in `references` and whose language is in
    /// `languages`, fetched with a single set-membership query.
    async fn find_by_references(
        &self,
        references: &[ReferenceId],
        languages: &[LanguageCode],
    ) -> Result<Vec<LocalizedText>, LocalizedTextRepositoryError>;

    /// Insert or overwrite one row per entry. Entries must have distinct
    /// languages; the write is atomic across entries.
    async fn upsert_many(
        &self,
        reference: ReferenceId,
        entries: &[TranslationInput],
    ) -> Result<(), LocalizedTextRepositoryError>;

    /// Remove one language row. Returns `false` when it did not exist.
    async fn delete_translation(
        &self,
        reference: ReferenceId,
        language: &LanguageCode,
    ) -> Result<bool, LocalizedTextRepositoryError>;

    /// Remove every language row of a group, returning the number removed.
    async fn delete_group(&self, reference: ReferenceId)
    -> Result<u64, LocalizedTextRepositoryError>;
}
