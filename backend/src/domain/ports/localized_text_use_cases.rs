//! Driving ports for translation management.

use async_trait::async_trait;

use crate::domain::{Error, LanguageCode, ReferenceId, TextGroup, TranslationInput};

/// Request to author a new text group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTextGroupRequest {
    /// Text in the source language (`pt`); must not be blank.
    pub source_text: String,
    /// Additional languages; blank entries are skipped.
    pub translations: Vec<TranslationInput>,
}

/// Read access to text groups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocalizedTextQuery: Send + Sync {
    /// `{languageCode: text}` for every stored language. Unknown references
    /// yield an empty map.
    async fn get_by_reference(&self, reference: ReferenceId) -> Result<TextGroup, Error>;
}

/// Administrative writes to text groups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocalizedTextCommand: Send + Sync {
    /// Insert or overwrite the non-blank entries, returning the group as
    /// stored afterwards. Blank entries are skipped, never cleared.
    async fn upsert_many(
        &self,
        reference: ReferenceId,
        translations: Vec<TranslationInput>,
    ) -> Result<TextGroup, Error>;

    /// Remove one translation. `NotFound` when absent; the source language
    /// cannot be cleared.
    async fn clear(&self, reference: ReferenceId, language: &LanguageCode) -> Result<(), Error>;

    /// Allocate a fresh reference id and store the group under it.
    async fn create_group(&self, request: CreateTextGroupRequest) -> Result<ReferenceId, Error>;

    /// Remove every language of a group, returning the number of rows removed.
    async fn delete_group(&self, reference: ReferenceId) -> Result<u64, Error>;
}
