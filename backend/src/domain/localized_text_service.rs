//! Translation management service.
//!
//! Implements [`LocalizedTextQuery`] and [`LocalizedTextCommand`] on top of
//! the localized text store and the reference allocator. Blank input is
//! skipped rather than stored, so an upsert can never erase a translation;
//! removal goes through [`LocalizedTextCommand::clear`].

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    CreateTextGroupRequest, LocalizedTextCommand, LocalizedTextQuery, LocalizedTextRepository,
    LocalizedTextRepositoryError, ReferenceIdSource,
};
use crate::domain::{
    Error, LanguageCode, ReferenceAllocator, ReferenceId, TextGroup, TranslationInput,
    to_text_group,
};

/// Service implementing the translation driving ports.
pub struct LocalizedTextService<R: ?Sized, S: ?Sized> {
    texts: Arc<R>,
    allocator: ReferenceAllocator<S>,
}

impl<R: ?Sized, S: ?Sized> Clone for LocalizedTextService<R, S> {
    fn clone(&self) -> Self {
        Self {
            texts: Arc::clone(&self.texts),
            allocator: self.allocator.clone(),
        }
    }
}

impl<R: ?Sized, S: ?Sized> LocalizedTextService<R, S> {
    /// Create a new service over the given store and allocator.
    pub fn new(texts: Arc<R>, allocator: ReferenceAllocator<S>) -> Self {
        Self { texts, allocator }
    }
}

fn map_text_error(error: LocalizedTextRepositoryError) -> Error {
    match error {
        LocalizedTextRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("localized text store unavailable: {message}"))
        }
        LocalizedTextRepositoryError::Query { message } => {
            Error::internal(format!("localized text store error: {message}"))
        }
    }
}

/// Drop blank entries and keep one entry per language (the last supplied).
fn non_blank_by_language(
    translations: impl IntoIterator<Item = TranslationInput>,
) -> Vec<TranslationInput> {
    let mut by_language: BTreeMap<LanguageCode, String> = BTreeMap::new();
    for translation in translations {
        if translation.is_blank() {
            continue;
        }
        by_language.insert(translation.language_code, translation.text_content);
    }
    by_language
        .into_iter()
        .map(|(language, text)| TranslationInput::new(language, text))
        .collect()
}

impl<R, S> LocalizedTextService<R, S>
where
    R: LocalizedTextRepository + ?Sized,
    S: ReferenceIdSource + ?Sized,
{
    async fn load_group(&self, reference: ReferenceId) -> Result<TextGroup, Error> {
        let rows = self
            .texts
            .find_by_reference(reference)
            .await
            .map_err(map_text_error)?;
        Ok(to_text_group(rows))
    }
}

#[async_trait]
impl<R, S> LocalizedTextQuery for LocalizedTextService<R, S>
where
    R: LocalizedTextRepository + ?Sized,
    S: ReferenceIdSource + ?Sized,
{
    async fn get_by_reference(&self, reference: ReferenceId) -> Result<TextGroup, Error> {
        self.load_group(reference).await
    }
}

#[async_trait]
impl<R, S> LocalizedTextCommand for LocalizedTextService<R, S>
where
    R: LocalizedTextRepository + ?Sized,
    S: ReferenceIdSource + ?Sized,
{
    async fn upsert_many(
        &self,
        reference: ReferenceId,
        translations: Vec<TranslationInput>,
    ) -> Result<TextGroup, Error> {
        let supplied = translations.len();
        let entries = non_blank_by_language(translations);
        if entries.len() < supplied {
            debug!(
                reference_id = %reference,
                skipped = supplied - entries.len(),
                "skipping blank or repeated translations"
            );
        }
        if !entries.is_empty() {
            self.texts
                .upsert_many(reference, &entries)
                .await
                .map_err(map_text_error)?;
        }
        self.load_group(reference).await
    }

    async fn clear(&self, reference: ReferenceId, language: &LanguageCode) -> Result<(), Error> {
        if language.is_source() {
            return Err(
                Error::invalid_request("the source language translation cannot be removed")
                    .with_details(json!({ "field": "languageCode", "code": "source_language" })),
            );
        }
        let removed = self
            .texts
            .delete_translation(reference, language)
            .await
            .map_err(map_text_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "no {language} translation for reference {reference}"
            )))
        }
    }

    async fn create_group(&self, request: CreateTextGroupRequest) -> Result<ReferenceId, Error> {
        if request.source_text.trim().is_empty() {
            return Err(Error::invalid_request("ptText must not be blank")
                .with_details(json!({ "field": "ptText", "code": "blank" })));
        }

        let reference = self.allocator.allocate().await?;
        let source = TranslationInput::new(LanguageCode::source(), request.source_text);
        let entries = non_blank_by_language(
            request
                .translations
                .into_iter()
                .filter(|translation| !translation.language_code.is_source())
                .chain(std::iter::once(source)),
        );
        self.texts
            .upsert_many(reference, &entries)
            .await
            .map_err(map_text_error)?;

        info!(reference_id = %reference, languages = entries.len(), "text group created");
        Ok(reference)
    }

    async fn delete_group(&self, reference: ReferenceId) -> Result<u64, Error> {
        let removed = self
            .texts
            .delete_group(reference)
            .await
            .map_err(map_text_error)?;
        if removed == 0 {
            return Err(Error::not_found(format!(
                "no text group with reference {reference}"
            )));
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "localized_text_service_tests.rs"]
mod tests;
