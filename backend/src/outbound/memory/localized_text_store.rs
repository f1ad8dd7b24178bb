//! In-memory localized text store and reference id source.
//!
//! One struct serves both ports so that writing a group through
//! `upsert_many` also marks its reference id as taken, mirroring the
//! `text_references` table in PostgreSQL.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::ports::{
    LocalizedTextRepository, LocalizedTextRepositoryError, ReferenceIdSource,
    ReferenceIdSourceError,
};
use crate::domain::{LanguageCode, LocalizedText, ReferenceId, TranslationInput};

#[derive(Default)]
struct Store {
    next_text_id: i64,
    next_reference: i64,
    reserved: BTreeSet<ReferenceId>,
    rows: BTreeMap<(ReferenceId, LanguageCode), LocalizedText>,
}

/// Text groups and reference reservations held in process memory.
#[derive(Default)]
pub struct MemoryLocalizedTextRepository {
    store: RwLock<Store>,
}

impl MemoryLocalizedTextRepository {
    /// Mark ids as already used, as imported legacy rows would be.
    pub async fn reserve_existing(&self, references: impl IntoIterator<Item = ReferenceId>) {
        let mut store = self.store.write().await;
        store.reserved.extend(references);
    }
}

#[async_trait]
impl LocalizedTextRepository for MemoryLocalizedTextRepository {
    async fn find_by_reference(
        &self,
        reference: ReferenceId,
    ) -> Result<Vec<LocalizedText>, LocalizedTextRepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .rows
            .values()
            .filter(|row| row.reference_id == reference)
            .cloned()
            .collect())
    }

    async fn find_by_references(
        &self,
        references: &[ReferenceId],
        languages: &[LanguageCode],
    ) -> Result<Vec<LocalizedText>, LocalizedTextRepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .rows
            .values()
            .filter(|row| {
                references.contains(&row.reference_id) && languages.contains(&row.language_code)
            })
            .cloned()
            .collect())
    }

    async fn upsert_many(
        &self,
        reference: ReferenceId,
        entries: &[TranslationInput],
    ) -> Result<(), LocalizedTextRepositoryError> {
        let mut store = self.store.write().await;
        let now = Utc::now();
        store.reserved.insert(reference);
        for entry in entries {
            let key = (reference, entry.language_code.clone());
            if let Some(row) = store.rows.get_mut(&key) {
                row.text_content.clone_from(&entry.text_content);
                row.updated_at = now;
                continue;
            }
            store.next_text_id += 1;
            let row = LocalizedText {
                text_id: store.next_text_id,
                reference_id: reference,
                language_code: entry.language_code.clone(),
                text_content: entry.text_content.clone(),
                created_at: now,
                updated_at: now,
            };
            store.rows.insert(key, row);
        }
        Ok(())
    }

    async fn delete_translation(
        &self,
        reference: ReferenceId,
        language: &LanguageCode,
    ) -> Result<bool, LocalizedTextRepositoryError> {
        let mut store = self.store.write().await;
        Ok(store
            .rows
            .remove(&(reference, language.clone()))
            .is_some())
    }

    async fn delete_group(
        &self,
        reference: ReferenceId,
    ) -> Result<u64, LocalizedTextRepositoryError> {
        let mut store = self.store.write().await;
        let before = store.rows.len();
        store.rows.retain(|(row_reference, _), _| *row_reference != reference);
        Ok((before - store.rows.len()) as u64)
    }
}

#[async_trait]
impl ReferenceIdSource for MemoryLocalizedTextRepository {
    async fn next_candidate(&self) -> Result<ReferenceId, ReferenceIdSourceError> {
        let mut store = self.store.write().await;
        store.next_reference += 1;
        ReferenceId::new(store.next_reference)
            .map_err(|error| ReferenceIdSourceError::query(error.to_string()))
    }

    async fn reserve(&self, candidate: ReferenceId) -> Result<bool, ReferenceIdSourceError> {
        let mut store = self.store.write().await;
        Ok(store.reserved.insert(candidate))
    }
}
