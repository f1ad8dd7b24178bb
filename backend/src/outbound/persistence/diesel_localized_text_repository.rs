//! PostgreSQL-backed localized text store and reference id source.
//!
//! Every reference id in use has a row in `text_references`; writing a group
//! claims its id there first, so the allocator's reservation and ad-hoc
//! upserts against an explicit id can never hand the same id out twice.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{
    LocalizedTextRepository, LocalizedTextRepositoryError, ReferenceIdSource,
    ReferenceIdSourceError,
};
use crate::domain::{LanguageCode, LocalizedText, ReferenceId, TranslationInput};

use super::diesel_helpers::{collect_rows, map_basic_diesel_error, map_pool_error_message};
use super::models::{LocalizedTextRow, NewLocalizedTextRow};
use super::pool::{DbPool, PoolError};
use super::schema::{localized_texts, text_references};

diesel::define_sql_function! {
    /// PostgreSQL `nextval` for sequence-backed candidates.
    fn nextval(sequence: Text) -> BigInt;
}

const REFERENCE_SEQUENCE: &str = "text_references_reference_id_seq";

fn map_pool_error(error: PoolError) -> LocalizedTextRepositoryError {
    LocalizedTextRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> LocalizedTextRepositoryError {
    map_basic_diesel_error(
        error,
        LocalizedTextRepositoryError::query,
        LocalizedTextRepositoryError::connection,
    )
}

/// Diesel-backed implementation of the `LocalizedTextRepository` port.
#[derive(Clone)]
pub struct DieselLocalizedTextRepository {
    pool: DbPool,
}

impl DieselLocalizedTextRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocalizedTextRepository for DieselLocalizedTextRepository {
    async fn find_by_reference(
        &self,
        reference: ReferenceId,
    ) -> Result<Vec<LocalizedText>, LocalizedTextRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LocalizedTextRow> = localized_texts::table
            .filter(localized_texts::reference_id.eq(reference.get()))
            .select(LocalizedTextRow::as_select())
            .order_by(localized_texts::language_code)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        collect_rows(rows, LocalizedTextRepositoryError::query)
    }

    async fn find_by_references(
        &self,
        references: &[ReferenceId],
        languages: &[LanguageCode],
    ) -> Result<Vec<LocalizedText>, LocalizedTextRepositoryError> {
        if references.is_empty() || languages.is_empty() {
            return Ok(Vec::new());
        }
        let reference_ids: Vec<i64> = references.iter().map(|id| id.get()).collect();
        let language_codes: Vec<&str> = languages.iter().map(LanguageCode::as_str).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LocalizedTextRow> = localized_texts::table
            .filter(localized_texts::reference_id.eq_any(&reference_ids))
            .filter(localized_texts::language_code.eq_any(&language_codes))
            .select(LocalizedTextRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(
            references = reference_ids.len(),
            languages = language_codes.len(),
            rows = rows.len(),
            "batched text lookup"
        );
        collect_rows(rows, LocalizedTextRepositoryError::query)
    }

    async fn upsert_many(
        &self,
        reference: ReferenceId,
        entries: &[TranslationInput],
    ) -> Result<(), LocalizedTextRepositoryError> {
        if entries.is_empty() {
            return Ok(());
        }
        let reference_id = reference.get();
        let new_rows: Vec<NewLocalizedTextRow<'_>> = entries
            .iter()
            .map(|entry| NewLocalizedTextRow {
                reference_id,
                language_code: entry.language_code.as_str(),
                text_content: entry.text_content.as_str(),
            })
            .collect();
        let now = Utc::now();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(text_references::table)
                    .values(text_references::reference_id.eq(reference_id))
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
                diesel::insert_into(localized_texts::table)
                    .values(&new_rows)
                    .on_conflict((localized_texts::reference_id, localized_texts::language_code))
                    .do_update()
                    .set((
                        localized_texts::text_content.eq(excluded(localized_texts::text_content)),
                        localized_texts::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete_translation(
        &self,
        reference: ReferenceId,
        language: &LanguageCode,
    ) -> Result<bool, LocalizedTextRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            localized_texts::table
                .filter(localized_texts::reference_id.eq(reference.get()))
                .filter(localized_texts::language_code.eq(language.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn delete_group(
        &self,
        reference: ReferenceId,
    ) -> Result<u64, LocalizedTextRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // The text_references row stays so the id is never handed out again.
        let deleted = diesel::delete(
            localized_texts::table.filter(localized_texts::reference_id.eq(reference.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted as u64)
    }
}

/// Reference ids drawn from the `text_references` sequence and claimed by
/// inserting into `text_references`.
#[derive(Clone)]
pub struct DieselReferenceIdSource {
    pool: DbPool,
}

impl DieselReferenceIdSource {
    /// Create a new source with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_source_pool_error(error: PoolError) -> ReferenceIdSourceError {
    ReferenceIdSourceError::connection(map_pool_error_message(error))
}

fn map_source_diesel_error(error: diesel::result::Error) -> ReferenceIdSourceError {
    map_basic_diesel_error(
        error,
        ReferenceIdSourceError::query,
        ReferenceIdSourceError::connection,
    )
}

#[async_trait]
impl ReferenceIdSource for DieselReferenceIdSource {
    async fn next_candidate(&self) -> Result<ReferenceId, ReferenceIdSourceError> {
        let mut conn = self.pool.get().await.map_err(map_source_pool_error)?;

        let value: i64 = diesel::select(nextval(REFERENCE_SEQUENCE))
            .get_result(&mut conn)
            .await
            .map_err(map_source_diesel_error)?;

        ReferenceId::new(value).map_err(|error| ReferenceIdSourceError::query(error.to_string()))
    }

    async fn reserve(&self, candidate: ReferenceId) -> Result<bool, ReferenceIdSourceError> {
        let mut conn = self.pool.get().await.map_err(map_source_pool_error)?;

        let inserted = diesel::insert_into(text_references::table)
            .values(text_references::reference_id.eq(candidate.get()))
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_source_diesel_error)?;

        Ok(inserted == 1)
    }
}
