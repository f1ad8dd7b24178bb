//! PostgreSQL-backed favorite/visited memberships.
//!
//! Uniqueness comes from the `user_associations_membership_key` index, so an
//! insert racing another insert for the same key affects zero rows instead of
//! creating a duplicate.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AssociationRepository, AssociationRepositoryError};
use crate::domain::{Association, AssociationKey, ContentKind, Relation, UserId};

use super::diesel_helpers::{collect_rows, map_basic_diesel_error, map_pool_error_message};
use super::models::{NewUserAssociationRow, UserAssociationRow};
use super::pool::{DbPool, PoolError};
use super::schema::user_associations;

fn map_pool_error(error: PoolError) -> AssociationRepositoryError {
    AssociationRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> AssociationRepositoryError {
    map_basic_diesel_error(
        error,
        AssociationRepositoryError::query,
        AssociationRepositoryError::connection,
    )
}

/// Diesel-backed implementation of the `AssociationRepository` port.
#[derive(Clone)]
pub struct DieselAssociationRepository {
    pool: DbPool,
}

impl DieselAssociationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssociationRepository for DieselAssociationRepository {
    async fn insert(&self, key: &AssociationKey) -> Result<bool, AssociationRepositoryError> {
        let row = NewUserAssociationRow::from(key);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let inserted = diesel::insert_into(user_associations::table)
            .values(&row)
            .on_conflict((
                user_associations::user_id,
                user_associations::relation,
                user_associations::target_kind,
                user_associations::target_id,
            ))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(inserted == 1)
    }

    async fn delete(&self, key: &AssociationKey) -> Result<bool, AssociationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            user_associations::table
                .filter(user_associations::user_id.eq(key.user_id.get()))
                .filter(user_associations::relation.eq(key.relation.as_str()))
                .filter(user_associations::target_kind.eq(key.kind.as_str()))
                .filter(user_associations::target_id.eq(key.target_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn list(
        &self,
        user_id: UserId,
        relation: Relation,
        kind: ContentKind,
    ) -> Result<Vec<Association>, AssociationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserAssociationRow> = user_associations::table
            .filter(user_associations::user_id.eq(user_id.get()))
            .filter(user_associations::relation.eq(relation.as_str()))
            .filter(user_associations::target_kind.eq(kind.as_str()))
            .order_by((user_associations::created_at.desc(), user_associations::id.desc()))
            .select(UserAssociationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        collect_rows(rows, AssociationRepositoryError::query)
    }
}
