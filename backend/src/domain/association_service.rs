//! Favorite/visited membership service.
//!
//! One generic service covers every relation and target kind; the
//! relation is fixed at construction. Membership identity is the
//! [`AssociationKey`], which the store keeps unique, so concurrent adds or
//! toggles can never leave duplicate rows behind.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::content_service::map_content_error;
use crate::domain::ports::{
    AssociationRepository, AssociationRepositoryError, ContentRepository, UserAssociations,
};
use crate::domain::{
    AssociationKey, ContentEntity, Error, LanguageCode, Localized, Relation, TranslationResolver,
    UserId,
};

fn map_association_error(error: AssociationRepositoryError) -> Error {
    match error {
        AssociationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("association repository unavailable: {message}"))
        }
        AssociationRepositoryError::Query { message } => {
            Error::internal(format!("association repository error: {message}"))
        }
    }
}

/// Case-insensitive display order, unresolved text last, then id.
fn by_display_text<T: ContentEntity>(a: &Localized<T>, b: &Localized<T>) -> Ordering {
    let left = a.display_text().map(str::to_lowercase);
    let right = b.display_text().map(str::to_lowercase);
    let by_text = match (left, right) {
        (Some(l), Some(r)) => l.cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_text.then_with(|| a.entity.id().cmp(&b.entity.id()))
}

/// Service implementing [`UserAssociations`] for one relation and kind.
pub struct AssociationService<T: ContentEntity> {
    associations: Arc<dyn AssociationRepository>,
    targets: Arc<dyn ContentRepository<T>>,
    resolver: TranslationResolver,
    relation: Relation,
}

impl<T: ContentEntity> AssociationService<T> {
    /// Service for one `relation` over the targets stored in `targets`.
    pub fn new(
        associations: Arc<dyn AssociationRepository>,
        targets: Arc<dyn ContentRepository<T>>,
        resolver: TranslationResolver,
        relation: Relation,
    ) -> Self {
        Self {
            associations,
            targets,
            resolver,
            relation,
        }
    }

    fn key(&self, user_id: UserId, target_id: i64) -> AssociationKey {
        AssociationKey::new(user_id, self.relation, T::KIND, target_id)
    }

    async fn ensure_target(&self, target_id: i64) -> Result<(), Error> {
        let exists = self
            .targets
            .exists(target_id)
            .await
            .map_err(map_content_error)?;
        if exists {
            Ok(())
        } else {
            Err(Error::not_found(format!("{} {target_id} not found", T::KIND)))
        }
    }

    /// Target ids held by the user, newest membership first.
    async fn held_ids(&self, user_id: UserId) -> Result<Vec<i64>, Error> {
        let memberships = self
            .associations
            .list(user_id, self.relation, T::KIND)
            .await
            .map_err(map_association_error)?;
        Ok(memberships
            .into_iter()
            .map(|membership| membership.key.target_id)
            .collect())
    }
}

#[async_trait]
impl<T: ContentEntity> UserAssociations<T> for AssociationService<T> {
    fn relation(&self) -> Relation {
        self.relation
    }

    async fn list(
        &self,
        user_id: UserId,
        language: &LanguageCode,
    ) -> Result<Vec<Localized<T>>, Error> {
        let held = self.held_ids(user_id).await?;
        if held.is_empty() {
            return Ok(Vec::new());
        }
        let mut by_id: HashMap<i64, T> = self
            .targets
            .find_by_ids(&held)
            .await
            .map_err(map_content_error)?
            .into_iter()
            .map(|target| (target.id(), target))
            .collect();
        // Archived targets drop out of the listing but keep their membership.
        let ordered: Vec<T> = held.iter().filter_map(|id| by_id.remove(id)).collect();
        Ok(self.resolver.resolve_many(ordered, language).await)
    }

    async fn add(&self, user_id: UserId, target_id: i64) -> Result<(), Error> {
        self.ensure_target(target_id).await?;
        let inserted = self
            .associations
            .insert(&self.key(user_id, target_id))
            .await
            .map_err(map_association_error)?;
        if !inserted {
            return Err(Error::conflict(format!(
                "{} {target_id} is already {} for user {user_id}",
                T::KIND,
                self.relation
            )));
        }
        info!(user_id = %user_id, relation = %self.relation, kind = %T::KIND, target_id, "association added");
        Ok(())
    }

    async fn remove(&self, user_id: UserId, target_id: i64) -> Result<(), Error> {
        let removed = self
            .associations
            .delete(&self.key(user_id, target_id))
            .await
            .map_err(map_association_error)?;
        if !removed {
            return Err(Error::not_found(format!(
                "{} {target_id} is not {} for user {user_id}",
                T::KIND,
                self.relation
            )));
        }
        info!(user_id = %user_id, relation = %self.relation, kind = %T::KIND, target_id, "association removed");
        Ok(())
    }

    async fn toggle(&self, user_id: UserId, target_id: i64) -> Result<bool, Error> {
        let key = self.key(user_id, target_id);
        let removed = self
            .associations
            .delete(&key)
            .await
            .map_err(map_association_error)?;
        if removed {
            return Ok(false);
        }
        self.ensure_target(target_id).await?;
        // A concurrent toggle may have inserted first; membership holds either way.
        self.associations
            .insert(&key)
            .await
            .map_err(map_association_error)?;
        Ok(true)
    }

    async fn available(
        &self,
        user_id: UserId,
        language: &LanguageCode,
    ) -> Result<Vec<Localized<T>>, Error> {
        let held: HashSet<i64> = self.held_ids(user_id).await?.into_iter().collect();
        let candidates: Vec<T> = self
            .targets
            .find_all(Default::default())
            .await
            .map_err(map_content_error)?
            .into_iter()
            .filter(|target| !held.contains(&target.id()))
            .collect();
        let mut resolved = self.resolver.resolve_many(candidates, language).await;
        resolved.sort_by(|a, b| by_display_text(a, b));
        Ok(resolved)
    }
}

#[cfg(test)]
#[path = "association_service_tests.rs"]
mod tests;
