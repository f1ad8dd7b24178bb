//! Generic content service.
//!
//! One implementation of [`ContentQuery`] and [`ContentCommand`] serves every
//! content kind. It validates payloads, checks that referenced parents exist,
//! and resolves text fields in batches through the [`TranslationResolver`].

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    ContentCommand, ContentQuery, ContentRepository, ContentRepositoryError,
};
use crate::domain::{
    Category, City, ContentEntity, ContentFilter, ContentKind, Error, LanguageCode, Localized,
    Location, ParentRef, TranslationResolver,
};

pub(crate) fn map_content_error(error: ContentRepositoryError) -> Error {
    match error {
        ContentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("content repository unavailable: {message}"))
        }
        ContentRepositoryError::Query { message } => {
            Error::internal(format!("content repository error: {message}"))
        }
        ContentRepositoryError::ForeignKey { message } => Error::conflict(format!(
            "content is still referenced or references missing rows: {message}"
        )),
        ContentRepositoryError::Constraint { message } => {
            Error::invalid_request(format!("content violates a constraint: {message}"))
        }
        ContentRepositoryError::UnsupportedSort { field } => {
            Error::invalid_request(format!("cannot sort by {field}"))
                .with_details(json!({ "field": "sortBy", "value": field }))
        }
    }
}

fn not_found(kind: ContentKind, id: i64) -> Error {
    Error::not_found(format!("{kind} {id} not found"))
}

/// Existence checks for the kinds that other content points at.
#[derive(Clone)]
pub struct ParentGuard {
    cities: Arc<dyn ContentRepository<City>>,
    locations: Arc<dyn ContentRepository<Location>>,
    categories: Arc<dyn ContentRepository<Category>>,
}

impl ParentGuard {
    /// Guard over the repositories of every kind that can be a parent.
    pub fn new(
        cities: Arc<dyn ContentRepository<City>>,
        locations: Arc<dyn ContentRepository<Location>>,
        categories: Arc<dyn ContentRepository<Category>>,
    ) -> Self {
        Self {
            cities,
            locations,
            categories,
        }
    }

    /// Fail with `NotFound` naming the first field whose parent is missing.
    pub async fn ensure_exist(&self, parents: &[ParentRef]) -> Result<(), Error> {
        for parent in parents {
            let exists = match parent.kind {
                ContentKind::City => self.cities.exists(parent.id).await,
                ContentKind::Location => self.locations.exists(parent.id).await,
                ContentKind::Category => self.categories.exists(parent.id).await,
                other => {
                    return Err(Error::internal(format!("{other} cannot be a parent")));
                }
            }
            .map_err(map_content_error)?;

            if !exists {
                return Err(not_found(parent.kind, parent.id)
                    .with_details(json!({ "field": parent.field, "code": "parent_not_found" })));
            }
        }
        Ok(())
    }
}

/// Content service implementing the driving ports for one kind.
pub struct ContentService<T: ContentEntity> {
    repository: Arc<dyn ContentRepository<T>>,
    resolver: TranslationResolver,
    parents: ParentGuard,
}

impl<T: ContentEntity> Clone for ContentService<T> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            resolver: self.resolver.clone(),
            parents: self.parents.clone(),
        }
    }
}

impl<T: ContentEntity> ContentService<T> {
    /// Service over one content kind.
    pub fn new(
        repository: Arc<dyn ContentRepository<T>>,
        resolver: TranslationResolver,
        parents: ParentGuard,
    ) -> Self {
        Self {
            repository,
            resolver,
            parents,
        }
    }

    fn ensure_sortable(request: &PageRequest) -> Result<(), Error> {
        match request.sort_by() {
            Some(field) if !T::is_sortable(field) => Err(Error::invalid_request(format!(
                "cannot sort {} by {field}",
                T::KIND
            ))
            .with_details(json!({
                "field": "sortBy",
                "value": field,
                "allowed": T::SORTABLE_FIELDS,
            }))),
            _ => Ok(()),
        }
    }

    fn ensure_filter(filter: ContentFilter) -> Result<(), Error> {
        if filter.parent_id.is_some() && T::PARENT_FIELD.is_none() {
            return Err(Error::invalid_request(format!(
                "{} cannot be filtered by parent",
                T::KIND
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: ContentEntity> ContentQuery<T> for ContentService<T> {
    async fn get(&self, id: i64, language: &LanguageCode) -> Result<Localized<T>, Error> {
        let entity = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_content_error)?
            .ok_or_else(|| not_found(T::KIND, id))?;
        Ok(self.resolver.resolve_one(entity, language).await)
    }

    async fn list(
        &self,
        request: &PageRequest,
        filter: ContentFilter,
        language: &LanguageCode,
    ) -> Result<Paginated<Localized<T>>, Error> {
        Self::ensure_sortable(request)?;
        Self::ensure_filter(filter)?;
        let page = self
            .repository
            .find_page(request, filter)
            .await
            .map_err(map_content_error)?;
        let (items, meta) = page.into_parts();
        let items = self.resolver.resolve_many(items, language).await;
        Ok(Paginated { items, meta })
    }

    async fn list_all(
        &self,
        filter: ContentFilter,
        language: &LanguageCode,
    ) -> Result<Vec<Localized<T>>, Error> {
        Self::ensure_filter(filter)?;
        let rows = self
            .repository
            .find_all(filter)
            .await
            .map_err(map_content_error)?;
        Ok(self.resolver.resolve_many(rows, language).await)
    }

    async fn count(&self, filter: ContentFilter) -> Result<u64, Error> {
        Self::ensure_filter(filter)?;
        self.repository
            .count(filter)
            .await
            .map_err(map_content_error)
    }
}

#[async_trait]
impl<T: ContentEntity> ContentCommand<T> for ContentService<T> {
    async fn create(&self, draft: T::Draft, language: &LanguageCode) -> Result<Localized<T>, Error> {
        T::validate_draft(&draft)?;
        self.parents.ensure_exist(&T::draft_parents(&draft)).await?;
        let created = self
            .repository
            .create(draft)
            .await
            .map_err(map_content_error)?;
        info!(kind = %T::KIND, id = created.id(), "content created");
        Ok(self.resolver.resolve_one(created, language).await)
    }

    async fn create_many(
        &self,
        drafts: Vec<T::Draft>,
        language: &LanguageCode,
    ) -> Result<Vec<Localized<T>>, Error> {
        if drafts.is_empty() {
            return Err(Error::invalid_request("at least one item is required"));
        }
        let mut parents: Vec<ParentRef> = Vec::new();
        for (index, draft) in drafts.iter().enumerate() {
            T::validate_draft(draft).map_err(|error| {
                let details = json!({ "index": index, "cause": error.details() });
                Error::invalid_request(format!("item {index}: {}", error.message()))
                    .with_details(details)
            })?;
            for parent in T::draft_parents(draft) {
                if !parents.contains(&parent) {
                    parents.push(parent);
                }
            }
        }
        self.parents.ensure_exist(&parents).await?;

        let created = self
            .repository
            .create_many(drafts)
            .await
            .map_err(map_content_error)?;
        info!(kind = %T::KIND, count = created.len(), "content created in bulk");
        Ok(self.resolver.resolve_many(created, language).await)
    }

    async fn update(
        &self,
        id: i64,
        patch: T::Patch,
        language: &LanguageCode,
    ) -> Result<Localized<T>, Error> {
        T::validate_patch(&patch)?;
        self.parents.ensure_exist(&T::patch_parents(&patch)).await?;
        let updated = self
            .repository
            .update(id, patch)
            .await
            .map_err(map_content_error)?
            .ok_or_else(|| not_found(T::KIND, id))?;
        info!(kind = %T::KIND, id, "content updated");
        Ok(self.resolver.resolve_one(updated, language).await)
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        let removed = self
            .repository
            .delete(id)
            .await
            .map_err(map_content_error)?;
        if !removed {
            return Err(not_found(T::KIND, id));
        }
        info!(kind = %T::KIND, id, "content deleted");
        Ok(())
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64, Error> {
        if ids.is_empty() {
            return Err(Error::invalid_request("ids must not be empty")
                .with_details(json!({ "field": "ids", "code": "empty" })));
        }
        let unique: Vec<i64> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let removed = self
            .repository
            .delete_many(&unique)
            .await
            .map_err(map_content_error)?;
        info!(kind = %T::KIND, requested = unique.len(), removed, "content deleted in bulk");
        Ok(removed)
    }

    async fn archive(&self, id: i64) -> Result<(), Error> {
        let archived = self
            .repository
            .soft_delete(id)
            .await
            .map_err(map_content_error)?;
        if !archived {
            return Err(not_found(T::KIND, id));
        }
        info!(kind = %T::KIND, id, "content archived");
        Ok(())
    }
}

#[cfg(test)]
#[path = "content_service_tests.rs"]
mod tests;
