//! Generic in-memory `ContentRepository`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use pagination::{PageRequest, Paginated, SortDirection};
use tokio::sync::RwLock;

use crate::domain::ports::{ContentRepository, ContentRepositoryError};
use crate::domain::{ContentEntity, ContentFilter, compare_sort_values};

struct Record<T> {
    entity: T,
    archived: bool,
}

struct Rows<T> {
    next_id: i64,
    records: BTreeMap<i64, Record<T>>,
}

impl<T: ContentEntity> Rows<T> {
    fn live(&self, filter: ContentFilter) -> impl Iterator<Item = &T> {
        self.records
            .values()
            .filter(|record| !record.archived)
            .map(|record| &record.entity)
            .filter(move |entity| {
                filter
                    .parent_id
                    .is_none_or(|parent| entity.parent_id() == Some(parent))
            })
    }

    fn insert(&mut self, draft: T::Draft) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let entity = T::from_draft(id, draft, Utc::now());
        self.records.insert(
            id,
            Record {
                entity: entity.clone(),
                archived: false,
            },
        );
        entity
    }
}

/// Content rows for one kind, ids assigned from 1 upwards.
pub struct MemoryContentRepository<T> {
    rows: RwLock<Rows<T>>,
}

impl<T> Default for MemoryContentRepository<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Rows {
                next_id: 1,
                records: BTreeMap::new(),
            }),
        }
    }
}

/// Order by `field` in `direction`, then by id ascending.
///
/// Descending order reverses the whole comparison so missing values come
/// first, as PostgreSQL does by default.
fn compare_by<T: ContentEntity>(a: &T, b: &T, field: &str, direction: SortDirection) -> Ordering {
    let primary = compare_sort_values(a.sort_value(field).as_ref(), b.sort_value(field).as_ref());
    let primary = match direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary.then_with(|| a.id().cmp(&b.id()))
}

#[async_trait]
impl<T: ContentEntity> ContentRepository<T> for MemoryContentRepository<T> {
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, ContentRepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows
            .records
            .get(&id)
            .filter(|record| !record.archived)
            .map(|record| record.entity.clone()))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<T>, ContentRepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows
            .live(ContentFilter::default())
            .filter(|entity| ids.contains(&entity.id()))
            .cloned()
            .collect())
    }

    async fn find_all(&self, filter: ContentFilter) -> Result<Vec<T>, ContentRepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.live(filter).cloned().collect())
    }

    async fn find_page(
        &self,
        request: &PageRequest,
        filter: ContentFilter,
    ) -> Result<Paginated<T>, ContentRepositoryError> {
        let sort = request.sort_or("id");
        if !T::is_sortable(sort.field()) {
            return Err(ContentRepositoryError::unsupported_sort(sort.field()));
        }
        let rows = self.rows.read().await;
        let mut matching: Vec<T> = rows.live(filter).cloned().collect();
        matching.sort_by(|a, b| compare_by(a, b, sort.field(), sort.direction()));
        Ok(Paginated::from_slice_window(matching, request))
    }

    async fn exists(&self, id: i64) -> Result<bool, ContentRepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.records.get(&id).is_some_and(|record| !record.archived))
    }

    async fn count(&self, filter: ContentFilter) -> Result<u64, ContentRepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.live(filter).count() as u64)
    }

    async fn create(&self, draft: T::Draft) -> Result<T, ContentRepositoryError> {
        let mut rows = self.rows.write().await;
        Ok(rows.insert(draft))
    }

    async fn create_many(&self, drafts: Vec<T::Draft>) -> Result<Vec<T>, ContentRepositoryError> {
        let mut rows = self.rows.write().await;
        Ok(drafts.into_iter().map(|draft| rows.insert(draft)).collect())
    }

    async fn update(&self, id: i64, patch: T::Patch) -> Result<Option<T>, ContentRepositoryError> {
        let mut rows = self.rows.write().await;
        let Some(record) = rows.records.get_mut(&id).filter(|record| !record.archived) else {
            return Ok(None);
        };
        record.entity.apply_patch(patch, Utc::now());
        Ok(Some(record.entity.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, ContentRepositoryError> {
        let mut rows = self.rows.write().await;
        Ok(rows.records.remove(&id).is_some())
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64, ContentRepositoryError> {
        let mut rows = self.rows.write().await;
        let removed = ids
            .iter()
            .filter(|id| rows.records.remove(*id).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, ContentRepositoryError> {
        let mut rows = self.rows.write().await;
        match rows.records.get_mut(&id) {
            Some(record) if !record.archived => {
                record.archived = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Ordering, filtering and archive visibility for the in-memory store.
    use super::*;
    use crate::domain::{City, CityDraft, ReferenceId, Route, RouteDraft};
    use rstest::rstest;

    fn city_draft(state: Option<&str>) -> CityDraft {
        CityDraft {
            name_text_ref_id: ReferenceId::new(1).expect("positive id"),
            description_text_ref_id: None,
            state: state.map(str::to_owned),
            latitude: None,
            longitude: None,
            image_url: None,
        }
    }

    fn route_draft(city_id: i64) -> RouteDraft {
        RouteDraft {
            city_id,
            title_text_ref_id: ReferenceId::new(1).expect("positive id"),
            description_text_ref_id: None,
            distance_km: None,
            duration_minutes: None,
            difficulty: None,
            image_url: None,
        }
    }

    async fn seeded_cities(states: &[Option<&str>]) -> MemoryContentRepository<City> {
        let repo = MemoryContentRepository::default();
        for state in states {
            repo.create(city_draft(*state)).await.expect("create");
        }
        repo
    }

    #[rstest]
    #[case(SortDirection::Asc, vec![2, 3, 1])]
    #[case(SortDirection::Desc, vec![1, 3, 2])]
    #[tokio::test]
    async fn sorts_with_missing_values_last_ascending(
        #[case] direction: SortDirection,
        #[case] expected: Vec<i64>,
    ) {
        let repo = seeded_cities(&[None, Some("BA"), Some("PE")]).await;
        let request = PageRequest::new(1, 10)
            .expect("valid page")
            .with_sort("state", direction);

        let page = repo
            .find_page(&request, ContentFilter::default())
            .await
            .expect("page");

        let ids: Vec<i64> = page.items.iter().map(|c| c.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn rejects_unknown_sort_field() {
        let repo = seeded_cities(&[None]).await;
        let request = PageRequest::new(1, 10)
            .expect("valid page")
            .with_sort("secret", SortDirection::Asc);

        let error = repo
            .find_page(&request, ContentFilter::default())
            .await
            .expect_err("unsupported sort");

        assert_eq!(error, ContentRepositoryError::unsupported_sort("secret"));
    }

    #[tokio::test]
    async fn archived_rows_are_invisible() {
        let repo = seeded_cities(&[None, None]).await;
        assert!(repo.soft_delete(1).await.expect("archive"));

        assert_eq!(repo.find_by_id(1).await.expect("lookup"), None);
        assert!(!repo.exists(1).await.expect("exists"));
        assert_eq!(repo.count(ContentFilter::default()).await.expect("count"), 1);
        assert!(repo.update(1, Default::default()).await.expect("update").is_none());
        assert!(!repo.soft_delete(1).await.expect("second archive"));
    }

    #[tokio::test]
    async fn filters_by_parent() {
        let repo = MemoryContentRepository::<Route>::default();
        repo.create_many(vec![route_draft(1), route_draft(2), route_draft(1)])
            .await
            .expect("create");

        let rows = repo
            .find_all(ContentFilter::by_parent(1))
            .await
            .expect("list");

        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[tokio::test]
    async fn delete_many_counts_removed_rows() {
        let repo = seeded_cities(&[None, None, None]).await;

        let removed = repo.delete_many(&[1, 3, 9]).await.expect("delete");

        assert_eq!(removed, 2);
        assert_eq!(repo.count(ContentFilter::default()).await.expect("count"), 1);
    }
}
