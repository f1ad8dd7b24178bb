//! Tests for the favorite/visited membership service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{LocalizedTextRepository, MockAssociationRepository};
use crate::domain::{City, CityDraft, ContentKind, ErrorCode, ReferenceId, TranslationInput};
use crate::outbound::memory::{
    MemoryAssociationRepository, MemoryContentRepository, MemoryLocalizedTextRepository,
};

fn user(id: i64) -> UserId {
    UserId::new(id).expect("positive user id")
}

fn reference(value: i64) -> ReferenceId {
    ReferenceId::new(value).expect("positive id")
}

struct Fixture {
    texts: Arc<MemoryLocalizedTextRepository>,
    cities: Arc<MemoryContentRepository<City>>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            texts: Arc::new(MemoryLocalizedTextRepository::default()),
            cities: Arc::new(MemoryContentRepository::default()),
        }
    }

    async fn seed_city(&self, name_ref: i64, name: &str) -> i64 {
        self.texts
            .upsert_many(
                reference(name_ref),
                &[TranslationInput::new(LanguageCode::source(), name)],
            )
            .await
            .expect("seed text");
        self.cities
            .create(CityDraft {
                name_text_ref_id: reference(name_ref),
                description_text_ref_id: None,
                state: None,
                latitude: None,
                longitude: None,
                image_url: None,
            })
            .await
            .expect("seed city")
            .id
    }

    fn service(&self, associations: Arc<dyn AssociationRepository>) -> AssociationService<City> {
        AssociationService::new(
            associations,
            self.cities.clone(),
            TranslationResolver::new(self.texts.clone(), LanguageCode::source()),
            Relation::Favorite,
        )
    }

    fn memory_service(&self) -> AssociationService<City> {
        self.service(Arc::new(MemoryAssociationRepository::default()))
    }
}

#[tokio::test]
async fn toggle_flips_membership() {
    let fixture = Fixture::new();
    let city = fixture.seed_city(1, "Salvador").await;
    let service = fixture.memory_service();

    assert!(service.toggle(user(1), city).await.expect("first toggle"));
    assert!(!service.toggle(user(1), city).await.expect("second toggle"));
    assert!(service.toggle(user(1), city).await.expect("third toggle"));

    let held = service
        .list(user(1), &LanguageCode::source())
        .await
        .expect("list");
    assert_eq!(held.len(), 1);
}

#[tokio::test]
async fn toggle_of_missing_target_is_not_found() {
    let fixture = Fixture::new();
    let mut associations = MockAssociationRepository::new();
    associations.expect_delete().times(1).return_once(|_| Ok(false));
    associations.expect_insert().never();

    let error = fixture
        .service(Arc::new(associations))
        .toggle(user(1), 99)
        .await
        .expect_err("missing city");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn add_twice_conflicts() {
    let fixture = Fixture::new();
    let city = fixture.seed_city(1, "Salvador").await;
    let service = fixture.memory_service();

    service.add(user(1), city).await.expect("first add");
    let error = service.add(user(1), city).await.expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn remove_of_absent_membership_is_not_found() {
    let fixture = Fixture::new();
    let city = fixture.seed_city(1, "Salvador").await;

    let error = fixture
        .memory_service()
        .remove(user(1), city)
        .await
        .expect_err("nothing to remove");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn memberships_are_scoped_per_user() {
    let fixture = Fixture::new();
    let city = fixture.seed_city(1, "Salvador").await;
    let service = fixture.memory_service();

    service.add(user(1), city).await.expect("add");

    let other = service
        .list(user(2), &LanguageCode::source())
        .await
        .expect("list");
    assert!(other.is_empty());
}

#[tokio::test]
async fn available_excludes_held_targets_and_orders_by_name() {
    let fixture = Fixture::new();
    let salvador = fixture.seed_city(1, "Salvador").await;
    let aracaju = fixture.seed_city(2, "aracaju").await;
    let natal = fixture.seed_city(3, "Natal").await;
    let service = fixture.memory_service();
    service.add(user(1), salvador).await.expect("add");

    let available = service
        .available(user(1), &LanguageCode::source())
        .await
        .expect("available");

    let ids: Vec<i64> = available.iter().map(|c| c.entity.id).collect();
    assert_eq!(ids, vec![aracaju, natal]);
}

#[tokio::test]
async fn list_follows_membership_order_and_skips_archived_targets() {
    let fixture = Fixture::new();
    let first = fixture.seed_city(1, "Salvador").await;
    let second = fixture.seed_city(2, "Recife").await;
    let archived = fixture.seed_city(3, "Natal").await;
    let mut associations = MockAssociationRepository::new();
    associations
        .expect_list()
        .withf(|_, relation, kind| *relation == Relation::Favorite && *kind == ContentKind::City)
        .times(1)
        .return_once(move |user_id, relation, kind| {
            Ok([second, archived, first]
                .into_iter()
                .map(|target_id| crate::domain::Association {
                    key: AssociationKey::new(user_id, relation, kind, target_id),
                    created_at: chrono::Utc::now(),
                })
                .collect())
        });
    fixture
        .cities
        .soft_delete(archived)
        .await
        .expect("archive");

    let held = fixture
        .service(Arc::new(associations))
        .list(user(1), &LanguageCode::source())
        .await
        .expect("list");

    let names: Vec<_> = held.iter().map(|c| c.display_text()).collect();
    assert_eq!(names, vec![Some("Recife"), Some("Salvador")]);
}

#[tokio::test]
async fn concurrent_toggles_never_duplicate_rows() {
    let fixture = Fixture::new();
    let city = fixture.seed_city(1, "Salvador").await;
    let associations = Arc::new(MemoryAssociationRepository::default());
    let service = Arc::new(fixture.service(associations.clone()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.toggle(user(1), city).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("task joins").expect("toggle succeeds");
    }

    let rows = associations
        .list(user(1), Relation::Favorite, ContentKind::City)
        .await
        .expect("list");
    assert!(rows.len() <= 1);
}
