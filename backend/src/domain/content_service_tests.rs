//! Tests for the generic content service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::LocalizedTextRepository;
use crate::domain::{
    CityDraft, ErrorCode, ReferenceId, Route, RouteDraft, RoutePatch, TranslationInput,
};
use crate::outbound::memory::{MemoryContentRepository, MemoryLocalizedTextRepository};
use chrono::Utc;
use mockall::mock;
use pagination::SortDirection;
use rstest::rstest;

mock! {
    RouteRepo {}

    #[async_trait]
    impl ContentRepository<Route> for RouteRepo {
        async fn find_by_id(&self, id: i64) -> Result<Option<Route>, ContentRepositoryError>;
        async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Route>, ContentRepositoryError>;
        async fn find_all(&self, filter: ContentFilter) -> Result<Vec<Route>, ContentRepositoryError>;
        async fn find_page(
            &self,
            request: &PageRequest,
            filter: ContentFilter,
        ) -> Result<Paginated<Route>, ContentRepositoryError>;
        async fn exists(&self, id: i64) -> Result<bool, ContentRepositoryError>;
        async fn count(&self, filter: ContentFilter) -> Result<u64, ContentRepositoryError>;
        async fn create(&self, draft: RouteDraft) -> Result<Route, ContentRepositoryError>;
        async fn create_many(&self, drafts: Vec<RouteDraft>) -> Result<Vec<Route>, ContentRepositoryError>;
        async fn update(&self, id: i64, patch: RoutePatch) -> Result<Option<Route>, ContentRepositoryError>;
        async fn delete(&self, id: i64) -> Result<bool, ContentRepositoryError>;
        async fn delete_many(&self, ids: &[i64]) -> Result<u64, ContentRepositoryError>;
        async fn soft_delete(&self, id: i64) -> Result<bool, ContentRepositoryError>;
    }
}

fn reference(value: i64) -> ReferenceId {
    ReferenceId::new(value).expect("positive id")
}

fn lang(code: &str) -> LanguageCode {
    LanguageCode::new(code).expect("valid language")
}

fn route(id: i64, city_id: i64) -> Route {
    let now = Utc::now();
    Route {
        id,
        city_id,
        title_text_ref_id: reference(100 + id),
        description_text_ref_id: None,
        distance_km: Some(3.5),
        duration_minutes: Some(90),
        difficulty: None,
        image_url: None,
        created_at: now,
        updated_at: now,
    }
}

fn route_draft(city_id: i64) -> RouteDraft {
    RouteDraft {
        city_id,
        title_text_ref_id: reference(100),
        description_text_ref_id: None,
        distance_km: None,
        duration_minutes: None,
        difficulty: None,
        image_url: None,
    }
}

fn city_draft(name_ref: i64) -> CityDraft {
    CityDraft {
        name_text_ref_id: reference(name_ref),
        description_text_ref_id: None,
        state: Some("BA".to_owned()),
        latitude: None,
        longitude: None,
        image_url: None,
    }
}

struct Fixture {
    texts: Arc<MemoryLocalizedTextRepository>,
    cities: Arc<MemoryContentRepository<City>>,
    guard: ParentGuard,
    resolver: TranslationResolver,
}

impl Fixture {
    fn new() -> Self {
        let texts = Arc::new(MemoryLocalizedTextRepository::default());
        let cities = Arc::new(MemoryContentRepository::<City>::default());
        let guard = ParentGuard::new(
            cities.clone(),
            Arc::new(MemoryContentRepository::<Location>::default()),
            Arc::new(MemoryContentRepository::<Category>::default()),
        );
        let resolver = TranslationResolver::new(texts.clone(), LanguageCode::source());
        Self {
            texts,
            cities,
            guard,
            resolver,
        }
    }

    async fn seed_city(&self, name_ref: i64) -> City {
        self.cities
            .create(city_draft(name_ref))
            .await
            .expect("seed city")
    }

    async fn seed_text(&self, reference_id: i64, translations: &[(&str, &str)]) {
        let entries: Vec<TranslationInput> = translations
            .iter()
            .map(|(code, text)| TranslationInput::new(lang(code), *text))
            .collect();
        self.texts
            .upsert_many(reference(reference_id), &entries)
            .await
            .expect("seed text");
    }

    fn city_service(&self) -> ContentService<City> {
        ContentService::new(self.cities.clone(), self.resolver.clone(), self.guard.clone())
    }

    fn route_service(&self, routes: MockRouteRepo) -> ContentService<Route> {
        ContentService::new(Arc::new(routes), self.resolver.clone(), self.guard.clone())
    }
}

#[tokio::test]
async fn get_resolves_requested_language_with_fallback() {
    let fixture = Fixture::new();
    fixture.seed_text(1, &[("pt", "Salvador"), ("en", "Saviour")]).await;
    fixture.seed_text(2, &[("pt", "Recife")]).await;
    let salvador = fixture.seed_city(1).await;
    let recife = fixture.seed_city(2).await;

    let service = fixture.city_service();
    let english = service.get(salvador.id, &lang("en")).await.expect("found");
    let fallback = service.get(recife.id, &lang("en")).await.expect("found");

    assert_eq!(english.text("name"), Some("Saviour"));
    assert_eq!(fallback.text("name"), Some("Recife"));
}

#[tokio::test]
async fn get_reports_missing_rows() {
    let fixture = Fixture::new();
    let error = fixture
        .city_service()
        .get(404, &LanguageCode::source())
        .await
        .expect_err("missing city");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn list_rejects_unknown_sort_field() {
    let fixture = Fixture::new();
    let request = PageRequest::new(1, 10)
        .expect("valid page")
        .with_sort("password", SortDirection::Asc);

    let error = fixture
        .city_service()
        .list(&request, ContentFilter::default(), &LanguageCode::source())
        .await
        .expect_err("unsortable field");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|d| d.get("field")),
        Some(&json!("sortBy"))
    );
}

#[tokio::test]
async fn list_rejects_parent_filter_for_top_level_kinds() {
    let fixture = Fixture::new();
    let error = fixture
        .city_service()
        .count(ContentFilter::by_parent(1))
        .await
        .expect_err("cities have no parent");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn list_resolves_a_page_of_rows() {
    let fixture = Fixture::new();
    for n in 1..=3 {
        fixture.seed_text(n, &[("pt", "Cidade")]).await;
        fixture.seed_city(n).await;
    }
    let request = PageRequest::new(2, 2).expect("valid page");

    let page = fixture
        .city_service()
        .list(&request, ContentFilter::default(), &LanguageCode::source())
        .await
        .expect("page");

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.meta.total, 3);
    assert!(page.meta.has_prev);
    assert_eq!(page.items[0].text("name"), Some("Cidade"));
}

#[tokio::test]
async fn create_requires_existing_parent() {
    let fixture = Fixture::new();
    let mut routes = MockRouteRepo::new();
    routes.expect_create().never();

    let error = fixture
        .route_service(routes)
        .create(route_draft(77), &LanguageCode::source())
        .await
        .expect_err("missing city");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(
        error.details().and_then(|d| d.get("field")),
        Some(&json!("cityId"))
    );
}

#[tokio::test]
async fn create_many_checks_each_parent_once() {
    let fixture = Fixture::new();
    let city = fixture.seed_city(1).await;
    let city_id = city.id;
    let mut routes = MockRouteRepo::new();
    routes
        .expect_create_many()
        .withf(|drafts| drafts.len() == 2)
        .times(1)
        .return_once(move |_| Ok(vec![route(1, city_id), route(2, city_id)]));

    let created = fixture
        .route_service(routes)
        .create_many(
            vec![route_draft(city_id), route_draft(city_id)],
            &LanguageCode::source(),
        )
        .await
        .expect("bulk create");

    assert_eq!(created.len(), 2);
}

#[tokio::test]
async fn create_many_rejects_empty_batches() {
    let fixture = Fixture::new();
    let error = fixture
        .city_service()
        .create_many(Vec::new(), &LanguageCode::source())
        .await
        .expect_err("empty batch");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn create_many_reports_the_invalid_item() {
    let fixture = Fixture::new();
    let mut bad = city_draft(2);
    bad.latitude = Some(120.0);

    let error = fixture
        .city_service()
        .create_many(vec![city_draft(1), bad], &LanguageCode::source())
        .await
        .expect_err("invalid latitude");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|d| d.get("index")),
        Some(&json!(1))
    );
    assert_eq!(
        fixture
            .cities
            .count(ContentFilter::default())
            .await
            .expect("count"),
        0
    );
}

#[tokio::test]
async fn update_of_missing_row_is_not_found() {
    let fixture = Fixture::new();
    let mut routes = MockRouteRepo::new();
    routes.expect_update().times(1).return_once(|_, _| Ok(None));

    let error = fixture
        .route_service(routes)
        .update(9, RoutePatch::default(), &LanguageCode::source())
        .await
        .expect_err("missing route");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(ContentRepositoryError::foreign_key("routes_city_id_fkey"), ErrorCode::Conflict)]
#[case(ContentRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(ContentRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[case(ContentRepositoryError::constraint("events_window_check"), ErrorCode::InvalidRequest)]
#[tokio::test]
async fn delete_maps_repository_errors(
    #[case] failure: ContentRepositoryError,
    #[case] expected: ErrorCode,
) {
    let fixture = Fixture::new();
    let mut routes = MockRouteRepo::new();
    routes
        .expect_delete()
        .times(1)
        .return_once(move |_| Err(failure));

    let error = fixture
        .route_service(routes)
        .delete(1)
        .await
        .expect_err("repository failure");

    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn delete_many_deduplicates_ids() {
    let fixture = Fixture::new();
    let mut routes = MockRouteRepo::new();
    routes
        .expect_delete_many()
        .withf(|ids| ids == [1, 2, 3])
        .times(1)
        .return_once(|_| Ok(3));

    let removed = fixture
        .route_service(routes)
        .delete_many(&[3, 1, 2, 1])
        .await
        .expect("bulk delete");

    assert_eq!(removed, 3);
}

#[tokio::test]
async fn archive_hides_row_from_reads() {
    let fixture = Fixture::new();
    let city = fixture.seed_city(1).await;
    let service = fixture.city_service();

    service.archive(city.id).await.expect("archived");
    let error = service
        .get(city.id, &LanguageCode::source())
        .await
        .expect_err("archived rows are hidden");
    let again = service.archive(city.id).await.expect_err("already archived");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(again.code(), ErrorCode::NotFound);
}
