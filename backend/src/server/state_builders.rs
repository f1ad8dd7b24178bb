//! Builders wiring repositories into services and HTTP state.

use std::sync::Arc;

use crate::domain::ports::{
    AssociationRepository, ContentRepository, LocalizedTextRepository, ReferenceIdSource,
};
use crate::domain::{
    AssociationService, Category, City, ContentEntity, ContentService, Event, Faq, LanguageCode,
    LocalizedTextService, Location, ParentGuard, ReferenceAllocator, Relation, Route,
    TranslationResolver,
};
use crate::inbound::http::state::{AssociationState, ContentState, HttpState, TextState};
use crate::outbound::memory::{
    MemoryAssociationRepository, MemoryContentRepository, MemoryLocalizedTextRepository,
};
use crate::outbound::persistence::{
    DbPool, DieselAssociationRepository, DieselCategoryRepository, DieselCityRepository,
    DieselEventRepository, DieselFaqRepository, DieselLocalizedTextRepository,
    DieselLocationRepository, DieselReferenceIdSource, DieselRouteRepository,
};

/// Every driven port the services need.
///
/// `texts` and `reference_source` must share one backing store so reserved
/// ids and stored groups stay consistent.
#[derive(Clone)]
pub struct Repositories {
    pub cities: Arc<dyn ContentRepository<City>>,
    pub categories: Arc<dyn ContentRepository<Category>>,
    pub locations: Arc<dyn ContentRepository<Location>>,
    pub routes: Arc<dyn ContentRepository<Route>>,
    pub events: Arc<dyn ContentRepository<Event>>,
    pub faqs: Arc<dyn ContentRepository<Faq>>,
    pub associations: Arc<dyn AssociationRepository>,
    pub texts: Arc<dyn LocalizedTextRepository>,
    pub reference_source: Arc<dyn ReferenceIdSource>,
}

impl Repositories {
    /// Process-local adapters; nothing survives a restart.
    pub fn in_memory() -> Self {
        let texts = Arc::new(MemoryLocalizedTextRepository::default());
        Self {
            cities: Arc::new(MemoryContentRepository::<City>::default()),
            categories: Arc::new(MemoryContentRepository::<Category>::default()),
            locations: Arc::new(MemoryContentRepository::<Location>::default()),
            routes: Arc::new(MemoryContentRepository::<Route>::default()),
            events: Arc::new(MemoryContentRepository::<Event>::default()),
            faqs: Arc::new(MemoryContentRepository::<Faq>::default()),
            associations: Arc::new(MemoryAssociationRepository::default()),
            texts: texts.clone(),
            reference_source: texts,
        }
    }

    /// Diesel adapters sharing one pool.
    pub fn postgres(pool: &DbPool) -> Self {
        Self {
            cities: Arc::new(DieselCityRepository::new(pool.clone())),
            categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
            locations: Arc::new(DieselLocationRepository::new(pool.clone())),
            routes: Arc::new(DieselRouteRepository::new(pool.clone())),
            events: Arc::new(DieselEventRepository::new(pool.clone())),
            faqs: Arc::new(DieselFaqRepository::new(pool.clone())),
            associations: Arc::new(DieselAssociationRepository::new(pool.clone())),
            texts: Arc::new(DieselLocalizedTextRepository::new(pool.clone())),
            reference_source: Arc::new(DieselReferenceIdSource::new(pool.clone())),
        }
    }
}

fn content_state<T: ContentEntity>(
    repository: &Arc<dyn ContentRepository<T>>,
    resolver: &TranslationResolver,
    parents: &ParentGuard,
) -> ContentState<T> {
    ContentState::from_service(Arc::new(ContentService::new(
        Arc::clone(repository),
        resolver.clone(),
        parents.clone(),
    )))
}

fn association_state<T: ContentEntity>(
    repositories: &Repositories,
    targets: &Arc<dyn ContentRepository<T>>,
    resolver: &TranslationResolver,
    relation: Relation,
) -> AssociationState<T> {
    AssociationState::new(Arc::new(AssociationService::new(
        Arc::clone(&repositories.associations),
        Arc::clone(targets),
        resolver.clone(),
        relation,
    )))
}

/// Build the handler state from a repository bundle.
///
/// Text always falls back to the source language, whatever default the server
/// applies to requests naming no language. `allocation_attempts` bounds
/// reference id retries on collision.
pub fn build_http_state(repositories: &Repositories, allocation_attempts: u32) -> HttpState {
    let resolver =
        TranslationResolver::new(Arc::clone(&repositories.texts), LanguageCode::source());
    let parents = ParentGuard::new(
        Arc::clone(&repositories.cities),
        Arc::clone(&repositories.locations),
        Arc::clone(&repositories.categories),
    );
    let texts = Arc::new(LocalizedTextService::new(
        Arc::clone(&repositories.texts),
        ReferenceAllocator::new(Arc::clone(&repositories.reference_source), allocation_attempts),
    ));

    HttpState {
        cities: content_state(&repositories.cities, &resolver, &parents),
        categories: content_state(&repositories.categories, &resolver, &parents),
        locations: content_state(&repositories.locations, &resolver, &parents),
        routes: content_state(&repositories.routes, &resolver, &parents),
        events: content_state(&repositories.events, &resolver, &parents),
        faqs: content_state(&repositories.faqs, &resolver, &parents),
        favorite_cities: association_state(
            repositories,
            &repositories.cities,
            &resolver,
            Relation::Favorite,
        ),
        favorite_routes: association_state(
            repositories,
            &repositories.routes,
            &resolver,
            Relation::Favorite,
        ),
        favorite_events: association_state(
            repositories,
            &repositories.events,
            &resolver,
            Relation::Favorite,
        ),
        favorite_locations: association_state(
            repositories,
            &repositories.locations,
            &resolver,
            Relation::Favorite,
        ),
        visited_locations: association_state(
            repositories,
            &repositories.locations,
            &resolver,
            Relation::Visited,
        ),
        texts: TextState::new(texts.clone(), texts),
    }
}
