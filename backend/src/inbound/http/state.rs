//! Shared HTTP adapter state.
//!
//! Handlers depend only on driving ports so they stay testable without I/O.
//! Generic handlers find their ports through scope-level `web::Data`, keyed by
//! the port bundle type, which is why each content kind and association
//! listing carries its own small state value.

use std::sync::Arc;

use crate::domain::ports::{
    ContentCommand, ContentQuery, LocalizedTextCommand, LocalizedTextQuery, UserAssociations,
};
use crate::domain::{Category, City, ContentEntity, Event, Faq, Location, Route};

/// Read and write ports for one content kind.
pub struct ContentState<T: ContentEntity> {
    /// Public reads.
    pub query: Arc<dyn ContentQuery<T>>,
    /// Administrator writes.
    pub command: Arc<dyn ContentCommand<T>>,
}

impl<T: ContentEntity> ContentState<T> {
    /// Use one service for both ports.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: ContentQuery<T> + ContentCommand<T> + 'static,
    {
        Self {
            query: service.clone(),
            command: service,
        }
    }
}

impl<T: ContentEntity> Clone for ContentState<T> {
    fn clone(&self) -> Self {
        Self {
            query: Arc::clone(&self.query),
            command: Arc::clone(&self.command),
        }
    }
}

/// Port for one favorite/visited listing.
pub struct AssociationState<T: ContentEntity> {
    /// Membership operations for the listing.
    pub associations: Arc<dyn UserAssociations<T>>,
}

impl<T: ContentEntity> AssociationState<T> {
    /// Wrap a membership port.
    pub fn new(associations: Arc<dyn UserAssociations<T>>) -> Self {
        Self { associations }
    }
}

impl<T: ContentEntity> Clone for AssociationState<T> {
    fn clone(&self) -> Self {
        Self {
            associations: Arc::clone(&self.associations),
        }
    }
}

/// Translation management ports.
#[derive(Clone)]
pub struct TextState {
    /// Group reads.
    pub query: Arc<dyn LocalizedTextQuery>,
    /// Group writes.
    pub command: Arc<dyn LocalizedTextCommand>,
}

impl TextState {
    /// Bundle the read and write ports.
    pub fn new(query: Arc<dyn LocalizedTextQuery>, command: Arc<dyn LocalizedTextCommand>) -> Self {
        Self { query, command }
    }
}

/// Dependency bundle for every HTTP handler.
///
/// Field names follow the URL segment each state is mounted under.
#[derive(Clone)]
pub struct HttpState {
    pub cities: ContentState<City>,
    pub categories: ContentState<Category>,
    pub locations: ContentState<Location>,
    pub routes: ContentState<Route>,
    pub events: ContentState<Event>,
    pub faqs: ContentState<Faq>,
    pub favorite_cities: AssociationState<City>,
    pub favorite_routes: AssociationState<Route>,
    pub favorite_events: AssociationState<Event>,
    pub favorite_locations: AssociationState<Location>,
    pub visited_locations: AssociationState<Location>,
    pub texts: TextState,
}
