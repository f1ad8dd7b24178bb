//! The `/api/v1` route table.

use actix_web::{Scope, web};

use crate::domain::{Category, City, Event, Faq, Location, Route};
use crate::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{associations, content, localized_texts};

/// Build the versioned API scope from the handler state.
///
/// Malformed JSON, query strings and path segments are reported through the
/// failure envelope rather than actix's plain-text defaults.
pub fn api_scope(state: &HttpState) -> Scope {
    web::scope("/api/v1")
        .app_data(web::Data::new(state.clone()))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(localized_texts::get_text_group)
        .service(localized_texts::upsert_translations)
        .service(localized_texts::clear_translation)
        .service(localized_texts::delete_text_group)
        .service(localized_texts::create_reference)
        .service(content::scope::<City>("/cities", state.cities.clone()))
        .service(content::scope::<Category>("/categories", state.categories.clone()))
        .service(content::scope::<Location>("/locations", state.locations.clone()))
        .service(content::scope::<Route>("/routes", state.routes.clone()))
        .service(content::scope::<Event>("/events", state.events.clone()))
        .service(content::scope::<Faq>("/faqs", state.faqs.clone()))
        .service(associations::scope::<City>(
            "favorite-cities",
            state.favorite_cities.clone(),
        ))
        .service(associations::available_scope::<City>(
            "favorite-cities",
            state.favorite_cities.clone(),
        ))
        .service(associations::scope::<Route>(
            "favorite-routes",
            state.favorite_routes.clone(),
        ))
        .service(associations::available_scope::<Route>(
            "favorite-routes",
            state.favorite_routes.clone(),
        ))
        .service(associations::scope::<Event>(
            "favorite-events",
            state.favorite_events.clone(),
        ))
        .service(associations::available_scope::<Event>(
            "favorite-events",
            state.favorite_events.clone(),
        ))
        .service(associations::scope::<Location>(
            "favorite-locations",
            state.favorite_locations.clone(),
        ))
        .service(associations::available_scope::<Location>(
            "favorite-locations",
            state.favorite_locations.clone(),
        ))
        .service(associations::scope::<Location>(
            "visited-locations",
            state.visited_locations.clone(),
        ))
        .service(associations::available_scope::<Location>(
            "visited-locations",
            state.visited_locations.clone(),
        ))
}
