//! Tourism content backend.
//!
//! Cities, routes, locations, events, categories and FAQs with their
//! translations, plus per-user favourites and visits, served over a JSON
//! REST API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
