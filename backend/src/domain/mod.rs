//! Domain primitives, ports and services.
//!
//! Purpose: Define the strongly typed content model, the localized text
//! indirection every content kind relies on, and the services that implement
//! the driving ports consumed by inbound adapters.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - ContentEntity: the contract every content kind implements.
//! - ContentService / AssociationService / LocalizedTextService: driving
//!   port implementations.

pub mod association;
mod association_service;
pub mod content;
mod content_service;
pub mod error;
pub mod language;
pub mod localized_text;
mod localized_text_service;
pub mod ports;
mod reference_allocator;
pub mod trace_id;
mod translation_resolver;
pub mod user;

pub use self::association::{Association, AssociationKey, Relation};
pub use self::association_service::AssociationService;
pub use self::content::{
    Category, CategoryDraft, CategoryPatch, City, CityDraft, CityPatch, ContentEntity,
    ContentFilter, ContentKind, Difficulty, Event, EventDraft, EventPatch, Faq, FaqDraft, FaqPatch,
    Localized, Location, LocationDraft, LocationPatch, ParentRef, Route, RouteDraft, RoutePatch,
    SortValue, compare_sort_values,
};
pub use self::content_service::{ContentService, ParentGuard};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::language::{LanguageCode, LanguageCodeError, SOURCE_LANGUAGE};
pub use self::localized_text::{
    InvalidReferenceId, LocalizedText, ReferenceId, TextGroup, TranslationInput, to_text_group,
};
pub use self::localized_text_service::LocalizedTextService;
pub use self::reference_allocator::{DEFAULT_ALLOCATION_ATTEMPTS, ReferenceAllocator};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::translation_resolver::TranslationResolver;
pub use self::user::{AuthenticatedUser, UserId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use tourism_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
