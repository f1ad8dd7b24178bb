//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`ReferenceIdSource`]) are implemented by
//! outbound adapters. Driving ports (`*Query`, `*Command`,
//! [`UserAssociations`]) are implemented by domain services and consumed by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod association_repository;
mod content_repository;
mod content_use_cases;
mod localized_text_repository;
mod localized_text_use_cases;
mod reference_id_source;
mod user_associations;

#[cfg(test)]
pub use association_repository::MockAssociationRepository;
pub use association_repository::{AssociationRepository, AssociationRepositoryError};
pub use content_repository::{ContentRepository, ContentRepositoryError};
pub use content_use_cases::{ContentCommand, ContentQuery};
#[cfg(test)]
pub use localized_text_repository::MockLocalizedTextRepository;
pub use localized_text_repository::{LocalizedTextRepository, LocalizedTextRepositoryError};
pub use localized_text_use_cases::{
    CreateTextGroupRequest, LocalizedTextCommand, LocalizedTextQuery,
};
#[cfg(test)]
pub use localized_text_use_cases::{MockLocalizedTextCommand, MockLocalizedTextQuery};
#[cfg(test)]
pub use reference_id_source::MockReferenceIdSource;
pub use reference_id_source::{ReferenceIdSource, ReferenceIdSourceError};
pub use user_associations::UserAssociations;
