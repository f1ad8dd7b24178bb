//! In-process adapters backed by `tokio` locks.
//!
//! Used when no database URL is configured and throughout the test suites.
//! They honour the same port contracts as the Diesel adapters (uniqueness,
//! soft-delete visibility, ordering) but keep nothing across restarts and do
//! not enforce foreign keys between content kinds.

mod association_repository;
mod content_repository;
mod localized_text_store;

pub use association_repository::MemoryAssociationRepository;
pub use content_repository::MemoryContentRepository;
pub use localized_text_store::MemoryLocalizedTextRepository;
