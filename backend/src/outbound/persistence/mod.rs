//! PostgreSQL persistence adapters using Diesel.
//!
//! Each adapter implements one domain port over a shared [`DbPool`]. Row
//! structs (`models.rs`) and table definitions (`schema.rs`) stay private to
//! this module; the domain only ever sees its own types.
//!
//! ```ignore
//! use tourism_backend::outbound::persistence::{DbPool, DieselCityRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/tourism")).await?;
//! let cities = DieselCityRepository::new(pool);
//! ```

mod diesel_association_repository;
mod diesel_content_repository;
pub(crate) mod diesel_helpers;
mod diesel_localized_text_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_association_repository::DieselAssociationRepository;
pub use diesel_content_repository::{
    DieselCategoryRepository, DieselCityRepository, DieselEventRepository, DieselFaqRepository,
    DieselLocationRepository, DieselRouteRepository,
};
pub use diesel_localized_text_repository::{
    DieselLocalizedTextRepository, DieselReferenceIdSource,
};
pub use migrations::{MigrationError, run_migrations, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
