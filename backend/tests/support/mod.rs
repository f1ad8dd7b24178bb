//! Shared helpers for integration suites that need a real PostgreSQL.

pub mod cluster_skip;
pub mod embedded_postgres;
