//! Embedded PostgreSQL provisioning for Diesel adapter tests.
//!
//! One cluster is shared per test binary. Every test gets its own temporary
//! database with the crate's migrations applied.

use std::thread;
use std::time::Duration;

use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tourism_backend::outbound::persistence::run_pending_migrations;

const CLUSTER_RETRIES: u32 = 3;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(250);

/// The process-wide cluster, started on first use.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= CLUSTER_RETRIES => return Err(error.to_string()),
            Err(_) => {
                thread::sleep(CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// A fresh, migrated database. Dropping the handle drops the database.
pub fn provision_database() -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster()?;
    let database = cluster
        .temporary_database(format!("test_{}", uuid::Uuid::new_v4()))
        .map_err(|error| error.to_string())?;
    run_pending_migrations(database.url()).map_err(|error| error.to_string())?;
    Ok(database)
}

/// Pin `PG_PASSWORD` so a reused data directory keeps accepting logins
/// across test processes.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster library spawns threads; the shared
        // handle is initialised at most once per process.
        unsafe {
            std::env::set_var("PG_PASSWORD", "tourism_embedded_test");
        }
    }
}
