/// Schema migrations
///
/// The SQL files in the workspace `migrations/` directory are embedded at
/// compile time. Running them is idempotent: applied versions are recorded in
/// `_sqlx_migrations` and skipped on the next start.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::{error, info};

static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Applies every pending migration
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let available = MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .count();
    info!(available, "Running database migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        error!(error = %e, "Migration failed");
        e
    })?;

    info!("Database schema is up to date");
    Ok(())
}
