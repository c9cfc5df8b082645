//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use foldermagic_core::error::{AppError, ErrorKind};

/// Apply the migrations under `migrations/` that have not run yet.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Applying structure store migrations");

    let migrator = sqlx::migrate!("../../migrations");
    migrator.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!(
        migrations = migrator.iter().count(),
        "Structure store schema is up to date"
    );
    Ok(())
}
