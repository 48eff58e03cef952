use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// ## Summary
/// Runs all pending migrations against the given database.
///
/// Uses a dedicated synchronous connection; call from a blocking context
/// during startup.
///
/// ## Errors
/// Returns an error if the connection cannot be established or a migration
/// fails to apply.
pub fn run_migrations(database_url: &str) -> anyhow::Result<()> {
    let mut conn = diesel::PgConnection::establish(database_url)?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("failed to run migrations: {e}"))?;

    for version in &applied {
        tracing::info!(%version, "Applied migration");
    }

    Ok(())
}
