//! Persistence Store (C1): SQLite via sea-orm, versioned migrations plus a
//! startup column-introspection pass for upgrade compatibility (§4.1).

pub mod column_check;
pub mod entities;
pub mod migrator;
pub mod repositories;

pub use repositories::SeaOrmRepositoryProvider;

use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

/// Database connection configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// e.g. `sqlite://./data/evcs-ocpp.db?mode=rwc`.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/evcs-ocpp.db?mode=rwc".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{path}?mode=rwc"),
        }
    }
}

/// Connects, runs pending versioned migrations, then runs the
/// column-introspection pass.
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!(url = %config.url, "connecting to database");
    let db = Database::connect(&config.url).await?;
    migrator::Migrator::up(&db, None).await?;
    column_check::ensure_columns(&db).await?;
    info!("database ready");
    Ok(db)
}
