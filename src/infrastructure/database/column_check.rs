//! Startup column-introspection migration (§4.1).
//!
//! sea-orm's versioned migrator covers the common upgrade path, but the
//! reference implementation additionally re-checks every known table's
//! columns against its declared schema on every boot and patches anything
//! missing with `ALTER TABLE ... ADD COLUMN`. Preserved here for upgrade
//! compatibility with databases that predate a given migration.

use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use tracing::{info, warn};

/// (table, column, column type + default, as used in `ALTER TABLE ADD COLUMN`).
const EXPECTED_COLUMNS: &[(&str, &str, &str)] = &[
    ("charge_points", "display_name", "TEXT"),
    ("charge_points", "admin_state", "TEXT NOT NULL DEFAULT 'enabled'"),
    ("charge_points", "max_current_a", "REAL NOT NULL DEFAULT 16.0"),
    ("cards", "balance", "DECIMAL NOT NULL DEFAULT 0"),
    ("id_tags", "status", "TEXT NOT NULL DEFAULT 'Accepted'"),
    ("id_tags", "expiry_date", "TIMESTAMP"),
    ("transactions", "stop_reason", "TEXT"),
    ("payments", "overuse_fee", "DECIMAL NOT NULL DEFAULT 0"),
];

/// Queries `PRAGMA table_info(<table>)` for each table we know about and adds
/// any column declared in `EXPECTED_COLUMNS` but absent from the live schema.
/// A table that doesn't exist yet is skipped; the versioned migrator creates it.
pub async fn ensure_columns(db: &DatabaseConnection) -> Result<(), sea_orm::DbErr> {
    for (table, column, decl) in EXPECTED_COLUMNS {
        if !table_exists(db, table).await? {
            continue;
        }
        if column_exists(db, table, column).await? {
            continue;
        }
        warn!(table, column, "adding missing column detected at startup");
        let sql = format!("ALTER TABLE {table} ADD COLUMN {column} {decl}");
        db.execute(Statement::from_string(db.get_database_backend(), sql))
            .await?;
        info!(table, column, "column added");
    }
    Ok(())
}

async fn table_exists(db: &DatabaseConnection, table: &str) -> Result<bool, sea_orm::DbErr> {
    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        "SELECT name FROM sqlite_master WHERE type='table' AND name = $1",
        [table.into()],
    );
    Ok(db.query_one(stmt).await?.is_some())
}

async fn column_exists(
    db: &DatabaseConnection,
    table: &str,
    column: &str,
) -> Result<bool, sea_orm::DbErr> {
    let stmt = Statement::from_string(
        db.get_database_backend(),
        format!("PRAGMA table_info({table})"),
    );
    let rows = db.query_all(stmt).await?;
    for row in rows {
        let name: String = row.try_get("", "name")?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
