use sea_orm::DatabaseConnection;
use tracing::info;

use super::providers::default_registry;
use crate::config::DatabaseConfig;

/// Opens the pool for `cfg.url` and brings the schema in line with the
/// entity definitions.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let providers = default_registry()?;
    let db = providers.connect(cfg).await?;

    info!("syncing database schema from entities");
    db.get_schema_registry("shiftbook::db::entities::*")
        .sync(&db)
        .await?;
    Ok(db)
}
