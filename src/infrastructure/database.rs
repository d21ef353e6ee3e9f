use crate::config::ProxyConfig;
use crate::entities::files;
use crate::services::records::{FileRecordStore, MongoFileStore, SeaOrmFileStore};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Connect the record store picked by the scheme of `database_url`.
pub async fn setup_record_store(config: &ProxyConfig) -> anyhow::Result<Arc<dyn FileRecordStore>> {
    if config.is_mongodb() {
        info!(
            "🍃 Record store: MongoDB (collection: {})",
            config.mongodb_collection
        );
        let store = MongoFileStore::connect(
            &config.database_url,
            config.mongodb_database.as_deref(),
            &config.mongodb_collection,
        )
        .await?;
        info!("✅ MongoDB client ready");
        return Ok(Arc::new(store));
    }

    let db = setup_database(&config.database_url).await?;
    if config.create_schema {
        info!("🛠️ Creating files table if missing");
        ensure_schema(&db).await?;
    }
    Ok(Arc::new(SeaOrmFileStore::new(db)))
}

pub async fn setup_database(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    info!("📂 Record store: SQL database");

    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("✅ Database connected successfully");

    Ok(db)
}

/// Create the `files` table when it does not exist yet. Rows come from the upload pipeline.
pub async fn ensure_schema(db: &DatabaseConnection) -> anyhow::Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let stmt = schema
        .create_table_from_entity(files::Entity)
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&stmt)).await?;
    Ok(())
}
