use crate::config::ProxyConfig;
use crate::services::storage::HttpObjectStore;
use std::sync::Arc;
use tracing::info;

pub fn setup_storage(config: &ProxyConfig) -> anyhow::Result<Arc<HttpObjectStore>> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

    if let Some(timeout) = config.upstream_connect_timeout {
        builder = builder.connect_timeout(timeout);
    }

    let client = builder.build()?;

    info!("☁️  Bucket: {}", config.bucket_base_url);

    Ok(Arc::new(HttpObjectStore::new(
        client,
        config.bucket_base_url.clone(),
    )))
}
