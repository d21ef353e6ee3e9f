use anyhow::{Context, Result, bail};
use std::env;
use std::time::Duration;

/// Runtime configuration for the media proxy
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Record store connection string (`DATABASE_URL`, falls back to `MONGODB`)
    pub database_url: String,

    /// Database name when the Mongo URI does not carry one
    pub mongodb_database: Option<String>,

    /// Mongo collection holding file records (default: "files")
    pub mongodb_collection: String,

    /// Base URL of the bucket, always ending in '/'
    pub bucket_base_url: String,

    /// Connect timeout for upstream fetches (default: none)
    pub upstream_connect_timeout: Option<Duration>,

    /// Top-level MIME types that may be served (default: image, video)
    pub allowed_content_categories: Vec<String>,

    /// Allowed CORS origins. Empty means any origin.
    pub allowed_origins: Vec<String>,

    /// Listen port (default: 8443)
    pub port: u16,

    /// Create the SQL `files` table at startup when missing (default: false)
    pub create_schema: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            mongodb_database: None,
            mongodb_collection: "files".to_string(),
            bucket_base_url: String::new(),
            upstream_connect_timeout: None,
            allowed_content_categories: vec!["image".to_string(), "video".to_string()],
            allowed_origins: Vec::new(),
            port: 8443,
            create_schema: false,
        }
    }
}

impl ProxyConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let default = Self::default();

        let database_url = env::var("DATABASE_URL")
            .or_else(|_| env::var("MONGODB"))
            .context("DATABASE_URL (or MONGODB) must be set")?;

        let bucket_base_url = env::var("BUCKET_BASE_URL").context("BUCKET_BASE_URL must be set")?;

        let config = Self {
            database_url,
            mongodb_database: env::var("MONGODB_DATABASE").ok(),
            mongodb_collection: env::var("MONGODB_COLLECTION")
                .unwrap_or(default.mongodb_collection),
            bucket_base_url: normalize_base_url(&bucket_base_url)?,
            upstream_connect_timeout: parse_var::<u64>("UPSTREAM_CONNECT_TIMEOUT_SECS")?
                .map(Duration::from_secs),
            allowed_content_categories: env::var("ALLOWED_CONTENT_CATEGORIES")
                .ok()
                .map(|v| split_list(&v))
                .unwrap_or(default.allowed_content_categories),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| split_list(&v))
                .unwrap_or(default.allowed_origins),
            port: parse_var("PORT")?.unwrap_or(default.port),
            create_schema: parse_var("CREATE_SCHEMA")?.unwrap_or(default.create_schema),
        };

        Ok(config)
    }

    /// Local setup: in-memory SQLite record store, bucket on localhost
    pub fn development() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bucket_base_url: "http://127.0.0.1:9000/media/".to_string(),
            upstream_connect_timeout: Some(Duration::from_secs(5)),
            create_schema: true,
            ..Self::default()
        }
    }

    pub fn is_mongodb(&self) -> bool {
        self.database_url.starts_with("mongodb://") || self.database_url.starts_with("mongodb+srv://")
    }
}

/// Validates the bucket URL and makes sure keys can be appended to it directly.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed).with_context(|| format!("invalid bucket URL: {trimmed}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("bucket URL must be http or https, got {}", parsed.scheme());
    }

    if trimmed.ends_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/"))
    }
}

/// Unset is `None`; set but unparsable is an error.
fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env::var(key)
        .ok()
        .map(|v| {
            v.trim()
                .parse::<T>()
                .with_context(|| format!("invalid {key}: {v:?}"))
        })
        .transpose()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
