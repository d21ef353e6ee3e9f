use crate::api::error::AppError;
use crate::config::ProxyConfig;
use crate::models::{FileId, FileRecord};
use crate::services::content_type::{
    CategoryPolicy, ContentPolicy, ExtensionMimeResolver, MimeResolver,
};
use crate::services::records::FileRecordStore;
use crate::services::storage::{ObjectStore, ObjectStream};
use mime::Mime;
use std::sync::Arc;

/// A record that passed every check and is ready to be fetched.
#[derive(Debug, Clone)]
pub struct ResolvedMedia {
    pub record: FileRecord,
    pub content_type: Mime,
    pub object_url: String,
}

/// Looks up file records and opens the matching bucket objects.
pub struct MediaService {
    records: Arc<dyn FileRecordStore>,
    objects: Arc<dyn ObjectStore>,
    mime_resolver: Arc<dyn MimeResolver>,
    policy: Arc<dyn ContentPolicy>,
}

impl MediaService {
    pub fn new(
        records: Arc<dyn FileRecordStore>,
        objects: Arc<dyn ObjectStore>,
        mime_resolver: Arc<dyn MimeResolver>,
        policy: Arc<dyn ContentPolicy>,
    ) -> Self {
        Self {
            records,
            objects,
            mime_resolver,
            policy,
        }
    }

    /// Default extension table, policy taken from the config categories.
    pub fn from_config(
        records: Arc<dyn FileRecordStore>,
        objects: Arc<dyn ObjectStore>,
        config: &ProxyConfig,
    ) -> Self {
        Self::new(
            records,
            objects,
            Arc::new(ExtensionMimeResolver),
            Arc::new(CategoryPolicy::new(
                config.allowed_content_categories.iter().cloned(),
            )),
        )
    }

    /// Validate the id, load the record and check its content type.
    /// Nothing is requested from the bucket here.
    pub async fn resolve(&self, raw_id: &str) -> Result<ResolvedMedia, AppError> {
        let id = FileId::parse(raw_id).map_err(|e| AppError::InvalidIdentifier(e.0))?;

        let record = self
            .records
            .find_by_id(&id)
            .await
            .map_err(|e| AppError::Internal(format!("record lookup for {} failed: {:#}", id, e)))?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        let content_type = self
            .mime_resolver
            .lookup(&record.extension)
            .ok_or_else(|| {
                AppError::UnsupportedType(format!("no MIME type for extension {:?}", record.extension))
            })?;

        if !self.policy.allows(&content_type) {
            tracing::warn!(
                "Refused file {} with content type {}",
                record.id,
                content_type
            );
            return Err(AppError::UnsupportedType(content_type.to_string()));
        }

        // an empty key would address the bucket root
        if record.encrypted_file_name.trim().is_empty() {
            return Err(AppError::Internal(format!("record {} has no object key", record.id)));
        }

        let object_url = self.objects.object_url(&record.encrypted_file_name);

        Ok(ResolvedMedia {
            record,
            content_type,
            object_url,
        })
    }

    /// Start fetching the object behind a resolved record.
    pub async fn open(&self, media: &ResolvedMedia) -> Result<ObjectStream, AppError> {
        self.objects
            .get_object_stream(&media.record.encrypted_file_name)
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("{:#}", e)))
    }

    pub fn records(&self) -> &Arc<dyn FileRecordStore> {
        &self.records
    }
}
