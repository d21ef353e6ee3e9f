use crate::entities::{files, prelude::*};
use crate::models::{FileId, FileRecord};
use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::{Client, Collection, Database};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Deserialize;

/// Read access to file metadata.
#[async_trait]
pub trait FileRecordStore: Send + Sync {
    /// Look up a record by id. `Ok(None)` when no such record exists.
    async fn find_by_id(&self, id: &FileId) -> Result<Option<FileRecord>>;

    /// Check that the backing database answers.
    async fn ping(&self) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}

/// Shape of a document in the `files` collection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub encrypted_file_name: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub encryption_key: Option<String>,
    #[serde(default)]
    pub iv: Option<String>,
    #[serde(default)]
    pub file_hash: Option<String>,
}

impl From<FileDocument> for FileRecord {
    fn from(d: FileDocument) -> Self {
        FileRecord {
            id: FileId::from(d.id),
            original_name: d.original_name.unwrap_or_default(),
            encrypted_file_name: d.encrypted_file_name.unwrap_or_default(),
            extension: d.extension.unwrap_or_default(),
            encryption_key: d.encryption_key,
            iv: d.iv,
            file_hash: d.file_hash,
        }
    }
}

/// Only the fields the read path needs leave the database.
fn lookup_projection() -> Document {
    doc! {
        "originalName": 1,
        "encryptedFileName": 1,
        "extension": 1,
    }
}

pub struct MongoFileStore {
    database: Database,
    collection: Collection<FileDocument>,
}

impl MongoFileStore {
    pub async fn connect(uri: &str, database: Option<&str>, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let database = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database("test")),
        };
        Ok(Self::new(database, collection))
    }

    pub fn new(database: Database, collection: &str) -> Self {
        let collection = database.collection::<FileDocument>(collection);
        Self {
            database,
            collection,
        }
    }
}

#[async_trait]
impl FileRecordStore for MongoFileStore {
    async fn find_by_id(&self, id: &FileId) -> Result<Option<FileRecord>> {
        let found = self
            .collection
            .find_one(doc! { "_id": id.object_id() })
            .projection(lookup_projection())
            .await?;
        Ok(found.map(FileRecord::from))
    }

    async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}

/// SQL-backed record store (`files` table).
pub struct SeaOrmFileStore {
    db: DatabaseConnection,
}

impl SeaOrmFileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn record_from_model(id: FileId, m: files::Model) -> FileRecord {
    FileRecord {
        id,
        original_name: m.original_name,
        encrypted_file_name: m.encrypted_file_name,
        extension: m.extension,
        encryption_key: m.encryption_key,
        iv: m.iv,
        file_hash: m.file_hash,
    }
}

#[async_trait]
impl FileRecordStore for SeaOrmFileStore {
    async fn find_by_id(&self, id: &FileId) -> Result<Option<FileRecord>> {
        let model = Files::find_by_id(id.to_hex()).one(&self.db).await?;
        Ok(model.map(|m| record_from_model(*id, m)))
    }

    async fn ping(&self) -> Result<()> {
        self.db.ping().await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sql"
    }
}
