use mongodb::bson::oid::ObjectId;
use std::fmt;
use std::str::FromStr;

/// Identifier of a file record: a 12-byte object id written as 24 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(ObjectId);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid file id: {0:?}")]
pub struct InvalidFileId(pub String);

impl FileId {
    /// Parse a raw path segment. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, InvalidFileId> {
        let trimmed = raw.trim();
        if trimmed.len() != 24 || !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidFileId(trimmed.to_string()));
        }
        ObjectId::parse_str(trimmed)
            .map(FileId)
            .map_err(|_| InvalidFileId(trimmed.to_string()))
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    /// Lowercase hex form, as stored by the SQL backend.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl From<ObjectId> for FileId {
    fn from(oid: ObjectId) -> Self {
        FileId(oid)
    }
}

impl FromStr for FileId {
    type Err = InvalidFileId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileId::parse(s)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Metadata for one stored file. Written by the upload pipeline, read-only here.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub id: FileId,
    pub original_name: String,
    /// Object key inside the bucket.
    pub encrypted_file_name: String,
    pub extension: String,
    // Carried by the schema; nothing on the read path consumes them.
    pub encryption_key: Option<String>,
    pub iv: Option<String>,
    pub file_hash: Option<String>,
}
