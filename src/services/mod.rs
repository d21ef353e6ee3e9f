pub mod content_type;
pub mod media_service;
pub mod records;
pub mod storage;
