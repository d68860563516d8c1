use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// A stored message record.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub image_url: Option<String>,
}

/// Caller-supplied fields of a new message. The store assigns the id and
/// the timestamp.
#[derive(Debug, Clone)]
pub struct NewMessageRecord {
    pub username: String,
    pub text: String,
}

/// A stored user account.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub username: String,
    pub password_hash: String,
}

/// Narrow document-store surface the message log depends on. Everything
/// about the concrete engine stays behind this trait.
pub trait RecordStore: Send + Sync {
    fn get_message(&self, id: &str) -> Result<Option<MessageRecord>, StoreError>;

    /// Persist a new message; the store assigns id and created_at and
    /// returns the canonical record.
    fn append_message(&self, record: NewMessageRecord) -> Result<MessageRecord, StoreError>;

    /// The most recent `limit` messages, returned in ascending order —
    /// a window over the time-ordered log, not a resort.
    fn latest_messages(&self, limit: u32) -> Result<Vec<MessageRecord>, StoreError>;

    /// Every message strictly after `cursor` in (created_at, insertion)
    /// order, ascending, uncapped.
    fn messages_after(&self, cursor: &MessageRecord) -> Result<Vec<MessageRecord>, StoreError>;

    fn set_image_url(&self, id: &str, url: &str) -> Result<(), StoreError>;

    fn get_account(&self, username: &str) -> Result<Option<AccountRecord>, StoreError>;

    /// Fails with `Conflict` when the username is already taken.
    fn create_account(&self, username: &str, password_hash: &str) -> Result<(), StoreError>;
}

/// Blob-store surface: bytes in, public URL out.
pub trait BlobStore: Send + Sync {
    fn put_blob(&self, bytes: &[u8], path: &str) -> Result<String, StoreError>;
}
