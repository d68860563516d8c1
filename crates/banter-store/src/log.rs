use std::sync::Arc;

use tracing::debug;

use banter_types::models::Message;

use crate::error::StoreError;
use crate::records::{BlobStore, MessageRecord, NewMessageRecord, RecordStore};

/// Only the very first, unseeded fetch is capped; cursor follow-ups
/// return everything newer than the cursor.
const FIRST_PAGE_LIMIT: u32 = 20;

/// Decoded image attachment handed to `append`. Base64 decoding happens
/// at the HTTP edge; the log only sees bytes and an extension tag.
#[derive(Debug, Clone)]
pub struct ImageBlob {
    pub bytes: Vec<u8>,
    pub extension: String,
}

/// Append-only, time-ordered message log layered over the narrow store
/// collaborators. Ordering and write atomicity are the store's problem;
/// the log owns windowing, cursor resolution and image placement.
pub struct MessageLog<S, B> {
    store: Arc<S>,
    blobs: Arc<B>,
}

impl<S, B> Clone for MessageLog<S, B> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            blobs: self.blobs.clone(),
        }
    }
}

impl<S: RecordStore, B: BlobStore> MessageLog<S, B> {
    pub fn new(store: Arc<S>, blobs: Arc<B>) -> Self {
        Self { store, blobs }
    }

    /// Append a message. The returned value reflects what was actually
    /// persisted — server-assigned id and timestamp, blob URL included —
    /// never an echo of the caller's input.
    pub fn append(
        &self,
        author: &str,
        text: &str,
        image: Option<ImageBlob>,
    ) -> Result<Message, StoreError> {
        let mut record = self.store.append_message(NewMessageRecord {
            username: author.to_string(),
            text: text.to_string(),
        })?;

        if let Some(image) = image {
            let path = format!("images/{}.{}", record.id, image.extension);
            let url = self.blobs.put_blob(&image.bytes, &path)?;
            self.store.set_image_url(&record.id, &url)?;
            record.image_url = Some(url);
        }

        debug!("Appended message {} from {}", record.id, author);
        Ok(into_message(record))
    }

    /// Without a cursor: the newest 20 messages in ascending time order.
    /// With one: every message strictly after it, ascending, uncapped —
    /// or `NotFound` if the cursor no longer resolves. Each call is a
    /// fresh snapshot read.
    pub fn query(&self, cursor: Option<&str>) -> Result<Vec<Message>, StoreError> {
        let records = match cursor {
            None => self.store.latest_messages(FIRST_PAGE_LIMIT)?,
            Some(id) => {
                let cursor = self.store.get_message(id)?.ok_or(StoreError::NotFound)?;
                self.store.messages_after(&cursor)?
            }
        };

        Ok(records.into_iter().map(into_message).collect())
    }
}

fn into_message(record: MessageRecord) -> Message {
    Message {
        id: record.id,
        username: record.username,
        timestamp: record.created_at,
        text: record.text,
        image_url: record.image_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use std::sync::Mutex;

    struct TestBlobStore {
        puts: Mutex<Vec<String>>,
    }

    impl TestBlobStore {
        fn new() -> Self {
            Self {
                puts: Mutex::new(Vec::new()),
            }
        }
    }

    impl BlobStore for TestBlobStore {
        fn put_blob(&self, _bytes: &[u8], path: &str) -> Result<String, StoreError> {
            self.puts.lock().unwrap().push(path.to_string());
            Ok(format!("https://blobs.test/{}", path))
        }
    }

    fn fixtures() -> (Arc<Database>, MessageLog<Database, TestBlobStore>) {
        let store = Arc::new(Database::open_in_memory().unwrap());
        let log = MessageLog::new(store.clone(), Arc::new(TestBlobStore::new()));
        (store, log)
    }

    #[test]
    fn first_page_is_newest_twenty_ascending() {
        let (_, log) = fixtures();
        let mut ids = Vec::new();
        for i in 0..25 {
            ids.push(log.append("alice", &format!("message {}", i), None).unwrap().id);
        }

        let page = log.query(None).unwrap();
        assert_eq!(page.len(), 20);

        // The window covers the 20 most recent appends, oldest first.
        let got: Vec<&String> = page.iter().map(|m| &m.id).collect();
        let expected: Vec<&String> = ids[5..].iter().collect();
        assert_eq!(got, expected);

        for pair in page.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn first_page_of_an_empty_log_is_empty() {
        let (_, log) = fixtures();
        assert!(log.query(None).unwrap().is_empty());
    }

    #[test]
    fn cursor_query_returns_the_strict_suffix() {
        let (_, log) = fixtures();
        let ids: Vec<String> = (0..8)
            .map(|i| log.append("alice", &format!("m{}", i), None).unwrap().id)
            .collect();

        for k in [0usize, 3, 6, 7] {
            let after = log.query(Some(&ids[k])).unwrap();
            let got: Vec<&String> = after.iter().map(|m| &m.id).collect();
            let expected: Vec<&String> = ids[k + 1..].iter().collect();
            assert_eq!(got, expected, "suffix after index {}", k);
        }
    }

    #[test]
    fn cursor_query_is_uncapped() {
        let (_, log) = fixtures();
        let first = log.append("alice", "start", None).unwrap().id;
        for i in 0..30 {
            log.append("alice", &format!("m{}", i), None).unwrap();
        }

        assert_eq!(log.query(Some(&first)).unwrap().len(), 30);
    }

    #[test]
    fn unknown_cursor_is_not_found() {
        let (_, log) = fixtures();
        log.append("alice", "hi", None).unwrap();
        assert!(matches!(
            log.query(Some("no-such-id")).unwrap_err(),
            StoreError::NotFound
        ));
    }

    #[test]
    fn timestamps_never_decrease_across_appends() {
        let (_, log) = fixtures();
        for i in 0..10 {
            log.append("alice", &format!("m{}", i), None).unwrap();
        }
        let all = log.query(None).unwrap();
        for pair in all.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn image_append_records_the_blob_url() {
        let (store, log) = fixtures();
        let message = log
            .append(
                "alice",
                "look",
                Some(ImageBlob {
                    bytes: b"png-bytes".to_vec(),
                    extension: "png".into(),
                }),
            )
            .unwrap();

        let expected_url = format!("https://blobs.test/images/{}.png", message.id);
        assert_eq!(message.image_url.as_deref(), Some(expected_url.as_str()));

        // The stored record carries the URL too, not just the response.
        let stored = store.get_message(&message.id).unwrap().unwrap();
        assert_eq!(stored.image_url.as_deref(), Some(expected_url.as_str()));
    }
}
