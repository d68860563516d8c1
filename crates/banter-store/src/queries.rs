use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::Database;
use crate::error::StoreError;
use crate::records::{AccountRecord, MessageRecord, NewMessageRecord, RecordStore};

const MESSAGE_COLUMNS: &str = "id, username, text, image_url, created_at";

impl RecordStore for Database {
    // -- Messages --

    fn get_message(&self, id: &str) -> Result<Option<MessageRecord>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"
            ))?;
            Ok(stmt.query_row([id], map_message).optional()?)
        })
    }

    fn append_message(&self, record: NewMessageRecord) -> Result<MessageRecord, StoreError> {
        let id = Uuid::new_v4().to_string();
        // Truncate to the precision we persist so the returned record
        // matches what a later read will see.
        let created_at = Utc::now().trunc_subsecs(6);

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, username, text, image_url, created_at)
                 VALUES (?1, ?2, ?3, NULL, ?4)",
                rusqlite::params![id, record.username, record.text, encode_timestamp(&created_at)],
            )?;
            Ok(())
        })?;

        Ok(MessageRecord {
            id,
            username: record.username,
            created_at,
            text: record.text,
            image_url: None,
        })
    }

    fn latest_messages(&self, limit: u32) -> Result<Vec<MessageRecord>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?1"
            ))?;
            let mut rows = stmt
                .query_map([limit], map_message)?
                .collect::<Result<Vec<_>, _>>()?;

            // Newest-N window, presented oldest first.
            rows.reverse();
            Ok(rows)
        })
    }

    fn messages_after(&self, cursor: &MessageRecord) -> Result<Vec<MessageRecord>, StoreError> {
        self.with_conn(|conn| {
            // Start-after-record semantics: ties on created_at fall back
            // to insertion order (rowid).
            let mut stmt = conn.prepare(
                "SELECT m.id, m.username, m.text, m.image_url, m.created_at
                 FROM messages m, messages c
                 WHERE c.id = ?1
                   AND (m.created_at > c.created_at
                        OR (m.created_at = c.created_at AND m.rowid > c.rowid))
                 ORDER BY m.created_at ASC, m.rowid ASC",
            )?;
            let rows = stmt
                .query_map([&cursor.id], map_message)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn set_image_url(&self, id: &str, url: &str) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE messages SET image_url = ?2 WHERE id = ?1",
                rusqlite::params![id, url],
            )?;
            if updated == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    // -- Accounts --

    fn get_account(&self, username: &str) -> Result<Option<AccountRecord>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT username, password FROM accounts WHERE username = ?1")?;
            let row = stmt
                .query_row([username], |row| {
                    Ok(AccountRecord {
                        username: row.get(0)?,
                        password_hash: row.get(1)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    fn create_account(&self, username: &str, password_hash: &str) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO accounts (username, password) VALUES (?1, ?2)",
                (username, password_hash),
            )?;
            Ok(())
        })
    }
}

fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    // Fixed-width RFC 3339 UTC so lexicographic order in SQL is
    // chronological order.
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn map_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRecord> {
    let created_at: String = row.get(4)?;
    Ok(MessageRecord {
        id: row.get(0)?,
        username: row.get(1)?,
        text: row.get(2)?,
        image_url: row.get(3)?,
        created_at: created_at.parse::<DateTime<Utc>>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?,
    })
}
