//! # Chat Message Store
//!
//! The `chats` table and the two operations the feature needs: list every
//! live message, and append a new one.
//!
//! ```text
//! PartialChatMessage ──from_partial()──▶ NewChatMessage ──insert──▶ chats
//!                                                                     │
//!                          ChatMessage ◀──────── re-read by id ───────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{error, info};
use rusqlite::Row;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::storage::{Database, StoreError, insert_query};

pub const CHATS_TABLE: &str = "chats";

/// Default `markup_language` tag for new messages.
pub const DEFAULT_MARKUP_LANGUAGE: i64 = 1;

const SELECT_LIVE_SQL: &str =
    "SELECT * FROM chats WHERE deleted_time = 0 OR deleted_time IS NULL ORDER BY created_time ASC";
const SELECT_BY_ID_SQL: &str = "SELECT * FROM chats WHERE id = ?";

/// A stored chat message, as read back from the database.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub msg: String,
    pub markup_language: i64,
    pub created_time: i64,
    pub updated_time: i64,
    /// 0 = live. Nothing in this crate sets it.
    pub deleted_time: i64,
    // Reserved columns, carried through reads only.
    pub parent_id: Option<String>,
    pub encryption_applied: Option<i64>,
    pub encryption_cipher_text: Option<String>,
}

impl ChatMessage {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            msg: row.get::<_, Option<String>>("msg")?.unwrap_or_default(),
            markup_language: row
                .get::<_, Option<i64>>("markup_language")?
                .unwrap_or(DEFAULT_MARKUP_LANGUAGE),
            created_time: row.get::<_, Option<i64>>("created_time")?.unwrap_or(0),
            updated_time: row.get::<_, Option<i64>>("updated_time")?.unwrap_or(0),
            deleted_time: row.get::<_, Option<i64>>("deleted_time")?.unwrap_or(0),
            parent_id: row.get("parent_id")?,
            encryption_applied: row.get("encryption_applied")?,
            encryption_cipher_text: row.get("encryption_cipher_text")?,
        })
    }
}

/// Caller-supplied fields for a new message. Everything is optional.
///
/// `id` is accepted but always replaced by the store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartialChatMessage {
    pub id: Option<String>,
    pub msg: Option<String>,
    pub created_time: Option<i64>,
    pub deleted_time: Option<i64>,
    pub markup_language: Option<i64>,
}

impl PartialChatMessage {
    pub fn with_msg(msg: impl Into<String>) -> Self {
        Self {
            msg: Some(msg.into()),
            ..Default::default()
        }
    }
}

/// A fully populated row, ready to insert.
#[derive(Clone, Debug, PartialEq)]
pub struct NewChatMessage {
    pub id: String,
    pub msg: String,
    pub markup_language: i64,
    pub created_time: i64,
    pub updated_time: i64,
    pub deleted_time: i64,
}

impl NewChatMessage {
    /// Fill defaults. Zero `created_time` and `markup_language` count as unset.
    pub fn from_partial(partial: PartialChatMessage, id: String, now_ms: i64) -> Self {
        Self {
            id,
            msg: partial.msg.unwrap_or_default(),
            markup_language: partial
                .markup_language
                .filter(|m| *m != 0)
                .unwrap_or(DEFAULT_MARKUP_LANGUAGE),
            created_time: partial.created_time.filter(|t| *t != 0).unwrap_or(now_ms),
            updated_time: now_ms,
            deleted_time: partial.deleted_time.unwrap_or(0),
        }
    }

    fn into_record(self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::Text(self.id)),
            ("msg", Value::Text(self.msg)),
            ("markup_language", Value::Integer(self.markup_language)),
            ("created_time", Value::Integer(self.created_time)),
            ("updated_time", Value::Integer(self.updated_time)),
            ("deleted_time", Value::Integer(self.deleted_time)),
        ]
    }
}

/// Fresh 32-char hex identifier.
pub fn new_chat_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Persistence capability for chat messages.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// All live messages, oldest first.
    async fn query_all(&self) -> Result<Vec<ChatMessage>, StoreError>;

    /// Insert a new message and return it as stored.
    async fn save(&self, partial: PartialChatMessage) -> Result<ChatMessage, StoreError>;
}

/// [`ChatStore`] backed by the `chats` SQLite table.
#[derive(Clone)]
pub struct SqliteChatStore {
    db: Arc<Database>,
}

impl SqliteChatStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn query_all_blocking(db: &Database) -> Result<Vec<ChatMessage>, StoreError> {
        db.select_all(SELECT_LIVE_SQL, &[], ChatMessage::from_row)
    }

    fn save_blocking(db: &Database, partial: PartialChatMessage) -> Result<ChatMessage, StoreError> {
        let record = NewChatMessage::from_partial(partial, new_chat_id(), now_ms());
        let id = record.id.clone();

        let query = insert_query(CHATS_TABLE, record.into_record());
        db.exec(&query.sql, &query.params)?;

        db.select_one(SELECT_BY_ID_SQL, &[Value::Text(id.clone())], ChatMessage::from_row)?
            .ok_or(StoreError::NotFound(id))
    }
}

#[async_trait]
impl ChatStore for SqliteChatStore {
    async fn query_all(&self) -> Result<Vec<ChatMessage>, StoreError> {
        let db = self.db.clone();
        let result = tokio::task::spawn_blocking(move || Self::query_all_blocking(&db))
            .await
            .map_err(StoreError::from)
            .and_then(|r| r);

        match &result {
            Ok(chats) => info!("Loaded {} chat messages", chats.len()),
            Err(e) => error!("Failed to load chat messages: {}", e),
        }
        result
    }

    async fn save(&self, partial: PartialChatMessage) -> Result<ChatMessage, StoreError> {
        let db = self.db.clone();
        let result = tokio::task::spawn_blocking(move || Self::save_blocking(&db, partial))
            .await
            .map_err(StoreError::from)
            .and_then(|r| r);

        match &result {
            Ok(chat) => info!("Saved chat message {}", chat.id),
            Err(e) => error!("Failed to save chat message: {}", e),
        }
        result
    }
}
