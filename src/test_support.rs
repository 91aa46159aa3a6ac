//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::storage::chat::now_ms;
use crate::storage::{ChatMessage, ChatStore, NewChatMessage, PartialChatMessage, StoreError};

/// A stored message with the given id and creation time.
pub fn chat(id: &str, created_time: i64) -> ChatMessage {
    ChatMessage {
        id: id.to_string(),
        msg: format!("message {id}"),
        markup_language: 1,
        created_time,
        updated_time: created_time,
        deleted_time: 0,
        parent_id: None,
        encryption_applied: None,
        encryption_cipher_text: None,
    }
}

/// In-memory store that counts calls and fails on request.
#[derive(Default)]
pub struct FakeStore {
    chats: Mutex<Vec<ChatMessage>>,
    query_calls: AtomicUsize,
    save_calls: AtomicUsize,
    fail_query: AtomicBool,
    fail_save: AtomicBool,
    blank_ids: AtomicBool,
}

impl FakeStore {
    pub fn with_chats(chats: Vec<ChatMessage>) -> Self {
        Self {
            chats: Mutex::new(chats),
            ..Default::default()
        }
    }

    pub fn failing_query() -> Self {
        let store = Self::default();
        store.fail_query.store(true, Ordering::SeqCst);
        store
    }

    pub fn failing_save() -> Self {
        let store = Self::default();
        store.fail_save.store(true, Ordering::SeqCst);
        store
    }

    /// Saves succeed but hand back rows with an empty id.
    pub fn with_blank_ids() -> Self {
        let store = Self::default();
        store.blank_ids.store(true, Ordering::SeqCst);
        store
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Vec<ChatMessage> {
        self.chats.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatStore for FakeStore {
    async fn query_all(&self) -> Result<Vec<ChatMessage>, StoreError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_query.load(Ordering::SeqCst) {
            return Err(StoreError::Storage(rusqlite::Error::InvalidQuery));
        }
        Ok(self.stored())
    }

    async fn save(&self, partial: PartialChatMessage) -> Result<ChatMessage, StoreError> {
        let n = self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(StoreError::Storage(rusqlite::Error::InvalidQuery));
        }
        let id = if self.blank_ids.load(Ordering::SeqCst) {
            String::new()
        } else {
            format!("fake{n}")
        };
        let new = NewChatMessage::from_partial(partial, id, now_ms());
        let saved = ChatMessage {
            id: new.id,
            msg: new.msg,
            markup_language: new.markup_language,
            created_time: new.created_time,
            updated_time: new.updated_time,
            deleted_time: new.deleted_time,
            parent_id: None,
            encryption_applied: None,
            encryption_cipher_text: None,
        };
        self.chats.lock().unwrap().push(saved.clone());
        Ok(saved)
    }
}
