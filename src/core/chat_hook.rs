//! # Chat Hook
//!
//! Bridges the chat panel to the store. The hook never touches `App`
//! directly: it sends `Action`s down the dispatch channel and the adapter
//! feeds them through `update()`.
//!
//! ```text
//! load_all():  SetLoading(true) → query_all → SetAll | SetError → SetLoading(false)
//! save(text):  trim → (empty? return None) → store.save → Add
//! ```

use std::sync::Arc;
use std::sync::mpsc::Sender;

use log::{error, warn};

use crate::core::action::Action;
use crate::storage::chat::{DEFAULT_MARKUP_LANGUAGE, now_ms};
use crate::storage::{ChatMessage, ChatStore, PartialChatMessage, StoreError};

#[derive(Clone)]
pub struct ChatHook {
    store: Arc<dyn ChatStore>,
    dispatch: Sender<Action>,
}

impl ChatHook {
    pub fn new(store: Arc<dyn ChatStore>, dispatch: Sender<Action>) -> Self {
        Self { store, dispatch }
    }

    fn dispatch(&self, action: Action) {
        let name = action.type_name();
        if self.dispatch.send(action).is_err() {
            warn!("Failed to dispatch {}: receiver dropped", name);
        }
    }

    /// Load every stored message into shared state.
    ///
    /// Failures end up in `App::error` instead of being returned. The loading
    /// flag is always cleared at the end.
    pub async fn load_all(&self) {
        self.dispatch(Action::ChatSetLoading { is_loading: true });

        match self.store.query_all().await {
            Ok(chats) => self.dispatch(Action::ChatSetAll { chats }),
            Err(e) => {
                error!("Loading chat history failed: {}", e);
                self.dispatch(Action::ChatSetError {
                    error: e.to_string(),
                });
            }
        }

        self.dispatch(Action::ChatSetLoading { is_loading: false });
    }

    /// Save `text` as a new message and append it to shared state.
    ///
    /// Blank text is ignored: `Ok(None)`, no store call, nothing dispatched.
    pub async fn save(&self, text: &str) -> Result<Option<ChatMessage>, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let partial = PartialChatMessage {
            msg: Some(text.to_string()),
            created_time: Some(now_ms()),
            deleted_time: Some(0),
            markup_language: Some(DEFAULT_MARKUP_LANGUAGE),
            ..Default::default()
        };

        match self.store.save(partial).await {
            Ok(chat) => {
                // Only rows with an id enter state
                if chat.id.is_empty() {
                    warn!("Saved chat message came back without an id, not adding it");
                } else {
                    self.dispatch(Action::ChatAdd { chat: chat.clone() });
                }
                Ok(Some(chat))
            }
            Err(e) => {
                error!("Saving chat message failed: {}", e);
                Err(e)
            }
        }
    }
}
