//! # Actions
//!
//! Every change to shared chat state becomes an `Action`.
//! The hook finishes loading? That's `Action::ChatSetAll { chats }`.
//! A message is saved? That's `Action::ChatAdd { chat }`.
//!
//! The `update()` function takes the current state and an action and applies
//! it in place. No I/O here. The returned `Effect` tells the adapter what to
//! do next.
//!
//! ```text
//! State + Action  →  update()  →  New State (+ Effect)
//! ```

use log::debug;

use crate::core::state::App;
use crate::storage::ChatMessage;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ChatSetLoading { is_loading: bool },
    ChatSetAll { chats: Vec<ChatMessage> },
    ChatSetError { error: String },
    ChatAdd { chat: ChatMessage },
}

impl Action {
    /// Stable wire name, used in logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::ChatSetLoading { .. } => "CHAT_SET_LOADING",
            Action::ChatSetAll { .. } => "CHAT_SET_ALL",
            Action::ChatSetError { .. } => "CHAT_SET_ERROR",
            Action::ChatAdd { .. } => "CHAT_ADD",
        }
    }
}

/// What the adapter should do after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The message collection changed; re-pin the list to the newest entry.
    ChatsChanged,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {}", action.type_name());
    match action {
        Action::ChatSetLoading { is_loading } => {
            app.is_loading = is_loading;
            Effect::None
        }
        Action::ChatSetAll { chats } => {
            app.chats = chats;
            Effect::ChatsChanged
        }
        Action::ChatSetError { error } => {
            app.error = Some(error);
            Effect::None
        }
        Action::ChatAdd { chat } => {
            app.chats.push(chat);
            Effect::ChatsChanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::chat;

    #[test]
    fn test_set_loading() {
        let mut app = App::new();
        let effect = update(&mut app, Action::ChatSetLoading { is_loading: true });
        assert!(app.is_loading);
        assert_eq!(effect, Effect::None);

        update(&mut app, Action::ChatSetLoading { is_loading: false });
        assert!(!app.is_loading);
    }

    #[test]
    fn test_set_all_replaces_list() {
        let mut app = App::new();
        app.chats.push(chat("old", 1));

        let effect = update(
            &mut app,
            Action::ChatSetAll {
                chats: vec![chat("a", 10), chat("b", 20)],
            },
        );

        assert_eq!(effect, Effect::ChatsChanged);
        let ids: Vec<&str> = app.chats.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_add_appends() {
        let mut app = App::new();
        update(&mut app, Action::ChatSetAll { chats: vec![chat("a", 10)] });
        let effect = update(&mut app, Action::ChatAdd { chat: chat("b", 20) });

        assert_eq!(effect, Effect::ChatsChanged);
        assert_eq!(app.chats.len(), 2);
        assert_eq!(app.chats[1].id, "b");
    }

    #[test]
    fn test_set_error() {
        let mut app = App::new();
        let effect = update(
            &mut app,
            Action::ChatSetError {
                error: "disk on fire".to_string(),
            },
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(app.error.as_deref(), Some("disk on fire"));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(
            Action::ChatSetLoading { is_loading: true }.type_name(),
            "CHAT_SET_LOADING"
        );
        assert_eq!(Action::ChatSetAll { chats: vec![] }.type_name(), "CHAT_SET_ALL");
        assert_eq!(
            Action::ChatSetError { error: String::new() }.type_name(),
            "CHAT_SET_ERROR"
        );
        assert_eq!(Action::ChatAdd { chat: chat("a", 1) }.type_name(), "CHAT_ADD");
    }
}
