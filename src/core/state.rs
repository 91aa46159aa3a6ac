//! # Application State
//!
//! Shared chat state. Domain data only - no TUI-specific types.
//! Presentation state (input text, scroll, send guard) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── chats: Vec<ChatMessage>   // oldest first, as the store returned them
//! ├── is_loading: bool          // initial load in flight
//! └── error: Option<String>     // load failure shown by the panel
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::storage::ChatMessage;

#[derive(Debug, Default)]
pub struct App {
    pub chats: Vec<ChatMessage>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_new_defaults() {
        let app = App::new();
        assert!(app.chats.is_empty());
        assert!(!app.is_loading);
        assert!(app.error.is_none());
    }
}
