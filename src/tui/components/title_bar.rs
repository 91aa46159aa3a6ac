//! # TitleBar Component
//!
//! The `Chat` header line at the top of the panel.
//!
//! ## Responsibilities
//!
//! - Show the panel title and how many messages are stored
//! - Show a transient status ("Loading...", "Sending...")
//! - Show "↓ New" when the list is scrolled away from the newest message
//!
//! Stateless: every field is a prop, rebuilt by the panel each frame.
//!
//! ## Conditional Formatting
//!
//! 1. **Unseen content**: `"Chat (3) | Sending... | ↓ New"`
//! 2. **Status message**: `"Chat (3) | Sending..."`
//! 3. **Default**: `"Chat (3)"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

pub const TITLE: &str = "Chat";

pub struct TitleBar {
    /// Number of rendered messages
    pub message_count: usize,
    /// Status message (e.g., "Loading...", "Sending...")
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(message_count: usize, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            message_count,
            status_message,
            has_unseen_content,
        }
    }

    fn text(&self) -> String {
        let mut text = format!("{} ({})", TITLE, self.message_count);
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status_message);
        }
        if self.has_unseen_content {
            text.push_str(" | ↓ New");
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let span = Span::styled(self.text(), Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(span, area);
    }
}
