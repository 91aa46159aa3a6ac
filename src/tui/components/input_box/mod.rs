//! # InputBox Component
//!
//! Single-line message field with a send button on the right.
//!
//! ## Responsibilities
//!
//! - Capture text input
//! - Handle editing (backspace, delete, cursor movement, paste)
//! - Handle submission (Enter)
//! - Render the busy state while a send is in flight
//!
//! ## State Management
//!
//! The buffer is internal state. `busy` is a prop driven by the panel's send
//! guard: while it is set the field ignores every edit and the button reads
//! `Sending...`. Submitting does not clear the buffer; the panel clears it
//! once the save has succeeded.

mod cursor;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::{CursorState, next_char_boundary, prev_char_boundary};

pub const PLACEHOLDER: &str = "Type a message...";
pub const SEND_LABEL: &str = "Send";
pub const BUSY_LABEL: &str = "Sending...";

/// Borders (left + right) around the text field.
const HORIZONTAL_OVERHEAD: u16 = 2;
/// Button width: the longer label plus borders and one cell of padding each side.
const BUTTON_WIDTH: u16 = BUSY_LABEL.len() as u16 + 4;
/// Field + button are both one bordered line tall.
pub const INPUT_HEIGHT: u16 = 3;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User asked to send (Enter or button click)
    Submit(String),
    /// Text content or cursor changed
    ContentChanged,
}

/// Text input component with a send button.
///
/// # Props
///
/// - `busy`: a send is in flight (from the panel)
///
/// # State
///
/// - `buffer`: Current text being typed
/// - `cursor`: Cursor position and horizontal scroll (see `CursorState`)
pub struct InputBox {
    buffer: String,
    /// A send is in flight (Prop)
    pub busy: bool,
    cursor: CursorState,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            busy: false,
            cursor: CursorState::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor.pos = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor.reset();
    }

    /// Split `area` into the text field and the send button.
    pub fn layout(area: Rect) -> (Rect, Rect) {
        let [field, button] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(BUTTON_WIDTH)]).areas(area);
        (field, button)
    }

    fn button_label(&self) -> &'static str {
        if self.busy { BUSY_LABEL } else { SEND_LABEL }
    }

    fn submit(&self) -> Option<InputEvent> {
        (!self.busy && !self.buffer.trim().is_empty())
            .then(|| InputEvent::Submit(self.buffer.clone()))
    }

    /// Submit if the button was clicked. Clicks elsewhere are ignored.
    pub fn click(&self, area: Rect, col: u16, row: u16) -> Option<InputEvent> {
        let (_, button) = Self::layout(area);
        let inside = col >= button.x
            && col < button.x + button.width
            && row >= button.y
            && row < button.y + button.height;
        if inside { self.submit() } else { None }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (field_area, button_area) = Self::layout(area);
        let field_width = field_area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        self.cursor.update_scroll(&self.buffer, field_width);

        let border_style = if self.busy {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        let field = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.cursor.visible(&self.buffer, field_width)).style(border_style)
        };
        frame.render_widget(field.block(block), field_area);

        let button_style = if self.busy {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
        } else {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        };
        let button = Paragraph::new(self.button_label())
            .centered()
            .style(button_style)
            .block(Block::bordered().border_type(BorderType::Rounded));
        frame.render_widget(button, button_area);

        if !self.busy {
            let col = self.cursor.column(&self.buffer).saturating_sub(self.cursor.scroll_cols);
            let x = field_area.x + 1 + col as u16;
            frame.set_cursor_position((x.min(field_area.right().saturating_sub(2)), field_area.y + 1));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.busy {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor.pos, *c);
                self.cursor.pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line field: fold line breaks into spaces
                let text: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                self.buffer.insert_str(self.cursor.pos, &text);
                self.cursor.pos += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor.pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(prev..self.cursor.pos);
                    self.cursor.pos = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor.pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(self.cursor.pos..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => (self.cursor.pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor.pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor.pos != 0).then(|| {
                self.cursor.pos = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor.pos != self.buffer.len()).then(|| {
                self.cursor.pos = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => self.submit(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered_text(input: &mut InputBox, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, INPUT_HEIGHT)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                input.render(f, area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_handle_input() {
        let mut input = InputBox::new();

        let res = input.handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(res, Some(InputEvent::ContentChanged));
        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.text(), "ab");

        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::InputChar('x'));
        assert_eq!(input.text(), "axb");

        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.text(), "ab");

        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.text(), "b");
    }

    #[test]
    fn test_submit_keeps_buffer() {
        let mut input = InputBox::new();
        input.set_text("hello");

        let res = input.handle_event(&TuiEvent::Submit);
        assert_eq!(res, Some(InputEvent::Submit("hello".to_string())));
        assert_eq!(input.text(), "hello", "panel clears the buffer after a successful save");
    }

    #[test]
    fn test_submit_blank_is_ignored() {
        let mut input = InputBox::new();
        input.set_text("   ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_busy_ignores_edits_and_submit() {
        let mut input = InputBox::new();
        input.set_text("hello");
        input.busy = true;

        assert_eq!(input.handle_event(&TuiEvent::InputChar('!')), None);
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.text(), "hello");
    }

    #[test]
    fn test_paste_folds_newlines() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("one\ntwo".to_string()));
        assert_eq!(input.text(), "one two");
    }

    #[test]
    fn test_click_on_button_submits() {
        let mut input = InputBox::new();
        input.set_text("hi");
        let area = Rect::new(0, 10, 40, INPUT_HEIGHT);
        let (field, button) = InputBox::layout(area);

        assert_eq!(
            input.click(area, button.x + 1, button.y + 1),
            Some(InputEvent::Submit("hi".to_string()))
        );
        assert_eq!(input.click(area, field.x + 1, field.y + 1), None);
    }

    #[test]
    fn test_render_labels() {
        let mut input = InputBox::new();
        let idle = rendered_text(&mut input, 40);
        assert!(idle.contains(SEND_LABEL));
        assert!(idle.contains(PLACEHOLDER));

        input.set_text("draft");
        input.busy = true;
        let busy = rendered_text(&mut input, 40);
        assert!(busy.contains(BUSY_LABEL));
        assert!(busy.contains("draft"));
    }
}
