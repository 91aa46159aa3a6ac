//! # ChatPanel Component
//!
//! The whole chat view: header, message list, input row.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Chat (3) | Sending...                        │  TitleBar
//! │ 2024-05-01 09:12:44: morning                 │
//! │ 2024-05-01 09:13:02: anyone around?          │  MessageList
//! │ 2024-05-01 09:15:40: ok, later then          │
//! │╭──────────────────────────────╮╭────────────╮│
//! ││ draft text                   ││ Sending... ││  InputBox
//! │╰──────────────────────────────╯╰────────────╯│
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Render states
//!
//! - **error**: the load error replaces the whole panel
//! - **loading**: a `Loading...` line replaces the list
//! - **normal**: list + input row
//!
//! ## Sending
//!
//! A send attempt is split around the hook call so the event loop can run
//! the save on a background task:
//!
//! ```text
//! Idle ──begin_send()──▶ Sending ──finish_send(Ok)──▶ Idle (input cleared)
//!                               └─finish_send(Err)─▶ Idle (input kept, error logged)
//! ```
//!
//! `begin_send` refuses while a send is in flight, which is the only thing
//! preventing double submits.

use log::error;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::core::state::App;
use crate::storage::{ChatMessage, StoreError};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::input_box::{INPUT_HEIGHT, InputBox, InputEvent};
use crate::tui::components::message_list::{MessageList, MessageListState, visible_chats};
use crate::tui::components::title_bar::TitleBar;
use crate::tui::event::TuiEvent;

pub const LOADING_TEXT: &str = "Loading...";
pub const LOAD_ERROR_PREFIX: &str = "Failed to load chat history: ";

/// Result of one save, handed back to the panel.
pub type SendOutcome = Result<Option<ChatMessage>, StoreError>;

/// Persistent panel state. Lives in `TuiState` across frames.
pub struct ChatPanelState {
    pub message_list: MessageListState,
    pub input: InputBox,
    is_sending: bool,
    mounted: bool,
}

impl Default for ChatPanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatPanelState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input: InputBox::new(),
            is_sending: false,
            mounted: false,
        }
    }

    /// True exactly once: the first time the panel becomes active.
    pub fn on_mount(&mut self) -> bool {
        !std::mem::replace(&mut self.mounted, true)
    }

    pub fn is_sending(&self) -> bool {
        self.is_sending
    }

    /// Current input text.
    pub fn message(&self) -> &str {
        self.input.text()
    }

    /// Start a send. Returns the text to save, or `None` when the input is
    /// blank or a send is already in flight.
    pub fn begin_send(&mut self) -> Option<String> {
        let text = self.input.text();
        if text.trim().is_empty() || self.is_sending {
            return None;
        }
        let text = text.to_string();
        self.set_sending(true);
        Some(text)
    }

    /// Finish the send started by `begin_send`.
    pub fn finish_send(&mut self, outcome: SendOutcome) {
        match outcome {
            Ok(_) => {
                self.input.clear();
                self.message_list.scroll_to_bottom();
            }
            Err(e) => error!("Sending chat message failed: {}", e),
        }
        self.set_sending(false);
    }

    /// The message collection changed; follow the newest entry.
    pub fn chats_changed(&mut self) {
        self.message_list.scroll_to_bottom();
    }

    fn set_sending(&mut self, sending: bool) {
        self.is_sending = sending;
        self.input.busy = sending;
    }

    /// Split the panel area into header, list and input row.
    pub fn layout(area: Rect) -> (Rect, Rect, Rect) {
        use Constraint::{Length, Min};
        let [title, list, input] = Layout::vertical([Length(1), Min(0), Length(INPUT_HEIGHT)]).areas(area);
        (title, list, input)
    }

    /// Translate a click into a send request if it landed on the send button.
    pub fn click(&self, panel_area: Rect, col: u16, row: u16) -> Option<InputEvent> {
        let (_, _, input_area) = Self::layout(panel_area);
        self.input.click(input_area, col, row)
    }
}

/// Input editing goes to the input box, scrolling to the list.
impl EventHandler for ChatPanelState {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp
            | TuiEvent::ScrollDown
            | TuiEvent::ScrollPageUp
            | TuiEvent::ScrollPageDown
            | TuiEvent::ScrollToBottom => self.message_list.handle_event(event).and(None),
            _ => self.input.handle_event(event),
        }
    }
}

/// Per-frame view over the panel state and shared app state.
pub struct ChatPanel<'a> {
    pub state: &'a mut ChatPanelState,
    pub app: &'a App,
}

impl<'a> ChatPanel<'a> {
    pub fn new(state: &'a mut ChatPanelState, app: &'a App) -> Self {
        Self { state, app }
    }

    fn status_message(&self) -> String {
        if self.app.is_loading {
            LOADING_TEXT.to_string()
        } else if self.state.is_sending {
            crate::tui::components::input_box::BUSY_LABEL.to_string()
        } else {
            String::new()
        }
    }
}

impl<'a> Component for ChatPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // The load error replaces the whole panel, header included
        if let Some(err) = &self.app.error {
            let error_view = Paragraph::new(format!("{LOAD_ERROR_PREFIX}{err}"))
                .block(Block::bordered().title("ERROR"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(error_view, area);
            return;
        }

        let (title_area, list_area, input_area) = ChatPanelState::layout(area);
        let message_count = visible_chats(&self.app.chats).len();

        let has_unseen_content = !self.state.message_list.stick_to_bottom;
        TitleBar::new(message_count, self.status_message(), has_unseen_content)
            .render(frame, title_area);

        if self.app.is_loading {
            frame.render_widget(Paragraph::new(LOADING_TEXT), list_area);
        } else {
            MessageList::new(&mut self.state.message_list, &self.app.chats).render(frame, list_area);
        }

        self.state.input.render(frame, input_area);
    }
}
