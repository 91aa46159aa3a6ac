//! # MessageList Component
//!
//! Scrollable view of the chat history.
//!
//! ## Responsibilities
//!
//! - Display the list of stored messages, oldest at the top
//! - Manage scrolling (wheel, arrows, page keys, End)
//! - Stick to the newest message until the user scrolls away
//! - Cache row heights so long histories stay cheap to lay out
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the chat slice (props).

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::storage::ChatMessage;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent panel state.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
        }
    }

    /// Re-attach to the newest message. Applied on the next render.
    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }
}

/// Scrollable chat history component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    /// Rows to show, already filtered to those with an id
    pub chats: Vec<&'a ChatMessage>,
}

impl<'a> MessageList<'a> {
    /// Rows without an id are dropped here and never reach the layout.
    pub fn new(state: &'a mut MessageListState, chats: &'a [ChatMessage]) -> Self {
        Self {
            state,
            chats: visible_chats(chats),
        }
    }
}

/// Entries that can be rendered (non-empty id), in order.
pub fn visible_chats(chats: &[ChatMessage]) -> Vec<&ChatMessage> {
    chats.iter().filter(|chat| !chat.id.is_empty()).collect()
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.chats.is_empty() {
            let empty = Paragraph::new("No messages yet.")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Update layout cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(&self.chats, content_width);
        layout.heights.truncate(reusable);
        for chat in self.chats.iter().skip(layout.heights.len()) {
            layout.heights.push(Message::calculate_height(chat, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(&self.chats, content_width);

        let total_height = layout.total_height();

        // 2. Clamp unless auto-scrolling
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        // Pinned lists render the tail even before the scroll state catches up
        let scroll_offset = if self.state.stick_to_bottom {
            total_height.saturating_sub(area.height)
        } else {
            self.state.scroll_state.offset().y
        };
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible rows into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        let window_start = self.state.layout.window_start;
        for i in visible_range {
            let height = self.state.layout.heights[window_start + i];
            let row_rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(Message::new(self.chats[window_start + i]), row_rect);
            y_offset = y_offset.saturating_add(height);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Event handling lives on the persistent state, not the per-frame component.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => self.scroll_to_bottom(),
            _ => {}
        }
        None
    }
}

/// Tallest scrollable content; the scroll view addresses rows with `u16`.
const MAX_CONTENT_HEIGHT: u32 = u16::MAX as u32;

/// Cached layout measurements
///
/// `heights` covers every row. Only the newest rows that fit in
/// `MAX_CONTENT_HEIGHT` lines are laid out: `window_start` is the first of
/// them and `prefix_heights` is indexed relative to it.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    pub window_start: usize,
    message_count: usize,
    content_width: u16,
    /// Id of the last measured row; a mismatch means the list was replaced.
    last_id: Option<String>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            window_start: 0,
            message_count: 0,
            content_width: 0,
            last_id: None,
        }
    }

    /// Number of leading heights still valid for `chats` at `content_width`.
    ///
    /// Stored messages never change, so an append keeps every cached row. A
    /// width change, a shorter list, or a different row at the old tail
    /// (the list was reloaded) invalidates everything.
    pub fn reusable_count(&self, chats: &[&ChatMessage], content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        if chats.len() < self.message_count || self.message_count == 0 {
            return 0;
        }
        let tail_matches = chats
            .get(self.message_count - 1)
            .is_some_and(|chat| self.last_id.as_deref() == Some(chat.id.as_str()));
        if tail_matches { self.message_count } else { 0 }
    }

    pub fn update_metadata(&mut self, chats: &[&ChatMessage], content_width: u16) {
        self.message_count = chats.len();
        self.content_width = content_width;
        self.last_id = chats.last().map(|chat| chat.id.clone());
    }

    /// Pick the window of newest rows that fits, then sum its heights.
    pub fn rebuild_prefix_heights(&mut self) {
        let mut total: u32 = 0;
        let mut start = self.heights.len();
        while start > 0 {
            let next = total + u32::from(self.heights[start - 1]);
            if next > MAX_CONTENT_HEIGHT {
                break;
            }
            total = next;
            start -= 1;
        }
        self.window_start = start;

        self.prefix_heights = self.heights[start..]
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::chat;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn measured(cache: &mut LayoutCache, chats: &[&ChatMessage], width: u16) {
        cache.heights = chats.iter().map(|c| Message::calculate_height(c, width)).collect();
        cache.rebuild_prefix_heights();
        cache.update_metadata(chats, width);
    }

    #[test]
    fn test_visible_chats_drops_missing_ids() {
        let chats = vec![chat("a", 1), chat("", 2), chat("c", 3)];
        let ids: Vec<&str> = visible_chats(&chats).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_layout_cache_reusable_on_append() {
        let (a, b, c) = (chat("a", 1), chat("b", 2), chat("c", 3));
        let mut cache = LayoutCache::new();
        measured(&mut cache, &[&a, &b], 80);

        assert_eq!(cache.reusable_count(&[&a, &b], 80), 2);
        assert_eq!(cache.reusable_count(&[&a, &b, &c], 80), 2);
    }

    #[test]
    fn test_layout_cache_invalidated() {
        let (a, b, c) = (chat("a", 1), chat("b", 2), chat("c", 3));
        let mut cache = LayoutCache::new();
        measured(&mut cache, &[&a, &b], 80);

        // Width changed
        assert_eq!(cache.reusable_count(&[&a, &b], 40), 0);
        // List shrank
        assert_eq!(cache.reusable_count(&[&a], 80), 0);
        // List replaced with different rows
        assert_eq!(cache.reusable_count(&[&a, &c], 80), 0);
    }

    #[test]
    fn test_visible_range_covers_viewport() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![1; 100];
        cache.rebuild_prefix_heights();

        let range = cache.visible_range(50, 10);
        assert!(range.contains(&50));
        assert!(range.contains(&59));
        assert!(range.end <= 100);
    }

    #[test]
    fn test_layout_window_keeps_newest_rows_when_history_is_tall() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![2; 40_000];
        cache.rebuild_prefix_heights();

        // 32,767 rows of 2 lines is the most that fits
        assert_eq!(cache.window_start, 40_000 - 32_767);
        assert_eq!(cache.prefix_heights.len(), 32_767);
        assert_eq!(cache.total_height(), 65_534);

        let bottom = cache.total_height() - 10;
        let range = cache.visible_range(bottom, 10);
        assert_eq!(range.end, cache.prefix_heights.len());
    }

    #[test]
    fn test_layout_window_covers_everything_when_short() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 1, 2];
        cache.rebuild_prefix_heights();

        assert_eq!(cache.window_start, 0);
        assert_eq!(cache.prefix_heights, vec![3, 4, 6]);
    }

    #[test]
    fn test_scroll_up_unpins_and_end_repins() {
        let mut state = MessageListState::new();
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_render_sticks_to_newest_message() {
        let chats: Vec<ChatMessage> = (0..30)
            .map(|i| ChatMessage {
                msg: format!("line {i}"),
                ..chat(&format!("id{i}"), i)
            })
            .collect();
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 5)).unwrap();

        terminal
            .draw(|f| {
                let area = f.area();
                MessageList::new(&mut state, &chats).render(f, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("line 29"));
        assert!(!text.contains("line 0 "));
    }

    #[test]
    fn test_render_empty_list() {
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                MessageList::new(&mut state, &[]).render(f, area);
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("No messages yet."));
    }

    #[test]
    fn test_render_shows_newest_row_past_u16_lines() {
        // Every row wraps to two lines at this width: 80,000 lines in total
        let chats: Vec<ChatMessage> = (0..40_000)
            .map(|i| ChatMessage {
                msg: format!("r{i}"),
                ..chat(&format!("id{i}"), 0)
            })
            .collect();
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(24, 6)).unwrap();

        terminal
            .draw(|f| {
                let area = f.area();
                MessageList::new(&mut state, &chats).render(f, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("r39999"));
        assert!(state.layout.window_start > 0);
    }
}
