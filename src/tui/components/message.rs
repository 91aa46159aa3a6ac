use chrono::{Local, TimeZone};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use crate::storage::ChatMessage;
use crate::tui::component::Component;

/// Separator between the timestamp and the message body.
const SEPARATOR: &str = ": ";
/// Format used for row timestamps, in the local timezone.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local-time rendering of an epoch-millisecond timestamp.
///
/// Falls back to the raw number when the value is out of chrono's range.
pub fn format_timestamp(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// A single chat row: `<timestamp>: <body>`.
///
/// Transient like the other row components: built each frame from a borrowed
/// `ChatMessage`, holds no state of its own.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub chat: &'a ChatMessage,
}

impl<'a> Message<'a> {
    pub fn new(chat: &'a ChatMessage) -> Self {
        Self { chat }
    }

    /// The wrapped paragraph used both to measure and to draw a row.
    fn paragraph(chat: &ChatMessage) -> Paragraph<'_> {
        let line = Line::from(vec![
            Span::styled(
                format_timestamp(chat.created_time),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(SEPARATOR, Style::default().fg(Color::DarkGray)),
            Span::raw(chat.msg.trim()),
        ]);
        Paragraph::new(line).wrap(Wrap { trim: true })
    }

    /// Rendered height at `width`, measured with the same wrapper that draws.
    pub fn calculate_height(chat: &ChatMessage, width: u16) -> u16 {
        if width == 0 {
            return 1;
        }
        let lines = Self::paragraph(chat).line_count(width);
        u16::try_from(lines).unwrap_or(u16::MAX).max(1)
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        Self::paragraph(self.chat).render(area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::chat;

    fn with_body(body: &str) -> ChatMessage {
        ChatMessage {
            msg: body.to_string(),
            ..chat("a", 0)
        }
    }

    #[test]
    fn format_timestamp_matches_local_time() {
        let expected = Local
            .timestamp_millis_opt(1_700_000_000_000)
            .unwrap()
            .format(TIMESTAMP_FORMAT)
            .to_string();
        assert_eq!(format_timestamp(1_700_000_000_000), expected);
    }

    #[test]
    fn format_timestamp_out_of_range_falls_back() {
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        assert_eq!(Message::calculate_height(&with_body("hello"), 0), 1);
    }

    #[test]
    fn calculate_height_single_line_fits() {
        assert_eq!(Message::calculate_height(&with_body("hello"), 80), 1);
    }

    #[test]
    fn calculate_height_wraps_long_body() {
        let body = "word ".repeat(40);
        // Timestamp (19) + separator (2) + 200 chars of body at width 40
        assert!(Message::calculate_height(&with_body(&body), 40) >= 5);
    }

    #[test]
    fn render_shows_timestamp_and_body() {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        let mut terminal = Terminal::new(TestBackend::new(60, 1)).unwrap();
        let message = with_body("hello there");
        terminal
            .draw(|f| f.render_widget(Message::new(&message), f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains(&format_timestamp(0)));
        assert!(text.contains("hello there"));
    }

    fn rows(chat: &ChatMessage, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = ratatui::buffer::Buffer::empty(area);
        Widget::render(Message::new(chat), area, &mut buf);
        (0..height)
            .map(|y| (0..width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn calculate_height_matches_render_for_wide_text_and_long_words() {
        let body = format!("{} {}", "界".repeat(25), "x".repeat(70));
        let message = with_body(&body);
        let width = 20;
        let height = Message::calculate_height(&message, width);

        // One extra row: the predicted rows hold everything, the extra stays blank
        let rows = rows(&message, width, height + 1);
        assert!(!rows[height as usize - 1].trim().is_empty());
        assert!(rows[height as usize].trim().is_empty());
    }
}
