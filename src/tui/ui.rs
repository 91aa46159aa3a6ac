use ratatui::Frame;
use ratatui::layout::Rect;

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{ChatPanel, InputEvent};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let area = frame.area();
    ChatPanel::new(&mut tui.panel, app).render(frame, area);
}

/// Hit test a left click against the frame layout.
///
/// Only the send button reacts to clicks, and not while the load error
/// view replaces the panel.
pub fn hit_test_click(
    col: u16,
    row: u16,
    frame_area: Rect,
    app: &App,
    tui: &TuiState,
) -> Option<InputEvent> {
    if app.error.is_some() {
        return None;
    }
    tui.panel.click(frame_area, col, row)
}
