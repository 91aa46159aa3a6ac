//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the chat panel,
//! and translates keyboard and mouse events into panel operations.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Background work
//!
//! Store calls never run on the UI loop. The initial load and every send are
//! spawned on tokio and report back through two channels:
//!
//! ```text
//! ChatHook ──Action──▶ rx ──▶ update(&mut App) ──Effect──▶ panel
//! send task ──SendOutcome──▶ send_rx ──▶ panel.finish_send()
//! ```
//!
//! ## Redraw Strategy
//!
//! - **Busy** (loading or sending): polls every ~80ms so status changes show
//!   up promptly.
//! - **Idle**: sleeps up to 500ms, only redraws on events or channel traffic.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::chat_hook::ChatHook;
use crate::core::state::App;
use crate::storage::{ChatStore, Database, SqliteChatStore};
use crate::tui::component::EventHandler;
use crate::tui::components::{ChatPanelState, InputEvent, SendOutcome};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const BUSY_POLL: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core chat state)
pub struct TuiState {
    pub panel: ChatPanelState,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            panel: ChatPanelState::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock, // Blinking cursors flicker under continuous redraws
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

pub fn run(db: Arc<Database>) -> std::io::Result<()> {
    let store: Arc<dyn ChatStore> = Arc::new(SqliteChatStore::new(db));

    // Actions from the hook, outcomes from send tasks
    let (tx, rx) = mpsc::channel::<Action>();
    let (send_tx, send_rx) = mpsc::channel::<SendOutcome>();
    let hook = ChatHook::new(store, tx);

    let mut app = App::new();
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    if tui.panel.on_mount() {
        spawn_load(&hook);
    }

    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let busy = app.is_loading || tui.panel.is_sending();
        let timeout = if busy { BUSY_POLL } else { IDLE_POLL };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let input_event = match event {
                TuiEvent::Quit => {
                    should_quit = true;
                    break;
                }
                // Resize just needs a redraw (already flagged above)
                TuiEvent::Resize => continue,
                TuiEvent::MouseClick(col, row) => {
                    let frame_area = terminal.get_frame().area();
                    ui::hit_test_click(col, row, frame_area, &app, &tui)
                }
                // The load error view has no input row
                _ if app.error.is_some() => None,
                _ => tui.panel.handle_event(&event),
            };

            if let Some(InputEvent::Submit(_)) = input_event {
                start_send(&mut tui.panel, &hook, &send_tx);
            }
        }

        if should_quit {
            break;
        }

        // Hook actions first: a save's ChatAdd lands before its outcome
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            apply_action(&mut app, &mut tui, action);
        }
        while let Ok(outcome) = send_rx.try_recv() {
            needs_redraw = true;
            tui.panel.finish_send(outcome);
        }
    }

    info!("Shutting down");
    ratatui::restore();
    Ok(())
}

/// Feed one action through the reducer and apply its effect to the panel.
fn apply_action(app: &mut App, tui: &mut TuiState, action: Action) {
    debug!("Event loop received: {}", action.type_name());
    match update(app, action) {
        Effect::ChatsChanged => tui.panel.chats_changed(),
        Effect::None => {}
    }
}

fn spawn_load(hook: &ChatHook) {
    info!("Spawning initial chat load");
    let hook = hook.clone();
    tokio::spawn(async move { hook.load_all().await });
}

/// Begin a send on the panel and run the save in the background.
/// No-op when the panel refuses (blank input or a send already in flight).
fn start_send(panel: &mut ChatPanelState, hook: &ChatHook, send_tx: &mpsc::Sender<SendOutcome>) {
    let Some(text) = panel.begin_send() else {
        return;
    };
    info!("Spawning chat save ({} bytes)", text.len());
    let hook = hook.clone();
    let send_tx = send_tx.clone();
    tokio::spawn(async move {
        let outcome = hook.save(&text).await;
        if send_tx.send(outcome).is_err() {
            warn!("Failed to deliver send outcome: receiver dropped");
        }
    });
}
