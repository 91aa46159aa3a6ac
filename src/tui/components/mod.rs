//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `TitleBar`: `Chat` header with message count and status
//! - `Message`: One timestamped chat row
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: Text field with send button
//! - `MessageList`: Scrollable history with layout caching
//! - `ChatPanel`: Composes the above and owns the send guard
//!
//! ### Props-Based Data Flow
//!
//! Components receive external data as "props" (struct fields), not by
//! reaching into global state:
//!
//! ```rust,ignore
//! // Dependencies are explicit
//! TitleBar::new(app.chats.len(), status, unseen).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── chat_panel.rs    (Header + list + input, send lifecycle)
//! ├── title_bar.rs     (Header line)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable message container)
//! └── input_box/       (Text input with send button)
//! ```

pub mod chat_panel;
pub mod input_box;
pub mod message;
pub mod message_list;
mod title_bar;

pub use chat_panel::{ChatPanel, ChatPanelState, SendOutcome};
pub use input_box::InputEvent;
