//! # Core Application Logic
//!
//! Chatpad's business logic. It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • ChatHook (store I/O) │
//!                    └───────────┬─────────────┘
//!                                │ Action channel
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct — shared chat state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`chat_hook`]: Load/save orchestration between store and state
//! - [`config`]: Layered configuration

pub mod action;
pub mod chat_hook;
pub mod config;
pub mod state;
