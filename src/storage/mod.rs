//! # Storage
//!
//! Everything that touches SQLite lives here.
//!
//! ```text
//! ChatStore (trait)          ← what the hook talks to
//!     └── SqliteChatStore    ← rusqlite implementation
//!             └── Database   ← select_all / select_one / exec
//!                     └── migrations::migrate() on open
//! ```
//!
//! The rest of the crate only sees [`ChatStore`] and [`StoreError`], so the
//! hook can be tested against an in-memory fake without a database.

pub mod chat;
pub mod database;
pub mod error;
pub mod migrations;

pub use chat::{ChatMessage, ChatStore, NewChatMessage, PartialChatMessage, SqliteChatStore};
pub use database::{Database, SqlQuery, insert_query};
pub use error::StoreError;
