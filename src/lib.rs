//! Core library surface for the repertoire viewer.
//!
//! The pipeline is `feed` (fetch) → `csv` (parse) → `catalog` (aggregate) →
//! `filter` (search and order) → `ui` (render). Persistence of preferences and
//! progress lives in `db`.
pub mod catalog;
pub mod config;
pub mod csv;
pub mod db;
pub mod error;
pub mod feed;
pub mod filter;
pub mod logging;
pub mod models;
pub mod ui;

/// Convenience re-exports for the startup sequence in `main.rs`.
pub use config::Cli;
pub use db::{load_preferences, load_progress, open_store};
pub use feed::{load_repertoire, spawn_loader, FeedSource};

/// The domain types other layers manipulate.
pub use models::{Guide, Preferences, Progress, ProgressBook, Repertoire, SongRecord, SortKey};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
