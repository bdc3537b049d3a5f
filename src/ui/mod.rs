//! Ratatui front-end: cards and table views over the repertoire, a guide
//! modal, and a debounced search bar.

mod app;
mod helpers;
mod modal;
mod screens;
mod search;
mod terminal;

pub use app::App;
pub use terminal::run_app;
