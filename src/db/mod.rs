//! Local persistence split across logical submodules. A single SQLite
//! key-value table stands in for browser local storage: preferences and the
//! progress book each live under fixed keys.

mod connection;
mod kv;
mod preferences;
mod progress;

pub use connection::{default_data_dir, ensure_schema, open_store};
pub use kv::{get_value, set_value};
pub use preferences::{load_preferences, save_preferences};
pub use progress::{load_progress, save_progress};
