//! Binary entry point. Startup order matters: persisted preferences and
//! progress are loaded first, then the feed fetch starts in the background,
//! and the TUI renders a loading state until the repertoire arrives.
use clap::Parser;
use repertoire_viewer::logging::init_logging;
use repertoire_viewer::{load_preferences, load_progress, open_store, run_app, spawn_loader, App, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let data_dir = cli.resolve_data_dir()?;
    init_logging(&data_dir)?;

    let conn = open_store(&data_dir)?;
    let prefs = load_preferences(&conn)?;
    let progress = load_progress(&conn)?;
    tracing::info!(?prefs, tracked = progress.len(), "restored local state");

    let source = cli.feed_source();
    tracing::info!(source = %source.describe(), "loading repertoire");
    let feed = spawn_loader(source);

    let mut app = App::new(conn, prefs, progress);
    run_app(&mut app, feed)
}
