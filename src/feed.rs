//! Loading the repertoire: fetch the CSV export, parse it, and aggregate the
//! rows. Runs once at startup on a worker thread; see `ui::terminal`.

use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::catalog::group_songs;
use crate::csv::parse_csv;
use crate::error::FeedError;
use crate::models::Repertoire;

/// Published CSV export of the repertoire spreadsheet.
pub const DEFAULT_FEED_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vTU3F5BzPMQl8HlmVekRHQ4LI36mZUxHJixkQvA0JAj_PJt_Ne0Hqa3AEUgzk-jeHfnj2OT_9yRJSAC/pub?output=csv";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Where the CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Url { url: String, timeout: Duration },
    File(PathBuf),
}

impl FeedSource {
    pub fn describe(&self) -> String {
        match self {
            FeedSource::Url { url, .. } => url.clone(),
            FeedSource::File(path) => path.display().to_string(),
        }
    }
}

/// Fetch (or read) the feed and build the repertoire from it.
pub fn load_repertoire(source: &FeedSource) -> Result<Repertoire, FeedError> {
    let text = match source {
        FeedSource::Url { url, timeout } => fetch_text(url, *timeout)?,
        FeedSource::File(path) => fs::read_to_string(path).map_err(|source| FeedError::Io {
            path: path.clone(),
            source,
        })?,
    };
    debug!(bytes = text.len(), "feed text received");

    let repertoire = build_repertoire(&text)?;
    info!(
        source = %source.describe(),
        rows = repertoire.rows.len(),
        songs = repertoire.songs.len(),
        "repertoire loaded"
    );
    Ok(repertoire)
}

/// Load on a worker thread. The receiver yields exactly one result.
pub fn spawn_loader(source: FeedSource) -> Receiver<Result<Repertoire, FeedError>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The UI may already be gone if the user quit during the fetch.
        let _ = tx.send(load_repertoire(&source));
    });
    rx
}

/// Parse CSV text into a repertoire. The first row is the header.
pub fn build_repertoire(text: &str) -> Result<Repertoire, FeedError> {
    let mut rows = parse_csv(text);
    if rows.is_empty() {
        return Err(FeedError::Empty);
    }

    let header = rows.remove(0);
    let songs = group_songs(&rows);
    Ok(Repertoire {
        header,
        rows,
        songs,
    })
}

fn fetch_text(url: &str, timeout: Duration) -> Result<String, FeedError> {
    let http_error = |source: reqwest::Error| FeedError::Http {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(http_error)?;

    debug!(url, "fetching repertoire feed");
    let response = client
        .get(url)
        .header(reqwest::header::CACHE_CONTROL, "no-store")
        .send()
        .map_err(http_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Status {
            url: url.to_string(),
            status,
        });
    }

    response.text().map_err(http_error)
}
