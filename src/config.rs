//! Command-line configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use crate::db::default_data_dir;
use crate::feed::{FeedSource, DEFAULT_FEED_URL};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Browse the violin repertoire spreadsheet from the terminal."
)]
pub struct Cli {
    /// CSV export to fetch at startup.
    #[arg(long, env = "REPERTOIRE_URL", default_value = DEFAULT_FEED_URL)]
    pub url: String,

    /// Read the repertoire from a local CSV file instead of fetching it.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Directory holding the local store and the log file.
    #[arg(long, env = "REPERTOIRE_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// HTTP timeout for the feed request.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Cli {
    /// A local file takes precedence over the URL.
    pub fn feed_source(&self) -> FeedSource {
        match &self.csv {
            Some(path) => FeedSource::File(path.clone()),
            None => FeedSource::Url {
                url: self.url.clone(),
                timeout: Duration::from_secs(self.timeout_secs),
            },
        }
    }

    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fetch_the_published_sheet() {
        let cli = Cli::try_parse_from(["repertoire-viewer"]).unwrap();
        assert_eq!(
            cli.feed_source(),
            FeedSource::Url {
                url: DEFAULT_FEED_URL.to_string(),
                timeout: Duration::from_secs(30),
            }
        );
    }

    #[test]
    fn local_csv_wins_over_url() {
        let cli = Cli::try_parse_from([
            "repertoire-viewer",
            "--url",
            "https://example.com/feed.csv",
            "--csv",
            "songs.csv",
        ])
        .unwrap();
        assert_eq!(cli.feed_source(), FeedSource::File(PathBuf::from("songs.csv")));
    }

    #[test]
    fn explicit_data_dir_is_used_verbatim() {
        let cli =
            Cli::try_parse_from(["repertoire-viewer", "--data-dir", "/tmp/rv", "--timeout-secs", "5"])
                .unwrap();
        assert_eq!(cli.resolve_data_dir().unwrap(), PathBuf::from("/tmp/rv"));
        assert!(matches!(
            cli.feed_source(),
            FeedSource::Url { timeout, .. } if timeout == Duration::from_secs(5)
        ));
    }
}
