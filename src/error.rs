use std::path::PathBuf;

use thiserror::Error;

/// Reasons the startup load of the repertoire can fail.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The feed parsed to zero rows, not even a header.
    #[error("the repertoire feed is empty")]
    Empty,

    #[error("the feed loader stopped without a result")]
    LoaderStopped,
}
