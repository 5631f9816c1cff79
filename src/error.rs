use std::path::PathBuf;

use reqwest::StatusCode;

/// Errors that stop a whole run. Anything that only affects a single title is
/// a [`LookupError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} is not set. Add it to the environment or to a .env file")]
    MissingConfig(&'static str),

    #[error("Could not build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Could not open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read CSV file {}: {source}", .path.display())]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Row {row} of {} has {found} fields, expected at least {expected}", .path.display())]
    Schema {
        path: PathBuf,
        row: u64,
        found: usize,
        expected: usize,
    },

    #[error("Could not write CSV file {}: {source}", .path.display())]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Could not flush {} to disk: {source}", .path.display())]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Aborting: trailer lookup for '{title}' failed: {source}")]
    Trailer {
        title: String,
        #[source]
        source: LookupError,
    },
}

/// Why one title could not be enriched.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} answered with HTTP {status}: {message}")]
    Status {
        service: &'static str,
        status: StatusCode,
        message: String,
    },

    #[error("could not decode {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} error: {message}")]
    NotFound {
        service: &'static str,
        message: String,
    },

    #[error("no trailer found")]
    NoTrailer,
}

impl LookupError {
    /// True when the remote service answered but had nothing for us, as opposed
    /// to the request or its response being broken.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. } | LookupError::NoTrailer)
    }
}
