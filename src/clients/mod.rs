use std::time::Duration;

use reqwest::{header, Client};

use crate::{error::Error, error::LookupError, model::movie::MovieRecord};

pub mod omdb_client;
pub mod youtube_client;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Something that can turn a free-text title into movie metadata.
#[allow(async_fn_in_trait)]
pub trait MetadataSource {
    async fn fetch_movie(&self, title: &str) -> Result<MovieRecord, LookupError>;
}

/// Something that can find a trailer link for a title released in `year`.
#[allow(async_fn_in_trait)]
pub trait TrailerSource {
    async fn find_trailer(&self, title: &str, year: &str) -> Result<String, LookupError>;
}

/// Shared HTTP client. Requests are never retried, so the timeout bounds how
/// long a single title can stall the run.
pub fn build_http_client(timeout: Duration) -> Result<Client, Error> {
    let user_agent = header::HeaderValue::from_static(USER_AGENT);
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(Error::HttpClient)
}

/// First characters of a response body, for error messages.
pub(crate) fn snippet(body: &str) -> String {
    const MAX_CHARS: usize = 200;

    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_CHARS) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_truncates_long_bodies() {
        let long = "x".repeat(500);

        assert_eq!(snippet(&long).len(), 203);
        assert_eq!(snippet("  short  "), "short");
    }
}
