use reqwest::{Client, RequestBuilder, StatusCode};

use crate::{
    clients::{snippet, MetadataSource},
    error::LookupError,
    model::movie::MovieRecord,
};

const SERVICE: &str = "OMDb";

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
}

impl OmdbClient {
    pub fn new(client: Client, api_key: String) -> Self {
        OmdbClient { client, api_key }
    }

    pub fn get_base_url() -> String {
        "https://www.omdbapi.com/".to_string()
    }

    fn request(&self, title: &str) -> RequestBuilder {
        self.client
            .get(Self::get_base_url())
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
    }

    async fn get_movie(&self, title: &str) -> Result<MovieRecord, LookupError> {
        let transport = |source: reqwest::Error| LookupError::Transport {
            service: SERVICE,
            source,
        };

        let resp = self.request(title).send().await.map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;

        decode_movie(status, &body)
    }
}

impl MetadataSource for OmdbClient {
    async fn fetch_movie(&self, title: &str) -> Result<MovieRecord, LookupError> {
        self.get_movie(title).await
    }
}

/// OMDb answers a failed lookup with `200 OK` and `{"Response":"False"}`, and a
/// bad key with `401` and the same shape, so the body is decoded either way.
pub(crate) fn decode_movie(status: StatusCode, body: &str) -> Result<MovieRecord, LookupError> {
    let parsed = serde_json::from_str::<MovieRecord>(body);

    if !status.is_success() {
        let message = parsed
            .ok()
            .and_then(|movie| movie.error)
            .unwrap_or_else(|| snippet(body));
        return Err(LookupError::Status {
            service: SERVICE,
            status,
            message,
        });
    }

    let movie = parsed.map_err(|source| LookupError::Decode {
        service: SERVICE,
        source,
    })?;

    if movie.is_found() {
        return Ok(movie);
    }

    Err(LookupError::NotFound {
        service: SERVICE,
        message: movie
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "Movie not found!".to_string()),
    })
}
