use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::Deserialize;

use crate::{
    clients::{snippet, TrailerSource},
    error::LookupError,
};

const API_SERVICE: &str = "YouTube Data API";
const SCRAPER_SERVICE: &str = "YouTube search page";

static WATCH_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/watch\?v=([a-zA-Z0-9_-]{11})").expect("watch link regex is valid")
});

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

fn search_query(title: &str, year: &str) -> String {
    format!("{} {} trailer", title, year)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: VideoRef,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Trailer lookups through the YouTube Data API search endpoint.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    client: Client,
    api_key: String,
}

impl YoutubeClient {
    pub fn new(client: Client, api_key: String) -> Self {
        YoutubeClient { client, api_key }
    }

    pub fn get_base_url() -> String {
        "https://www.googleapis.com/youtube/v3/search".to_string()
    }

    fn request(&self, title: &str, year: &str) -> RequestBuilder {
        let query = search_query(title, year);
        self.client.get(Self::get_base_url()).query(&[
            ("key", self.api_key.as_str()),
            ("part", "snippet"),
            ("q", query.as_str()),
            ("type", "video"),
            ("maxResults", "1"),
        ])
    }
}

impl TrailerSource for YoutubeClient {
    async fn find_trailer(&self, title: &str, year: &str) -> Result<String, LookupError> {
        let transport = |source: reqwest::Error| LookupError::Transport {
            service: API_SERVICE,
            source,
        };

        let resp = self.request(title, year).send().await.map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;

        decode_search(status, &body)
    }
}

pub(crate) fn decode_search(status: StatusCode, body: &str) -> Result<String, LookupError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| snippet(body));
        return Err(LookupError::Status {
            service: API_SERVICE,
            status,
            message,
        });
    }

    let search: SearchResponse =
        serde_json::from_str(body).map_err(|source| LookupError::Decode {
            service: API_SERVICE,
            source,
        })?;

    search
        .items
        .into_iter()
        .find_map(|item| item.id.video_id)
        .filter(|id| !id.is_empty())
        .map(|id| watch_url(&id))
        .ok_or(LookupError::NoTrailer)
}

/// Trailer lookups without an API key: loads the public results page and takes
/// the first watch link on it.
#[derive(Debug, Clone)]
pub struct YoutubeScraper {
    client: Client,
}

impl YoutubeScraper {
    pub fn new(client: Client) -> Self {
        YoutubeScraper { client }
    }

    pub fn get_base_url() -> String {
        "https://www.youtube.com/results".to_string()
    }

    fn request(&self, title: &str, year: &str) -> RequestBuilder {
        let query = search_query(title, year);
        self.client
            .get(Self::get_base_url())
            .query(&[("search_query", query.as_str())])
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(header::REFERER, "https://www.google.com/")
    }
}

impl TrailerSource for YoutubeScraper {
    async fn find_trailer(&self, title: &str, year: &str) -> Result<String, LookupError> {
        let transport = |source: reqwest::Error| LookupError::Transport {
            service: SCRAPER_SERVICE,
            source,
        };

        let resp = self.request(title, year).send().await.map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                service: SCRAPER_SERVICE,
                status,
                message: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        let html = resp.text().await.map_err(transport)?;

        extract_first_watch_link(&html).ok_or(LookupError::NoTrailer)
    }
}

pub(crate) fn extract_first_watch_link(html: &str) -> Option<String> {
    WATCH_LINK
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|id| watch_url(id.as_str()))
}

/// The trailer source picked at startup, depending on whether a YouTube API
/// key is configured.
#[derive(Debug, Clone)]
pub enum TrailerResolver {
    Api(YoutubeClient),
    Scrape(YoutubeScraper),
}

impl TrailerResolver {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        match api_key {
            Some(key) => TrailerResolver::Api(YoutubeClient::new(client, key)),
            None => TrailerResolver::Scrape(YoutubeScraper::new(client)),
        }
    }
}

impl TrailerSource for TrailerResolver {
    async fn find_trailer(&self, title: &str, year: &str) -> Result<String, LookupError> {
        match self {
            TrailerResolver::Api(api) => api.find_trailer(title, year).await,
            TrailerResolver::Scrape(scraper) => scraper.find_trailer(title, year).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_watch_url_from_first_result() {
        let body = r#"{
            "kind": "youtube#searchListResponse",
            "items": [
                {"kind": "youtube#searchResult", "id": {"kind": "youtube#video", "videoId": "YoHD9XEInc0"}}
            ]
        }"#;

        assert_eq!(
            decode_search(StatusCode::OK, body).unwrap(),
            "https://www.youtube.com/watch?v=YoHD9XEInc0"
        );
    }

    #[test]
    fn zero_results_means_no_trailer() {
        let err = decode_search(StatusCode::OK, r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, LookupError::NoTrailer));

        let err = decode_search(StatusCode::OK, r#"{"kind": "youtube#searchListResponse"}"#)
            .unwrap_err();
        assert!(matches!(err, LookupError::NoTrailer));
    }

    #[test]
    fn api_errors_surface_their_message() {
        let body = r#"{"error": {"code": 403, "message": "quotaExceeded"}}"#;
        let err = decode_search(StatusCode::FORBIDDEN, body).unwrap_err();

        assert!(!err.is_not_found());
        assert!(err.to_string().contains("quotaExceeded"));
    }

    #[test]
    fn scraper_takes_first_watch_link() {
        let html = r#"<a href="/channel/x"></a>"url":"/watch?v=YoHD9XEInc0&pp=abc" ... "/watch?v=aaaaaaaaaaa""#;

        assert_eq!(
            extract_first_watch_link(html).as_deref(),
            Some("https://www.youtube.com/watch?v=YoHD9XEInc0")
        );
        assert_eq!(extract_first_watch_link("<html></html>"), None);
    }

    #[test]
    fn api_request_asks_for_a_single_video() {
        let youtube = YoutubeClient::new(Client::new(), "key".to_string());
        let request = youtube.request("Inception", "2010").build().unwrap();
        let query: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(query.contains(&("q".to_string(), "Inception 2010 trailer".to_string())));
        assert!(query.contains(&("type".to_string(), "video".to_string())));
        assert!(query.contains(&("maxResults".to_string(), "1".to_string())));
        assert!(query.contains(&("key".to_string(), "key".to_string())));
    }

    #[test]
    fn query_collapses_missing_year() {
        assert_eq!(search_query("Inception", ""), "Inception trailer");
    }

    #[test]
    fn resolver_falls_back_to_scraping_without_key() {
        assert!(matches!(
            TrailerResolver::new(Client::new(), None),
            TrailerResolver::Scrape(_)
        ));
        assert!(matches!(
            TrailerResolver::new(Client::new(), Some("k".into())),
            TrailerResolver::Api(_)
        ));
    }
}
