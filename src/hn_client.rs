use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

use crate::config::Config;
use crate::error::FetchError;
use crate::models::{PageResult, SearchResponse};

/// Anything that can answer a search for one page of one query.
pub trait SearchBackend: Send + Sync + 'static {
    fn search(&self, query: &str, page: u32) -> Result<PageResult, FetchError>;
}

pub struct HackerNewsClient {
    client: Client,
    base_url: String,
    hits_per_page: u32,
}

impl HackerNewsClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            hits_per_page: config.hits_per_page,
        })
    }

    pub fn search_url(&self, query: &str, page: u32) -> String {
        format!(
            "{}/search?query={}&page={}&hitsPerPage={}",
            self.base_url,
            urlencoding::encode(query),
            page,
            self.hits_per_page
        )
    }

    pub fn fetch_search_page(&self, query: &str, page: u32) -> Result<PageResult, FetchError> {
        let url = self.search_url(query, page);
        tracing::debug!(%url, "fetching search page");

        let response = self.client.get(&url).send()?.error_for_status()?;
        let body: SearchResponse = response.json()?;

        tracing::debug!(
            query,
            page = body.page,
            hits = body.hits.len(),
            nb_pages = ?body.nb_pages,
            nb_hits = ?body.nb_hits,
            "search page received"
        );
        Ok(body.into())
    }
}

impl SearchBackend for HackerNewsClient {
    fn search(&self, query: &str, page: u32) -> Result<PageResult, FetchError> {
        self.fetch_search_page(query, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(base_url: &str, hits_per_page: u32) -> HackerNewsClient {
        let config = Config {
            base_url: base_url.to_string(),
            hits_per_page,
            ..Config::default()
        };
        HackerNewsClient::new(&config).unwrap()
    }

    #[test]
    fn builds_search_url_with_fixed_page_size() {
        let client = client_with("https://hn.algolia.com/api/v1", 100);
        assert_eq!(
            client.search_url("redux", 0),
            "https://hn.algolia.com/api/v1/search?query=redux&page=0&hitsPerPage=100"
        );
        assert_eq!(
            client.search_url("redux", 3),
            "https://hn.algolia.com/api/v1/search?query=redux&page=3&hitsPerPage=100"
        );
    }

    #[test]
    fn encodes_query_text() {
        let client = client_with("http://localhost:9/api/", 10);
        assert_eq!(
            client.search_url("rust & c++", 1),
            "http://localhost:9/api/search?query=rust%20%26%20c%2B%2B&page=1&hitsPerPage=10"
        );
    }

    #[test]
    fn unreachable_host_is_a_request_error() {
        // Port 9 (discard) is closed on test machines; connection is refused.
        let config = Config {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..Config::default()
        };
        let client = HackerNewsClient::new(&config).unwrap();
        match client.search("redux", 0) {
            Err(FetchError::Request(message)) => assert!(!message.is_empty()),
            Ok(_) => panic!("expected a request failure"),
        }
    }
}
