use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One search hit as returned by the Algolia HN search API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Hit {
    #[serde(rename = "objectID")]
    pub object_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub num_comments: Option<i64>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Hit {
    pub fn display_title(&self) -> String {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => html_escape::decode_html_entities(title).to_string(),
            _ => "(untitled)".to_string(),
        }
    }

    // Ask HN and similar posts have no url; fall back to the discussion page
    pub fn link(&self) -> String {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("https://news.ycombinator.com/item?id={}", self.object_id),
        }
    }

    // Host part of the url without a leading "www."
    pub fn domain(&self) -> Option<String> {
        let url = reqwest::Url::parse(self.url.as_deref()?).ok()?;
        let host = url.host_str()?;
        Some(host.strip_prefix("www.").unwrap_or(host).to_string())
    }

    pub fn time_ago(&self, now: DateTime<Utc>) -> Option<String> {
        let created = self.created_at?;
        let secs = (now - created).num_seconds().max(0);

        let (amount, unit) = if secs < 60 {
            return Some("just now".to_string());
        } else if secs < 3_600 {
            (secs / 60, "minute")
        } else if secs < 86_400 {
            (secs / 3_600, "hour")
        } else if secs < 2_592_000 {
            (secs / 86_400, "day")
        } else if secs < 31_536_000 {
            (secs / 2_592_000, "month")
        } else {
            (secs / 31_536_000, "year")
        };

        let plural = if amount == 1 { "" } else { "s" };
        Some(format!("{} {}{} ago", amount, unit, plural))
    }
}

/// The accumulated hits for one search key plus the last page fetched for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    pub hits: Vec<Hit>,
    pub page: u32,
}

/// Raw response body of `GET /search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<Hit>,
    pub page: u32,
    #[serde(default, rename = "nbPages")]
    pub nb_pages: Option<u32>,
    #[serde(default, rename = "nbHits")]
    pub nb_hits: Option<u64>,
}

impl From<SearchResponse> for PageResult {
    fn from(response: SearchResponse) -> Self {
        Self {
            hits: response.hits,
            page: response.page,
        }
    }
}
