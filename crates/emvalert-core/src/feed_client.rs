use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::FeedConfig;
use crate::error::{AlertError, Result};
use crate::models::{Feature, ModifiedStub, parse_feed};

/// Upstream incident feed as seen by a poll cycle.
pub trait FeedSource {
    fn fetch_modified_stub(&self) -> Result<ModifiedStub>;
    fn fetch_feed(&self) -> Result<Vec<Feature>>;
}

#[derive(Clone)]
pub struct HttpFeedClient {
    data_url: String,
    delta_url: String,
    http: Client,
}

impl std::fmt::Debug for HttpFeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFeedClient")
            .field("data_url", &self.data_url)
            .field("delta_url", &self.delta_url)
            .finish_non_exhaustive()
    }
}

impl HttpFeedClient {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let (data_url, delta_url) = config.endpoints()?;
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            data_url: data_url.to_string(),
            delta_url: delta_url.to_string(),
            http,
        })
    }

    fn get_json(&self, url: &str, endpoint: &str) -> Result<serde_json::Value> {
        let resp = self.http.get(url).send()?;
        if !resp.status().is_success() {
            return Err(AlertError::UpstreamStatus {
                endpoint: endpoint.to_string(),
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json::<serde_json::Value>()?)
    }
}

impl FeedSource for HttpFeedClient {
    fn fetch_modified_stub(&self) -> Result<ModifiedStub> {
        let value = self.get_json(&self.delta_url, "modified stub")?;
        Ok(serde_json::from_value(value)?)
    }

    fn fetch_feed(&self) -> Result<Vec<Feature>> {
        let value = self.get_json(&self.data_url, "feed")?;
        parse_feed(value)
    }
}

/// Feed read from a GeoJSON file on disk. It has no modified stub, so every probe fails
/// and is treated as "modified now".
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedSource for FileFeedSource {
    fn fetch_modified_stub(&self) -> Result<ModifiedStub> {
        Err(AlertError::Validation(format!(
            "{} has no modified stub",
            self.path.display()
        )))
    }

    fn fetch_feed(&self) -> Result<Vec<Feature>> {
        let raw = fs::read_to_string(&self.path)?;
        parse_feed(serde_json::from_str(&raw)?)
    }
}
