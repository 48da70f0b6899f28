//! reqwest client for the BGS OGC API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bgs_geo::BoundingBox;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{BoreholeFetcher, FetchError, ServiceStatus};
use crate::model::RawBorehole;

pub const DEFAULT_BASE_URL: &str = "https://ogcapi.bgs.ac.uk";
pub const DEFAULT_COLLECTION: &str = "agsboreholeindex";

const BODY_SNIPPET_LEN: usize = 200;

/// Configuration for the BGS OGC API client. Base URL and collection are
/// explicit state here rather than process-wide globals.
#[derive(Debug, Clone)]
pub struct OgcApiConfig {
    pub base_url: String,
    pub collection: String,
    pub timeout: Duration,
}

impl OgcApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            collection: DEFAULT_COLLECTION.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for OgcApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Client for the collection and `items` endpoints of the BGS OGC API.
#[derive(Debug, Clone)]
pub struct OgcApiClient {
    http: Client,
    config: OgcApiConfig,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<RawBorehole>,
}

#[derive(Debug, Deserialize)]
struct CollectionDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl OgcApiClient {
    /// Builds a client with its own connection pool.
    ///
    /// # Errors
    /// Returns [`FetchError::Network`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: OgcApiConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub const fn config(&self) -> &OgcApiConfig {
        &self.config
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/collections/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.collection
        )
    }
}

#[async_trait]
impl BoreholeFetcher for OgcApiClient {
    async fn fetch_area(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> Result<Vec<RawBorehole>, FetchError> {
        let url = format!("{}/items", self.collection_url());
        // OGC bbox order is lon/lat.
        let bbox_param = format!(
            "{},{},{},{}",
            bbox.min_lon, bbox.min_lat, bbox.max_lon, bbox.max_lat
        );
        debug!(bbox = %bbox_param, limit, "querying upstream items");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("bbox", bbox_param),
                ("limit", limit.to_string()),
                ("f", "json".to_string()),
            ])
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::UpstreamStatus {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        let collection: FeatureCollection = response
            .json()
            .await
            .map_err(|err| FetchError::Malformed(err.to_string()))?;
        Ok(collection.features)
    }

    async fn status(&self) -> Result<ServiceStatus, FetchError> {
        let url = self.collection_url();
        let started = Instant::now();

        let response = self
            .http
            .get(&url)
            .query(&[("f", "json")])
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::UpstreamStatus {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        let document: CollectionDocument = response
            .json()
            .await
            .map_err(|err| FetchError::Malformed(err.to_string()))?;

        Ok(ServiceStatus {
            healthy: true,
            title: document.title,
            description: document.description.as_deref().map(snippet),
            collection_url: url,
            latency_ms,
            checked_at: Utc::now(),
        })
    }
}

fn snippet(text: &str) -> String {
    if text.chars().count() <= BODY_SNIPPET_LEN {
        text.to_string()
    } else {
        text.chars().take(BODY_SNIPPET_LEN).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_url_tolerates_trailing_slash() {
        let client = OgcApiClient::new(OgcApiConfig::new("https://ogcapi.bgs.ac.uk/"))
            .expect("client builds");
        assert_eq!(
            client.collection_url(),
            "https://ogcapi.bgs.ac.uk/collections/agsboreholeindex"
        );
    }

    #[test]
    fn config_builders_override_defaults() {
        let config = OgcApiConfig::default()
            .with_collection("othercollection")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.collection, "othercollection");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn feature_collection_parses_upstream_shape() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "id": "agsboreholeindex.1",
                  "geometry": { "type": "Point", "coordinates": [530000.0, 180000.0] },
                  "properties": { "loca_id": "BH001", "x": 530000.0, "y": 180000.0 } }
            ],
            "links": []
        }"#;
        let parsed: FeatureCollection = serde_json::from_str(json).expect("parses");
        assert_eq!(parsed.features.len(), 1);
        assert!(parsed.features[0].properties.contains_key("loca_id"));
    }
}
