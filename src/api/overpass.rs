use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::config::OverpassConfig;
use crate::domain::{QueryScope, TagFilter};

/// Raw Overpass API response
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<Element>,
}

/// A single element from Overpass (node or way)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Element {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Centroid, present on ways when the query asks for `out center`
    #[serde(default)]
    pub center: Option<Center>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

impl Element {
    /// Point coordinates, falling back to the way centroid
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => self.center.map(|c| (c.lat, c.lon)),
        }
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.as_ref()?.get(key).map(String::as_str)
    }
}

/// One failed attempt against one endpoint
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to create HTTP client: {0}")]
    Client(String),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("endpoint returned status {0}")]
    Status(u16),
    #[error("failed to parse Overpass JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Status and body of an HTTP exchange, before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Accept status 200 with a well-formed `elements` body only
    pub fn into_elements(self) -> Result<Vec<Element>, FetchError> {
        if self.status != 200 {
            return Err(FetchError::Status(self.status));
        }
        let parsed: OverpassResponse = serde_json::from_str(&self.body)?;
        Ok(parsed.elements)
    }
}

/// Sends one query to one endpoint
pub trait Transport {
    fn post(&self, url: &str, query: &str) -> Result<RawResponse, FetchError>;
}

/// Blocking HTTP transport for Overpass mirrors
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(config: &OverpassConfig) -> Result<Self, FetchError> {
        if config.insecure_tls {
            log::warn!("TLS certificate validation is disabled for Overpass endpoints");
        }

        let client = reqwest::blocking::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.insecure_tls)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, query: &str) -> Result<RawResponse, FetchError> {
        // Overpass expects form-encoded POST data: data=<query>
        let response = self.client.post(url).form(&[("data", query)]).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(RawResponse { status, body })
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn filter_clause(scope: &QueryScope) -> String {
    let mut clause = format!(
        r#"["{}"="{}"]"#,
        escape(&scope.tag_key),
        escape(scope.primary_value())
    );
    for filter in &scope.filters {
        let part = match filter {
            TagFilter::Equals(key, value) => format!(r#"["{}"="{}"]"#, escape(key), escape(value)),
            TagFilter::Exists(key) => format!(r#"["{}"]"#, escape(key)),
        };
        clause.push_str(&part);
    }
    clause
}

/// Build the Overpass QL query for one category.
///
/// Nodes come back with their own coordinates, ways with a centroid.
pub fn build_query(scope: &QueryScope, server_timeout_secs: u32) -> String {
    let (south, west, north, east) = scope.bbox.overpass_order();
    let filters = filter_clause(scope);

    format!(
        r#"[out:json][timeout:{server_timeout_secs}];
(
  node{filters}({south},{west},{north},{east});
  way{filters}({south},{west},{north},{east});
);
out center;"#
    )
}
