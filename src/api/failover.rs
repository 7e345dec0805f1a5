//! Endpoint failover for Overpass queries.
//!
//! Mirrors are tried one at a time in priority order. The first endpoint that
//! answers 200 with a parseable body wins and later ones are never contacted;
//! any other result moves on to the next endpoint. Exhausting the list is not
//! an error, it simply yields no elements.

use serde::Serialize;

use super::overpass::{Element, FetchError, Transport};

/// An interchangeable Overpass mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub url: String,
    pub priority: usize,
}

impl Endpoint {
    pub fn new(url: impl Into<String>, priority: usize) -> Self {
        Self {
            url: url.into(),
            priority,
        }
    }

    /// Endpoints ranked by their position in `urls`
    pub fn ranked<S: AsRef<str>>(urls: &[S]) -> Vec<Endpoint> {
        urls.iter()
            .enumerate()
            .map(|(i, url)| Endpoint::new(url.as_ref(), i))
            .collect()
    }
}

#[derive(Debug)]
pub struct AttemptFailure {
    pub endpoint: Endpoint,
    pub error: FetchError,
}

/// Terminal state of one query
#[derive(Debug)]
pub enum FetchOutcome {
    Succeeded {
        endpoint: Endpoint,
        elements: Vec<Element>,
        failures: Vec<AttemptFailure>,
    },
    ExhaustedEndpoints {
        failures: Vec<AttemptFailure>,
    },
}

impl FetchOutcome {
    pub fn failures(&self) -> &[AttemptFailure] {
        match self {
            FetchOutcome::Succeeded { failures, .. } => failures,
            FetchOutcome::ExhaustedEndpoints { failures } => failures,
        }
    }

    /// Number of endpoints contacted
    pub fn attempts(&self) -> usize {
        match self {
            FetchOutcome::Succeeded { failures, .. } => failures.len() + 1,
            FetchOutcome::ExhaustedEndpoints { failures } => failures.len(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Succeeded { .. })
    }

    /// Elements of the winning response, empty when every endpoint failed
    pub fn into_elements(self) -> Vec<Element> {
        match self {
            FetchOutcome::Succeeded { elements, .. } => elements,
            FetchOutcome::ExhaustedEndpoints { .. } => Vec::new(),
        }
    }
}

/// Runs queries against an ordered endpoint list
#[derive(Debug)]
pub struct FailoverFetcher<T> {
    transport: T,
    endpoints: Vec<Endpoint>,
}

impl<T: Transport> FailoverFetcher<T> {
    pub fn new(transport: T, mut endpoints: Vec<Endpoint>) -> Self {
        endpoints.sort_by_key(|e| e.priority);
        Self {
            transport,
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn fetch(&self, query: &str) -> FetchOutcome {
        let mut failures = Vec::new();

        for endpoint in &self.endpoints {
            let attempt = self
                .transport
                .post(&endpoint.url, query)
                .and_then(|raw| raw.into_elements());

            match attempt {
                Ok(elements) => {
                    return FetchOutcome::Succeeded {
                        endpoint: endpoint.clone(),
                        elements,
                        failures,
                    };
                }
                Err(error) => {
                    log::warn!("Endpoint {} failed: {}", endpoint.url, error);
                    failures.push(AttemptFailure {
                        endpoint: endpoint.clone(),
                        error,
                    });
                }
            }
        }

        FetchOutcome::ExhaustedEndpoints { failures }
    }
}
