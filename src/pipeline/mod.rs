//! Category-by-category acquisition.
//!
//! Each category goes through query building, endpoint failover,
//! normalization and scoring before the next one starts. A category whose
//! endpoints are all exhausted contributes nothing and the run carries on.

pub mod throttle;

use serde::Serialize;
use std::time::Duration;

use crate::api::{FailoverFetcher, FetchOutcome, Transport, build_query};
use crate::config::{DirectoryConfig, OverpassConfig};
use crate::domain::{BoundingBox, ScoredFeatureRecord};
use crate::osm::normalize_elements;

pub use throttle::{Clock, FixedIntervalGate, ManualClock, SystemClock};

/// Terminal state of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CategoryState {
    Succeeded { endpoint: String, attempts: usize },
    ExhaustedEndpoints { attempts: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    pub category: String,
    #[serde(flatten)]
    pub state: CategoryState,
    pub records: usize,
    pub dropped: usize,
}

/// Progress notifications for a running acquisition
#[derive(Debug)]
pub enum Progress<'a> {
    Started {
        category: &'a str,
        index: usize,
        total: usize,
    },
    Finished(&'a CategoryReport),
}

/// Everything one run produced
#[derive(Debug, Serialize)]
pub struct Harvest {
    pub directory: String,
    pub records: Vec<ScoredFeatureRecord>,
    pub categories: Vec<CategoryReport>,
}

impl Harvest {
    /// Nothing to render: no category produced a single record
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn exhausted(&self) -> impl Iterator<Item = &CategoryReport> {
        self.categories
            .iter()
            .filter(|r| matches!(r.state, CategoryState::ExhaustedEndpoints { .. }))
    }
}

pub struct Acquisition<T, C> {
    directory: DirectoryConfig,
    bbox: BoundingBox,
    server_timeout_secs: u32,
    fetcher: FailoverFetcher<T>,
    gate: FixedIntervalGate<C>,
}

impl<T: Transport, C: Clock> Acquisition<T, C> {
    pub fn new(
        directory: DirectoryConfig,
        bbox: BoundingBox,
        overpass: &OverpassConfig,
        transport: T,
        clock: C,
    ) -> Self {
        Self {
            directory,
            bbox,
            server_timeout_secs: overpass.server_timeout_secs,
            fetcher: FailoverFetcher::new(transport, overpass.endpoints()),
            gate: FixedIntervalGate::new(clock, Duration::from_millis(overpass.pause_ms)),
        }
    }

    pub fn fetcher(&self) -> &FailoverFetcher<T> {
        &self.fetcher
    }

    pub fn clock(&self) -> &C {
        self.gate.clock()
    }

    pub fn run(&mut self) -> Harvest {
        self.run_with(|_| {})
    }

    /// Run every category in order, reporting progress to `observer`
    pub fn run_with(&mut self, mut observer: impl FnMut(Progress<'_>)) -> Harvest {
        let total = self.directory.categories.len();
        let mut records = Vec::new();
        let mut categories = Vec::with_capacity(total);

        for (index, category) in self.directory.categories.iter().enumerate() {
            observer(Progress::Started {
                category,
                index,
                total,
            });

            self.gate.pass();
            log::info!("Fetching data for {}...", category);

            let scope = self.directory.scope(self.bbox, category);
            let query = build_query(&scope, self.server_timeout_secs);
            let outcome = self.fetcher.fetch(&query);
            self.gate.finish();

            let attempts = outcome.attempts();
            let report = match outcome {
                FetchOutcome::Succeeded {
                    endpoint, elements, ..
                } => {
                    let (normalized, dropped) =
                        normalize_elements(&elements, category, &self.directory);
                    if dropped > 0 {
                        log::debug!("Dropped {} {} elements without coordinates", dropped, category);
                    }
                    let kept = normalized.len();
                    records.extend(
                        normalized
                            .into_iter()
                            .map(|r| self.directory.weights.apply(r)),
                    );
                    log::info!("Fetched {} {} records from {}", kept, category, endpoint.url);
                    CategoryReport {
                        category: category.clone(),
                        state: CategoryState::Succeeded {
                            endpoint: endpoint.url,
                            attempts,
                        },
                        records: kept,
                        dropped,
                    }
                }
                FetchOutcome::ExhaustedEndpoints { .. } => {
                    log::warn!("Failed to fetch data for {} from all endpoints", category);
                    CategoryReport {
                        category: category.clone(),
                        state: CategoryState::ExhaustedEndpoints { attempts },
                        records: 0,
                        dropped: 0,
                    }
                }
            };

            observer(Progress::Finished(&report));
            categories.push(report);
        }

        Harvest {
            directory: self.directory.name.clone(),
            records,
            categories,
        }
    }
}
