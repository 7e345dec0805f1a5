//! poi-harvest - Fetch, normalize and score OpenStreetMap points of interest

pub mod api;
pub mod config;
pub mod domain;
pub mod osm;
pub mod output;
pub mod pipeline;
pub mod score;
