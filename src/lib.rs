//! Easel - self-hosted web UI for third-party image generation APIs
//!
//! This library provides the core functionality for the Easel server:
//! serving the configured UI variants, forwarding submissions to the
//! upstream generation API, and extracting the returned image from
//! whatever response shape the upstream produces.

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod imaging;
pub mod routes;

use std::time::Instant;

use anyhow::Result;

pub use crate::client::GeneratorClient;
pub use crate::config::Config;

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub http_client: reqwest::Client,
    pub generator: GeneratorClient,
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Pooled HTTP client shared by the generator and the image
        // fetcher; timeouts are applied per request.
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .build()?;

        let generator = GeneratorClient::new(http_client.clone(), &config.api);

        Ok(Self {
            config,
            http_client,
            generator,
            start_time: Instant::now(),
        })
    }
}
