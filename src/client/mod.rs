//! Upstream image-generation API client
//!
//! Payload assembly and the HTTP client wrapper for the configured
//! third-party generation endpoint.

pub mod generator;
pub mod payload;

pub use generator::GeneratorClient;
pub use payload::build_payload;
