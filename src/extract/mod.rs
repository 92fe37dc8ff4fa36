//! Response extraction pipeline
//!
//! Turns an upstream HTTP response body into a displayable image:
//! the parser normalizes plain-JSON or SSE-framed bodies into a single
//! JSON value, the locator finds the first plausible image reference in
//! it, and the materializer resolves that reference into decoded pixels.

pub mod locator;
pub mod materializer;
pub mod parser;

pub use locator::find_image_payload;
pub use materializer::materialize_image;
pub use parser::parse_response_payload;
