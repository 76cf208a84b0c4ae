//! Provides the client and supporting pieces for the air pollution API.
//!
//! Includes:
//! - `client`: `PollutionClient` and its builder.
//! - `endpoints`: URL templates and coordinate rendering.
//! - `transport`: the `HttpGet` capability and its `reqwest` implementation.

mod client;
#[cfg(test)]
mod client_test;
pub mod endpoints;
mod transport;

pub use client::*;
pub use endpoints::DEFAULT_BASE_URL;
pub use transport::*;
