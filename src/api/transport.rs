//! The HTTP capability the pollution client depends on.
//!
//! Only a single GET is needed, so the seam is a one-method trait. `reqwest::Client`
//! implements it for real use; tests substitute a mock.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Status and fully read body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a GET request. Timeouts, TLS and connection pooling belong to the implementor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

#[async_trait]
impl HttpGet for reqwest::Client {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = reqwest::Client::get(self, url).send().await?;
        let status = response.status().as_u16();

        // The body of a rejected key is never looked at; dropping the response releases it.
        if status == reqwest::StatusCode::UNAUTHORIZED.as_u16() {
            return Ok(HttpResponse::new(status, Vec::new()));
        }

        let body = response.bytes().await?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

/// Builds the `reqwest` client used when the caller does not inject one.
pub fn default_http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
