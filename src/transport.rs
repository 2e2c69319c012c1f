//! Transport seam and reqwest implementation
//!
//! The executor only sees the [`Transport`] trait; [`HttpTransport`] is the
//! production implementation. It owns credential injection — the API key
//! header and base URL never reach the compiler or executor.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::{HttpMethod, RequestDescriptor, TransportResponse};

/// Header carrying the API key on every request.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Dispatches a compiled request and returns the raw response.
///
/// `timeout` bounds the whole call when given; `None` means unbounded.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(
        &self,
        request: &RequestDescriptor,
        timeout: Option<Duration>,
    ) -> Result<TransportResponse>;
}

/// reqwest-backed transport with credential header injection.
#[derive(Debug)]
pub struct HttpTransport {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport from a validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Render query values: strings go out verbatim, everything else in its
    /// compact JSON form (numbers and booleans without quotes).
    fn query_pairs(query: &Map<String, Value>) -> Vec<(String, String)> {
        query
            .iter()
            .map(|(name, value)| {
                let rendered = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (name.clone(), rendered)
            })
            .collect()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn dispatch(
        &self,
        request: &RequestDescriptor,
        timeout: Option<Duration>,
    ) -> Result<TransportResponse> {
        let url = self.endpoint_url(request.path);
        debug!(method = %request.method, %url, "dispatching request");

        let mut builder = match request.method {
            HttpMethod::Get => self
                .http_client
                .get(&url)
                .query(&Self::query_pairs(&request.query)),
            HttpMethod::Post => self.http_client.post(&url).json(&request.body),
        };

        builder = builder
            .header(API_KEY_HEADER, &self.config.api_key)
            .header("content-type", "application/json");

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(timeout.unwrap_or_default())
            } else {
                ClientError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_ascii_lowercase(), value.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        debug!(status, bytes = body.len(), "response received");

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
