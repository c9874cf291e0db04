//! Ollama Text Generation Adapter
//!
//! Implements the [`TextGenerator`] port against an Ollama server using the
//! non-streaming `POST /api/generate` endpoint.
//!
//! # Error Handling
//!
//! HTTP and transport failures are mapped to `PortError` variants:
//! - 401/403 -> `PortError::Unauthorized`
//! - 404 -> `PortError::NotFound` (the model is not pulled)
//! - 429/5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Connect failures -> `PortError::Connection`
//! - Undecodable bodies -> `PortError::Transformation`
//!
//! The explanation strategy treats every one of these as "use the template".

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_scoring::TextGenerator;

const ADAPTER_ID: &str = "ollama-text-generator";

/// Configuration for the Ollama adapter
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL such as `http://localhost:11434`; `None` disables the adapter
    pub base_url: Option<String>,

    /// Model name passed with every request
    pub model: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: "llama3.1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl OllamaConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Ollama-backed [`TextGenerator`]
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: Option<String>,
    model: String,
    timeout: Duration,
    client: Client,
}

impl OllamaClient {
    /// Builds the adapter; a blank base URL is treated as not configured
    pub fn new(config: OllamaConfig) -> Result<Self, PortError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PortError::Internal {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        let base_url = config
            .base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        Ok(Self {
            base_url,
            model: config.model,
            timeout: config.timeout,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, path: &str) -> Result<String, PortError> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}{}", base, path))
            .ok_or_else(|| PortError::unavailable("ollama"))
    }

    fn map_transport_error(&self, operation: &str, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::timeout(operation, self.timeout)
        } else if error.is_connect() {
            PortError::Connection {
                message: format!("ollama unreachable during {}", operation),
                source: Some(Box::new(error)),
            }
        } else if error.is_decode() {
            PortError::transformation(format!("unexpected ollama response: {}", error))
        } else {
            PortError::Internal {
                message: format!("ollama request failed during {}", operation),
                source: Some(Box::new(error)),
            }
        }
    }

    fn map_status(&self, status: StatusCode) -> PortError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized {
                message: format!("ollama returned {}", status),
            },
            StatusCode::NOT_FOUND => PortError::not_found("model", &self.model),
            StatusCode::TOO_MANY_REQUESTS => PortError::unavailable("ollama (rate limited)"),
            s if s.is_server_error() => PortError::unavailable(format!("ollama ({})", s)),
            s => PortError::internal(format!("ollama returned unexpected status {}", s)),
        }
    }
}

impl DomainPort for OllamaClient {}

#[async_trait]
impl TextGenerator for OllamaClient {
    fn is_available(&self) -> bool {
        self.base_url.is_some()
    }

    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String, PortError> {
        let url = self.endpoint("/api/generate")?;
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| self.map_transport_error("generate", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.map_status(status));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error("generate", e))?;

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = body.response.len(),
            "Ollama generation completed"
        );
        Ok(body.response)
    }
}

#[async_trait]
impl HealthCheckable for OllamaClient {
    /// Lists local models; the generator is optional so failures report degraded
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = match self.endpoint("/api/tags") {
            Err(_) => Err("not configured".to_string()),
            Ok(url) => match self.client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => Ok(()),
                Ok(resp) => Err(format!("status {}", resp.status())),
                Err(e) => Err(e.to_string()),
            },
        };

        let (status, message) = match result {
            Ok(()) => (AdapterHealth::Healthy, None),
            Err(msg) if self.base_url.is_none() => (AdapterHealth::Unknown, Some(msg)),
            Err(msg) => (AdapterHealth::Degraded, Some(msg)),
        };

        HealthCheckResult::new(ADAPTER_ID, status, start, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_base_url_means_unavailable() {
        let client = OllamaClient::new(OllamaConfig::new("   ")).unwrap();
        assert!(!client.is_available());

        let client = OllamaClient::new(OllamaConfig::default()).unwrap();
        assert!(!client.is_available());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = OllamaClient::new(OllamaConfig::new("http://ollama:11434/")).unwrap();
        assert_eq!(
            client.endpoint("/api/generate").unwrap(),
            "http://ollama:11434/api/generate"
        );
    }

    #[test]
    fn test_status_mapping() {
        let client = OllamaClient::new(OllamaConfig::new("http://ollama:11434")).unwrap();

        assert!(matches!(
            client.map_status(StatusCode::FORBIDDEN),
            PortError::Unauthorized { .. }
        ));
        assert!(client.map_status(StatusCode::NOT_FOUND).is_not_found());
        assert!(client.map_status(StatusCode::BAD_GATEWAY).is_transient());
        assert!(client.map_status(StatusCode::TOO_MANY_REQUESTS).is_transient());
        assert!(matches!(
            client.map_status(StatusCode::IM_A_TEAPOT),
            PortError::Internal { .. }
        ));
    }
}
