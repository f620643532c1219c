//! HTTP client for the registration backend.
//!
//! A single attempt per submission; the request timeout configured on the
//! [`reqwest::Client`] bounds how long a submission can stay in flight.

use std::future::Future;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{RegistrationError, Result};
use crate::payload::RegistrationPayload;

/// Delivers a registration to the backend.
pub trait Transport {
    fn send(&self, payload: RegistrationPayload) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::new(client, config.registrations_endpoint()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn send(&self, payload: RegistrationPayload) -> Result<()> {
        let form = payload.into_form()?;

        let resp = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = resp.status();
        if status.is_success() {
            debug!("registration accepted ({status})");
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body);
        warn!("registration rejected ({status}): {body}");
        Err(RegistrationError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// Pull a human-readable reason out of an error body. JSON bodies may carry it
/// under `error` or `message`; anything else non-blank is used verbatim.
pub fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => ["error", "message"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(String::from),
        Ok(Value::String(s)) => Some(s),
        _ => Some(trimmed.to_string()),
    }
}
