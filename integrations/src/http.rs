//! Shared HTTP client for upstream APIs
// Copyright 2025 Francisco F. Pinochet
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use promptgate_config::HttpConfig;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{IntegrationError, IntegrationResult};

/// Thin wrapper over one `reqwest::Client` shared by every integration
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &HttpConfig) -> IntegrationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IntegrationError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Send a request, turning non-2xx responses into `IntegrationError::Api`
    pub async fn send(&self, request: RequestBuilder) -> IntegrationResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        debug!(status = status.as_u16(), url = %response.url(), "Upstream response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let details = parse_body(&body);
        let message = error_message(&details)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        Err(IntegrationError::Api {
            status: status.as_u16(),
            message,
            details: Some(details),
        })
    }

    /// Send a request and decode a JSON body; an empty body decodes as `null`
    pub async fn send_json(&self, request: RequestBuilder) -> IntegrationResult<Value> {
        let body = self.send(request).await?.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| IntegrationError::InvalidResponse(format!("expected JSON body: {}", e)))
    }

    pub async fn send_bytes(&self, request: RequestBuilder) -> IntegrationResult<Vec<u8>> {
        let bytes = self.send(request).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &B,
    ) -> IntegrationResult<Value> {
        self.send_json(with_headers(self.post(url), headers).json(body)).await
    }

    pub async fn post_form<B: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        form: &B,
    ) -> IntegrationResult<Value> {
        self.send_json(with_headers(self.post(url), headers).form(form)).await
    }

    pub async fn get_json(&self, url: &str, headers: &[(&str, &str)]) -> IntegrationResult<Value> {
        self.send_json(with_headers(self.get(url), headers)).await
    }

    pub async fn get_bytes(&self, url: &str) -> IntegrationResult<Vec<u8>> {
        self.send_bytes(self.get(url)).await
    }
}

pub fn with_headers(mut request: RequestBuilder, headers: &[(&str, &str)]) -> RequestBuilder {
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    request
}

fn parse_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Best-effort human-readable message from an upstream error body
fn error_message(details: &Value) -> Option<String> {
    match details {
        Value::String(s) if !s.trim().is_empty() => Some(s.chars().take(500).collect()),
        Value::Object(map) => ["message", "error", "detail"].iter().find_map(|field| {
            match map.get(*field)? {
                Value::String(s) => Some(s.clone()),
                Value::Object(inner) => inner
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            }
        }),
        _ => None,
    }
}
