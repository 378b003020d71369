//! Generic HTTP request integration
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


use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::info;

use crate::context::IntegrationContext;
use crate::error::{IntegrationError, IntegrationResult};
use crate::params::Parameters;
use crate::traits::Integration;

/// Sends an arbitrary HTTP request and returns status, headers and body
///
/// Parameters: `url` (falls back to the prompt), `method` (default GET),
/// `headers` and `query` objects, and `body` (objects and arrays are sent as
/// JSON, strings as-is).
pub struct HttpRequestIntegration {
    ctx: Arc<IntegrationContext>,
}

impl HttpRequestIntegration {
    pub fn new(ctx: Arc<IntegrationContext>) -> Self {
        Self { ctx }
    }
}

fn string_pairs(name: &str, map: &Map<String, Value>) -> IntegrationResult<Vec<(String, String)>> {
    map.iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => {
                    return Err(IntegrationError::invalid(
                        name,
                        format!("value of '{}' must be a string, number or boolean", key),
                    ))
                }
            };
            Ok((key.clone(), value))
        })
        .collect()
}

#[async_trait]
impl Integration for HttpRequestIntegration {
    fn name(&self) -> &str {
        "http"
    }

    fn default_response_key(&self) -> &str {
        "httpResponse"
    }

    async fn execute(&self, prompt: &str, _model: &str, params: &Parameters) -> IntegrationResult<Value> {
        let url = match params.optional_str("url")? {
            Some(url) => url,
            None if !prompt.trim().is_empty() => prompt.trim(),
            None => return Err(IntegrationError::MissingParameter("url".to_string())),
        };
        let scheme = url.split_once("://").map(|(scheme, _)| scheme.to_ascii_lowercase());
        if !matches!(scheme.as_deref(), Some("http") | Some("https")) {
            return Err(IntegrationError::invalid("url", "only http and https URLs are supported"));
        }

        let method_name = params.str_or("method", "GET")?.to_ascii_uppercase();
        let method = Method::from_bytes(method_name.as_bytes())
            .map_err(|_| IntegrationError::invalid("method", format!("'{}' is not an HTTP method", method_name)))?;

        let mut request = self.ctx.api().request(method.clone(), url);

        if let Some(headers) = params.object("headers")? {
            for (name, value) in string_pairs("headers", headers)? {
                request = request.header(name, value);
            }
        }
        if let Some(query) = params.object("query")? {
            request = request.query(&string_pairs("query", query)?);
        }
        match params.value("body") {
            None => {}
            Some(Value::String(text)) => request = request.body(text.clone()),
            Some(body) => request = request.json(body),
        }

        info!(method = %method, url = url, "Sending HTTP request");

        let response = self.ctx.api().send(request).await?;
        let status = response.status().as_u16();
        let headers: Map<String, Value> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), Value::String(v.to_string())))
            })
            .collect();

        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(json!({
            "status": status,
            "headers": headers,
            "body": body,
        }))
    }
}
