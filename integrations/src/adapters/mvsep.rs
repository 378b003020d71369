//! MVSEP audio stem separation
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
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use super::extension_from_url;
use crate::context::IntegrationContext;
use crate::error::{IntegrationError, IntegrationResult};
use crate::params::Parameters;
use crate::polling::{poll_job, JobStatus, PollConfig, PollableJob};
use crate::traits::Integration;

const SERVICE: &str = "mvsep";
const DEFAULT_BASE_URL: &str = "https://mvsep.com";
const DEFAULT_SEP_TYPE: &str = "40";
const DEFAULT_OUTPUT_FORMAT: &str = "0";
const DEFAULT_FOLDER: &str = "separations";
const SUCCESS_STATES: &[&str] = &["done"];
const FAILURE_STATES: &[&str] = &["failed", "not_found"];

/// MVSEP stem separation integration
///
/// The audio to separate is given as a URL in `audio_url`, or as the prompt.
pub struct MvsepIntegration {
    ctx: Arc<IntegrationContext>,
    poll: PollConfig,
}

impl MvsepIntegration {
    pub fn new(ctx: Arc<IntegrationContext>) -> Self {
        Self {
            ctx,
            poll: PollConfig::fast(),
        }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    fn base_url(&self) -> String {
        self.ctx.endpoint(SERVICE, DEFAULT_BASE_URL)
    }

    async fn fetch_status(&self, hash: &str) -> IntegrationResult<PollableJob> {
        let url = format!("{}/api/separation/get", self.base_url());
        let request = self.ctx.api().get(&url).query(&[("hash", hash)]);
        let body = self.ctx.api().send_json(request).await?;

        let label = body.get("status").and_then(Value::as_str).unwrap_or("");
        Ok(PollableJob {
            id: hash.to_string(),
            status: JobStatus::from_label(label, SUCCESS_STATES, FAILURE_STATES),
            output_url: output_files(&body).first().map(|(url, _)| url.clone()),
            payload: body,
        })
    }
}

/// `(url, label)` of every output file in a status payload
fn output_files(body: &Value) -> Vec<(String, String)> {
    body.get("data")
        .and_then(|d| d.get("files"))
        .and_then(Value::as_array)
        .map(|files| {
            files
                .iter()
                .filter_map(|file| {
                    let url = file.get("url").and_then(Value::as_str)?;
                    let label = file
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or("stem");
                    Some((url.to_string(), label.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl Integration for MvsepIntegration {
    fn name(&self) -> &str {
        "mvsep"
    }

    fn default_response_key(&self) -> &str {
        "separation"
    }

    async fn execute(&self, prompt: &str, _model: &str, params: &Parameters) -> IntegrationResult<Value> {
        let audio_url = match params.optional_str("audio_url")? {
            Some(url) => url,
            None if !prompt.trim().is_empty() => prompt.trim(),
            None => return Err(IntegrationError::MissingParameter("audio_url".to_string())),
        };
        let api_token = self.ctx.api_key(SERVICE, params)?;
        let sep_type = params.str_or("sep_type", DEFAULT_SEP_TYPE)?;
        let output_format = params.str_or("output_format", DEFAULT_OUTPUT_FORMAT)?;
        let folder = params.str_or("folder", DEFAULT_FOLDER)?;

        let form = [
            ("api_token", api_token.as_str()),
            ("sep_type", sep_type),
            ("output_format", output_format),
            ("url", audio_url),
        ];

        let url = format!("{}/api/separation/create", self.base_url());
        let created = self.ctx.api().post_form(&url, &[], &form).await?;

        if created.get("success").and_then(Value::as_bool) == Some(false) {
            let message = created
                .get("data")
                .and_then(|d| d.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("separation request rejected")
                .to_string();
            return Err(IntegrationError::Api {
                status: 200,
                message,
                details: Some(created),
            });
        }

        let hash = created
            .get("data")
            .and_then(|d| d.get("hash"))
            .and_then(Value::as_str)
            .ok_or_else(|| IntegrationError::InvalidResponse("no job hash returned".to_string()))?
            .to_string();

        info!(
            hash = hash,
            sep_type = sep_type,
            interval_secs = self.poll.interval.as_secs(),
            "MVSEP separation submitted, polling for completion"
        );

        let job = poll_job(&self.poll, &hash, || self.fetch_status(&hash)).await?;

        let mut files = Vec::new();
        for (source_url, label) in output_files(&job.payload) {
            let extension = extension_from_url(&source_url).unwrap_or_else(|| ".mp3".to_string());
            let upload = self.ctx.ftp().upload_from_url(&source_url, folder, &extension).await?;
            files.push(json!({
                "type": label,
                "url": upload.access_url,
                "sourceUrl": source_url,
            }));
        }

        if files.is_empty() {
            return Err(IntegrationError::InvalidResponse("separation finished without output files".to_string()));
        }

        Ok(json!({ "hash": hash, "files": files }))
    }
}
