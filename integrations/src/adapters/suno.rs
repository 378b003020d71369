//! Suno music generation (self-hosted suno-api)
//!
//! Submits a generation job, polls the clips until they are complete and
//! copies every finished clip to the FTP repository.
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

use super::{model_or, require_prompt};
use crate::context::IntegrationContext;
use crate::error::{IntegrationError, IntegrationResult};
use crate::params::Parameters;
use crate::polling::{poll_job, JobStatus, PollConfig, PollableJob};
use crate::traits::Integration;

const SERVICE: &str = "suno";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_MODEL: &str = "chirp-v3-5";
const DEFAULT_FOLDER: &str = "music";
const SUCCESS_STATES: &[&str] = &["complete"];
const FAILURE_STATES: &[&str] = &["error"];

/// Suno music generation integration
pub struct SunoIntegration {
    ctx: Arc<IntegrationContext>,
    poll: PollConfig,
}

impl SunoIntegration {
    pub fn new(ctx: Arc<IntegrationContext>) -> Self {
        let poll = ctx.poll_config();
        Self { ctx, poll }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    fn base_url(&self) -> String {
        self.ctx.endpoint(SERVICE, DEFAULT_BASE_URL)
    }

    async fn fetch_clips(&self, ids: &str) -> IntegrationResult<PollableJob> {
        let url = format!("{}/api/get", self.base_url());
        let request = self.ctx.api().get(&url).query(&[("ids", ids)]);
        let clips = self.ctx.api().send_json(request).await?;
        Ok(clips_to_job(ids, clips))
    }
}

/// Overall job state of a clip batch: failed if any clip failed, complete
/// once every clip is complete
fn clips_to_job(ids: &str, clips: Value) -> PollableJob {
    let states: Vec<JobStatus> = clips
        .as_array()
        .map(|list| {
            list.iter()
                .map(|clip| {
                    let label = clip.get("status").and_then(Value::as_str).unwrap_or("");
                    JobStatus::from_label(label, SUCCESS_STATES, FAILURE_STATES)
                })
                .collect()
        })
        .unwrap_or_default();

    let status = if states.iter().any(|s| *s == JobStatus::Failed) {
        JobStatus::Failed
    } else if !states.is_empty() && states.iter().all(|s| *s == JobStatus::Completed) {
        JobStatus::Completed
    } else {
        JobStatus::Pending
    };

    let output_url = clips
        .get(0)
        .and_then(|c| c.get("audio_url"))
        .and_then(Value::as_str)
        .map(str::to_string);

    PollableJob {
        id: ids.to_string(),
        status,
        output_url,
        payload: clips,
    }
}

#[async_trait]
impl Integration for SunoIntegration {
    fn name(&self) -> &str {
        "suno"
    }

    fn default_response_key(&self) -> &str {
        "music"
    }

    async fn execute(&self, prompt: &str, model: &str, params: &Parameters) -> IntegrationResult<Value> {
        let prompt = require_prompt(prompt)?;
        let model = model_or(model, DEFAULT_MODEL);
        let folder = params.str_or("folder", DEFAULT_FOLDER)?;
        let instrumental = params.bool_or("make_instrumental", false)?;

        // Lyrics with tags/title go through custom mode
        let tags = params.optional_str("tags")?;
        let title = params.optional_str("title")?;
        let (endpoint, body) = if tags.is_some() || title.is_some() {
            (
                "custom_generate",
                json!({
                    "prompt": prompt,
                    "tags": tags.unwrap_or_default(),
                    "title": title.unwrap_or_default(),
                    "model": model,
                    "make_instrumental": instrumental,
                    "wait_audio": false,
                }),
            )
        } else {
            (
                "generate",
                json!({
                    "prompt": prompt,
                    "model": model,
                    "make_instrumental": instrumental,
                    "wait_audio": false,
                }),
            )
        };

        let url = format!("{}/api/{}", self.base_url(), endpoint);
        let submitted = self.ctx.api().post_json(&url, &[], &body).await?;

        let ids: Vec<&str> = submitted
            .as_array()
            .map(|clips| clips.iter().filter_map(|c| c.get("id").and_then(Value::as_str)).collect())
            .unwrap_or_default();
        if ids.is_empty() {
            return Err(IntegrationError::InvalidResponse("no clip ids returned".to_string()));
        }
        let ids = ids.join(",");

        info!(
            clip_ids = ids,
            interval_secs = self.poll.interval.as_secs(),
            max_attempts = self.poll.max_attempts,
            "Suno job submitted, polling for completion"
        );

        let job = poll_job(&self.poll, &ids, || self.fetch_clips(&ids)).await?;

        let mut clips = Vec::new();
        for clip in job.payload.as_array().into_iter().flatten() {
            let source_url = clip
                .get("audio_url")
                .and_then(Value::as_str)
                .ok_or_else(|| IntegrationError::InvalidResponse("completed clip has no audio_url".to_string()))?;
            let upload = self.ctx.ftp().upload_from_url(source_url, folder, ".mp3").await?;

            clips.push(json!({
                "id": clip.get("id").cloned().unwrap_or(Value::Null),
                "title": clip.get("title").cloned().unwrap_or(Value::Null),
                "duration": clip.get("duration").cloned().unwrap_or(Value::Null),
                "url": upload.access_url,
                "sourceUrl": source_url,
            }));
        }

        Ok(json!({ "clips": clips, "model": model }))
    }
}
