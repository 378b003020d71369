//! OpenAI image generation
//!
//! Generates one image with the Images API and stores it on the FTP
//! repository.
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
use crate::traits::Integration;

const SERVICE: &str = "openai";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "dall-e-3";
const DEFAULT_SIZE: &str = "1024x1024";
const DEFAULT_FOLDER: &str = "images";

/// OpenAI image generation integration
pub struct OpenAIImageIntegration {
    ctx: Arc<IntegrationContext>,
}

impl OpenAIImageIntegration {
    pub fn new(ctx: Arc<IntegrationContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Integration for OpenAIImageIntegration {
    fn name(&self) -> &str {
        "openai-image"
    }

    fn default_response_key(&self) -> &str {
        "generatedImage"
    }

    async fn execute(&self, prompt: &str, model: &str, params: &Parameters) -> IntegrationResult<Value> {
        let prompt = require_prompt(prompt)?;
        let api_key = self.ctx.api_key(SERVICE, params)?;
        let model = model_or(model, DEFAULT_MODEL);
        let size = params.str_or("size", DEFAULT_SIZE)?;
        let folder = params.str_or("folder", DEFAULT_FOLDER)?;

        let mut body = json!({
            "model": model,
            "prompt": prompt,
            "n": 1,
            "size": size,
            "response_format": "b64_json",
        });
        if let Some(quality) = params.optional_str("quality")? {
            body["quality"] = json!(quality);
        }
        if let Some(style) = params.optional_str("style")? {
            body["style"] = json!(style);
        }

        info!(model = model, size = size, "Generating image with OpenAI");

        let url = format!("{}/images/generations", self.ctx.endpoint(SERVICE, DEFAULT_BASE_URL));
        let auth = format!("Bearer {}", api_key);
        let response = self
            .ctx
            .api()
            .post_json(&url, &[("Authorization", auth.as_str())], &body)
            .await?;

        let image = response
            .get("data")
            .and_then(|d| d.get(0))
            .ok_or_else(|| IntegrationError::InvalidResponse("no image in response".to_string()))?;

        let upload = if let Some(encoded) = image.get("b64_json").and_then(Value::as_str) {
            self.ctx.ftp().upload_base64(encoded, folder, ".png").await?
        } else if let Some(image_url) = image.get("url").and_then(Value::as_str) {
            self.ctx.ftp().upload_from_url(image_url, folder, ".png").await?
        } else {
            return Err(IntegrationError::InvalidResponse(
                "image has neither b64_json nor url".to_string(),
            ));
        };

        Ok(json!({
            "url": upload.access_url,
            "fileName": upload.file_name,
            "model": model,
            "size": size,
            "revisedPrompt": image.get("revised_prompt").cloned().unwrap_or(Value::Null),
        }))
    }
}
