//! Face swap via the Segmind faceswap API
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

use super::model_or;
use crate::context::IntegrationContext;
use crate::error::{IntegrationError, IntegrationResult};
use crate::params::Parameters;
use crate::traits::Integration;

const SERVICE: &str = "face-swap";
const DEFAULT_BASE_URL: &str = "https://api.segmind.com/v1";
const DEFAULT_MODEL: &str = "faceswap-v2";
const DEFAULT_FOLDER: &str = "faceswap";

/// Swaps the face from `image` onto `target_image`
pub struct FaceSwapIntegration {
    ctx: Arc<IntegrationContext>,
}

impl FaceSwapIntegration {
    pub fn new(ctx: Arc<IntegrationContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Integration for FaceSwapIntegration {
    fn name(&self) -> &str {
        "face-swap"
    }

    fn default_response_key(&self) -> &str {
        "faceSwap"
    }

    async fn execute(&self, _prompt: &str, model: &str, params: &Parameters) -> IntegrationResult<Value> {
        let source = params.required_str("image")?;
        let target = params.required_str("target_image")?;
        let api_key = self.ctx.api_key(SERVICE, params)?;
        let model = model_or(model, DEFAULT_MODEL);
        let folder = params.str_or("folder", DEFAULT_FOLDER)?;

        let body = json!({
            "source_img": source,
            "target_img": target,
            "input_faces_index": params.u64_or("target_face_index", 0)?,
            "source_faces_index": params.u64_or("source_face_index", 0)?,
            "face_restore": params.str_or("face_restore", "codeformer-v0.1.0.pth")?,
            "base64": true,
        });

        info!(model = model, "Swapping faces");

        let url = format!("{}/{}", self.ctx.endpoint(SERVICE, DEFAULT_BASE_URL), model);
        let response = self
            .ctx
            .api()
            .post_json(&url, &[("x-api-key", api_key.as_str())], &body)
            .await?;

        let encoded = response
            .get("image")
            .and_then(Value::as_str)
            .ok_or_else(|| IntegrationError::InvalidResponse("no image in response".to_string()))?;

        let upload = self.ctx.ftp().upload_base64(encoded, folder, ".jpg").await?;

        Ok(json!({
            "url": upload.access_url,
            "fileName": upload.file_name,
            "model": model,
        }))
    }
}
