//! ElevenLabs text-to-speech
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
use crate::ftp::encode_base64;
use crate::params::Parameters;
use crate::traits::Integration;

const SERVICE: &str = "elevenlabs";
const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";
const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
const DEFAULT_MODEL: &str = "eleven_multilingual_v2";
const DEFAULT_OUTPUT_FORMAT: &str = "mp3_44100_128";
const DEFAULT_STABILITY: f64 = 0.5;
const DEFAULT_SIMILARITY_BOOST: f64 = 0.75;
const DEFAULT_FOLDER: &str = "audio";

/// ElevenLabs text-to-speech integration
pub struct ElevenLabsIntegration {
    ctx: Arc<IntegrationContext>,
}

impl ElevenLabsIntegration {
    pub fn new(ctx: Arc<IntegrationContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Integration for ElevenLabsIntegration {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    fn default_response_key(&self) -> &str {
        "audio"
    }

    async fn execute(&self, prompt: &str, model: &str, params: &Parameters) -> IntegrationResult<Value> {
        let text = require_prompt(prompt)?;
        let api_key = self.ctx.api_key(SERVICE, params)?;
        let model = model_or(model, DEFAULT_MODEL);
        let voice_id = params.str_or("voice_id", DEFAULT_VOICE_ID)?;
        let output_format = params.str_or("output_format", DEFAULT_OUTPUT_FORMAT)?;
        let folder = params.str_or("folder", DEFAULT_FOLDER)?;
        let return_base64 = params.bool_or("return_base64", false)?;

        let body = json!({
            "text": text,
            "model_id": model,
            "voice_settings": {
                "stability": params.f64_or("stability", DEFAULT_STABILITY)?,
                "similarity_boost": params.f64_or("similarity_boost", DEFAULT_SIMILARITY_BOOST)?,
            },
        });

        info!(voice_id = voice_id, model = model, chars = text.len(), "Synthesizing speech with ElevenLabs");

        let url = format!(
            "{}/text-to-speech/{}",
            self.ctx.endpoint(SERVICE, DEFAULT_BASE_URL),
            voice_id
        );
        let request = self
            .ctx
            .api()
            .post(&url)
            .header("xi-api-key", api_key)
            .header("Accept", "audio/mpeg")
            .query(&[("output_format", output_format)])
            .json(&body);

        let audio = self.ctx.api().send_bytes(request).await?;
        if audio.is_empty() {
            return Err(IntegrationError::InvalidResponse("empty audio response".to_string()));
        }

        let encoded = return_base64.then(|| encode_base64(&audio));
        let upload = self.ctx.ftp().upload_bytes(audio, folder, ".mp3").await?;

        let mut data = json!({
            "url": upload.access_url,
            "fileName": upload.file_name,
            "sizeBytes": upload.size_bytes,
            "voiceId": voice_id,
            "model": model,
        });
        if let Some(encoded) = encoded {
            data["base64"] = Value::String(encoded);
        }

        Ok(data)
    }
}
