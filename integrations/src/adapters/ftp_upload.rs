//! Direct upload to the FTP repository
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
use serde_json::Value;
use std::sync::Arc;

use crate::context::IntegrationContext;
use crate::error::{IntegrationError, IntegrationResult};
use crate::ftp::{UploadContent, UploadRequest};
use crate::params::Parameters;
use crate::traits::Integration;

const DEFAULT_FOLDER: &str = "uploads";
const DEFAULT_EXTENSION: &str = ".txt";

/// Uploads `content` (or the prompt) as text, Base64 or a URL to fetch
pub struct FtpUploadIntegration {
    ctx: Arc<IntegrationContext>,
}

impl FtpUploadIntegration {
    pub fn new(ctx: Arc<IntegrationContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Integration for FtpUploadIntegration {
    fn name(&self) -> &str {
        "ftp"
    }

    fn default_response_key(&self) -> &str {
        "ftpUpload"
    }

    async fn execute(&self, prompt: &str, _model: &str, params: &Parameters) -> IntegrationResult<Value> {
        let content = match params.optional_str("content")? {
            Some(content) => content,
            None if !prompt.trim().is_empty() => prompt,
            None => return Err(IntegrationError::MissingParameter("content".to_string())),
        };

        let content = match params.str_or("content_type", "text")?.to_ascii_lowercase().as_str() {
            "text" => UploadContent::Text(content.to_string()),
            "base64" => UploadContent::Base64(content.to_string()),
            "url" => UploadContent::Url(content.trim().to_string()),
            other => {
                return Err(IntegrationError::invalid(
                    "content_type",
                    format!("'{}' is not one of text, base64, url", other),
                ))
            }
        };

        let request = UploadRequest::new(
            content,
            params.str_or("folder", DEFAULT_FOLDER)?,
            params.str_or("extension", DEFAULT_EXTENSION)?,
        );

        let result = self.ctx.ftp().upload(request).await?;
        Ok(serde_json::to_value(result)?)
    }
}
