//! Built-in integrations
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


pub mod elevenlabs;
pub mod face_swap;
pub mod ftp_upload;
pub mod http_request;
pub mod mvsep;
pub mod openai_image;
pub mod suno;

pub use elevenlabs::ElevenLabsIntegration;
pub use face_swap::FaceSwapIntegration;
pub use ftp_upload::FtpUploadIntegration;
pub use http_request::HttpRequestIntegration;
pub use mvsep::MvsepIntegration;
pub use openai_image::OpenAIImageIntegration;
pub use suno::SunoIntegration;

use crate::error::{IntegrationError, IntegrationResult};

/// The prompt, trimmed, or `MissingParameter("prompt")`
pub(crate) fn require_prompt(prompt: &str) -> IntegrationResult<&str> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(IntegrationError::MissingParameter("prompt".to_string()));
    }
    Ok(prompt)
}

/// The caller's model, or `default` when none was given
pub(crate) fn model_or<'a>(model: &'a str, default: &'a str) -> &'a str {
    if model.trim().is_empty() {
        default
    } else {
        model.trim()
    }
}

/// File extension (with dot) taken from the last path segment of `url`
pub(crate) fn extension_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let file_name = path.rsplit('/').next()?;
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() || ext.len() > 5 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_prompt() {
        assert_eq!(require_prompt("  a cat  ").unwrap(), "a cat");
        assert!(matches!(
            require_prompt("   "),
            Err(IntegrationError::MissingParameter(name)) if name == "prompt"
        ));
    }

    #[test]
    fn test_model_or() {
        assert_eq!(model_or("", "dall-e-3"), "dall-e-3");
        assert_eq!(model_or("gpt-image-1", "dall-e-3"), "gpt-image-1");
    }

    #[test]
    fn test_extension_from_url() {
        assert_eq!(extension_from_url("https://x.com/a/b/vocals.WAV").as_deref(), Some(".wav"));
        assert_eq!(extension_from_url("https://x.com/a/song.mp3?sig=1.2").as_deref(), Some(".mp3"));
        assert_eq!(extension_from_url("https://x.com/download"), None);
        assert_eq!(extension_from_url("https://x.com/a.b/file"), None);
    }
}
