//! Error types for integrations
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


use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("API request failed ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    #[error("Unsupported engine: {0}")]
    UnsupportedEngine(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Job {job_id} failed")]
    JobFailed {
        job_id: String,
        details: Option<Value>,
    },

    #[error("FTP error: {0}")]
    Ftp(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl IntegrationError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        IntegrationError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Upstream payload attached to the error, if any
    pub fn details(&self) -> Option<&Value> {
        match self {
            IntegrationError::Api { details, .. } => details.as_ref(),
            IntegrationError::JobFailed { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

pub type IntegrationResult<T> = Result<T, IntegrationError>;
