//! Shared dependencies handed to every integration
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


use promptgate_config::AppConfig;
use std::sync::Arc;

use crate::error::{IntegrationError, IntegrationResult};
use crate::ftp::{FtpRepoService, FtpTransport};
use crate::http::ApiClient;
use crate::params::Parameters;
use crate::polling::PollConfig;

/// Configuration, HTTP client and FTP repository, built once at startup
#[derive(Clone)]
pub struct IntegrationContext {
    config: Arc<AppConfig>,
    api: ApiClient,
    ftp: FtpRepoService,
}

impl IntegrationContext {
    /// Context uploading to the configured FTP server
    pub fn new(config: Arc<AppConfig>) -> IntegrationResult<Self> {
        let api = ApiClient::new(&config.http)?;
        let ftp = FtpRepoService::connect(&config.ftp, api.clone());
        Ok(Self { config, api, ftp })
    }

    /// Context with a custom FTP transport
    pub fn with_transport(config: Arc<AppConfig>, transport: Arc<dyn FtpTransport>) -> IntegrationResult<Self> {
        let api = ApiClient::new(&config.http)?;
        let ftp = FtpRepoService::new(&config.ftp, transport, api.clone());
        Ok(Self { config, api, ftp })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn ftp(&self) -> &FtpRepoService {
        &self.ftp
    }

    /// API key for `service`: the `api_key` parameter wins over configuration
    pub fn api_key(&self, service: &str, params: &Parameters) -> IntegrationResult<String> {
        if let Some(key) = params.optional_str("api_key")? {
            return Ok(key.to_string());
        }
        self.config
            .api_key(service)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or_else(|| IntegrationError::MissingParameter("api_key".to_string()))
    }

    /// Base URL for `service`, without a trailing slash
    pub fn endpoint(&self, service: &str, default: &str) -> String {
        self.config
            .endpoint(service)
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }

    /// Poll settings from configuration
    pub fn poll_config(&self) -> PollConfig {
        PollConfig::from(&self.config.polling)
    }
}
