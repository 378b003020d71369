//! Trait definitions for integrations
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
use tracing::{error, info};

use crate::envelope::ResponseEnvelope;
use crate::error::IntegrationResult;
use crate::params::Parameters;

/// Adapter over one external API
#[async_trait]
pub trait Integration: Send + Sync {
    /// Engine name the integration is registered under
    fn name(&self) -> &str;

    /// Envelope key used when the caller supplies no `responseKey`
    fn default_response_key(&self) -> &str;

    /// Run the integration, returning the `data` part of a successful envelope
    async fn execute(&self, prompt: &str, model: &str, params: &Parameters) -> IntegrationResult<Value>;

    /// Run the integration and wrap the result in an envelope
    ///
    /// Never fails: any error is logged and reported as `success: false`.
    async fn process(&self, prompt: &str, model: &str, params: &Parameters) -> ResponseEnvelope {
        let key = params.response_key(self.default_response_key());

        info!(integration = self.name(), model = model, response_key = key, "Processing prompt");

        match self.execute(prompt, model, params).await {
            Ok(data) => ResponseEnvelope::success(key, data),
            Err(e) => {
                error!(integration = self.name(), error = %e, "Integration failed");
                ResponseEnvelope::failure(key, &e)
            }
        }
    }
}
