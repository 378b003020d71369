//! Integration registry and prompt dispatch
//!
//! Maps engine names to integrations and routes prompts to them.
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


use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::{
    ElevenLabsIntegration, FaceSwapIntegration, FtpUploadIntegration, HttpRequestIntegration,
    MvsepIntegration, OpenAIImageIntegration, SunoIntegration,
};
use crate::context::IntegrationContext;
use crate::envelope::ResponseEnvelope;
use crate::error::{IntegrationError, IntegrationResult};
use crate::params::Parameters;
use crate::traits::Integration;

/// Integrations keyed by engine name
#[derive(Default)]
pub struct IntegrationRegistry {
    integrations: HashMap<String, Arc<dyn Integration>>,
}

impl IntegrationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in integration
    pub fn with_builtin(ctx: Arc<IntegrationContext>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(OpenAIImageIntegration::new(ctx.clone())));
        registry.register(Arc::new(ElevenLabsIntegration::new(ctx.clone())));
        registry.register(Arc::new(FaceSwapIntegration::new(ctx.clone())));
        registry.register(Arc::new(SunoIntegration::new(ctx.clone())));
        registry.register(Arc::new(MvsepIntegration::new(ctx.clone())));
        registry.register(Arc::new(HttpRequestIntegration::new(ctx.clone())));
        registry.register(Arc::new(FtpUploadIntegration::new(ctx)));
        registry
    }

    /// Add an integration under its own name, replacing any previous one
    pub fn register(&mut self, integration: Arc<dyn Integration>) {
        let name = integration.name().to_string();
        info!(integration = name, "Registering integration");
        if self.integrations.insert(name.clone(), integration).is_some() {
            warn!(integration = name, "Replaced existing integration");
        }
    }

    /// Get an integration by engine name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Integration>> {
        self.integrations.get(name).cloned()
    }

    /// Registered engine names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.integrations.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.integrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.integrations.is_empty()
    }
}

/// A prompt addressed to one engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: String,
    pub engine: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub parameters: Parameters,
}

/// Entry point routing prompts through the registry
pub struct PromptProcessor {
    registry: IntegrationRegistry,
}

impl PromptProcessor {
    pub fn new(registry: IntegrationRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &IntegrationRegistry {
        &self.registry
    }

    /// Dispatch a prompt to the integration registered as `engine`
    ///
    /// Only an unknown engine is an error; integration failures come back
    /// as a `success: false` envelope.
    pub async fn process_prompt(
        &self,
        prompt: &str,
        engine: &str,
        model: &str,
        parameters: &Parameters,
    ) -> IntegrationResult<ResponseEnvelope> {
        let integration = self.registry.get(engine).ok_or_else(|| {
            warn!(engine = engine, "Unsupported engine requested");
            IntegrationError::UnsupportedEngine(engine.to_string())
        })?;

        Ok(integration.process(prompt, model, parameters).await)
    }

    pub async fn process_request(&self, request: &PromptRequest) -> IntegrationResult<ResponseEnvelope> {
        self.process_prompt(&request.prompt, &request.engine, &request.model, &request.parameters)
            .await
    }
}
