//! Prompt Processor
//!
//! Runs one prompt request through the integration registry:
//! - Reads a `{ prompt, engine, model, parameters }` JSON document from the
//!   file given as first argument, or from stdin
//! - Dispatches it to the integration registered for `engine`
//! - Prints the response envelope as JSON on stdout
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


use anyhow::Context;
use integrations::{IntegrationContext, IntegrationRegistry, PromptProcessor, PromptRequest};
use promptgate_config::AppConfig;
use promptgate_logging::{init_with_format, LogFormat};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration file wins over plain environment variables when given
    let config = match std::env::var("PROMPTGATE_CONFIG") {
        Ok(path) => AppConfig::from_file(&path),
        Err(_) => AppConfig::from_env(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    let format = LogFormat::parse(&std::env::var("LOG_FORMAT").unwrap_or_default());
    init_with_format(format, "prompt-processor", config.log_level());

    info!(
        ftp_host = config.ftp.host,
        base_domain = config.ftp.base_domain,
        "Configuration loaded"
    );

    let raw = match std::env::args().nth(1) {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read request file {}", path))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read request from stdin")?;
            buffer
        }
    };

    let request: PromptRequest =
        serde_json::from_str(&raw).context("Request is not a valid prompt request")?;

    let ctx = Arc::new(IntegrationContext::new(Arc::new(config))?);
    let registry = IntegrationRegistry::with_builtin(ctx);
    info!(integrations = ?registry.names(), "Integrations registered");

    let processor = PromptProcessor::new(registry);

    let envelope = match processor.process_request(&request).await {
        Ok(envelope) => envelope,
        Err(e) => {
            error!(engine = request.engine, error = %e, "Request rejected");
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&envelope)?);

    Ok(())
}
