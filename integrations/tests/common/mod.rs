//! Shared fixtures for integration tests

#![allow(dead_code)]

use integrations::ftp::InMemoryFtp;
use integrations::IntegrationContext;
use promptgate_config::{AppConfig, FtpConfig, HttpConfig, PollingConfig};
use std::collections::HashMap;
use std::sync::Arc;

pub const CDN: &str = "https://cdn.test";

pub const SERVICES: &[&str] = &["openai", "elevenlabs", "face-swap", "suno", "mvsep"];

/// Config pointing every service at `base_url`, with an API key for each
pub fn app_config(base_url: &str) -> AppConfig {
    AppConfig {
        ftp: FtpConfig {
            host: "ftp.test".to_string(),
            port: 21,
            user: "uploader".to_string(),
            password: "secret".to_string(),
            root_dir: "/www".to_string(),
            base_domain: CDN.to_string(),
        },
        http: HttpConfig { timeout_secs: 5 },
        polling: PollingConfig {
            interval_secs: 0,
            max_attempts: 5,
        },
        api_keys: SERVICES
            .iter()
            .map(|s| (s.to_string(), format!("{}-key", s)))
            .collect(),
        endpoints: SERVICES
            .iter()
            .map(|s| (s.to_string(), base_url.to_string()))
            .collect(),
        log_level: None,
    }
}

pub fn context_with(config: AppConfig) -> (Arc<IntegrationContext>, Arc<InMemoryFtp>) {
    let ftp = Arc::new(InMemoryFtp::new());
    let ctx = IntegrationContext::with_transport(Arc::new(config), ftp.clone()).unwrap();
    (Arc::new(ctx), ftp)
}

pub fn context(base_url: &str) -> (Arc<IntegrationContext>, Arc<InMemoryFtp>) {
    context_with(app_config(base_url))
}

pub fn without_api_keys(mut config: AppConfig) -> AppConfig {
    config.api_keys = HashMap::new();
    config
}
