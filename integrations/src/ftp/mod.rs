//! FTP repository - persists generated files on a web-served FTP root
//!
//! Files land at `{root_dir}/{folder}/{uuid}{extension}` and are assumed to
//! be publicly reachable at `{base_domain}/{folder}/{uuid}{extension}`.
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


pub mod memory;
pub mod transport;

use base64::Engine as _;
use chrono::{DateTime, Utc};
use promptgate_config::FtpConfig;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{IntegrationError, IntegrationResult};
use crate::http::ApiClient;

pub use memory::{InMemoryFtp, StoredFile};
pub use transport::{FtpTransport, SuppaFtpTransport};

/// Where the bytes of an upload come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadContent {
    /// Remote resource fetched over HTTP
    Url(String),
    /// Base64 payload, optionally prefixed with a `data:*;base64,` header
    Base64(String),
    /// Literal UTF-8 text
    Text(String),
}

impl UploadContent {
    pub fn kind(&self) -> &'static str {
        match self {
            UploadContent::Url(_) => "url",
            UploadContent::Base64(_) => "base64",
            UploadContent::Text(_) => "text",
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            UploadContent::Url(s) | UploadContent::Base64(s) | UploadContent::Text(s) => {
                s.trim().is_empty()
            }
        }
    }
}

/// One upload to the FTP repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub content: UploadContent,
    pub folder: String,
    pub extension: String,
}

impl UploadRequest {
    pub fn new(content: UploadContent, folder: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            content,
            folder: folder.into(),
            extension: extension.into(),
        }
    }

    pub fn from_url(url: impl Into<String>, folder: impl Into<String>, extension: impl Into<String>) -> Self {
        Self::new(UploadContent::Url(url.into()), folder, extension)
    }

    pub fn from_base64(data: impl Into<String>, folder: impl Into<String>, extension: impl Into<String>) -> Self {
        Self::new(UploadContent::Base64(data.into()), folder, extension)
    }

    pub fn from_text(text: impl Into<String>, folder: impl Into<String>, extension: impl Into<String>) -> Self {
        Self::new(UploadContent::Text(text.into()), folder, extension)
    }
}

/// Outcome of a successful upload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub success: bool,
    pub access_url: String,
    pub remote_path: String,
    pub file_name: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Upload helper shared by every integration
#[derive(Clone)]
pub struct FtpRepoService {
    transport: Arc<dyn FtpTransport>,
    api: ApiClient,
    root_dir: String,
    base_domain: String,
}

impl FtpRepoService {
    pub fn new(config: &FtpConfig, transport: Arc<dyn FtpTransport>, api: ApiClient) -> Self {
        info!(
            transport = transport.name(),
            root_dir = config.root_dir,
            base_domain = config.base_domain,
            "Initializing FTP repository"
        );

        Self {
            transport,
            api,
            root_dir: config.root_dir.clone(),
            base_domain: config.base_domain.trim_end_matches('/').to_string(),
        }
    }

    /// Repository writing to the FTP server described by `config`
    pub fn connect(config: &FtpConfig, api: ApiClient) -> Self {
        Self::new(config, Arc::new(SuppaFtpTransport::new(config.clone())), api)
    }

    pub async fn upload(&self, request: UploadRequest) -> IntegrationResult<UploadResult> {
        if request.content.is_empty() {
            return Err(IntegrationError::MissingParameter("content".to_string()));
        }
        let extension = normalize_extension(&request.extension)?;
        let folder = normalize_folder(&request.folder)?;

        info!(
            source = request.content.kind(),
            folder = folder,
            extension = extension,
            "Uploading content to FTP repository"
        );

        let data = match request.content {
            UploadContent::Url(ref url) => self.api.get_bytes(url).await?,
            UploadContent::Base64(ref encoded) => decode_base64(encoded)?,
            UploadContent::Text(text) => text.into_bytes(),
        };

        self.store(data, &folder, &extension).await
    }

    pub async fn upload_bytes(
        &self,
        data: Vec<u8>,
        folder: &str,
        extension: &str,
    ) -> IntegrationResult<UploadResult> {
        if data.is_empty() {
            return Err(IntegrationError::MissingParameter("content".to_string()));
        }
        let extension = normalize_extension(extension)?;
        let folder = normalize_folder(folder)?;
        self.store(data, &folder, &extension).await
    }

    pub async fn upload_from_url(&self, url: &str, folder: &str, extension: &str) -> IntegrationResult<UploadResult> {
        self.upload(UploadRequest::from_url(url, folder, extension)).await
    }

    pub async fn upload_base64(&self, data: &str, folder: &str, extension: &str) -> IntegrationResult<UploadResult> {
        self.upload(UploadRequest::from_base64(data, folder, extension)).await
    }

    pub async fn upload_text(&self, text: &str, folder: &str, extension: &str) -> IntegrationResult<UploadResult> {
        self.upload(UploadRequest::from_text(text, folder, extension)).await
    }

    /// Public URL of `file_name` inside `folder`
    pub fn access_url(&self, folder: &str, file_name: &str) -> String {
        let folder = folder.trim_matches('/');
        if folder.is_empty() {
            format!("{}/{}", self.base_domain, file_name)
        } else {
            format!("{}/{}/{}", self.base_domain, folder, file_name)
        }
    }

    /// Directory on the FTP server that holds `folder`
    pub fn remote_dir(&self, folder: &str) -> String {
        let root = self.root_dir.trim_end_matches('/');
        let folder = folder.trim_matches('/');
        match (root.is_empty(), folder.is_empty()) {
            (true, true) => "/".to_string(),
            (true, false) => format!("/{}", folder),
            (false, true) => root.to_string(),
            (false, false) => format!("{}/{}", root, folder),
        }
    }

    async fn store(&self, data: Vec<u8>, folder: &str, extension: &str) -> IntegrationResult<UploadResult> {
        let file_name = generate_file_name(extension);
        let remote_dir = self.remote_dir(folder);
        let size_bytes = data.len() as u64;

        if let Err(e) = self.transport.store(&remote_dir, &file_name, data).await {
            error!(error = %e, remote_dir = remote_dir, file_name = file_name, "FTP upload failed");
            return Err(e);
        }

        let access_url = self.access_url(folder, &file_name);
        let remote_path = format!("{}/{}", remote_dir.trim_end_matches('/'), file_name);

        info!(remote_path = remote_path, access_url = access_url, size_bytes = size_bytes, "File uploaded successfully");

        Ok(UploadResult {
            success: true,
            access_url,
            remote_path,
            file_name,
            size_bytes,
            uploaded_at: Utc::now(),
        })
    }
}

/// `{uuid}{extension}`; extension must already be normalized
pub fn generate_file_name(extension: &str) -> String {
    format!("{}{}", Uuid::new_v4(), extension)
}

/// Ensure a leading dot: `mp3` and `.mp3` both become `.mp3`
pub fn normalize_extension(extension: &str) -> IntegrationResult<String> {
    let trimmed = extension.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return Err(IntegrationError::MissingParameter("extension".to_string()));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-') {
        return Err(IntegrationError::invalid("extension", format!("'{}' contains invalid characters", extension)));
    }
    Ok(format!(".{}", trimmed))
}

fn normalize_folder(folder: &str) -> IntegrationResult<String> {
    let segments: Vec<&str> = folder.split('/').filter(|s| !s.trim().is_empty()).collect();
    if segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(IntegrationError::invalid("folder", "relative path segments are not allowed"));
    }
    Ok(segments.join("/"))
}

/// Decode Base64, tolerating a `data:<mime>;base64,` prefix and line breaks
pub fn decode_base64(encoded: &str) -> IntegrationResult<Vec<u8>> {
    let payload = match encoded.find(";base64,") {
        Some(idx) if encoded.starts_with("data:") => &encoded[idx + ";base64,".len()..],
        _ => encoded,
    };
    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(cleaned)?)
}

pub fn encode_base64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptgate_config::HttpConfig;
    use std::collections::HashSet;

    fn ftp_config(root_dir: &str) -> FtpConfig {
        FtpConfig {
            host: "ftp.example.com".to_string(),
            port: 21,
            user: "user".to_string(),
            password: "pass".to_string(),
            root_dir: root_dir.to_string(),
            base_domain: "https://cdn.example.com/".to_string(),
        }
    }

    fn repo(root_dir: &str) -> (FtpRepoService, Arc<InMemoryFtp>) {
        let transport = Arc::new(InMemoryFtp::new());
        let api = ApiClient::new(&HttpConfig::default()).unwrap();
        (FtpRepoService::new(&ftp_config(root_dir), transport.clone(), api), transport)
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("mp3").unwrap(), ".mp3");
        assert_eq!(normalize_extension(".png").unwrap(), ".png");
        assert_eq!(normalize_extension("tar.gz").unwrap(), ".tar.gz");
        assert!(matches!(normalize_extension(" "), Err(IntegrationError::MissingParameter(_))));
        assert!(normalize_extension("../x").is_err());
    }

    #[test]
    fn test_decode_base64_variants() {
        assert_eq!(decode_base64("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode_base64("data:text/plain;base64,aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode_base64("aGVs\nbG8=").unwrap(), b"hello");
        assert!(decode_base64("not base64!").is_err());
    }

    #[test]
    fn test_remote_dir_and_access_url() {
        let (service, _) = repo("/public_html/");
        assert_eq!(service.remote_dir("audio"), "/public_html/audio");
        assert_eq!(service.remote_dir(""), "/public_html");
        assert_eq!(service.access_url("audio", "a.mp3"), "https://cdn.example.com/audio/a.mp3");
        assert_eq!(service.access_url("", "a.mp3"), "https://cdn.example.com/a.mp3");

        let (rooted, _) = repo("/");
        assert_eq!(rooted.remote_dir("images/generated"), "/images/generated");
        assert_eq!(rooted.remote_dir(""), "/");
    }

    #[tokio::test]
    async fn test_upload_text_builds_predictable_url() {
        let (service, transport) = repo("/www");

        let result = service.upload_text("hello world", "notes", "txt").await.unwrap();

        assert!(result.success);
        assert!(result.file_name.ends_with(".txt"));
        assert_eq!(
            result.access_url,
            format!("https://cdn.example.com/notes/{}", result.file_name)
        );
        assert_eq!(result.remote_path, format!("/www/notes/{}", result.file_name));
        assert_eq!(result.size_bytes, 11);

        let stored = transport.find(&result.file_name).unwrap();
        assert_eq!(stored.remote_dir, "/www/notes");
        assert_eq!(stored.data, b"hello world");
    }

    #[tokio::test]
    async fn test_repeated_uploads_get_unique_names() {
        let (service, transport) = repo("/");
        let mut names = HashSet::new();

        for _ in 0..20 {
            let result = service.upload_base64("aGVsbG8=", "dup", ".bin").await.unwrap();
            names.insert(result.file_name);
        }

        assert_eq!(names.len(), 20);
        assert_eq!(transport.len(), 20);
    }

    #[tokio::test]
    async fn test_empty_content_is_rejected() {
        let (service, transport) = repo("/");

        let result = service.upload_text("   ", "notes", "txt").await;

        assert!(matches!(result, Err(IntegrationError::MissingParameter(name)) if name == "content"));
        assert!(transport.is_empty());
    }

    #[tokio::test]
    async fn test_traversal_folder_is_rejected() {
        let (service, _) = repo("/");
        let result = service.upload_text("x", "../etc", "txt").await;
        assert!(matches!(result, Err(IntegrationError::InvalidParameter { .. })));
    }

    #[tokio::test]
    async fn test_upload_bytes_stores_raw_data() {
        let (service, transport) = repo("/www");
        let audio = vec![0xff, 0xfb, 0x90, 0x00];

        let result = service.upload_bytes(audio.clone(), "audio", "mp3").await.unwrap();

        assert_eq!(result.size_bytes, 4);
        assert!(result.file_name.ends_with(".mp3"));
        let stored = transport.find(&result.file_name).unwrap();
        assert_eq!(stored.remote_dir, "/www/audio");
        assert_eq!(stored.data, audio);

        let empty = service.upload_bytes(Vec::new(), "audio", "mp3").await;
        assert!(matches!(empty, Err(IntegrationError::MissingParameter(_))));
    }

    #[tokio::test]
    async fn test_transport_failure_is_surfaced() {
        let api = ApiClient::new(&HttpConfig::default()).unwrap();
        let service = FtpRepoService::new(
            &ftp_config("/"),
            Arc::new(InMemoryFtp::failing("530 Login incorrect")),
            api,
        );

        let result = service.upload_text("data", "notes", "txt").await;

        match result {
            Err(IntegrationError::Ftp(message)) => assert!(message.contains("530")),
            other => panic!("expected FTP error, got {:?}", other.map(|r| r.access_url)),
        }
    }
}
