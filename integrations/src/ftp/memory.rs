//! In-memory FTP transport for tests and dry runs
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
use std::sync::Mutex;
use tracing::info;

use super::transport::FtpTransport;
use crate::error::{IntegrationError, IntegrationResult};

/// A file recorded by `InMemoryFtp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub remote_dir: String,
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Transport that keeps uploads in memory instead of sending them anywhere
#[derive(Debug, Default)]
pub struct InMemoryFtp {
    files: Mutex<Vec<StoredFile>>,
    failure: Option<String>,
}

impl InMemoryFtp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose every upload fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            files: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    pub fn files(&self) -> Vec<StoredFile> {
        self.files.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn find(&self, file_name: &str) -> Option<StoredFile> {
        self.files()
            .into_iter()
            .find(|f| f.file_name == file_name)
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FtpTransport for InMemoryFtp {
    fn name(&self) -> &str {
        "memory"
    }

    async fn store(&self, remote_dir: &str, file_name: &str, data: Vec<u8>) -> IntegrationResult<()> {
        if let Some(ref message) = self.failure {
            return Err(IntegrationError::Ftp(message.clone()));
        }

        info!(remote_dir = remote_dir, file_name = file_name, bytes = data.len(), "Stored file in memory");

        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(StoredFile {
                remote_dir: remote_dir.to_string(),
                file_name: file_name.to_string(),
                data,
            });
        Ok(())
    }
}
