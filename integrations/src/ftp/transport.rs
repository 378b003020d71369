//! FTP transports
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
use promptgate_config::FtpConfig;
use std::io::Cursor;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream};
use tracing::{debug, info, warn};

use crate::error::{IntegrationError, IntegrationResult};

/// Destination for uploaded files
#[async_trait]
pub trait FtpTransport: Send + Sync {
    /// Get the transport type name
    fn name(&self) -> &str;

    /// Store `data` as `remote_dir/file_name`, creating `remote_dir` if needed
    async fn store(&self, remote_dir: &str, file_name: &str, data: Vec<u8>) -> IntegrationResult<()>;
}

/// FTP transport backed by `suppaftp`
///
/// Opens one control connection per upload and always sends `QUIT`, whether
/// the upload succeeded or not.
#[derive(Debug, Clone)]
pub struct SuppaFtpTransport {
    config: FtpConfig,
}

impl SuppaFtpTransport {
    pub fn new(config: FtpConfig) -> Self {
        info!(host = config.host, port = config.port, "Initializing FTP transport");
        Self { config }
    }
}

#[async_trait]
impl FtpTransport for SuppaFtpTransport {
    fn name(&self) -> &str {
        "ftp"
    }

    async fn store(&self, remote_dir: &str, file_name: &str, data: Vec<u8>) -> IntegrationResult<()> {
        let config = self.config.clone();
        let remote_dir = remote_dir.to_string();
        let file_name = file_name.to_string();

        tokio::task::spawn_blocking(move || store_blocking(&config, &remote_dir, &file_name, data))
            .await
            .map_err(|e| IntegrationError::Ftp(format!("upload task failed: {}", e)))?
    }
}

fn ftp_error(stage: &'static str) -> impl Fn(FtpError) -> IntegrationError {
    move |e| IntegrationError::Ftp(format!("{} failed: {}", stage, e))
}

fn store_blocking(
    config: &FtpConfig,
    remote_dir: &str,
    file_name: &str,
    data: Vec<u8>,
) -> IntegrationResult<()> {
    let mut stream = FtpStream::connect(config.address()).map_err(ftp_error("connect"))?;

    let result = upload_on(&mut stream, config, remote_dir, file_name, data);

    if let Err(e) = stream.quit() {
        warn!(error = %e, host = config.host, "Failed to close FTP connection cleanly");
    }

    result
}

fn upload_on(
    stream: &mut FtpStream,
    config: &FtpConfig,
    remote_dir: &str,
    file_name: &str,
    data: Vec<u8>,
) -> IntegrationResult<()> {
    stream
        .login(config.user.as_str(), config.password.as_str())
        .map_err(ftp_error("login"))?;
    stream
        .transfer_type(FileType::Binary)
        .map_err(ftp_error("set binary mode"))?;

    ensure_dir(stream, remote_dir)?;

    let mut reader = Cursor::new(data);
    let written = stream
        .put_file(file_name, &mut reader)
        .map_err(ftp_error("upload"))?;

    debug!(remote_dir = remote_dir, file_name = file_name, bytes = written, "FTP upload finished");
    Ok(())
}

/// Walk into `remote_dir`, creating each missing segment on the way
fn ensure_dir(stream: &mut FtpStream, remote_dir: &str) -> IntegrationResult<()> {
    if remote_dir.starts_with('/') {
        stream.cwd("/").map_err(ftp_error("change to root directory"))?;
    }

    for segment in remote_dir.split('/').filter(|s| !s.is_empty()) {
        if stream.cwd(segment).is_ok() {
            continue;
        }
        // A concurrent upload may have created the segment after our CWD
        if let Err(mkdir_error) = stream.mkdir(segment) {
            if stream.cwd(segment).is_err() {
                return Err(ftp_error("create directory")(mkdir_error));
            }
            debug!(segment = segment, "Directory appeared while creating it");
            continue;
        }
        stream.cwd(segment).map_err(ftp_error("change directory"))?;
    }

    Ok(())
}
