//! Prompt Integrations
//!
//! This crate routes `(prompt, engine, model, parameters)` requests to
//! integrations with external APIs:
//! - Image generation (OpenAI)
//! - Text-to-speech (ElevenLabs)
//! - Face swap (Segmind)
//! - Music generation (Suno) and stem separation (MVSEP), both long-running jobs
//! - Generic HTTP requests and FTP uploads
//!
//! Generated files are persisted through the shared FTP repository and every
//! integration answers with a `{ [responseKey]: { success, ... } }` envelope.
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


pub mod adapters;
pub mod context;
pub mod envelope;
pub mod error;
pub mod ftp;
pub mod http;
pub mod params;
pub mod polling;
pub mod registry;
pub mod traits;

pub use context::IntegrationContext;
pub use envelope::{Outcome, ResponseEnvelope};
pub use error::{IntegrationError, IntegrationResult};
pub use ftp::{FtpRepoService, UploadContent, UploadRequest, UploadResult};
pub use params::Parameters;
pub use polling::{poll_job, poll_until_terminal, JobStatus, PollConfig, PollableJob};
pub use registry::{IntegrationRegistry, PromptProcessor, PromptRequest};
pub use traits::Integration;
