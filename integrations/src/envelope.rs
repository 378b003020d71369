//! Response envelope shared by every integration
//!
//! An envelope serializes as a JSON object with a single field, named by the
//! caller-supplied response key:
//!
//! ```json
//! { "audio": { "success": true, "data": { "url": "https://..." } } }
//! ```
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


use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::IntegrationError;

/// Result of one integration call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// `{ [key]: Outcome }`
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    key: String,
    outcome: Outcome,
}

impl ResponseEnvelope {
    pub fn success(key: impl Into<String>, data: Value) -> Self {
        Self {
            key: key.into(),
            outcome: Outcome {
                success: true,
                data: Some(data),
                error: None,
                details: None,
            },
        }
    }

    pub fn failure(key: impl Into<String>, error: &IntegrationError) -> Self {
        Self {
            key: key.into(),
            outcome: Outcome {
                success: false,
                data: None,
                error: Some(error.to_string()),
                details: error.details().cloned(),
            },
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_success(&self) -> bool {
        self.outcome.success
    }

    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::with_capacity(1);
        map.insert(
            self.key.clone(),
            serde_json::to_value(&self.outcome).unwrap_or(Value::Null),
        );
        Value::Object(map)
    }
}

impl Serialize for ResponseEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.outcome)?;
        map.end()
    }
}
