//! Caller-supplied request parameters
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
use serde_json::{Map, Value};

use crate::error::{IntegrationError, IntegrationResult};

/// JSON object of parameters passed alongside a prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and callers assembling requests
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    /// A non-empty string parameter, or `MissingParameter`
    pub fn required_str(&self, name: &str) -> IntegrationResult<&str> {
        self.optional_str(name)?
            .ok_or_else(|| IntegrationError::MissingParameter(name.to_string()))
    }

    /// A string parameter; empty strings count as absent
    pub fn optional_str(&self, name: &str) -> IntegrationResult<Option<&str>> {
        match self.value(name) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(IntegrationError::invalid(
                name,
                format!("expected a string, got {}", type_name(other)),
            )),
        }
    }

    pub fn str_or<'a>(&'a self, name: &str, default: &'a str) -> IntegrationResult<&'a str> {
        Ok(self.optional_str(name)?.unwrap_or(default))
    }

    /// Unsigned integer, also accepting numeric strings
    pub fn u64_or(&self, name: &str, default: u64) -> IntegrationResult<u64> {
        match self.value(name) {
            None => Ok(default),
            Some(Value::Number(n)) => n
                .as_u64()
                .ok_or_else(|| IntegrationError::invalid(name, "expected a non-negative integer")),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| IntegrationError::invalid(name, format!("'{}' is not an integer", s))),
            Some(other) => Err(IntegrationError::invalid(
                name,
                format!("expected an integer, got {}", type_name(other)),
            )),
        }
    }

    /// Float, also accepting numeric strings
    pub fn f64_or(&self, name: &str, default: f64) -> IntegrationResult<f64> {
        match self.value(name) {
            None => Ok(default),
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| IntegrationError::invalid(name, "expected a number")),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| IntegrationError::invalid(name, format!("'{}' is not a number", s))),
            Some(other) => Err(IntegrationError::invalid(
                name,
                format!("expected a number, got {}", type_name(other)),
            )),
        }
    }

    /// Boolean, also accepting `"true"` / `"false"`
    pub fn bool_or(&self, name: &str, default: bool) -> IntegrationResult<bool> {
        match self.value(name) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(IntegrationError::invalid(name, format!("'{}' is not a boolean", s))),
            },
            Some(other) => Err(IntegrationError::invalid(
                name,
                format!("expected a boolean, got {}", type_name(other)),
            )),
        }
    }

    pub fn object(&self, name: &str) -> IntegrationResult<Option<&Map<String, Value>>> {
        match self.value(name) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(IntegrationError::invalid(
                name,
                format!("expected an object, got {}", type_name(other)),
            )),
        }
    }

    /// Key the caller wants the result nested under
    ///
    /// Accepts `responseKey` or `response_key`; anything that is not a
    /// non-empty string falls back to `default`.
    pub fn response_key(&self, default: &str) -> String {
        ["responseKey", "response_key"]
            .iter()
            .filter_map(|name| self.value(name))
            .find_map(|v| v.as_str().filter(|s| !s.trim().is_empty()))
            .unwrap_or(default)
            .to_string()
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Parameters {
    type Error = IntegrationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(IntegrationError::invalid(
                "parameters",
                format!("expected an object, got {}", type_name(&other)),
            )),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
