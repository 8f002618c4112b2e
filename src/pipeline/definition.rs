// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 conduit contributors

//! Pipeline configuration
//!
//! Options a pipeline can be built from. Configuration is parsed from
//! in-memory documents; conduit never touches the filesystem itself.

use serde::{Deserialize, Serialize};

use crate::errors::{ConduitError, ConduitResult};

/// Method invoked on dispatch targets unless configured otherwise
pub const DEFAULT_METHOD: &str = "handle";

/// Pipeline options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Method invoked on dispatch target pipes
    #[serde(default = "default_method", alias = "methodName")]
    pub method_name: String,
}

fn default_method() -> String {
    DEFAULT_METHOD.to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            method_name: default_method(),
        }
    }
}

impl PipelineConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> ConduitResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validated()
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(source: &str) -> ConduitResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validated()
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> ConduitResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> ConduitResult<String> {
        serde_yaml::to_string(self).map_err(Into::into)
    }

    fn validated(self) -> ConduitResult<Self> {
        if self.method_name.trim().is_empty() {
            return Err(ConduitError::InvalidConfig {
                reason: "method_name is empty".into(),
                help: Some(format!(
                    "Remove the key to use the default method '{}'",
                    DEFAULT_METHOD
                )),
            });
        }
        Ok(self)
    }
}
