// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 conduit contributors

//! Error types
//!
//! conduit raises very few errors of its own. Failures produced by pipes or
//! terminal handlers are never wrapped: they come back to the caller exactly
//! as the pipe returned them. The variants below cover the handful of
//! conditions the pipeline itself can detect, plus configuration parsing.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for conduit operations
pub type ConduitResult<T> = Result<T, ConduitError>;

/// Main error type for conduit
#[derive(Error, Debug, Diagnostic)]
pub enum ConduitError {
    // ─────────────────────────────────────────────────────────────────────────
    // Invocation Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Pipe '{pipe}' does not expose a '{method}' method")]
    #[diagnostic(
        code(conduit::method_not_found),
        help("Implement '{method}' on the pipe, or select an existing method with `via`")
    )]
    MethodNotFound { pipe: String, method: String },

    #[error("Pipeline has no payload to send through its pipes")]
    #[diagnostic(
        code(conduit::missing_payload),
        help("Call `send` before `then` or `then_return`")
    )]
    MissingPayload,

    // ─────────────────────────────────────────────────────────────────────────
    // Pipe Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Pipe failed: {message}")]
    #[diagnostic(code(conduit::pipe_failed))]
    Failed {
        message: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Invalid pipeline configuration: {reason}")]
    #[diagnostic(code(conduit::invalid_config))]
    InvalidConfig {
        reason: String,
        #[help]
        help: Option<String>,
    },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(conduit::yaml_error))]
    Yaml { message: String },

    #[error("JSON parsing error: {message}")]
    #[diagnostic(code(conduit::json_error))]
    Json { message: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(conduit::toml_error))]
    Toml { message: String },
}

impl From<serde_yaml::Error> for ConduitError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for ConduitError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<toml::de::Error> for ConduitError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl ConduitError {
    /// Create a pipe failure from a message
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            help: None,
        }
    }

    /// Create a pipe failure with a hint for the caller
    pub fn failed_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a missing method error for a dispatch target
    pub fn method_not_found(pipe: &str, method: &str) -> Self {
        Self::MethodNotFound {
            pipe: pipe.to_string(),
            method: method.to_string(),
        }
    }

    /// Whether this error was raised by the pipeline itself rather than a pipe
    pub fn is_invocation_error(&self) -> bool {
        matches!(self, Self::MethodNotFound { .. } | Self::MissingPayload)
    }
}
