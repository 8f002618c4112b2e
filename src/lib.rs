// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 conduit contributors

//! # conduit - Sequential Pipe Composition
//!
//! `conduit` threads a value through an ordered list of pipes. Every pipe
//! receives the value and a continuation for the rest of the chain, and
//! chooses whether to forward, transform, short-circuit, or post-process
//! what the downstream pipes return.
//!
//! ## Features
//!
//! - **Explicit control flow** - A pipe continues the chain only by calling `next`
//! - **Two pipe shapes** - Plain closures, or objects invoked by method name
//! - **Untouched errors** - Failures reach the caller exactly as a pipe returned them
//! - **Configurable dispatch** - Select the invoked method in code or from YAML/TOML/JSON
//!
//! ## Quick Start
//!
//! ```
//! use conduit::{Pipe, Pipeline};
//!
//! let output = Pipeline::<String>::new()
//!     .send(String::new())
//!     .through(vec![
//!         Pipe::from_fn(|input: String, next| next.call(input + "A")),
//!         Pipe::from_fn(|input: String, next| next.call(input + "B")),
//!     ])
//!     .then_return()
//!     .unwrap();
//!
//! assert_eq!(output, "AB");
//! ```

pub mod errors;
pub mod pipeline;

// Re-export commonly used types
pub use errors::{ConduitError, ConduitResult};
pub use pipeline::{
    MethodTable, Next, Pipe, PipeFn, PipeKind, PipeTarget, Pipeline, PipelineConfig,
    DEFAULT_METHOD,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
