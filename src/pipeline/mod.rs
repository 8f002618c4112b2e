// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 conduit contributors

//! Pipeline definitions and types
//!
//! This module defines the pipeline builder, the pipe shapes it accepts,
//! the continuation passed between pipes, and pipeline configuration.

mod chain;
mod definition;
mod executor;
mod next;
mod pipe;

pub use definition::{PipelineConfig, DEFAULT_METHOD};
pub use executor::Pipeline;
pub use next::Next;
pub use pipe::{MethodTable, Pipe, PipeFn, PipeKind, PipeTarget};
