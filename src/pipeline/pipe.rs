// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 conduit contributors

//! Pipe definitions
//!
//! A pipe is one step of a pipeline. It receives the current payload and a
//! [`Next`] continuation, and decides what to do with both.

use std::collections::HashMap;
use std::fmt;

use crate::errors::ConduitError;
use crate::pipeline::Next;

/// Signature shared by callable pipes and dispatch target methods
pub type PipeFn<T, R, E> = dyn Fn(T, Next<'_, T, R, E>) -> Result<R, E>;

/// Object-style pipe exposing one or more named methods
///
/// The pipeline asks the target whether it responds to the method selected
/// with [`Pipeline::via`](crate::Pipeline::via) once, when the chain is
/// built, and calls [`PipeTarget::call`] with that name whenever the chain
/// reaches it.
///
/// # Example
/// ```
/// use conduit::{ConduitError, Next, PipeTarget};
///
/// struct Shout;
///
/// impl PipeTarget<String> for Shout {
///     fn responds_to(&self, method: &str) -> bool {
///         method == "transform"
///     }
///
///     fn call(
///         &self,
///         _method: &str,
///         text: String,
///         next: Next<'_, String>,
///     ) -> Result<String, ConduitError> {
///         next.call(text.to_uppercase())
///     }
/// }
/// ```
pub trait PipeTarget<T, R = T, E = ConduitError> {
    /// Whether this target exposes `method`
    fn responds_to(&self, method: &str) -> bool;

    /// Invoke `method` with the payload and continuation
    fn call(&self, method: &str, payload: T, next: Next<'_, T, R, E>) -> Result<R, E>;

    /// Name used in traces and errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("pipe")
    }
}

/// Shape of a pipe
pub enum PipeKind<T, R, E> {
    /// Plain closure, invoked directly
    Callable(Box<PipeFn<T, R, E>>),
    /// Object invoked through a named method
    Target(Box<dyn PipeTarget<T, R, E>>),
}

/// A single pipeline step
pub struct Pipe<T, R = T, E = ConduitError> {
    name: Option<String>,
    kind: PipeKind<T, R, E>,
}

impl<T, R, E> Pipe<T, R, E> {
    /// Create a callable pipe
    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(T, Next<'_, T, R, E>) -> Result<R, E> + 'static,
    {
        Self {
            name: None,
            kind: PipeKind::Callable(Box::new(func)),
        }
    }

    /// Create a dispatch target pipe
    pub fn target<P>(target: P) -> Self
    where
        P: PipeTarget<T, R, E> + 'static,
    {
        Self {
            name: None,
            kind: PipeKind::Target(Box::new(target)),
        }
    }

    /// Attach a display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name, falling back to the target's own name
    pub fn name(&self) -> &str {
        match (&self.name, &self.kind) {
            (Some(name), _) => name,
            (None, PipeKind::Callable(_)) => "closure",
            (None, PipeKind::Target(target)) => target.name(),
        }
    }

    /// The shape of this pipe
    pub fn kind(&self) -> &PipeKind<T, R, E> {
        &self.kind
    }

    /// Whether this pipe is a dispatch target
    pub fn is_target(&self) -> bool {
        matches!(self.kind, PipeKind::Target(_))
    }
}

impl<T, R, E> Pipe<T, R, E>
where
    T: 'static,
    R: 'static,
    E: From<ConduitError> + 'static,
{
    /// Transform the payload, then forward it
    pub fn map<F>(transform: F) -> Self
    where
        F: Fn(T) -> T + 'static,
    {
        Self::from_fn(move |payload, next| next.call(transform(payload)))
    }

    /// Inspect the payload, then forward it unchanged
    pub fn tap<F>(inspect: F) -> Self
    where
        F: Fn(&T) + 'static,
    {
        Self::from_fn(move |payload, next| {
            inspect(&payload);
            next.call(payload)
        })
    }
}

impl<T, R, E> fmt::Debug for Pipe<T, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            PipeKind::Callable(_) => "callable",
            PipeKind::Target(_) => "target",
        };
        f.debug_struct("Pipe")
            .field("name", &self.name())
            .field("kind", &kind)
            .finish()
    }
}

/// Dispatch target built from named closures
///
/// Useful when a pipe needs several entry points (for example `handle` and
/// `transform`) without declaring a dedicated type.
pub struct MethodTable<T, R = T, E = ConduitError> {
    name: String,
    methods: HashMap<String, Box<PipeFn<T, R, E>>>,
}

impl<T, R, E> MethodTable<T, R, E> {
    /// Create an empty table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: HashMap::new(),
        }
    }

    /// Register a method, replacing any previous one with the same name
    pub fn method<F>(mut self, method: impl Into<String>, func: F) -> Self
    where
        F: Fn(T, Next<'_, T, R, E>) -> Result<R, E> + 'static,
    {
        self.methods.insert(method.into(), Box::new(func));
        self
    }

    /// Registered method names, sorted
    pub fn methods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<T, R, E> PipeTarget<T, R, E> for MethodTable<T, R, E>
where
    E: From<ConduitError>,
{
    fn responds_to(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    fn call(&self, method: &str, payload: T, next: Next<'_, T, R, E>) -> Result<R, E> {
        match self.methods.get(method) {
            Some(func) => func(payload, next),
            None => Err(ConduitError::method_not_found(&self.name, method).into()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
