// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 conduit contributors

//! Chain construction
//!
//! Turns the configured pipes into resolved steps. Dispatch targets are
//! matched against the selected method exactly once, here; a target that
//! does not respond to it becomes an unresolved step that fails only if the
//! chain actually reaches it.

use crate::errors::ConduitError;
use crate::pipeline::{Next, Pipe, PipeFn, PipeKind, PipeTarget};

/// How a resolved step is invoked
enum Action<'p, T, R, E> {
    Call(&'p PipeFn<T, R, E>),
    Dispatch {
        target: &'p dyn PipeTarget<T, R, E>,
        method: &'p str,
    },
    Unresolved {
        method: &'p str,
    },
}

/// A pipe bound to the method selector of one execution
pub(crate) struct Step<'p, T, R, E> {
    name: &'p str,
    action: Action<'p, T, R, E>,
}

impl<'p, T, R, E> Step<'p, T, R, E>
where
    E: From<ConduitError>,
{
    fn resolve(pipe: &'p Pipe<T, R, E>, method: &'p str) -> Self {
        let action = match pipe.kind() {
            PipeKind::Callable(func) => Action::Call(func.as_ref()),
            PipeKind::Target(target) if target.responds_to(method) => Action::Dispatch {
                target: target.as_ref(),
                method,
            },
            PipeKind::Target(_) => Action::Unresolved { method },
        };

        Self {
            name: pipe.name(),
            action,
        }
    }

    /// Invoke this step with the continuation over the steps after it
    pub(crate) fn invoke(&self, payload: T, next: Next<'_, T, R, E>) -> Result<R, E> {
        match &self.action {
            Action::Call(func) => func(payload, next),
            Action::Dispatch { target, method } => target.call(method, payload, next),
            Action::Unresolved { method } => {
                Err(ConduitError::method_not_found(self.name, method).into())
            }
        }
    }

    pub(crate) fn name(&self) -> &str {
        self.name
    }
}

/// Resolved steps for a single execution
pub(crate) struct Chain<'p, T, R, E> {
    steps: Vec<Step<'p, T, R, E>>,
}

impl<'p, T, R, E> Chain<'p, T, R, E>
where
    E: From<ConduitError>,
{
    /// Resolve every pipe against the method selector, preserving order
    pub(crate) fn build(pipes: &'p [Pipe<T, R, E>], method: &'p str) -> Self {
        Self {
            steps: pipes.iter().map(|pipe| Step::resolve(pipe, method)).collect(),
        }
    }

    /// Run the payload through the steps, ending in `terminal`
    pub(crate) fn run(&self, payload: T, terminal: &dyn Fn(T) -> Result<R, E>) -> Result<R, E> {
        Next::new(&self.steps, terminal).call(payload)
    }

    /// Names of steps that will fail with a missing method when reached
    pub(crate) fn unresolved(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|step| matches!(step.action, Action::Unresolved { .. }))
            .map(|step| step.name)
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }
}
