// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 conduit contributors

//! Continuations
//!
//! [`Next`] stands for "everything after the current pipe": the remaining
//! resolved steps followed by the terminal handler. It is a pair of shared
//! borrows, so copying it is free and a pipe may call it any number of times.

use std::fmt;

use crate::errors::ConduitError;
use crate::pipeline::chain::Step;

/// Continuation handed to every pipe
pub struct Next<'a, T, R = T, E = ConduitError> {
    steps: &'a [Step<'a, T, R, E>],
    terminal: &'a dyn Fn(T) -> Result<R, E>,
}

impl<'a, T, R, E> Next<'a, T, R, E> {
    pub(crate) fn new(
        steps: &'a [Step<'a, T, R, E>],
        terminal: &'a dyn Fn(T) -> Result<R, E>,
    ) -> Self {
        Self { steps, terminal }
    }

    /// Number of pipes still ahead, not counting the terminal handler
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    /// Whether only the terminal handler is left
    pub fn is_terminal(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<'a, T, R, E> Next<'a, T, R, E>
where
    E: From<ConduitError>,
{
    /// Pass the payload to the next pipe, or to the terminal handler once
    /// every pipe has run
    pub fn call(&self, payload: T) -> Result<R, E> {
        match self.steps.split_first() {
            Some((step, rest)) => {
                tracing::trace!(pipe = step.name(), remaining = rest.len(), "entering pipe");
                step.invoke(payload, Next::new(rest, self.terminal))
            }
            None => {
                tracing::trace!("reached terminal handler");
                (self.terminal)(payload)
            }
        }
    }
}

impl<T, R, E> Clone for Next<'_, T, R, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, R, E> Copy for Next<'_, T, R, E> {}

impl<T, R, E> fmt::Debug for Next<'_, T, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.steps.len())
            .finish()
    }
}
