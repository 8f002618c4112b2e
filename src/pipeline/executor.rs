// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 conduit contributors

//! Pipeline builder and executor
//!
//! Collects a payload, an ordered list of pipes and a method selector, then
//! runs the payload through the pipes in a single nested call.

use std::fmt;
use std::time::Instant;

use crate::errors::ConduitError;
use crate::pipeline::chain::Chain;
use crate::pipeline::{Pipe, PipelineConfig, DEFAULT_METHOD};

/// Single-use pipeline
///
/// `then` and `then_return` consume the pipeline, so each instance runs at
/// most once. Build a new one to run again.
///
/// # Example
/// ```
/// use conduit::{Pipe, Pipeline};
///
/// let output = Pipeline::<i64>::new()
///     .send(10)
///     .through(vec![
///         Pipe::map(|n: i64| n * 10),
///         Pipe::map(|n| n / 5),
///         Pipe::map(|n| n + 1),
///     ])
///     .then_return()
///     .unwrap();
///
/// assert_eq!(output, 21);
/// ```
pub struct Pipeline<T, R = T, E = ConduitError> {
    /// Payload sent through the pipes
    payload: Option<T>,
    /// Pipes in invocation order
    pipes: Vec<Pipe<T, R, E>>,
    /// Method invoked on dispatch targets
    method: String,
}

impl<T, R, E> Pipeline<T, R, E> {
    /// Create an empty pipeline using the default method name
    pub fn new() -> Self {
        Self {
            payload: None,
            pipes: Vec::new(),
            method: DEFAULT_METHOD.to_string(),
        }
    }

    /// Create an empty pipeline from configuration
    pub fn with_config(config: &PipelineConfig) -> Self {
        Self::new().via(config.method_name.clone())
    }

    /// Set the payload to send through the pipes
    pub fn send(mut self, payload: T) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Set the pipes, replacing any set previously
    pub fn through<I>(mut self, pipes: I) -> Self
    where
        I: IntoIterator<Item = Pipe<T, R, E>>,
    {
        self.pipes = pipes.into_iter().collect();
        self
    }

    /// Append a single pipe
    pub fn pipe(mut self, pipe: Pipe<T, R, E>) -> Self {
        self.pipes.push(pipe);
        self
    }

    /// Set the method invoked on dispatch targets
    pub fn via(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Method invoked on dispatch targets
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Number of pipes
    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    /// Whether no pipes are set
    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }
}

impl<T, R, E> Pipeline<T, R, E>
where
    E: From<ConduitError>,
{
    /// Run the pipeline, passing the surviving payload to `destination`
    ///
    /// Returns whatever the chain returns: the destination's result when
    /// every pipe forwards, or the value of the first pipe that stops. Errors
    /// from pipes or the destination are returned untouched.
    pub fn then<F>(self, destination: F) -> Result<R, E>
    where
        F: Fn(T) -> Result<R, E>,
    {
        let payload = self.payload.ok_or(ConduitError::MissingPayload)?;
        let chain = Chain::build(&self.pipes, &self.method);

        tracing::debug!(pipes = chain.len(), method = %self.method, "executing pipeline");
        let unresolved = chain.unresolved();
        if !unresolved.is_empty() {
            tracing::debug!(?unresolved, method = %self.method, "pipes without the selected method");
        }
        let start = Instant::now();

        let result = chain.run(payload, &destination)?;

        tracing::debug!(
            elapsed_us = start.elapsed().as_micros() as u64,
            "pipeline completed"
        );
        Ok(result)
    }
}

impl<T, E> Pipeline<T, T, E>
where
    E: From<ConduitError>,
{
    /// Run the pipeline and return the surviving payload
    pub fn then_return(self) -> Result<T, E> {
        self.then(Ok)
    }
}

impl<T, R, E> Default for Pipeline<T, R, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R, E> fmt::Debug for Pipeline<T, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("has_payload", &self.payload.is_some())
            .field("pipes", &self.pipes)
            .field("method", &self.method)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{MethodTable, Next, PipeTarget};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn append(marker: &'static str) -> Pipe<String> {
        Pipe::from_fn(move |input: String, next| next.call(input + marker))
    }

    #[test]
    fn test_empty_pipeline_does_not_modify_input() {
        let output = Pipeline::<String>::new()
            .send("A".to_string())
            .through(vec![])
            .then_return()
            .unwrap();

        assert_eq!(output, "A");
    }

    #[test]
    fn test_empty_pipeline_runs_destination() {
        let output = Pipeline::<u32, String>::new()
            .send(7)
            .then(|n| Ok(format!("got {}", n)))
            .unwrap();

        assert_eq!(output, "got 7");
    }

    #[test]
    fn test_pipes_are_processed_in_order() {
        let output = Pipeline::new()
            .send(String::new())
            .through(vec![append("A"), append("B"), append("C")])
            .then_return()
            .unwrap();

        assert_eq!(output, "ABC");
    }

    #[test]
    fn test_pipe_can_post_process_downstream_result() {
        let output = Pipeline::new()
            .send(String::new())
            .through(vec![
                Pipe::from_fn(|input: String, next: Next<'_, String>| {
                    let mut result = next.call(input)?;
                    result.push('A');
                    Ok(result)
                }),
                append("B"),
                append("C"),
            ])
            .then_return()
            .unwrap();

        assert_eq!(output, "BCA");
    }

    #[test]
    fn test_pipes_can_abort_processing() {
        let output = Pipeline::new()
            .send(String::new())
            .through(vec![
                append("A"),
                Pipe::from_fn(|input: String, next| {
                    if input == "A" {
                        return Ok(input);
                    }
                    next.call(input + "B")
                }),
                append("C"),
            ])
            .then_return()
            .unwrap();

        assert_eq!(output, "A");
    }

    #[test]
    fn test_abort_skips_destination() {
        let reached = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&reached);

        let output = Pipeline::<u32, String>::new()
            .send(1)
            .pipe(Pipe::from_fn(|_, _| Ok("stopped".to_string())))
            .then(move |_| {
                *flag.borrow_mut() = true;
                Ok("finished".to_string())
            })
            .unwrap();

        assert_eq!(output, "stopped");
        assert!(!*reached.borrow());
    }

    #[test]
    fn test_error_is_propagated() {
        let ran_after = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran_after);

        let result = Pipeline::new()
            .send(String::new())
            .through(vec![
                append("A"),
                Pipe::from_fn(|_input: String, _next| {
                    Err(ConduitError::failed("An error occurred"))
                }),
                Pipe::from_fn(move |input: String, next| {
                    *flag.borrow_mut() = true;
                    next.call(input)
                }),
            ])
            .then_return();

        match result {
            Err(ConduitError::Failed { message, .. }) => assert_eq!(message, "An error occurred"),
            other => panic!("Expected Failed error, got {:?}", other),
        }
        assert!(!*ran_after.borrow());
    }

    #[test]
    fn test_destination_error_is_propagated() {
        let result = Pipeline::<u32>::new()
            .send(1)
            .pipe(Pipe::map(|n| n + 1))
            .then(|_| Err(ConduitError::failed("destination refused")));

        assert!(matches!(result, Err(ConduitError::Failed { .. })));
    }

    #[test]
    fn test_numeric_transforms() {
        let output = Pipeline::<i64>::new()
            .send(10)
            .through(vec![
                Pipe::map(|n| n * 10),
                Pipe::map(|n| n / 5),
                Pipe::map(|n| n + 1),
            ])
            .then_return()
            .unwrap();

        assert_eq!(output, 21);
    }

    #[test]
    fn test_missing_payload() {
        let result = Pipeline::<String>::new()
            .through(vec![append("A")])
            .then_return();

        assert!(matches!(result, Err(ConduitError::MissingPayload)));
    }

    #[test]
    fn test_through_replaces_and_pipe_appends() {
        let pipeline = Pipeline::<String>::new()
            .pipe(append("X"))
            .through(vec![append("A"), append("B")])
            .pipe(append("C"));

        assert_eq!(pipeline.len(), 3);
        assert!(!pipeline.is_empty());

        let output = pipeline.send(String::new()).then_return().unwrap();
        assert_eq!(output, "ABC");
    }

    #[test]
    fn test_next_can_be_called_more_than_once() {
        let output = Pipeline::<Vec<u32>>::new()
            .send(vec![])
            .through(vec![
                Pipe::from_fn(|items: Vec<u32>, next: Next<'_, Vec<u32>>| {
                    let mut first = next.call(items.clone())?;
                    let second = next.call(items)?;
                    first.extend(second);
                    Ok(first)
                }),
                Pipe::from_fn(|mut items: Vec<u32>, next| {
                    items.push(items.len() as u32 + 1);
                    next.call(items)
                }),
            ])
            .then_return()
            .unwrap();

        assert_eq!(output, vec![1, 1]);
    }

    #[test]
    fn test_next_reports_remaining_pipes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let record = |seen: &Rc<RefCell<Vec<usize>>>| {
            let seen = Rc::clone(seen);
            Pipe::from_fn(move |n: u32, next: Next<'_, u32>| {
                assert_eq!(next.is_terminal(), next.remaining() == 0);
                seen.borrow_mut().push(next.remaining());
                next.call(n)
            })
        };

        Pipeline::new()
            .send(0)
            .through(vec![record(&seen), record(&seen), record(&seen)])
            .then_return()
            .unwrap();

        assert_eq!(*seen.borrow(), vec![2, 1, 0]);
    }

    struct Greeter;

    impl PipeTarget<String> for Greeter {
        fn responds_to(&self, method: &str) -> bool {
            matches!(method, "handle" | "greet")
        }

        fn call(
            &self,
            method: &str,
            input: String,
            next: Next<'_, String>,
        ) -> Result<String, ConduitError> {
            match method {
                "greet" => next.call(format!("{}hello ", input)),
                _ => next.call(format!("{}handled ", input)),
            }
        }
    }

    #[test]
    fn test_default_method_is_handle() {
        let pipeline = Pipeline::<String>::new().pipe(Pipe::target(Greeter));
        assert_eq!(pipeline.method(), "handle");

        let output = pipeline.send(String::new()).then_return().unwrap();
        assert_eq!(output, "handled ");
    }

    #[test]
    fn test_via_selects_method() {
        let output = Pipeline::new()
            .send(String::new())
            .through(vec![Pipe::target(Greeter), append("| "), Pipe::target(Greeter)])
            .via("greet")
            .then_return()
            .unwrap();

        assert_eq!(output, "hello | hello ");
    }

    #[test]
    fn test_missing_method_fails_when_reached() {
        let table = MethodTable::<String>::new("Publisher")
            .method("transform", |input, next| next.call(input + "published"));

        let result = Pipeline::new()
            .send(String::new())
            .through(vec![append("A"), Pipe::target(table)])
            .then_return();

        match result {
            Err(ConduitError::MethodNotFound { pipe, method }) => {
                assert_eq!(pipe, "Publisher");
                assert_eq!(method, "handle");
            }
            other => panic!("Expected MethodNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_method_is_harmless_when_not_reached() {
        let table = MethodTable::<String>::new("Publisher")
            .method("transform", |input, next| next.call(input + "published"));

        let output = Pipeline::new()
            .send(String::new())
            .through(vec![
                Pipe::from_fn(|input: String, _next| Ok(input + "stop")),
                Pipe::target(table),
            ])
            .then_return()
            .unwrap();

        assert_eq!(output, "stop");
    }

    #[test]
    fn test_with_config_sets_method() {
        let config = PipelineConfig {
            method_name: "greet".into(),
        };

        let pipeline = Pipeline::<String>::with_config(&config).pipe(Pipe::target(Greeter));
        assert_eq!(pipeline.method(), "greet");
        assert_eq!(pipeline.send(String::new()).then_return().unwrap(), "hello ");
    }

    #[test]
    fn test_debug_does_not_require_debug_payload() {
        struct Opaque;

        let pipeline = Pipeline::<Opaque>::new()
            .send(Opaque)
            .pipe(Pipe::tap(|_| {}).named("inspect"));

        let debug = format!("{:?}", pipeline);
        assert!(debug.contains("has_payload: true"));
        assert!(debug.contains("inspect"));
    }
}
