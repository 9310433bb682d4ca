//! Method instrumentation
//!
//! Wraps a call so that its start, finish and failure are logged through a
//! shared [`Logger`]. The wrapped call's return value and error pass through
//! untouched.
//!
//! ```
//! use rust_channel_logger::prelude::*;
//! use rust_channel_logger::instrument::{Instrumented, MethodOptions};
//! use std::sync::Arc;
//!
//! struct Greeter;
//!
//! impl Greeter {
//!     fn greet(&self, name: &str) -> Result<String> {
//!         Ok(format!("Hello {}", name))
//!     }
//! }
//!
//! let memory: Arc<MemoryChannel> = Arc::new(MemoryChannel::new("memory", MemoryWriter::new(10)));
//! let mut logger = Logger::new("app");
//! logger.add_channel(Arc::clone(&memory));
//!
//! let greeter = Instrumented::new(Greeter, Arc::new(logger));
//! let options = MethodOptions::new().log_start(true).log_finish(true);
//!
//! let greeting = greeter.call("greet", &options, "World", |g, name| g.greet(name)).unwrap();
//! assert_eq!(greeting, "Hello World");
//! assert_eq!(memory.messages(), vec!["Starting Greeter.greet", "Finished Greeter.greet"]);
//! ```

use crate::core::{Logger, Metadata};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Maps a failure to the data attached to its error entry
pub type ErrorHandler = Arc<dyn Fn(&dyn fmt::Display) -> Value + Send + Sync>;

/// Which events of an instrumented call are logged, plus per-method metadata
#[derive(Clone, Default)]
pub struct MethodOptions {
    metadata: Metadata,
    log_start: bool,
    log_finish: bool,
    log_error: bool,
    error_handler: Option<ErrorHandler>,
}

impl MethodOptions {
    /// Nothing logged until enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Log start, finish and failure
    pub fn all() -> Self {
        Self::new().log_start(true).log_finish(true).log_error(true)
    }

    #[must_use]
    pub fn log_start(mut self, enabled: bool) -> Self {
        self.log_start = enabled;
        self
    }

    #[must_use]
    pub fn log_finish(mut self, enabled: bool) -> Self {
        self.log_finish = enabled;
        self
    }

    #[must_use]
    pub fn log_error(mut self, enabled: bool) -> Self {
        self.log_error = enabled;
        self
    }

    #[must_use]
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.metadata.insert(key, value);
        self
    }

    /// Transform the failure before it is attached to the error entry
    ///
    /// ```
    /// use rust_channel_logger::instrument::MethodOptions;
    /// use serde_json::json;
    ///
    /// let options = MethodOptions::new()
    ///     .log_error(true)
    ///     .error_handler(|err| json!({ "errorCode": err.to_string() }));
    /// ```
    #[must_use]
    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&dyn fmt::Display) -> Value + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for MethodOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodOptions")
            .field("metadata", &self.metadata)
            .field("log_start", &self.log_start)
            .field("log_finish", &self.log_finish)
            .field("log_error", &self.log_error)
            .field("error_handler", &self.error_handler.is_some())
            .finish()
    }
}

/// One instrumented invocation: label, merged metadata and the events to log
struct Invocation<'a> {
    logger: &'a Logger,
    label: String,
    metadata: Metadata,
    options: &'a MethodOptions,
}

impl<'a> Invocation<'a> {
    fn new(
        logger: &'a Logger,
        label: String,
        base: &Metadata,
        options: &'a MethodOptions,
        args: &Value,
    ) -> Self {
        let mut metadata = base.merged(Some(&options.metadata));
        metadata.insert("method", label.clone());
        metadata.insert("args", args.clone());

        Self {
            logger,
            label,
            metadata,
            options,
        }
    }

    fn started(&self, args: Value) {
        if self.options.log_start {
            self.logger.debug(
                format!("Starting {}", self.label),
                Some(json!({ "args": args })),
                Some(self.metadata.clone()),
            );
        }
    }

    fn finished<R: Serialize>(&self, result: &R) {
        if self.options.log_finish {
            self.logger.debug(
                format!("Finished {}", self.label),
                Some(json!({ "result": to_json(result) })),
                Some(self.metadata.clone()),
            );
        }
    }

    fn failed<E: fmt::Display>(&self, error: &E) {
        if self.options.log_error {
            let data = match &self.options.error_handler {
                Some(handler) => handler(error as &dyn fmt::Display),
                None => Value::String(error.to_string()),
            };
            self.logger.error(
                format!("Error in {}", self.label),
                Some(data),
                Some(self.metadata.clone()),
            );
        }
    }

    fn complete<R: Serialize, E: fmt::Display>(&self, outcome: &Result<R, E>) {
        match outcome {
            Ok(result) => self.finished(result),
            Err(error) => self.failed(error),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| Value::String(format!("<unserializable: {}>", e)))
}

/// Last path segment of a type name, generics stripped
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// An object paired with the logger and metadata used for its calls
pub struct Instrumented<T> {
    inner: T,
    logger: Arc<Logger>,
    type_name: String,
    metadata: Metadata,
}

impl<T> Instrumented<T> {
    /// Wrap `inner`; calls are labelled `<TypeName>.<method>`
    pub fn new(inner: T, logger: Arc<Logger>) -> Self {
        Self {
            inner,
            logger,
            type_name: short_type_name::<T>().to_string(),
            metadata: Metadata::new(),
        }
    }

    /// Metadata attached to every call on this object
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Override the type label used in messages
    #[must_use]
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    fn label(&self, method: &str) -> String {
        format!("{}.{}", self.type_name, method)
    }

    /// Run `f` against the wrapped object with logging around it
    pub fn call<A, R, E, F>(
        &self,
        method: &str,
        options: &MethodOptions,
        args: A,
        f: F,
    ) -> Result<R, E>
    where
        A: Serialize,
        R: Serialize,
        E: fmt::Display,
        F: FnOnce(&T, A) -> Result<R, E>,
    {
        let args_json = to_json(&args);
        let invocation = Invocation::new(
            &self.logger,
            self.label(method),
            &self.metadata,
            options,
            &args_json,
        );

        invocation.started(args_json);
        let outcome = f(&self.inner, args);
        invocation.complete(&outcome);
        outcome
    }

    /// Like [`call`](Self::call) with mutable access to the wrapped object
    pub fn call_mut<A, R, E, F>(
        &mut self,
        method: &str,
        options: &MethodOptions,
        args: A,
        f: F,
    ) -> Result<R, E>
    where
        A: Serialize,
        R: Serialize,
        E: fmt::Display,
        F: FnOnce(&mut T, A) -> Result<R, E>,
    {
        let args_json = to_json(&args);
        let logger = Arc::clone(&self.logger);
        let invocation = Invocation::new(
            &logger,
            self.label(method),
            &self.metadata,
            options,
            &args_json,
        );

        invocation.started(args_json);
        let outcome = f(&mut self.inner, args);
        invocation.complete(&outcome);
        outcome
    }

    /// Await the future produced by `f` with logging around it
    pub async fn call_async<'a, A, R, E, F, Fut>(
        &'a self,
        method: &str,
        options: &MethodOptions,
        args: A,
        f: F,
    ) -> Result<R, E>
    where
        A: Serialize,
        R: Serialize,
        E: fmt::Display,
        F: FnOnce(&'a T, A) -> Fut,
        Fut: Future<Output = Result<R, E>> + 'a,
    {
        let args_json = to_json(&args);
        let invocation = Invocation::new(
            &self.logger,
            self.label(method),
            &self.metadata,
            options,
            &args_json,
        );

        invocation.started(args_json);
        let outcome = f(&self.inner, args).await;
        invocation.complete(&outcome);
        outcome
    }
}

/// Wrap a free callable; entries are labelled with `name`.
///
/// ```
/// use rust_channel_logger::prelude::*;
/// use rust_channel_logger::instrument::{instrument, MethodOptions};
/// use std::sync::Arc;
///
/// let logger = Arc::new(Logger::new("math"));
/// let checked_div = instrument(
///     logger,
///     "checked_div",
///     MethodOptions::all(),
///     |(a, b): (i32, i32)| a.checked_div(b).ok_or_else(|| "division by zero".to_string()),
/// );
///
/// assert_eq!(checked_div((10, 2)), Ok(5));
/// assert_eq!(checked_div((1, 0)), Err("division by zero".to_string()));
/// ```
pub fn instrument<A, R, E, F>(
    logger: Arc<Logger>,
    name: impl Into<String>,
    options: MethodOptions,
    f: F,
) -> impl Fn(A) -> Result<R, E>
where
    A: Serialize,
    R: Serialize,
    E: fmt::Display,
    F: Fn(A) -> Result<R, E>,
{
    let name = name.into();
    let base = Metadata::new();

    move |args: A| {
        let args_json = to_json(&args);
        let invocation = Invocation::new(&logger, name.clone(), &base, &options, &args_json);

        invocation.started(args_json);
        let outcome = f(args);
        invocation.complete(&outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{MemoryChannel, MemoryWriter};
    use crate::core::LogLevel;

    struct Calculator;

    impl Calculator {
        fn divide(&self, (a, b): (i64, i64)) -> Result<i64, String> {
            if b == 0 {
                Err("division by zero".to_string())
            } else {
                Ok(a / b)
            }
        }
    }

    fn logger_with_memory() -> (Arc<Logger>, Arc<MemoryChannel>) {
        let memory: Arc<MemoryChannel> =
            Arc::new(MemoryChannel::new("memory", MemoryWriter::new(100)));
        let mut logger = Logger::new("instrument");
        logger.add_channel(Arc::clone(&memory));
        (Arc::new(logger), memory)
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Calculator>(), "Calculator");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }

    #[test]
    fn test_start_and_finish_entries() {
        let (logger, memory) = logger_with_memory();
        let calc = Instrumented::new(Calculator, logger)
            .with_metadata(Metadata::new().with_field("service", "math"));
        let options = MethodOptions::new()
            .log_start(true)
            .log_finish(true)
            .field("operation", "test");

        let value = calc.call("divide", &options, (10, 2), |c, args| c.divide(args));
        assert_eq!(value, Ok(5));

        let entries = memory.entries();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].message, "Starting Calculator.divide");
        assert_eq!(entries[0].level, LogLevel::Debug);
        assert_eq!(entries[0].data, Some(json!({"args": [10, 2]})));

        assert_eq!(entries[1].message, "Finished Calculator.divide");
        assert_eq!(entries[1].data, Some(json!({"result": 5})));

        for entry in &entries {
            assert_eq!(entry.metadata.get("operation"), Some(&json!("test")));
            assert_eq!(entry.metadata.get("service"), Some(&json!("math")));
            assert_eq!(entry.metadata.get("method"), Some(&json!("Calculator.divide")));
            assert_eq!(entry.metadata.get("args"), Some(&json!([10, 2])));
        }
    }

    #[test]
    fn test_error_entry_with_handler() {
        let (logger, memory) = logger_with_memory();
        let calc = Instrumented::new(Calculator, logger);
        let options = MethodOptions::new()
            .log_error(true)
            .error_handler(|err| json!({ "errorCode": err.to_string() }));

        let err = calc
            .call("divide", &options, (1, 0), |c, args| c.divide(args))
            .unwrap_err();
        assert_eq!(err, "division by zero");

        let entries = memory.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Error);
        assert_eq!(entries[0].message, "Error in Calculator.divide");
        assert_eq!(entries[0].data, Some(json!({"errorCode": "division by zero"})));
    }

    #[test]
    fn test_disabled_events_log_nothing() {
        let (logger, memory) = logger_with_memory();
        let calc = Instrumented::new(Calculator, logger);

        let _ = calc.call("divide", &MethodOptions::new(), (1, 0), |c, args| c.divide(args));
        let _ = calc.call("divide", &MethodOptions::new(), (4, 2), |c, args| c.divide(args));

        assert!(memory.is_empty());
    }

    #[test]
    fn test_call_mut_and_type_name_override() {
        let (logger, memory) = logger_with_memory();
        let mut counter = Instrumented::new(0_u32, logger).with_type_name("Counter");

        let next = counter.call_mut(
            "increment",
            &MethodOptions::new().log_finish(true),
            1_u32,
            |n, by| -> Result<u32, String> {
                *n += by;
                Ok(*n)
            },
        );

        assert_eq!(next, Ok(1));
        assert_eq!(*counter.inner(), 1);
        assert_eq!(memory.messages(), vec!["Finished Counter.increment"]);
    }

    #[test]
    fn test_instrument_free_function() {
        let (logger, memory) = logger_with_memory();
        let parse = instrument(
            logger,
            "parse_port",
            MethodOptions::all(),
            |raw: String| raw.parse::<u16>().map_err(|e| e.to_string()),
        );

        assert_eq!(parse("8080".to_string()), Ok(8080));
        assert!(parse("http".to_string()).is_err());

        assert_eq!(
            memory.messages(),
            vec![
                "Starting parse_port",
                "Finished parse_port",
                "Starting parse_port",
                "Error in parse_port",
            ]
        );
    }

    #[tokio::test]
    async fn test_call_async_passthrough() {
        struct Fetcher;

        impl Fetcher {
            async fn fetch(&self, id: u32) -> Result<String, String> {
                tokio::task::yield_now().await;
                if id == 0 {
                    Err("not found".to_string())
                } else {
                    Ok(format!("item-{}", id))
                }
            }
        }

        let (logger, memory) = logger_with_memory();
        let fetcher = Instrumented::new(Fetcher, logger);
        let options = MethodOptions::all();

        let item = fetcher
            .call_async("fetch", &options, 7, |f, id| f.fetch(id))
            .await;
        assert_eq!(item, Ok("item-7".to_string()));

        let missing = fetcher
            .call_async("fetch", &options, 0, |f, id| f.fetch(id))
            .await;
        assert_eq!(missing, Err("not found".to_string()));

        assert_eq!(
            memory.messages(),
            vec![
                "Starting Fetcher.fetch",
                "Finished Fetcher.fetch",
                "Starting Fetcher.fetch",
                "Error in Fetcher.fetch",
            ]
        );
    }
}
