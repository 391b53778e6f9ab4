//! Aspect-oriented advice for cross-cutting concerns.
//!
//! Advice wraps an operation without changing what it returns. Each layer
//! receives the [`Invocation`] and a [`Next`] continuation, may do work
//! before and after calling it, and hands back the continuation's result.
//!
//! # Architecture
//!
//! Advice is composed once, when the cache is built:
//!
//! ```ignore
//! let chain = AdviceChain::new()
//!     .with(CountCalls::new(store.clone()))      // outermost
//!     .with(RecordHistory::new(store.clone()));  // innermost
//!
//! // The target future is lazy; it only runs when the innermost layer
//! // awaits its continuation.
//! let output = chain.invoke(&call, Box::pin(write(key, data))).await?;
//! ```
//!
//! # Available Advice
//!
//! - [`CountCalls`] - Increments a per-operation counter before each call
//! - [`RecordHistory`] - Logs inputs and outputs of each call

mod counting;
mod history;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::cache::Value;
use crate::error::Result;

pub use counting::CountCalls;
pub use history::{
    decode_args, decode_output, encode_args, encode_output, inputs_key, outputs_key,
    RecordHistory,
};

/// The deferred body of an advised operation.
pub type CallFuture<'a> = BoxFuture<'a, Result<Value>>;

/// One call to an advised operation.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    operation: &'a str,
    args: &'a [Value],
}

impl<'a> Invocation<'a> {
    /// Describe a call by its qualified operation name and positional args.
    pub fn new(operation: &'a str, args: &'a [Value]) -> Self {
        Self { operation, args }
    }

    /// Qualified operation name, shared by every instance (e.g. `Cache.store`).
    pub fn operation(&self) -> &'a str {
        self.operation
    }

    pub fn args(&self) -> &'a [Value] {
        self.args
    }
}

/// Continuation into the remaining advice layers and, finally, the target.
pub struct Next<'a> {
    remaining: &'a [Arc<dyn Advice>],
    target: CallFuture<'a>,
}

impl<'a> Next<'a> {
    /// Run the rest of the chain.
    pub fn run(self, call: &'a Invocation<'a>) -> CallFuture<'a> {
        match self.remaining.split_first() {
            Some((advice, remaining)) => advice.around(
                call,
                Next {
                    remaining,
                    target: self.target,
                },
            ),
            None => self.target,
        }
    }
}

/// Around-call behavior applied to an advised operation.
///
/// Implementations must return the continuation's result unchanged and must
/// propagate its errors.
#[async_trait]
pub trait Advice: Send + Sync {
    async fn around<'a>(&'a self, call: &'a Invocation<'a>, next: Next<'a>) -> Result<Value>;
}

/// Ordered advice layers. The first layer added is the outermost.
#[derive(Clone, Default)]
pub struct AdviceChain {
    layers: Vec<Arc<dyn Advice>>,
}

impl AdviceChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer inside every layer already present.
    pub fn with(mut self, advice: impl Advice + 'static) -> Self {
        self.layers.push(Arc::new(advice));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Run `target` through every layer.
    pub async fn invoke<'a>(
        &'a self,
        call: &'a Invocation<'a>,
        target: CallFuture<'a>,
    ) -> Result<Value> {
        Next {
            remaining: &self.layers,
            target,
        }
        .run(call)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::error::CacheError;

    /// Records the order in which layers enter and leave.
    struct Trace {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Advice for Trace {
        async fn around<'a>(&'a self, call: &'a Invocation<'a>, next: Next<'a>) -> Result<Value> {
            self.log.lock().unwrap().push(format!("enter {}", self.name));
            let result = next.run(call).await;
            self.log.lock().unwrap().push(format!("leave {}", self.name));
            result
        }
    }

    #[tokio::test]
    async fn test_empty_chain_runs_target() {
        let chain = AdviceChain::new();
        assert!(chain.is_empty());
        let args = [Value::from(1)];
        let call = Invocation::new("op", &args);

        let output = chain
            .invoke(&call, Box::pin(async { Ok(Value::from("done")) }))
            .await
            .unwrap();

        assert_eq!(output, Value::from("done"));
    }

    #[tokio::test]
    async fn test_first_layer_is_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = AdviceChain::new()
            .with(Trace { name: "outer", log: Arc::clone(&log) })
            .with(Trace { name: "inner", log: Arc::clone(&log) });
        assert_eq!(chain.len(), 2);

        let target_log = Arc::clone(&log);
        let call = Invocation::new("op", &[]);
        chain
            .invoke(
                &call,
                Box::pin(async move {
                    target_log.lock().unwrap().push("target".to_string());
                    Ok(Value::from(0))
                }),
            )
            .await
            .unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["enter outer", "enter inner", "target", "leave inner", "leave outer"]
        );
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = AdviceChain::new().with(Trace { name: "only", log: Arc::clone(&log) });
        let call = Invocation::new("op", &[]);

        let result = chain
            .invoke(&call, Box::pin(async { Err(CacheError::unavailable("down")) }))
            .await;

        assert!(result.unwrap_err().is_store_unavailable());
        assert_eq!(log.lock().unwrap().len(), 2);
    }
}
