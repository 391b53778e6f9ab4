//! Call-counting advice.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Advice, Invocation, Next};
use crate::cache::Value;
use crate::error::Result;
use crate::storage::KeyValueStore;

/// Increments a counter named after the operation before every call.
///
/// The counter key is the qualified operation name itself, so all caches
/// sharing a store share the count. The increment happens before the wrapped
/// call runs and is never rolled back; a failed call still counts as an
/// attempt. If the increment itself fails, the wrapped call does not run.
pub struct CountCalls {
    store: Arc<dyn KeyValueStore>,
}

impl CountCalls {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Advice for CountCalls {
    async fn around<'a>(&'a self, call: &'a Invocation<'a>, next: Next<'a>) -> Result<Value> {
        self.store.incr(call.operation()).await?;
        next.run(call).await
    }
}
