//! Call-history advice and the history entry encoding.
//!
//! Each advised operation owns two lists in the store:
//!
//! | Key | Entry |
//! |-----|-------|
//! | `{operation}:inputs` | JSON array of tagged values, one per positional arg |
//! | `{operation}:outputs` | JSON tagged value returned by the call |
//!
//! Entries are plain JSON so that replay can rebuild the arguments without
//! interpreting logged text as code.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Advice, Invocation, Next};
use crate::cache::Value;
use crate::error::Result;
use crate::storage::KeyValueStore;

/// List key holding the inputs of `operation`.
pub fn inputs_key(operation: &str) -> String {
    format!("{}:inputs", operation)
}

/// List key holding the outputs of `operation`.
pub fn outputs_key(operation: &str) -> String {
    format!("{}:outputs", operation)
}

pub fn encode_args(args: &[Value]) -> Result<String> {
    Ok(serde_json::to_string(args)?)
}

pub fn decode_args(entry: &[u8]) -> Result<Vec<Value>> {
    Ok(serde_json::from_slice(entry)?)
}

pub fn encode_output(output: &Value) -> Result<String> {
    Ok(serde_json::to_string(output)?)
}

pub fn decode_output(entry: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(entry)?)
}

/// Records the inputs and output of every call.
///
/// Inputs are appended before the wrapped call runs; the output is appended
/// only when it succeeds. A failing call therefore leaves one more input than
/// outputs, and nothing repairs that afterwards.
pub struct RecordHistory {
    store: Arc<dyn KeyValueStore>,
}

impl RecordHistory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Advice for RecordHistory {
    async fn around<'a>(&'a self, call: &'a Invocation<'a>, next: Next<'a>) -> Result<Value> {
        let operation = call.operation();

        let inputs = encode_args(call.args())?;
        self.store.append(&inputs_key(operation), &inputs).await?;

        let output = next.run(call).await?;

        let encoded = encode_output(&output)?;
        self.store.append(&outputs_key(operation), &encoded).await?;

        Ok(output)
    }
}
