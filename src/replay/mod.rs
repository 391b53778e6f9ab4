//! Replay of recorded call history.
//!
//! Reads the `{operation}:inputs` and `{operation}:outputs` lists written by
//! [`RecordHistory`](crate::advice::RecordHistory) and renders one line per
//! call:
//!
//! ```text
//! Cache.store was called 2 times:
//! Cache.store(*('foo',)) -> 1f0c…
//! Cache.store(*(123,)) -> 9b2e…
//! ```
//!
//! Replay never writes to the store.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use tracing::warn;

use crate::advice::{decode_args, decode_output, inputs_key, outputs_key};
use crate::cache::render_args;
use crate::error::{CacheError, Result};
use crate::storage::KeyValueStore;

/// One replayed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayEntry {
    /// Rendered argument tuple, e.g. `('foo',)`.
    pub args: String,
    /// Rendered result.
    pub output: String,
}

/// Everything replay knows about one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub operation: String,
    /// Number of recorded inputs, i.e. calls attempted.
    pub call_count: usize,
    /// Calls with both an input and an output, in call order.
    pub entries: Vec<ReplayEntry>,
    /// Inputs with no matching output (the call failed after logging).
    ///
    /// Pairing is positional, so when a call in the middle failed, every later
    /// entry shows the arguments of one call next to the output of the next.
    pub unmatched_inputs: usize,
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.operation, self.call_count)?;
        for entry in &self.entries {
            writeln!(f, "{}(*{}) -> {}", self.operation, entry.args, entry.output)?;
        }
        Ok(())
    }
}

/// Reads call history from a store and prints it.
#[derive(Clone)]
pub struct ReplayReporter {
    store: Arc<dyn KeyValueStore>,
}

impl ReplayReporter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Build the report for `operation`.
    ///
    /// Lists of unequal length are truncated to the shorter one. Entries that
    /// do not decode are shown as their raw text instead of failing the replay.
    pub async fn report(&self, operation: &str) -> Result<ReplayReport> {
        let inputs = self.store.range(&inputs_key(operation), 0, -1).await?;
        let outputs = self.store.range(&outputs_key(operation), 0, -1).await?;

        if inputs.len() != outputs.len() {
            warn!(
                operation = %operation,
                inputs = inputs.len(),
                outputs = outputs.len(),
                "Call history lists differ in length; replaying matched calls only"
            );
        }

        let entries = inputs
            .iter()
            .zip(outputs.iter())
            .map(|(input, output)| ReplayEntry {
                args: render_input(input),
                output: render_output(output),
            })
            .collect::<Vec<_>>();

        Ok(ReplayReport {
            operation: operation.to_string(),
            call_count: inputs.len(),
            unmatched_inputs: inputs.len().saturating_sub(entries.len()),
            entries,
        })
    }

    /// Write the replay of `operation` to `out`.
    pub async fn replay_to<W: Write>(&self, operation: &str, out: &mut W) -> Result<ReplayReport> {
        let report = self.report(operation).await?;
        write!(out, "{}", report).map_err(write_failed)?;
        Ok(report)
    }

    /// Print the replay of `operation` to stdout.
    pub async fn replay(&self, operation: &str) -> Result<ReplayReport> {
        let report = self.report(operation).await?;
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", report).map_err(write_failed)?;
        Ok(report)
    }
}

fn write_failed(err: io::Error) -> CacheError {
    CacheError::Internal(format!("failed to write replay: {err}"))
}

fn render_input(entry: &[u8]) -> String {
    match decode_args(entry) {
        Ok(args) => render_args(&args),
        Err(_) => String::from_utf8_lossy(entry).into_owned(),
    }
}

fn render_output(entry: &[u8]) -> String {
    match decode_output(entry) {
        Ok(value) => value.to_string(),
        Err(_) => String::from_utf8_lossy(entry).into_owned(),
    }
}
