//! Result of a legacy plugin process.

use crate::context::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Captured outcome of an out-of-process plugin run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPluginOutput {
    /// `ok` for a zero exit code, otherwise `error`.
    pub status: String,
    /// Process exit code; `-1` when terminated by a signal.
    pub return_code: i32,
    /// Tail of standard output.
    pub stdout: String,
    /// Tail of standard error.
    pub stderr: String,
}

impl LegacyPluginOutput {
    /// Builds the output for a finished process.
    #[must_use]
    pub fn new(return_code: i32, stdout: String, stderr: String) -> Self {
        let status = if return_code == 0 { "ok" } else { "error" };
        Self {
            status: status.to_owned(),
            return_code,
            stdout,
            stderr,
        }
    }

    /// Converts the output into a result payload.
    #[must_use]
    pub fn into_payload(self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("status".to_owned(), Value::String(self.status));
        payload.insert("return_code".to_owned(), Value::from(self.return_code));
        payload.insert("stdout".to_owned(), Value::String(self.stdout));
        payload.insert("stderr".to_owned(), Value::String(self.stderr));
        payload
    }
}
