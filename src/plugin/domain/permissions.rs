//! Well-known capability tokens. Manifests may also carry arbitrary tokens.

/// Run the plugin at all. Granted by default.
pub const EXECUTE: &str = "plugin:execute";
/// Read repository contents.
pub const READ_REPO: &str = "repo:read";
/// Modify repository contents.
pub const WRITE_REPO: &str = "repo:write";
/// Trigger workflows.
pub const WORKFLOW_RUN: &str = "workflow:run";
/// Publish events on the bus.
pub const EVENT_PUBLISH: &str = "event:publish";
