//! Extension point catalog entries.

use serde::{Deserialize, Serialize};

/// Fired before a plugin runs.
pub const PLUGIN_PRE_EXECUTE: &str = "plugin.pre_execute";
/// Fired after a plugin ran successfully.
pub const PLUGIN_POST_EXECUTE: &str = "plugin.post_execute";
/// Fired before each workflow step.
pub const WORKFLOW_BEFORE_STEP: &str = "workflow.before_step";
/// Fired after each workflow step.
pub const WORKFLOW_AFTER_STEP: &str = "workflow.after_step";

/// Extension points declared by every framework instance.
pub const BUILTIN_EXTENSION_POINTS: [(&str, &str); 4] = [
    (PLUGIN_PRE_EXECUTE, "Runs before plugin execution."),
    (PLUGIN_POST_EXECUTE, "Runs after plugin execution."),
    (WORKFLOW_BEFORE_STEP, "Runs before workflow step execution."),
    (WORKFLOW_AFTER_STEP, "Runs after workflow step execution."),
];

/// A named hook site with a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionPoint {
    /// Dotted name, for example `plugin.pre_execute`.
    pub name: String,
    /// What the point is for.
    pub description: String,
}
