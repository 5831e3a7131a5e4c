//! Process-wide orchestration settings.
//!
//! [`OrchestratorConfig::from_env`] reads the environment variables below.
//! Values that are missing or do not parse fall back to the defaults; every
//! component still applies its own floor.
//!
//! | Variable | Default | Floor |
//! |---|---|---|
//! | `JOB_QUEUE_POLL_SECONDS` | 1 | 200 ms |
//! | `JOB_RETRY_BASE_SECONDS` | 2 | 1 s |
//! | `EVENT_BUS_MAX_EVENTS` | 1000 | 100 |
//! | `PLUGIN_ROOT` | `/app/plugins` | |
//! | `PLUGIN_ALLOWLIST` | empty | |
//! | `PLUGIN_SANDBOX_ENABLED` | false | |
//! | `PLUGIN_TIMEOUT_SECONDS` | 5 | 1 s |

use crate::event_bus::{DEFAULT_MAX_EVENTS, EventBusConfig};
use crate::job_queue::services::JobQueueConfig;
use crate::plugin::services::PluginFrameworkConfig;
use crate::sandbox::SandboxConfig;
use camino::Utf8PathBuf;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::time::Duration;

/// Smallest event history accepted from the environment.
pub const MIN_ENV_MAX_EVENTS: usize = 100;

const DEFAULT_PLUGINS_ROOT: &str = "/app/plugins";
const DEFAULT_POLL_SECONDS: u64 = 1;
const DEFAULT_RETRY_BASE_SECONDS: u64 = 2;
const DEFAULT_PLUGIN_TIMEOUT_SECONDS: u64 = 5;

/// Settings for every component wired by [`crate::platform::Platform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Queue timing.
    pub job_queue: JobQueueConfig,
    /// Event history size.
    pub event_bus: EventBusConfig,
    /// Legacy plugin sandbox.
    pub sandbox: SandboxConfig,
    /// Directory holding plugin executables and manifests.
    pub plugins_root: Utf8PathBuf,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        let plugins_root = Utf8PathBuf::from(DEFAULT_PLUGINS_ROOT);
        Self {
            job_queue: JobQueueConfig::default(),
            event_bus: EventBusConfig::default(),
            sandbox: SandboxConfig::default().with_plugins_root(plugins_root.clone()),
            plugins_root,
        }
    }
}

impl OrchestratorConfig {
    /// Reads settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its
    /// value.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |key: &str, default: u64| parse_or(lookup(key).as_deref(), default);

        let job_queue = JobQueueConfig::new(
            Duration::from_secs(number("JOB_QUEUE_POLL_SECONDS", DEFAULT_POLL_SECONDS)),
            Duration::from_secs(number("JOB_RETRY_BASE_SECONDS", DEFAULT_RETRY_BASE_SECONDS)),
        );
        let max_events = parse_or(lookup("EVENT_BUS_MAX_EVENTS").as_deref(), DEFAULT_MAX_EVENTS)
            .max(MIN_ENV_MAX_EVENTS);
        let plugins_root = lookup("PLUGIN_ROOT")
            .filter(|root| !root.trim().is_empty())
            .map_or_else(|| Utf8PathBuf::from(DEFAULT_PLUGINS_ROOT), Utf8PathBuf::from);
        let sandbox = SandboxConfig::default()
            .with_enabled(lookup("PLUGIN_SANDBOX_ENABLED").is_some_and(|raw| parse_flag(&raw)))
            .with_allowlist(parse_list(
                lookup("PLUGIN_ALLOWLIST").as_deref().unwrap_or_default(),
            ))
            .with_plugins_root(plugins_root.clone())
            .with_timeout(Duration::from_secs(number(
                "PLUGIN_TIMEOUT_SECONDS",
                DEFAULT_PLUGIN_TIMEOUT_SECONDS,
            )));

        Self {
            job_queue,
            event_bus: EventBusConfig { max_events },
            sandbox,
            plugins_root,
        }
    }

    /// Returns the plugin framework settings implied by this config.
    #[must_use]
    pub fn plugin_framework(&self) -> PluginFrameworkConfig {
        PluginFrameworkConfig {
            plugins_root: self.plugins_root.clone(),
            legacy_allowlist: self.sandbox.allowlist.clone(),
        }
    }
}

fn parse_or<T: FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
