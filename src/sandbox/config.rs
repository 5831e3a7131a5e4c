//! Sandbox settings.

use camino::Utf8PathBuf;
use std::collections::BTreeSet;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const MIN_TIMEOUT: Duration = Duration::from_secs(1);
const DEFAULT_OUTPUT_TAIL: usize = 4096;
const MIB: u64 = 1024 * 1024;

/// Resource limits applied to the plugin process before it executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLimits {
    /// CPU time, in seconds.
    pub cpu_seconds: u64,
    /// Address space, in bytes.
    pub address_space_bytes: u64,
    /// Largest file the process may write, in bytes.
    pub file_size_bytes: u64,
    /// Open file descriptors.
    pub open_files: u64,
    /// Processes for the user.
    pub processes: u64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            cpu_seconds: 2,
            address_space_bytes: 256 * MIB,
            file_size_bytes: 10 * MIB,
            open_files: 64,
            processes: 32,
        }
    }
}

/// Plugin sandbox settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxConfig {
    /// Whether any plugin may run at all.
    pub enabled: bool,
    /// Plugin names that may run.
    pub allowlist: BTreeSet<String>,
    /// Directory holding plugin executables.
    pub plugins_root: Utf8PathBuf,
    pub(super) timeout: Duration,
    /// Limits applied to the child process.
    pub limits: ResourceLimits,
    /// Number of trailing characters kept from each output stream.
    pub output_tail: usize,
}

impl SandboxConfig {
    /// Enables or disables the sandbox.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Replaces the allowlist.
    #[must_use]
    pub fn with_allowlist<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowlist = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the directory holding plugin executables.
    #[must_use]
    pub fn with_plugins_root(mut self, plugins_root: impl Into<Utf8PathBuf>) -> Self {
        self.plugins_root = plugins_root.into();
        self
    }

    /// Returns the wall-clock timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sets the wall-clock timeout, raised to at least one second.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.max(MIN_TIMEOUT);
        self
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowlist: BTreeSet::new(),
            plugins_root: Utf8PathBuf::from("/app/plugins"),
            timeout: DEFAULT_TIMEOUT,
            limits: ResourceLimits::default(),
            output_tail: DEFAULT_OUTPUT_TAIL,
        }
    }
}
