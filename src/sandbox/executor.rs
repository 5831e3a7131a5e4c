//! Sandboxed execution of allowlisted plugin executables.

use super::{SandboxConfig, SandboxError};
use crate::plugin::domain::{LegacyAllowlist, LegacyPluginOutput};
use crate::plugin::ports::{LegacyExecutor, PluginExecutionError};
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::LazyLock;
use tokio::process::Command;

const SANDBOX_PATH: &str = "/usr/bin:/bin";

#[expect(
    clippy::expect_used,
    reason = "the pattern is a compile-time constant"
)]
static PLUGIN_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]+$").expect("constant regex pattern is valid"));

/// Runs allowlisted plugin executables under resource limits.
#[derive(Debug, Clone)]
pub struct PluginSandbox {
    config: SandboxConfig,
    allowlist: LegacyAllowlist,
}

impl PluginSandbox {
    /// Creates a sandbox with `config` and its own copy of the allowlist.
    #[must_use]
    pub fn new(config: SandboxConfig) -> Self {
        let allowlist = LegacyAllowlist::new(config.allowlist.iter().cloned());
        Self { config, allowlist }
    }

    /// Creates a sandbox that checks names against `allowlist` instead of
    /// the names in `config`.
    #[must_use]
    pub const fn with_shared_allowlist(config: SandboxConfig, allowlist: LegacyAllowlist) -> Self {
        Self { config, allowlist }
    }

    /// Returns the sandbox settings.
    #[must_use]
    pub const fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Validates and runs plugin `name` with `args`.
    ///
    /// # Errors
    ///
    /// Returns a [`SandboxError`] naming the first failed check, or
    /// [`SandboxError::TimedOut`] when the process outlives the timeout.
    pub async fn run(&self, name: &str, args: &[String]) -> Result<LegacyPluginOutput, SandboxError> {
        let executable = self.authorize(name, args).await?;
        let workdir = tempfile::tempdir()?;

        let mut command = Command::new(&executable);
        command
            .args(args)
            .current_dir(workdir.path())
            .env_clear()
            .env("PATH", SANDBOX_PATH)
            .env("HOME", workdir.path())
            .env("TMPDIR", workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        limits::apply(&mut command, self.config.limits);

        tracing::debug!(plugin = name, executable = %executable.display(), "spawning sandboxed plugin");
        let child = command.spawn()?;
        let Ok(waited) = tokio::time::timeout(self.config.timeout(), child.wait_with_output()).await
        else {
            tracing::warn!(plugin = name, timeout = ?self.config.timeout(), "sandboxed plugin timed out");
            return Err(SandboxError::TimedOut);
        };
        let output = waited?;

        let return_code = output.status.code().unwrap_or(-1);
        tracing::info!(plugin = name, return_code, "sandboxed plugin finished");
        Ok(LegacyPluginOutput::new(
            return_code,
            tail(&String::from_utf8_lossy(&output.stdout), self.config.output_tail),
            tail(&String::from_utf8_lossy(&output.stderr), self.config.output_tail),
        ))
    }

    async fn authorize(&self, name: &str, args: &[String]) -> Result<PathBuf, SandboxError> {
        if !self.config.enabled {
            return Err(SandboxError::Disabled);
        }
        if !self.allowlist.contains(name) {
            return Err(SandboxError::NotAllowlisted);
        }
        if !PLUGIN_NAME_PATTERN.is_match(name) {
            return Err(SandboxError::InvalidName);
        }

        let root = tokio::fs::canonicalize(self.config.plugins_root.as_std_path())
            .await
            .map_err(|_| SandboxError::NotFound)?;
        let executable = tokio::fs::canonicalize(root.join(name))
            .await
            .map_err(|_| SandboxError::NotFound)?;
        if executable == root || !executable.starts_with(&root) {
            return Err(SandboxError::PathEscape);
        }

        let metadata = tokio::fs::metadata(&executable)
            .await
            .map_err(|_| SandboxError::NotFound)?;
        if !metadata.is_file() {
            return Err(SandboxError::NotFound);
        }
        if !is_executable(&executable, &metadata) {
            return Err(SandboxError::NotExecutable);
        }
        if args.iter().any(|arg| arg.contains(['\n', '\r'])) {
            return Err(SandboxError::InvalidArguments);
        }
        Ok(executable)
    }
}

#[async_trait]
impl LegacyExecutor for PluginSandbox {
    async fn execute(
        &self,
        name: &str,
        args: &[String],
    ) -> Result<LegacyPluginOutput, PluginExecutionError> {
        Ok(self.run(name, args).await?)
    }
}

#[cfg(unix)]
fn is_executable(_path: &Path, metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(path: &Path, _metadata: &std::fs::Metadata) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
}

/// Returns the last `limit` characters of `text`.
fn tail(text: &str, limit: usize) -> String {
    let skip = text.chars().count().saturating_sub(limit);
    text.chars().skip(skip).collect()
}

#[cfg(unix)]
mod limits {
    use crate::sandbox::ResourceLimits;
    use nix::sys::resource::{Resource, setrlimit};
    use tokio::process::Command;

    pub(super) fn apply(command: &mut Command, limits: ResourceLimits) {
        // SAFETY: the closure runs in the forked child before exec and only
        // calls setrlimit, which is async-signal-safe.
        unsafe {
            command.pre_exec(move || {
                let table = [
                    (Resource::RLIMIT_CPU, limits.cpu_seconds),
                    (Resource::RLIMIT_AS, limits.address_space_bytes),
                    (Resource::RLIMIT_FSIZE, limits.file_size_bytes),
                    (Resource::RLIMIT_NOFILE, limits.open_files),
                    (Resource::RLIMIT_NPROC, limits.processes),
                ];
                for (resource, value) in table {
                    setrlimit(resource, value, value).map_err(std::io::Error::from)?;
                }
                Ok(())
            });
        }
    }
}
