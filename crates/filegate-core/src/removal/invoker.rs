//! Two-tier file removal: external tool first, filesystem fallback
//!
//! The external tool's bookkeeping is best-effort. A working tree must still
//! end up with the file physically gone even when the tool's metadata update
//! failed, so the fallback guarantees the primary observable effect.

use crate::error::RemovalError;
use crate::types::RemovalToolConfig;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Which tier physically removed the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalTier {
    /// The external tool recorded and performed the removal
    Primary,
    /// The tool failed; the file was deleted directly
    Fallback,
}

/// Outcome of one removal attempt
#[derive(Debug)]
pub enum RemovalReport {
    Removed { tier: RemovalTier },
    Failed { error: RemovalError },
    Cancelled,
}

impl RemovalReport {
    pub fn removed(&self) -> bool {
        matches!(self, RemovalReport::Removed { .. })
    }
}

/// Invokes the external removal tool, falling back to direct deletion
pub struct RemovalInvoker {
    tool: RemovalToolConfig,
}

impl RemovalInvoker {
    pub fn new(tool: RemovalToolConfig) -> Self {
        Self { tool }
    }

    /// Remove `filename` inside `working_dir`.
    ///
    /// The primary path runs the tool's `rm -f` subcommand with the optional
    /// ephemeral config. On any primary failure the file is deleted
    /// directly. Cancellation kills the subprocess and skips the fallback:
    /// the caller is abandoning the batch, not asking for best effort.
    pub async fn remove(
        &self,
        cancel: &CancellationToken,
        config_path: Option<&Path>,
        working_dir: &Path,
        filename: &str,
    ) -> RemovalReport {
        match self.run_tool(cancel, config_path, working_dir, filename).await {
            Ok(()) => {
                info!("Removal tool removed {:?}", working_dir.join(filename));
                RemovalReport::Removed {
                    tier: RemovalTier::Primary,
                }
            }
            Err(RemovalError::Cancelled) => RemovalReport::Cancelled,
            Err(err) => {
                warn!(
                    "Removal tool failed for {}, trying local delete: {}",
                    filename, err
                );

                let target = working_dir.join(filename);
                match tokio::fs::remove_file(&target).await {
                    Ok(()) => {
                        info!("Deleted {:?} directly", target);
                        RemovalReport::Removed {
                            tier: RemovalTier::Fallback,
                        }
                    }
                    Err(e) => {
                        warn!("Failed to delete {:?}: {}", target, e);
                        RemovalReport::Failed {
                            error: RemovalError::FallbackFailed {
                                path: target.to_string_lossy().to_string(),
                                reason: e.to_string(),
                            },
                        }
                    }
                }
            }
        }
    }

    async fn run_tool(
        &self,
        cancel: &CancellationToken,
        config_path: Option<&Path>,
        working_dir: &Path,
        filename: &str,
    ) -> Result<(), RemovalError> {
        let mut cmd = Command::new(&self.tool.program);
        if let Some(path) = config_path {
            cmd.arg("--config").arg(path);
        }
        cmd.arg("rm").arg("-f").arg(filename);
        cmd.current_dir(working_dir);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // Dropping the wait future (cancellation, timeout) must not leave
        // the subprocess running.
        cmd.kill_on_drop(true);

        debug!(
            "Invoking {} rm -f {} (cwd: {:?})",
            self.tool.program, filename, working_dir
        );

        let child = cmd.spawn().map_err(|e| RemovalError::SpawnFailed {
            program: self.tool.program.clone(),
            reason: e.to_string(),
        })?;

        let output = tokio::select! {
            _ = cancel.cancelled() => return Err(RemovalError::Cancelled),
            result = tokio::time::timeout(self.tool.timeout(), child.wait_with_output()) => {
                match result {
                    Ok(Ok(output)) => output,
                    Ok(Err(e)) => {
                        return Err(RemovalError::SpawnFailed {
                            program: self.tool.program.clone(),
                            reason: e.to_string(),
                        })
                    }
                    Err(_) => return Err(RemovalError::TimedOut(self.tool.timeout())),
                }
            }
        };

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(RemovalError::ToolFailed {
                status: output.status.to_string(),
                output: combined.trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn invoker(program: impl Into<String>) -> RemovalInvoker {
        RemovalInvoker::new(RemovalToolConfig {
            program: program.into(),
            timeout_secs: 5,
        })
    }

    /// Install a fake removal tool into `dir` and return its path.
    #[cfg(unix)]
    fn fake_tool(dir: &Path, name: &str, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let tools = tempdir().unwrap();
        let work = tempdir().unwrap();
        std::fs::write(work.path().join("drop.tar.gz"), "x").unwrap();

        // A faithful tool: deletes the named file and exits zero. The last
        // argument is the filename.
        let tool = fake_tool(
            tools.path(),
            "fake-vcs",
            "#!/bin/sh\nfor arg in \"$@\"; do name=\"$arg\"; done\nrm -- \"$name\"\n",
        );

        let cancel = CancellationToken::new();
        let report = invoker(tool.to_string_lossy())
            .remove(&cancel, None, work.path(), "drop.tar.gz")
            .await;

        assert!(matches!(
            report,
            RemovalReport::Removed {
                tier: RemovalTier::Primary
            }
        ));
        assert!(!work.path().join("drop.tar.gz").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn primary_failure_falls_back_to_direct_delete() {
        let tools = tempdir().unwrap();
        let work = tempdir().unwrap();
        std::fs::write(work.path().join("drop.tar.gz"), "x").unwrap();

        let tool = fake_tool(
            tools.path(),
            "broken-vcs",
            "#!/bin/sh\necho 'server unreachable' >&2\nexit 1\n",
        );

        let cancel = CancellationToken::new();
        let report = invoker(tool.to_string_lossy())
            .remove(&cancel, None, work.path(), "drop.tar.gz")
            .await;

        assert!(matches!(
            report,
            RemovalReport::Removed {
                tier: RemovalTier::Fallback
            }
        ));
        assert!(!work.path().join("drop.tar.gz").exists());
    }

    #[tokio::test]
    async fn missing_tool_and_missing_file_reports_failure() {
        let work = tempdir().unwrap();

        let cancel = CancellationToken::new();
        let report = invoker("definitely-not-a-real-binary-4913")
            .remove(&cancel, None, work.path(), "ghost.txt")
            .await;

        assert!(!report.removed());
        assert!(matches!(
            report,
            RemovalReport::Failed {
                error: RemovalError::FallbackFailed { .. }
            }
        ));
    }

    #[tokio::test]
    async fn missing_tool_still_deletes_existing_file() {
        let work = tempdir().unwrap();
        std::fs::write(work.path().join("orphan.txt"), "x").unwrap();

        let cancel = CancellationToken::new();
        let report = invoker("definitely-not-a-real-binary-4913")
            .remove(&cancel, None, work.path(), "orphan.txt")
            .await;

        assert!(matches!(
            report,
            RemovalReport::Removed {
                tier: RemovalTier::Fallback
            }
        ));
        assert!(!work.path().join("orphan.txt").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn cancellation_kills_the_tool_and_skips_fallback() {
        let tools = tempdir().unwrap();
        let work = tempdir().unwrap();
        std::fs::write(work.path().join("slow.txt"), "x").unwrap();

        let tool = fake_tool(tools.path(), "hung-vcs", "#!/bin/sh\nsleep 30\n");

        let cancel = CancellationToken::new();
        let invoker = invoker(tool.to_string_lossy());

        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            cancel_clone.cancel();
        });

        let report = invoker
            .remove(&cancel, None, work.path(), "slow.txt")
            .await;

        assert!(matches!(report, RemovalReport::Cancelled));
        // Cancellation abandons the batch; the file in flight is untouched.
        assert!(work.path().join("slow.txt").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn hung_tool_times_out_and_falls_back() {
        let tools = tempdir().unwrap();
        let work = tempdir().unwrap();
        std::fs::write(work.path().join("stuck.txt"), "x").unwrap();

        let tool = fake_tool(tools.path(), "hung-vcs", "#!/bin/sh\nsleep 30\n");

        let invoker = RemovalInvoker::new(RemovalToolConfig {
            program: tool.to_string_lossy().to_string(),
            timeout_secs: 1,
        });

        let cancel = CancellationToken::new();
        let report = invoker
            .remove(&cancel, None, work.path(), "stuck.txt")
            .await;

        assert!(matches!(
            report,
            RemovalReport::Removed {
                tier: RemovalTier::Fallback
            }
        ));
        assert!(!work.path().join("stuck.txt").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn config_path_is_passed_to_the_tool() {
        let tools = tempdir().unwrap();
        let work = tempdir().unwrap();
        std::fs::write(work.path().join("target.txt"), "x").unwrap();

        // Records its arguments, succeeds without deleting.
        let tool = fake_tool(
            tools.path(),
            "recording-vcs",
            "#!/bin/sh\necho \"$@\" > \"$RECORD_FILE\"\n",
        );
        let record = tools.path().join("args.txt");

        let mut cmd_tool = RemovalToolConfig::default();
        cmd_tool.program = tool.to_string_lossy().to_string();
        // Route the record file through the environment the test controls.
        std::env::set_var("RECORD_FILE", &record);

        let config = tools.path().join("tool.cfg");
        std::fs::write(&config, "[general]\n").unwrap();

        let cancel = CancellationToken::new();
        let report = RemovalInvoker::new(cmd_tool)
            .remove(&cancel, Some(&config), work.path(), "target.txt")
            .await;

        assert!(report.removed());
        let recorded = std::fs::read_to_string(&record).unwrap();
        assert!(recorded.contains("--config"));
        assert!(recorded.contains("rm -f target.txt"));
    }
}
