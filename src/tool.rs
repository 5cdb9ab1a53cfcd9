//! External patch tools
//!
//! hieronymus stores either unified diffs (made with `diff -u`) or binary
//! deltas (made with `xdelta3 -e`), depending on how it was compiled. The
//! matching program is run here as a blocking subprocess, and its exit
//! status is checked.

use crate::error::{HadminError, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Program used to apply a patch to a snapshot baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchTool {
    /// GNU `patch`, for textual unified diffs
    #[default]
    Patch,
    /// `xdelta3`, for binary deltas
    Xdelta,
}

impl PatchTool {
    /// Pick the tool from the `--xdelta` switch
    pub fn from_xdelta_flag(xdelta: bool) -> Self {
        if xdelta {
            PatchTool::Xdelta
        } else {
            PatchTool::Patch
        }
    }

    /// Program name looked up on PATH when nothing overrides it
    pub fn default_program(self) -> &'static str {
        match self {
            PatchTool::Patch => "patch",
            PatchTool::Xdelta => "xdelta3",
        }
    }

    /// Environment variable that overrides the program
    pub fn env_var(self) -> &'static str {
        match self {
            PatchTool::Patch => "HADMIN_PATCH",
            PatchTool::Xdelta => "HADMIN_XDELTA",
        }
    }

    /// Program from the environment, falling back to the default name
    pub fn program_from_env(self) -> String {
        std::env::var(self.env_var())
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| self.default_program().to_string())
    }
}

impl fmt::Display for PatchTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_program())
    }
}

/// A fully built patch invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchCommand {
    /// Program to run
    pub program: String,
    /// Arguments in order
    pub args: Vec<String>,
}

/// What the patch tool reported after a successful run
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Wall-clock time the tool took, in milliseconds
    pub duration_ms: u64,
}

impl PatchCommand {
    /// Build the invocation that reconstructs `target`
    ///
    /// - xdelta: `xdelta3 -f -d -s <baseline> <patch> <target>`
    /// - patch: `patch -o <target> <baseline> <patch>`
    pub fn build(
        tool: PatchTool,
        program: impl Into<String>,
        baseline: &Path,
        patch: &Path,
        target: &str,
    ) -> Self {
        let baseline = baseline.display().to_string();
        let patch = patch.display().to_string();
        let target = target.to_string();

        let args = match tool {
            PatchTool::Xdelta => vec![
                "-f".to_string(),
                "-d".to_string(),
                "-s".to_string(),
                baseline,
                patch,
                target,
            ],
            PatchTool::Patch => vec!["-o".to_string(), target, baseline, patch],
        };

        Self {
            program: program.into(),
            args,
        }
    }

    /// Run the command and wait for it to finish
    ///
    /// # Errors
    ///
    /// - [`HadminError::ToolUnavailable`] if the program cannot be started
    /// - [`HadminError::ExternalTool`] if it exits unsuccessfully
    pub fn run(&self) -> Result<ToolOutput> {
        debug!("Running {}", self);
        let start = Instant::now();

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| HadminError::ToolUnavailable {
                program: self.program.clone(),
                source,
            })?;

        let duration = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            warn!("{} exited with {}", self.program, output.status);
            return Err(HadminError::ExternalTool {
                program: self.program.clone(),
                status: output.status,
                stderr,
            });
        }

        Ok(ToolOutput {
            exit_code: output.status.code(),
            stdout,
            stderr,
            duration_ms: duration_millis(duration),
        })
    }
}

impl fmt::Display for PatchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
