//! Restoring a file to a point in time
//!
//! A restore runs in two steps. [`Restorer::plan`] resolves everything on
//! disk: the target timestamp, the snapshot nearest to it, the baseline copy
//! inside that snapshot, the nearest patch and the command that applies it.
//! [`Restorer::restore`] then runs that command unless the configuration
//! asks for a dry run.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hadmin::{PatchTool, RestoreConfig, Restorer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RestoreConfig::builder("notes/todo.txt")
//!     .date("14-01-2011")
//!     .time("13.45.00")
//!     .tool(PatchTool::Patch)
//!     .build()?;
//!
//! let outcome = Restorer::new(config).restore()?;
//! println!("Applied {}", outcome.plan.patch.name);
//! # Ok(())
//! # }
//! ```

use crate::error::{HadminError, Result};
use crate::path::{split_path, versioning_dir};
use crate::resolver::Candidate;
use crate::timestamp::parse_target;
use crate::tool::{PatchCommand, PatchTool, ToolOutput};
use crate::version_store::VersionStore;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Default target date, the start of the epoch
pub const DEFAULT_DATE: &str = "01-01-1970";
/// Default target time
pub const DEFAULT_TIME: &str = "00.00.00";

/// Everything a restore needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreConfig {
    /// File to restore, `/`-delimited
    pub path: String,
    /// Target date in `dd-mm-YYYY`
    pub date: String,
    /// Target time in `hh.mm.ss`
    pub time: String,
    /// Which patch tool to apply
    pub tool: PatchTool,
    /// Program to run instead of the tool's default
    pub program: Option<String>,
    /// Resolve and report, but do not run the tool
    pub dry_run: bool,
}

impl RestoreConfig {
    /// Start building a configuration for `path`
    pub fn builder(path: impl Into<String>) -> RestoreConfigBuilder {
        RestoreConfigBuilder::new(path)
    }

    /// Program that will be run
    ///
    /// An explicit override wins, then the tool's environment variable, then
    /// the tool's default name.
    pub fn program(&self) -> String {
        self.program
            .clone()
            .unwrap_or_else(|| self.tool.program_from_env())
    }
}

/// Builder for [`RestoreConfig`]
#[derive(Debug, Clone)]
pub struct RestoreConfigBuilder {
    path: String,
    date: String,
    time: String,
    tool: PatchTool,
    program: Option<String>,
    dry_run: bool,
}

impl RestoreConfigBuilder {
    /// Create a builder with the default date, time and tool
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            date: DEFAULT_DATE.to_string(),
            time: DEFAULT_TIME.to_string(),
            tool: PatchTool::default(),
            program: None,
            dry_run: false,
        }
    }

    /// Set the target date (`dd-mm-YYYY`)
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Set the target time (`hh.mm.ss`)
    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    /// Set the patch tool
    pub fn tool(mut self, tool: PatchTool) -> Self {
        self.tool = tool;
        self
    }

    /// Run `program` instead of the tool's default
    pub fn program(mut self, program: Option<String>) -> Self {
        self.program = program;
        self
    }

    /// Only resolve the restore, do not apply it
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// - [`HadminError::InvalidConfiguration`] if the path is empty or names
    ///   a directory (ends in `/`), or the program override is blank
    pub fn build(self) -> Result<RestoreConfig> {
        let (_, filename) = split_path(&self.path);
        if filename.is_empty() {
            return Err(HadminError::InvalidConfiguration(format!(
                "{:?} does not name a file",
                self.path
            )));
        }
        if matches!(&self.program, Some(p) if p.trim().is_empty()) {
            return Err(HadminError::InvalidConfiguration(
                "program override is empty".to_string(),
            ));
        }

        Ok(RestoreConfig {
            path: self.path,
            date: self.date,
            time: self.time,
            tool: self.tool,
            program: self.program,
            dry_run: self.dry_run,
        })
    }
}

/// A fully resolved restore, ready to run
#[derive(Debug, Clone, Serialize)]
pub struct RestorePlan {
    /// File being restored
    pub target: String,
    /// Requested point in time, epoch seconds
    pub target_timestamp: i64,
    /// The `.version` directory that was searched
    pub versioning_dir: PathBuf,
    /// Snapshot nearest to the target
    pub snapshot: Candidate,
    /// Baseline copy inside the snapshot
    pub baseline: PathBuf,
    /// Patch nearest to the target
    pub patch: Candidate,
    /// Full path of the patch
    pub patch_path: PathBuf,
    /// Invocation that applies the patch
    pub command: PatchCommand,
}

/// Result of [`Restorer::restore`]
#[derive(Debug, Clone, Serialize)]
pub struct RestoreOutcome {
    /// What was resolved
    pub plan: RestorePlan,
    /// Tool output, `None` for a dry run
    pub output: Option<ToolOutput>,
}

impl RestoreOutcome {
    /// Whether the patch tool actually ran
    pub fn applied(&self) -> bool {
        self.output.is_some()
    }
}

/// Restores a single file from its `.version` directory
#[derive(Debug, Clone)]
pub struct Restorer {
    config: RestoreConfig,
}

impl Restorer {
    /// Create a restorer for `config`
    pub fn new(config: RestoreConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &RestoreConfig {
        &self.config
    }

    /// Resolve the restore against the configured date and time
    ///
    /// # Errors
    ///
    /// - [`HadminError::Parse`] for a bad date or time
    /// - [`HadminError::MissingPath`] if the target or its versioning
    ///   directory does not exist
    /// - [`HadminError::EmptySet`] if no snapshot holds a copy of the file, or
    ///   the chosen snapshot has no patch for it
    pub fn plan(&self) -> Result<RestorePlan> {
        let target = parse_target(&self.config.date, &self.config.time)?;
        self.plan_at(target)
    }

    /// Resolve the restore against an explicit epoch timestamp
    ///
    /// Only snapshots holding a baseline copy of the file are considered, so
    /// a newer snapshot made while the file was untouched is passed over.
    #[instrument(skip(self), fields(path = %self.config.path))]
    pub fn plan_at(&self, target_timestamp: i64) -> Result<RestorePlan> {
        let path = self.config.path.as_str();
        let (_, filename) = split_path(path);

        if !Path::new(path).exists() {
            return Err(HadminError::MissingPath(PathBuf::from(path)));
        }
        let store = VersionStore::open(versioning_dir(path))?;

        let snapshot = store.nearest_snapshot(&filename, target_timestamp)?;
        let baseline = snapshot.path.join(&filename);
        let patch = store.nearest_patch(&snapshot, &filename, target_timestamp)?;

        let command = PatchCommand::build(
            self.config.tool,
            self.config.program(),
            &baseline,
            &patch.path,
            path,
        );
        debug!("Restore command: {}", command);

        Ok(RestorePlan {
            target: path.to_string(),
            target_timestamp,
            versioning_dir: store.root().to_path_buf(),
            snapshot: snapshot.candidate,
            baseline,
            patch: patch.candidate,
            patch_path: patch.path,
            command,
        })
    }

    /// Resolve and apply the restore
    pub fn restore(&self) -> Result<RestoreOutcome> {
        let plan = self.plan()?;
        self.apply(plan)
    }

    /// Apply an already resolved plan, honoring dry-run
    pub fn apply(&self, plan: RestorePlan) -> Result<RestoreOutcome> {
        if self.config.dry_run {
            debug!("Dry run, not running {}", plan.command.program);
            return Ok(RestoreOutcome { plan, output: None });
        }

        let output = plan.command.run()?;
        info!(
            "Restored {} from snapshot {} with {}",
            plan.target, plan.snapshot.name, plan.patch.name
        );
        Ok(RestoreOutcome {
            plan,
            output: Some(output),
        })
    }
}
