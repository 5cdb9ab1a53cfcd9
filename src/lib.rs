//! # hadmin - Point-in-time restore for hieronymus
//!
//! hieronymus is a versioning filesystem. Next to every directory it keeps a
//! `.version` directory with periodic full snapshots of each file and
//! timestamped patches recorded between them. This crate reads that layout
//! and rebuilds a file as it was closest to a requested moment.
//!
//! ## Overview
//!
//! A restore goes through these steps:
//! - Parse the requested `dd-mm-YYYY` date and `hh.mm.ss` time into epoch
//!   seconds (local time)
//! - Find the `.version` directory next to the file
//! - Pick the snapshot directory whose name is numerically nearest
//! - Pick the patch for the file inside that snapshot whose embedded
//!   timestamp is nearest
//! - Apply the patch to the snapshot's baseline copy with `patch` or
//!   `xdelta3`, writing the result over the file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hadmin::{PatchTool, RestoreConfig, Restorer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RestoreConfig::builder("notes/todo.txt")
//!     .date("14-01-2011")
//!     .time("13.45.00")
//!     .tool(PatchTool::Xdelta)
//!     .build()?;
//!
//! let restorer = Restorer::new(config);
//! let plan = restorer.plan()?;
//! println!("Would run: {}", plan.command);
//!
//! restorer.apply(plan)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, HadminError>`. A missing file or
//! versioning directory, an empty snapshot and a failing patch tool are all
//! errors; none of them is silently ignored.
//!
//! ## Module Organization
//!
//! - [`timestamp`]: date/time parsing
//! - [`path`]: path splitting and `.version` lookup
//! - [`patch`]: patch filename parsing
//! - [`resolver`]: nearest-match selection
//! - [`version_store`]: reading snapshot and patch listings
//! - [`tool`]: building and running the external patch tool
//! - [`restore`]: the restore orchestration and its configuration
//! - [`error`]: error types

pub mod error;
pub mod patch;
pub mod path;
pub mod resolver;
pub mod restore;
pub mod timestamp;
pub mod tool;
pub mod version_store;

// Re-export main types for convenience
pub use error::{HadminError, Result};
pub use resolver::{nearest, Candidate};
pub use restore::{RestoreConfig, RestoreConfigBuilder, RestoreOutcome, RestorePlan, Restorer};
pub use tool::{PatchCommand, PatchTool, ToolOutput};
pub use version_store::VersionStore;
