//! Read access to a `.version` directory
//!
//! hieronymus keeps one `.version` directory per versioned directory. Each
//! snapshot is a subdirectory named by its creation time in epoch seconds
//! and holds a baseline copy of every file written during that snapshot,
//! plus `<file>-<epoch>.patch` files with the later changes:
//!
//! ```text
//! notes/.version/
//! ├── 1295000000/
//! │   ├── todo.txt
//! │   ├── todo.txt-1295003600.patch
//! │   └── todo.txt-1295007200.patch
//! ├── 1295100000/
//! │   └── ...
//! └── __DIR__old__1295050000/     (removed directory, not a snapshot)
//! ```
//!
//! This module never writes to the layout.

use crate::error::{HadminError, Result};
use crate::patch::owned_patch_timestamp;
use crate::resolver::{nearest, Candidate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// A `.version` directory on disk
#[derive(Debug, Clone)]
pub struct VersionStore {
    root: PathBuf,
}

/// A resolved snapshot directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Directory name and the timestamp it encodes
    pub candidate: Candidate,
    /// Full path of the snapshot directory
    pub path: PathBuf,
}

/// A resolved patch file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Filename and the timestamp embedded in it
    pub candidate: Candidate,
    /// Full path of the patch file
    pub path: PathBuf,
}

impl VersionStore {
    /// Open an existing versioning directory
    ///
    /// # Errors
    ///
    /// - [`HadminError::MissingPath`] if `root` is not a directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(HadminError::MissingPath(root));
        }
        Ok(Self { root })
    }

    /// Path of the versioning directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List every snapshot directory
    ///
    /// Entries whose name is not a non-negative integer are not snapshots and
    /// are skipped.
    pub fn snapshots(&self) -> Result<Vec<Candidate>> {
        let mut found = Vec::new();
        for (name, path) in list_entries(&self.root)? {
            if !path.is_dir() {
                trace!("Skipping non-directory entry {:?}", path);
                continue;
            }
            match snapshot_timestamp(&name) {
                Some(timestamp) => found.push(Candidate::new(name, timestamp)),
                None => trace!("Skipping non-snapshot directory {:?}", path),
            }
        }
        Ok(found)
    }

    /// List the snapshot directories holding a baseline copy of `filename`
    ///
    /// Snapshots are shared by every file of a directory, so a snapshot made
    /// after `filename` stopped changing has no copy of it.
    pub fn snapshots_holding(&self, filename: &str) -> Result<Vec<Candidate>> {
        let mut found = self.snapshots()?;
        found.retain(|candidate| {
            let holds = self.root.join(&candidate.name).join(filename).is_file();
            if !holds {
                trace!("Snapshot {} has no copy of {:?}", candidate.name, filename);
            }
            holds
        });
        Ok(found)
    }

    /// Find the snapshot holding `filename` closest to `target`
    pub fn nearest_snapshot(&self, filename: &str, target: i64) -> Result<Snapshot> {
        let candidate = nearest(
            target,
            self.snapshots_holding(filename)?,
            "snapshots",
            &self.root,
        )?;
        let path = self.root.join(&candidate.name);
        debug!(
            "Nearest snapshot to {} is {} ({}s away)",
            target,
            candidate.name,
            candidate.distance(target)
        );
        Ok(Snapshot { candidate, path })
    }

    /// List the patches recorded for `filename` in a snapshot
    ///
    /// Only names of the form `<filename>-<epoch>.patch` count. The baseline
    /// copy, patches of other files and malformed names are skipped.
    pub fn patches(&self, snapshot: &Snapshot, filename: &str) -> Result<Vec<Candidate>> {
        let mut found = Vec::new();
        for (name, path) in list_entries(&snapshot.path)? {
            if !path.is_file() {
                continue;
            }
            let Some(timestamp) = owned_patch_timestamp(&name, filename) else {
                trace!("Skipping {:?}, not a patch of {:?}", path, filename);
                continue;
            };
            match i64::try_from(timestamp) {
                Ok(timestamp) => found.push(Candidate::new(name, timestamp)),
                Err(_) => trace!("Skipping patch {:?} with out of range timestamp", path),
            }
        }
        Ok(found)
    }

    /// Find the patch for `filename` closest to `target` within a snapshot
    pub fn nearest_patch(&self, snapshot: &Snapshot, filename: &str, target: i64) -> Result<Patch> {
        let candidate = nearest(
            target,
            self.patches(snapshot, filename)?,
            "patches",
            &snapshot.path,
        )?;
        let path = snapshot.path.join(&candidate.name);
        debug!(
            "Nearest patch to {} is {} ({}s away)",
            target,
            candidate.name,
            candidate.distance(target)
        );
        Ok(Patch { candidate, path })
    }
}

/// Parse a snapshot directory name into its timestamp
pub fn snapshot_timestamp(name: &str) -> Option<i64> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

fn list_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error reading entry in {:?}: {}", dir, e);
                continue;
            }
        };
        match entry.file_name().into_string() {
            Ok(name) => entries.push((name, entry.path())),
            Err(name) => trace!("Skipping non UTF-8 entry {:?}", name),
        }
    }
    Ok(entries)
}
