//! Path helpers
//!
//! Paths are handled as `/`-delimited strings because that is how
//! hieronymus lays out its `.version` directories next to each file.

use std::path::PathBuf;

/// Name of the sidecar directory holding all snapshots for a directory
pub const VERSION_DIR_NAME: &str = ".version";

/// Split a path into its directory and filename
///
/// The filename is the last `/`-delimited segment, the directory is every
/// preceding segment joined back with `/`. A path without `/` has an empty
/// directory.
///
/// ```
/// use hadmin::path::split_path;
///
/// assert_eq!(split_path("a/b/file.txt"), ("a/b".to_string(), "file.txt".to_string()));
/// assert_eq!(split_path("file.txt"), (String::new(), "file.txt".to_string()));
/// ```
pub fn split_path(path: &str) -> (String, String) {
    match path.rsplit_once('/') {
        Some((directory, filename)) => (directory.to_string(), filename.to_string()),
        None => (String::new(), path.to_string()),
    }
}

/// Locate the versioning directory for a target path
///
/// `<directory>/.version` when the target has a parent directory, `/.version`
/// for a file directly under the filesystem root, `.version` otherwise.
///
/// A root-level path like `/file` has an empty directory part but still maps
/// to `/.version`, not `.version`, since that is where hieronymus keeps it.
pub fn versioning_dir(path: &str) -> PathBuf {
    let (directory, _) = split_path(path);
    if !directory.is_empty() {
        PathBuf::from(format!("{}/{}", directory, VERSION_DIR_NAME))
    } else if path.starts_with('/') {
        PathBuf::from(format!("/{}", VERSION_DIR_NAME))
    } else {
        PathBuf::from(VERSION_DIR_NAME)
    }
}
