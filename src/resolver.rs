//! Nearest-match resolution
//!
//! Picks the candidate whose timestamp lies closest to a target, in either
//! direction. Ties on distance go to the lexicographically smallest name so
//! the choice does not depend on directory listing order.

use crate::error::{HadminError, Result};
use serde::Serialize;
use std::path::Path;

/// A named candidate with its timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Directory entry name
    pub name: String,
    /// Epoch seconds the candidate stands for
    pub timestamp: i64,
}

impl Candidate {
    /// Create a new candidate
    pub fn new(name: impl Into<String>, timestamp: i64) -> Self {
        Self {
            name: name.into(),
            timestamp,
        }
    }

    /// Absolute distance to `target` in seconds
    pub fn distance(&self, target: i64) -> u64 {
        self.timestamp.abs_diff(target)
    }
}

/// Return the candidate closest to `target`
///
/// `what` and `location` only describe the search for the error raised when
/// there is nothing to choose from.
///
/// # Errors
///
/// - [`HadminError::EmptySet`] if `candidates` yields nothing
///
/// # Example
///
/// ```
/// use hadmin::resolver::{nearest, Candidate};
/// use std::path::Path;
///
/// let snapshots = vec![
///     Candidate::new("100", 100),
///     Candidate::new("200", 200),
///     Candidate::new("500", 500),
/// ];
/// let best = nearest(180, snapshots, "snapshots", Path::new(".version")).unwrap();
/// assert_eq!(best.name, "200");
/// ```
pub fn nearest<I>(target: i64, candidates: I, what: &'static str, location: &Path) -> Result<Candidate>
where
    I: IntoIterator<Item = Candidate>,
{
    candidates
        .into_iter()
        .min_by(|a, b| {
            a.distance(target)
                .cmp(&b.distance(target))
                .then_with(|| a.name.cmp(&b.name))
        })
        .ok_or_else(|| HadminError::EmptySet {
            what,
            location: location.to_path_buf(),
        })
}
