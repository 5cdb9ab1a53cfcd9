//! Patch filename parsing
//!
//! hieronymus names each patch `<file>-<epoch>.patch`, where `<epoch>` is the
//! write time in seconds. Names that do not follow this shape are unranked:
//! they carry no timestamp and never take part in nearest-match selection.

use once_cell::sync::Lazy;
use regex::Regex;

/// Suffix every patch file carries
pub const PATCH_SUFFIX: &str = ".patch";

static PATCH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9_-]-([0-9]{10,})\.patch$").expect("patch name pattern is valid")
});

/// Extract the epoch timestamp embedded in a patch filename
///
/// Returns `None` for names that are not patches (including the snapshot's
/// baseline copy) and for digit runs that overflow `u64`.
///
/// ```
/// use hadmin::patch::patch_timestamp;
///
/// assert_eq!(patch_timestamp("foo-1609459200.patch"), Some(1609459200));
/// assert_eq!(patch_timestamp("malformed.patch"), None);
/// ```
pub fn patch_timestamp(name: &str) -> Option<u64> {
    PATCH_NAME
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Extract the timestamp of a patch recorded for `filename`
///
/// Only the exact name `<filename>-<epoch>.patch` with at least ten digits
/// matches. Unlike [`patch_timestamp`], the filename may contain any
/// characters, so patches of `café` or `notes~` are found too.
///
/// ```
/// use hadmin::patch::owned_patch_timestamp;
///
/// assert_eq!(owned_patch_timestamp("café-1295000100.patch", "café"), Some(1295000100));
/// assert_eq!(owned_patch_timestamp("other-1295000100.patch", "café"), None);
/// ```
pub fn owned_patch_timestamp(name: &str, filename: &str) -> Option<u64> {
    let digits = name
        .strip_prefix(filename)?
        .strip_prefix('-')?
        .strip_suffix(PATCH_SUFFIX)?;
    if digits.len() < 10 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Check whether a filename looks like a patch at all
pub fn is_patch_name(name: &str) -> bool {
    patch_timestamp(name).is_some()
}
