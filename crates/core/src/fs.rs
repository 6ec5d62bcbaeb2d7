//! Filesystem utilities

use std::path::Path;

use log::debug;

/// Check if a path points at a regular file
///
/// Used before opening the database so a missing file is reported as such
/// instead of as an opaque driver error.
pub fn is_file(path: &str) -> bool {
    let found = Path::new(path).is_file();
    if !found {
        debug!("no regular file at {}", path);
    }
    found
}
