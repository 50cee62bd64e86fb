//! Wildcard expansion of file path patterns.
//!
//! Patterns may carry `*`, `?` or `[...]` in any path component, not only
//! the file name (`.../tas/mon/*/tas_*.nc`). Each wildcard component is
//! compiled with `globset` and matched against directory entries; literal
//! components are joined as-is.

use std::path::{Component, Path, PathBuf};

use globset::Glob;
use tracing::debug;

use crate::error::IoError;

/// Returns `true` if the string contains a wildcard character.
pub fn has_wildcard(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Expand `pattern` into the sorted list of existing paths it matches.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] for a literal path that does not
/// exist, [`IoError::DataNotFound`] for a wildcard pattern with no
/// matches, and [`IoError::Glob`] / [`IoError::ReadDir`] on malformed
/// patterns or unreadable directories.
pub fn expand(pattern: &Path) -> Result<Vec<PathBuf>, IoError> {
    let text = pattern.to_string_lossy();
    if !has_wildcard(&text) {
        if pattern.exists() {
            return Ok(vec![pattern.to_path_buf()]);
        }
        return Err(IoError::FileNotFound {
            path: pattern.to_path_buf(),
        });
    }

    let mut candidates = vec![PathBuf::new()];
    for component in pattern.components() {
        let part = component.as_os_str().to_string_lossy();
        let wild = matches!(component, Component::Normal(_)) && has_wildcard(&part);
        if !wild {
            for c in &mut candidates {
                c.push(component.as_os_str());
            }
            continue;
        }

        let matcher = Glob::new(&part)
            .map_err(|source| IoError::Glob {
                pattern: part.to_string(),
                source,
            })?
            .compile_matcher();

        let mut next = Vec::new();
        for dir in &candidates {
            let listing = if dir.as_os_str().is_empty() {
                Path::new(".")
            } else {
                dir.as_path()
            };
            if !listing.is_dir() {
                continue;
            }
            let entries = std::fs::read_dir(listing).map_err(|source| IoError::ReadDir {
                path: listing.to_path_buf(),
                source,
            })?;
            for entry in entries {
                let entry = entry.map_err(|source| IoError::ReadDir {
                    path: listing.to_path_buf(),
                    source,
                })?;
                let name = entry.file_name();
                if matcher.is_match(&name) {
                    next.push(dir.join(&name));
                }
            }
        }
        next.sort();
        candidates = next;
        if candidates.is_empty() {
            break;
        }
    }

    let mut matches: Vec<PathBuf> = candidates.into_iter().filter(|p| p.exists()).collect();
    matches.sort();
    matches.dedup();
    if matches.is_empty() {
        return Err(IoError::DataNotFound {
            pattern: text.into_owned(),
        });
    }
    debug!(pattern = %text, n = matches.len(), "expanded pattern");
    Ok(matches)
}
