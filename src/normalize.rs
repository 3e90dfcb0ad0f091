//! Canonical relative representation of paths found during traversal.
//! Every consumer (ignore matching, record building, module output) goes
//! through [`normalize`] so that they all agree on the same spelling.

use crate::error::{Error, Result};
use std::path::{Component, Path};

/// Directory of an entry that sits directly under the root.
pub const CURRENT_DIR: &str = ".";

/// A path relative to the traversal root, always `/` separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    /// Full relative path, empty for the root itself.
    pub relative_path: String,
    /// Last segment of the relative path.
    pub base_name: String,
    /// Parent directory, [`CURRENT_DIR`] for root-level entries.
    pub directory: String,
    /// `directory` split on `/`.
    pub directory_segments: Vec<String>,
}

impl NormalizedPath {
    /// Directory segments with the [`CURRENT_DIR`] sentinel removed, ready to
    /// be stored in a template record.
    pub fn record_paths(&self) -> Vec<String> {
        self.directory_segments
            .iter()
            .filter(|segment| segment.as_str() != CURRENT_DIR)
            .cloned()
            .collect()
    }

    /// Key of the parent directory in a directory index, empty for the root.
    pub fn parent_key(&self) -> String {
        self.record_paths().join("/")
    }

    pub fn is_root(&self) -> bool {
        self.relative_path.is_empty()
    }
}

/// Converts `full_path` into its representation relative to `root`.
///
/// # Errors
/// * `Error::InvalidPath` if `full_path` is not under `root` or is not valid UTF-8
pub fn normalize<R: AsRef<Path>, P: AsRef<Path>>(root: R, full_path: P) -> Result<NormalizedPath> {
    let root = root.as_ref();
    let full_path = full_path.as_ref();

    let relative = full_path.strip_prefix(root).map_err(|_| {
        Error::InvalidPath(format!(
            "'{}' is not inside '{}'",
            full_path.display(),
            root.display()
        ))
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment.to_str().ok_or_else(|| {
                    Error::InvalidPath(format!("'{}' is not valid UTF-8", full_path.display()))
                })?;
                segments.push(segment.to_string());
            }
            Component::CurDir => {}
            _ => {
                return Err(Error::InvalidPath(format!(
                    "'{}' cannot be expressed relative to '{}'",
                    full_path.display(),
                    root.display()
                )))
            }
        }
    }

    let base_name = segments.last().cloned().unwrap_or_default();
    let directory = if segments.len() > 1 {
        segments[..segments.len() - 1].join("/")
    } else {
        CURRENT_DIR.to_string()
    };
    let directory_segments = directory.split('/').map(str::to_string).collect();

    Ok(NormalizedPath {
        relative_path: segments.join("/"),
        base_name,
        directory,
        directory_segments,
    })
}

/// Splits a base name into `(name, extension)`.
///
/// A dotfile without a further `.` (e.g. `.env`) has no extension, and so
/// does a name ending in `.`; otherwise the extension is everything after the
/// last `.`.
pub fn split_name(base_name: &str) -> (String, String) {
    let is_hidden = base_name.starts_with('.') && !base_name[1..].contains('.');
    if is_hidden {
        return (base_name.to_string(), String::new());
    }

    match base_name.rfind('.') {
        Some(idx) if idx + 1 < base_name.len() => {
            (base_name[..idx].to_string(), base_name[idx + 1..].to_string())
        }
        _ => (base_name.to_string(), String::new()),
    }
}
