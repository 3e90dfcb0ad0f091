//! Per-file metadata overlays.
//!
//! An overlay is declared in a YAML sidecar next to the file it belongs to,
//! named after the file plus [`SIDECAR_SUFFIX`]:
//!
//! ```yaml
//! # page.tsx.tmpl.yaml
//! title: Product page
//! fileName: "{{ name }}.tsx"
//! itemName: "{{ item.id }}"
//! dataSource: products
//! ```
//!
//! The sidecar is plain data. Values are carried through as-is; nothing in
//! them is evaluated.

use crate::constants::SIDECAR_SUFFIX;
use crate::error::{Error, Result};
use crate::record::MetadataOverlay;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Supplies the metadata overlay of a source file, if it has one.
pub trait OverlayProvider {
    /// Returns the overlay attached to `path`. Implementations report their
    /// own failures and return `None` for them.
    fn overlay_for(&self, path: &Path) -> Option<MetadataOverlay>;

    /// Whether `path` holds overlay data itself and must not become a record.
    fn is_overlay_file(&self, _path: &Path) -> bool {
        false
    }
}

/// Provider for trees without overlays.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOverlays;

impl OverlayProvider for NoOverlays {
    fn overlay_for(&self, _path: &Path) -> Option<MetadataOverlay> {
        None
    }
}

/// Reads overlays from YAML sidecar files.
#[derive(Debug, Default, Clone, Copy)]
pub struct SidecarOverlays;

impl OverlayProvider for SidecarOverlays {
    fn overlay_for(&self, path: &Path) -> Option<MetadataOverlay> {
        let sidecar = sidecar_path(path);
        if !sidecar.is_file() {
            return None;
        }

        let parsed = fs::read_to_string(&sidecar)
            .map_err(Error::IoError)
            .and_then(|content| parse_overlay(&content));
        match parsed {
            Ok(overlay) => {
                debug!("Loaded overlay for '{}'", path.display());
                overlay
            }
            Err(e) => {
                warn!("Ignoring malformed overlay '{}': {}", sidecar.display(), e);
                None
            }
        }
    }

    fn is_overlay_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.len() > SIDECAR_SUFFIX.len() && name.ends_with(SIDECAR_SUFFIX))
    }
}

/// Location of the sidecar belonging to `file`.
pub fn sidecar_path<P: AsRef<Path>>(file: P) -> PathBuf {
    let file = file.as_ref();
    let mut name = file.file_name().unwrap_or_default().to_os_string();
    name.push(SIDECAR_SUFFIX);
    file.with_file_name(name)
}

/// Parses sidecar content. Blank content or an empty mapping means no overlay.
///
/// # Errors
/// * `Error::YamlError` if the content is not a mapping with string keys
pub fn parse_overlay(content: &str) -> Result<Option<MetadataOverlay>> {
    if content.trim().is_empty() {
        return Ok(None);
    }
    let overlay: MetadataOverlay = serde_yaml::from_str(content)?;
    Ok(Some(overlay).filter(|overlay| !overlay.is_empty()))
}

/// Writes the sidecar for `file` and returns its path.
pub fn write_sidecar<P: AsRef<Path>>(file: P, overlay: &MetadataOverlay) -> Result<PathBuf> {
    let sidecar = sidecar_path(file);
    fs::write(&sidecar, serde_yaml::to_string(overlay)?)?;
    Ok(sidecar)
}
