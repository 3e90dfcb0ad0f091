//! Template records: one file's content plus where it lives in the tree.

use crate::constants::SIDECAR_SUFFIX;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Optional per-file key/value data supplied by an [`OverlayProvider`].
///
/// The core never interprets the values; it attaches them to records and
/// carries them through serialization.
///
/// [`OverlayProvider`]: crate::overlay::OverlayProvider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataOverlay(pub IndexMap<String, serde_json::Value>);

impl MetadataOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<serde_json::Value>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every field holds an empty or zero value, i.e. the overlay
    /// carries no customization worth writing out.
    pub fn is_default(&self) -> bool {
        self.0.values().all(is_default_value)
    }
}

fn is_default_value(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::Object(fields) => fields.is_empty(),
    }
}

/// One file of a template: its name, directory, content and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    /// Base name without the extension.
    pub name: String,
    /// Directory segments from the tree root, empty at root level.
    #[serde(default)]
    pub paths: Vec<String>,
    pub content: String,
    /// Extension without the dot, empty when there is none.
    #[serde(default)]
    pub extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_overlay: Option<MetadataOverlay>,
}

impl TemplateRecord {
    pub fn new<N, C, E>(name: N, paths: Vec<String>, content: C, extension: E) -> Self
    where
        N: Into<String>,
        C: Into<String>,
        E: Into<String>,
    {
        Self {
            name: name.into(),
            paths,
            content: content.into(),
            extension: extension.into(),
            metadata_overlay: None,
        }
    }

    pub fn with_overlay(mut self, overlay: Option<MetadataOverlay>) -> Self {
        self.metadata_overlay = overlay;
        self
    }

    /// File name on disk: `name.extension`, or just `name` without extension.
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.extension)
        }
    }

    /// `/` separated location relative to the tree root.
    pub fn relative_path(&self) -> String {
        let mut segments = self.paths.clone();
        segments.push(self.file_name());
        segments.join("/")
    }

    /// Directory of the record relative to the tree root.
    pub fn directory(&self) -> PathBuf {
        self.paths.iter().collect()
    }

    /// Location of the overlay sidecar written next to the file, if any.
    pub fn sidecar_relative_path(&self) -> Option<String> {
        self.metadata_overlay
            .as_ref()
            .filter(|overlay| !overlay.is_default())
            .map(|_| format!("{}{}", self.relative_path(), SIDECAR_SUFFIX))
    }

    /// Checks that the record resolves to a location inside the target tree.
    ///
    /// # Errors
    /// * `Error::InvalidRecord` for empty names, `.`/`..` segments, or
    ///   segments containing path separators
    pub fn validate(&self) -> Result<()> {
        for segment in &self.paths {
            check_segment(segment, "directory segment", self)?;
        }
        check_segment(&self.name, "name", self)?;
        if self.extension.contains(['/', '\\']) || self.extension.starts_with('.') {
            return Err(Error::InvalidRecord(format!(
                "extension '{}' of '{}'",
                self.extension,
                self.relative_path()
            )));
        }
        Ok(())
    }
}

fn check_segment(segment: &str, what: &str, record: &TemplateRecord) -> Result<()> {
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains(['/', '\\']) {
        return Err(Error::InvalidRecord(format!(
            "{} '{}' of '{}'",
            what,
            segment,
            record.relative_path()
        )));
    }
    Ok(())
}
