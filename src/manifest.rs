//! Reading and writing the JSON manifest.

use crate::error::{Error, Result};
use crate::record::TemplateRecord;
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Reads a whole manifest file.
///
/// # Errors
/// * `Error::IoError` if the file cannot be read
/// * `Error::ManifestParseError` if it is not a JSON array of records
pub fn read_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<TemplateRecord>> {
    let path = path.as_ref();
    debug!("Reading manifest from {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_manifest(&content).map_err(|source| Error::ManifestParseError {
        manifest: path.display().to_string(),
        source,
    })
}

pub fn parse_manifest(content: &str) -> std::result::Result<Vec<TemplateRecord>, serde_json::Error> {
    serde_json::from_str(content)
}

/// Serializes records as a pretty-printed JSON array.
pub fn to_manifest_string(records: &[TemplateRecord]) -> Result<String> {
    let mut content = serde_json::to_string_pretty(records)?;
    content.push('\n');
    Ok(content)
}

/// Writes the manifest in a single whole-file write, creating parent
/// directories as needed.
pub fn write_manifest<P: AsRef<Path>>(path: P, records: &[TemplateRecord]) -> Result<()> {
    let path = path.as_ref();
    let content = to_manifest_string(records)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|source| Error::CreateDirError { path: parent.to_path_buf(), source })?;
    }
    debug!("Writing {} records to {}", records.len(), path.display());
    fs::write(path, content).map_err(Error::IoError)
}

/// Validates every record and checks that no two of them resolve to the same file.
///
/// # Errors
/// * `Error::InvalidRecord` for a record that would escape the target tree
/// * `Error::DuplicateRecord` for the second record sharing a location, or a
///   record written where another record's overlay sidecar goes
pub fn check_records(records: &[TemplateRecord]) -> Result<()> {
    let mut seen = HashSet::new();
    for record in records {
        record.validate()?;
        let path = record.relative_path();
        if !seen.insert(path.clone()) {
            return Err(Error::DuplicateRecord(path));
        }
    }

    if let Some(sidecar) = records
        .iter()
        .filter_map(TemplateRecord::sidecar_relative_path)
        .find(|sidecar| seen.contains(sidecar))
    {
        return Err(Error::DuplicateRecord(sidecar));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MetadataOverlay;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("manifest.json");
        let records = vec![
            TemplateRecord::new("a", vec![], "hi", "txt"),
            TemplateRecord::new("b", vec!["sub".into()], "X", "md"),
        ];

        write_manifest(&path, &records).unwrap();
        assert_eq!(read_manifest(&path).unwrap(), records);
    }

    #[test]
    fn test_malformed_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, r#"[{"name": "a""#).unwrap();

        match read_manifest(&path) {
            Err(Error::ManifestParseError { manifest, .. }) => {
                assert!(manifest.ends_with("manifest.json"))
            }
            other => panic!("Expected ManifestParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_not_an_array() {
        assert!(parse_manifest(r#"{"name": "a"}"#).is_err());
    }

    #[test]
    fn test_check_records_rejects_duplicates() {
        let records = vec![
            TemplateRecord::new("b", vec!["sub".into()], "1", "md"),
            TemplateRecord::new("b", vec!["sub".into()], "2", "md"),
        ];
        assert!(matches!(check_records(&records), Err(Error::DuplicateRecord(p)) if p == "sub/b.md"));

        let records = vec![
            TemplateRecord::new("b", vec!["sub".into()], "1", "md"),
            TemplateRecord::new("b", vec![], "2", "md"),
            TemplateRecord::new("b", vec!["sub".into()], "3", ""),
        ];
        assert!(check_records(&records).is_ok());
    }

    #[test]
    fn test_check_records_compares_written_paths() {
        let records = vec![
            TemplateRecord::new("a", vec![], "first", "txt"),
            TemplateRecord::new("a.txt", vec![], "second", ""),
        ];
        assert!(matches!(check_records(&records), Err(Error::DuplicateRecord(p)) if p == "a.txt"));
    }

    #[test]
    fn test_check_records_rejects_sidecar_collision() {
        let mut overlay = MetadataOverlay::new();
        overlay.insert("title", "Page");
        let records = vec![
            TemplateRecord::new("page", vec![], "<Page />", "tsx").with_overlay(Some(overlay)),
            TemplateRecord::new("page.tsx.tmpl", vec![], "title: Other\n", "yaml"),
        ];
        assert!(matches!(
            check_records(&records),
            Err(Error::DuplicateRecord(p)) if p == "page.tsx.tmpl.yaml"
        ));

        let records = vec![
            TemplateRecord::new("page", vec![], "<Page />", "tsx").with_overlay(Some(MetadataOverlay::new())),
            TemplateRecord::new("page.tsx.tmpl", vec![], "", "yaml"),
        ];
        assert!(check_records(&records).is_ok());
    }
}
