//! Template materialization: writes template records back into a tree.

use crate::error::{Error, Result};
use crate::manifest::check_records;
use crate::overlay::write_sidecar;
use crate::record::TemplateRecord;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::CreateDirError { path: path.to_path_buf(), source })
}

/// Recreates the files described by `records` under `target_dir`.
///
/// Records are validated up front, so nothing is written when one of them is
/// invalid or two of them resolve to the same file. A record whose overlay
/// carries non-default values also gets its YAML sidecar.
///
/// # Returns
/// * Paths of the content files written, in record order
///
/// # Errors
/// * `Error::InvalidRecord` / `Error::DuplicateRecord` before any write
/// * `Error::CreateDirError` if a directory cannot be created
pub fn materialize<P: AsRef<Path>>(records: &[TemplateRecord], target_dir: P) -> Result<Vec<PathBuf>> {
    let target_dir = target_dir.as_ref();
    check_records(records)?;

    create_dir_all(target_dir)?;

    let mut written = Vec::with_capacity(records.len());
    for record in records {
        let dir = target_dir.join(record.directory());
        create_dir_all(&dir)?;

        let path = dir.join(record.file_name());
        debug!("Writing file: {}", path.display());
        fs::write(&path, &record.content)?;

        if let Some(overlay) = record.metadata_overlay.as_ref().filter(|o| !o.is_default()) {
            let sidecar = write_sidecar(&path, overlay)?;
            debug!("Writing overlay: {}", sidecar.display());
        }
        written.push(path);
    }

    info!("Materialized {} files into '{}'", written.len(), target_dir.display());
    Ok(written)
}
