//! Project configuration.
//! An optional `tstmpl.json`, `tstmpl.yml` or `tstmpl.yaml` in the project
//! root supplies defaults for extraction; command-line flags override it.

use crate::constants::{CONFIG_FILES, DEFAULT_OUTPUT_DIR, DEFAULT_VERBATIM_EXTENSIONS, IGNORE_FILE};
use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How extracted records are written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// A single JSON manifest of all records.
    #[default]
    Manifest,
    /// One TypeScript module per file plus an index per directory.
    Modules,
}

/// What happens to files whose extension is in the verbatim set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbatimPolicy {
    /// Copy the raw bytes to the mirrored location in the output directory.
    #[default]
    Copy,
    /// Leave the file out entirely.
    Skip,
}

/// Contents of a project configuration file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output directory, relative to the project root.
    pub output_dir: PathBuf,
    pub mode: OutputMode,
    /// Ignore file, relative to the project root.
    pub ignore_file: PathBuf,
    /// Extra exclusion patterns.
    pub exclude: Vec<String>,
    pub verbatim_extensions: Vec<String>,
    pub verbatim: VerbatimPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            mode: OutputMode::default(),
            ignore_file: PathBuf::from(IGNORE_FILE),
            exclude: Vec::new(),
            verbatim_extensions: DEFAULT_VERBATIM_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            verbatim: VerbatimPolicy::default(),
        }
    }
}

/// Loads the first configuration file found in `project_dir`.
///
/// # Arguments
/// * `project_dir` - Directory containing the configuration
/// * `config_files` - List of configuration files to try
///
/// # Returns
/// * `Ok(None)` when none of the files exists
pub fn load_config<P: AsRef<Path>>(project_dir: P, config_files: &[&str]) -> Result<Option<String>> {
    for file in config_files {
        let config_path = project_dir.as_ref().join(file);
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            return Ok(Some(std::fs::read_to_string(&config_path)?));
        }
    }
    debug!("No configuration file found (tried: {})", config_files.join(", "));
    Ok(None)
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML
pub fn parse_config(content: &str) -> Result<Config> {
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}"))),
    }
}

/// Returns the project configuration, or the defaults when there is no file.
pub fn get_config<P: AsRef<Path>>(project_dir: P) -> Result<Config> {
    match load_config(project_dir, &CONFIG_FILES)? {
        Some(content) if !content.trim().is_empty() => parse_config(&content),
        _ => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = get_config(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output_dir, PathBuf::from(".ts-tmpl"));
        assert!(config.verbatim_extensions.contains(&"png".to_string()));
    }

    #[test]
    fn test_yaml_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("tstmpl.yaml"),
            "mode: modules\nexclude: [dist]\nverbatim: skip\n",
        )
        .unwrap();

        let config = get_config(dir.path()).unwrap();
        assert_eq!(config.mode, OutputMode::Modules);
        assert_eq!(config.exclude, vec!["dist"]);
        assert_eq!(config.verbatim, VerbatimPolicy::Skip);
        assert_eq!(config.ignore_file, PathBuf::from(".gitignore"));
    }

    #[test]
    fn test_json_config() {
        let config = parse_config(r#"{"output_dir": "tmpl", "verbatim_extensions": ["bin"]}"#).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("tmpl"));
        assert_eq!(config.verbatim_extensions, vec!["bin"]);
        assert_eq!(config.mode, OutputMode::Manifest);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(parse_config("mode: [oops"), Err(Error::ConfigError(_))));
        assert!(matches!(parse_config("colour: blue\n"), Err(Error::ConfigError(_))));
    }
}
