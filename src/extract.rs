//! Template extraction: turns a project tree into template records.
//!
//! The extractor drives the [`walker`](crate::walker) over the project root,
//! filters entries through the [`IgnoreMatcher`], and builds one
//! [`TemplateRecord`] per remaining file. Depending on the [`OutputMode`] the
//! records end up in a JSON manifest or in mirrored TypeScript modules.

use crate::config::{Config, OutputMode, VerbatimPolicy};
use crate::constants::{DEFAULT_VERBATIM_EXTENSIONS, MANIFEST_FILE};
use crate::emit::{DirectoryIndex, ModuleEmitter};
use crate::error::{Error, Result};
use crate::ignore::IgnoreMatcher;
use crate::manifest::write_manifest;
use crate::normalize::{normalize, split_name, NormalizedPath};
use crate::overlay::OverlayProvider;
use crate::record::TemplateRecord;
use crate::renderer::MiniJinjaRenderer;
use crate::walker::{walk, Visitor};
use log::{debug, info, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Settings for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub ignore: IgnoreMatcher,
    pub mode: OutputMode,
    /// Where modules, copied files and (by default) the manifest go.
    pub output_dir: PathBuf,
    /// Overrides `<output_dir>/manifest.json`.
    pub manifest_path: Option<PathBuf>,
    /// Extensions handled by `verbatim` instead of being templated.
    pub verbatim_extensions: Vec<String>,
    pub verbatim: VerbatimPolicy,
}

impl ExtractOptions {
    /// Manifest mode into `output_dir`, built-in exclusions only.
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            ignore: IgnoreMatcher::default(),
            mode: OutputMode::default(),
            output_dir: output_dir.into(),
            manifest_path: None,
            verbatim_extensions: DEFAULT_VERBATIM_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            verbatim: VerbatimPolicy::default(),
        }
    }

    /// Builds options from a project configuration. Relative paths in the
    /// configuration are resolved against `root`.
    pub fn from_config<P: AsRef<Path>>(root: P, config: &Config) -> Self {
        let root = root.as_ref();
        let mut builder = IgnoreMatcher::builder();
        builder.add_ignore_file(root.join(&config.ignore_file));
        for pattern in &config.exclude {
            builder.add(pattern.as_str());
        }

        Self {
            ignore: builder.build(),
            mode: config.mode,
            output_dir: root.join(&config.output_dir),
            manifest_path: None,
            verbatim_extensions: config.verbatim_extensions.clone(),
            verbatim: config.verbatim,
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_path.clone().unwrap_or_else(|| self.output_dir.join(MANIFEST_FILE))
    }

    fn is_verbatim(&self, extension: &str) -> bool {
        !extension.is_empty()
            && self
                .verbatim_extensions
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

/// Result of an extraction run.
#[derive(Debug, Default)]
pub struct Extraction {
    /// One record per extracted file, in traversal order.
    pub records: Vec<TemplateRecord>,
    /// File identifiers per directory.
    pub index: DirectoryIndex,
    /// Destinations of files copied verbatim.
    pub copied: Vec<PathBuf>,
}

/// Absolute form of `path` with `.`, `..` and links resolved.
///
/// The longest existing prefix is canonicalized; the missing tail is
/// appended lexically.
fn resolve(path: &Path) -> PathBuf {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut existing = path.as_path();
    let mut tail = Vec::new();

    let mut resolved = loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            break canonical;
        }
        match (existing.parent(), existing.components().next_back()) {
            (Some(parent), Some(last)) => {
                tail.push(last);
                existing = parent;
            }
            _ => break PathBuf::new(),
        }
    };

    for component in tail.into_iter().rev() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            other => resolved.push(other),
        }
    }
    resolved
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Fails when writing to `output_dir` would clobber `root`.
fn check_output_location(root: &Path, output_dir: &Path) -> Result<()> {
    if resolve(root).starts_with(resolve(output_dir)) {
        return Err(Error::ConfigError(format!(
            "output directory '{}' must not contain the project root '{}'",
            output_dir.display(),
            root.display()
        )));
    }
    Ok(())
}

/// Ensures the output directory can be written.
///
/// # Arguments
/// * `output_dir` - Target directory for generated output
/// * `root` - Project root being extracted
/// * `force` - Whether to remove an existing output directory
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if it exists and `force` is false
/// * `Error::ConfigError` if it is the root or one of its ancestors
pub fn prepare_output_dir<P: AsRef<Path>, R: AsRef<Path>>(output_dir: P, root: R, force: bool) -> Result<()> {
    let output_dir = output_dir.as_ref();
    check_output_location(root.as_ref(), output_dir)?;

    if !output_dir.exists() {
        return Ok(());
    }
    if !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }

    debug!("Removing existing output '{}'", output_dir.display());
    if output_dir.is_dir() {
        fs::remove_dir_all(output_dir)?;
    } else {
        fs::remove_file(output_dir)?;
    }
    Ok(())
}

struct Extractor<'a> {
    root: &'a Path,
    options: &'a ExtractOptions,
    ignore: IgnoreMatcher,
    overlays: &'a dyn OverlayProvider,
    emitter: Option<ModuleEmitter<'a>>,
    extraction: Extraction,
}

impl Extractor<'_> {
    fn copy_verbatim(&mut self, path: &Path, normalized: &NormalizedPath) -> Result<()> {
        if self.options.verbatim == VerbatimPolicy::Skip {
            debug!("Skipping verbatim file '{}'", normalized.relative_path);
            return Ok(());
        }

        let target = self.options.output_dir.join(&normalized.relative_path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| Error::CreateDirError { path: parent.to_path_buf(), source })?;
        }

        debug!("Copying file: {}", target.display());
        match fs::copy(path, &target) {
            Ok(_) => self.extraction.copied.push(target),
            Err(e) => warn!("Failed to copy '{}': {}", normalized.relative_path, e),
        }
        Ok(())
    }
}

impl Visitor for Extractor<'_> {
    fn enter_dir(&mut self, path: &Path) -> Result<bool> {
        let normalized = match normalize(self.root, path) {
            Ok(normalized) => normalized,
            Err(e) => {
                warn!("Skipping directory: {e}");
                return Ok(false);
            }
        };

        if self.ignore.is_ignored(&normalized.relative_path) {
            debug!("Skipping ignored directory '{}'", normalized.relative_path);
            return Ok(false);
        }

        if let Some(emitter) = &self.emitter {
            emitter.create_dir(&normalized.relative_path)?;
        }
        Ok(true)
    }

    fn visit_file(&mut self, path: &Path) -> Result<()> {
        let normalized = match normalize(self.root, path) {
            Ok(normalized) => normalized,
            Err(e) => {
                warn!("Skipping file: {e}");
                return Ok(());
            }
        };

        if self.ignore.is_ignored(&normalized.relative_path) {
            debug!("Skipping ignored file '{}'", normalized.relative_path);
            return Ok(());
        }
        if self.overlays.is_overlay_file(path) {
            debug!("Skipping overlay file '{}'", normalized.relative_path);
            return Ok(());
        }

        let (name, extension) = split_name(&normalized.base_name);
        if self.options.is_verbatim(&extension) {
            return self.copy_verbatim(path, &normalized);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping unreadable file '{}': {}", normalized.relative_path, e);
                return Ok(());
            }
        };

        debug!("Processing source file: {}", normalized.relative_path);
        let record = TemplateRecord::new(name, normalized.record_paths(), content, extension)
            .with_overlay(self.overlays.overlay_for(path));

        let dir_key = normalized.parent_key();
        let ident = self.extraction.index.register_file(&dir_key, &normalized.base_name);
        if let Some(emitter) = &self.emitter {
            let export = self.extraction.index.register_export(&dir_key, &ident);
            emitter.write_module(&dir_key, &ident, &export, &record)?;
        }

        self.extraction.records.push(record);
        Ok(())
    }

    fn leave_dir(&mut self, path: &Path) -> Result<()> {
        let Some(emitter) = &self.emitter else {
            return Ok(());
        };

        let normalized = normalize(self.root, path)?;
        let dir_key = &normalized.relative_path;
        let written = emitter.write_index(dir_key, self.extraction.index.entries(dir_key))?;
        if written.is_some() && !normalized.is_root() {
            self.extraction.index.register_dir(&normalized.parent_key(), &normalized.base_name);
        }
        Ok(())
    }
}

/// Extracts every non-ignored file under `root`.
///
/// In manifest mode the records are written to the manifest once the walk is
/// complete; in modules mode each file and directory is written as it is
/// visited. Unreadable files are logged and left out.
///
/// # Errors
/// * `Error::InvalidPath` if `root` is not a directory
/// * `Error::CreateDirError` if an output directory cannot be created
pub fn extract<P: AsRef<Path>>(
    root: P,
    options: &ExtractOptions,
    overlays: &dyn OverlayProvider,
) -> Result<Extraction> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::InvalidPath(format!("'{}' is not a directory", root.display())));
    }
    check_output_location(root, &options.output_dir)?;

    // Keep the tool's own output out of the templates.
    let root_abs = resolve(root);
    let exclusions: Vec<String> = [options.output_dir.clone(), options.manifest_path()]
        .iter()
        .filter_map(|path| resolve(path).strip_prefix(&root_abs).ok().map(to_slash))
        .filter(|relative| !relative.is_empty())
        .map(|relative| format!("/{relative}"))
        .collect();

    let renderer = MiniJinjaRenderer::new();
    let emitter = match options.mode {
        OutputMode::Modules => Some(ModuleEmitter::new(&options.output_dir, &renderer)),
        OutputMode::Manifest => None,
    };

    info!("Extracting templates from '{}'", root.display());
    let mut extractor = Extractor {
        root,
        options,
        ignore: options.ignore.with_exclusions(&exclusions),
        overlays,
        emitter,
        extraction: Extraction::default(),
    };
    walk(root, &mut extractor)?;
    let extraction = extractor.extraction;

    if options.mode == OutputMode::Manifest {
        write_manifest(options.manifest_path(), &extraction.records)?;
    }

    info!(
        "Extracted {} templates, copied {} files",
        extraction.records.len(),
        extraction.copied.len()
    );
    Ok(extraction)
}
