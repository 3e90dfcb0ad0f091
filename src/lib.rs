//! tstmpl turns a project directory into a portable template representation
//! (a JSON manifest or mirrored TypeScript modules) and materializes
//! manifests back into directory trees.

/// Command-line interface module for tstmpl
pub mod cli;

/// Project configuration (tstmpl.json, tstmpl.yml, tstmpl.yaml)
pub mod config;

/// Common constants
pub mod constants;

/// Mirrored TypeScript module output and the per-directory index
pub mod emit;

/// Error types and handling
pub mod error;

/// Template extraction from a project tree
pub mod extract;

/// File and directory ignore patterns
/// Processes .gitignore-style files and built-in exclusions
pub mod ignore;

/// JSON manifest reading and writing
pub mod manifest;

/// Writing template records back to disk
pub mod materialize;

/// Canonical relative paths
pub mod normalize;

/// Per-file metadata overlays read from YAML sidecars
pub mod overlay;

/// User confirmation prompts
pub mod prompt;

/// Template records and metadata overlays
pub mod record;

/// MiniJinja rendering for generated modules
pub mod renderer;

/// Depth-first filesystem traversal
pub mod walker;
