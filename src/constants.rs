//! Common constants used throughout tstmpl.

/// Supported project configuration file names
pub const CONFIG_FILES: [&str; 3] = ["tstmpl.json", "tstmpl.yml", "tstmpl.yaml"];

/// Ignore file read from the project root unless overridden.
pub const IGNORE_FILE: &str = ".gitignore";

/// Default name of the output directory, created inside the project root.
pub const DEFAULT_OUTPUT_DIR: &str = ".ts-tmpl";

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Suffix appended to a file name to form its metadata overlay sidecar.
pub const SIDECAR_SUFFIX: &str = ".tmpl.yaml";

/// Aggregation module written in every non-empty directory in modules mode.
pub const INDEX_MODULE: &str = "index";

/// Extension of the generated modules.
pub const MODULE_EXTENSION: &str = "ts";

/// Exclusions that are always active, whatever the ignore file says.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    ".DS_Store",
    "Thumbs.db",
    ".idea",
    ".vscode",
    "node_modules",
    DEFAULT_OUTPUT_DIR,
];

/// Extensions copied byte-for-byte instead of being turned into templates.
pub const DEFAULT_VERBATIM_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "svgz", "woff", "woff2", "ttf", "otf",
    "eot", "pdf", "zip", "gz",
];
