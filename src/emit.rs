//! Mirrored TypeScript module output.
//!
//! Every extracted file becomes `<ident>.ts`, holding the content as a string
//! constant and exporting a record-shaped object. Every non-empty directory
//! gets an `index.ts` that re-exports its modules and child directories.

use crate::constants::{INDEX_MODULE, MODULE_EXTENSION};
use crate::error::{Error, Result};
use crate::record::TemplateRecord;
use crate::renderer::TemplateRenderer;
use cruet::Inflector;
use indexmap::IndexMap;
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

const MODULE_TEMPLATE: &str = r#"const {{ ident }}File = {{ record.content|tojson }};

export const {{ export_name }} = {
  name: {{ record.name|tojson }},
  paths: {{ record.paths|tojson }},
  content: {{ ident }}File,
  extension: {{ record.extension|tojson }},
{%- if record.metadataOverlay %}
  metadataOverlay: {{ record.metadataOverlay|tojson }},
{%- endif %}
};
"#;

const INDEX_TEMPLATE: &str =
    r#"{% for entry in entries %}export * from {{ ("./" ~ entry)|tojson }};
{% endfor %}"#;

const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with", "yield", "let", "static", "await",
];

/// Turns arbitrary text into a camel-cased JavaScript identifier.
fn to_identifier(text: &str) -> String {
    let mut ident: String = text
        .to_camel_case()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect();

    if ident.is_empty() {
        ident.push_str("file");
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if RESERVED_WORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Identifier of the module generated for `base_name`, e.g. `user-list.tsx`
/// becomes `userListTsx`.
pub fn module_ident(base_name: &str) -> String {
    to_identifier(base_name)
}

/// Name exported by a module: the identifier qualified by its directory so
/// that re-exports from parent indexes do not clash.
pub fn export_name(dir_key: &str, ident: &str) -> String {
    if dir_key.is_empty() {
        ident.to_string()
    } else {
        to_identifier(&format!("{dir_key}/{ident}"))
    }
}

/// Something a directory's index re-exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEntry {
    /// A generated module, by identifier.
    Module(String),
    /// A child directory that has its own index, by directory name.
    Directory(String),
}

impl IndexEntry {
    pub fn import_name(&self) -> &str {
        match self {
            IndexEntry::Module(name) | IndexEntry::Directory(name) => name,
        }
    }
}

/// Per-directory listing of the entries each directory directly contains,
/// keyed by `/` separated directory path (empty for the root).
#[derive(Debug, Default, Clone)]
pub struct DirectoryIndex {
    dirs: IndexMap<String, Vec<IndexEntry>>,
    exports: HashSet<String>,
}

impl DirectoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file under `dir_key` and returns its module identifier,
    /// made unique within the directory.
    pub fn register_file(&mut self, dir_key: &str, base_name: &str) -> String {
        let entries = self.dirs.entry(dir_key.to_string()).or_default();
        let base = module_ident(base_name);

        let taken = |candidate: &str| {
            candidate == INDEX_MODULE || entries.iter().any(|e| e.import_name() == candidate)
        };
        let mut ident = base.clone();
        let mut n = 2;
        while taken(&ident) {
            ident = format!("{base}{n}");
            n += 1;
        }

        entries.push(IndexEntry::Module(ident.clone()));
        ident
    }

    /// Reserves the exported name of module `ident` in `dir_key`.
    ///
    /// Parent indexes re-export everything, so export names are unique
    /// across the whole tree; a clash gets a numeric suffix.
    pub fn register_export(&mut self, dir_key: &str, ident: &str) -> String {
        let base = export_name(dir_key, ident);
        let mut name = base.clone();
        let mut n = 2;
        while self.exports.contains(&name) {
            name = format!("{base}{n}");
            n += 1;
        }
        self.exports.insert(name.clone());
        name
    }

    /// Registers `name` as a child directory with its own index under `parent_key`.
    pub fn register_dir(&mut self, parent_key: &str, name: &str) {
        self.dirs
            .entry(parent_key.to_string())
            .or_default()
            .push(IndexEntry::Directory(name.to_string()));
    }

    pub fn entries(&self, dir_key: &str) -> &[IndexEntry] {
        self.dirs.get(dir_key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Module identifiers directly contained in `dir_key`.
    pub fn modules<'a>(&'a self, dir_key: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries(dir_key).iter().filter_map(|entry| match entry {
            IndexEntry::Module(name) => Some(name.as_str()),
            IndexEntry::Directory(_) => None,
        })
    }

}

/// Writes modules and indexes under an output directory.
pub struct ModuleEmitter<'a> {
    output_dir: PathBuf,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> ModuleEmitter<'a> {
    pub fn new<P: Into<PathBuf>>(output_dir: P, renderer: &'a dyn TemplateRenderer) -> Self {
        Self { output_dir: output_dir.into(), renderer }
    }

    fn dir_path(&self, dir_key: &str) -> PathBuf {
        dir_key
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.output_dir.clone(), |path, segment| path.join(segment))
    }

    fn module_path(&self, dir_key: &str, module: &str) -> PathBuf {
        self.dir_path(dir_key).join(format!("{module}.{MODULE_EXTENSION}"))
    }

    /// Creates the mirrored output directory for `dir_key`.
    ///
    /// # Errors
    /// * `Error::CreateDirError` if the directory cannot be created
    pub fn create_dir(&self, dir_key: &str) -> Result<PathBuf> {
        let path = self.dir_path(dir_key);
        fs::create_dir_all(&path)
            .map_err(|source| Error::CreateDirError { path: path.clone(), source })?;
        Ok(path)
    }

    pub fn write_module(
        &self,
        dir_key: &str,
        ident: &str,
        export_name: &str,
        record: &TemplateRecord,
    ) -> Result<PathBuf> {
        let context = serde_json::json!({
            "ident": ident,
            "export_name": export_name,
            "record": record,
        });
        let content = self.renderer.render(MODULE_TEMPLATE, &context)?;

        let path = self.module_path(dir_key, ident);
        debug!("Writing module: {}", path.display());
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Writes the index of `dir_key` re-exporting `entries`. Nothing is
    /// written for an empty directory.
    pub fn write_index(&self, dir_key: &str, entries: &[IndexEntry]) -> Result<Option<PathBuf>> {
        if entries.is_empty() {
            return Ok(None);
        }

        let names: Vec<&str> = entries.iter().map(IndexEntry::import_name).collect();
        let content = self.renderer.render(INDEX_TEMPLATE, &serde_json::json!({ "entries": names }))?;

        let path = self.module_path(dir_key, INDEX_MODULE);
        debug!("Writing index: {}", path.display());
        fs::write(&path, content)?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MetadataOverlay;
    use crate::renderer::MiniJinjaRenderer;
    use tempfile::TempDir;

    #[test]
    fn test_identifiers() {
        assert_eq!(module_ident("z.js"), "zJs");
        assert_eq!(module_ident("1.txt"), "_1Txt");
        assert_eq!(module_ident("..."), "file");
        assert_eq!(module_ident("class"), "class_");
        assert_eq!(export_name("", "zJs"), "zJs");
    }

    #[test]
    fn test_register_file_is_unique() {
        let mut index = DirectoryIndex::new();
        assert_eq!(index.register_file("lib", "z.js"), "zJs");
        assert_eq!(index.register_file("lib", "z-js"), "zJs2");
        assert_eq!(index.register_file("lib", "index"), "index2");
        assert_eq!(index.register_file("", "z.js"), "zJs");
        index.register_dir("", "lib");

        assert_eq!(index.modules("lib").collect::<Vec<_>>(), vec!["zJs", "zJs2", "index2"]);
        assert_eq!(
            index.entries(""),
            &[IndexEntry::Module("zJs".into()), IndexEntry::Directory("lib".into())]
        );
        assert!(index.entries("missing").is_empty());
    }

    #[test]
    fn test_register_export_is_unique_across_directories() {
        let mut index = DirectoryIndex::new();
        assert_eq!(index.register_export("lib/util", "helperTs"), "libUtilHelperTs");
        assert_eq!(index.register_export("libUtil", "helperTs"), "libUtilHelperTs2");
        assert_eq!(index.register_export("", "libUtilHelperTs"), "libUtilHelperTs3");
        assert_eq!(index.register_export("a-b", "cJs"), "aBCJs");
        assert_eq!(index.register_export("a_b", "cJs"), "aBCJs2");
    }

    #[test]
    fn test_write_module_and_index() {
        let dir = TempDir::new().unwrap();
        let renderer = MiniJinjaRenderer::new();
        let emitter = ModuleEmitter::new(dir.path(), &renderer);

        emitter.create_dir("lib").unwrap();
        let mut overlay = MetadataOverlay::new();
        overlay.insert("title", "Z");
        let record =
            TemplateRecord::new("z", vec!["lib".into()], "let s = `${a}`;\n", "js").with_overlay(Some(overlay));
        let path = emitter.write_module("lib", "zJs", "libZJs", &record).unwrap();
        assert_eq!(path, dir.path().join("lib").join("zJs.ts"));

        let module = fs::read_to_string(&path).unwrap();
        assert!(module.starts_with("const zJsFile = \"let s = `${a}`;\\n\";\n"));
        assert!(module.contains("export const libZJs = {\n"));
        assert!(module.contains("  paths: [\"lib\"],\n"));
        assert!(module.contains("  content: zJsFile,\n"));
        assert!(module.contains("  metadataOverlay: {\"title\":\"Z\"},\n"));
        assert!(module.ends_with("};\n"));

        let entries = vec![IndexEntry::Module("zJs".into()), IndexEntry::Directory("util".into())];
        let index = emitter.write_index("lib", &entries).unwrap().unwrap();
        assert_eq!(
            fs::read_to_string(index).unwrap(),
            "export * from \"./zJs\";\nexport * from \"./util\";\n"
        );

        assert!(emitter.write_index("", &[]).unwrap().is_none());
    }
}
