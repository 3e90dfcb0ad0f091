use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tstmpl::error::Error;
use tstmpl::extract::{extract, ExtractOptions};
use tstmpl::manifest::{read_manifest, write_manifest};
use tstmpl::materialize::materialize;
use tstmpl::overlay::SidecarOverlays;
use tstmpl::record::TemplateRecord;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_materialize_into_missing_dir() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("out");
    let records = vec![TemplateRecord::new("b", vec!["sub".into()], "X", "md")];

    materialize(&records, &target).unwrap();

    assert!(target.join("sub").is_dir());
    assert_eq!(fs::read_to_string(target.join("sub/b.md")).unwrap(), "X");
}

#[test]
fn test_hidden_file_materializes_without_dot() {
    let dir = TempDir::new().unwrap();
    let records = vec![TemplateRecord::new(".env", vec![], "KEY=1\n", "")];

    materialize(&records, dir.path()).unwrap();

    assert_eq!(fs::read_to_string(dir.path().join(".env")).unwrap(), "KEY=1\n");
    assert!(!dir.path().join(".env.").exists());
}

#[test]
fn test_round_trip() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source");
    write(&source, "README.md", "# Project\n");
    write(&source, ".env", "KEY=value\n");
    write(&source, "notes.", "trailing dot\n");
    write(&source, "Makefile", "all:\n\ttrue\n");
    write(&source, "src/main.ts", "console.log(`hi ${name}`);\n");
    write(&source, "src/lib/deep/util.test.ts", "");
    write(&source, "src/page.tsx", "<Page />\n");
    write(&source, "src/page.tsx.tmpl.yaml", "title: Page\ndataSource: pages\n");
    write(&source, "docs/ünïcode.txt", "ünïcödé ✓\n");

    let options = ExtractOptions::new(dir.path().join("tmpl"));
    let extraction = extract(&source, &options, &SidecarOverlays).unwrap();
    assert_eq!(extraction.records.len(), 8);

    let records = read_manifest(options.manifest_path()).unwrap();
    let target = dir.path().join("target");
    materialize(&records, &target).unwrap();

    assert!(!dir_diff::is_different(&source, &target).unwrap());
}

#[test]
fn test_malformed_manifest_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("manifest.json");
    fs::write(&manifest, r#"[{"name": "a", "paths": [], "content": 1}]"#).unwrap();

    let result = read_manifest(&manifest);
    assert!(matches!(result, Err(Error::ManifestParseError { .. })));
}

#[test]
fn test_duplicate_records_are_rejected() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("manifest.json");
    let records = vec![
        TemplateRecord::new("b", vec!["sub".into()], "first", "md"),
        TemplateRecord::new("b", vec!["sub".into()], "second", "md"),
    ];
    write_manifest(&manifest, &records).unwrap();

    let target = dir.path().join("out");
    let result = materialize(&read_manifest(&manifest).unwrap(), &target);

    assert!(matches!(result, Err(Error::DuplicateRecord(_))));
    assert!(!target.exists());
}

#[test]
fn test_order_does_not_matter() {
    let dir = TempDir::new().unwrap();
    let mut records = vec![
        TemplateRecord::new("a", vec!["x".into(), "y".into()], "1", "txt"),
        TemplateRecord::new("b", vec!["x".into()], "2", "txt"),
        TemplateRecord::new("c", vec![], "3", ""),
    ];

    materialize(&records, dir.path().join("forward")).unwrap();
    records.reverse();
    materialize(&records, dir.path().join("reverse")).unwrap();

    assert!(!dir_diff::is_different(dir.path().join("forward"), dir.path().join("reverse")).unwrap());
}

#[test]
fn test_directory_blocked_by_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("out");
    write(&target, "sub", "not a directory");
    let records = vec![TemplateRecord::new("b", vec!["sub".into()], "X", "md")];

    let result = materialize(&records, &target);

    assert!(matches!(result, Err(Error::CreateDirError { path, .. }) if path == target.join("sub")));
    assert_eq!(fs::read_to_string(target.join("sub")).unwrap(), "not a directory");
}

#[test]
fn test_records_sharing_a_file_are_rejected() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("out");
    let records = vec![
        TemplateRecord::new("a", vec![], "first", "txt"),
        TemplateRecord::new("a.txt", vec![], "second", ""),
    ];

    let result = materialize(&records, &target);

    assert!(matches!(result, Err(Error::DuplicateRecord(p)) if p == "a.txt"));
    assert!(!target.exists());
}
