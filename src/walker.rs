//! Depth-first filesystem traversal with pluggable callbacks.

use crate::error::Result;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Callbacks invoked by [`walk`].
///
/// An `Err` returned from any callback aborts the walk and is handed back to
/// the caller of [`walk`].
pub trait Visitor {
    /// Called for every regular file.
    fn visit_file(&mut self, path: &Path) -> Result<()>;

    /// Called before a directory's children are visited. Returning `false`
    /// skips the whole subtree, and [`Visitor::leave_dir`] is not called for it.
    fn enter_dir(&mut self, _path: &Path) -> Result<bool> {
        Ok(true)
    }

    /// Called once every child of the directory has been visited.
    fn leave_dir(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Walks `root` depth-first, children in file name order.
///
/// A root that does not exist is a no-op. Links are followed. Entries that
/// cannot be read (e.g. a directory without read permission) are logged and
/// skipped.
pub fn walk<P: AsRef<Path>, V: Visitor + ?Sized>(root: P, visitor: &mut V) -> Result<()> {
    let root = root.as_ref();
    if !root.exists() {
        debug!("'{}' does not exist, nothing to walk", root.display());
        return Ok(());
    }

    // Directories entered but not yet left, with their depth.
    let mut open: Vec<(usize, PathBuf)> = Vec::new();

    let mut entries = WalkDir::new(root).follow_links(true).sort_by_file_name().into_iter();
    while let Some(entry) = entries.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };

        leave_dirs(&mut open, entry.depth(), visitor)?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            if visitor.enter_dir(entry.path())? {
                open.push((entry.depth(), entry.into_path()));
            } else {
                debug!("Not descending into '{}'", entry.path().display());
                entries.skip_current_dir();
            }
        } else if file_type.is_file() {
            visitor.visit_file(entry.path())?;
        } else {
            debug!("Skipping special file '{}'", entry.path().display());
        }
    }

    leave_dirs(&mut open, 0, visitor)
}

/// Leaves every open directory at `depth` or deeper, innermost first.
fn leave_dirs<V: Visitor + ?Sized>(
    open: &mut Vec<(usize, PathBuf)>,
    depth: usize,
    visitor: &mut V,
) -> Result<()> {
    while open.last().is_some_and(|(open_depth, _)| *open_depth >= depth) {
        if let Some((_, dir)) = open.pop() {
            visitor.leave_dir(&dir)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        root: PathBuf,
        events: Vec<String>,
        veto: Vec<&'static str>,
    }

    impl Recorder {
        fn rel(&self, path: &Path) -> String {
            path.strip_prefix(&self.root).unwrap().to_string_lossy().replace('\\', "/")
        }
    }

    impl Visitor for Recorder {
        fn visit_file(&mut self, path: &Path) -> Result<()> {
            let rel = self.rel(path);
            self.events.push(format!("file {rel}"));
            Ok(())
        }

        fn enter_dir(&mut self, path: &Path) -> Result<bool> {
            let rel = self.rel(path);
            self.events.push(format!("enter {rel}"));
            Ok(!self.veto.contains(&rel.as_str()))
        }

        fn leave_dir(&mut self, path: &Path) -> Result<()> {
            let rel = self.rel(path);
            self.events.push(format!("leave {rel}"));
            Ok(())
        }
    }

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::create_dir_all(dir.path().join("c")).unwrap();
        fs::write(dir.path().join("a/b/deep.txt"), "").unwrap();
        fs::write(dir.path().join("a/one.txt"), "").unwrap();
        fs::write(dir.path().join("c/two.txt"), "").unwrap();
        fs::write(dir.path().join("top.txt"), "").unwrap();
        dir
    }

    #[test]
    fn test_order_and_callbacks() {
        let dir = tree();
        let mut recorder = Recorder { root: dir.path().to_path_buf(), ..Default::default() };
        walk(dir.path(), &mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            vec![
                "enter ",
                "enter a",
                "enter a/b",
                "file a/b/deep.txt",
                "leave a/b",
                "file a/one.txt",
                "leave a",
                "enter c",
                "file c/two.txt",
                "leave c",
                "file top.txt",
                "leave ",
            ]
        );
    }

    #[test]
    fn test_veto_skips_subtree() {
        let dir = tree();
        let mut recorder =
            Recorder { root: dir.path().to_path_buf(), veto: vec!["a"], ..Default::default() };
        walk(dir.path(), &mut recorder).unwrap();

        assert!(recorder.events.contains(&"enter a".to_string()));
        assert!(!recorder.events.iter().any(|e| e.contains("a/") || e == "leave a"));
        assert!(recorder.events.contains(&"file c/two.txt".to_string()));
    }

    #[test]
    fn test_missing_root_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut recorder = Recorder { root: dir.path().to_path_buf(), ..Default::default() };
        walk(dir.path().join("missing"), &mut recorder).unwrap();
        assert!(recorder.events.is_empty());
    }

    #[test]
    fn test_file_root() {
        let dir = tree();
        let mut recorder = Recorder { root: dir.path().to_path_buf(), ..Default::default() };
        walk(dir.path().join("top.txt"), &mut recorder).unwrap();
        assert_eq!(recorder.events, vec!["file top.txt"]);
    }
}
