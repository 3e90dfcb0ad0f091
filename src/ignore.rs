//! File and directory ignore pattern handling.
//! Processes .gitignore-style files into a set of rules that exclude
//! relative paths from traversal and output.

use crate::constants::DEFAULT_IGNORE_PATTERNS;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log::{debug, info, warn};
use std::{fs::read_to_string, io, path::Path};

/// A single exclusion pattern together with its compiled matcher.
///
/// `*` is the only wildcard and never crosses a `/`; every other character is
/// matched literally. An unanchored rule matches the whole path, a leading
/// run of segments, a trailing run of segments, an inner run of segments, or
/// any single segment, so a bare directory name excludes that directory
/// anywhere in the tree.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pattern: String,
    anchored: bool,
    matcher: Option<GlobSet>,
}

impl IgnoreRule {
    /// Compiles a rule. A leading `/` anchors it to the root, a trailing `/`
    /// is dropped. A pattern that fails to compile is kept but never matches.
    pub fn new(pattern: &str) -> Self {
        let anchored = pattern.starts_with('/');
        let pattern = pattern.trim_start_matches('/').trim_end_matches('/').to_string();

        let matcher = match compile(&pattern, anchored) {
            Ok(set) => Some(set),
            Err(e) => {
                warn!("Ignore pattern '{pattern}' is malformed and will never match: {e}");
                None
            }
        };

        Self { pattern, anchored, matcher }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Matches an already normalized relative path (`/` separated, no leading `/`).
    pub fn is_match(&self, path: &str) -> bool {
        let Some(matcher) = &self.matcher else {
            debug!("Skipping malformed ignore pattern '{}' for '{}'", self.pattern, path);
            return false;
        };

        if matcher.is_match(path) {
            return true;
        }

        !self.anchored && path.split('/').any(|segment| segment == self.pattern)
    }
}

fn compile(pattern: &str, anchored: bool) -> Result<GlobSet, globset::Error> {
    let literal = pattern.split('*').map(globset::escape).collect::<Vec<_>>().join("*");

    let forms = if anchored {
        vec![literal.clone(), format!("{literal}/**")]
    } else {
        vec![
            literal.clone(),
            format!("{literal}/**"),
            format!("**/{literal}"),
            format!("**/{literal}/**"),
        ]
    };

    let mut builder = GlobSetBuilder::new();
    for form in forms {
        builder.add(GlobBuilder::new(&form).literal_separator(true).build()?);
    }
    builder.build()
}

/// Decides whether relative paths are excluded.
///
/// Built once per run and immutable afterwards. The built-in exclusions are
/// always part of the rule set.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    pub fn builder() -> IgnoreMatcherBuilder {
        IgnoreMatcherBuilder::new()
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    /// Returns a copy of this matcher with additional exclusions.
    pub fn with_exclusions<I, S>(&self, patterns: I) -> IgnoreMatcher
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = self.rules.clone();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            if !rules.iter().any(|rule| rule.pattern() == pattern.trim_matches('/')) {
                rules.push(IgnoreRule::new(pattern));
            }
        }
        IgnoreMatcher { rules }
    }

    /// Returns true when any rule matches `relative_path`.
    ///
    /// The root itself (an empty path) is never ignored.
    pub fn is_ignored(&self, relative_path: &str) -> bool {
        let path = relative_path.trim_start_matches("./").trim_start_matches('/');
        if path.is_empty() {
            return false;
        }

        match self.rules.iter().find(|rule| rule.is_match(path)) {
            Some(rule) => {
                debug!("'{}' ignored by pattern '{}'", path, rule.pattern());
                true
            }
            None => false,
        }
    }
}

impl Default for IgnoreMatcher {
    fn default() -> Self {
        IgnoreMatcherBuilder::new().build()
    }
}

/// Collects patterns from the built-in defaults, ignore files and explicit
/// exclusions, then compiles them into an [`IgnoreMatcher`].
#[derive(Debug, Default, Clone)]
pub struct IgnoreMatcherBuilder {
    patterns: Vec<String>,
}

impl IgnoreMatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single exclusion pattern. Blank patterns are dropped.
    pub fn add<S: Into<String>>(&mut self, pattern: S) -> &mut Self {
        let pattern = pattern.into();
        let trimmed = pattern.trim();
        if trimmed.is_empty() || trimmed.trim_matches('/').is_empty() {
            return self;
        }
        self.patterns.push(trimmed.to_string());
        self
    }

    /// Adds every pattern from an ignore file. A missing file adds nothing.
    pub fn add_ignore_file<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        for pattern in parse_ignore_file(path) {
            self.add(pattern);
        }
        self
    }

    pub fn build(&self) -> IgnoreMatcher {
        let mut seen = Vec::<&str>::new();
        let mut rules = Vec::new();

        let patterns = DEFAULT_IGNORE_PATTERNS
            .iter()
            .copied()
            .chain(self.patterns.iter().map(String::as_str));
        for pattern in patterns {
            if seen.contains(&pattern) {
                continue;
            }
            seen.push(pattern);
            rules.push(IgnoreRule::new(pattern));
        }

        IgnoreMatcher { rules }
    }
}

/// Reads an ignore file and returns its patterns.
///
/// # Notes
/// - A missing file yields an empty list
/// - Lines starting with `#` and blank lines are discarded
/// - Negated (`!`) patterns are not supported and are skipped
///
/// # Example
/// ```ignore
/// # Contents of .gitignore:
/// target/
/// *.log
/// ```
pub fn parse_ignore_file<P: AsRef<Path>>(path: P) -> Vec<String> {
    let path = path.as_ref();
    let contents = match read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No ignore file at '{}'", path.display());
            return Vec::new();
        }
        Err(e) => {
            warn!("Failed to read ignore file '{}': {}", path.display(), e);
            return Vec::new();
        }
    };

    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| {
            if line.starts_with('!') {
                info!("Negated ignore pattern '{line}' is not supported, skipping");
                return false;
            }
            true
        })
        .map(str::to_string)
        .collect()
}
