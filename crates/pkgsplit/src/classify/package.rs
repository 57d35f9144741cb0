//! A single output bucket and the files routed into it.

use super::pattern::{best_match, normalize_path, PathPattern};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// What captured a file inside a package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capture {
    Rule(PathPattern),
    /// Fallback for files that arrived without a matching rule.
    DefaultPolicy,
}

impl Capture {
    pub fn pattern(&self) -> Option<&PathPattern> {
        match self {
            Capture::Rule(pattern) => Some(pattern),
            Capture::DefaultPolicy => None,
        }
    }

    pub fn is_default_policy(&self) -> bool {
        matches!(self, Capture::DefaultPolicy)
    }
}

impl fmt::Display for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capture::Rule(pattern) => write!(f, "{}", pattern),
            Capture::DefaultPolicy => f.write_str("<default>"),
        }
    }
}

static DEFAULT_POLICY: Capture = Capture::DefaultPolicy;

/// Files owned by one output package, grouped by capture.
///
/// `files` is always the union of every set in `captures`. Paths in
/// `excluded` never reach the emitted lists, even if captured again later.
#[derive(Debug, Clone)]
pub struct Package {
    name: String,
    files: BTreeSet<String>,
    captures: BTreeMap<Capture, BTreeSet<String>>,
    excluded: BTreeSet<String>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: BTreeSet::new(),
            captures: BTreeMap::new(),
            excluded: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `path` under `pattern`, or under the default policy when `None`.
    pub fn add_file(&mut self, pattern: Option<&PathPattern>, path: impl Into<String>) {
        let path = path.into();
        let capture = match pattern {
            Some(pattern) => Capture::Rule(pattern.clone()),
            None => Capture::DefaultPolicy,
        };
        self.captures
            .entry(capture)
            .or_default()
            .insert(path.clone());
        self.files.insert(path);
    }

    /// Remove `path` if this package owns it. Unknown paths are ignored.
    pub fn remove_file(&mut self, path: &str) {
        if !self.files.remove(path) {
            return;
        }

        let located = self.get_pattern(path).clone();
        let removed = self
            .captures
            .get_mut(&located)
            .map(|files| files.remove(path))
            .unwrap_or(false);

        // Equal-priority rules can overlap; fall back to whichever capture holds it.
        if !removed {
            for files in self.captures.values_mut() {
                if files.remove(path) {
                    break;
                }
            }
        }
    }

    /// Remove `path` and keep it out of every emitted list for good.
    pub fn exclude_file(&mut self, path: &str) {
        self.remove_file(path);
        self.excluded.insert(path.to_string());
    }

    /// Lift the exclusion on `path` so it can be emitted here again.
    ///
    /// Only the generator calls this, when it hands ownership of `path` to
    /// this package after finalization excluded it.
    pub(crate) fn readmit_file(&mut self, path: &str) {
        self.excluded.remove(path);
    }

    /// The highest-priority captured rule matching `path`.
    ///
    /// Only rules this package has captured files under are considered. Ties go
    /// to the rule that sorts first. Returns the default policy when none match.
    pub fn get_pattern(&self, path: &str) -> &Capture {
        let normalized = normalize_path(path);
        let matching = self
            .captures
            .keys()
            .filter_map(|capture| capture.pattern().map(|pattern| (capture, pattern)))
            .filter(|(_, pattern)| pattern.matches_normalized(&normalized));

        best_match(matching, |entry| entry.1)
            .map(|(capture, _)| capture)
            .unwrap_or(&DEFAULT_POLICY)
    }

    pub fn owns(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded.contains(path)
    }

    /// True when nothing would be emitted.
    pub fn is_empty(&self) -> bool {
        self.files.iter().all(|path| self.excluded.contains(path))
    }

    pub fn captures(&self) -> impl Iterator<Item = (&Capture, &BTreeSet<String>)> {
        self.captures.iter()
    }

    /// Sorted file list, minus exclusions.
    pub fn emit_files(&self) -> Vec<String> {
        self.captures
            .values()
            .flatten()
            .filter(|path| !self.excluded.contains(*path))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted declarations: one pattern entry per rule with surviving files,
    /// plus every default-policy file listed on its own.
    pub fn emit_files_by_pattern(&self) -> Vec<String> {
        let mut declarations = BTreeSet::new();

        for (capture, files) in &self.captures {
            let mut surviving = files
                .iter()
                .filter(|path| !self.excluded.contains(*path))
                .peekable();
            if surviving.peek().is_none() {
                continue;
            }

            match capture {
                Capture::DefaultPolicy => declarations.extend(surviving.cloned()),
                Capture::Rule(pattern) => {
                    declarations.insert(pattern.to_string());
                }
            }
        }

        declarations.into_iter().collect()
    }
}
