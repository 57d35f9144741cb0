//! Routes installed paths into packages.
//!
//! The generator holds an insertion-ordered registry of rules and the set of
//! packages created so far. Each path is routed once, to the package named by
//! its highest-priority matching rule, or to `main` when nothing matches, so a
//! file can never be left without an owner. Subpackages effectively take files
//! away from `main`.
//!
//! Among rules of equal priority the one registered first wins. Inside a
//! [`Package`], [`Package::get_pattern`] breaks the same tie differently: it
//! walks captures in [`PathPattern`] value order, so the lexicographically
//! smallest expression wins there. Routing only ever consults the generator's
//! registry, so the two rules never disagree about which package owns a path.

use super::package::Package;
use super::pattern::{best_match, normalize_path, PathPattern, PRIORITY_DEFAULT, PRIORITY_USER};
use crate::error::Result;
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Package receiving every path no rule claims.
pub const MAIN_PACKAGE: &str = "main";

/// Rules seeded into every generator built with [`PackageGenerator::new`],
/// in registration order, at [`PRIORITY_DEFAULT`].
pub const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("/usr/lib64/lib*.so", "devel"),
    ("/usr/lib64/lib*.a", "devel"),
    ("/usr/lib/lib*.so", "devel"),
    ("/usr/lib/lib*.a", "devel"),
    ("/usr/lib/pkgconfig/*.pc", "devel"),
    ("/usr/lib64/pkgconfig/*.pc", "devel"),
    ("/usr/include/", "devel"),
    ("/usr/share/man3/", "devel"),
    ("/usr/lib32/lib*.so", "32bit-devel"),
    ("/usr/lib32/lib*.a", "32bit-devel"),
    ("/usr/lib32/pkgconfig/*.pc", "32bit-devel"),
    ("/usr/lib32/lib*.so.*", "32bit"),
];

/// Lifecycle of a generator. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Registering,
    Ingesting,
    Finalized,
}

impl GeneratorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorState::Registering => "registering",
            GeneratorState::Ingesting => "ingesting",
            GeneratorState::Finalized => "finalized",
        }
    }
}

/// A registry entry: a rule and the package it routes to.
#[derive(Debug, Clone)]
pub struct RegisteredPattern {
    pub pattern: PathPattern,
    pub target: String,
}

#[derive(Debug)]
pub struct PackageGenerator {
    registry: Vec<RegisteredPattern>,
    packages: BTreeMap<String, Package>,
    state: GeneratorState,
}

impl PackageGenerator {
    /// Create a generator seeded with [`BUILTIN_PATTERNS`].
    pub fn new() -> Result<Self> {
        let mut generator = Self::empty();
        for (expression, target) in BUILTIN_PATTERNS {
            generator.add_pattern(expression, target, PRIORITY_DEFAULT)?;
        }
        Ok(generator)
    }

    /// Create a generator with no rules at all.
    pub fn empty() -> Self {
        Self {
            registry: Vec::new(),
            packages: BTreeMap::new(),
            state: GeneratorState::Registering,
        }
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Register a rule routing matches of `expression` to `target`.
    ///
    /// Registering a pattern equal to an existing one retargets that entry and
    /// keeps its place in the registry.
    pub fn add_pattern(&mut self, expression: &str, target: &str, priority: i32) -> Result<()> {
        if self.state != GeneratorState::Registering {
            warn!(
                "Pattern '{}' registered while {}; paths already routed are not revisited",
                expression,
                self.state.as_str()
            );
        }

        let pattern = PathPattern::new(expression, priority)?;
        debug!(
            "Registering {} pattern '{}' -> {} (priority {})",
            if pattern.is_prefix() { "prefix" } else { "glob" },
            expression,
            target,
            priority
        );

        match self.registry.iter_mut().find(|entry| entry.pattern == pattern) {
            Some(existing) => existing.target = target.to_string(),
            None => self.registry.push(RegisteredPattern {
                pattern,
                target: target.to_string(),
            }),
        }
        Ok(())
    }

    pub fn add_default_pattern(&mut self, expression: &str, target: &str) -> Result<()> {
        self.add_pattern(expression, target, PRIORITY_DEFAULT)
    }

    pub fn add_user_pattern(&mut self, expression: &str, target: &str) -> Result<()> {
        self.add_pattern(expression, target, PRIORITY_USER)
    }

    /// Registry entries in registration order.
    pub fn patterns(&self) -> &[RegisteredPattern] {
        &self.registry
    }

    fn resolve(&self, path: &str) -> Option<&RegisteredPattern> {
        let normalized = normalize_path(path);
        let matching = self
            .registry
            .iter()
            .filter(|entry| entry.pattern.matches_normalized(&normalized));
        best_match(matching, |entry| &entry.pattern)
    }

    /// The winning rule for `path`. `None` means the path belongs in `main`.
    pub fn get_pattern(&self, path: &str) -> Option<&PathPattern> {
        self.resolve(path).map(|entry| &entry.pattern)
    }

    /// Name of the package `add_file` would route `path` to.
    pub fn target_for(&self, path: &str) -> &str {
        self.resolve(path)
            .map(|entry| entry.target.as_str())
            .unwrap_or(MAIN_PACKAGE)
    }

    /// Route `path` into exactly one package, creating it if needed.
    ///
    /// If another package already owns the path it is retracted from there
    /// first, so ownership stays unique even when rules change mid-run. After
    /// finalization the target may hold the path in its excluded set; that
    /// exclusion is lifted, since the path now belongs to the target alone.
    pub fn add_file(&mut self, path: &str) {
        match self.state {
            GeneratorState::Registering => self.state = GeneratorState::Ingesting,
            GeneratorState::Ingesting => {}
            GeneratorState::Finalized => {
                warn!("File '{}' added after packages were emitted", path);
            }
        }

        let (pattern, target) = match self.resolve(path) {
            Some(entry) => (Some(entry.pattern.clone()), entry.target.clone()),
            None => (None, MAIN_PACKAGE.to_string()),
        };

        for (name, package) in self.packages.iter_mut() {
            if *name != target && package.owns(path) {
                debug!("Retracting {} from {} in favour of {}", path, name, target);
                package.remove_file(path);
            }
        }

        debug!(
            "{} -> {} ({})",
            path,
            target,
            pattern
                .as_ref()
                .map(|pattern| pattern.expression())
                .unwrap_or("no rule")
        );

        let package = self
            .packages
            .entry(target.clone())
            .or_insert_with(|| Package::new(target.as_str()));
        if package.is_excluded(path) {
            debug!("Readmitting {} to {}", path, target);
            package.readmit_file(path);
        }
        package.add_file(pattern.as_ref(), path);
    }

    /// Remove `path` from whichever package owns it.
    pub fn remove_file(&mut self, path: &str) {
        for package in self.packages.values_mut() {
            package.remove_file(path);
        }
    }

    /// Finalize and return every package.
    ///
    /// Each package excludes every file emitted by any other package, which
    /// guarantees the emitted lists are disjoint. Calling this again repeats the
    /// pass without changing any file set. There is no guarantee a `main`
    /// package exists: rules may claim every file.
    pub fn emit_packages(&mut self) -> &BTreeMap<String, Package> {
        let names: Vec<String> = self.packages.keys().cloned().collect();

        for name in &names {
            for other in &names {
                if other == name {
                    continue;
                }
                let theirs = match self.packages.get(other) {
                    Some(package) => package.emit_files(),
                    None => continue,
                };
                if let Some(package) = self.packages.get_mut(name) {
                    for path in &theirs {
                        if package.owns(path) && !package.is_excluded(path) {
                            warn!(
                                "{} claimed by both {} and {}; keeping it in {}",
                                path, name, other, other
                            );
                        }
                        package.exclude_file(path);
                    }
                }
            }
        }

        if self.state != GeneratorState::Finalized {
            info!(
                "Finalized {} package(s) from {} rule(s)",
                self.packages.len(),
                self.registry.len()
            );
        }
        self.state = GeneratorState::Finalized;
        &self.packages
    }

    pub fn packages(&self) -> &BTreeMap<String, Package> {
        &self.packages
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn into_packages(self) -> BTreeMap<String, Package> {
        self.packages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files_of(generator: &PackageGenerator, name: &str) -> Vec<String> {
        generator
            .package(name)
            .map(|package| package.emit_files())
            .unwrap_or_default()
    }

    #[test]
    fn test_builtins_are_seeded_in_order() {
        let generator = PackageGenerator::new().unwrap();
        let registered: Vec<(&str, &str)> = generator
            .patterns()
            .iter()
            .map(|entry| (entry.pattern.expression(), entry.target.as_str()))
            .collect();
        assert_eq!(registered, BUILTIN_PATTERNS.to_vec());
        assert!(generator
            .patterns()
            .iter()
            .all(|entry| entry.pattern.priority() == PRIORITY_DEFAULT));
        assert_eq!(generator.state(), GeneratorState::Registering);
    }

    #[test]
    fn test_builtin_routing() {
        let generator = PackageGenerator::new().unwrap();
        assert_eq!(generator.target_for("/usr/lib64/libfoo.so"), "devel");
        assert_eq!(generator.target_for("/usr/lib/libfoo.a"), "devel");
        assert_eq!(generator.target_for("/usr/lib64/pkgconfig/foo.pc"), "devel");
        assert_eq!(generator.target_for("/usr/include/foo/bar.h"), "devel");
        assert_eq!(generator.target_for("/usr/share/man3/foo.3"), "devel");
        assert_eq!(generator.target_for("/usr/lib32/libfoo.so"), "32bit-devel");
        assert_eq!(generator.target_for("/usr/lib32/pkgconfig/foo.pc"), "32bit-devel");
        assert_eq!(generator.target_for("/usr/lib32/libfoo.so.1.2"), "32bit");
        assert_eq!(generator.target_for("/usr/lib64/libfoo.so.1"), MAIN_PACKAGE);
    }

    #[test]
    fn test_devel_library_and_binary() {
        let mut generator = PackageGenerator::new().unwrap();
        generator.add_file("/usr/lib64/libfoo.so");
        generator.add_file("/usr/bin/foo");
        generator.emit_packages();

        assert_eq!(files_of(&generator, "devel"), vec!["/usr/lib64/libfoo.so"]);
        assert_eq!(files_of(&generator, MAIN_PACKAGE), vec!["/usr/bin/foo"]);
        assert_eq!(generator.packages().len(), 2);
    }

    #[test]
    fn test_user_prefix_rule_routes_docs() {
        let mut generator = PackageGenerator::new().unwrap();
        generator.add_default_pattern("/usr/share/*", "data").unwrap();
        generator.add_user_pattern("/usr/share/doc/", "docs").unwrap();

        let pattern = generator.get_pattern("/usr/share/doc/README").unwrap();
        assert!(pattern.is_prefix());

        generator.add_file("/usr/share/doc/README");
        generator.emit_packages();

        assert_eq!(files_of(&generator, "docs"), vec!["/usr/share/doc/README"]);
        assert!(generator.package(MAIN_PACKAGE).is_none());
        assert!(generator.package("data").is_none());
    }

    #[test]
    fn test_unmatched_path_goes_to_main() {
        let mut generator = PackageGenerator::new().unwrap();
        assert!(generator.get_pattern("/opt/custom/tool").is_none());
        generator.add_file("/opt/custom/tool");
        generator.emit_packages();
        assert_eq!(files_of(&generator, MAIN_PACKAGE), vec!["/opt/custom/tool"]);
    }

    #[test]
    fn test_emit_packages_twice_changes_nothing() {
        let mut generator = PackageGenerator::new().unwrap();
        for path in ["/usr/lib64/libfoo.so", "/usr/bin/foo", "/usr/include/foo.h"] {
            generator.add_file(path);
        }

        let first: Vec<(String, Vec<String>)> = generator
            .emit_packages()
            .iter()
            .map(|(name, package)| (name.clone(), package.emit_files()))
            .collect();
        let second: Vec<(String, Vec<String>)> = generator
            .emit_packages()
            .iter()
            .map(|(name, package)| (name.clone(), package.emit_files()))
            .collect();

        assert_eq!(first, second);
        assert_eq!(generator.state(), GeneratorState::Finalized);
    }

    #[test]
    fn test_user_rule_wins_regardless_of_order() {
        let mut user_first = PackageGenerator::empty();
        user_first.add_user_pattern("/usr/lib64/libfoo.so", "special").unwrap();
        user_first.add_default_pattern("/usr/lib64/lib*.so", "devel").unwrap();

        let mut user_last = PackageGenerator::empty();
        user_last.add_default_pattern("/usr/lib64/lib*.so", "devel").unwrap();
        user_last.add_user_pattern("/usr/lib64/libfoo.so", "special").unwrap();

        assert_eq!(user_first.target_for("/usr/lib64/libfoo.so"), "special");
        assert_eq!(user_last.target_for("/usr/lib64/libfoo.so"), "special");
    }

    #[test]
    fn test_equal_priority_tie_goes_to_first_registered() {
        let mut generator = PackageGenerator::empty();
        generator.add_default_pattern("/usr/share/*", "data").unwrap();
        generator.add_default_pattern("/usr/share/doc/", "docs").unwrap();
        assert_eq!(generator.target_for("/usr/share/doc/README"), "data");

        let mut reversed = PackageGenerator::empty();
        reversed.add_default_pattern("/usr/share/doc/", "docs").unwrap();
        reversed.add_default_pattern("/usr/share/*", "data").unwrap();
        assert_eq!(reversed.target_for("/usr/share/doc/README"), "docs");
    }

    #[test]
    fn test_reregistering_pattern_retargets_in_place() {
        let mut generator = PackageGenerator::empty();
        generator.add_default_pattern("/usr/share/*", "data").unwrap();
        generator.add_default_pattern("/usr/share/doc/", "docs").unwrap();
        generator.add_default_pattern("/usr/share/*", "share").unwrap();

        assert_eq!(generator.patterns().len(), 2);
        assert_eq!(generator.patterns()[0].target, "share");
        assert_eq!(generator.target_for("/usr/share/doc/README"), "share");
    }

    #[test]
    fn test_invalid_pattern_fails_at_registration() {
        let mut generator = PackageGenerator::new().unwrap();
        assert!(generator.add_user_pattern("/usr/{lib,lib64", "devel").is_err());
        assert_eq!(generator.patterns().len(), BUILTIN_PATTERNS.len());
    }

    #[test]
    fn test_late_rule_reroutes_without_duplication() {
        let mut generator = PackageGenerator::new().unwrap();
        generator.add_file("/usr/share/doc/README");
        assert_eq!(generator.state(), GeneratorState::Ingesting);

        generator.add_user_pattern("/usr/share/doc/", "docs").unwrap();
        generator.add_file("/usr/share/doc/README");
        generator.emit_packages();

        assert!(files_of(&generator, MAIN_PACKAGE).is_empty());
        assert_eq!(files_of(&generator, "docs"), vec!["/usr/share/doc/README"]);
    }

    #[test]
    fn test_reroute_after_finalization_keeps_single_owner() {
        let readme = "/usr/share/doc/README";
        let mut generator = PackageGenerator::new().unwrap();
        generator.add_file(readme);
        generator.add_file("/usr/include/foo.h");
        generator.emit_packages();
        assert!(generator.package("devel").unwrap().is_excluded(readme));

        generator.add_user_pattern("/usr/share/doc/", "devel").unwrap();
        generator.add_file(readme);
        generator.emit_packages();

        let owners: Vec<&String> = generator
            .packages()
            .iter()
            .filter(|(_, package)| package.emit_files().iter().any(|path| path == readme))
            .map(|(name, _)| name)
            .collect();
        assert_eq!(owners, vec!["devel"]);
        assert!(files_of(&generator, MAIN_PACKAGE).is_empty());
    }

    #[test]
    fn test_readd_after_removal_post_finalization_is_emitted() {
        let mut generator = PackageGenerator::new().unwrap();
        generator.add_file("/usr/include/foo.h");
        generator.add_file("/usr/bin/foo");
        generator.emit_packages();

        generator.remove_file("/usr/bin/foo");
        generator.add_file("/usr/bin/foo");
        generator.emit_packages();

        assert_eq!(files_of(&generator, MAIN_PACKAGE), vec!["/usr/bin/foo"]);
        assert_eq!(files_of(&generator, "devel"), vec!["/usr/include/foo.h"]);
    }

    #[test]
    fn test_absolute_alternation_rule_routes_docs() {
        let mut generator = PackageGenerator::new().unwrap();
        generator
            .add_user_pattern("{/usr/share/doc/*,/usr/share/info/*}", "docs")
            .unwrap();
        assert_eq!(generator.target_for("/usr/share/doc/README"), "docs");
        assert_eq!(generator.target_for("/usr/share/info/zlib.info"), "docs");
        assert_eq!(generator.target_for("/usr/share/man/man1/foo.1"), MAIN_PACKAGE);
    }

    #[test]
    fn test_remove_file_broadcasts() {
        let mut generator = PackageGenerator::new().unwrap();
        generator.add_file("/usr/include/foo.h");
        generator.add_file("/usr/bin/foo");

        generator.remove_file("/usr/include/foo.h");
        generator.remove_file("/usr/include/foo.h");
        generator.remove_file("/never/added");
        generator.emit_packages();

        assert!(files_of(&generator, "devel").is_empty());
        assert_eq!(files_of(&generator, MAIN_PACKAGE), vec!["/usr/bin/foo"]);
    }

    #[test]
    fn test_relative_paths_use_same_rules() {
        let mut generator = PackageGenerator::new().unwrap();
        generator.add_file("usr/include/foo.h");
        generator.emit_packages();
        assert_eq!(files_of(&generator, "devel"), vec!["usr/include/foo.h"]);
    }

    #[test]
    fn test_capture_groups_record_winning_rule() {
        let mut generator = PackageGenerator::new().unwrap();
        generator.add_file("/usr/include/a.h");
        generator.add_file("/usr/include/b.h");
        generator.add_file("/usr/lib64/libfoo.so");
        generator.emit_packages();

        let devel = generator.package("devel").unwrap();
        assert_eq!(
            devel.emit_files_by_pattern(),
            vec!["/usr/include/", "/usr/lib64/lib*.so"]
        );
    }

    #[test]
    fn test_empty_generator_routes_everything_to_main() {
        let mut generator = PackageGenerator::empty();
        generator.add_file("/usr/lib64/libfoo.so");
        let packages = generator.into_packages();
        assert_eq!(packages.len(), 1);
        assert!(packages.contains_key(MAIN_PACKAGE));
    }
}
