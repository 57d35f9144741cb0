//! User pattern rules loaded from TOML.
//!
//! ```toml
//! [[patterns]]
//! pattern = "/usr/share/doc/"
//! package = "docs"
//!
//! [[patterns]]
//! pattern = "/usr/lib64/*.la"
//! package = "devel"
//! priority = 50
//! ```
//!
//! Rules are registered in file order at [`PRIORITY_USER`] unless a rule
//! carries its own priority.

use super::generator::PackageGenerator;
use super::pattern::{PathPattern, PRIORITY_USER};
use crate::error::{PkgsplitError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single user rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    /// Glob or directory prefix (trailing `/`)
    pub pattern: String,
    /// Package the matching files go to
    pub package: String,
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    PRIORITY_USER
}

/// Complete user rules file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternRules {
    #[serde(default)]
    pub patterns: Vec<PatternRule>,
}

impl PatternRules {
    /// Load rules from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PkgsplitError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse rules from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let rules: PatternRules = toml::from_str(toml_str)
            .map_err(|e| PkgsplitError::Config(format!("Failed to parse TOML: {}", e)))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Check names are present and every pattern compiles.
    pub fn validate(&self) -> Result<()> {
        for (index, rule) in self.patterns.iter().enumerate() {
            if rule.pattern.trim().is_empty() {
                return Err(PkgsplitError::Config(format!(
                    "Rule #{} has an empty pattern",
                    index + 1
                )));
            }
            if rule.package.trim().is_empty() {
                return Err(PkgsplitError::Config(format!(
                    "Rule '{}' has an empty package name",
                    rule.pattern
                )));
            }
            PathPattern::new(rule.pattern.as_str(), rule.priority)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Register every rule with the generator, in file order.
    pub fn register(&self, generator: &mut PackageGenerator) -> Result<()> {
        for rule in &self.patterns {
            generator.add_pattern(&rule.pattern, &rule.package, rule.priority)?;
        }
        Ok(())
    }

    /// Save rules to a TOML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }
}
