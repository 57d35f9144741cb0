use crate::classify::{PackageGenerator, PatternRules};
use crate::error::Result;
use log::debug;
use std::path::PathBuf;
use xdg::BaseDirectories;

pub const PATTERNS_ENV: &str = "PKGSPLIT_PATTERNS";
const PATTERNS_FILE: &str = "patterns.toml";

pub struct Config {
    /// User rules file, if one was given or found
    pub patterns_path: Option<PathBuf>,
    /// Seed the generator with the built-in rules
    pub builtins: bool,
}

impl Config {
    /// Resolve the rules file: explicit override, then `PKGSPLIT_PATTERNS`,
    /// then `$XDG_CONFIG_HOME/pkgsplit/patterns.toml`.
    pub fn new(patterns_override: Option<PathBuf>, builtins: bool) -> Self {
        let patterns_path = if let Some(path) = patterns_override {
            Some(path)
        } else if let Ok(env_path) = std::env::var(PATTERNS_ENV) {
            Some(PathBuf::from(env_path))
        } else {
            BaseDirectories::with_prefix("pkgsplit")
                .ok()
                .and_then(|xdg| xdg.find_config_file(PATTERNS_FILE))
        };

        Self {
            patterns_path,
            builtins,
        }
    }

    pub fn load_rules(&self) -> Result<PatternRules> {
        match &self.patterns_path {
            Some(path) => {
                debug!("Loading user patterns from {}", path.display());
                PatternRules::from_file(path)
            }
            None => Ok(PatternRules::default()),
        }
    }

    /// Build a generator with built-ins (if enabled) followed by user rules.
    pub fn build_generator(&self) -> Result<PackageGenerator> {
        let mut generator = if self.builtins {
            PackageGenerator::new()?
        } else {
            PackageGenerator::empty()
        };
        self.load_rules()?.register(&mut generator)?;
        Ok(generator)
    }
}
