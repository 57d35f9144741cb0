pub mod generator;
pub mod package;
pub mod pattern;
pub mod rules;

pub use generator::{
    GeneratorState, PackageGenerator, RegisteredPattern, BUILTIN_PATTERNS, MAIN_PACKAGE,
};
pub use package::{Capture, Package};
pub use pattern::{
    best_match, is_glob_expression, normalize_path, PathPattern, PRIORITY_DEFAULT, PRIORITY_USER,
};
pub use rules::{PatternRule, PatternRules};
