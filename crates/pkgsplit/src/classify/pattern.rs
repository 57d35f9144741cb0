//! Path patterns used to route installed files into packages.
//!
//! A [`PathPattern`] is either a literal directory prefix or a compiled glob.
//! Paths and prefixes are normalized with [`normalize_path`] first, so
//! `usr/bin/foo` and `/usr/bin/foo` are the same path as far as routing goes.
//! Globs are compiled as written, with a leading `/` added only when the
//! expression starts with a plain path segment. Alternatives inside `{...}`
//! must therefore be absolute, as in `{/usr/share/doc/*,/usr/share/info/*}`.
//!
//! Glob semantics come from `globset` with `literal_separator` disabled:
//! - `*` matches any run of characters, including `/`
//! - `?` matches exactly one character
//! - `[...]` is a character class, `{a,b}` an alternation
//! - matching is case sensitive
//!
//! Priority ordering is descending. [`best_match`] resolves ties among equal
//! priorities in favour of the first candidate it is given, so callers control
//! tie-breaks through iteration order.

use crate::error::{PkgsplitError, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Standard internal priority for a built-in pattern.
pub const PRIORITY_DEFAULT: i32 = 0;

/// Priority for a user pattern. Outranks every built-in.
pub const PRIORITY_USER: i32 = 100;

const GLOB_METACHARS: &[char] = &['*', '?', '[', ']', '{', '}'];

/// Returns true if the expression contains any glob metacharacter.
pub fn is_glob_expression(expression: &str) -> bool {
    expression.contains(GLOB_METACHARS)
}

/// Normalize a path to a single leading `/` with no empty or `.` segments.
///
/// A trailing separator is preserved so directory prefixes stay prefixes.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in path.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        normalized.push('/');
        normalized.push_str(segment);
    }
    if path.ends_with('/') || normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

/// Anchor a glob at the root without touching its syntax.
///
/// Expressions that already start with `/` or with a metacharacter (`*.la`,
/// `{/a,/b}`) are left alone.
fn anchor_glob(expression: &str) -> String {
    match expression.chars().next() {
        Some('/') => expression.to_string(),
        Some(first) if GLOB_METACHARS.contains(&first) => expression.to_string(),
        _ => format!("/{}", expression),
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Prefix(String),
    Glob(GlobMatcher),
}

/// An immutable routing rule.
///
/// Identity is the expression, priority and prefix flag; the compiled matcher
/// is derived from those and takes no part in comparisons.
#[derive(Debug, Clone)]
pub struct PathPattern {
    expression: String,
    priority: i32,
    prefix_mode: bool,
    matcher: Matcher,
}

impl PathPattern {
    /// Build a pattern, detecting prefix mode.
    ///
    /// An expression ending in `/` with no glob metacharacters is a literal
    /// directory prefix. Anything else is compiled as a glob, and a malformed
    /// glob is rejected here rather than at match time.
    pub fn new(expression: impl Into<String>, priority: i32) -> Result<Self> {
        let expression = expression.into();
        let prefix_mode = expression.ends_with('/') && !is_glob_expression(&expression);

        let matcher = if prefix_mode {
            Matcher::Prefix(normalize_path(&expression))
        } else {
            let glob = GlobBuilder::new(&anchor_glob(&expression))
                .literal_separator(false)
                .build()
                .map_err(|source| PkgsplitError::InvalidPattern {
                    pattern: expression.clone(),
                    source,
                })?;
            Matcher::Glob(glob.compile_matcher())
        };

        Ok(Self {
            expression,
            priority,
            prefix_mode,
            matcher,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_prefix(&self) -> bool {
        self.prefix_mode
    }

    /// Test a path in any form.
    pub fn matches(&self, path: &str) -> bool {
        self.matches_normalized(&normalize_path(path))
    }

    /// Test a path already passed through [`normalize_path`].
    pub fn matches_normalized(&self, path: &str) -> bool {
        match &self.matcher {
            Matcher::Prefix(prefix) => path.starts_with(prefix.as_str()),
            Matcher::Glob(glob) => glob.is_match(path),
        }
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
            && self.prefix_mode == other.prefix_mode
            && self.expression == other.expression
    }
}

impl Eq for PathPattern {}

impl Hash for PathPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.expression.hash(state);
        self.priority.hash(state);
        self.prefix_mode.hash(state);
    }
}

/// Highest priority first, then expression text, then glob before prefix.
impl Ord for PathPattern {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.expression.cmp(&other.expression))
            .then_with(|| self.prefix_mode.cmp(&other.prefix_mode))
    }
}

impl PartialOrd for PathPattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

/// Pick the candidate whose pattern has the highest priority.
///
/// Among equal priorities the earliest candidate wins.
pub fn best_match<T, I, F>(candidates: I, pattern_of: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> &PathPattern,
{
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(current) if pattern_of(&current).priority() >= pattern_of(&candidate).priority() => {
            Some(current)
        }
        _ => Some(candidate),
    })
}
