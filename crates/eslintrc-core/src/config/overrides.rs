//! Override pattern validation and matching
//!
//! Patterns in an `overrides` entry are interpreted relative to the
//! directory owning the declaring element. Validation runs once at load
//! time, independent of any candidate file, so misconfigured overrides are
//! reported even if never exercised.

use crate::error::EslintrcError;
use crate::result::Result;
use glob::Pattern;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
struct CompiledPattern {
    raw: String,
    pattern: Pattern,
    /// Patterns without a `/` match against the file name alone
    basename_only: bool,
}

impl CompiledPattern {
    fn new(raw: &str) -> Result<Self> {
        let pattern = Pattern::new(raw).map_err(|e| {
            EslintrcError::invalid_override_pattern(raw, format!("not a valid glob: {e}"))
        })?;
        Ok(Self {
            raw: raw.to_string(),
            pattern,
            basename_only: !raw.contains('/'),
        })
    }

    fn matches(&self, relative: &str, file_name: &str) -> bool {
        if self.basename_only {
            self.pattern.matches(file_name) || self.pattern.matches(relative)
        } else {
            self.pattern.matches(relative)
        }
    }
}

/// Validated include/exclude pattern lists of one override entry
#[derive(Debug, Clone)]
pub struct OverrideMatcher {
    base_dir: PathBuf,
    includes: Vec<CompiledPattern>,
    excludes: Vec<CompiledPattern>,
}

impl OverrideMatcher {
    /// Validate and compile the pattern lists
    ///
    /// Include patterns must be non-empty; every pattern must be relative and
    /// must not escape the owning directory.
    pub fn new(base_dir: impl Into<PathBuf>, includes: &[String], excludes: &[String]) -> Result<Self> {
        if includes.is_empty() {
            return Err(EslintrcError::invalid_override_pattern(
                "files",
                "at least one file pattern is required",
            ));
        }
        for pattern in includes.iter().chain(excludes) {
            Self::validate(pattern)?;
        }
        Ok(Self {
            base_dir: base_dir.into(),
            includes: includes.iter().map(|p| CompiledPattern::new(p)).collect::<Result<_>>()?,
            excludes: excludes.iter().map(|p| CompiledPattern::new(p)).collect::<Result<_>>()?,
        })
    }

    /// Reject absolute patterns and patterns that traverse above the owning
    /// directory
    pub fn validate(pattern: &str) -> Result<()> {
        if Path::new(pattern).is_absolute() || pattern.starts_with('/') {
            return Err(EslintrcError::invalid_override_pattern(
                pattern,
                "pattern must be relative to the config file's directory",
            ));
        }

        let mut depth: i32 = 0;
        for segment in pattern.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(EslintrcError::invalid_override_pattern(
                            pattern,
                            "pattern must not escape the config file's directory",
                        ));
                    }
                }
                _ => depth += 1,
            }
        }
        Ok(())
    }

    /// True iff at least one include pattern matches the path and no exclude
    /// pattern matches
    pub fn matches(&self, path: &Path) -> bool {
        let Some(relative) = self.relative_of(path) else {
            return false;
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.includes.iter().any(|p| p.matches(&relative, &file_name))
            && !self.excludes.iter().any(|p| p.matches(&relative, &file_name))
    }

    /// The patterns as declared, for diagnostics
    pub fn include_patterns(&self) -> impl Iterator<Item = &str> {
        self.includes.iter().map(|p| p.raw.as_str())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Make the candidate path relative to the owning directory, with `/`
    /// separators. Paths outside the owning directory never match.
    fn relative_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_dir).ok()?;
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(parts.join("/"))
    }
}
