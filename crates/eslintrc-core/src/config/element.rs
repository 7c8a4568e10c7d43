//! Normalized configuration elements
//!
//! A [`ConfigElement`] is the immutable in-memory form of one fragment after
//! the loader has resolved `extends`, normalized plugin and parser
//! references, and validated overrides. Elements are never mutated once
//! constructed; every extraction produces a fresh
//! [`ExtractedConfig`](super::ExtractedConfig).

use super::fragment::{GlobalAccess, RuleEntry};
use super::overrides::OverrideMatcher;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Ignore patterns declared by one element, anchored at its directory
#[derive(Debug, Clone, PartialEq)]
pub struct IgnorePatternSet {
    pub patterns: Vec<String>,
    pub base_dir: PathBuf,
}

impl IgnorePatternSet {
    pub fn new(patterns: Vec<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            patterns,
            base_dir: base_dir.into(),
        }
    }
}

/// A validated sub-rule scoped by glob patterns
#[derive(Debug, Clone)]
pub struct OverrideElement {
    pub matcher: OverrideMatcher,
    pub env: IndexMap<String, bool>,
    pub globals: IndexMap<String, GlobalAccess>,
    pub parser: Option<String>,
    pub parser_options: Map<String, Value>,
    pub plugins: Vec<String>,
    pub rules: IndexMap<String, RuleEntry>,
}

/// Normalized, immutable form of one fragment
#[derive(Debug, Clone)]
pub struct ConfigElement {
    /// Identity for diagnostics: a path relative to `cwd`, or a synthetic
    /// name such as `BaseConfig` or `PersonalConfig`
    pub name: String,
    /// Source file, absent for in-memory and synthesized fragments
    pub file_path: Option<PathBuf>,
    /// Directory that owns this element; override and ignore patterns are
    /// interpreted relative to it
    pub directory: PathBuf,
    /// Stops upward directory-chain traversal at this element's directory
    pub root: bool,
    pub env: IndexMap<String, bool>,
    pub globals: IndexMap<String, GlobalAccess>,
    /// Normalized parser identity (absolute path for path-like references)
    pub parser: Option<String>,
    pub parser_options: Map<String, Value>,
    /// Normalized plugin identities, insertion order preserved
    pub plugins: Vec<String>,
    pub processor: Option<String>,
    pub settings: Map<String, Value>,
    pub rules: IndexMap<String, RuleEntry>,
    pub ignore_patterns: Option<IgnorePatternSet>,
    pub overrides: Vec<OverrideElement>,
}

impl ConfigElement {
    /// An element with the given identity and no declarations
    pub fn empty(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            file_path: None,
            directory: directory.into(),
            root: false,
            env: IndexMap::new(),
            globals: IndexMap::new(),
            parser: None,
            parser_options: Map::new(),
            plugins: Vec::new(),
            processor: None,
            settings: Map::new(),
            rules: IndexMap::new(),
            ignore_patterns: None,
            overrides: Vec::new(),
        }
    }

    /// The synthesized element carrying the built-in ignore defaults
    pub fn default_ignore(cwd: &Path) -> Self {
        let mut element = Self::empty("DefaultIgnorePattern", cwd);
        element.ignore_patterns = Some(IgnorePatternSet::new(
            vec!["**/node_modules/**".to_string()],
            cwd,
        ));
        element
    }
}
