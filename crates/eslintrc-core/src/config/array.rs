//! Config arrays and per-file extraction
//!
//! A [`ConfigArray`] is the ordered candidate layering for one file, least
//! to most authoritative. [`ConfigArray::extract_config`] folds the
//! applicable elements field by field into one flattened
//! [`ExtractedConfig`]; order is the sole precedence mechanism, later
//! applications win. Extraction is computed on demand and not cached: it
//! is path-specific down to override granularity but cheap relative to
//! loading.

use super::element::{ConfigElement, IgnorePatternSet, OverrideElement};
use super::fragment::{GlobalAccess, RuleEntry};
use glob::Pattern;
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use std::path::{Component, Path};

/// Ordered sequence of configuration elements for one file
#[derive(Debug, Clone, Default)]
pub struct ConfigArray {
    elements: Vec<ConfigElement>,
}

impl ConfigArray {
    pub fn new(elements: Vec<ConfigElement>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[ConfigElement] {
        &self.elements
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether the most-derived element declares itself authoritative
    pub fn is_root(&self) -> bool {
        self.elements.last().is_some_and(|element| element.root)
    }

    /// Fold the applicable elements into the flattened configuration for
    /// `path`
    ///
    /// Base fields of every element always apply; each override applies only
    /// when its include patterns match `path` (relative to the element's
    /// directory) and its exclude patterns do not. Field merges are
    /// cumulative across the whole array, so within one element a
    /// later-declared override further overrides an earlier one.
    pub fn extract_config(&self, path: &Path) -> ExtractedConfig {
        let mut extracted = ExtractedConfig::default();
        for element in &self.elements {
            extracted.apply_element(element, path);
        }
        extracted
    }
}

impl<'a> IntoIterator for &'a ConfigArray {
    type Item = &'a ConfigElement;
    type IntoIter = std::slice::Iter<'a, ConfigElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// The single flattened configuration applicable to one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedConfig {
    pub env: IndexMap<String, bool>,
    pub globals: IndexMap<String, GlobalAccess>,
    pub parser: Option<String>,
    pub parser_options: Map<String, Value>,
    pub plugins: Vec<String>,
    pub processor: Option<String>,
    pub settings: Map<String, Value>,
    pub rules: IndexMap<String, RuleEntry>,
    pub ignore_patterns: Vec<IgnorePatternSet>,
}

impl ExtractedConfig {
    fn apply_element(&mut self, element: &ConfigElement, path: &Path) {
        self.apply_fields(
            &element.env,
            &element.globals,
            element.parser.as_deref(),
            &element.parser_options,
            &element.plugins,
            &element.rules,
        );
        if let Some(processor) = &element.processor {
            self.processor = Some(processor.clone());
        }
        deep_merge(&mut self.settings, &element.settings);
        if let Some(ignore) = &element.ignore_patterns {
            self.ignore_patterns.push(ignore.clone());
        }

        for override_element in &element.overrides {
            if override_element.matcher.matches(path) {
                self.apply_override(override_element);
            }
        }
    }

    fn apply_override(&mut self, override_element: &OverrideElement) {
        self.apply_fields(
            &override_element.env,
            &override_element.globals,
            override_element.parser.as_deref(),
            &override_element.parser_options,
            &override_element.plugins,
            &override_element.rules,
        );
    }

    fn apply_fields(
        &mut self,
        env: &IndexMap<String, bool>,
        globals: &IndexMap<String, GlobalAccess>,
        parser: Option<&str>,
        parser_options: &Map<String, Value>,
        plugins: &[String],
        rules: &IndexMap<String, RuleEntry>,
    ) {
        for (name, enabled) in env {
            self.env.insert(name.clone(), *enabled);
        }
        for (name, access) in globals {
            self.globals.insert(name.clone(), *access);
        }
        if let Some(parser) = parser {
            self.parser = Some(parser.to_string());
        }
        deep_merge(&mut self.parser_options, parser_options);
        for plugin in plugins {
            if !self.plugins.contains(plugin) {
                self.plugins.push(plugin.clone());
            }
        }
        for (rule_id, entry) in rules {
            // A later declaration replaces the whole severity+options tuple.
            self.rules.insert(rule_id.clone(), entry.clone());
        }
    }

    /// Evaluate the ordered ignore patterns against a path
    ///
    /// Later entries win; a negated (`!`) entry re-includes a path excluded
    /// earlier. Patterns only apply to paths under their base directory.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let mut ignored = false;
        for set in &self.ignore_patterns {
            let Some(relative) = relative_to_base(&set.base_dir, path) else {
                continue;
            };
            for raw in &set.patterns {
                let (negated, pattern) = match raw.strip_prefix('!') {
                    Some(rest) => (true, rest),
                    None => (false, raw.as_str()),
                };
                if ignore_pattern_matches(pattern, &relative) {
                    ignored = !negated;
                }
            }
        }
        ignored
    }

    /// Plain-object view shaped like a config file's content
    ///
    /// The shape is stable: `rules`, `globals` and `env` are present (as
    /// empty objects) even when nothing was declared.
    pub fn to_compatible_object_as_config_file_content(&self) -> Value {
        json!({
            "env": self.env,
            "globals": self.globals,
            "parser": self.parser,
            "parserOptions": self.parser_options,
            "plugins": self.plugins,
            "rules": self.rules,
            "settings": self.settings,
            "ignorePatterns": self
                .ignore_patterns
                .iter()
                .flat_map(|set| set.patterns.iter())
                .collect::<Vec<_>>(),
        })
    }
}

/// Key-wise recursive merge; `source` wins on leaf collisions
fn deep_merge(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

fn relative_to_base(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
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

/// Match one ignore entry against a `/`-separated relative path
///
/// Entries use gitignore-flavored spelling: a trailing `/` means "the
/// directory and its contents", an entry without `/` floats to any depth.
fn ignore_pattern_matches(pattern: &str, relative: &str) -> bool {
    let trimmed = pattern.strip_suffix('/').unwrap_or(pattern);
    let anchored = trimmed.contains('/');
    let stem = if anchored {
        trimmed.trim_start_matches('/').to_string()
    } else {
        format!("**/{trimmed}")
    };

    for candidate in [stem.clone(), format!("{stem}/**")] {
        if let Ok(compiled) = Pattern::new(&candidate) {
            if compiled.matches(relative) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fragment::Severity;
    use crate::config::overrides::OverrideMatcher;
    use serde_json::json;

    fn element(name: &str) -> ConfigElement {
        ConfigElement::empty(name, "/project")
    }

    fn rule(severity: Severity, options: &[Value]) -> RuleEntry {
        RuleEntry::with_options(severity, options.to_vec())
    }

    fn override_for(patterns: &[&str], rules: IndexMap<String, RuleEntry>) -> OverrideElement {
        OverrideElement {
            matcher: OverrideMatcher::new(
                "/project",
                &patterns.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
                &[],
            )
            .unwrap(),
            env: IndexMap::new(),
            globals: IndexMap::new(),
            parser: None,
            parser_options: Map::new(),
            plugins: Vec::new(),
            rules,
        }
    }

    #[test]
    fn test_later_element_wins_scalar_fields() {
        let mut first = element("outer");
        first.parser = Some("espree".to_string());
        first.env.insert("browser".to_string(), true);

        let mut second = element("inner");
        second.parser = Some("babel".to_string());
        second.env.insert("browser".to_string(), false);
        second.env.insert("node".to_string(), true);

        let array = ConfigArray::new(vec![first, second]);
        let extracted = array.extract_config(Path::new("/project/a.js"));

        assert_eq!(extracted.parser.as_deref(), Some("babel"));
        assert_eq!(extracted.env["browser"], false);
        assert_eq!(extracted.env["node"], true);
    }

    #[test]
    fn test_rules_replace_whole_tuple() {
        let mut first = element("outer");
        first.rules.insert(
            "quotes".to_string(),
            rule(Severity::Error, &[json!("single"), json!({"avoidEscape": true})]),
        );

        let mut second = element("inner");
        second
            .rules
            .insert("quotes".to_string(), rule(Severity::Warn, &[json!("double")]));

        let array = ConfigArray::new(vec![first, second]);
        let extracted = array.extract_config(Path::new("/project/a.js"));

        // No partial merge of the earlier options.
        assert_eq!(
            extracted.rules["quotes"],
            rule(Severity::Warn, &[json!("double")])
        );
    }

    #[test]
    fn test_parser_options_deep_merge() {
        let mut first = element("outer");
        first.parser_options = json!({"ecmaVersion": 2018, "ecmaFeatures": {"jsx": true}})
            .as_object()
            .unwrap()
            .clone();

        let mut second = element("inner");
        second.parser_options = json!({"ecmaFeatures": {"globalReturn": true}})
            .as_object()
            .unwrap()
            .clone();

        let array = ConfigArray::new(vec![first, second]);
        let extracted = array.extract_config(Path::new("/project/a.js"));

        assert_eq!(
            Value::Object(extracted.parser_options),
            json!({
                "ecmaVersion": 2018,
                "ecmaFeatures": {"jsx": true, "globalReturn": true}
            })
        );
    }

    #[test]
    fn test_plugins_union_keeps_first() {
        let mut first = element("outer");
        first.plugins = vec!["eslint-plugin-react".to_string()];

        let mut second = element("inner");
        second.plugins = vec![
            "eslint-plugin-import".to_string(),
            "eslint-plugin-react".to_string(),
        ];

        let array = ConfigArray::new(vec![first, second]);
        let extracted = array.extract_config(Path::new("/project/a.js"));
        assert_eq!(
            extracted.plugins,
            vec!["eslint-plugin-react".to_string(), "eslint-plugin-import".to_string()]
        );
    }

    #[test]
    fn test_later_override_wins_within_one_element() {
        let mut base = element("config");
        base.rules
            .insert("quotes".to_string(), rule(Severity::Error, &[json!("single")]));

        let mut first_rules = IndexMap::new();
        first_rules.insert("quotes".to_string(), rule(Severity::Error, &[json!("single")]));
        first_rules.insert("semi".to_string(), rule(Severity::Error, &[]));

        let mut second_rules = IndexMap::new();
        second_rules.insert("quotes".to_string(), rule(Severity::Error, &[json!("double")]));

        base.overrides.push(override_for(&["foo.js"], first_rules));
        base.overrides.push(override_for(&["foo.js"], second_rules));

        let array = ConfigArray::new(vec![base]);
        let extracted = array.extract_config(Path::new("/project/foo.js"));

        assert_eq!(
            extracted.rules["quotes"],
            rule(Severity::Error, &[json!("double")])
        );
        assert_eq!(extracted.rules["semi"], rule(Severity::Error, &[]));

        // A file the overrides do not match keeps the base declaration.
        let other = array.extract_config(Path::new("/project/bar.js"));
        assert_eq!(
            other.rules["quotes"],
            rule(Severity::Error, &[json!("single")])
        );
        assert!(!other.rules.contains_key("semi"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let mut base = element("config");
        base.rules
            .insert("semi".to_string(), rule(Severity::Warn, &[]));
        let array = ConfigArray::new(vec![base]);

        let first = array.extract_config(Path::new("/project/a.js"));
        let second = array.extract_config(Path::new("/project/a.js"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_ignore_patterns_with_negation() {
        let mut first = element("outer");
        first.ignore_patterns = Some(IgnorePatternSet::new(
            vec!["dist/**".to_string()],
            "/project",
        ));

        let mut second = element("inner");
        second.ignore_patterns = Some(IgnorePatternSet::new(
            vec!["!dist/keep.js".to_string()],
            "/project",
        ));

        let array = ConfigArray::new(vec![first, second]);
        let extracted = array.extract_config(Path::new("/project/a.js"));

        assert!(extracted.is_ignored(Path::new("/project/dist/drop.js")));
        assert!(!extracted.is_ignored(Path::new("/project/dist/keep.js")));
        assert!(!extracted.is_ignored(Path::new("/project/src/a.js")));
    }

    #[test]
    fn test_default_ignore_matches_node_modules() {
        let array = ConfigArray::new(vec![ConfigElement::default_ignore(Path::new("/project"))]);
        let extracted = array.extract_config(Path::new("/project/a.js"));

        assert!(extracted.is_ignored(Path::new("/project/node_modules/pkg/index.js")));
        assert!(extracted.is_ignored(Path::new("/project/a/node_modules/pkg/index.js")));
        assert!(!extracted.is_ignored(Path::new("/project/src/node_modules.js")));
    }

    #[test]
    fn test_unanchored_ignore_entry_floats() {
        let mut base = element("config");
        base.ignore_patterns = Some(IgnorePatternSet::new(
            vec!["coverage/".to_string()],
            "/project",
        ));
        let array = ConfigArray::new(vec![base]);
        let extracted = array.extract_config(Path::new("/project/a.js"));

        assert!(extracted.is_ignored(Path::new("/project/coverage/lcov.info")));
        assert!(extracted.is_ignored(Path::new("/project/packages/x/coverage/lcov.info")));
    }

    #[test]
    fn test_compatible_object_stable_shape() {
        let array = ConfigArray::new(vec![element("config")]);
        let extracted = array.extract_config(Path::new("/project/a.js"));
        let object = extracted.to_compatible_object_as_config_file_content();

        assert_eq!(object["rules"], json!({}));
        assert_eq!(object["globals"], json!({}));
        assert_eq!(object["env"], json!({}));
        assert_eq!(object["parser"], Value::Null);
    }

    #[test]
    fn test_is_root() {
        let mut root_element = element("config");
        root_element.root = true;
        assert!(ConfigArray::new(vec![element("a"), root_element]).is_root());
        assert!(!ConfigArray::new(vec![element("a")]).is_root());
        assert!(!ConfigArray::new(Vec::new()).is_root());
    }
}
