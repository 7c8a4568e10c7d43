//! Fragment loading and normalization
//!
//! Turns one raw config source (a file, an in-memory object, or a packaged
//! default) into normalized [`ConfigElement`]s. `extends` chains are
//! resolved depth-first so each ancestor's elements precede the element that
//! referenced them; plugin and parser references are normalized to canonical
//! identities; override patterns and rule options are validated eagerly so
//! misconfigurations surface even when never exercised.

use super::element::{ConfigElement, IgnorePatternSet, OverrideElement};
use super::fragment::{ConfigFragment, OverrideFragment, PackageJsonFragment, RuleEntry};
use super::naming;
use super::overrides::OverrideMatcher;
use super::plugins::{PluginPool, PluginResolution, RuleMeta, resolution_root};
use super::schema::SchemaChecker;
use crate::environment::{self, DeprecationWarning, Environment, LEGACY_ECMAFEATURES};
use crate::error::EslintrcError;
use crate::result::Result;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Filenames probed in each directory, in priority order
///
/// JS-module config files need a module evaluator and are outside this
/// crate; hosts that have one inject a [`FileReader`] that evaluates them
/// into one of the declarative formats.
pub const CONFIG_FILENAMES: &[&str] = &[
    ".eslintrc.yaml",
    ".eslintrc.yml",
    ".eslintrc.json",
    ".eslintrc",
    "package.json",
];

/// Synchronous file access, injected so hosts and tests control the
/// filesystem
pub trait FileReader: Send + Sync {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;
    fn is_file(&self, path: &Path) -> bool;
}

/// [`FileReader`] backed by `std::fs`
#[derive(Debug, Default)]
pub struct OsFileReader;

impl FileReader for OsFileReader {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Supplies the content of a packaged default (`eslint:all`,
/// `eslint:recommended`)
pub type PackagedConfigProvider = Arc<dyn Fn() -> ConfigFragment + Send + Sync>;

/// Everything a [`FragmentLoader`] needs, bundled for construction
pub struct LoaderOptions {
    pub cwd: PathBuf,
    pub resolve_plugins_relative_to: Option<PathBuf>,
    pub plugin_pool: Arc<PluginPool>,
    /// Rules whose option schemas are known up front (built-in rules plus
    /// any the host discovered through its own rule loading)
    pub known_rules: IndexMap<String, RuleMeta>,
    pub reader: Arc<dyn FileReader>,
    pub schema_checker: Arc<dyn SchemaChecker>,
    pub environment: Arc<dyn Environment>,
    pub eslint_all: Option<PackagedConfigProvider>,
    pub eslint_recommended: Option<PackagedConfigProvider>,
}

/// Tracks the in-progress `extends` chain for cycle detection
#[derive(Debug, Default)]
struct LoadContext {
    in_progress: Vec<PathBuf>,
}

/// Turns raw config sources into normalized [`ConfigElement`]s
pub struct FragmentLoader {
    cwd: PathBuf,
    resolve_plugins_relative_to: Option<PathBuf>,
    plugin_pool: Arc<PluginPool>,
    known_rules: IndexMap<String, RuleMeta>,
    reader: Arc<dyn FileReader>,
    schema_checker: Arc<dyn SchemaChecker>,
    environment: Arc<dyn Environment>,
    eslint_all: Option<PackagedConfigProvider>,
    eslint_recommended: Option<PackagedConfigProvider>,
}

impl FragmentLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            cwd: options.cwd,
            resolve_plugins_relative_to: options.resolve_plugins_relative_to,
            plugin_pool: options.plugin_pool,
            known_rules: options.known_rules,
            reader: options.reader,
            schema_checker: options.schema_checker,
            environment: options.environment,
            eslint_all: options.eslint_all,
            eslint_recommended: options.eslint_recommended,
        }
    }

    pub fn plugin_pool(&self) -> &Arc<PluginPool> {
        &self.plugin_pool
    }

    /// Load and normalize one config file
    pub fn load_file(&self, path: &Path) -> Result<Vec<ConfigElement>> {
        let absolute = absolutize(&self.cwd, path);
        let Some(fragment) = self.read_fragment(&absolute)? else {
            return Err(EslintrcError::read_error(
                &absolute,
                "package.json has no \"eslintConfig\" member",
            ));
        };

        let name = environment::relative_path(&self.cwd, &absolute)
            .display()
            .to_string();
        let directory = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone());

        let mut context = LoadContext::default();
        context.in_progress.push(absolute.clone());
        self.normalize(&fragment, &directory, Some(&absolute), &name, &mut context)
    }

    /// Load the first config file found in a directory
    ///
    /// Absence of any config is not an error: the result is simply empty.
    /// A `package.json` without an `eslintConfig` member does not count as
    /// a config file.
    pub fn load_in_directory(
        &self,
        directory: &Path,
        synthetic_name: Option<&str>,
    ) -> Result<Vec<ConfigElement>> {
        for filename in CONFIG_FILENAMES {
            let candidate = directory.join(filename);
            if !self.reader.is_file(&candidate) {
                continue;
            }
            let Some(fragment) = self.read_fragment(&candidate)? else {
                continue;
            };
            tracing::debug!("Config file found: {}", candidate.display());

            let name = match synthetic_name {
                Some(name) => name.to_string(),
                None => environment::relative_path(&self.cwd, &candidate)
                    .display()
                    .to_string(),
            };
            let mut context = LoadContext::default();
            context.in_progress.push(candidate.clone());
            return self.normalize(&fragment, directory, Some(&candidate), &name, &mut context);
        }

        tracing::debug!("No config file in: {}", directory.display());
        Ok(Vec::new())
    }

    /// The first config file present in a directory, without normalizing it
    ///
    /// Used when only a fragment's existence matters (the personal-config
    /// suppress warning); a `package.json` counts only if it carries an
    /// `eslintConfig` member.
    pub fn config_file_presence(&self, directory: &Path) -> Option<PathBuf> {
        for filename in CONFIG_FILENAMES {
            let candidate = directory.join(filename);
            if !self.reader.is_file(&candidate) {
                continue;
            }
            if *filename == "package.json" {
                match self.read_fragment(&candidate) {
                    Ok(Some(_)) => return Some(candidate),
                    _ => continue,
                }
            }
            return Some(candidate);
        }
        None
    }

    /// Normalize an in-memory fragment (`baseConfig`, CLI options)
    pub fn load_object(&self, fragment: &ConfigFragment, name: &str) -> Result<Vec<ConfigElement>> {
        let directory = self.cwd.clone();
        let mut context = LoadContext::default();
        self.normalize(fragment, &directory, None, name, &mut context)
    }

    fn read_fragment(&self, path: &Path) -> Result<Option<ConfigFragment>> {
        let content = self
            .reader
            .read_to_string(path)
            .map_err(|e| EslintrcError::read_error(path, e.to_string()))?;

        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if file_name == "package.json" {
            let package: PackageJsonFragment = serde_json::from_str(&content)
                .map_err(|e| EslintrcError::read_error(path, e.to_string()))?;
            return Ok(package.eslint_config);
        }

        if content.trim().is_empty() {
            return Ok(Some(ConfigFragment::default()));
        }

        let fragment = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => json5::from_str(&content)
                .map_err(|e| EslintrcError::read_error(path, e.to_string()))?,
            // `.eslintrc` and explicitly-passed files of other extensions:
            // YAML is a JSON superset, so one parser covers both legacy
            // spellings.
            _ => serde_yaml::from_str(&content)
                .map_err(|e| EslintrcError::read_error(path, e.to_string()))?,
        };
        Ok(Some(fragment))
    }

    fn normalize(
        &self,
        fragment: &ConfigFragment,
        directory: &Path,
        file_path: Option<&Path>,
        name: &str,
        context: &mut LoadContext,
    ) -> Result<Vec<ConfigElement>> {
        let mut elements = Vec::new();

        if let Some(extends) = &fragment.extends {
            for reference in extends {
                elements.extend(self.load_extended(reference, directory, file_path, name, context)?);
            }
        }

        if fragment.ecma_features.is_some() {
            let found_in = file_path
                .map(|path| environment::relative_path(&self.cwd, path))
                .unwrap_or_else(|| PathBuf::from(name));
            self.environment.emit_warning(DeprecationWarning::deprecated_property(
                LEGACY_ECMAFEATURES,
                "ecmaFeatures",
                &found_in,
            ));
        }

        elements.push(self.create_element(fragment, directory, file_path, name)?);
        Ok(elements)
    }

    fn load_extended(
        &self,
        reference: &str,
        directory: &Path,
        referencer: Option<&Path>,
        parent_name: &str,
        context: &mut LoadContext,
    ) -> Result<Vec<ConfigElement>> {
        let child_name = format!("{parent_name} \u{bb} {reference}");

        let result = if reference == "eslint:all" {
            self.load_packaged(reference, self.eslint_all.as_ref(), directory, &child_name, context)
        } else if reference == "eslint:recommended" {
            self.load_packaged(
                reference,
                self.eslint_recommended.as_ref(),
                directory,
                &child_name,
                context,
            )
        } else if let Some(rest) = reference.strip_prefix("plugin:") {
            self.load_plugin_config(reference, rest, directory, &child_name, context)
        } else if reference.starts_with('.') || Path::new(reference).is_absolute() {
            self.load_extended_file(reference, directory, &child_name, context)
        } else {
            // Shareable config packages need a module system to resolve.
            Err(EslintrcError::extends_failure(format!(
                "Failed to load config \"{reference}\" to extend from."
            )))
        };

        result.map_err(|error| match referencer {
            Some(path) => EslintrcError::referenced_from(error, path),
            None => error,
        })
    }

    fn load_packaged(
        &self,
        reference: &str,
        provider: Option<&PackagedConfigProvider>,
        directory: &Path,
        name: &str,
        context: &mut LoadContext,
    ) -> Result<Vec<ConfigElement>> {
        match provider {
            Some(provider) => self.normalize(&provider(), directory, None, name, context),
            None => Err(EslintrcError::extends_failure(format!(
                "Failed to load config \"{reference}\" to extend from."
            ))),
        }
    }

    fn load_plugin_config(
        &self,
        reference: &str,
        rest: &str,
        directory: &Path,
        name: &str,
        context: &mut LoadContext,
    ) -> Result<Vec<ConfigElement>> {
        let Some((plugin_name, config_name)) = rest.rsplit_once('/') else {
            return Err(EslintrcError::extends_failure(format!(
                "Failed to load config \"{reference}\" to extend from."
            )));
        };

        let identity = naming::normalize_package_name(plugin_name, "eslint-plugin");
        let root = resolution_root(self.resolve_plugins_relative_to.as_deref(), directory);
        match self.plugin_pool.resolve(&identity, root) {
            PluginResolution::Resolved(definition) => {
                let Some(fragment) = definition.configs.get(config_name) else {
                    return Err(EslintrcError::extends_failure(format!(
                        "Failed to load config \"{config_name}\" from plugin \"{identity}\"."
                    )));
                };
                self.normalize(fragment, root, None, name, context)
            }
            PluginResolution::Unresolved(failure) => Err(EslintrcError::extends_failure(format!(
                "Failed to load plugin \"{identity}\" declared in \"{name}\": {}",
                failure.reason
            ))),
        }
    }

    fn load_extended_file(
        &self,
        reference: &str,
        directory: &Path,
        name: &str,
        context: &mut LoadContext,
    ) -> Result<Vec<ConfigElement>> {
        let path = absolutize(directory, Path::new(reference));
        if context.in_progress.contains(&path) {
            return Err(EslintrcError::extends_failure(format!(
                "Circular reference to \"{}\" in `extends` chain.",
                path.display()
            )));
        }

        let Some(fragment) = self.read_fragment(&path)? else {
            return Err(EslintrcError::read_error(
                &path,
                "package.json has no \"eslintConfig\" member",
            ));
        };

        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| directory.to_path_buf());

        context.in_progress.push(path.clone());
        let result = self.normalize(&fragment, &parent, Some(&path), name, context);
        context.in_progress.pop();
        result
    }

    fn create_element(
        &self,
        fragment: &ConfigFragment,
        directory: &Path,
        file_path: Option<&Path>,
        name: &str,
    ) -> Result<ConfigElement> {
        let plugins =
            self.normalize_plugins(fragment.plugins.as_deref().unwrap_or(&[]), directory);
        let rules = fragment.rules.clone().unwrap_or_default();
        self.validate_rules(&rules)?;

        let mut overrides = Vec::new();
        for override_fragment in fragment.overrides.as_deref().unwrap_or(&[]) {
            overrides.push(self.create_override(override_fragment, directory)?);
        }

        Ok(ConfigElement {
            name: name.to_string(),
            file_path: file_path.map(Path::to_path_buf),
            directory: directory.to_path_buf(),
            root: fragment.root.unwrap_or(false),
            env: fragment.env.clone().unwrap_or_default(),
            globals: fragment.globals.clone().unwrap_or_default(),
            parser: fragment
                .parser
                .as_ref()
                .map(|parser| self.normalize_parser(parser, directory)),
            parser_options: as_object(fragment.parser_options.as_ref()),
            plugins,
            processor: fragment.processor.clone(),
            settings: as_object(fragment.settings.as_ref()),
            rules,
            ignore_patterns: fragment
                .ignore_patterns
                .clone()
                .map(|patterns| IgnorePatternSet::new(patterns, directory)),
            overrides,
        })
    }

    fn create_override(
        &self,
        fragment: &OverrideFragment,
        directory: &Path,
    ) -> Result<OverrideElement> {
        let includes = fragment.files.clone().unwrap_or_default();
        let excludes = fragment.excluded_files.clone().unwrap_or_default();
        let matcher = OverrideMatcher::new(directory, &includes, &excludes)?;

        let rules = fragment.rules.clone().unwrap_or_default();
        self.validate_rules(&rules)?;

        Ok(OverrideElement {
            matcher,
            env: fragment.env.clone().unwrap_or_default(),
            globals: fragment.globals.clone().unwrap_or_default(),
            parser: fragment
                .parser
                .as_ref()
                .map(|parser| self.normalize_parser(parser, directory)),
            parser_options: as_object(fragment.parser_options.as_ref()),
            plugins: self.normalize_plugins(fragment.plugins.as_deref().unwrap_or(&[]), directory),
            rules,
        })
    }

    /// Normalize plugin references and register them with the pool;
    /// resolution failures stay deferred on the pool entry
    fn normalize_plugins(&self, names: &[String], directory: &Path) -> Vec<String> {
        let root = resolution_root(self.resolve_plugins_relative_to.as_deref(), directory);
        let mut identities = Vec::new();
        for name in names {
            let identity = naming::normalize_package_name(name, "eslint-plugin");
            self.plugin_pool.resolve(&identity, root);
            if !identities.contains(&identity) {
                identities.push(identity);
            }
        }
        identities
    }

    fn normalize_parser(&self, parser: &str, directory: &Path) -> String {
        if parser.starts_with('.') || Path::new(parser).is_absolute() {
            absolutize(directory, Path::new(parser)).display().to_string()
        } else {
            parser.to_string()
        }
    }

    /// Validate declared options of rules whose schemas are known; unknown
    /// rule identities are deferred to the consuming linter
    fn validate_rules(&self, rules: &IndexMap<String, RuleEntry>) -> Result<()> {
        for (rule_id, entry) in rules {
            let Some(meta) = self.rule_meta(rule_id) else {
                continue;
            };
            if let Some(schema) = &meta.schema {
                self.schema_checker
                    .check(schema, &entry.options)
                    .map_err(|message| EslintrcError::rule_configuration(rule_id, message))?;
            }
        }
        Ok(())
    }

    fn rule_meta(&self, rule_id: &str) -> Option<RuleMeta> {
        if let Some((plugin_short, rule_name)) = naming::plugin_of_rule_id(rule_id) {
            let identity = naming::normalize_package_name(plugin_short, "eslint-plugin");
            match self.plugin_pool.get(&identity) {
                Some(PluginResolution::Resolved(definition)) => {
                    definition.rules.get(rule_name).cloned()
                }
                _ => None,
            }
        } else {
            self.known_rules.get(rule_id).cloned()
        }
    }
}

fn as_object(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(object)) => object.clone(),
        _ => Map::new(),
    }
}

/// Join `path` onto `base` when relative and normalize `.`/`..` segments
/// lexically
pub(crate) fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut result = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir => {}
            other => result.push(other.as_os_str()),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fragment::Severity;
    use crate::config::plugins::{NoModulePluginResolver, PluginDefinition};
    use crate::environment::FixedEnvironment;
    use crate::error::ErrorKind;
    use crate::config::schema::BasicSchemaChecker;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn loader_at(cwd: &Path) -> FragmentLoader {
        loader_with(cwd, IndexMap::new(), IndexMap::new())
    }

    fn loader_with(
        cwd: &Path,
        additional_plugins: IndexMap<String, Arc<PluginDefinition>>,
        known_rules: IndexMap<String, RuleMeta>,
    ) -> FragmentLoader {
        FragmentLoader::new(LoaderOptions {
            cwd: cwd.to_path_buf(),
            resolve_plugins_relative_to: None,
            plugin_pool: Arc::new(PluginPool::new(
                additional_plugins,
                Arc::new(NoModulePluginResolver),
            )),
            known_rules,
            reader: Arc::new(OsFileReader),
            schema_checker: Arc::new(BasicSchemaChecker),
            environment: Arc::new(FixedEnvironment::new(None)),
            eslint_all: None,
            eslint_recommended: None,
        })
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_json_file() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            ".eslintrc.json",
            r#"{
                // JSONC comments are tolerated
                "root": true,
                "rules": { "semi": "error" },
            }"#,
        );

        let elements = loader_at(temp.path()).load_file(&path).unwrap();
        assert_eq!(elements.len(), 1);
        assert!(elements[0].root);
        assert_eq!(elements[0].rules["semi"].severity, Severity::Error);
        assert_eq!(elements[0].directory, temp.path());
    }

    #[test]
    fn test_load_yaml_and_legacy_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".eslintrc.yaml", "env:\n  node: true\n");

        let elements = loader_at(temp.path())
            .load_in_directory(temp.path(), None)
            .unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].env["node"], true);

        // Extensionless `.eslintrc` may hold JSON; YAML parsing covers it.
        let temp2 = TempDir::new().unwrap();
        write(temp2.path(), ".eslintrc", r#"{"rules": {"semi": "warn"}}"#);
        let elements = loader_at(temp2.path())
            .load_in_directory(temp2.path(), None)
            .unwrap();
        assert_eq!(elements[0].rules["semi"].severity, Severity::Warn);
    }

    #[test]
    fn test_filename_priority() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".eslintrc.yaml", "env:\n  node: true\n");
        write(temp.path(), ".eslintrc.json", r#"{"env": {"browser": true}}"#);

        let elements = loader_at(temp.path())
            .load_in_directory(temp.path(), None)
            .unwrap();
        assert!(elements[0].env.contains_key("node"));
    }

    #[test]
    fn test_package_json_without_member_is_skipped() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "package.json", r#"{"name": "demo"}"#);

        let loader = loader_at(temp.path());
        assert!(loader.load_in_directory(temp.path(), None).unwrap().is_empty());
        assert!(loader.config_file_presence(temp.path()).is_none());
    }

    #[test]
    fn test_package_json_with_member() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "package.json",
            r#"{"name": "demo", "eslintConfig": {"rules": {"semi": 2}}}"#,
        );

        let elements = loader_at(temp.path())
            .load_in_directory(temp.path(), None)
            .unwrap();
        assert_eq!(elements[0].rules["semi"].severity, Severity::Error);
    }

    #[test]
    fn test_empty_file_is_an_empty_fragment() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), ".eslintrc", "");
        let elements = loader_at(temp.path()).load_file(&path).unwrap();
        assert_eq!(elements.len(), 1);
        assert!(elements[0].rules.is_empty());
    }

    #[test]
    fn test_unreadable_file_is_a_read_error() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), ".eslintrc.json", "{ not json at all ][");
        let err = loader_at(temp.path()).load_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Read);
        assert!(err.to_string().starts_with("Cannot read config file:"));
    }

    #[test]
    fn test_extends_orders_ancestors_first() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "base.json", r#"{"rules": {"semi": "warn"}}"#);
        let path = write(
            temp.path(),
            ".eslintrc.json",
            r#"{"extends": "./base.json", "rules": {"semi": "error"}}"#,
        );

        let elements = loader_at(temp.path()).load_file(&path).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].rules["semi"].severity, Severity::Warn);
        assert_eq!(elements[1].rules["semi"].severity, Severity::Error);
        assert!(elements[0].name.ends_with("\u{bb} ./base.json"));
    }

    #[test]
    fn test_extends_missing_file_records_referencer() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            ".eslintrc.json",
            r#"{"extends": "./missing.json"}"#,
        );

        let err = loader_at(temp.path()).load_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtendsChain);
        let message = err.to_string();
        assert!(message.contains("missing.json"));
        assert!(message.contains(&format!("Referenced from: {}", path.display())));
    }

    #[test]
    fn test_extends_cycle_is_detected() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.json", r#"{"extends": "./b.json"}"#);
        write(temp.path(), "b.json", r#"{"extends": "./a.json"}"#);

        let err = loader_at(temp.path())
            .load_file(&temp.path().join("a.json"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtendsChain);
        assert!(err.to_string().contains("Circular reference"));
    }

    #[test]
    fn test_extends_packaged_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            ".eslintrc.json",
            r#"{"extends": "eslint:recommended"}"#,
        );

        let mut loader = loader_at(temp.path());
        loader.eslint_recommended = Some(Arc::new(|| {
            serde_json::from_value(json!({"rules": {"no-debugger": "error"}})).unwrap()
        }));

        let elements = loader.load_file(&path).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].rules["no-debugger"].severity, Severity::Error);

        // Without a provider the reference is an extends failure.
        let err = loader_at(temp.path()).load_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtendsChain);
    }

    #[test]
    fn test_extends_plugin_config() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            ".eslintrc.json",
            r#"{"extends": "plugin:demo/strict"}"#,
        );

        let mut definition = PluginDefinition::default();
        definition.configs.insert(
            "strict".to_string(),
            serde_json::from_value(json!({"rules": {"demo/no-foo": "error"}})).unwrap(),
        );
        let mut additional = IndexMap::new();
        additional.insert("demo".to_string(), Arc::new(definition));

        let elements = loader_with(temp.path(), additional, IndexMap::new())
            .load_file(&path)
            .unwrap();
        assert_eq!(elements.len(), 2);
        assert!(elements[0].rules.contains_key("demo/no-foo"));

        // Unresolvable plugin makes the extends chain fail.
        let err = loader_at(temp.path()).load_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtendsChain);
        assert!(err.to_string().contains("eslint-plugin-demo"));
    }

    #[test]
    fn test_plugins_are_normalized_and_registered() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            ".eslintrc.json",
            r#"{"plugins": ["react", "react"]}"#,
        );

        let loader = loader_at(temp.path());
        let elements = loader.load_file(&path).unwrap();
        assert_eq!(elements[0].plugins, vec!["eslint-plugin-react".to_string()]);

        // Registration recorded a deferred failure, not an error.
        let resolution = loader.plugin_pool().get("eslint-plugin-react").unwrap();
        assert!(!resolution.is_resolved());
    }

    #[test]
    fn test_parser_path_is_absolutized() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            ".eslintrc.json",
            r#"{"parser": "./parsers/custom.js"}"#,
        );

        let elements = loader_at(temp.path()).load_file(&path).unwrap();
        let expected = temp.path().join("parsers/custom.js");
        assert_eq!(elements[0].parser.as_deref(), Some(expected.to_str().unwrap()));

        let path = write(temp.path(), ".eslintrc.yml", "parser: espree\n");
        let elements = loader_at(temp.path()).load_file(&path).unwrap();
        assert_eq!(elements[0].parser.as_deref(), Some("espree"));
    }

    #[test]
    fn test_invalid_override_pattern_fails_at_load() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            ".eslintrc.json",
            r#"{"overrides": [{"files": ["../**/*.js"], "rules": {}}]}"#,
        );

        let err = loader_at(temp.path()).load_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOverridePattern);
    }

    #[test]
    fn test_rule_options_validated_against_known_schema() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            ".eslintrc.json",
            r#"{"rules": {"dot-location": ["error", "foo"]}}"#,
        );

        let mut known_rules = IndexMap::new();
        known_rules.insert(
            "dot-location".to_string(),
            RuleMeta::with_schema(json!([{ "enum": ["object", "property"] }])),
        );

        let err = loader_with(temp.path(), IndexMap::new(), known_rules)
            .load_file(&path)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RuleConfiguration);
        assert!(err.to_string().contains("dot-location"));

        // Unknown rules are not validated here.
        let unknown = write(
            temp.path(),
            ".eslintrc.yml",
            "rules:\n  someones-custom-rule: [error, whatever]\n",
        );
        assert!(loader_at(temp.path()).load_file(&unknown).is_ok());
    }

    #[test]
    fn test_legacy_ecma_features_warns() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            ".eslintrc.json",
            r#"{"ecmaFeatures": {"jsx": true}, "rules": {}}"#,
        );

        let environment = Arc::new(FixedEnvironment::new(None));
        let warnings = environment.subscribe();
        let mut loader = loader_at(temp.path());
        loader.environment = environment;

        loader.load_file(&path).unwrap();
        let warning = warnings.try_recv().unwrap();
        assert_eq!(warning.code, LEGACY_ECMAFEATURES);
        assert!(warning.message.contains("'ecmaFeatures' config file property is deprecated"));
    }

    #[test]
    fn test_absolutize_normalizes_segments() {
        assert_eq!(
            absolutize(Path::new("/a/b"), Path::new("../c/./d.json")),
            PathBuf::from("/a/c/d.json")
        );
        assert_eq!(
            absolutize(Path::new("/a"), Path::new("/x/y.json")),
            PathBuf::from("/x/y.json")
        );
    }
}
