//! Cascading resolution across the directory tree
//!
//! [`CascadingResolver::get_config_array_for_file`] discovers every fragment
//! that applies to a file and concatenates them, least to most
//! authoritative: built-in ignore defaults, `baseConfig`, the personal
//! (home-directory) fragment when the deprecation policy admits it, the
//! ancestor-directory chain ordered outermost first, the explicit
//! `--config` file, and finally CLI-supplied options. Results are memoized
//! per directory until [`CascadingResolver::clear_cache`].

use super::array::ConfigArray;
use super::element::ConfigElement;
use super::fragment::ConfigFragment;
use super::loader::{
    FileReader, FragmentLoader, LoaderOptions, OsFileReader, PackagedConfigProvider, absolutize,
};
use super::plugins::{NoModulePluginResolver, PluginDefinition, PluginPool, PluginResolver, RuleMeta};
use super::schema::{BasicSchemaChecker, SchemaChecker};
use crate::cache::ConfigCache;
use crate::environment::{self, DeprecationWarning, Environment, SystemEnvironment};
use crate::error::EslintrcError;
use crate::result::Result;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Callback that discovers rule metadata in a custom rules directory
pub type RuleLoader = Arc<dyn Fn(&Path) -> IndexMap<String, RuleMeta> + Send + Sync>;

/// Constructor configuration for [`CascadingResolver`]
pub struct CascadeOptions {
    /// Resolution root; relative inputs are resolved against it
    pub cwd: PathBuf,
    /// Fragment layered above the built-in defaults, below everything else
    pub base_config: Option<ConfigFragment>,
    /// When false, no config files are looked up at all
    pub use_eslintrc: bool,
    /// Explicit config file (`--config`), layered above the directory chain
    pub specific_config_path: Option<PathBuf>,
    /// CLI-supplied options, the highest-precedence layer
    pub cli_config: Option<ConfigFragment>,
    /// Overrides the directory plugin identities resolve relative to
    pub resolve_plugins_relative_to: Option<PathBuf>,
    /// Caller-supplied plugin definitions, consulted before the resolver
    pub additional_plugin_pool: IndexMap<String, Arc<PluginDefinition>>,
    /// Rules whose option schemas are known up front
    pub builtin_rules: IndexMap<String, RuleMeta>,
    /// Custom rule directories, handed to `load_rules` opaquely
    pub rule_paths: Vec<PathBuf>,
    /// Custom rule discovery; consulted once per entry of `rule_paths`
    pub load_rules: Option<RuleLoader>,
    /// Content of the packaged `eslint:all` default
    pub eslint_all: Option<PackagedConfigProvider>,
    /// Content of the packaged `eslint:recommended` default
    pub eslint_recommended: Option<PackagedConfigProvider>,
    pub environment: Arc<dyn Environment>,
    pub reader: Arc<dyn FileReader>,
    pub plugin_resolver: Arc<dyn PluginResolver>,
    pub schema_checker: Arc<dyn SchemaChecker>,
}

impl CascadeOptions {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            base_config: None,
            use_eslintrc: true,
            specific_config_path: None,
            cli_config: None,
            resolve_plugins_relative_to: None,
            additional_plugin_pool: IndexMap::new(),
            builtin_rules: IndexMap::new(),
            rule_paths: Vec::new(),
            load_rules: None,
            eslint_all: None,
            eslint_recommended: None,
            environment: Arc::new(SystemEnvironment::new()),
            reader: Arc::new(OsFileReader),
            plugin_resolver: Arc::new(NoModulePluginResolver),
            schema_checker: Arc::new(BasicSchemaChecker),
        }
    }
}

impl Default for CascadeOptions {
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self::new(cwd)
    }
}

/// Resolves the effective configuration layering per file, with
/// per-directory memoization
pub struct CascadingResolver {
    cwd: PathBuf,
    base_config: Option<ConfigFragment>,
    use_eslintrc: bool,
    specific_config_path: Option<PathBuf>,
    cli_config: Option<ConfigFragment>,
    rule_paths: Vec<PathBuf>,
    environment: Arc<dyn Environment>,
    loader: FragmentLoader,
    plugin_pool: Arc<PluginPool>,
    ancestor_cache: ConfigCache,
    final_cache: ConfigCache,
}

impl CascadingResolver {
    pub fn new(options: CascadeOptions) -> Self {
        let launch_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        let cwd = absolutize(&launch_dir, &options.cwd);

        let mut known_rules = options.builtin_rules;
        if let Some(load_rules) = &options.load_rules {
            for rule_path in &options.rule_paths {
                for (rule_id, meta) in load_rules(&absolutize(&cwd, rule_path)) {
                    known_rules.insert(rule_id, meta);
                }
            }
        }

        let plugin_pool = Arc::new(PluginPool::new(
            options.additional_plugin_pool,
            options.plugin_resolver,
        ));

        let loader = FragmentLoader::new(LoaderOptions {
            cwd: cwd.clone(),
            resolve_plugins_relative_to: options
                .resolve_plugins_relative_to
                .map(|path| absolutize(&cwd, &path)),
            plugin_pool: Arc::clone(&plugin_pool),
            known_rules,
            reader: options.reader,
            schema_checker: options.schema_checker,
            environment: Arc::clone(&options.environment),
            eslint_all: options.eslint_all,
            eslint_recommended: options.eslint_recommended,
        });

        Self {
            specific_config_path: options
                .specific_config_path
                .map(|path| absolutize(&cwd, &path)),
            cwd,
            base_config: options.base_config,
            use_eslintrc: options.use_eslintrc,
            cli_config: options.cli_config,
            rule_paths: options.rule_paths,
            environment: options.environment,
            loader,
            plugin_pool,
            ancestor_cache: ConfigCache::new(),
            final_cache: ConfigCache::new(),
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The custom rule directories this resolver was constructed with
    pub fn rule_paths(&self) -> &[PathBuf] {
        &self.rule_paths
    }

    /// The pool holding plugin resolutions, including deferred failures
    pub fn plugin_pool(&self) -> &Arc<PluginPool> {
        &self.plugin_pool
    }

    /// Resolve the configuration layering that applies to `file_path`
    ///
    /// Sibling files share one memoized [`ConfigArray`] instance; repeated
    /// calls return the identical `Arc` until [`CascadingResolver::clear_cache`].
    pub fn get_config_array_for_file(
        &self,
        file_path: &Path,
        ignore_not_found: bool,
    ) -> Result<Arc<ConfigArray>> {
        let absolute = absolutize(&self.cwd, file_path);
        let directory = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone());

        if let Some(hit) = self.final_cache.get(&directory) {
            tracing::debug!("Cache hit: {}", directory.display());
            return Ok(hit);
        }
        tracing::debug!("Resolving config array for: {}", absolute.display());

        let chain = if self.use_eslintrc {
            self.ancestor_chain(&directory)?.elements().to_vec()
        } else {
            Vec::new()
        };
        let has_project_config = chain.iter().any(|element| element.file_path.is_some());
        let chain_is_rooted = chain.iter().any(|element| element.root);

        let mut elements = vec![ConfigElement::default_ignore(&self.cwd)];
        if let Some(base) = &self.base_config {
            elements.extend(self.loader.load_object(base, "BaseConfig")?);
        }

        let personal = self.personal_layer(&directory, has_project_config, chain_is_rooted)?;
        let has_personal_config = !personal.is_empty();
        elements.extend(personal);
        elements.extend(chain);

        if let Some(path) = &self.specific_config_path {
            elements.extend(self.loader.load_file(path)?);
        }
        if let Some(cli) = &self.cli_config {
            elements.extend(self.loader.load_object(cli, "CommandLineConfig")?);
        }

        if self.use_eslintrc
            && !has_project_config
            && !has_personal_config
            && self.specific_config_path.is_none()
            && !ignore_not_found
        {
            return Err(EslintrcError::config_not_found(&directory));
        }

        Ok(self
            .final_cache
            .put(directory, Arc::new(ConfigArray::new(elements))))
    }

    /// Drop all memoization
    ///
    /// Subsequent resolutions rebuild from scratch, re-running plugin
    /// resolution, so mutations of the injected plugin pool are observed.
    pub fn clear_cache(&self) {
        tracing::debug!("Clearing config caches");
        self.final_cache.clear();
        self.ancestor_cache.clear();
        self.plugin_pool.clear();
    }

    /// The project-fragment chain for a directory, outermost first,
    /// memoized per directory
    fn ancestor_chain(&self, directory: &Path) -> Result<Arc<ConfigArray>> {
        if let Some(hit) = self.ancestor_cache.get(directory) {
            return Ok(hit);
        }

        // The home directory is personal-config territory, not part of the
        // project chain, unless it is the resolution root itself.
        let home = self
            .environment
            .home_directory()
            .map(|home| absolutize(&self.cwd, &home));
        if home.as_deref() == Some(directory) && self.cwd != directory {
            tracing::debug!(
                "Stopping ancestor walk at home directory: {}",
                directory.display()
            );
            return Ok(self
                .ancestor_cache
                .put(directory.to_path_buf(), Arc::new(ConfigArray::default())));
        }

        let own = self.loader.load_in_directory(directory, None)?;
        let elements = if own.last().is_some_and(|element| element.root) {
            tracing::debug!("Root config found in: {}", directory.display());
            own
        } else {
            match directory.parent() {
                Some(parent) => {
                    let mut combined = self.ancestor_chain(parent)?.elements().to_vec();
                    combined.extend(own);
                    combined
                }
                None => own,
            }
        };

        Ok(self
            .ancestor_cache
            .put(directory.to_path_buf(), Arc::new(ConfigArray::new(elements))))
    }

    /// Apply the personal-config deprecation policy
    ///
    /// Returns the elements to layer below the project chain (only ever
    /// non-empty when the chain found no project fragment).
    fn personal_layer(
        &self,
        directory: &Path,
        has_project_config: bool,
        chain_is_rooted: bool,
    ) -> Result<Vec<ConfigElement>> {
        if !self.use_eslintrc {
            return Ok(Vec::new());
        }
        let Some(home) = self.environment.home_directory() else {
            return Ok(Vec::new());
        };
        let home = absolutize(&self.cwd, &home);

        // The walk traversed the home directory as an ordinary project
        // directory; nothing personal about it.
        if self.cwd == home && directory.starts_with(&home) {
            return Ok(Vec::new());
        }

        if !has_project_config {
            tracing::debug!("Loading personal config from: {}", home.display());
            let elements = self.loader.load_in_directory(&home, Some("PersonalConfig"))?;
            if let Some(file) = elements.last().and_then(|element| element.file_path.as_ref()) {
                self.environment
                    .emit_warning(DeprecationWarning::personal_config_load(
                        &environment::relative_path(&self.cwd, file),
                    ));
            }
            return Ok(elements);
        }

        // A non-root project fragment governs; a personal config sitting
        // above it is only reported, never loaded. A rooted chain already
        // shuts the home directory out, so there is nothing to report.
        if !chain_is_rooted && self.cwd.starts_with(&home) && self.cwd != home {
            if let Some(found) = self.loader.config_file_presence(&home) {
                self.environment
                    .emit_warning(DeprecationWarning::personal_config_suppress(
                        &environment::relative_path(&self.cwd, &found),
                    ));
            }
        }
        Ok(Vec::new())
    }
}
