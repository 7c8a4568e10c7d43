//! Plugin pool with deferred load failures
//!
//! Resolution order is the caller-supplied additional pool first, then the
//! injected resolver capability. A failed resolution is recorded as
//! [`PluginResolution::Unresolved`] rather than thrown; it surfaces only
//! when a consumer inspects that plugin's definition, and can retroactively
//! succeed after a cache clear if the additional pool was mutated.

use super::fragment::{ConfigFragment, GlobalAccess};
use super::naming;
use dashmap::DashMap;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Globals and parser options one environment definition contributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentDefinition {
    pub globals: IndexMap<String, GlobalAccess>,
    pub parser_options: Option<Value>,
}

/// Schema metadata of one rule, used to validate declared options
#[derive(Debug, Clone, Default)]
pub struct RuleMeta {
    pub schema: Option<Value>,
}

impl RuleMeta {
    pub fn with_schema(schema: Value) -> Self {
        Self {
            schema: Some(schema),
        }
    }
}

/// What a resolved plugin contributes to resolution
#[derive(Debug, Clone, Default)]
pub struct PluginDefinition {
    /// Shareable configs reachable through `extends: "plugin:<name>/<config>"`
    pub configs: IndexMap<String, ConfigFragment>,
    /// Environments referenced through `env: {"<plugin>/<env>": true}`
    pub environments: IndexMap<String, EnvironmentDefinition>,
    /// Processors, passed through to the consuming linter
    pub processors: IndexMap<String, Value>,
    /// Rules, consulted for option-schema validation
    pub rules: IndexMap<String, RuleMeta>,
}

/// Why a plugin could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginLoadFailure {
    pub identity: String,
    pub reason: String,
}

/// Outcome of one plugin resolution
///
/// Two variants instead of a nullable definition, so consumers branch
/// explicitly instead of treating a failure as "no rules".
#[derive(Debug, Clone)]
pub enum PluginResolution {
    Resolved(Arc<PluginDefinition>),
    Unresolved(PluginLoadFailure),
}

impl PluginResolution {
    pub fn definition(&self) -> Option<&Arc<PluginDefinition>> {
        match self {
            PluginResolution::Resolved(definition) => Some(definition),
            PluginResolution::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, PluginResolution::Resolved(_))
    }
}

/// On-demand module resolution, injected by the host
pub trait PluginResolver: Send + Sync {
    /// Resolve a canonical plugin identity, relative to the given directory,
    /// into a definition or a failure reason
    fn resolve(
        &self,
        identity: &str,
        relative_to: &Path,
    ) -> std::result::Result<PluginDefinition, String>;
}

/// Resolver for hosts without a module system; every lookup fails with a
/// not-found reason, which the pool records as a deferred failure
#[derive(Debug, Default)]
pub struct NoModulePluginResolver;

impl PluginResolver for NoModulePluginResolver {
    fn resolve(
        &self,
        identity: &str,
        relative_to: &Path,
    ) -> std::result::Result<PluginDefinition, String> {
        Err(format!(
            "Cannot find module '{identity}' (resolved relative to {})",
            relative_to.display()
        ))
    }
}

/// Mapping from plugin identity to resolution outcome
pub struct PluginPool {
    additional: Mutex<IndexMap<String, Arc<PluginDefinition>>>,
    resolver: Arc<dyn PluginResolver>,
    resolutions: DashMap<String, PluginResolution>,
}

impl std::fmt::Debug for PluginPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginPool")
            .field("resolutions", &self.resolutions.len())
            .finish()
    }
}

impl PluginPool {
    pub fn new(
        additional: IndexMap<String, Arc<PluginDefinition>>,
        resolver: Arc<dyn PluginResolver>,
    ) -> Self {
        Self {
            additional: Mutex::new(additional),
            resolver,
            resolutions: DashMap::new(),
        }
    }

    /// Add or replace an entry in the caller-supplied pool
    ///
    /// Takes effect for cached identities only after
    /// [`PluginPool::clear`].
    pub fn add(&self, name: impl Into<String>, definition: PluginDefinition) {
        self.additional
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(name.into(), Arc::new(definition));
    }

    /// Resolve a canonical identity, memoizing the outcome
    pub fn resolve(&self, identity: &str, relative_to: &Path) -> PluginResolution {
        if let Some(cached) = self.resolutions.get(identity) {
            return cached.value().clone();
        }

        let resolution = self.resolve_uncached(identity, relative_to);
        if let PluginResolution::Unresolved(failure) = &resolution {
            tracing::debug!(identity, reason = %failure.reason, "plugin resolution deferred");
        }
        self.resolutions
            .insert(identity.to_string(), resolution.clone());
        resolution
    }

    /// The memoized outcome for an identity, if any resolution was attempted
    pub fn get(&self, identity: &str) -> Option<PluginResolution> {
        self.resolutions.get(identity).map(|r| r.value().clone())
    }

    /// Drop memoized outcomes so later resolutions observe pool mutations
    pub fn clear(&self) {
        self.resolutions.clear();
    }

    fn resolve_uncached(&self, identity: &str, relative_to: &Path) -> PluginResolution {
        let additional = self
            .additional
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        // The caller-supplied pool may be keyed by shorthand or identity.
        let short = naming::get_shorthand_name(identity, "eslint-plugin");
        if let Some(definition) = additional.get(identity).or_else(|| additional.get(&short)) {
            return PluginResolution::Resolved(Arc::clone(definition));
        }
        drop(additional);

        match self.resolver.resolve(identity, relative_to) {
            Ok(definition) => PluginResolution::Resolved(Arc::new(definition)),
            Err(reason) => PluginResolution::Unresolved(PluginLoadFailure {
                identity: identity.to_string(),
                reason,
            }),
        }
    }
}

/// Convenience constructor used by the resolver when a plugin identity is
/// needed relative to a configurable resolution root
pub(crate) fn resolution_root<'a>(
    resolve_plugins_relative_to: Option<&'a Path>,
    fragment_directory: &'a Path,
) -> &'a Path {
    resolve_plugins_relative_to.unwrap_or(fragment_directory)
}
