//! Cascading configuration system
//!
//! This module resolves the single effective configuration that applies to a
//! source file in a project holding many partial, nested config fragments:
//! - Fragment loading with JSON/JSONC, YAML and `package.json` support
//! - `extends` chains resolved depth-first, with cycle detection
//! - Auto-discovery by traversing up directories, stopping at `root: true`
//! - Personal (home-directory) configs with migration-era deprecation
//!   warnings
//! - Glob-scoped `overrides` validated at load time
//! - Field-wise merging into one flattened per-file configuration
//!
//! ## Configuration Files
//!
//! Each directory may carry one fragment, probed in priority order:
//! `.eslintrc.yaml`, `.eslintrc.yml`, `.eslintrc.json`, `.eslintrc`, and the
//! `eslintConfig` member of `package.json`.
//!
//! ## Layering
//!
//! A file's [`ConfigArray`] is ordered least to most authoritative:
//!
//! ```text
//! default ignores < baseConfig < personal config < directory chain
//!                 < --config file < CLI options
//! ```
//!
//! Within the directory chain, the directory nearest the filesystem root
//! comes first and the file's own directory last. Order is the sole
//! precedence mechanism: [`ConfigArray::extract_config`] folds the
//! applicable elements field by field, later applications winning.
//!
//! ## Example Fragment
//!
//! ```jsonc
//! {
//!   "root": true,
//!   "extends": ["eslint:recommended", "./shared.json"],
//!   "parserOptions": { "ecmaVersion": 2022 },
//!   "rules": {
//!     "quotes": ["error", "single"]
//!   },
//!   "overrides": [
//!     {
//!       "files": ["*.test.js"],
//!       "rules": { "no-unused-expressions": "off" }
//!     }
//!   ]
//! }
//! ```

mod array;
mod cascade;
mod element;
mod fragment;
mod loader;
mod naming;
mod overrides;
mod plugins;
mod schema;

// Re-export main types
pub use array::{ConfigArray, ExtractedConfig};
pub use cascade::{CascadeOptions, CascadingResolver, RuleLoader};
pub use element::{ConfigElement, IgnorePatternSet, OverrideElement};
pub use fragment::{ConfigFragment, GlobalAccess, OverrideFragment, RuleEntry, Severity};
pub use loader::{
    CONFIG_FILENAMES, FileReader, FragmentLoader, LoaderOptions, OsFileReader,
    PackagedConfigProvider,
};
pub use naming::{get_shorthand_name, normalize_package_name};
pub use overrides::OverrideMatcher;
pub use plugins::{
    EnvironmentDefinition, NoModulePluginResolver, PluginDefinition, PluginLoadFailure,
    PluginPool, PluginResolution, PluginResolver, RuleMeta,
};
pub use schema::{BasicSchemaChecker, SchemaChecker};
