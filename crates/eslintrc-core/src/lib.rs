//! eslintrc-core
//!
//! Cascading configuration resolution for an ESLint-style lint engine.
//! Given a source file, this crate discovers every applicable config
//! fragment (ancestor directories, the personal home-directory config,
//! explicit `--config` files and CLI options), layers them in precedence
//! order, and flattens them into the one effective configuration for that
//! file. Parsing of source files, rule execution and module evaluation are
//! the consuming linter's business and stay behind injected capabilities.

pub mod cache;
pub mod config;
pub mod environment;
pub mod error;
pub mod result;

// Re-export commonly used types
pub use cache::ConfigCache;
pub use config::{
    BasicSchemaChecker, CONFIG_FILENAMES, CascadeOptions, CascadingResolver, ConfigArray,
    ConfigElement, ConfigFragment, EnvironmentDefinition, ExtractedConfig, FileReader,
    FragmentLoader, GlobalAccess, IgnorePatternSet, LoaderOptions, NoModulePluginResolver,
    OsFileReader, OverrideElement, OverrideFragment, OverrideMatcher, PackagedConfigProvider,
    PluginDefinition, PluginLoadFailure, PluginPool, PluginResolution, PluginResolver, RuleEntry,
    RuleLoader, RuleMeta, SchemaChecker, Severity,
};
pub use environment::{
    DeprecationWarning, Environment, FixedEnvironment, SystemEnvironment, WarningChannel,
};
pub use error::{ErrorKind, EslintrcError};
pub use result::Result;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eslintrc=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
