//! Ambient environment capabilities
//!
//! Home-directory lookup and deprecation-warning delivery are injected into
//! the resolver as an [`Environment`] capability instead of being read from
//! global state, so hosts and tests control both.
//!
//! Warnings are delivered fire-and-forget: subscribers receive them on a
//! channel and read them on a later turn of their own execution. Emission
//! never blocks the resolver, and multiple emissions in one resolution
//! preserve call order.

use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::{Receiver, Sender, channel};

/// Warning code for a personal config file loaded as the active config
pub const PERSONAL_CONFIG_LOAD: &str = "ESLINT_PERSONAL_CONFIG_LOAD";

/// Warning code for a personal config file shadowed by a project config
pub const PERSONAL_CONFIG_SUPPRESS: &str = "ESLINT_PERSONAL_CONFIG_SUPPRESS";

/// Warning code for the legacy top-level `ecmaFeatures` property
pub const LEGACY_ECMAFEATURES: &str = "ESLINT_LEGACY_ECMAFEATURES";

/// A deprecation warning emitted during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationWarning {
    pub code: &'static str,
    pub message: String,
}

impl DeprecationWarning {
    /// Warning for a personal config file that was loaded because no project
    /// config exists
    pub fn personal_config_load(found_in: &Path) -> Self {
        Self {
            code: PERSONAL_CONFIG_LOAD,
            message: format!(
                "'~/.eslintrc.*' config files have been deprecated. \
                 Please use a config file per project or the '--config' option. \
                 (found in \"{}\")",
                found_in.display()
            ),
        }
    }

    /// Warning for a personal config file that exists but is shadowed by a
    /// project config
    pub fn personal_config_suppress(found_in: &Path) -> Self {
        Self {
            code: PERSONAL_CONFIG_SUPPRESS,
            message: format!(
                "'~/.eslintrc.*' config files have been deprecated. \
                 Please remove it or add 'root:true' to the config files in your \
                 projects in order to avoid loading '~/.eslintrc.*' accidentally. \
                 (found in \"{}\")",
                found_in.display()
            ),
        }
    }

    /// Warning for a config file property that is deprecated and has no effect
    pub fn deprecated_property(code: &'static str, property: &str, found_in: &Path) -> Self {
        Self {
            code,
            message: format!(
                "The '{property}' config file property is deprecated and has no effect. \
                 (found in \"{}\")",
                found_in.display()
            ),
        }
    }
}

/// Compute `to` relative to `from`, both assumed absolute and lexically
/// normalized. Falls back to `to` when the two paths share no prefix
/// (e.g. different drives on Windows).
pub(crate) fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from_components: Vec<Component> = from.components().collect();
    let to_components: Vec<Component> = to.components().collect();

    let common = from_components
        .iter()
        .zip(to_components.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return to.to_path_buf();
    }

    let mut result = PathBuf::new();
    for _ in common..from_components.len() {
        result.push("..");
    }
    for component in &to_components[common..] {
        result.push(component.as_os_str());
    }
    result
}

/// Capability bundle the resolver depends on for ambient concerns
pub trait Environment: Send + Sync {
    /// The user's home directory, if one is resolvable
    fn home_directory(&self) -> Option<PathBuf>;

    /// Deliver a deprecation warning to any subscribers
    fn emit_warning(&self, warning: DeprecationWarning);
}

/// Fire-and-forget broadcast channel for deprecation warnings
#[derive(Debug, Default)]
pub struct WarningChannel {
    subscribers: Mutex<Vec<Sender<DeprecationWarning>>>,
}

impl WarningChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber and return its receiving end
    pub fn subscribe(&self) -> Receiver<DeprecationWarning> {
        let (sender, receiver) = channel();
        self.subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(sender);
        receiver
    }

    /// Send a warning to every live subscriber, pruning disconnected ones
    pub fn broadcast(&self, warning: &DeprecationWarning) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        subscribers.retain(|sender| sender.send(warning.clone()).is_ok());
    }
}

/// [`Environment`] backed by the host operating system
pub struct SystemEnvironment {
    home: Option<PathBuf>,
    warnings: WarningChannel,
}

impl SystemEnvironment {
    pub fn new() -> Self {
        let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        Self {
            home,
            warnings: WarningChannel::new(),
        }
    }

    /// Subscribe to the deprecation warnings this environment delivers
    pub fn subscribe(&self) -> Receiver<DeprecationWarning> {
        self.warnings.subscribe()
    }
}

impl Default for SystemEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SystemEnvironment {
    fn home_directory(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn emit_warning(&self, warning: DeprecationWarning) {
        tracing::warn!(code = warning.code, "{}", warning.message);
        self.warnings.broadcast(&warning);
    }
}

/// [`Environment`] with a fixed home directory
///
/// Sandboxed hosts pass an explicit home (or none); tests use it to pin the
/// personal-config boundary to a temp directory.
pub struct FixedEnvironment {
    home: Option<PathBuf>,
    warnings: WarningChannel,
}

impl FixedEnvironment {
    pub fn new(home: Option<PathBuf>) -> Self {
        Self {
            home,
            warnings: WarningChannel::new(),
        }
    }

    pub fn subscribe(&self) -> Receiver<DeprecationWarning> {
        self.warnings.subscribe()
    }
}

impl Environment for FixedEnvironment {
    fn home_directory(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn emit_warning(&self, warning: DeprecationWarning) {
        tracing::warn!(code = warning.code, "{}", warning.message);
        self.warnings.broadcast(&warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_descendant() {
        let relative = relative_path(Path::new("/work/project"), Path::new("/work/project/a/b"));
        assert_eq!(relative, PathBuf::from("a/b"));
    }

    #[test]
    fn test_relative_path_ancestor() {
        let relative = relative_path(Path::new("/work/project/sub"), Path::new("/work/.eslintrc"));
        assert_eq!(relative, PathBuf::from("../../.eslintrc"));
    }

    #[test]
    fn test_warning_channel_preserves_order() {
        let channel = WarningChannel::new();
        let receiver = channel.subscribe();

        channel.broadcast(&DeprecationWarning::personal_config_load(Path::new("a")));
        channel.broadcast(&DeprecationWarning::personal_config_suppress(Path::new("b")));

        let first = receiver.recv().unwrap();
        let second = receiver.recv().unwrap();
        assert_eq!(first.code, PERSONAL_CONFIG_LOAD);
        assert_eq!(second.code, PERSONAL_CONFIG_SUPPRESS);
    }

    #[test]
    fn test_broadcast_with_dropped_subscriber() {
        let channel = WarningChannel::new();
        let receiver = channel.subscribe();
        drop(receiver);

        // Must not fail or block when the only subscriber is gone.
        channel.broadcast(&DeprecationWarning::personal_config_load(Path::new("a")));
    }

    #[test]
    fn test_warning_message_shapes() {
        let load = DeprecationWarning::personal_config_load(Path::new(".eslintrc.json"));
        assert!(load.message.contains("'~/.eslintrc.*' config files have been deprecated."));
        assert!(load.message.contains("Please use a config file per project"));
        assert!(load.message.ends_with("(found in \".eslintrc.json\")"));

        let suppress = DeprecationWarning::personal_config_suppress(Path::new(".eslintrc.json"));
        assert!(suppress.message.contains("add 'root:true'"));

        let legacy = DeprecationWarning::deprecated_property(
            LEGACY_ECMAFEATURES,
            "ecmaFeatures",
            Path::new(".eslintrc.json"),
        );
        assert_eq!(
            legacy.message,
            "The 'ecmaFeatures' config file property is deprecated and has no effect. \
             (found in \".eslintrc.json\")"
        );
    }

    #[test]
    fn test_fixed_environment_home() {
        let env = FixedEnvironment::new(Some(PathBuf::from("/home/someone")));
        assert_eq!(env.home_directory(), Some(PathBuf::from("/home/someone")));
    }
}
