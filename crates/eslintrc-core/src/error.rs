//! Error types and handling for configuration resolution

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for configuration resolution operations
#[derive(Debug, Error)]
pub enum EslintrcError {
    /// No configuration fragment was discoverable for a file
    #[error("No ESLint configuration found in {}.", .directory.display())]
    ConfigNotFound { directory: PathBuf },

    /// A fragment file could not be read or deserialized
    #[error("Cannot read config file: {}\nError: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    /// Failure while resolving an `extends` reference
    ///
    /// The message carries one `Referenced from:` line per chain hop so the
    /// root cause is attributable to the originating project file.
    #[error("{message}")]
    ExtendsChain { message: String },

    /// An override pattern is absolute or escapes its owning directory
    #[error("Invalid override pattern \"{pattern}\": {reason}")]
    InvalidOverridePattern { pattern: String, reason: String },

    /// A rule's declared options failed schema validation
    #[error("Configuration for rule \"{rule_id}\" is invalid:\n{message}")]
    RuleConfiguration { rule_id: String, message: String },

    /// File system I/O errors outside fragment reading
    #[error("IO error for path '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigNotFound,
    Read,
    ExtendsChain,
    InvalidOverridePattern,
    RuleConfiguration,
    Io,
}

impl EslintrcError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EslintrcError::ConfigNotFound { .. } => ErrorKind::ConfigNotFound,
            EslintrcError::Read { .. } => ErrorKind::Read,
            EslintrcError::ExtendsChain { .. } => ErrorKind::ExtendsChain,
            EslintrcError::InvalidOverridePattern { .. } => ErrorKind::InvalidOverridePattern,
            EslintrcError::RuleConfiguration { .. } => ErrorKind::RuleConfiguration,
            EslintrcError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Create a config-not-found error
    pub fn config_not_found(directory: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound {
            directory: directory.into(),
        }
    }

    /// Create a read error for an unreadable or undeserializable fragment
    pub fn read_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Read {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an extends-chain error from a bare message
    pub fn extends_failure(message: impl Into<String>) -> Self {
        Self::ExtendsChain {
            message: message.into(),
        }
    }

    /// Wrap an error that occurred while resolving an `extends` reference,
    /// recording the fragment that referenced it
    pub fn referenced_from(source: EslintrcError, referencer: &std::path::Path) -> Self {
        Self::ExtendsChain {
            message: format!("{source}\nReferenced from: {}", referencer.display()),
        }
    }

    /// Create an invalid-override-pattern error
    pub fn invalid_override_pattern(
        pattern: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOverridePattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create a rule-configuration error
    pub fn rule_configuration(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleConfiguration {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_read_error_message() {
        let err = EslintrcError::read_error("/tmp/.eslintrc.json", "unexpected token");
        assert_eq!(
            err.to_string(),
            "Cannot read config file: /tmp/.eslintrc.json\nError: unexpected token"
        );
        assert_eq!(err.kind(), ErrorKind::Read);
    }

    #[test]
    fn test_referenced_from_chains() {
        let inner = EslintrcError::read_error("/a/base.json", "boom");
        let wrapped = EslintrcError::referenced_from(inner, Path::new("/a/.eslintrc.json"));
        let wrapped = EslintrcError::referenced_from(wrapped, Path::new("/a/b/.eslintrc.json"));

        let message = wrapped.to_string();
        assert!(message.starts_with("Cannot read config file: /a/base.json"));
        assert!(message.contains("Referenced from: /a/.eslintrc.json"));
        assert!(message.ends_with("Referenced from: /a/b/.eslintrc.json"));
        assert_eq!(wrapped.kind(), ErrorKind::ExtendsChain);
    }

    #[test]
    fn test_rule_configuration_mentions_rule_id() {
        let err = EslintrcError::rule_configuration("quotes", "value \"foo\" is not allowed");
        assert!(err.to_string().contains("Configuration for rule \"quotes\" is invalid"));
    }

    #[test]
    fn test_config_not_found_message() {
        let err = EslintrcError::config_not_found("/work/project");
        assert_eq!(
            err.to_string(),
            "No ESLint configuration found in /work/project."
        );
    }
}
