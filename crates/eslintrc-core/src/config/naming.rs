//! Plugin and shareable-config package name normalization
//!
//! Fragment files refer to plugins by shorthand (`react`, `@scope`,
//! `@scope/name`); the resolver works with canonical package identities
//! (`eslint-plugin-react`, `@scope/eslint-plugin`). Both directions are
//! needed: normalization when registering references, shortening when a
//! rule id (`react/jsx-key`) has to be mapped back to its plugin.

/// Normalize a shorthand package reference to its canonical identity
pub fn normalize_package_name(name: &str, prefix: &str) -> String {
    // Path-ish Windows separators are tolerated in references.
    let name = name.replace('\\', "/");

    if let Some(rest) = name.strip_prefix('@') {
        match rest.split_once('/') {
            // "@scope" or "@scope/" or "@scope/<prefix>"
            None => format!("@{rest}/{prefix}"),
            Some((scope, remainder)) if remainder.is_empty() || remainder == prefix => {
                format!("@{scope}/{prefix}")
            }
            Some((scope, remainder)) if remainder.starts_with(&format!("{prefix}-")) => {
                format!("@{scope}/{remainder}")
            }
            Some((scope, remainder)) => format!("@{scope}/{prefix}-{remainder}"),
        }
    } else if name == prefix || name.starts_with(&format!("{prefix}-")) {
        name
    } else {
        format!("{prefix}-{name}")
    }
}

/// Shorten a canonical package identity back to its shorthand form
pub fn get_shorthand_name(fullname: &str, prefix: &str) -> String {
    if let Some(rest) = fullname.strip_prefix('@') {
        if let Some((scope, remainder)) = rest.split_once('/') {
            if remainder == prefix {
                return format!("@{scope}");
            }
            if let Some(short) = remainder.strip_prefix(&format!("{prefix}-")) {
                return format!("@{scope}/{short}");
            }
        }
        fullname.to_string()
    } else if let Some(short) = fullname.strip_prefix(&format!("{prefix}-")) {
        short.to_string()
    } else {
        fullname.to_string()
    }
}

/// Extract the scope+name prefix a rule id refers to, if any
///
/// `react/jsx-key` refers to plugin `react`; `@scope/foo/bar` refers to
/// plugin `@scope/foo`; `semi` refers to no plugin.
pub fn plugin_of_rule_id(rule_id: &str) -> Option<(&str, &str)> {
    if rule_id.starts_with('@') {
        // Scoped: the plugin part spans the first two segments.
        let first = rule_id.find('/')?;
        let second = rule_id[first + 1..].find('/')? + first + 1;
        Some((&rule_id[..second], &rule_id[second + 1..]))
    } else {
        rule_id.split_once('/')
    }
}
