//! Raw configuration fragment types
//!
//! A fragment is the plain data deserialized from one config source: a file,
//! an in-memory object (`baseConfig`, CLI options) or a packaged default.
//! Fragments are tolerant on input (severities and global access levels
//! accept every historical spelling) and are normalized into immutable
//! [`ConfigElement`](super::ConfigElement)s by the loader.

use indexmap::IndexMap;
use serde::de::{Deserializer, Error as DeError};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Disable the rule
    Off,
    /// Report without failing
    Warn,
    /// Report and fail
    Error,
}

impl Severity {
    /// Accepts the numeric (`0`/`1`/`2`) and string (`"off"`/`"warn"`/`"error"`)
    /// spellings
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_u64()? {
                0 => Some(Severity::Off),
                1 => Some(Severity::Warn),
                2 => Some(Severity::Error),
                _ => None,
            },
            Value::String(s) => match s.as_str() {
                "off" => Some(Severity::Off),
                "warn" => Some(Severity::Warn),
                "error" => Some(Severity::Error),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Severity::from_value(&value).ok_or_else(|| {
            D::Error::custom(format!(
                "severity should be one of \"off\", \"warn\", \"error\", 0, 1 or 2 (got {value})"
            ))
        })
    }
}

/// One rule's declared severity and options
///
/// Deserializes from a bare severity (`"error"`, `2`) or the tuple form
/// (`["error", "single"]`). A later declaration always replaces the whole
/// tuple; options are never merged partially.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub severity: Severity,
    pub options: Vec<Value>,
}

impl RuleEntry {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    pub fn with_options(severity: Severity, options: Vec<Value>) -> Self {
        Self { severity, options }
    }
}

impl<'de> Deserialize<'de> for RuleEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::Array(items) => {
                let first = items
                    .first()
                    .ok_or_else(|| D::Error::custom("rule entry array must not be empty"))?;
                let severity = Severity::from_value(first).ok_or_else(|| {
                    D::Error::custom(format!("invalid rule severity {first}"))
                })?;
                Ok(RuleEntry {
                    severity,
                    options: items[1..].to_vec(),
                })
            }
            _ => {
                let severity = Severity::from_value(&value).ok_or_else(|| {
                    D::Error::custom(format!("invalid rule severity {value}"))
                })?;
                Ok(RuleEntry::new(severity))
            }
        }
    }
}

impl Serialize for RuleEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(1 + self.options.len()))?;
        seq.serialize_element(self.severity.as_str())?;
        for option in &self.options {
            seq.serialize_element(option)?;
        }
        seq.end()
    }
}

/// Access level of one declared global
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalAccess {
    /// The global is not available
    Off,
    /// Reads allowed, writes reported
    Readonly,
    /// Reads and writes allowed
    Writable,
}

impl GlobalAccess {
    /// Accepts the historical spellings: booleans, `null` and the
    /// `readable`/`writeable` variants
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(true) => Some(GlobalAccess::Writable),
            Value::Bool(false) | Value::Null => Some(GlobalAccess::Readonly),
            Value::String(s) => match s.as_str() {
                "off" => Some(GlobalAccess::Off),
                "readonly" | "readable" | "false" => Some(GlobalAccess::Readonly),
                "writable" | "writeable" | "true" => Some(GlobalAccess::Writable),
                _ => None,
            },
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for GlobalAccess {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        GlobalAccess::from_value(&value).ok_or_else(|| {
            D::Error::custom(format!(
                "global access should be \"off\", \"readonly\" or \"writable\" (got {value})"
            ))
        })
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => None,
        Some(OneOrMany::One(value)) => Some(vec![value]),
        Some(OneOrMany::Many(values)) => Some(values),
    })
}

/// A sub-rule within a fragment, scoped by include/exclude glob patterns
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OverrideFragment {
    /// Glob patterns selecting the files this override applies to
    #[serde(deserialize_with = "string_or_list", skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    /// Glob patterns excluding files even when `files` matches
    #[serde(deserialize_with = "string_or_list", skip_serializing_if = "Option::is_none")]
    pub excluded_files: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<IndexMap<String, bool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub globals: Option<IndexMap<String, GlobalAccess>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser_options: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<IndexMap<String, RuleEntry>>,
}

/// One raw configuration fragment
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFragment {
    /// Stops upward directory-chain traversal at the declaring directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<bool>,

    /// Fragments this one layers on top of, least specific first
    #[serde(deserialize_with = "string_or_list", skip_serializing_if = "Option::is_none")]
    pub extends: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<IndexMap<String, bool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub globals: Option<IndexMap<String, GlobalAccess>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser_options: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<IndexMap<String, RuleEntry>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Vec<OverrideFragment>>,

    #[serde(deserialize_with = "string_or_list", skip_serializing_if = "Option::is_none")]
    pub ignore_patterns: Option<Vec<String>>,

    /// Legacy property; captured only so its presence can be reported as
    /// deprecated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecma_features: Option<Value>,
}

/// The slice of `package.json` this crate cares about
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageJsonFragment {
    pub eslint_config: Option<ConfigFragment>,
}
