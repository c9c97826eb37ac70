//! Structured document model.
//!
//! Decrypted documents are parsed into [`StructuredValue`], a small tagged
//! tree that keeps mapping insertion order at every level.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_yaml::Value as Yaml;

/// A node of a decrypted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredValue {
    /// Text, numbers and booleans, kept as their textual form
    Scalar(String),
    /// Ordered sequence
    List(Vec<StructuredValue>),
    /// Ordered mapping, insertion order preserved
    Map(Vec<(String, StructuredValue)>),
    /// Explicitly empty or disabled field
    Null,
}

impl StructuredValue {
    /// Convert a parsed YAML value.
    ///
    /// Tags are unwrapped; non-string mapping keys are rendered as text.
    pub fn from_yaml(value: Yaml) -> Self {
        match value {
            Yaml::Null => StructuredValue::Null,
            Yaml::Bool(b) => StructuredValue::Scalar(b.to_string()),
            Yaml::Number(n) => StructuredValue::Scalar(n.to_string()),
            Yaml::String(s) => StructuredValue::Scalar(s),
            Yaml::Sequence(items) => {
                StructuredValue::List(items.into_iter().map(Self::from_yaml).collect())
            }
            Yaml::Mapping(mapping) => StructuredValue::Map(
                mapping
                    .into_iter()
                    .map(|(k, v)| (key_text(k), Self::from_yaml(v)))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => Self::from_yaml(tagged.value),
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StructuredValue::Scalar(_) => "a scalar",
            StructuredValue::List(_) => "a list",
            StructuredValue::Map(_) => "a mapping",
            StructuredValue::Null => "empty",
        }
    }

    /// Render as compact JSON, keeping mapping order.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the tree cannot be serialized.
    pub fn to_compact_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Scalars serialize as strings, mappings in insertion order.
impl Serialize for StructuredValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StructuredValue::Scalar(s) => serializer.serialize_str(s),
            StructuredValue::Null => serializer.serialize_unit(),
            StructuredValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            StructuredValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

fn key_text(key: Yaml) -> String {
    match key {
        Yaml::String(s) => s,
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Null => "null".to_string(),
        Yaml::Tagged(tagged) => key_text(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
