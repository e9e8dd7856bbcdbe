//! Deserialization helpers for positions real documents get wrong.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// `x-` keys are vendor extensions and never name a path or a status code.
pub(crate) fn is_extension(key: &str) -> bool {
  key.starts_with("x-")
}

/// A map whose `x-` entries are dropped before the values are read.
pub(crate) fn without_extensions<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  IndexMap::<String, Value>::deserialize(deserializer)?
    .into_iter()
    .filter(|(key, _)| !is_extension(key))
    .map(|(key, value)| match T::deserialize(value) {
      Ok(parsed) => Ok((key, parsed)),
      Err(error) => Err(serde::de::Error::custom(format!("`{key}`: {error}"))),
    })
    .collect()
}

/// Accepts `3.0.3` as well as the bare number YAML makes of `3.0`.
pub(crate) fn version_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  match Value::deserialize(deserializer)? {
    Value::String(text) => Ok(text),
    Value::Number(number) => Ok(number.to_string()),
    Value::Null => Ok(String::new()),
    other => Err(serde::de::Error::custom(format!(
      "expected a version string, found {}",
      super::value_kind(&other)
    ))),
  }
}

/// Reads a `tags`-like value: a list keeps its strings, a lone string becomes one entry.
pub(crate) fn string_list(value: Option<Value>) -> Vec<String> {
  match value {
    Some(Value::String(single)) => vec![single],
    Some(Value::Array(items)) => items
      .into_iter()
      .filter_map(|item| match item {
        Value::String(text) => Some(text),
        _ => None,
      })
      .collect(),
    _ => vec![],
  }
}
