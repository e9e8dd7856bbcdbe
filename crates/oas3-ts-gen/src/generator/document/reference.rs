use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

const REF_KEY: &str = "$ref";

/// Either an inline object or a `$ref` pointing at a component.
///
/// Sibling keywords of a `$ref` are ignored except `nullable`, `summary` and
/// `description`. The `nullable` flag belongs to the referencing position and is
/// re-applied after the target is substituted.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectOrReference<T> {
  Ref {
    ref_path: String,
    nullable: Option<bool>,
    summary: Option<String>,
    description: Option<String>,
  },
  Object(T),
}

impl<T> ObjectOrReference<T> {
  pub fn reference(ref_path: impl Into<String>) -> Self {
    Self::Ref {
      ref_path: ref_path.into(),
      nullable: None,
      summary: None,
      description: None,
    }
  }

  pub fn ref_path(&self) -> Option<&str> {
    match self {
      Self::Ref { ref_path, .. } => Some(ref_path),
      Self::Object(_) => None,
    }
  }

  pub fn as_object(&self) -> Option<&T> {
    match self {
      Self::Ref { .. } => None,
      Self::Object(object) => Some(object),
    }
  }

  pub fn is_ref(&self) -> bool {
    matches!(self, Self::Ref { .. })
  }

  /// Splits a raw value into its `$ref` form, or hands it back untouched.
  pub(crate) fn split_ref(value: Value) -> Result<Self, Value> {
    let Value::Object(map) = value else {
      return Err(value);
    };

    let Some(Value::String(ref_path)) = map.get(REF_KEY) else {
      return Err(Value::Object(map));
    };

    Ok(Self::Ref {
      ref_path: ref_path.clone(),
      nullable: map.get("nullable").and_then(Value::as_bool),
      summary: map.get("summary").and_then(Value::as_str).map(String::from),
      description: map.get("description").and_then(Value::as_str).map(String::from),
    })
  }
}

impl<'de, T> Deserialize<'de> for ObjectOrReference<T>
where
  T: DeserializeOwned,
{
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let value = Value::deserialize(deserializer)?;
    match Self::split_ref(value) {
      Ok(reference) => Ok(reference),
      Err(value) => T::deserialize(value).map(Self::Object).map_err(serde::de::Error::custom),
    }
  }
}
