use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use strum::EnumString;

use super::reference::ObjectOrReference;

/// A schema position: either a `$ref` or an inline [`Schema`].
pub type SchemaNode = ObjectOrReference<Schema>;

/// The value of a single `type` keyword entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SchemaType {
  String,
  Number,
  Integer,
  Boolean,
  Object,
  Array,
  Null,
  #[strum(default)]
  Other(String),
}

impl SchemaType {
  pub fn as_str(&self) -> &str {
    match self {
      Self::String => "string",
      Self::Number => "number",
      Self::Integer => "integer",
      Self::Boolean => "boolean",
      Self::Object => "object",
      Self::Array => "array",
      Self::Null => "null",
      Self::Other(other) => other,
    }
  }
}

/// `type: T` (OpenAPI 3.0 and 3.1) or `type: [T1, T2]` (OpenAPI 3.1 only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaTypeSet {
  Single(SchemaType),
  Multiple(Vec<SchemaType>),
}

impl SchemaTypeSet {
  pub fn is(&self, schema_type: &SchemaType) -> bool {
    match self {
      Self::Single(single) => single == schema_type,
      Self::Multiple(types) => types.len() == 1 && &types[0] == schema_type,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
  Bool(bool),
  Schema(Box<SchemaNode>),
}

/// The keywords the type compiler interprets. Everything else lands in `extensions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
  pub schema_type: Option<SchemaTypeSet>,
  pub format: Option<String>,
  pub title: Option<String>,
  pub description: Option<String>,
  pub enum_values: Vec<Value>,
  pub const_value: Option<Value>,
  pub properties: IndexMap<String, SchemaNode>,
  pub required: Vec<String>,
  pub items: Option<Box<SchemaNode>>,
  pub prefix_items: Vec<SchemaNode>,
  pub all_of: Vec<SchemaNode>,
  pub one_of: Vec<SchemaNode>,
  pub any_of: Vec<SchemaNode>,
  pub nullable: Option<bool>,
  pub additional_properties: Option<AdditionalProperties>,
  pub deprecated: bool,
  pub default: Option<Value>,
  pub extensions: IndexMap<String, Value>,
}

impl ObjectSchema {
  pub fn is_required(&self, property: &str) -> bool {
    self.required.iter().any(|name| name == property)
  }

  pub fn has_type(&self, schema_type: &SchemaType) -> bool {
    self.schema_type.as_ref().is_some_and(|set| set.is(schema_type))
  }

  pub fn has_enum(&self) -> bool {
    !self.enum_values.is_empty() || self.const_value.is_some()
  }

  /// Enum values, treating `const` as a single-valued enum.
  pub fn enum_like_values(&self) -> Vec<&Value> {
    if self.enum_values.is_empty() {
      self.const_value.iter().collect()
    } else {
      self.enum_values.iter().collect()
    }
  }

  /// Copy of this schema with `type` replaced by exactly one entry.
  pub fn with_single_type(&self, schema_type: SchemaType) -> Self {
    Self {
      schema_type: Some(SchemaTypeSet::Single(schema_type)),
      nullable: None,
      ..self.clone()
    }
  }

  fn from_map(map: Map<String, Value>) -> Result<Self, String> {
    let mut schema = Self::default();

    for (key, value) in map {
      match key.as_str() {
        "type" => schema.schema_type = Some(parse_type(&value)?),
        "format" => schema.format = value.as_str().map(String::from),
        "title" => schema.title = value.as_str().map(String::from),
        "description" => schema.description = value.as_str().map(String::from),
        "enum" => match value {
          Value::Array(values) => schema.enum_values = values,
          other => return Err(shape_error("enum", "a list", &other)),
        },
        "const" => schema.const_value = Some(value),
        "properties" => schema.properties = parse_properties(value)?,
        "required" => match value {
          Value::Array(names) => {
            schema.required = names.into_iter().filter_map(|n| n.as_str().map(String::from)).collect();
          }
          other => return Err(shape_error("required", "a list", &other)),
        },
        "items" => schema.items = Some(Box::new(SchemaNode::from_value(value))),
        "prefixItems" => schema.prefix_items = parse_node_list("prefixItems", value)?,
        "allOf" => schema.all_of = parse_node_list("allOf", value)?,
        "oneOf" => schema.one_of = parse_node_list("oneOf", value)?,
        "anyOf" => schema.any_of = parse_node_list("anyOf", value)?,
        "nullable" => match value {
          Value::Bool(flag) => schema.nullable = Some(flag),
          other => return Err(shape_error("nullable", "a boolean", &other)),
        },
        "additionalProperties" => {
          schema.additional_properties = Some(match value {
            Value::Bool(flag) => AdditionalProperties::Bool(flag),
            Value::Object(_) => AdditionalProperties::Schema(Box::new(SchemaNode::from_value(value))),
            other => return Err(shape_error("additionalProperties", "a boolean or a schema", &other)),
          });
        }
        "deprecated" => schema.deprecated = value.as_bool().unwrap_or(false),
        "default" => schema.default = Some(value),
        _ => {
          schema.extensions.insert(key, value);
        }
      }
    }

    Ok(schema)
  }
}

/// An inline schema. Building one from a value never fails: a fragment whose
/// interpreted keywords have the wrong shape becomes [`Schema::Malformed`].
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
  Object(Box<ObjectSchema>),
  Boolean(bool),
  Malformed { reason: String },
}

impl Schema {
  pub fn from_value(value: Value) -> Self {
    match value {
      Value::Bool(flag) => Self::Boolean(flag),
      Value::Object(map) => match ObjectSchema::from_map(map) {
        Ok(schema) => Self::Object(Box::new(schema)),
        Err(reason) => Self::Malformed { reason },
      },
      other => Self::Malformed {
        reason: format!("expected a schema mapping or boolean, found {}", value_kind(&other)),
      },
    }
  }

  pub fn as_object_schema(&self) -> Option<&ObjectSchema> {
    match self {
      Self::Object(schema) => Some(schema),
      Self::Boolean(_) | Self::Malformed { .. } => None,
    }
  }
}

impl<'de> Deserialize<'de> for Schema {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    Ok(Self::from_value(Value::deserialize(deserializer)?))
  }
}

impl From<ObjectSchema> for Schema {
  fn from(schema: ObjectSchema) -> Self {
    Self::Object(Box::new(schema))
  }
}

impl ObjectOrReference<Schema> {
  /// Builds a schema node without failing; a non-string `$ref` is malformed.
  pub fn from_value(value: Value) -> Self {
    if value.get("$ref").is_some_and(|r| !r.is_string()) {
      return Self::Object(Schema::Malformed {
        reason: "`$ref` must be a string".to_string(),
      });
    }

    match Self::split_ref(value) {
      Ok(reference) => reference,
      Err(value) => Self::Object(Schema::from_value(value)),
    }
  }

  /// The `nullable` flag written on this position, whichever variant it is.
  pub fn nullable_flag(&self) -> Option<bool> {
    match self {
      Self::Ref { nullable, .. } => *nullable,
      Self::Object(schema) => schema.as_object_schema().and_then(|s| s.nullable),
    }
  }
}

impl From<ObjectSchema> for SchemaNode {
  fn from(schema: ObjectSchema) -> Self {
    Self::Object(schema.into())
  }
}

fn parse_type(value: &Value) -> Result<SchemaTypeSet, String> {
  match value {
    Value::String(name) => Ok(SchemaTypeSet::Single(parse_type_name(name))),
    Value::Array(names) => names
      .iter()
      .map(|name| {
        name
          .as_str()
          .map(parse_type_name)
          .ok_or_else(|| shape_error("type", "a list of strings", value))
      })
      .collect::<Result<Vec<_>, _>>()
      .map(SchemaTypeSet::Multiple),
    other => Err(shape_error("type", "a string or a list of strings", other)),
  }
}

fn parse_type_name(name: &str) -> SchemaType {
  SchemaType::from_str(name).unwrap_or_else(|_| SchemaType::Other(name.to_string()))
}

fn parse_properties(value: Value) -> Result<IndexMap<String, SchemaNode>, String> {
  match value {
    Value::Object(map) => Ok(
      map
        .into_iter()
        .map(|(name, schema)| (name, SchemaNode::from_value(schema)))
        .collect(),
    ),
    other => Err(shape_error("properties", "a mapping", &other)),
  }
}

fn parse_node_list(keyword: &str, value: Value) -> Result<Vec<SchemaNode>, String> {
  match value {
    Value::Array(entries) => Ok(entries.into_iter().map(SchemaNode::from_value).collect()),
    other => Err(shape_error(keyword, "a list", &other)),
  }
}

fn shape_error(keyword: &str, expected: &str, found: &Value) -> String {
  format!("`{keyword}` must be {expected}, found {}", value_kind(found))
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "a list",
    Value::Object(_) => "a mapping",
  }
}
