//! Typed view of an OpenAPI 3.x document.
//!
//! Only the parts the type compiler and the operation extractor read are modelled.
//! Schema positions are deserialized leniently (see [`Schema`]). Path items and
//! operations drop `x-` keys and set aside entries they cannot read (see
//! [`SkippedEntry`]); everything else uses serde defaults so absent optional keys
//! never fail a parse.

mod lenient;
mod paths;
mod reference;
mod schema;

#[cfg(test)]
mod tests;

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

pub use self::{
  paths::{
    METHOD_ORDER, MediaType, Operation, Parameter, ParameterIn, PathItem, RequestBody, Response, SkippedEntry,
  },
  reference::ObjectOrReference,
  schema::{AdditionalProperties, ObjectSchema, Schema, SchemaNode, SchemaType, SchemaTypeSet},
};
pub(crate) use self::schema::value_kind;
use super::{
  errors::{ErrorContext, GeneratorError, ValidationFailure},
  validation,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
  #[serde(default)]
  pub title: String,
  #[serde(default, deserialize_with = "lenient::version_text")]
  pub version: String,
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
  #[serde(default)]
  pub schemas: IndexMap<String, SchemaNode>,
  #[serde(default)]
  pub parameters: IndexMap<String, ObjectOrReference<Parameter>>,
  #[serde(default)]
  pub request_bodies: IndexMap<String, ObjectOrReference<RequestBody>>,
  #[serde(default)]
  pub responses: IndexMap<String, ObjectOrReference<Response>>,
}

/// A parsed, validated OpenAPI document. Read-only once built.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
  #[serde(deserialize_with = "lenient::version_text")]
  pub openapi: String,
  #[serde(default)]
  pub info: Info,
  #[serde(default, deserialize_with = "lenient::without_extensions")]
  pub paths: IndexMap<String, PathItem>,
  #[serde(default)]
  pub components: Components,
}

impl Document {
  /// Validates the raw document shape, then deserializes it.
  ///
  /// Structural problems are reported here, before any schema is lowered.
  pub fn from_value(value: Value, source_path: Option<&Path>) -> Result<Self, GeneratorError> {
    let context = ErrorContext::for_source(source_path);
    validation::validate_document(&value, &context)?;

    serde_path_to_error::deserialize(value).map_err(|error| GeneratorError::Validation {
      reason: ValidationFailure::Unparseable(format!("at `{}`: {}", error.path(), error.inner())),
      context,
    })
  }

  pub fn is_openapi_31(&self) -> bool {
    self.openapi.starts_with("3.1")
  }

  pub fn schema(&self, name: &str) -> Option<&SchemaNode> {
    self.components.schemas.get(name)
  }
}
