use serde_json::Value;

use super::{
  document::value_kind,
  errors::{ErrorContext, GeneratorError, ValidationFailure},
};

const SUPPORTED_MAJOR: &str = "3.";

/// Rejects documents the compiler cannot start on.
///
/// Runs on the raw value so every structural problem is reported as a
/// [`ValidationFailure`] rather than a deserialization error deep in the tree.
pub(crate) fn validate_document(value: &Value, context: &ErrorContext) -> Result<(), GeneratorError> {
  let fail = |reason| Err(GeneratorError::validation(reason, context));

  let root = match value {
    Value::Object(root) => root,
    Value::Null => return fail(ValidationFailure::EmptyDocument),
    other => return fail(ValidationFailure::NotAnObject(value_kind(other))),
  };

  match root.get("openapi") {
    None => return fail(ValidationFailure::MissingVersion),
    Some(Value::String(version)) if version.starts_with(SUPPORTED_MAJOR) => {}
    Some(Value::String(version)) => return fail(ValidationFailure::UnsupportedVersion(version.clone())),
    Some(Value::Number(version)) if version.to_string().starts_with(SUPPORTED_MAJOR) => {}
    Some(other) => return fail(ValidationFailure::UnsupportedVersion(other.to_string())),
  }

  match root.get("components").and_then(|c| c.get("schemas")) {
    None => return fail(ValidationFailure::MissingSchemas),
    Some(Value::Object(schemas)) if !schemas.is_empty() => {}
    Some(_) => return fail(ValidationFailure::EmptySchemas),
  }

  match root.get("paths") {
    None | Some(Value::Object(_)) => Ok(()),
    Some(other) => fail(ValidationFailure::InvalidPaths(value_kind(other))),
  }
}
