use serde_json::{Value, json};

use super::support::document_with;
use crate::generator::{
  document::{Document, ObjectOrReference, Parameter, ParameterIn, Schema, SchemaType, SchemaTypeSet},
  parameters::merge_parameters,
};

fn params(values: Value) -> Vec<ObjectOrReference<Parameter>> {
  serde_json::from_value(values).unwrap()
}

fn doc() -> Document {
  document_with(
    json!({
      "schemas": { "Id": { "type": "string" } },
      "parameters": {
        "TraceId": { "name": "X-Trace-Id", "in": "header", "schema": { "type": "string" } },
        "IntId": { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }
      }
    }),
    json!({}),
  )
}

fn schema_type(param: &Parameter) -> Option<&SchemaTypeSet> {
  param
    .schema
    .as_ref()?
    .as_object()
    .and_then(Schema::as_object_schema)?
    .schema_type
    .as_ref()
}

#[test]
fn test_operation_parameter_overrides_path_parameter() {
  let doc = doc();
  let path = params(json!([{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }]));
  let operation = params(json!([{ "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }]));

  let merged = merge_parameters(Some(path.as_slice()), Some(operation.as_slice()), &doc);

  assert_eq!(merged.parameters.len(), 1);
  assert_eq!(merged.parameters[0].name, "id");
  assert_eq!(
    schema_type(merged.parameters[0]),
    Some(&SchemaTypeSet::Single(SchemaType::Integer))
  );
}

#[test]
fn test_same_name_in_different_locations_are_distinct() {
  let doc = doc();
  let path = params(json!([{ "name": "id", "in": "path", "required": true }]));
  let operation = params(json!([{ "name": "id", "in": "query" }]));

  let merged = merge_parameters(Some(path.as_slice()), Some(operation.as_slice()), &doc);

  let keys = merged
    .parameters
    .iter()
    .map(|param| param.merge_key())
    .collect::<Vec<_>>();
  assert_eq!(
    keys,
    vec![("id", ParameterIn::Path), ("id", ParameterIn::Query)]
  );
}

#[test]
fn test_references_are_resolved_before_keys_are_compared() {
  let doc = doc();
  let path = params(json!([
    { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } },
    { "name": "verbose", "in": "query" }
  ]));
  let operation = params(json!([
    { "$ref": "#/components/parameters/IntId" },
    { "$ref": "#/components/parameters/TraceId" }
  ]));

  let merged = merge_parameters(Some(path.as_slice()), Some(operation.as_slice()), &doc);

  let names = merged
    .parameters
    .iter()
    .map(|param| param.name.as_str())
    .collect::<Vec<_>>();
  assert_eq!(names, vec!["verbose", "id", "X-Trace-Id"]);
  assert_eq!(
    schema_type(merged.parameters[1]),
    Some(&SchemaTypeSet::Single(SchemaType::Integer))
  );
  assert!(merged.unresolved.is_empty());
}

#[test]
fn test_absent_lists_and_unresolved_references() {
  let doc = doc();
  let cases = [
    (None, None, 0, 0),
    (Some(params(json!([{ "name": "q", "in": "query" }]))), None, 1, 0),
    (None, Some(params(json!([{ "$ref": "#/components/parameters/Missing" }]))), 0, 1),
  ];
  for (path, operation, expected_params, expected_unresolved) in cases {
    let merged = merge_parameters(path.as_deref(), operation.as_deref(), &doc);
    assert_eq!(merged.parameters.len(), expected_params, "failed for input {path:?} {operation:?}");
    assert_eq!(merged.unresolved.len(), expected_unresolved, "failed for input {path:?} {operation:?}");
  }

  let operation = params(json!([{ "$ref": "#/components/parameters/Missing" }]));
  let merged = merge_parameters(None, Some(operation.as_slice()), &doc);
  assert_eq!(merged.unresolved, vec!["#/components/parameters/Missing"]);
}
