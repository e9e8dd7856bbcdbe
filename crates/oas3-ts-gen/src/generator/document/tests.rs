use serde_json::json;

use super::*;
use crate::generator::errors::ErrorKind;

fn minimal(extra: Value) -> Value {
  let mut value = json!({
    "openapi": "3.0.3",
    "info": { "title": "Test", "version": "1.0.0" },
    "components": { "schemas": { "Thing": { "type": "string" } } }
  });
  if let (Value::Object(root), Value::Object(extra)) = (&mut value, extra) {
    root.extend(extra);
  }
  value
}

#[test]
fn test_rejects_structurally_invalid_documents() {
  let cases = [
    (json!(null), ValidationFailure::EmptyDocument),
    (json!([1, 2]), ValidationFailure::NotAnObject("a list")),
    (
      json!({ "components": { "schemas": { "A": {} } } }),
      ValidationFailure::MissingVersion,
    ),
    (
      json!({ "openapi": "2.0", "components": { "schemas": { "A": {} } } }),
      ValidationFailure::UnsupportedVersion("2.0".to_string()),
    ),
    (json!({ "openapi": "3.0.0" }), ValidationFailure::MissingSchemas),
    (
      json!({ "openapi": "3.0.0", "components": { "schemas": {} } }),
      ValidationFailure::EmptySchemas,
    ),
    (
      json!({ "openapi": "3.0.0", "paths": [], "components": { "schemas": { "A": {} } } }),
      ValidationFailure::InvalidPaths("a list"),
    ),
  ];
  for (input, expected) in cases {
    let error = Document::from_value(input.clone(), None).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation, "failed for input {input:?}");
    assert!(
      matches!(&error, GeneratorError::Validation { reason, .. } if *reason == expected),
      "failed for input {input:?}: {error}"
    );
  }
}

#[test]
fn test_validation_error_carries_source_path() {
  let error = Document::from_value(json!({}), Some(Path::new("specs/api.json"))).unwrap_err();
  assert_eq!(
    error.context().and_then(|context| context.source_path.as_deref()),
    Some(Path::new("specs/api.json"))
  );
  assert!(error.to_string().contains("specs/api.json"));
}

#[test]
fn test_schema_keywords_are_interpreted() {
  let node = SchemaNode::from_value(json!({
    "type": ["string", "null"],
    "description": "A name",
    "enum": ["a", "b"],
    "x-internal": true
  }));
  let schema = node.as_object().and_then(Schema::as_object_schema).unwrap();

  assert_eq!(
    schema.schema_type,
    Some(SchemaTypeSet::Multiple(vec![SchemaType::String, SchemaType::Null]))
  );
  assert_eq!(schema.description.as_deref(), Some("A name"));
  assert_eq!(schema.enum_values.len(), 2);
  assert_eq!(schema.extensions.get("x-internal"), Some(&json!(true)));
}

#[test]
fn test_malformed_fragments_do_not_fail_the_parse() {
  let cases = [
    (json!({ "type": 5 }), "`type` must be a string or a list of strings"),
    (json!({ "enum": "a" }), "`enum` must be a list"),
    (json!({ "properties": [] }), "`properties` must be a mapping"),
    (json!({ "$ref": 7 }), "`$ref` must be a string"),
    (json!("text"), "expected a schema mapping or boolean"),
  ];
  for (input, expected) in cases {
    let node = SchemaNode::from_value(input.clone());
    let Some(Schema::Malformed { reason }) = node.as_object() else {
      panic!("expected malformed schema for input {input:?}");
    };
    assert!(reason.contains(expected), "failed for input {input:?}: {reason}");
  }
}

#[test]
fn test_reference_keeps_nullable_and_description() {
  let node = SchemaNode::from_value(json!({
    "$ref": "#/components/schemas/Pet",
    "nullable": true,
    "description": "The pet",
    "type": "object"
  }));

  assert_eq!(node.ref_path(), Some("#/components/schemas/Pet"));
  assert_eq!(node.nullable_flag(), Some(true));
  assert!(matches!(&node, ObjectOrReference::Ref { description: Some(d), .. } if d == "The pet"));
}

#[test]
fn test_boolean_schema() {
  assert_eq!(
    SchemaNode::from_value(json!(true)),
    ObjectOrReference::Object(Schema::Boolean(true))
  );
}

#[test]
fn test_path_item_methods_follow_fixed_order() {
  let document = Document::from_value(
    minimal(json!({
      "paths": {
        "/items": {
          "delete": { "responses": {} },
          "post": { "responses": {} },
          "trace": { "responses": {} },
          "get": { "responses": {} }
        }
      }
    })),
    None,
  )
  .unwrap();

  let methods = document.paths["/items"]
    .methods()
    .map(|(method, _)| method.to_string())
    .collect::<Vec<_>>();
  assert_eq!(methods, vec!["GET", "POST", "DELETE"]);
}

#[test]
fn test_parameters_and_components_deserialize() {
  let document = Document::from_value(
    minimal(json!({
      "openapi": "3.1.0",
      "paths": {
        "/items/{id}": {
          "parameters": [{ "$ref": "#/components/parameters/Id" }],
          "get": {
            "operationId": "getItem",
            "tags": ["items"],
            "parameters": [{ "name": "X-Trace", "in": "header", "schema": { "type": "string" } }],
            "responses": { "200": { "description": "ok" } }
          }
        }
      },
      "components": {
        "schemas": { "Item": { "type": "object" } },
        "parameters": {
          "Id": { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }
        }
      }
    })),
    None,
  )
  .unwrap();

  assert!(document.is_openapi_31());
  assert!(document.schema("Item").is_some());
  assert!(document.schema("Thing").is_none());

  let item = &document.paths["/items/{id}"];
  assert_eq!(item.parameters[0].ref_path(), Some("#/components/parameters/Id"));
  let operation = item.get.as_ref().unwrap();
  assert_eq!(operation.operation_id.as_deref(), Some("getItem"));
  let header = operation.parameters[0].as_object().unwrap();
  assert_eq!(header.merge_key(), ("X-Trace", ParameterIn::Header));

  let id = document.components.parameters["Id"].as_object().unwrap();
  assert!(id.required);
  assert_eq!(id.location, ParameterIn::Path);
}

#[test]
fn test_extension_keys_and_loose_shapes_are_tolerated() {
  let document = Document::from_value(
    minimal(json!({
      "paths": {
        "x-owner": "platform-team",
        "/items": {
          "parameters": [{ "name": "tenant" }],
          "get": {
            "tags": "admin",
            "parameters": [{ "name": "q" }, { "name": "limit", "in": "query" }],
            "responses": {
              "200": { "description": "ok" },
              "x-note": "legacy"
            }
          }
        }
      }
    })),
    None,
  )
  .unwrap();

  assert_eq!(document.paths.keys().collect::<Vec<_>>(), vec!["/items"]);
  let item = &document.paths["/items"];
  assert!(item.parameters.is_empty());
  assert_eq!(item.skipped[0].kind, "parameter 'tenant'");

  let operation = item.get.as_ref().unwrap();
  assert_eq!(operation.tags, vec!["admin"]);
  assert_eq!(operation.responses.keys().collect::<Vec<_>>(), vec!["200"]);
  assert_eq!(operation.parameters.len(), 1);
  assert_eq!(operation.parameters[0].as_object().unwrap().name, "limit");
  assert_eq!(operation.skipped.len(), 1);
  assert_eq!(operation.skipped[0].kind, "parameter 'q'");
  assert!(operation.skipped[0].reason.contains("missing field `in`"), "{:?}", operation.skipped);
}

#[test]
fn test_operation_entries_that_fit_no_shape_are_skipped() {
  let cases = [
    (json!({ "parameters": [42] }), "parameter #1"),
    (json!({ "parameters": { "name": "q" } }), "parameters"),
    (json!({ "requestBody": "json" }), "request body"),
    (json!({ "responses": { "404": "missing" } }), "response '404'"),
    (json!({ "responses": ["200"] }), "responses"),
  ];
  for (operation, expected) in cases {
    let document = Document::from_value(minimal(json!({ "paths": { "/x": { "post": operation } } })), None)
      .unwrap_or_else(|error| panic!("failed for input {operation:?}: {error}"));
    let parsed = document.paths["/x"].post.as_ref().unwrap();
    let kinds = parsed.skipped.iter().map(|entry| entry.kind.as_str()).collect::<Vec<_>>();
    assert_eq!(kinds, vec![expected], "failed for input {operation:?}");
  }
}

#[test]
fn test_tags_accept_a_list_or_a_single_string() {
  let cases = [
    (json!(["a", "b"]), vec!["a", "b"]),
    (json!("admin"), vec!["admin"]),
    (json!(["a", 7]), vec!["a"]),
    (json!(7), vec![]),
  ];
  for (tags, expected) in cases {
    let document = Document::from_value(
      minimal(json!({ "paths": { "/x": { "get": { "tags": tags, "responses": {} } } } })),
      None,
    )
    .unwrap();
    let operation = document.paths["/x"].get.as_ref().unwrap();
    assert_eq!(operation.tags, expected, "failed for input {tags:?}");
  }
}

#[test]
fn test_numeric_versions_are_read_as_text() {
  let cases = [
    (json!("3.0.3"), json!("1.0.0"), "3.0.3", "1.0.0"),
    (json!(3.0), json!(1.0), "3.0", "1.0"),
    (json!(3.1), json!(2), "3.1", "2"),
  ];
  for (openapi, version, expected_openapi, expected_version) in cases {
    let mut value = minimal(json!({}));
    value["openapi"] = openapi.clone();
    value["info"]["version"] = version;
    let document =
      Document::from_value(value, None).unwrap_or_else(|error| panic!("failed for input {openapi:?}: {error}"));
    assert_eq!(document.openapi, expected_openapi, "failed for input {openapi:?}");
    assert_eq!(document.info.version, expected_version, "failed for input {openapi:?}");
  }

  let mut value = minimal(json!({}));
  value["openapi"] = json!(2.0);
  let error = Document::from_value(value, None).unwrap_err();
  assert!(
    matches!(&error, GeneratorError::Validation { reason: ValidationFailure::UnsupportedVersion(version), .. } if version == "2.0"),
    "{error}"
  );
}
