use std::borrow::Cow;

use serde_json::json;

use super::support::{document, document_with};
use crate::generator::{
  document::{ObjectOrReference, Parameter, Schema, SchemaNode},
  resolver::{DEFAULT_MAX_DEPTH, resolve, resolve_parameter, resolve_schema},
};

fn schema_ref(name: &str) -> SchemaNode {
  SchemaNode::reference(format!("#/components/schemas/{name}"))
}

#[test]
fn test_resolve_follows_reference_chains() {
  let doc = document(
    json!({
      "Alias": { "$ref": "#/components/schemas/Middle" },
      "Middle": { "$ref": "#/components/schemas/Target" },
      "Target": { "type": "string", "description": "end of the chain" }
    }),
    json!({}),
  );

  let node = schema_ref("Alias");
  let resolved = resolve(&node, &doc, DEFAULT_MAX_DEPTH);
  let schema = resolved.as_object().and_then(Schema::as_object_schema).unwrap();
  assert_eq!(schema.description.as_deref(), Some("end of the chain"));
}

#[test]
fn test_inline_node_is_returned_unchanged() {
  let doc = document(json!({ "A": { "type": "string" } }), json!({}));
  let node = SchemaNode::from_value(json!({ "type": "integer" }));
  assert!(std::ptr::eq(resolve(&node, &doc, DEFAULT_MAX_DEPTH), &node));
}

#[test]
fn test_unresolvable_reference_returns_original_node() {
  let doc = document(json!({ "A": { "type": "string" } }), json!({}));
  let cases = [
    "#/components/schemas/DoesNotExist",
    "#/components/parameters/A",
    "https://example.com/schemas/A",
    "#/components/schemas/A/properties/id",
  ];
  for input in cases {
    let node = SchemaNode::reference(input);
    let resolved = resolve(&node, &doc, DEFAULT_MAX_DEPTH);
    assert!(std::ptr::eq(resolved, &node), "failed for input {input:?}");
    assert_eq!(resolved.ref_path(), Some(input), "failed for input {input:?}");
  }
}

#[test]
fn test_reference_cycle_stops_at_depth_limit() {
  let doc = document(
    json!({
      "A": { "$ref": "#/components/schemas/B" },
      "B": { "$ref": "#/components/schemas/A" }
    }),
    json!({}),
  );

  let node = schema_ref("A");
  assert!(resolve(&node, &doc, DEFAULT_MAX_DEPTH).is_ref());
  assert!(resolve(&node, &doc, 0).is_ref());
}

#[test]
fn test_depth_limit_counts_hops() {
  let doc = document(
    json!({
      "One": { "$ref": "#/components/schemas/Two" },
      "Two": { "type": "boolean" }
    }),
    json!({}),
  );

  let node = schema_ref("One");
  let cases = [(0, true), (1, true), (2, false)];
  for (input, expected) in cases {
    assert_eq!(resolve(&node, &doc, input).is_ref(), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_resolve_schema_reapplies_nullable() {
  let doc = document(json!({ "Pet": { "type": "object" } }), json!({}));

  let node = SchemaNode::from_value(json!({ "$ref": "#/components/schemas/Pet", "nullable": true }));
  let resolved = resolve_schema(&node, &doc);
  assert!(matches!(resolved, Cow::Owned(_)));
  assert_eq!(resolved.nullable_flag(), Some(true));

  let plain = schema_ref("Pet");
  let resolved = resolve_schema(&plain, &doc);
  assert!(matches!(resolved, Cow::Borrowed(_)));
  assert_eq!(resolved.nullable_flag(), None);
}

#[test]
fn test_resolve_parameter_components() {
  let doc = document_with(
    json!({
      "schemas": { "A": { "type": "string" } },
      "parameters": {
        "Limit": { "name": "limit", "in": "query", "schema": { "type": "integer" } },
        "PageSize": { "$ref": "#/components/parameters/Limit" }
      }
    }),
    json!({}),
  );

  let node = ObjectOrReference::<Parameter>::reference("#/components/parameters/PageSize");
  assert_eq!(resolve_parameter(&node, &doc).map(|p| p.name.as_str()), Some("limit"));

  let missing = ObjectOrReference::<Parameter>::reference("#/components/parameters/Offset");
  assert!(resolve_parameter(&missing, &doc).is_none());
}
